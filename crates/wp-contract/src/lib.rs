//! WavePortal contract gateway.
//!
//! Every operation resolves the injected provider at call time and builds a
//! fresh [`WavePortalContract`] handle from it. Failures end at the gateway
//! boundary as log events; callers only see empty results.

pub mod abi;
pub mod config;
pub mod contract;
pub mod gateway;
pub mod subscription;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use alloy_primitives::{B256, U256};
use thiserror::Error;
use wp_chain_client::ProviderError;

pub use config::WavePortalConfig;
pub use contract::WavePortalContract;
pub use gateway::ContractGateway;
pub use subscription::{Subscription, WavePoller};

pub type TxHash = B256;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("abi: {0}")]
    Abi(#[from] alloy_sol_types::Error),
    #[error("no authorized account to sign with")]
    NoSigner,
    #[error("invalid account address {0}")]
    InvalidAccount(String),
    #[error("wave timestamp {0} is out of range")]
    Timestamp(U256),
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
}
