use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{SolCall, SolEvent};
use serde_json::json;
use std::rc::Rc;
use wp_chain_client::rpc::{
    CallRequest, ETH_ACCOUNTS, ETH_CALL, ETH_GET_FILTER_CHANGES, ETH_GET_TRANSACTION_RECEIPT,
    ETH_NEW_FILTER, ETH_SEND_TRANSACTION, ETH_UNINSTALL_FILTER, LATEST_BLOCK, LogFilter, RpcLog,
    TransactionReceipt, TransactionRequest, quantity,
};
use wp_chain_client::{Eip1193, request_as};
use wp_types::WaveRecord;

use crate::abi::{NewWave, getAllWavesCall, getWavesCall, waveCall};
use crate::{GatewayError, TxHash, WavePortalConfig};

/// Contract handle bound to one provider. Cheap to build; the gateway makes a
/// new one for every operation.
pub struct WavePortalContract {
    provider: Rc<dyn Eip1193>,
    address: Address,
    gas_limit: u64,
}

impl WavePortalContract {
    pub fn new(provider: Rc<dyn Eip1193>, config: &WavePortalConfig) -> Self {
        Self {
            provider,
            address: config.contract_address,
            gas_limit: config.gas_limit,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// First authorized account, used as the transaction sender.
    pub async fn signer(&self) -> Result<Address, GatewayError> {
        let accounts: Vec<String> = request_as(&*self.provider, ETH_ACCOUNTS, json!([])).await?;
        let first = accounts.into_iter().next().ok_or(GatewayError::NoSigner)?;
        first
            .parse()
            .map_err(|_| GatewayError::InvalidAccount(first))
    }

    async fn call<C: SolCall>(&self, call: &C) -> Result<C::Return, GatewayError> {
        let request = CallRequest {
            from: None,
            to: self.address,
            data: call.abi_encode().into(),
        };
        let output: Bytes =
            request_as(&*self.provider, ETH_CALL, json!([request, LATEST_BLOCK])).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    pub async fn wave_count(&self) -> Result<U256, GatewayError> {
        self.call(&getWavesCall {}).await
    }

    /// Full wave history in contract order.
    pub async fn all_waves(&self) -> Result<Vec<WaveRecord>, GatewayError> {
        self.call(&getAllWavesCall {})
            .await?
            .into_iter()
            .map(WaveRecord::try_from)
            .collect()
    }

    pub async fn send_wave(&self, from: Address, message: &str) -> Result<TxHash, GatewayError> {
        let call = waveCall {
            message: message.to_owned(),
        };
        let request = TransactionRequest {
            from,
            to: self.address,
            data: call.abi_encode().into(),
            gas: quantity(self.gas_limit),
        };
        Ok(request_as(&*self.provider, ETH_SEND_TRANSACTION, json!([request])).await?)
    }

    /// `None` while the transaction is still pending.
    pub async fn receipt(&self, hash: TxHash) -> Result<Option<TransactionReceipt>, GatewayError> {
        Ok(request_as(&*self.provider, ETH_GET_TRANSACTION_RECEIPT, json!([hash])).await?)
    }

    pub async fn new_wave_filter(&self) -> Result<String, GatewayError> {
        let filter = LogFilter {
            address: self.address,
            topics: vec![NewWave::SIGNATURE_HASH],
        };
        Ok(request_as(&*self.provider, ETH_NEW_FILTER, json!([filter])).await?)
    }

    pub async fn filter_changes(&self, filter_id: &str) -> Result<Vec<RpcLog>, GatewayError> {
        Ok(request_as(&*self.provider, ETH_GET_FILTER_CHANGES, json!([filter_id])).await?)
    }

    pub async fn uninstall_filter(&self, filter_id: &str) -> Result<bool, GatewayError> {
        Ok(request_as(&*self.provider, ETH_UNINSTALL_FILTER, json!([filter_id])).await?)
    }
}
