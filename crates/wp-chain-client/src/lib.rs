//! Seams to the collaborators the page does not own: the injected EIP-1193
//! wallet provider and the host environment it lives in.

pub mod rpc;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

/// EIP-1193 code for "user rejected the request".
pub const USER_REJECTED_REQUEST: i64 = 4001;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("provider transport: {0}")]
    Transport(String),
    #[error("provider response decode: {0}")]
    Decode(String),
    #[error("provider does not support {0}")]
    Unsupported(String),
}

impl ProviderError {
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rpc { code, .. } if *code == USER_REJECTED_REQUEST)
    }
}

/// `window.ethereum.request({ method, params })`.
#[async_trait(?Send)]
pub trait Eip1193 {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;
}

/// Issue a request and decode the result into `T`.
pub async fn request_as<T: DeserializeOwned>(
    provider: &dyn Eip1193,
    method: &str,
    params: Value,
) -> Result<T, ProviderError> {
    let value = provider.request(method, params).await?;
    serde_json::from_value(value).map_err(|err| ProviderError::Decode(format!("{method}: {err}")))
}

/// The page environment: provider discovery, user alerts and timers.
///
/// The provider is looked up on every call because a wallet extension can be
/// injected after the page has started.
#[async_trait(?Send)]
pub trait Host {
    fn provider(&self) -> Option<Rc<dyn Eip1193>>;
    fn alert(&self, message: &str);
    async fn sleep(&self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use serde_json::json;

    #[tokio::test]
    async fn request_as_decodes_typed_result() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_accounts", json!(["0xabc", "0xdef"]));

        let accounts: Vec<String> = request_as(&*provider, "eth_accounts", json!([])).await?;
        assert_eq!(accounts, vec!["0xabc".to_owned(), "0xdef".to_owned()]);
        Ok(())
    }

    #[tokio::test]
    async fn request_as_reports_shape_mismatch() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond("eth_accounts", json!({ "not": "a list" }));

        let err = request_as::<Vec<String>>(&*provider, "eth_accounts", json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode(ref msg) if msg.starts_with("eth_accounts")));
        Ok(())
    }

    #[test]
    fn only_4001_counts_as_user_rejection() {
        let rejected = ProviderError::Rpc {
            code: USER_REJECTED_REQUEST,
            message: "User rejected the request.".to_owned(),
        };
        let pending = ProviderError::Rpc {
            code: -32002,
            message: "Request already pending".to_owned(),
        };
        assert!(rejected.is_user_rejection());
        assert!(!pending.is_user_rejection());
        assert!(!ProviderError::Transport("offline".to_owned()).is_user_rejection());
    }
}
