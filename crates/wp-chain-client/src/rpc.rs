//! Ethereum JSON-RPC payloads exchanged through the provider.

use alloy_primitives::{Address, B256, Bytes};
use serde::{Deserialize, Serialize};

pub const ETH_ACCOUNTS: &str = "eth_accounts";
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_CALL: &str = "eth_call";
pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const ETH_GET_TRANSACTION_RECEIPT: &str = "eth_getTransactionReceipt";
pub const ETH_NEW_FILTER: &str = "eth_newFilter";
pub const ETH_GET_FILTER_CHANGES: &str = "eth_getFilterChanges";
pub const ETH_UNINSTALL_FILTER: &str = "eth_uninstallFilter";

pub const LATEST_BLOCK: &str = "latest";

/// Hex quantity encoding (`0x`-prefixed, no leading zeros).
pub fn quantity(value: u64) -> String {
    format!("{value:#x}")
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub gas: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    /// Receipts without a status field predate EIP-658 and only exist for
    /// successful transactions.
    pub fn succeeded(&self) -> bool {
        self.status.as_deref() != Some("0x0")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Address,
    pub topics: Vec<B256>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub removed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quantity_has_no_leading_zeros() {
        assert_eq!(quantity(300_000), "0x493e0");
        assert_eq!(quantity(0), "0x0");
    }

    #[test]
    fn transaction_request_uses_wire_field_names() {
        let request = TransactionRequest {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            data: Bytes::from_static(&[0xde, 0xad]),
            gas: quantity(300_000),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["gas"], "0x493e0");
        assert_eq!(value["data"], "0xdead");
        assert_eq!(value["to"], "0x2222222222222222222222222222222222222222");
    }

    #[test]
    fn call_request_omits_missing_sender() {
        let request = CallRequest {
            from: None,
            to: Address::ZERO,
            data: Bytes::new(),
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert!(value.get("from").is_none());
    }

    #[test]
    fn receipt_status_zero_is_a_revert() {
        let hash = format!("0x{}", "ab".repeat(32));
        let reverted: TransactionReceipt = serde_json::from_value(json!({
            "transactionHash": hash,
            "blockNumber": "0x10",
            "status": "0x0",
        }))
        .expect("receipt");
        let legacy: TransactionReceipt =
            serde_json::from_value(json!({ "transactionHash": hash })).expect("receipt");

        assert!(!reverted.succeeded());
        assert!(legacy.succeeded());
    }

    #[test]
    fn log_defaults_optional_fields() {
        let log: RpcLog = serde_json::from_value(json!({
            "address": "0x928de5d732afb1472b75d954fb7de5a9a13b9e71",
            "topics": [],
            "data": "0x",
        }))
        .expect("log");
        assert!(!log.removed);
        assert!(log.transaction_hash.is_none());
        assert!(log.data.is_empty());
    }
}
