//! Fake WavePortal contract served through a [`MockProvider`].

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use serde_json::{Value, json};
use std::rc::Rc;
use wp_chain_client::ProviderError;
use wp_chain_client::mock::MockProvider;
use wp_chain_client::rpc::{
    ETH_ACCOUNTS, ETH_CALL, ETH_GET_TRANSACTION_RECEIPT, ETH_NEW_FILTER, ETH_SEND_TRANSACTION,
    ETH_UNINSTALL_FILTER,
};

use crate::abi::{NewWave, Wave, getAllWavesCall, getWavesCall};
use crate::config::WAVE_PORTAL_ADDRESS;

pub const SIGNER: &str = "0x00000000000000000000000000000000000000ab";
pub const FILTER_ID: &str = "0x1";

pub fn tx_hash() -> B256 {
    B256::repeat_byte(0x77)
}

/// Address whose every byte is `byte`.
pub fn waver(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub fn wave(byte: u8, seconds: u64, message: &str) -> Wave {
    Wave {
        waver: waver(byte),
        message: message.to_owned(),
        timestamp: U256::from(seconds),
    }
}

/// `NewWave` log in `eth_getFilterChanges` shape.
pub fn new_wave_log(byte: u8, seconds: u64, message: &str) -> Value {
    let event = NewWave {
        from: waver(byte),
        timestamp: U256::from(seconds),
        message: message.to_owned(),
    };
    let data = event.encode_log_data();
    json!({
        "address": WAVE_PORTAL_ADDRESS,
        "topics": data.topics(),
        "data": data.data,
        "transactionHash": tx_hash(),
        "removed": false,
    })
}

/// `getAllWaves()` return data as `eth_call` hands it back.
pub fn all_waves_output(waves: &[Wave]) -> Value {
    json!(Bytes::from(waves.to_vec().abi_encode()))
}

fn call_data(params: &Value) -> Result<Bytes, ProviderError> {
    serde_json::from_value(params[0]["data"].clone())
        .map_err(|err| ProviderError::Decode(err.to_string()))
}

/// Provider backed by a contract that already holds `waves`, with one
/// authorized account, instantly mined transactions and a `NewWave` filter.
/// Filter changes are left unscripted.
pub fn portal(waves: Vec<Wave>) -> Rc<MockProvider> {
    let provider = MockProvider::new();
    provider.respond(ETH_ACCOUNTS, json!([SIGNER]));
    provider.handle(ETH_CALL, move |params| {
        let data = call_data(params)?;
        let output = match data.get(..4) {
            Some(selector) if selector == getWavesCall::SELECTOR => {
                U256::from(waves.len()).abi_encode()
            }
            Some(selector) if selector == getAllWavesCall::SELECTOR => {
                return Ok(all_waves_output(&waves));
            }
            _ => {
                return Err(ProviderError::Rpc {
                    code: -32000,
                    message: "execution reverted".to_owned(),
                });
            }
        };
        Ok(json!(Bytes::from(output)))
    });
    provider.respond(ETH_SEND_TRANSACTION, json!(tx_hash()));
    provider.respond(
        ETH_GET_TRANSACTION_RECEIPT,
        json!({ "transactionHash": tx_hash(), "blockNumber": "0x2a", "status": "0x1" }),
    );
    provider.respond(ETH_NEW_FILTER, json!(FILTER_ID));
    provider.respond(ETH_UNINSTALL_FILTER, json!(true));
    provider
}
