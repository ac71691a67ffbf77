use alloy_primitives::{Address, address};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

pub const WAVE_PORTAL_ADDRESS: Address = address!("0x928dE5D732aFb1472b75D954fB7dE5a9A13B9E71");

/// Upper bound on gas for one `wave` transaction.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 4_000;

/// Fixed contract settings. The host page may override any field with a JSON
/// object; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavePortalConfig {
    pub contract_address: Address,
    pub gas_limit: u64,
    #[serde(deserialize_with = "poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
    #[serde(deserialize_with = "poll_interval_ms")]
    pub event_poll_interval_ms: u64,
}

/// A zero interval would poll the provider in a tight loop.
fn poll_interval_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match u64::deserialize(deserializer)? {
        0 => Err(D::Error::custom("poll interval must be at least 1 ms")),
        millis => Ok(millis),
    }
}

impl Default for WavePortalConfig {
    fn default() -> Self {
        Self {
            contract_address: WAVE_PORTAL_ADDRESS,
            gas_limit: DEFAULT_GAS_LIMIT,
            receipt_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            event_poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WavePortalConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn event_poll_interval(&self) -> Duration {
        Duration::from_millis(self.event_poll_interval_ms)
    }
}
