use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wallet address as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account(pub String);

impl Account {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Account {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// One wave recorded by the contract, either fetched in bulk or streamed
/// from a `NewWave` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaveRecord {
    pub address: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl WaveRecord {
    pub fn new(
        address: impl Into<String>,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            timestamp,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_record_serializes_timestamp_as_rfc3339() {
        let timestamp = DateTime::from_timestamp(1_690_000_000, 0).expect("in range");
        let record = WaveRecord::new("0xDEF", timestamp, "hi");

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["address"], "0xDEF");
        assert_eq!(json["timestamp"], "2023-07-22T04:26:40Z");
        assert_eq!(json["message"], "hi");
    }

    #[test]
    fn account_displays_raw_address() {
        let account = Account::from("0xabc");
        assert_eq!(account.to_string(), "0xabc");
        assert_eq!(account.as_str(), "0xabc");
    }
}
