//! WavePortal contract bindings.

use alloy_primitives::U256;
use alloy_sol_types::{SolEvent, sol};
use chrono::{DateTime, Utc};
use wp_chain_client::rpc::RpcLog;
use wp_types::WaveRecord;

use crate::GatewayError;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Wave {
        address waver;
        string message;
        uint256 timestamp;
    }

    #[derive(Debug, PartialEq, Eq)]
    event NewWave(address indexed from, uint256 timestamp, string message);

    function wave(string message) external;
    function getWaves() external view returns (uint256);
    function getAllWaves() external view returns (Wave[] memory);
}

/// Contract timestamps are `block.timestamp`, seconds since the epoch.
pub fn timestamp_from_seconds(seconds: U256) -> Result<DateTime<Utc>, GatewayError> {
    u64::try_from(seconds)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(GatewayError::Timestamp(seconds))
}

impl TryFrom<Wave> for WaveRecord {
    type Error = GatewayError;

    fn try_from(wave: Wave) -> Result<Self, Self::Error> {
        Ok(WaveRecord::new(
            wave.waver.to_string(),
            timestamp_from_seconds(wave.timestamp)?,
            wave.message,
        ))
    }
}

impl TryFrom<NewWave> for WaveRecord {
    type Error = GatewayError;

    fn try_from(event: NewWave) -> Result<Self, Self::Error> {
        Ok(WaveRecord::new(
            event.from.to_string(),
            timestamp_from_seconds(event.timestamp)?,
            event.message,
        ))
    }
}

pub fn decode_new_wave(log: &RpcLog) -> Result<WaveRecord, GatewayError> {
    let event = NewWave::decode_raw_log(log.topics.iter().copied(), &log.data)?;
    WaveRecord::try_from(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, Bytes};

    fn log_for(event: &NewWave) -> RpcLog {
        let data = event.encode_log_data();
        RpcLog {
            address: Address::ZERO,
            topics: data.topics().to_vec(),
            data: data.data.clone(),
            transaction_hash: None,
            block_number: None,
            removed: false,
        }
    }

    #[test]
    fn new_wave_log_decodes_into_record() -> anyhow::Result<()> {
        let from = Address::repeat_byte(0x42);
        let event = NewWave {
            from,
            timestamp: U256::from(1_690_000_000_u64),
            message: "hi".to_owned(),
        };

        let record = decode_new_wave(&log_for(&event))?;
        assert_eq!(record.address, from.to_string());
        assert_eq!(record.timestamp.timestamp(), 1_690_000_000);
        assert_eq!(record.message, "hi");
        Ok(())
    }

    #[test]
    fn foreign_event_is_rejected() {
        let mut log = log_for(&NewWave {
            from: Address::ZERO,
            timestamp: U256::from(1_u64),
            message: String::new(),
        });
        log.topics[0] = B256::repeat_byte(0x01);

        assert!(matches!(decode_new_wave(&log), Err(GatewayError::Abi(_))));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let mut log = log_for(&NewWave {
            from: Address::ZERO,
            timestamp: U256::from(1_u64),
            message: "truncated".to_owned(),
        });
        log.data = Bytes::from_static(&[0u8; 8]);

        assert!(decode_new_wave(&log).is_err());
    }

    #[test]
    fn out_of_range_timestamp_is_an_error() {
        assert!(matches!(
            timestamp_from_seconds(U256::MAX),
            Err(GatewayError::Timestamp(_))
        ));
        assert_eq!(timestamp_from_seconds(U256::ZERO).ok(), DateTime::from_timestamp(0, 0));
    }

    #[test]
    fn wave_struct_renders_checksummed_address() -> anyhow::Result<()> {
        let waver: Address = "0x928dE5D732aFb1472b75D954fB7dE5a9A13B9E71".parse()?;
        let record = WaveRecord::try_from(Wave {
            waver,
            message: "gm".to_owned(),
            timestamp: U256::from(1_690_000_000_u64),
        })?;
        assert_eq!(record.address, waver.to_checksum(None));
        assert!(record.address.eq_ignore_ascii_case("0x928de5d732afb1472b75d954fb7de5a9a13b9e71"));
        Ok(())
    }
}
