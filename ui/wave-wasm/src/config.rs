//! Host-page configuration.

use tracing::{info, warn};
use wp_contract::WavePortalConfig;

use crate::dom;

pub const CONFIG_SCRIPT_ID: &str = "wavePortalConfig";

/// Read the optional `<script id="wavePortalConfig" type="application/json">`
/// block. Absent or malformed blocks fall back to the defaults.
pub fn load() -> WavePortalConfig {
    match dom::by_id(CONFIG_SCRIPT_ID).and_then(|el| el.text_content()) {
        Some(raw) => parse(&raw),
        None => WavePortalConfig::default(),
    }
}

fn parse(raw: &str) -> WavePortalConfig {
    if raw.trim().is_empty() {
        return WavePortalConfig::default();
    }
    match WavePortalConfig::from_json(raw) {
        Ok(config) => {
            info!(contract = %config.contract_address, "loaded page config");
            config
        }
        Err(err) => {
            warn!("ignoring malformed #{} block: {}", CONFIG_SCRIPT_ID, err);
            WavePortalConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_block_uses_defaults() {
        assert_eq!(parse("  \n  "), WavePortalConfig::default());
        assert_eq!(parse("{}"), WavePortalConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = parse(r#"{ "event_poll_interval_ms": 1000 }"#);
        assert_eq!(config.event_poll_interval_ms, 1_000);
        assert_eq!(config.gas_limit, WavePortalConfig::default().gas_limit);
    }

    #[test]
    fn malformed_block_falls_back() {
        assert_eq!(parse("{ not json"), WavePortalConfig::default());
    }
}
