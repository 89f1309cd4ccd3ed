//! System configuration parameters
//!
//! All tunable parameters for the PumpLink peripheral. Values can be
//! overridden by a JSON config file placed next to the binary.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

// --- IDD feature-flag bits (24-bit bitmask, wire bytes 5..8) ---

/// E2E protection is applied to the features characteristic.
pub const FEATURE_E2E_PROTECTION: u32 = 0x0000_0001;
pub const FEATURE_BASAL_RATE: u32 = 0x0000_0002;
pub const FEATURE_TBR_ABSOLUTE: u32 = 0x0000_0004;
pub const FEATURE_TBR_RELATIVE: u32 = 0x0000_0008;
pub const FEATURE_TBR_TEMPLATE: u32 = 0x0000_0010;
pub const FEATURE_FAST_BOLUS: u32 = 0x0000_0020;
pub const FEATURE_EXTENDED_BOLUS: u32 = 0x0000_0040;
pub const FEATURE_MULTIWAVE_BOLUS: u32 = 0x0000_0080;
pub const FEATURE_BOLUS_DELAY_TIME: u32 = 0x0000_0100;

/// Longest local name that still fits one scan-response TLV element
/// (31-byte payload minus the 2-byte element header).
const MAX_LOCAL_NAME_LEN: usize = 29;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PumpConfig {
    // --- Advertising ---
    /// Local name broadcast in the scan response.
    pub local_name: String,
    /// Advertising interval in microseconds.
    pub adv_interval_us: u32,

    // --- Pairing ---
    /// 6-digit passkey shown on the pump's display.
    pub passkey: u32,

    // --- IDD Features characteristic ---
    /// Insulin concentration (IU/mL), SFLOAT-encoded into the payload.
    pub insulin_concentration: f32,
    /// 24-bit feature-flag bitmask (FEATURE_* constants).
    pub feature_flags: u32,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            local_name: "IDS Pump".to_owned(),
            adv_interval_us: 250_000,
            passkey: 123_456,

            insulin_concentration: 100.0,
            feature_flags: FEATURE_E2E_PROTECTION
                | FEATURE_FAST_BOLUS
                | FEATURE_EXTENDED_BOLUS
                | FEATURE_MULTIWAVE_BOLUS
                | FEATURE_BOLUS_DELAY_TIME,
        }
    }
}

impl PumpConfig {
    /// Whether reads of the features characteristic carry E2E protection.
    pub fn is_e2e_protection_supported(&self) -> bool {
        self.feature_flags & FEATURE_E2E_PROTECTION != 0
    }

    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Error;

        if self.local_name.is_empty() || self.local_name.len() > MAX_LOCAL_NAME_LEN {
            return Err(Error::Config("local_name must be 1-29 bytes"));
        }
        if self.adv_interval_us < 20_000 {
            return Err(Error::Config("adv_interval_us below 20ms minimum"));
        }
        if self.passkey > 999_999 {
            return Err(Error::Config("passkey must be at most 6 digits"));
        }
        if !self.insulin_concentration.is_finite() || self.insulin_concentration <= 0.0 {
            return Err(Error::Config("insulin_concentration must be positive"));
        }
        if self.feature_flags > 0x00FF_FFFF {
            return Err(Error::Config("feature_flags exceeds 24 bits"));
        }
        Ok(())
    }
}

/// Load configuration from `path`, falling back to defaults if the file is
/// missing or unreadable (first boot, corrupted card).
pub fn load_or_default(path: &Path) -> PumpConfig {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(cfg) => {
                info!("Config loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Config parse failed ({e}), using defaults");
                PumpConfig::default()
            }
        },
        Err(_) => {
            info!("No configuration file at {}, using defaults", path.display());
            PumpConfig::default()
        }
    }
}
