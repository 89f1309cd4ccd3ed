//! The IDD Features characteristic and its E2E read pipeline.
//!
//! Wire layout of the 8-byte features payload:
//!
//! ```text
//! ┌───────────┬─────────┬──────────────┬────────────────┐
//! │ CRC16 (2B)│ counter │ SFLOAT conc. │ feature flags  │
//! │ LE        │ (1B)    │ (2B, LE)     │ (3B, LE)       │
//! └───────────┴─────────┴──────────────┴────────────────┘
//! ```
//!
//! [`IddFeatures`] builds the raw payload with placeholder framing bytes;
//! [`E2eProtected`] decorates any [`ResponseBuilder`] with the counter and
//! CRC stamping, so E2E protection composes onto future characteristics
//! without touching their payload logic.

use crate::config::PumpConfig;
use crate::e2e::{Crc16, TxCounter};
use crate::events::RadioEvent;
use crate::gatt::attrs::{AccessFlags, Characteristic, ResponseBuilder, Service, Uuid};
use crate::sfloat;

/// Insulin Delivery Service (SIG-assigned).
pub const IDS_SERVICE_UUID16: u16 = 0x183A;
pub const IDS_SERVICE_UUID: Uuid = Uuid::Uuid16(IDS_SERVICE_UUID16);

/// IDD Features characteristic (SIG-assigned).
pub const IDD_FEATURES_UUID: Uuid = Uuid::Uuid16(0x2B23);

/// Total payload length.
pub const FEATURES_PAYLOAD_LEN: usize = 8;

/// Offset of the 2-byte E2E CRC within the payload.
pub const E2E_CRC_OFFSET: usize = 0;

/// Offset of the rolling-counter byte within the payload.
pub const E2E_COUNTER_OFFSET: usize = 2;

// ── Plain payload builder ─────────────────────────────────────

/// Builds the raw IDD Features payload (no E2E protection applied).
pub struct IddFeatures {
    insulin_concentration: f32,
    feature_flags: u32,
}

impl IddFeatures {
    pub fn new(config: &PumpConfig) -> Self {
        Self {
            insulin_concentration: config.insulin_concentration,
            feature_flags: config.feature_flags,
        }
    }
}

impl ResponseBuilder for IddFeatures {
    fn build_response(&mut self, buf: &mut [u8]) -> usize {
        buf[0] = 0xFF; // E2E-CRC placeholder, low byte
        buf[1] = 0xFF; // E2E-CRC placeholder, high byte
        buf[2] = 0x00; // E2E-Counter placeholder

        let conc = sfloat::encode(f64::from(self.insulin_concentration));
        buf[3..5].copy_from_slice(&conc.to_le_bytes());

        let flags = self.feature_flags.to_le_bytes();
        buf[5..8].copy_from_slice(&flags[..3]);

        FEATURES_PAYLOAD_LEN
    }
}

// ── E2E decorator ─────────────────────────────────────────────

/// Wraps any response builder with E2E integrity framing.
///
/// On each build: stamp the current Tx counter into the payload's counter
/// byte, then CRC everything outside the CRC window. The counter advances
/// only after the response is handed off, and falls back to 1 when the
/// central disconnects.
pub struct E2eProtected<B> {
    inner: B,
    tx_counter: TxCounter,
}

impl<B: ResponseBuilder> E2eProtected<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            tx_counter: TxCounter::new(),
        }
    }

    pub fn counter_value(&self) -> u8 {
        self.tx_counter.value()
    }
}

impl<B: ResponseBuilder> ResponseBuilder for E2eProtected<B> {
    fn build_response(&mut self, buf: &mut [u8]) -> usize {
        let len = self.inner.build_response(buf);
        buf[E2E_COUNTER_OFFSET] = self.tx_counter.value();
        Crc16::fill(buf, E2E_CRC_OFFSET, len);
        len
    }

    fn after_response(&mut self) {
        self.inner.after_response();
        self.tx_counter.increment();
    }

    fn on_radio_event(&mut self, event: &RadioEvent) {
        self.inner.on_radio_event(event);
        if matches!(event, RadioEvent::Disconnected { .. }) {
            self.tx_counter.reset();
        }
    }
}

// ── Service assembly ──────────────────────────────────────────

/// The features characteristic, E2E-wrapped when the config's feature
/// flags say the device supports E2E protection.
pub fn features_characteristic(config: &PumpConfig) -> Characteristic {
    let base = IddFeatures::new(config);
    let builder: Box<dyn ResponseBuilder> = if config.is_e2e_protection_supported() {
        Box::new(E2eProtected::new(base))
    } else {
        Box::new(base)
    };
    Characteristic::with_builder(IDD_FEATURES_UUID, AccessFlags::READ, builder)
}

/// Assemble the Insulin Delivery Service.
pub fn ids_service(config: &PumpConfig) -> Service {
    let mut service = Service::new(IDS_SERVICE_UUID);
    service.add_characteristic(features_characteristic(config));
    service
}
