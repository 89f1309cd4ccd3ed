//! Advertising payload assembly.
//!
//! Legacy advertising payloads are at most 31 bytes of concatenated TLV
//! elements: `[length][type][value…]`, where `length` counts the type byte
//! plus the value bytes. [`AdvPayload`] is a bounded builder over that
//! format; the two free functions assemble the concrete payloads the pump
//! broadcasts.

use heapless::Vec;

use crate::error::{Error, Result};
use crate::gatt::features::IDS_SERVICE_UUID16;

/// Legacy advertising PDU payload limit.
pub const MAX_ADV_PAYLOAD: usize = 31;

// AD types (Bluetooth Assigned Numbers, "Common Data Types").
pub const ADV_TYPE_FLAGS: u8 = 0x01;
pub const ADV_TYPE_UUID16_COMPLETE: u8 = 0x03;
pub const ADV_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
pub const ADV_TYPE_APPEARANCE: u8 = 0x19;

// Flag bits.
const LE_GENERAL_DISC_MODE: u8 = 0x02;
const BR_EDR_NOT_SUPPORTED: u8 = 0x04;

/// External appearance: Generic Insulin Pump.
pub const APPEARANCE_INSULIN_PUMP: u16 = 0x0D40;

/// Bounded TLV builder for one advertising payload.
#[derive(Debug, Default)]
pub struct AdvPayload {
    buf: Vec<u8, MAX_ADV_PAYLOAD>,
}

impl AdvPayload {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append one `[length][type][value]` element.
    ///
    /// Fails with [`Error::AdvPayloadOverflow`] if the element does not fit
    /// the remaining payload space; the payload is left unchanged.
    pub fn push(&mut self, ad_type: u8, value: &[u8]) -> Result<()> {
        if self.buf.len() + 2 + value.len() > MAX_ADV_PAYLOAD {
            return Err(Error::AdvPayloadOverflow);
        }
        // Length counts the type byte plus the value bytes.
        let overflow = self.buf.push((value.len() + 1) as u8).is_err()
            || self.buf.push(ad_type).is_err()
            || self.buf.extend_from_slice(value).is_err();
        debug_assert!(!overflow);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

/// The pump's advertising payload: discoverability flags, the Insulin
/// Delivery Service UUID, and the insulin-pump appearance.
pub fn advertising_payload() -> Result<AdvPayload> {
    let mut payload = AdvPayload::new();
    payload.push(
        ADV_TYPE_FLAGS,
        &[LE_GENERAL_DISC_MODE | BR_EDR_NOT_SUPPORTED],
    )?;
    payload.push(ADV_TYPE_UUID16_COMPLETE, &IDS_SERVICE_UUID16.to_le_bytes())?;
    payload.push(ADV_TYPE_APPEARANCE, &APPEARANCE_INSULIN_PUMP.to_le_bytes())?;
    Ok(payload)
}

/// The scan-response payload carrying the complete local name.
pub fn scan_response_payload(local_name: &str) -> Result<AdvPayload> {
    let mut payload = AdvPayload::new();
    payload.push(ADV_TYPE_COMPLETE_LOCAL_NAME, local_name.as_bytes())?;
    Ok(payload)
}
