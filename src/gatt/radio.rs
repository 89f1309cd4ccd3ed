//! Radio port — the boundary between the GATT core and the radio stack.
//!
//! The driven side of the hexagon: a concrete adapter (SoftDevice, NimBLE,
//! or the host simulator in `adapters::sim_radio`) implements this trait,
//! and the server consumes it via generics so the core never touches the
//! stack directly.

use core::fmt;

use super::attrs::{AccessFlags, Uuid};

// ───────────────────────────────────────────────────────────────
// Registration description
// ───────────────────────────────────────────────────────────────

/// One service in the registration description submitted to the radio:
/// the service UUID plus its characteristics in declaration order.
#[derive(Debug, Clone)]
pub struct ServiceDef {
    pub uuid: Uuid,
    pub characteristics: Vec<(Uuid, AccessFlags)>,
}

/// Value handles returned by the radio, one row per submitted service,
/// one handle per characteristic, in the submitted order.
pub type HandleTable = Vec<Vec<u16>>;

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

/// Operations the radio collaborator provides.
///
/// Calls are only legal outside the event callback, except
/// `write_attribute`, which answers a read request in-line.
pub trait RadioPort {
    /// Submit the full GATT table once; the returned handle table mirrors
    /// the submitted shape.
    fn register_services(&mut self, services: &[ServiceDef]) -> Result<HandleTable, RadioError>;

    /// Store `data` as the current value of `value_handle`.
    fn write_attribute(&mut self, value_handle: u16, data: &[u8]) -> Result<(), RadioError>;

    /// Start (or resume) advertising. `None` payloads reuse the payloads
    /// from the previous call.
    fn start_advertising(
        &mut self,
        interval_us: u32,
        adv_data: Option<&[u8]>,
        scan_rsp: Option<&[u8]>,
    ) -> Result<(), RadioError>;

    /// Complete a passkey-display exchange for `conn_handle`.
    fn reply_passkey(&mut self, conn_handle: u16, passkey: u32) -> Result<(), RadioError>;
}

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

/// Errors from [`RadioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// The stack rejected the GATT table (out of attribute memory, bad UUID).
    RegistrationRejected,
    /// The attribute write failed (unknown handle, value too long).
    WriteFailed,
    /// Advertising could not be started.
    AdvertiseFailed,
    /// The passkey reply was rejected (no pairing in progress).
    PasskeyRejected,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistrationRejected => write!(f, "GATT table rejected by stack"),
            Self::WriteFailed => write!(f, "attribute write failed"),
            Self::AdvertiseFailed => write!(f, "advertising start failed"),
            Self::PasskeyRejected => write!(f, "passkey reply rejected"),
        }
    }
}

impl core::error::Error for RadioError {}
