//! Unified error types for the PumpLink core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! entry point's error handling uniform. All variants are `Copy` so they
//! pass through the event path without allocation.

use core::fmt;

use crate::gatt::radio::RadioError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Service registration against the radio stack failed.
    Registration(RegistrationError),
    /// The radio collaborator reported a failure.
    Radio(RadioError),
    /// Configuration is invalid.
    Config(&'static str),
    /// An advertising element would not fit the 31-byte payload.
    AdvPayloadOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registration(e) => write!(f, "registration: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::AdvPayloadOverflow => write!(f, "advertising payload overflow"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Registration errors
// ---------------------------------------------------------------------------

/// Shape defects detected while resolving value handles.
///
/// These are configuration defects, not runtime conditions: the server must
/// abort startup rather than run with partially assigned handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// `register` was called after handles were already assigned.
    AlreadyRegistered,
    /// The radio returned a handle table with a different service count
    /// than was submitted.
    ServiceCountMismatch { submitted: usize, returned: usize },
    /// One service's handle row disagrees with its characteristic count.
    CharacteristicCountMismatch {
        service_index: usize,
        submitted: usize,
        returned: usize,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered => write!(f, "services already registered"),
            Self::ServiceCountMismatch { submitted, returned } => write!(
                f,
                "service count mismatch (submitted {submitted}, returned {returned})"
            ),
            Self::CharacteristicCountMismatch {
                service_index,
                submitted,
                returned,
            } => write!(
                f,
                "characteristic count mismatch in service {service_index} \
                 (submitted {submitted}, returned {returned})"
            ),
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(e: RegistrationError) -> Self {
        Self::Registration(e)
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
