//! PumpLink peripheral core.
//!
//! The GATT-server side of an insulin-delivery peripheral: service and
//! characteristic registration, the radio event fan-out, and the
//! end-to-end protection (rolling counter + CRC) applied to the IDD
//! Features characteristic. The radio stack sits behind the
//! [`gatt::radio::RadioPort`] trait so the whole core runs on the host.

#![deny(unused_must_use)]

pub mod config;
pub mod deferred;
pub mod e2e;
pub mod events;
pub mod gatt;
pub mod sfloat;

pub mod adapters;

mod error;

pub use error::{Error, RegistrationError, Result};
