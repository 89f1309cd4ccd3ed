//! End-to-end protection primitives.
//!
//! Medical-profile E2E protection layers a rolling anti-replay counter and a
//! CRC16 over a characteristic payload so a central can detect corruption or
//! replay independent of the link layer. This module holds the two
//! primitives; the composition into a protected read pipeline lives in
//! [`crate::gatt::features`].

pub mod counter;
pub mod crc;

pub use counter::{RxCounter, TxCounter};
pub use crc::Crc16;
