//! GATT server core — attribute model, registration, read pipeline.
//!
//! The server is pure logic: every radio interaction goes through the
//! [`radio::RadioPort`] trait, so the whole module runs against a
//! simulated radio on the host.

pub mod adv;
pub mod attrs;
pub mod features;
pub mod radio;
pub mod server;
