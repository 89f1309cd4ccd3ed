//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter     | Implements  | Connects to                        |
//! |-------------|-------------|------------------------------------|
//! | `sim_radio` | `RadioPort` | in-memory radio (host demo, tests) |
//!
//! A production build adds a stack-backed adapter here (SoftDevice,
//! NimBLE); the core never knows the difference.

pub mod sim_radio;
