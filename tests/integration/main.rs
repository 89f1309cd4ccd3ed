//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against the mock radio adapter.  All tests run on the host (x86_64)
//! with no real radio hardware required.

mod e2e_flow_tests;
mod mock_radio;
mod server_tests;
