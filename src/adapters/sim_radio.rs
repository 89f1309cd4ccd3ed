//! Simulated radio adapter.
//!
//! Implements [`RadioPort`] entirely in memory: value handles are assigned
//! in a plausible (non-contiguous) GATT-table pattern, attribute writes are
//! retained for inspection, and advertising/passkey calls are logged. The
//! demo binary runs against this adapter; it also documents the shape a
//! stack-backed adapter must take.

use std::collections::HashMap;
use std::fmt::Write as _;

use log::{debug, info};

use crate::gatt::radio::{HandleTable, RadioError, RadioPort, ServiceDef};

/// In-memory radio stack stand-in.
pub struct SimRadio {
    /// Current value of every written attribute, by value handle.
    attributes: HashMap<u16, Vec<u8>>,
    advertising: bool,
    registered: bool,
}

impl SimRadio {
    pub fn new() -> Self {
        Self {
            attributes: HashMap::new(),
            advertising: false,
            registered: false,
        }
    }

    pub fn is_advertising(&self) -> bool {
        self.advertising
    }

    /// The last value written to `value_handle`, if any.
    pub fn attribute(&self, value_handle: u16) -> Option<&[u8]> {
        self.attributes.get(&value_handle).map(Vec::as_slice)
    }
}

impl Default for SimRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioPort for SimRadio {
    fn register_services(&mut self, services: &[ServiceDef]) -> Result<HandleTable, RadioError> {
        if self.registered {
            return Err(RadioError::RegistrationRejected);
        }
        self.registered = true;

        // A real table interleaves declaration and value attributes:
        // the service declaration takes one handle, then each
        // characteristic takes a declaration + value pair.
        let mut next_handle: u16 = 1;
        let table = services
            .iter()
            .map(|service| {
                next_handle += 1; // service declaration
                service
                    .characteristics
                    .iter()
                    .map(|(uuid, _flags)| {
                        next_handle += 1; // characteristic declaration
                        let value_handle = next_handle;
                        next_handle += 1; // value attribute
                        debug!("sim: {uuid} -> handle {value_handle}");
                        value_handle
                    })
                    .collect()
            })
            .collect();
        Ok(table)
    }

    fn write_attribute(&mut self, value_handle: u16, data: &[u8]) -> Result<(), RadioError> {
        info!(
            "sim: gatts_write(handle: {}, data: {})",
            value_handle,
            hex_str(data)
        );
        self.attributes.insert(value_handle, data.to_vec());
        Ok(())
    }

    fn start_advertising(
        &mut self,
        interval_us: u32,
        adv_data: Option<&[u8]>,
        scan_rsp: Option<&[u8]>,
    ) -> Result<(), RadioError> {
        self.advertising = true;
        match adv_data {
            Some(data) => info!(
                "sim: advertising every {}us, adv={}, scan_rsp={}",
                interval_us,
                hex_str(data),
                scan_rsp.map_or_else(|| "-".to_owned(), hex_str),
            ),
            None => info!("sim: advertising resumed every {interval_us}us"),
        }
        Ok(())
    }

    fn reply_passkey(&mut self, conn_handle: u16, passkey: u32) -> Result<(), RadioError> {
        info!("sim: passkey {passkey:06} supplied for connection {conn_handle}");
        Ok(())
    }
}

fn hex_str(data: &[u8]) -> String {
    let mut s = String::with_capacity(2 + data.len() * 6);
    s.push('[');
    for (i, b) in data.iter().enumerate() {
        if i > 0 {
            s.push_str(", ");
        }
        let _ = write!(s, "0x{b:02X}");
    }
    s.push(']');
    s
}
