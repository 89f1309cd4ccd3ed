//! Mock radio adapter for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history, and lets a test script the handle table (or a failure) the
//! stack returns at registration.

use pumplink::gatt::radio::{HandleTable, RadioError, RadioPort, ServiceDef};

// ── Radio call record ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RadioCall {
    RegisterServices { shape: Vec<usize> },
    WriteAttribute { value_handle: u16, data: Vec<u8> },
    StartAdvertising { interval_us: u32, with_payloads: bool },
    ReplyPasskey { conn_handle: u16, passkey: u32 },
}

// ── MockRadio ─────────────────────────────────────────────────

pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    /// Handle table to return from the next registration; `None`
    /// derives one that mirrors the submitted shape.
    pub scripted_handles: Option<HandleTable>,
    pub fail_registration: bool,
    pub fail_advertising: bool,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            scripted_handles: None,
            fail_registration: false,
            fail_advertising: false,
        }
    }

    pub fn last_call(&self) -> Option<&RadioCall> {
        self.calls.last()
    }

    /// The data of the most recent attribute write to `value_handle`.
    pub fn last_write(&self, value_handle: u16) -> Option<&[u8]> {
        self.calls.iter().rev().find_map(|c| match c {
            RadioCall::WriteAttribute {
                value_handle: h,
                data,
            } if *h == value_handle => Some(data.as_slice()),
            _ => None,
        })
    }

    pub fn write_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::WriteAttribute { .. }))
            .count()
    }

    pub fn advertise_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RadioCall::StartAdvertising { .. }))
            .count()
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioPort for MockRadio {
    fn register_services(&mut self, services: &[ServiceDef]) -> Result<HandleTable, RadioError> {
        self.calls.push(RadioCall::RegisterServices {
            shape: services.iter().map(|s| s.characteristics.len()).collect(),
        });
        if self.fail_registration {
            return Err(RadioError::RegistrationRejected);
        }
        if let Some(table) = self.scripted_handles.take() {
            return Ok(table);
        }
        let mut next = 3u16;
        Ok(services
            .iter()
            .map(|s| {
                s.characteristics
                    .iter()
                    .map(|_| {
                        let h = next;
                        next += 2;
                        h
                    })
                    .collect()
            })
            .collect())
    }

    fn write_attribute(&mut self, value_handle: u16, data: &[u8]) -> Result<(), RadioError> {
        self.calls.push(RadioCall::WriteAttribute {
            value_handle,
            data: data.to_vec(),
        });
        Ok(())
    }

    fn start_advertising(
        &mut self,
        interval_us: u32,
        adv_data: Option<&[u8]>,
        _scan_rsp: Option<&[u8]>,
    ) -> Result<(), RadioError> {
        self.calls.push(RadioCall::StartAdvertising {
            interval_us,
            with_payloads: adv_data.is_some(),
        });
        if self.fail_advertising {
            return Err(RadioError::AdvertiseFailed);
        }
        Ok(())
    }

    fn reply_passkey(&mut self, conn_handle: u16, passkey: u32) -> Result<(), RadioError> {
        self.calls.push(RadioCall::ReplyPasskey {
            conn_handle,
            passkey,
        });
        Ok(())
    }
}
