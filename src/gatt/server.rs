//! GATT server orchestration.
//!
//! [`GattServer`] owns the service table, the connected peer's address, an
//! auxiliary subscriber list, the shared response buffer, and the
//! deferred-work queue. It is constructed once by the process entry point
//! and passed by reference wherever it is needed — there is no ambient
//! global instance.
//!
//! Event handling is synchronous and non-reentrant: `handle_event` runs
//! inside the radio callback and must stay short, so anything that issues
//! further radio calls (re-advertising, passkey completion) is deferred and
//! executed later by [`GattServer::run_deferred`].

use log::{debug, info, warn};

use crate::deferred::{DeferredQueue, DeferredTask};
use crate::error::{RegistrationError, Result};
use crate::events::{AddressKind, EventMux, Handler, PasskeyAction, PeerAddress, RadioEvent};
use crate::gatt::attrs::{Service, HANDLE_UNASSIGNED};
use crate::gatt::radio::{RadioPort, ServiceDef};

/// Size of the shared read-response buffer.
///
/// One buffer serves every read: the single-connection model serialises
/// reads, so per-connection buffers would buy nothing.
pub const RESPONSE_BUF_LEN: usize = 20;

/// The peripheral's GATT server.
pub struct GattServer {
    services: Vec<Service>,
    /// Last peer seen: set on connect, updated on disconnect to the
    /// disconnecting peer's address.
    peer: Option<(AddressKind, PeerAddress)>,
    registered: bool,
    passkey: u32,
    adv_interval_us: u32,
    rsp_buf: [u8; RESPONSE_BUF_LEN],
    deferred: DeferredQueue,
    subscribers: EventMux<()>,
}

impl GattServer {
    pub fn new(passkey: u32, adv_interval_us: u32) -> Self {
        Self {
            services: Vec::new(),
            peer: None,
            registered: false,
            passkey,
            adv_interval_us,
            rsp_buf: [0; RESPONSE_BUF_LEN],
            deferred: DeferredQueue::new(),
            subscribers: EventMux::new(),
        }
    }

    /// Append a service. Position determines its slot in the registration
    /// description; services are never removed.
    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Address of the current (or most recently seen) peer.
    pub fn peer(&self) -> Option<(AddressKind, PeerAddress)> {
        self.peer
    }

    /// Number of deferred tasks awaiting [`run_deferred`](Self::run_deferred).
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Subscribe an auxiliary observer to the radio event stream. Observers
    /// run before the server's own handling, in registration order.
    pub fn subscribe(&mut self, handler: Handler<()>) {
        self.subscribers.register(handler);
    }

    // ── Registration ──────────────────────────────────────────

    /// Flatten the service table into a registration description, submit it
    /// once, and resolve each characteristic's value handle from the
    /// returned table.
    ///
    /// Any shape mismatch between the submitted description and the
    /// returned handle table is a fatal configuration defect: no handle is
    /// assigned and the server must not be started.
    pub fn register(&mut self, radio: &mut impl RadioPort) -> Result<()> {
        if self.registered {
            return Err(RegistrationError::AlreadyRegistered.into());
        }

        let defs: Vec<ServiceDef> = self
            .services
            .iter()
            .map(|s| ServiceDef {
                uuid: s.uuid(),
                characteristics: s
                    .characteristics()
                    .iter()
                    .map(|c| (c.uuid(), c.flags()))
                    .collect(),
            })
            .collect();

        let handles = radio.register_services(&defs)?;

        // Validate the full shape before assigning anything, so a mismatch
        // can never leave the table partially resolved.
        if handles.len() != self.services.len() {
            return Err(RegistrationError::ServiceCountMismatch {
                submitted: self.services.len(),
                returned: handles.len(),
            }
            .into());
        }
        for (i, (service, row)) in self.services.iter().zip(&handles).enumerate() {
            if row.len() != service.characteristics().len() {
                return Err(RegistrationError::CharacteristicCountMismatch {
                    service_index: i,
                    submitted: service.characteristics().len(),
                    returned: row.len(),
                }
                .into());
            }
        }

        for (service, row) in self.services.iter_mut().zip(&handles) {
            for (characteristic, &handle) in
                service.characteristics_mut().iter_mut().zip(row)
            {
                characteristic.assign_handle(handle);
                debug!(
                    "resolved {} -> value handle {}",
                    characteristic.uuid(),
                    handle
                );
            }
        }

        self.registered = true;
        info!("Registered {} service(s)", self.services.len());
        Ok(())
    }

    // ── Event handling ────────────────────────────────────────

    /// Handle one radio event. Runs inside the radio callback: auxiliary
    /// subscribers first, then every characteristic observes the event,
    /// then the server's own state machine.
    pub fn handle_event(
        &mut self,
        event: &RadioEvent,
        radio: &mut impl RadioPort,
    ) -> Result<()> {
        // Auxiliary subscribers have no radio access; their results are
        // meaningful only to the stack callback, not here.
        let _ = self.subscribers.dispatch(event);

        // Each characteristic observes the same event independently
        // (E2E counters reset themselves on disconnect).
        for service in &mut self.services {
            for characteristic in service.characteristics_mut() {
                characteristic.observe(event);
            }
        }

        match *event {
            RadioEvent::Connected {
                addr_kind, addr, ..
            } => {
                self.peer = Some((addr_kind, addr));
                info!("Connected to {addr} ({addr_kind})");
            }

            RadioEvent::Disconnected {
                addr_kind, addr, ..
            } => {
                self.peer = Some((addr_kind, addr));
                info!("Disconnected from {addr} ({addr_kind})");
                self.deferred.schedule(DeferredTask::Readvertise {
                    interval_us: self.adv_interval_us,
                });
            }

            RadioEvent::ReadRequested { value_handle, .. } => {
                self.dispatch_read(value_handle, radio)?;
            }

            RadioEvent::PasskeyAction {
                conn_handle,
                action,
                ..
            } => {
                if action == PasskeyAction::Display {
                    self.deferred
                        .schedule(DeferredTask::SubmitPasskey { conn_handle });
                }
            }
        }

        Ok(())
    }

    /// Linear-scan the characteristics for `value_handle` and answer the
    /// read. An unknown handle is silently ignored — the stack serves
    /// whatever value the attribute already holds.
    fn dispatch_read(&mut self, value_handle: u16, radio: &mut impl RadioPort) -> Result<()> {
        if value_handle == HANDLE_UNASSIGNED {
            return Ok(());
        }
        for service in &mut self.services {
            for characteristic in service.characteristics_mut() {
                if characteristic.value_handle() != value_handle {
                    continue;
                }
                let Some(builder) = characteristic.builder_mut() else {
                    continue;
                };
                let len = builder.build_response(&mut self.rsp_buf);
                radio.write_attribute(value_handle, &self.rsp_buf[..len])?;
                builder.after_response();
                return Ok(());
            }
        }
        debug!("read on unknown value handle {value_handle}, ignoring");
        Ok(())
    }

    // ── Deferred work ─────────────────────────────────────────

    /// Drain the deferred-work queue, oldest first. Must be called from
    /// the cooperative runner, strictly outside the event callback.
    pub fn run_deferred(&mut self, radio: &mut impl RadioPort) {
        let passkey = self.passkey;
        self.deferred.drain(|task| match task {
            DeferredTask::Readvertise { interval_us } => {
                if let Err(e) = radio.start_advertising(interval_us, None, None) {
                    warn!("deferred re-advertise failed: {e}");
                }
            }
            DeferredTask::SubmitPasskey { conn_handle } => {
                info!("Submitting passkey for connection {conn_handle}");
                if let Err(e) = radio.reply_passkey(conn_handle, passkey) {
                    warn!("deferred passkey reply failed: {e}");
                }
            }
        });
    }
}
