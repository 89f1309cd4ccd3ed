//! Radio events and the event multiplexer.
//!
//! The radio stack exposes a single callback slot for every interrupt it
//! raises. [`EventMux`] fans that one stream out to an ordered list of
//! independently registered handlers, so connection tracking, characteristic
//! dispatch, and the pairing flow stay separate concerns:
//!
//! ```text
//! ┌───────────┐     ┌───────────────┐     handler 0 (connection log)
//! │ radio ISR │────▶│   EventMux    │────▶ handler 1 (GATT server)
//! └───────────┘     │ (ordered list)│     handler n (…)
//!                   └───────────────┘
//! ```
//!
//! Handlers run synchronously, in registration order, inside the event
//! callback. They must not block; anything heavier is pushed onto the
//! [`DeferredQueue`](crate::deferred::DeferredQueue) instead.

use core::fmt;

// ── Event payload types ───────────────────────────────────────

/// 48-bit peer device address, in radio byte order (least-significant
/// octet first, as delivered by the stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAddress(pub [u8; 6]);

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Conventional display order is most-significant octet first.
        for (i, b) in self.0.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

/// Address kind reported alongside a peer address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressKind {
    Public = 0,
    Random = 1,
}

impl AddressKind {
    pub fn from_raw(raw: u8) -> Self {
        if raw == 0 { Self::Public } else { Self::Random }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Pairing action requested by the stack during a passkey exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PasskeyAction {
    None = 0,
    Input = 2,
    Display = 3,
    NumericComparison = 4,
}

// ── The radio event union ─────────────────────────────────────

/// One hardware radio event, produced once per interrupt and delivered
/// unchanged to every subscribed handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioEvent {
    /// A central connected.
    Connected {
        conn_handle: u16,
        addr_kind: AddressKind,
        addr: PeerAddress,
    },
    /// The central disconnected.
    Disconnected {
        conn_handle: u16,
        addr_kind: AddressKind,
        addr: PeerAddress,
    },
    /// The central issued a read on a characteristic value attribute.
    ReadRequested { conn_handle: u16, value_handle: u16 },
    /// The pairing state machine needs a passkey action.
    PasskeyAction {
        conn_handle: u16,
        action: PasskeyAction,
        passkey: u32,
    },
}

// ── Multiplexer ───────────────────────────────────────────────

/// A registered event handler. Returning `None` means "no opinion";
/// a `Some` result is surfaced to the radio stack as the callback's
/// return value.
pub type Handler<R> = Box<dyn FnMut(&RadioEvent) -> Option<R>>;

/// Ordered fan-out of one radio event stream to many handlers.
///
/// There is no de-duplication and no removal: subscriptions are made once
/// during assembly and live as long as the mux.
pub struct EventMux<R> {
    handlers: Vec<Handler<R>>,
}

impl<R> EventMux<R> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler to the end of the dispatch order.
    pub fn register(&mut self, handler: Handler<R>) {
        self.handlers.push(handler);
    }

    /// Deliver `event` to every handler in registration order.
    ///
    /// Returns the last non-`None` handler result; handlers returning
    /// `None` never overwrite an earlier `Some`.
    pub fn dispatch(&mut self, event: &RadioEvent) -> Option<R> {
        let mut result = None;
        for handler in &mut self.handlers {
            if let Some(r) = handler(event) {
                result = Some(r);
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<R> Default for EventMux<R> {
    fn default() -> Self {
        Self::new()
    }
}
