//! GATT attribute model: UUIDs, access flags, characteristics, services.
//!
//! Characteristics are polymorphic over a read capability: one built with
//! [`Characteristic::with_builder`] can answer read requests through its
//! [`ResponseBuilder`]; one built with [`Characteristic::new`] cannot
//! (write-only or descriptor-backed attributes).

use core::fmt;

use crate::events::RadioEvent;

// ── UUIDs ─────────────────────────────────────────────────────

/// A 16-bit SIG-assigned or 128-bit vendor UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uuid {
    Uuid16(u16),
    Uuid128(u128),
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid16(v) => write!(f, "0x{v:04X}"),
            Self::Uuid128(v) => write!(
                f,
                "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
                (v >> 96) & 0xFFFF_FFFF,
                (v >> 80) & 0xFFFF,
                (v >> 64) & 0xFFFF,
                (v >> 48) & 0xFFFF,
                v & 0xFFFF_FFFF_FFFF
            ),
        }
    }
}

// ── Access flags ──────────────────────────────────────────────

/// Characteristic access-permission bitmask, in the radio stack's encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessFlags(u16);

impl AccessFlags {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(0x0002);
    pub const READ_ENCRYPTED: Self = Self(0x0200);
    pub const READ_AUTHENTICATED: Self = Self(0x0400);
    pub const READ_AUTHORIZED: Self = Self(0x0800);
    pub const WRITE: Self = Self(0x0008);
    pub const WRITE_ENCRYPTED: Self = Self(0x1000);
    pub const WRITE_AUTHENTICATED: Self = Self(0x2000);
    pub const WRITE_AUTHORIZED: Self = Self(0x4000);
    pub const WRITE_NO_RESPONSE: Self = Self(0x0004);
    pub const NOTIFY: Self = Self(0x0010);
    pub const INDICATE: Self = Self(0x0020);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for AccessFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for AccessFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ── Read capability ───────────────────────────────────────────

/// The "build a read response" capability.
///
/// `build_response` writes the raw payload into the start of the shared
/// response buffer and returns its length. The two hooks let wrappers
/// carry per-characteristic state: `after_response` runs once the response
/// has been handed to the radio, `on_radio_event` sees every radio event
/// the server receives.
pub trait ResponseBuilder {
    fn build_response(&mut self, buf: &mut [u8]) -> usize;

    fn after_response(&mut self) {}

    fn on_radio_event(&mut self, _event: &RadioEvent) {}
}

// ── Characteristic ────────────────────────────────────────────

/// Sentinel for a value handle the radio has not assigned yet.
pub const HANDLE_UNASSIGNED: u16 = 0;

/// One GATT characteristic: uuid, access flags, and the value handle the
/// radio assigns at registration time.
pub struct Characteristic {
    uuid: Uuid,
    flags: AccessFlags,
    value_handle: u16,
    builder: Option<Box<dyn ResponseBuilder>>,
}

impl Characteristic {
    /// A characteristic with no read capability.
    pub fn new(uuid: Uuid, flags: AccessFlags) -> Self {
        Self {
            uuid,
            flags,
            value_handle: HANDLE_UNASSIGNED,
            builder: None,
        }
    }

    /// A read-capable characteristic.
    pub fn with_builder(
        uuid: Uuid,
        flags: AccessFlags,
        builder: Box<dyn ResponseBuilder>,
    ) -> Self {
        Self {
            uuid,
            flags,
            value_handle: HANDLE_UNASSIGNED,
            builder: Some(builder),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn flags(&self) -> AccessFlags {
        self.flags
    }

    /// The resolved value handle, or [`HANDLE_UNASSIGNED`].
    pub fn value_handle(&self) -> u16 {
        self.value_handle
    }

    pub fn is_readable(&self) -> bool {
        self.builder.is_some()
    }

    /// Resolve the value handle. Called exactly once, at registration.
    pub(crate) fn assign_handle(&mut self, handle: u16) {
        debug_assert_eq!(self.value_handle, HANDLE_UNASSIGNED);
        self.value_handle = handle;
    }

    pub fn builder_mut(&mut self) -> Option<&mut (dyn ResponseBuilder + 'static)> {
        self.builder.as_deref_mut()
    }

    /// Forward a radio event to the builder, if any.
    pub(crate) fn observe(&mut self, event: &RadioEvent) {
        if let Some(builder) = self.builder.as_mut() {
            builder.on_radio_event(event);
        }
    }
}

impl fmt::Debug for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Characteristic")
            .field("uuid", &self.uuid)
            .field("flags", &self.flags)
            .field("value_handle", &self.value_handle)
            .field("readable", &self.builder.is_some())
            .finish()
    }
}

// ── Service ───────────────────────────────────────────────────

/// One GATT service: uuid plus an ordered characteristic list.
///
/// Order is load-bearing — handle resolution matches characteristics to
/// the radio's handle table positionally, so the list must never be
/// reordered after assembly.
#[derive(Debug)]
pub struct Service {
    uuid: Uuid,
    characteristics: Vec<Characteristic>,
}

impl Service {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            characteristics: Vec::new(),
        }
    }

    /// Append a characteristic. Position determines its slot in the
    /// registration description.
    pub fn add_characteristic(&mut self, characteristic: Characteristic) {
        self.characteristics.push(characteristic);
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn characteristics(&self) -> &[Characteristic] {
        &self.characteristics
    }

    pub(crate) fn characteristics_mut(&mut self) -> &mut [Characteristic] {
        &mut self.characteristics
    }
}
