/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains the lock state machine: shared types, the basic and
    carrier variants, and the registry that owns the dependency checks.

--*/

mod basic;
mod carrier;
mod registry;

pub use basic::BasicLock;
pub use carrier::CarrierLock;
pub use registry::LockRegistry;

use bootvault_error::BootvaultError;

/// Lock state byte meaning "clear"; any other value is a locked or
/// variant-specific status.
pub const LOCK_CLEAR: u8 = 0;

/// Metadata allowance reserved for the owner lock: an alternate boot key
/// plus any serialized auxiliary data.
pub const OWNER_LOCK_METADATA_SIZE: u16 = 2048;

/// The fixed registry order. Discriminants are the wire lock ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockId {
    Carrier = 0,
    Device = 1,
    Boot = 2,
    Owner = 3,
}

impl LockId {
    pub const COUNT: usize = 4;

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Carrier),
            1 => Some(Self::Device),
            2 => Some(Self::Boot),
            3 => Some(Self::Owner),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Context and payload constraints attached to a lock at construction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LockPolicy: u8 {
        /// Toggling requires the HLOS execution context.
        const REQUIRE_HLOS = 0b0001;
        /// Toggling requires the bootloader execution context.
        const REQUIRE_BOOTLOADER = 0b0010;
        /// Locking requires an accompanying metadata payload.
        const REQUIRE_METADATA = 0b0100;
    }
}

/// Immutable set of locks that must be clear before another lock may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSet(u8);

impl LockSet {
    pub const EMPTY: Self = Self(0);

    pub const fn of(ids: &[LockId]) -> Self {
        let mut mask = 0u8;
        let mut i = 0;
        while i < ids.len() {
            mask |= 1 << ids[i] as u8;
            i += 1;
        }
        Self(mask)
    }

    pub fn contains(&self, id: LockId) -> bool {
        self.0 & (1 << id as u8) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Why a lock operation was refused. The dispatcher maps these onto wire
/// status codes; `Internal` aborts the request instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// Lock id out of range.
    Range,
    /// A required lock is not clear.
    Dependency,
    /// Execution context or production policy forbids the change.
    Context,
    /// Metadata payload missing, malformed, or oversized.
    Metadata,
    /// Unlock proof rejected: stale nonce or failed signature check.
    Auth,
    /// Arena fault; fatal for the request.
    Internal(BootvaultError),
}
