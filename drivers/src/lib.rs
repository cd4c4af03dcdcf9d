/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the BootVault driver library: the persisted
    arena, global state and capabilities, the lock registry, version
    storage, and the backup coordinator.

--*/
#![cfg_attr(not(test), no_std)]

mod access;
mod arena;
mod backup;
mod global_state;
mod lock;
mod verify;
mod version_storage;

pub use access::{AccessTable, CallerId, Capability, OwnerToken, Role, TrackerToken};
pub use arena::{ArenaLayout, PersistedRegion, Range, ARENA_CAPACITY};
pub use backup::{BackupCoordinator, BackupTag};
pub use global_state::GlobalState;
pub use lock::{
    BasicLock, CarrierLock, LockError, LockId, LockPolicy, LockRegistry, LockSet, LOCK_CLEAR,
    OWNER_LOCK_METADATA_SIZE,
};
pub use verify::SignatureVerifier;
pub use version_storage::{VersionError, VersionStorage};
