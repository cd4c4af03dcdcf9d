// Licensed under the Apache-2.0 license

use core::mem::size_of;
use zerocopy::byteorder::{BigEndian, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Format version stamped on state snapshots and backup blobs.
pub const SNAPSHOT_FORMAT_VERSION: u8 = 0x01;

/// Number of locks in the fixed registry: carrier, device, boot, owner.
pub const NUM_LOCKS: usize = 4;

/// Capacity of the lock portion of the persisted region.
pub const LOCK_STORAGE_CAPACITY: usize = 4096;

/// Anti-rollback slot geometry.
pub const VERSION_SLOT_COUNT: usize = 8;
pub const VERSION_SLOT_BYTES: usize = 8;

/// Largest persisted region a snapshot can carry: the version-slot region
/// followed by the lock region.
pub const MAX_REGION_SIZE: usize = VERSION_SLOT_COUNT * VERSION_SLOT_BYTES + LOCK_STORAGE_CAPACITY;

/// Fixed prefix shared by the GET_STATE body (after its status word) and the
/// backup blob. Every multi-byte field is big-endian; the struct has no
/// padding so it can be laid over the wire bytes directly.
///
/// `body_len` counts every byte that follows the `body_len` field, i.e. the
/// three flag/count bytes, the lock state codes, the region length field and
/// the region itself.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format_version: u8,
    pub body_len: U16<BigEndian>,
    pub in_bootloader: u8,
    pub production: u8,
    pub num_locks: u8,
    pub lock_state: [U16<BigEndian>; NUM_LOCKS],
    pub region_len: U16<BigEndian>,
}

impl SnapshotHeader {
    /// Body length for a snapshot carrying `region_len` region bytes.
    pub fn body_len_for_region(region_len: u16) -> u16 {
        // in_bootloader + production + num_locks + lock codes + region_len
        // field + the region.
        (3 + 2 * NUM_LOCKS + 2) as u16 + region_len
    }

    /// Total snapshot size (header plus region) for `region_len` region bytes.
    pub fn snapshot_len(region_len: u16) -> usize {
        size_of::<Self>() + usize::from(region_len)
    }
}
