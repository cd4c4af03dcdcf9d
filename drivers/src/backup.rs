/*++

Licensed under the Apache-2.0 license.

File Name:

    backup.rs

Abstract:

    File contains the backup coordinator: the ordered tracked-component
    walk, the snapshot encoder, and validated atomic restore.

--*/

use bootvault_api::{SnapshotHeader, NUM_LOCKS, SNAPSHOT_FORMAT_VERSION};
use bootvault_error::{BootvaultError, BootvaultResult};
use zerocopy::{FromBytes, IntoBytes};

use crate::access::TrackerToken;
use crate::arena::{PersistedRegion, Range};
use crate::global_state::GlobalState;
use crate::lock::LockId;

/// Tags the serializable components in their fixed registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupTag {
    VersionStorage,
    LockCarrier,
    LockDevice,
    LockBoot,
    LockOwner,
}

impl BackupTag {
    /// Wire index of the lock this tag covers, if it covers one.
    fn lock_index(&self) -> Option<usize> {
        match self {
            BackupTag::VersionStorage => None,
            BackupTag::LockCarrier => Some(LockId::Carrier as usize),
            BackupTag::LockDevice => Some(LockId::Device as usize),
            BackupTag::LockBoot => Some(LockId::Boot as usize),
            BackupTag::LockOwner => Some(LockId::Owner as usize),
        }
    }
}

const MAX_TRACKED: usize = 8;

/// Serializes and restores all trackable state. Components register once,
/// in construction order; because that order equals the arena layout order,
/// the walk is a read-and-frame pass over state the mutating operations
/// already persisted — backup has no write path of its own.
pub struct BackupCoordinator {
    tracked: [Option<(BackupTag, Range)>; MAX_TRACKED],
    count: usize,
}

impl Default for BackupCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl BackupCoordinator {
    pub fn new() -> Self {
        Self {
            tracked: [None; MAX_TRACKED],
            count: 0,
        }
    }

    /// Registers a component's range under its tag. Order is permanent.
    pub fn track(&mut self, tag: BackupTag, range: Range) -> BootvaultResult<()> {
        if self.count == MAX_TRACKED {
            return Err(BootvaultError::BACKUP_TRACK_TABLE_FULL);
        }
        self.tracked[self.count] = Some((tag, range));
        self.count += 1;
        Ok(())
    }

    fn walk(&self) -> impl Iterator<Item = (BackupTag, Range)> + '_ {
        self.tracked[..self.count].iter().filter_map(|slot| *slot)
    }

    /// Total bytes the tracked walk covers.
    pub fn region_len(&self) -> u16 {
        self.walk().map(|(_, range)| range.len).sum()
    }

    /// Encodes the full state snapshot into `out` and returns its length.
    /// The same bytes serve as the GET_STATE body (after its status word)
    /// and as the backup blob.
    pub fn snapshot(
        &self,
        region: &PersistedRegion,
        global: &GlobalState,
        lock_codes: [u16; NUM_LOCKS],
        out: &mut [u8],
    ) -> BootvaultResult<usize> {
        let region_len = self.region_len();
        let total = SnapshotHeader::snapshot_len(region_len);
        if out.len() < total {
            return Err(BootvaultError::BACKUP_SNAPSHOT_BUFFER_TOO_SMALL);
        }
        let header = SnapshotHeader {
            format_version: SNAPSHOT_FORMAT_VERSION,
            body_len: SnapshotHeader::body_len_for_region(region_len).into(),
            in_bootloader: global.in_bootloader() as u8,
            production: global.production() as u8,
            num_locks: NUM_LOCKS as u8,
            lock_state: lock_codes.map(Into::into),
            region_len: region_len.into(),
        };
        let header_len = core::mem::size_of::<SnapshotHeader>();
        out[..header_len].copy_from_slice(header.as_bytes());
        let mut cursor = header_len;
        for (_, range) in self.walk() {
            let bytes = region.read(range)?;
            out[cursor..cursor + bytes.len()].copy_from_slice(bytes);
            cursor += bytes.len();
        }
        Ok(total)
    }

    /// Token-gated snapshot for the hosting runtime's upgrade path.
    pub fn backup(
        &self,
        _token: &TrackerToken,
        region: &PersistedRegion,
        global: &GlobalState,
        lock_codes: [u16; NUM_LOCKS],
        out: &mut [u8],
    ) -> BootvaultResult<usize> {
        self.snapshot(region, global, lock_codes, out)
    }

    /// Validates `blob` and writes its region back through one staged
    /// transaction. Returns false (active bank untouched) on any mismatch:
    /// format version, declared lengths, lock count, or a lock state code
    /// that contradicts the state byte inside the carried region. The two
    /// global flags in the blob are snapshot metadata and are not applied.
    pub fn restore(
        &self,
        _token: &TrackerToken,
        region: &mut PersistedRegion,
        blob: &[u8],
    ) -> bool {
        let Ok((header, body)) = SnapshotHeader::ref_from_prefix(blob) else {
            return false;
        };
        if header.format_version != SNAPSHOT_FORMAT_VERSION
            || header.num_locks != NUM_LOCKS as u8
            || usize::from(header.body_len.get()) != blob.len().saturating_sub(3)
            || header.region_len.get() != self.region_len()
            || body.len() != usize::from(header.region_len.get())
        {
            return false;
        }

        let mut cursor = 0usize;
        for (tag, range) in self.walk() {
            let slice = &body[cursor..cursor + usize::from(range.len)];
            if let Some(index) = tag.lock_index() {
                if header.lock_state[index].get() != u16::from(slice[0]) {
                    return false;
                }
            }
            cursor += usize::from(range.len);
        }

        if region.begin().is_err() {
            return false;
        }
        let mut cursor = 0usize;
        for (_, range) in self.walk() {
            let slice = &body[cursor..cursor + usize::from(range.len)];
            if region.stage_write(range, 0, slice).is_err() {
                region.abort();
                return false;
            }
            cursor += usize::from(range.len);
        }
        region.commit().is_ok()
    }
}
