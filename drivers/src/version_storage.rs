/*++

Licensed under the Apache-2.0 license.

File Name:

    version_storage.rs

Abstract:

    File contains the anti-rollback version slot store.

--*/

use bootvault_api::{VERSION_SLOT_BYTES, VERSION_SLOT_COUNT};
use bootvault_error::{BootvaultError, BootvaultResult};

use crate::arena::{PersistedRegion, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionError {
    /// Slot index out of bounds.
    Range,
    /// New value is lower than the stored one; the store is unchanged.
    Rollback,
    /// Arena fault; fatal for the request.
    Internal(BootvaultError),
}

/// Fixed array of monotonic version counters over a dedicated arena range.
/// Values only ever grow; the monotonicity check lives here so it holds even
/// for callers that bypass the protocol layer.
pub struct VersionStorage {
    range: Range,
}

impl VersionStorage {
    pub fn new(range: Range) -> BootvaultResult<Self> {
        if usize::from(range.len) != VERSION_SLOT_COUNT * VERSION_SLOT_BYTES {
            return Err(BootvaultError::VERSION_SLOT_REGION_MISMATCH);
        }
        Ok(Self { range })
    }

    pub fn range(&self) -> Range {
        self.range
    }

    fn slot_offset(slot: u8) -> Result<usize, VersionError> {
        if usize::from(slot) >= VERSION_SLOT_COUNT {
            return Err(VersionError::Range);
        }
        Ok(usize::from(slot) * VERSION_SLOT_BYTES)
    }

    pub fn get_slot(&self, region: &PersistedRegion, slot: u8) -> Result<u64, VersionError> {
        let offset = Self::slot_offset(slot)?;
        let bytes = region.read(self.range).map_err(VersionError::Internal)?;
        let mut value = [0u8; VERSION_SLOT_BYTES];
        value.copy_from_slice(&bytes[offset..offset + VERSION_SLOT_BYTES]);
        Ok(u64::from_be_bytes(value))
    }

    pub fn set_slot(
        &self,
        region: &mut PersistedRegion,
        slot: u8,
        value: u64,
    ) -> Result<(), VersionError> {
        let offset = Self::slot_offset(slot)?;
        let current = self.get_slot(region, slot)?;
        if value < current {
            return Err(VersionError::Rollback);
        }
        region.begin().map_err(VersionError::Internal)?;
        let staged = region.stage_write(self.range, offset, &value.to_be_bytes());
        if let Err(e) = staged {
            region.abort();
            return Err(VersionError::Internal(e));
        }
        region.commit().map_err(VersionError::Internal)
    }
}
