/*++

Licensed under the Apache-2.0 license.

File Name:

    basic.rs

Abstract:

    File contains the basic lock variant: a state byte plus optional
    caller-supplied metadata, stored verbatim.

--*/

use crate::arena::{PersistedRegion, Range};
use crate::lock::{LockError, LOCK_CLEAR};

/// Layout within the owned range: `[state:1][metadata:metadata_len]`.
pub struct BasicLock {
    metadata_len: u16,
}

impl BasicLock {
    pub fn new(metadata_len: u16) -> Self {
        Self { metadata_len }
    }

    pub fn storage_needed(&self) -> u16 {
        1 + self.metadata_len
    }

    pub fn metadata_len(&self) -> u16 {
        self.metadata_len
    }

    /// Writes the new state and metadata as one staged commit. The metadata
    /// schema here is free-form bytes bounded by the lock's allowance;
    /// clearing scrubs the metadata so no stale key material survives an
    /// unlock.
    pub(crate) fn toggle(
        &self,
        region: &mut PersistedRegion,
        range: Range,
        desired: u8,
        metadata: Option<&[u8]>,
    ) -> Result<(), LockError> {
        let payload = match metadata {
            Some(bytes) if bytes.len() > usize::from(self.metadata_len) => {
                return Err(LockError::Metadata)
            }
            Some(bytes) => bytes,
            None => &[],
        };
        region.begin().map_err(LockError::Internal)?;
        let staged = (|| {
            region.stage_write(range, 0, &[desired])?;
            if desired == LOCK_CLEAR {
                region.stage_fill(range, 1, usize::from(self.metadata_len), 0)?;
            } else if !payload.is_empty() {
                // Scrub first so a shorter payload leaves no stale bytes
                // from an earlier lock.
                region.stage_fill(range, 1, usize::from(self.metadata_len), 0)?;
                region.stage_write(range, 1, payload)?;
            }
            Ok(())
        })();
        if let Err(e) = staged {
            region.abort();
            return Err(LockError::Internal(e));
        }
        region.commit().map_err(LockError::Internal)
    }

    /// Reads the stored state byte verbatim.
    pub(crate) fn state_code(&self, region: &PersistedRegion, range: Range) -> Result<u16, LockError> {
        let bytes = region.read(range).map_err(LockError::Internal)?;
        Ok(u16::from(bytes[0]))
    }

    /// Exported metadata bytes.
    pub(crate) fn metadata<'r>(
        &self,
        region: &'r PersistedRegion,
        range: Range,
    ) -> Result<&'r [u8], LockError> {
        let bytes = region.read(range).map_err(LockError::Internal)?;
        Ok(&bytes[1..1 + usize::from(self.metadata_len)])
    }
}
