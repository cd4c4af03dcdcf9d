/*++

Licensed under the Apache-2.0 license.

File Name:

    carrier.rs

Abstract:

    File contains the carrier lock variant: signed-token unlock with a
    monotonic anti-replay nonce.

--*/

use bootvault_api::{
    CarrierTestVector, UnlockToken, CARRIER_DEVICE_DATA_SIZE, CARRIER_TEST_VECTOR_SIZE,
    CARRIER_UNLOCK_TOKEN_SIZE,
};
use zerocopy::FromBytes;
use zeroize::Zeroize;

use crate::arena::{PersistedRegion, Range};
use crate::lock::{LockError, LOCK_CLEAR};
use crate::verify::SignatureVerifier;

const NONCE_OFFSET: usize = 1;
const DEVICE_DATA_OFFSET: usize = 9;
const MESSAGE_SIZE: usize = 16 + CARRIER_DEVICE_DATA_SIZE;

/// Layout within the owned range:
/// `[state:1][last_nonce:8 LE][device_data:32]`.
///
/// The carrier lock owns the authority on its own status; nothing else in
/// the engine interprets these bytes.
pub struct CarrierLock<'a> {
    key: &'a [u8],
}

impl<'a> CarrierLock<'a> {
    pub fn new(key: &'a [u8]) -> Self {
        Self { key }
    }

    pub fn storage_needed(&self) -> u16 {
        (1 + 8 + CARRIER_DEVICE_DATA_SIZE) as u16
    }

    /// Exported metadata: the last nonce and the device-data digest.
    pub fn metadata_len(&self) -> u16 {
        (8 + CARRIER_DEVICE_DATA_SIZE) as u16
    }

    /// Locking stores the 32-byte device-data digest and is barred in
    /// production mode. Unlocking demands a signed token whose nonce exceeds
    /// the stored one and is permitted in any mode; the nonce survives
    /// relocking so a captured token can never be replayed.
    pub(crate) fn toggle(
        &self,
        region: &mut PersistedRegion,
        range: Range,
        production: bool,
        verifier: &dyn SignatureVerifier,
        desired: u8,
        metadata: Option<&[u8]>,
    ) -> Result<(), LockError> {
        if desired != LOCK_CLEAR {
            return self.lock(region, range, production, desired, metadata);
        }
        self.unlock(region, range, verifier, metadata)
    }

    fn lock(
        &self,
        region: &mut PersistedRegion,
        range: Range,
        production: bool,
        desired: u8,
        metadata: Option<&[u8]>,
    ) -> Result<(), LockError> {
        if production {
            return Err(LockError::Context);
        }
        let device_data = match metadata {
            Some(bytes) if bytes.len() == CARRIER_DEVICE_DATA_SIZE => bytes,
            _ => return Err(LockError::Metadata),
        };
        region.begin().map_err(LockError::Internal)?;
        let staged = (|| {
            region.stage_write(range, 0, &[desired])?;
            region.stage_write(range, DEVICE_DATA_OFFSET, device_data)
        })();
        if let Err(e) = staged {
            region.abort();
            return Err(LockError::Internal(e));
        }
        region.commit().map_err(LockError::Internal)
    }

    fn unlock(
        &self,
        region: &mut PersistedRegion,
        range: Range,
        verifier: &dyn SignatureVerifier,
        metadata: Option<&[u8]>,
    ) -> Result<(), LockError> {
        let token = match metadata {
            Some(bytes) if bytes.len() == CARRIER_UNLOCK_TOKEN_SIZE => {
                UnlockToken::ref_from_bytes(bytes).map_err(|_| LockError::Metadata)?
            }
            _ => return Err(LockError::Metadata),
        };
        let stored = region.read(range).map_err(LockError::Internal)?;
        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&stored[NONCE_OFFSET..NONCE_OFFSET + 8]);
        let last_nonce = u64::from_le_bytes(nonce);
        let mut device_data = [0u8; CARRIER_DEVICE_DATA_SIZE];
        device_data.copy_from_slice(
            &stored[DEVICE_DATA_OFFSET..DEVICE_DATA_OFFSET + CARRIER_DEVICE_DATA_SIZE],
        );
        let accepted = self.accept(verifier, last_nonce, &device_data, token);
        device_data.zeroize();
        accepted?;

        region.begin().map_err(LockError::Internal)?;
        let staged = (|| {
            region.stage_write(range, 0, &[LOCK_CLEAR])?;
            region.stage_write(range, NONCE_OFFSET, &token.nonce.get().to_le_bytes())
        })();
        if let Err(e) = staged {
            region.abort();
            return Err(LockError::Internal(e));
        }
        region.commit().map_err(LockError::Internal)
    }

    /// Shared acceptance check: anti-replay nonce ordering, then the
    /// external signature capability over `version || nonce || device_data`.
    fn accept(
        &self,
        verifier: &dyn SignatureVerifier,
        last_nonce: u64,
        device_data: &[u8; CARRIER_DEVICE_DATA_SIZE],
        token: &UnlockToken,
    ) -> Result<(), LockError> {
        if token.nonce.get() <= last_nonce {
            return Err(LockError::Auth);
        }
        let mut message = [0u8; MESSAGE_SIZE];
        message[0..8].copy_from_slice(&token.version.get().to_le_bytes());
        message[8..16].copy_from_slice(&token.nonce.get().to_le_bytes());
        message[16..].copy_from_slice(device_data);
        let ok = verifier.verify(self.key, &message, &token.signature);
        message.zeroize();
        if ok {
            Ok(())
        } else {
            Err(LockError::Auth)
        }
    }

    /// Evaluates a token against a caller-supplied hypothetical state. Pure
    /// check; storage is never touched.
    pub fn test_vector(
        &self,
        verifier: &dyn SignatureVerifier,
        payload: &[u8],
    ) -> Result<(), LockError> {
        if payload.len() != CARRIER_TEST_VECTOR_SIZE {
            return Err(LockError::Metadata);
        }
        let vector = CarrierTestVector::ref_from_bytes(payload).map_err(|_| LockError::Metadata)?;
        self.accept(
            verifier,
            vector.last_nonce.get(),
            &vector.device_data,
            &vector.token,
        )
    }

    /// The variant computes its own status; the stored byte is not
    /// interpreted anywhere else.
    pub(crate) fn state_code(
        &self,
        region: &PersistedRegion,
        range: Range,
    ) -> Result<u16, LockError> {
        let bytes = region.read(range).map_err(LockError::Internal)?;
        Ok(u16::from(bytes[0]))
    }

    pub(crate) fn metadata<'r>(
        &self,
        region: &'r PersistedRegion,
        range: Range,
    ) -> Result<&'r [u8], LockError> {
        let bytes = region.read(range).map_err(LockError::Internal)?;
        Ok(&bytes[NONCE_OFFSET..NONCE_OFFSET + usize::from(self.metadata_len())])
    }
}
