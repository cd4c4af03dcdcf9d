// Licensed under the Apache-2.0 license

use core::mem::size_of;
use zerocopy::byteorder::{LittleEndian, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Signature length of a carrier unlock proof (RSA-2048, PKCS#1 v1.5).
pub const CARRIER_SIGNATURE_SIZE: usize = 256;

/// Length of the device-data digest the carrier lock stores.
pub const CARRIER_DEVICE_DATA_SIZE: usize = 32;

/// Proof a carrier presents to clear the carrier lock.
///
/// The signed message is `version || nonce || device_data`, with the fields
/// exactly as they appear on the wire and `device_data` taken from the lock's
/// stored state. `nonce` must exceed the stored last-seen nonce.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct UnlockToken {
    pub version: U64<LittleEndian>,
    pub nonce: U64<LittleEndian>,
    pub signature: [u8; CARRIER_SIGNATURE_SIZE],
}

pub const CARRIER_UNLOCK_TOKEN_SIZE: usize = size_of::<UnlockToken>();

/// CARRIER_LOCK_TEST payload: a hypothetical stored state followed by the
/// token to evaluate against it. Running the check against supplied state
/// lets a factory validate signing infrastructure without touching the lock.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct CarrierTestVector {
    pub last_nonce: U64<LittleEndian>,
    pub device_data: [u8; CARRIER_DEVICE_DATA_SIZE],
    pub token: UnlockToken,
}

pub const CARRIER_TEST_VECTOR_SIZE: usize = size_of::<CarrierTestVector>();
