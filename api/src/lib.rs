// Licensed under the Apache-2.0 license

#![cfg_attr(not(test), no_std)]

mod carrier;

mod frame;

mod snapshot;

mod status;

pub use bootvault_error as error;

pub use carrier::{
    CarrierTestVector, UnlockToken, CARRIER_DEVICE_DATA_SIZE, CARRIER_SIGNATURE_SIZE,
    CARRIER_TEST_VECTOR_SIZE, CARRIER_UNLOCK_TOKEN_SIZE,
};

pub use frame::{CommandFrame, Instruction, StatusWord, APPLET_CLA};

pub use snapshot::{
    SnapshotHeader, LOCK_STORAGE_CAPACITY, MAX_REGION_SIZE, NUM_LOCKS, SNAPSHOT_FORMAT_VERSION,
    VERSION_SLOT_BYTES, VERSION_SLOT_COUNT,
};

pub use status::Status;

/// Largest response the engine ever produces: the GET_STATE body plus the
/// trailing status word.
pub const MAX_RESP_SIZE: usize =
    2 + core::mem::size_of::<SnapshotHeader>() + snapshot::MAX_REGION_SIZE + 2;
