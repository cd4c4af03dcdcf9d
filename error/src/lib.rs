/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the library for error handling

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// BootVault Error Type
///
/// A non-zero 32-bit code; the upper half identifies the component that
/// raised the error, the lower half the condition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BootvaultError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: BootvaultError = BootvaultError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(& 'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl BootvaultError {
    /// Create a bootvault error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a BootvaultError from a u32 is to
    /// use `BootvaultError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("BootvaultError cannot be 0"),
        }
    }

    // Use the macro to define all error constants
    define_error_constants![
        (
            GLOBAL_STATE_UNRECOGNIZED_CALLER,
            0x0001_0001,
            "Global State Error: caller identity not recognized for mutable capability"
        ),
        (
            STORAGE_ARENA_OVERFLOW,
            0x0002_0001,
            "Storage Error: arena capacity exceeded during layout registration"
        ),
        (
            STORAGE_ARENA_RANGE,
            0x0002_0002,
            "Storage Error: access outside an owner's registered range"
        ),
        (
            STORAGE_NO_OPEN_TRANSACTION,
            0x0002_0003,
            "Storage Error: commit requested with no staged transaction"
        ),
        (
            STORAGE_TRANSACTION_ALREADY_OPEN,
            0x0002_0004,
            "Storage Error: transaction opened while one is already staged"
        ),
        (
            LOCK_BAD_CONFIGURATION,
            0x0003_0001,
            "Lock Error: registry constructed with an invalid lock configuration"
        ),
        (
            LOCK_STORAGE_MISMATCH,
            0x0003_0002,
            "Lock Error: lock range does not match the variant's storage need"
        ),
        (
            VERSION_SLOT_REGION_MISMATCH,
            0x0004_0001,
            "Version Storage Error: slot region length is not a whole number of slots"
        ),
        (
            BACKUP_SNAPSHOT_BUFFER_TOO_SMALL,
            0x0005_0001,
            "Backup Error: caller buffer cannot hold the snapshot"
        ),
        (
            BACKUP_TRACK_TABLE_FULL,
            0x0005_0002,
            "Backup Error: tracked-component table is full"
        ),
        (
            RUNTIME_RESPONSE_BUFFER_TOO_SMALL,
            0x0006_0001,
            "Runtime Error: response buffer cannot hold the encoded frame"
        ),
        (
            RUNTIME_INTERNAL,
            0x0006_0002,
            "Runtime Error: internal dispatcher fault"
        ),
    ];
}

impl From<core::num::NonZeroU32> for crate::BootvaultError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::BootvaultError(val)
    }
}

impl From<BootvaultError> for core::num::NonZeroU32 {
    fn from(val: BootvaultError) -> Self {
        val.0
    }
}

impl From<BootvaultError> for u32 {
    fn from(val: BootvaultError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for BootvaultError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(BootvaultError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type BootvaultResult<T> = Result<T, BootvaultError>;
