/*++

Licensed under the Apache-2.0 license.

File Name:

    registry.rs

Abstract:

    File contains the fixed lock registry and the shared precondition
    checks for lock transitions.

--*/

use bootvault_error::{BootvaultError, BootvaultResult};

use crate::arena::{ArenaLayout, PersistedRegion, Range};
use crate::global_state::GlobalState;
use crate::lock::{
    BasicLock, CarrierLock, LockError, LockId, LockPolicy, LockSet, LOCK_CLEAR,
    OWNER_LOCK_METADATA_SIZE,
};
use crate::verify::SignatureVerifier;

enum LockVariant<'a> {
    Basic(BasicLock),
    Carrier(CarrierLock<'a>),
}

struct LockEntry<'a> {
    policy: LockPolicy,
    required: LockSet,
    range: Range,
    variant: LockVariant<'a>,
}

impl LockEntry<'_> {
    fn state_code(&self, region: &PersistedRegion) -> Result<u16, LockError> {
        match &self.variant {
            LockVariant::Basic(lock) => lock.state_code(region, self.range),
            LockVariant::Carrier(lock) => lock.state_code(region, self.range),
        }
    }

    fn metadata<'r>(&self, region: &'r PersistedRegion) -> Result<&'r [u8], LockError> {
        match &self.variant {
            LockVariant::Basic(lock) => lock.metadata(region, self.range),
            LockVariant::Carrier(lock) => lock.metadata(region, self.range),
        }
    }

    fn metadata_len(&self) -> u16 {
        match &self.variant {
            LockVariant::Basic(lock) => lock.metadata_len(),
            LockVariant::Carrier(lock) => lock.metadata_len(),
        }
    }
}

/// The four boot-policy locks in wire order, each owning a disjoint range of
/// the arena. The registry owns the checks every transition shares: id
/// range, dependency locks clear, execution context, metadata presence.
/// Variant-specific schema and status stay with the variant.
pub struct LockRegistry<'a> {
    locks: [LockEntry<'a>; LockId::COUNT],
}

impl<'a> LockRegistry<'a> {
    /// Reserves each lock's range in registration order. Dependency graph:
    /// boot requires carrier and device clear; owner requires boot clear.
    pub fn new(layout: &mut ArenaLayout, carrier_key: &'a [u8]) -> BootvaultResult<Self> {
        // Carrier: lockable only outside production mode, unlockable any
        // time a valid proof is presented. Policy enforced by the variant.
        let carrier = CarrierLock::new(carrier_key);
        let carrier_range = layout.reserve(carrier.storage_needed())?;

        // Device: expresses an HLOS management policy.
        let device = BasicLock::new(0);
        let device_range = layout.reserve(device.storage_needed())?;

        // Boot: fastboot-era decisions only.
        let boot = BasicLock::new(0);
        let boot_range = layout.reserve(boot.storage_needed())?;

        // Owner: carries the alternate boot key while engaged.
        let owner = BasicLock::new(OWNER_LOCK_METADATA_SIZE);
        let owner_range = layout.reserve(owner.storage_needed())?;

        Ok(Self {
            locks: [
                LockEntry {
                    policy: LockPolicy::empty(),
                    required: LockSet::EMPTY,
                    range: carrier_range,
                    variant: LockVariant::Carrier(carrier),
                },
                LockEntry {
                    policy: LockPolicy::REQUIRE_HLOS,
                    required: LockSet::EMPTY,
                    range: device_range,
                    variant: LockVariant::Basic(device),
                },
                LockEntry {
                    policy: LockPolicy::REQUIRE_BOOTLOADER,
                    required: LockSet::of(&[LockId::Carrier, LockId::Device]),
                    range: boot_range,
                    variant: LockVariant::Basic(boot),
                },
                LockEntry {
                    policy: LockPolicy::REQUIRE_METADATA,
                    required: LockSet::of(&[LockId::Boot]),
                    range: owner_range,
                    variant: LockVariant::Basic(owner),
                },
            ],
        })
    }

    fn entry(&self, id: u8) -> Result<&LockEntry<'a>, LockError> {
        LockId::from_u8(id)
            .map(|id| &self.locks[id as usize])
            .ok_or(LockError::Range)
    }

    /// Applies one transition. Check order is part of the contract: range,
    /// then dependencies, then context, then metadata.
    pub fn toggle(
        &self,
        region: &mut PersistedRegion,
        global: &GlobalState,
        verifier: &dyn SignatureVerifier,
        id: u8,
        desired: u8,
        metadata: Option<&[u8]>,
    ) -> Result<(), LockError> {
        let entry = self.entry(id)?;

        for dep in 0..LockId::COUNT as u8 {
            let dep_id = LockId::from_u8(dep).ok_or(LockError::Range)?;
            if entry.required.contains(dep_id)
                && self.locks[dep_id as usize].state_code(region)? != u16::from(LOCK_CLEAR)
            {
                return Err(LockError::Dependency);
            }
        }

        if entry.policy.contains(LockPolicy::REQUIRE_HLOS) && global.in_bootloader() {
            return Err(LockError::Context);
        }
        if entry.policy.contains(LockPolicy::REQUIRE_BOOTLOADER) && !global.in_bootloader() {
            return Err(LockError::Context);
        }

        if entry.policy.contains(LockPolicy::REQUIRE_METADATA)
            && desired != LOCK_CLEAR
            && metadata.is_none()
        {
            return Err(LockError::Metadata);
        }

        match &entry.variant {
            LockVariant::Basic(lock) => lock.toggle(region, entry.range, desired, metadata),
            LockVariant::Carrier(lock) => lock.toggle(
                region,
                entry.range,
                global.production(),
                verifier,
                desired,
                metadata,
            ),
        }
    }

    /// Current state code, with the exported metadata when asked for.
    pub fn query<'r>(
        &self,
        region: &'r PersistedRegion,
        id: u8,
        include_metadata: bool,
    ) -> Result<(u16, Option<&'r [u8]>), LockError> {
        let entry = self.entry(id)?;
        let code = entry.state_code(region)?;
        if include_metadata {
            Ok((code, Some(entry.metadata(region)?)))
        } else {
            Ok((code, None))
        }
    }

    /// State codes of all locks in wire order, for snapshots.
    pub fn state_codes(&self, region: &PersistedRegion) -> BootvaultResult<[u16; LockId::COUNT]> {
        let mut codes = [0u16; LockId::COUNT];
        for (entry, code) in self.locks.iter().zip(codes.iter_mut()) {
            *code = entry.state_code(region).map_err(|e| match e {
                LockError::Internal(e) => e,
                _ => BootvaultError::RUNTIME_INTERNAL,
            })?;
        }
        Ok(codes)
    }

    pub fn range(&self, id: LockId) -> Range {
        self.locks[id as usize].range
    }

    pub fn metadata_len(&self, id: LockId) -> u16 {
        self.locks[id as usize].metadata_len()
    }

    pub fn carrier(&self) -> &CarrierLock<'a> {
        match &self.locks[LockId::Carrier as usize].variant {
            LockVariant::Carrier(lock) => lock,
            // The carrier slot is fixed at construction.
            LockVariant::Basic(_) => unreachable!(),
        }
    }
}
