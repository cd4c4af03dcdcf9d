/*++

Licensed under the Apache-2.0 license.

File Name:

    drivers.rs

Abstract:

    File contains the context object binding every engine component
    together, and the install entry point.

--*/

use bootvault_api::{NUM_LOCKS, VERSION_SLOT_BYTES, VERSION_SLOT_COUNT};
use bootvault_drivers::{
    AccessTable, ArenaLayout, BackupCoordinator, BackupTag, CallerId, Capability, GlobalState,
    LockId, LockRegistry, OwnerToken, PersistedRegion, Role, SignatureVerifier, TrackerToken,
    VersionStorage, ARENA_CAPACITY,
};
use bootvault_error::BootvaultResult;
use log::{info, warn};

/// Installation-time configuration supplied by the hosting runtime.
pub struct EngineConfig<'a> {
    /// Public key the carrier lock verifies unlock proofs against.
    pub carrier_key: &'a [u8],
    /// The external signature-verification capability.
    pub verifier: &'a dyn SignatureVerifier,
    /// The one caller identity entitled to mutable capabilities.
    pub recognized_caller: CallerId,
}

/// Everything a command handler needs, owned in one place and passed
/// explicitly into every entry point.
pub struct Drivers<'a> {
    pub region: PersistedRegion,
    pub global: GlobalState,
    pub access: AccessTable,
    pub registry: LockRegistry<'a>,
    pub versions: VersionStorage,
    pub backup: BackupCoordinator,
    pub verifier: &'a dyn SignatureVerifier,
    owner: OwnerToken,
    tracker: TrackerToken,
}

impl<'a> Drivers<'a> {
    /// Brings the engine up. With empty install parameters a previous
    /// backup blob is restored when one validates; anything else is a fresh
    /// initialization with all locks clear and all version slots zero.
    /// An arena overflow here is fatal: the engine never runs
    /// under-provisioned.
    pub fn install(
        config: EngineConfig<'a>,
        install_params: &[u8],
        previous: Option<&[u8]>,
    ) -> BootvaultResult<Self> {
        let mut layout = ArenaLayout::new(ARENA_CAPACITY as u16);
        let slot_range = layout.reserve((VERSION_SLOT_COUNT * VERSION_SLOT_BYTES) as u16)?;
        let registry = LockRegistry::new(&mut layout, config.carrier_key)?;
        let versions = VersionStorage::new(slot_range)?;

        let mut backup = BackupCoordinator::new();
        backup.track(BackupTag::VersionStorage, slot_range)?;
        backup.track(BackupTag::LockCarrier, registry.range(LockId::Carrier))?;
        backup.track(BackupTag::LockDevice, registry.range(LockId::Device))?;
        backup.track(BackupTag::LockBoot, registry.range(LockId::Boot))?;
        backup.track(BackupTag::LockOwner, registry.range(LockId::Owner))?;

        let (access, owner, tracker) = AccessTable::new(config.recognized_caller);

        let mut drivers = Self {
            region: PersistedRegion::new(),
            global: GlobalState::new(),
            access,
            registry,
            versions,
            backup,
            verifier: config.verifier,
            owner,
            tracker,
        };

        if install_params.is_empty() {
            if let Some(blob) = previous {
                if drivers
                    .backup
                    .restore(&drivers.tracker, &mut drivers.region, blob)
                {
                    info!("[bv] install: state restored from backup");
                    return Ok(drivers);
                }
                warn!("[bv] install: backup rejected, starting fresh");
            }
        }
        // Fresh install: the arena banks come up zeroed, which is exactly
        // all-locks-clear and all-slots-zero.
        Ok(drivers)
    }

    pub fn set_production(&mut self, enable: bool) -> bool {
        self.global.set_production(&self.owner, enable)
    }

    pub fn set_in_bootloader(&mut self, value: bool) {
        self.global.set_in_bootloader(&self.owner, value);
    }

    /// Issues a capability for an external caller. Unrecognized identities
    /// get the read-only view.
    pub fn capability(&self, caller: &CallerId, role: Role) -> Capability {
        self.access.issue(caller, role)
    }

    /// Encodes the state snapshot (shared by GET_STATE and backup).
    pub fn snapshot(&self, out: &mut [u8]) -> BootvaultResult<usize> {
        let codes = self.registry.state_codes(&self.region)?;
        self.backup.snapshot(&self.region, &self.global, codes, out)
    }

    /// Token-gated backup for the hosting runtime's upgrade path.
    pub fn backup_blob(&self, token: &TrackerToken, out: &mut [u8]) -> BootvaultResult<usize> {
        let codes = self.registry.state_codes(&self.region)?;
        self.backup
            .backup(token, &self.region, &self.global, codes, out)
    }

    /// Bytes a GET_STATE response occupies before the status word.
    pub fn snapshot_len(&self) -> usize {
        bootvault_api::SnapshotHeader::snapshot_len(self.backup.region_len())
    }

    /// State codes of all locks, wire order.
    pub fn lock_state_codes(&self) -> BootvaultResult<[u16; NUM_LOCKS]> {
        self.registry.state_codes(&self.region)
    }
}
