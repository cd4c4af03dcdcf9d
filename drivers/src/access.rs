/*++

Licensed under the Apache-2.0 license.

File Name:

    access.rs

Abstract:

    File contains the caller-identity access table and the typed capability
    tokens it issues.

--*/

/// Opaque platform-verified caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub [u8; 16]);

/// Capability the caller is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Mutate global state (production flag, bootloader context).
    StateMutation,
    /// Drive backup and restore.
    BackupTracking,
}

/// Proof of the state-mutation capability. Only the access table can mint
/// one; holding a reference is the authorization.
#[derive(Debug)]
pub struct OwnerToken(());

/// Proof of the backup-tracking capability.
#[derive(Debug)]
pub struct TrackerToken(());

/// What a caller gets back from [`AccessTable::issue`]. Unrecognized callers
/// receive the read-only view rather than an error, so a misidentified
/// caller degrades instead of being denied service.
#[derive(Debug)]
pub enum Capability {
    Owner(OwnerToken),
    Tracker(TrackerToken),
    ReadOnly,
}

/// Maps the single recognized caller identity to its capabilities. Built
/// once per session; tokens are passed explicitly from then on.
pub struct AccessTable {
    recognized: CallerId,
}

impl AccessTable {
    /// Creates the table and mints the engine's own token pair. The engine
    /// is the distinguished holder; everyone else goes through `issue`.
    pub fn new(recognized: CallerId) -> (Self, OwnerToken, TrackerToken) {
        (Self { recognized }, OwnerToken(()), TrackerToken(()))
    }

    pub fn issue(&self, caller: &CallerId, role: Role) -> Capability {
        if *caller != self.recognized {
            return Capability::ReadOnly;
        }
        match role {
            Role::StateMutation => Capability::Owner(OwnerToken(())),
            Role::BackupTracking => Capability::Tracker(TrackerToken(())),
        }
    }
}
