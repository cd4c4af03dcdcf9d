/*++

Licensed under the Apache-2.0 license.

File Name:

    global_state.rs

Abstract:

    File contains the process-lifetime global flags: production mode and
    execution context.

--*/

use crate::access::OwnerToken;

/// The two durable flags shared with the hosting runtime. Never persisted;
/// clients re-establish their capability every session, and the backup blob
/// carries these bytes for inspection only.
pub struct GlobalState {
    production: bool,
    in_bootloader: bool,
}

impl Default for GlobalState {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalState {
    pub fn new() -> Self {
        Self {
            production: false,
            in_bootloader: false,
        }
    }

    pub fn production(&self) -> bool {
        self.production
    }

    pub fn in_bootloader(&self) -> bool {
        self.in_bootloader
    }

    /// Applies the production transition if policy permits and returns
    /// whether the requested state is in effect afterwards. Production is
    /// one-way: enabling commits (and re-enabling reports success), disabling
    /// an enabled engine is refused.
    pub fn set_production(&mut self, _token: &OwnerToken, enable: bool) -> bool {
        if enable {
            self.production = true;
            true
        } else {
            !self.production
        }
    }

    /// Records the execution context handoff signaled by the bootloader.
    pub fn set_in_bootloader(&mut self, _token: &OwnerToken, value: bool) {
        self.in_bootloader = value;
    }
}
