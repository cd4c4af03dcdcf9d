/*++

Licensed under the Apache-2.0 license.

File Name:

    set_lock.rs

Abstract:

    File contains the SET_LOCK command.

--*/

use bootvault_api::{CommandFrame, Status};
use bootvault_error::BootvaultResult;

use crate::{lock_status, Drivers};

pub struct SetLockCmd;
impl SetLockCmd {
    pub(crate) fn execute(
        drivers: &mut Drivers,
        frame: &CommandFrame,
        resp: &mut [u8],
    ) -> BootvaultResult<usize> {
        if !frame.payload_complete() {
            Status::STAGING.write(resp);
            return Ok(2);
        }
        let metadata = (!frame.payload.is_empty()).then_some(frame.payload);
        let drivers = &mut *drivers;
        let status = match drivers.registry.toggle(
            &mut drivers.region,
            &drivers.global,
            drivers.verifier,
            frame.p1,
            frame.p2,
            metadata,
        ) {
            Ok(()) => Status::SUCCESS,
            Err(err) => lock_status(err)?,
        };
        status.write(resp);
        Ok(2)
    }
}
