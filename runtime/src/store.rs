/*++

Licensed under the Apache-2.0 license.

File Name:

    store.rs

Abstract:

    File contains the STORE command: advance one anti-rollback slot.

--*/

use bootvault_api::{CommandFrame, Status};
use bootvault_error::BootvaultResult;

use crate::{version_status, Drivers};

pub struct StoreCmd;
impl StoreCmd {
    pub(crate) fn execute(
        drivers: &mut Drivers,
        frame: &CommandFrame,
        resp: &mut [u8],
    ) -> BootvaultResult<usize> {
        if !frame.payload_complete() {
            Status::STAGING.write(resp);
            return Ok(2);
        }
        let Ok(value) = <[u8; 8]>::try_from(frame.payload) else {
            Status::METADATA.write(resp);
            return Ok(2);
        };
        let value = u64::from_be_bytes(value);
        let status = match drivers
            .versions
            .set_slot(&mut drivers.region, frame.p1, value)
        {
            Ok(()) => Status::SUCCESS,
            Err(err) => version_status(err)?,
        };
        status.write(resp);
        Ok(2)
    }
}
