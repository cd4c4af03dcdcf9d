/*++

Licensed under the Apache-2.0 license.

File Name:

    load.rs

Abstract:

    File contains the LOAD command: read one anti-rollback slot.

--*/

use bootvault_api::{CommandFrame, Status};
use bootvault_error::BootvaultResult;

use crate::{version_status, Drivers};

pub struct LoadCmd;
impl LoadCmd {
    pub(crate) fn execute(
        drivers: &mut Drivers,
        frame: &CommandFrame,
        resp: &mut [u8],
    ) -> BootvaultResult<usize> {
        match drivers.versions.get_slot(&drivers.region, frame.p1) {
            Ok(value) => {
                Status::SUCCESS.write(resp);
                resp[2..10].copy_from_slice(&value.to_be_bytes());
                Ok(10)
            }
            Err(err) => {
                version_status(err)?.write(resp);
                Ok(2)
            }
        }
    }
}
