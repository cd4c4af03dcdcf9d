/*++

Licensed under the Apache-2.0 license.

File Name:

    set_production.rs

Abstract:

    File contains the SET_PRODUCTION command.

--*/

use bootvault_api::{CommandFrame, Status};
use bootvault_error::BootvaultResult;

use crate::Drivers;

pub struct SetProductionCmd;
impl SetProductionCmd {
    pub(crate) fn execute(
        drivers: &mut Drivers,
        frame: &CommandFrame,
        resp: &mut [u8],
    ) -> BootvaultResult<usize> {
        let status = if drivers.set_production(frame.p1 != 0) {
            Status::SUCCESS
        } else {
            Status::CONTEXT
        };
        status.write(resp);
        Ok(2)
    }
}
