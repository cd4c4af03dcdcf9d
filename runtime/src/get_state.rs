/*++

Licensed under the Apache-2.0 license.

File Name:

    get_state.rs

Abstract:

    File contains the GET_STATE command.

--*/

use bootvault_api::{CommandFrame, Status};
use bootvault_error::BootvaultResult;

use crate::Drivers;

pub struct GetStateCmd;
impl GetStateCmd {
    /// Dumps the full state snapshot. A caller that declared too small a
    /// receive capacity gets the required total length back instead of a
    /// truncated dump; no storage bytes leave the engine in that case.
    pub(crate) fn execute(
        drivers: &mut Drivers,
        frame: &CommandFrame,
        resp: &mut [u8],
    ) -> BootvaultResult<usize> {
        let required = 2 + drivers.snapshot_len();
        if usize::from(frame.receive_capacity) < required {
            Status::LENGTH.write(resp);
            resp[2..4].copy_from_slice(&(required as u16).to_be_bytes());
            return Ok(4);
        }
        Status::SUCCESS.write(resp);
        let written = drivers.snapshot(&mut resp[2..])?;
        Ok(2 + written)
    }
}
