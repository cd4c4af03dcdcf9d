/*++

Licensed under the Apache-2.0 license.

File Name:

    get_lock.rs

Abstract:

    File contains the GET_LOCK command.

--*/

use bootvault_api::{CommandFrame, Status};
use bootvault_error::BootvaultResult;

use crate::{lock_status, Drivers};

pub struct GetLockCmd;
impl GetLockCmd {
    /// Returns the lock's state byte, and its exported metadata when p2 is
    /// nonzero. The state comes from the variant's own query, never from a
    /// raw storage read here.
    pub(crate) fn execute(
        drivers: &mut Drivers,
        frame: &CommandFrame,
        resp: &mut [u8],
    ) -> BootvaultResult<usize> {
        match drivers
            .registry
            .query(&drivers.region, frame.p1, frame.p2 != 0)
        {
            Ok((code, metadata)) => {
                Status::SUCCESS.write(resp);
                resp[2] = (code & 0xff) as u8;
                let mut len = 3;
                if let Some(metadata) = metadata {
                    resp[len..len + metadata.len()].copy_from_slice(metadata);
                    len += metadata.len();
                }
                Ok(len)
            }
            Err(err) => {
                lock_status(err)?.write(resp);
                Ok(2)
            }
        }
    }
}
