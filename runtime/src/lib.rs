/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the BootVault runtime and the command
    dispatch logic.

--*/
#![cfg_attr(not(test), no_std)]

mod drivers;
mod get_lock;
mod get_state;
mod load;
mod set_lock;
mod set_production;
mod store;

pub use drivers::{Drivers, EngineConfig};

use bootvault_api::{CommandFrame, Instruction, Status, StatusWord, APPLET_CLA, MAX_RESP_SIZE};
use bootvault_drivers::{LockError, VersionError};
use bootvault_error::{BootvaultError, BootvaultResult};
use log::debug;

use carrier_lock_test::CarrierLockTestCmd;
use get_lock::GetLockCmd;
use get_state::GetStateCmd;
use load::LoadCmd;
use set_lock::SetLockCmd;
use set_production::SetProductionCmd;
use store::StoreCmd;

/// Processes one command frame to completion and writes a length-correct
/// response (body plus trailing status word) into `resp`, returning the
/// total response length.
///
/// Strictly synchronous: the transport guarantees no concurrent invocation,
/// and every handler runs to completion before the next frame arrives. An
/// `Err` return is a fatal abort of this single exchange — the caller drops
/// the response; persisted state and later requests are unaffected.
pub fn handle_command(
    drivers: &mut Drivers,
    frame: &CommandFrame,
    resp: &mut [u8],
) -> BootvaultResult<usize> {
    if resp.len() < MAX_RESP_SIZE {
        return Err(BootvaultError::RUNTIME_RESPONSE_BUFFER_TOO_SMALL);
    }

    // Interindustry traffic: SELECT succeeds as a no-op, everything else is
    // unsupported.
    if frame.is_interindustry() {
        return match Instruction::from(frame.ins) {
            Instruction::SELECT => finish(resp, 0, StatusWord::NO_ERROR),
            _ => finish(resp, 0, StatusWord::INS_NOT_SUPPORTED),
        };
    }
    if frame.cla != APPLET_CLA {
        return finish(resp, 0, StatusWord::CLA_NOT_SUPPORTED);
    }

    debug!(
        "[bv] rx ins=0x{:02x} p1={} p2={} len={}",
        frame.ins,
        frame.p1,
        frame.p2,
        frame.payload.len()
    );

    let body_len = match Instruction::from(frame.ins) {
        Instruction::GET_STATE => GetStateCmd::execute(drivers, frame, resp),
        Instruction::LOAD => LoadCmd::execute(drivers, frame, resp),
        Instruction::STORE => StoreCmd::execute(drivers, frame, resp),
        Instruction::GET_LOCK => GetLockCmd::execute(drivers, frame, resp),
        Instruction::SET_LOCK => SetLockCmd::execute(drivers, frame, resp),
        Instruction::SET_PRODUCTION => SetProductionCmd::execute(drivers, frame, resp),
        Instruction::CARRIER_LOCK_TEST => CarrierLockTestCmd::execute(drivers, frame, resp),
        _ => return finish(resp, 0, StatusWord::INS_NOT_SUPPORTED),
    }?;
    finish(resp, body_len, StatusWord::NO_ERROR)
}

fn finish(resp: &mut [u8], body_len: usize, sw: StatusWord) -> BootvaultResult<usize> {
    sw.write(resp, body_len);
    Ok(body_len + 2)
}

/// Maps a lock refusal onto its wire status; internal faults abort the
/// request instead.
pub(crate) fn lock_status(err: LockError) -> BootvaultResult<Status> {
    match err {
        LockError::Range => Ok(Status::RANGE),
        LockError::Dependency => Ok(Status::DEPENDENCY),
        LockError::Context => Ok(Status::CONTEXT),
        LockError::Metadata => Ok(Status::METADATA),
        LockError::Auth => Ok(Status::AUTH),
        LockError::Internal(err) => Err(err),
    }
}

pub(crate) fn version_status(err: VersionError) -> BootvaultResult<Status> {
    match err {
        VersionError::Range => Ok(Status::RANGE),
        VersionError::Rollback => Ok(Status::ROLLBACK),
        VersionError::Internal(err) => Err(err),
    }
}
