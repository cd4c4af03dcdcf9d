// Licensed under the Apache-2.0 license

use crate::common::{exec, install_fresh, make_test_vector, make_token, status_of};
use bootvault_api::{Instruction, Status};

const LOCK_CARRIER: u8 = 0;
const LOCK_BOOT: u8 = 2;

const DEVICE_DATA: [u8; 32] = [0x42; 32];

#[test]
fn test_carrier_lock_stores_digest() {
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    assert_eq!(status_of(&body), Status::SUCCESS.0);

    let (body, _) = exec(&mut drivers, Instruction::GET_LOCK.0, LOCK_CARRIER, 1, &[]);
    assert_eq!(status_of(&body), Status::SUCCESS.0);
    assert_eq!(body[2], 1);
    // Exported metadata: last nonce (still zero) then the digest.
    assert_eq!(body.len(), 3 + 8 + 32);
    assert_eq!(&body[3..11], &[0u8; 8]);
    assert_eq!(&body[11..43], &DEVICE_DATA);
}

#[test]
fn test_carrier_lock_needs_digest_sized_metadata() {
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &[0u8; 16]);
    assert_eq!(status_of(&body), Status::METADATA.0);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &[]);
    assert_eq!(status_of(&body), Status::METADATA.0);
}

#[test]
fn test_carrier_cannot_lock_in_production() {
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::SET_PRODUCTION.0, 1, 0, &[]);
    assert_eq!(status_of(&body), Status::SUCCESS.0);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    assert_eq!(status_of(&body), Status::CONTEXT.0);
}

#[test]
fn test_carrier_unlock_with_proof_works_in_production() {
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    assert_eq!(status_of(&body), Status::SUCCESS.0);
    let (body, _) = exec(&mut drivers, Instruction::SET_PRODUCTION.0, 1, 0, &[]);
    assert_eq!(status_of(&body), Status::SUCCESS.0);

    let token = make_token(1, 10, &DEVICE_DATA);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 0, &token);
    assert_eq!(status_of(&body), Status::SUCCESS.0);

    let (body, _) = exec(&mut drivers, Instruction::GET_LOCK.0, LOCK_CARRIER, 1, &[]);
    assert_eq!(body[2], 0);
    // The accepted nonce is recorded against replay.
    assert_eq!(&body[3..11], &10u64.to_le_bytes());
}

#[test]
fn test_carrier_unlock_replay_rejected() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    let token = make_token(1, 10, &DEVICE_DATA);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 0, &token);
    assert_eq!(status_of(&body), Status::SUCCESS.0);

    // Relock, then replay: the recorded nonce refuses the old token.
    exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 0, &token);
    assert_eq!(status_of(&body), Status::AUTH.0);

    let fresh_token = make_token(1, 11, &DEVICE_DATA);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 0, &fresh_token);
    assert_eq!(status_of(&body), Status::SUCCESS.0);
}

#[test]
fn test_carrier_unlock_bad_signature_rejected() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    let mut token = make_token(1, 10, &DEVICE_DATA);
    token[20] ^= 0xff;
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 0, &token);
    assert_eq!(status_of(&body), Status::AUTH.0);
    // Still locked.
    let (body, _) = exec(&mut drivers, Instruction::GET_LOCK.0, LOCK_CARRIER, 0, &[]);
    assert_eq!(body[2], 1);
}

#[test]
fn test_locked_carrier_blocks_boot() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_CARRIER, 1, &DEVICE_DATA);
    drivers.set_in_bootloader(true);
    let (body, _) = exec(&mut drivers, Instruction::SET_LOCK.0, LOCK_BOOT, 1, &[]);
    assert_eq!(status_of(&body), Status::DEPENDENCY.0);
}

#[test]
fn test_carrier_lock_test_is_pure() {
    let mut drivers = install_fresh();
    let (before, _) = exec(&mut drivers, Instruction::GET_STATE.0, 0, 0, &[]);

    let token = make_token(1, 10, &DEVICE_DATA);
    let vector = make_test_vector(5, &DEVICE_DATA, &token);
    let (body, _) = exec(&mut drivers, Instruction::CARRIER_LOCK_TEST.0, 0, 0, &vector);
    assert_eq!(status_of(&body), Status::SUCCESS.0);

    // Stale nonce in the hypothetical state: refused.
    let vector = make_test_vector(10, &DEVICE_DATA, &token);
    let (body, _) = exec(&mut drivers, Instruction::CARRIER_LOCK_TEST.0, 0, 0, &vector);
    assert_eq!(status_of(&body), Status::AUTH.0);

    // Corrupted signature: refused.
    let mut bad_token = make_token(1, 10, &DEVICE_DATA);
    bad_token[30] ^= 0x01;
    let vector = make_test_vector(5, &DEVICE_DATA, &bad_token);
    let (body, _) = exec(&mut drivers, Instruction::CARRIER_LOCK_TEST.0, 0, 0, &vector);
    assert_eq!(status_of(&body), Status::AUTH.0);

    // Wrong payload size: a metadata error.
    let (body, _) = exec(&mut drivers, Instruction::CARRIER_LOCK_TEST.0, 0, 0, &vector[1..]);
    assert_eq!(status_of(&body), Status::METADATA.0);

    // None of it touched persisted state.
    let (after, _) = exec(&mut drivers, Instruction::GET_STATE.0, 0, 0, &[]);
    assert_eq!(before, after);
}
