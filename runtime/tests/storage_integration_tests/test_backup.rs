// Licensed under the Apache-2.0 license

use crate::common::{config, exec, install_fresh, status_of, RECOGNIZED_CALLER};
use bootvault_api::{Instruction, Status, MAX_RESP_SIZE};
use bootvault_drivers::{CallerId, Capability, Role};
use bootvault_runtime::Drivers;

fn backup_blob(drivers: &Drivers) -> Vec<u8> {
    let capability = drivers.capability(&RECOGNIZED_CALLER, Role::BackupTracking);
    let Capability::Tracker(token) = capability else {
        panic!("recognized caller should receive the tracker capability");
    };
    let mut blob = vec![0u8; MAX_RESP_SIZE];
    let len = drivers.backup_blob(&token, &mut blob).unwrap();
    blob.truncate(len);
    blob
}

#[test]
fn test_restore_round_trip_reproduces_state() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::SET_LOCK.0, 1, 3, &[]);
    exec(&mut drivers, Instruction::STORE.0, 0, 0, &7u64.to_be_bytes());
    exec(&mut drivers, Instruction::SET_LOCK.0, 0, 1, &[0x42; 32]);
    let (original_state, _) = exec(&mut drivers, Instruction::GET_STATE.0, 0, 0, &[]);

    let blob = backup_blob(&drivers);

    // Install with zero parameters and the blob: the upgrade path.
    let mut upgraded = Drivers::install(config(), &[], Some(blob.as_slice())).unwrap();
    let (restored_state, _) = exec(&mut upgraded, Instruction::GET_STATE.0, 0, 0, &[]);
    assert_eq!(original_state, restored_state);

    // Observable state survived: slot value and lock codes.
    let (body, _) = exec(&mut upgraded, Instruction::LOAD.0, 0, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 7);
    let (body, _) = exec(&mut upgraded, Instruction::GET_LOCK.0, 1, 0, &[]);
    assert_eq!(body[2], 3);
    let (body, _) = exec(&mut upgraded, Instruction::GET_LOCK.0, 0, 0, &[]);
    assert_eq!(body[2], 1);
}

#[test]
fn test_restore_keeps_rollback_protection() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::STORE.0, 0, 0, &9u64.to_be_bytes());
    let blob = backup_blob(&drivers);

    let mut upgraded = Drivers::install(config(), &[], Some(blob.as_slice())).unwrap();
    let (body, _) = exec(&mut upgraded, Instruction::STORE.0, 0, 0, &4u64.to_be_bytes());
    assert_eq!(status_of(&body), Status::ROLLBACK.0);
}

#[test]
fn test_invalid_blob_falls_back_to_fresh_install() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::SET_LOCK.0, 1, 1, &[]);
    let mut blob = backup_blob(&drivers);
    blob[0] = 0x7f; // unknown format version

    let mut fallback = Drivers::install(config(), &[], Some(blob.as_slice())).unwrap();
    let (body, _) = exec(&mut fallback, Instruction::GET_LOCK.0, 1, 0, &[]);
    assert_eq!(body[2], 0);
    let (body, _) = exec(&mut fallback, Instruction::LOAD.0, 0, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 0);
}

#[test]
fn test_nonzero_install_params_force_fresh_state() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::SET_LOCK.0, 1, 1, &[]);
    let blob = backup_blob(&drivers);

    // Explicit install parameters win over an available blob.
    let mut fresh = Drivers::install(config(), &[0x01], Some(blob.as_slice())).unwrap();
    let (body, _) = exec(&mut fresh, Instruction::GET_LOCK.0, 1, 0, &[]);
    assert_eq!(body[2], 0);
}

#[test]
fn test_capability_issue_fails_open() {
    let drivers = install_fresh();
    assert!(matches!(
        drivers.capability(&RECOGNIZED_CALLER, Role::StateMutation),
        Capability::Owner(_)
    ));
    assert!(matches!(
        drivers.capability(&RECOGNIZED_CALLER, Role::BackupTracking),
        Capability::Tracker(_)
    ));
    let stranger = CallerId([0x00; 16]);
    assert!(matches!(
        drivers.capability(&stranger, Role::StateMutation),
        Capability::ReadOnly
    ));
    assert!(matches!(
        drivers.capability(&stranger, Role::BackupTracking),
        Capability::ReadOnly
    ));
}
