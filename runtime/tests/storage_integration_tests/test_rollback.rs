// Licensed under the Apache-2.0 license

use crate::common::{exec, install_fresh, status_of};
use bootvault_api::{Instruction, Status};

#[test]
fn test_set_then_get_round_trip() {
    // Scenario C, first half.
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::STORE.0, 0, 0, &5u64.to_be_bytes());
    assert_eq!(status_of(&body), Status::SUCCESS.0);

    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 0, 0, &[]);
    assert_eq!(status_of(&body), Status::SUCCESS.0);
    assert_eq!(body.len(), 10);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 5);
}

#[test]
fn test_rollback_rejected_and_value_retained() {
    // Scenario C, second half.
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::STORE.0, 0, 0, &5u64.to_be_bytes());
    let (body, _) = exec(&mut drivers, Instruction::STORE.0, 0, 0, &3u64.to_be_bytes());
    assert_eq!(status_of(&body), Status::ROLLBACK.0);

    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 0, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 5);
}

#[test]
fn test_non_decreasing_sequence_is_allowed() {
    let mut drivers = install_fresh();
    for value in [0u64, 1, 1, 4, 900] {
        let (body, _) = exec(&mut drivers, Instruction::STORE.0, 2, 0, &value.to_be_bytes());
        assert_eq!(status_of(&body), Status::SUCCESS.0);
    }
    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 2, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 900);
}

#[test]
fn test_slot_out_of_range() {
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 8, 0, &[]);
    assert_eq!(status_of(&body), Status::RANGE.0);
    assert_eq!(body.len(), 2);

    let (body, _) = exec(&mut drivers, Instruction::STORE.0, 8, 0, &1u64.to_be_bytes());
    assert_eq!(status_of(&body), Status::RANGE.0);
}

#[test]
fn test_store_payload_must_be_slot_sized() {
    let mut drivers = install_fresh();
    let (body, _) = exec(&mut drivers, Instruction::STORE.0, 0, 0, &[1, 2, 3]);
    assert_eq!(status_of(&body), Status::METADATA.0);
    // The slot is untouched.
    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 0, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 0);
}

#[test]
fn test_slots_are_independent() {
    let mut drivers = install_fresh();
    exec(&mut drivers, Instruction::STORE.0, 1, 0, &7u64.to_be_bytes());
    exec(&mut drivers, Instruction::STORE.0, 3, 0, &2u64.to_be_bytes());
    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 1, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 7);
    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 3, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 2);
    let (body, _) = exec(&mut drivers, Instruction::LOAD.0, 0, 0, &[]);
    assert_eq!(u64::from_be_bytes(body[2..10].try_into().unwrap()), 0);
}
