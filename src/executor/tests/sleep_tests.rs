//! Tests for SLEEP and host time

use super::super::*;
use super::helpers::{build_vm, var};
use maplit::hashmap;

#[test]
fn test_sleep_suspends_until_time_passes() {
    let (mut vm, transcript) = build_vm("PRINTN(1); SLEEP(2); PRINTN(2);", hashmap! {});

    assert!(run_until_done(&mut vm));
    assert_eq!(vm.state(), State::Sleeping);
    assert_eq!(transcript.text(), "1\n");

    // Not enough time: steps do nothing
    vm.advance_time(1.0);
    for _ in 0..10 {
        assert!(vm.step());
    }
    assert_eq!(vm.state(), State::Sleeping);
    assert_eq!(transcript.text(), "1\n");

    vm.advance_time(1.0);
    assert!(!run_until_done(&mut vm));
    assert_eq!(transcript.text(), "1\n2\n");
}

#[test]
fn test_wake_finishes_program_in_same_step() {
    let (mut vm, _) = build_vm("SLEEP(1);", hashmap! {});

    assert!(run_until_done(&mut vm));
    vm.advance_time(1.0);
    assert!(!vm.step());
    assert_eq!(vm.state(), State::Finished);
    assert_eq!(vm.last_fault(), None);
}

#[test]
fn test_zero_sleep_yields_once() {
    let (mut vm, transcript) = build_vm("SLEEP(0); PRINTN(1);", hashmap! {});

    assert!(run_until_done(&mut vm));
    assert_eq!(transcript.text(), "");
    assert!(!run_until_done(&mut vm));
    assert_eq!(transcript.text(), "1\n");
}

#[test]
fn test_sleep_inside_expression_resumes_plan() {
    let (mut vm, transcript) = build_vm("x = 5 + SLEEP(1); PRINTN(x);", hashmap! {});

    assert!(run_until_done(&mut vm));
    assert_eq!(vm.frames.len(), 1);
    assert_eq!(var(&vm, "x"), None);

    vm.advance_time(1.0);
    assert!(!run_until_done(&mut vm));
    // SLEEP returns 0
    assert_eq!(transcript.text(), "5\n");
}

#[test]
fn test_sleep_inside_loop() {
    let (mut vm, transcript) = build_vm("FOR i IN 0..3; PRINTN(i); SLEEP(1); END", hashmap! {});

    let mut ticks = 0;
    while run_until_done(&mut vm) {
        ticks += 1;
        assert_eq!(transcript.lines().len(), ticks);
        vm.advance_time(1.0);
    }
    assert_eq!(ticks, 3);
    assert_eq!(transcript.text(), "0\n1\n2\n");
}

#[test]
fn test_sleep_inside_function() {
    let (mut vm, transcript) = build_vm(
        "FUNC wait(n); SLEEP(n); RETURN n * 2; END PRINTN(wait(3));",
        hashmap! {},
    );

    assert!(run_until_done(&mut vm));
    vm.advance_time(2.5);
    assert!(run_until_done(&mut vm));
    assert_eq!(transcript.text(), "");

    vm.advance_time(0.5);
    assert!(!run_until_done(&mut vm));
    assert_eq!(transcript.text(), "6\n");
}

#[test]
fn test_time_reports_milliseconds() {
    let (mut vm, transcript) = build_vm("PRINTN(TIME()); SLEEP(1); PRINTN(TIME());", hashmap! {});

    assert!(run_until_done(&mut vm));
    vm.advance_time(1.5);
    assert!(!run_until_done(&mut vm));
    assert_eq!(transcript.text(), "0\n1500\n");
}

#[test]
fn test_negative_sleep_is_zero() {
    let (mut vm, transcript) = build_vm("SLEEP(-5); PRINTN(1);", hashmap! {});

    assert!(run_until_done(&mut vm));
    assert!(!run_until_done(&mut vm));
    assert_eq!(transcript.text(), "1\n");
}
