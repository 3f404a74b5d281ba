//! Tests for assignment statements

use super::super::*;
use super::helpers::{build_vm, output_of, text, var};
use maplit::hashmap;

#[test]
fn test_reassignment() {
    assert_eq!(output_of("x = 1; x = x + 10; PRINTN(x);"), "11\n");
}

#[test]
fn test_assign_changes_type() {
    assert_eq!(output_of("x = 1; x = \"one\"; PRINT(x);"), "one\n");
}

#[test]
fn test_assign_string_expression() {
    assert_eq!(
        output_of("greeting = \"hello\" + \", \" + \"world\"; PRINT(greeting);"),
        "hello, world\n"
    );
}

#[test]
fn test_assign_overwrites_registered_global() {
    let (mut vm, transcript) = build_vm("LIVES = LIVES - 1; PRINTN(LIVES);", hashmap! { "LIVES" => 3 });
    run_until_done(&mut vm);
    assert_eq!(transcript.text(), "2\n");
}

#[test]
fn test_variable_visible_mid_run() {
    let (mut vm, _) = build_vm("x = 5; y = \"s\"; SLEEP(1);", hashmap! {});

    // Run until the script sleeps; both variables exist by then
    assert!(run_until_done(&mut vm));
    assert_eq!(var(&vm, "x"), Some(Val::Int(5)));
    let y = var(&vm, "y").expect("y is defined");
    assert_eq!(text(&vm, y), "s");
}

#[test]
fn test_assign_does_not_add_symbols_on_repeat() {
    let (mut vm, _) = build_vm("i = 0; WHILE i < 50; i = i + 1; END SLEEP(1);", hashmap! {});
    let before = vm.symbols.len();

    assert!(run_until_done(&mut vm));
    assert_eq!(vm.symbols.len(), before + 1);
    assert_eq!(var(&vm, "i"), Some(Val::Int(50)));
}
