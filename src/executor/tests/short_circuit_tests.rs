//! Tests for AND / OR evaluation

use super::helpers::output_of;

const NOISY: &str = "FUNC noisy(v); PRINT(\"called\"); RETURN v; END ";

fn with_noisy(body: &str) -> String {
    output_of(&format!("{}{}", NOISY, body))
}

#[test]
fn test_and_skips_right_when_left_false() {
    assert_eq!(with_noisy("x = 0 AND noisy(1); PRINTN(x);"), "0\n");
}

#[test]
fn test_or_skips_right_when_left_true() {
    assert_eq!(with_noisy("x = 2 OR noisy(0); PRINTN(x);"), "1\n");
}

#[test]
fn test_right_evaluated_when_needed() {
    assert_eq!(
        with_noisy("x = 1 AND noisy(5); PRINTN(x);"),
        "called\n1\n"
    );
    assert_eq!(
        with_noisy("x = 0 OR noisy(0); PRINTN(x);"),
        "called\n0\n"
    );
}

#[test]
fn test_results_are_zero_or_one() {
    assert_eq!(
        output_of("PRINTN(5 AND 3); PRINTN(0 OR 7); PRINTN(0 OR 0); PRINTN(4 AND 0);"),
        "1\n1\n0\n0\n"
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    // 1 OR (0 AND 0)
    assert_eq!(output_of("PRINTN(1 OR 0 AND 0);"), "1\n");
    // (0 AND 1) OR 1
    assert_eq!(output_of("PRINTN(0 AND 1 OR 1);"), "1\n");
}

#[test]
fn test_string_operands() {
    assert_eq!(
        output_of("PRINTN(\"\" OR \"a\"); PRINTN(\"a\" AND \"\");"),
        "1\n0\n"
    );
}

#[test]
fn test_short_circuit_in_conditions() {
    let source = r#"
        FUNC guard(n); RETURN 10 / n > 1; END
        FOR n IN 0..3
            IF n != 0 AND guard(n)
                PRINTN(n);
            END
        END
    "#;
    assert_eq!(output_of(source), "1\n2\n");
}
