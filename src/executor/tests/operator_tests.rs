//! Tests for arithmetic, comparison and string operators

use super::helpers::output_of;

#[test]
fn test_arithmetic() {
    assert_eq!(
        output_of("PRINTN(7 / 2); PRINTN(-7 / 2); PRINTN(2 - 3 * 4); PRINTN((2 - 3) * 4);"),
        "3\n-3\n-10\n-4\n"
    );
}

#[test]
fn test_left_associative() {
    assert_eq!(output_of("PRINTN(10 - 3 - 2); PRINTN(24 / 4 / 2);"), "5\n3\n");
}

#[test]
fn test_wrapping_overflow() {
    assert_eq!(
        output_of("PRINTN(2147483647 + 1); PRINTN(-2147483647 - 2);"),
        "-2147483648\n2147483647\n"
    );
}

#[test]
fn test_unary() {
    assert_eq!(
        output_of("x = 3; PRINTN(-x); PRINTN(--x); PRINTN(!0); PRINTN(!5); PRINTN(!\"\");"),
        "-3\n3\n1\n0\n1\n"
    );
}

#[test]
fn test_number_comparisons() {
    assert_eq!(
        output_of(
            "PRINTN(1 < 2); PRINTN(2 <= 2); PRINTN(3 > 4); PRINTN(3 >= 4); PRINTN(1 == 1); PRINTN(1 != 1);"
        ),
        "1\n1\n0\n0\n1\n0\n"
    );
}

#[test]
fn test_string_comparisons() {
    assert_eq!(
        output_of(
            "PRINTN(\"abc\" == \"abc\"); PRINTN(\"a\" < \"b\"); PRINTN(\"b\" <= \"a\"); PRINTN(\"abc\" != \"abd\");"
        ),
        "1\n1\n0\n1\n"
    );
}

#[test]
fn test_mixed_equality_is_false() {
    assert_eq!(
        output_of("PRINTN(\"1\" == 1); PRINTN(\"1\" != 1);"),
        "0\n1\n"
    );
}

#[test]
fn test_concatenation() {
    assert_eq!(
        output_of("PRINT(\"n=\" + 5); PRINT(5 + \"!\"); PRINT(\"a\" + \"b\" + 1 + 2);"),
        "n=5\n5!\nab12\n"
    );
}

#[test]
fn test_numbers_add_before_concatenation() {
    // (1 + 2) + "x"
    assert_eq!(output_of("PRINT(1 + 2 + \"x\");"), "3x\n");
}
