//! Tests for WHILE loops

use super::helpers::output_of;

#[test]
fn test_while_simple_loop() {
    assert_eq!(
        output_of("i = 0; WHILE i < 3; PRINTN(i); i = i + 1; END PRINTN(i);"),
        "0\n1\n2\n3\n"
    );
}

#[test]
fn test_while_zero_iterations() {
    assert_eq!(output_of("WHILE 0; PRINTN(1); END PRINTN(2);"), "2\n");
}

#[test]
fn test_while_condition_reevaluated() {
    let source = r#"
        n = 10;
        steps = 0;
        WHILE n != 1
            IF n / 2 * 2 == n
                n = n / 2;
            ELSE
                n = 3 * n + 1;
            END
            steps = steps + 1;
        END
        PRINTN(steps);
    "#;
    // 10 5 16 8 4 2 1
    assert_eq!(output_of(source), "6\n");
}

#[test]
fn test_nested_while() {
    let source = r#"
        i = 0;
        WHILE i < 2
            j = 0;
            WHILE j < 2
                APPEND(i, j, " ");
                j = j + 1;
            END
            i = i + 1;
        END
    "#;
    assert_eq!(output_of(source), "00 01 10 11 \n");
}

#[test]
fn test_while_keeps_body_variables() {
    assert_eq!(
        output_of("i = 0; WHILE i < 1; inner = 9; i = i + 1; END PRINTN(inner);"),
        "9\n"
    );
}
