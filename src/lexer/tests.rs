//! Lexer tests

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("Tokenize failed")
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_assignment_statement() {
    assert_eq!(
        kinds("x = 1;"),
        vec![
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_two_character_operators() {
    assert_eq!(
        kinds("== != <= >= < > = !"),
        vec![
            TokenKind::EqEq,
            TokenKind::Neq,
            TokenKind::Lte,
            TokenKind::Gte,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Equal,
            TokenKind::Not,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_keywords_are_exact_matches() {
    let tokens = tokenize("IF IFFY END ENDING FUNC").unwrap();

    assert_eq!(tokens[0].keyword, Some(Keyword::If));
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].keyword, Some(Keyword::End));
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert!(tokens[4].is_keyword(Keyword::Func));
}

#[test]
fn test_word_operators_need_a_boundary() {
    assert_eq!(
        kinds("a AND b OR c ANDY ORBIT"),
        vec![
            TokenKind::Identifier,
            TokenKind::And,
            TokenKind::Identifier,
            TokenKind::Or,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_range_in_for_header() {
    let source = "FOR i IN 0..10;";
    let tokens = tokenize(source).unwrap();

    let texts: Vec<&str> = tokens.iter().map(|t| t.span.text(source)).collect();
    assert_eq!(texts, vec!["FOR", "i", "IN", "0", ".", ".", "10", ";", ""]);
}

#[test]
fn test_string_literal_span_includes_quotes() {
    let source = r#"PRINT("hi there");"#;
    let tokens = tokenize(source).unwrap();

    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].span.text(source), "\"hi there\"");
}

#[test]
fn test_unterminated_string_is_an_error() {
    let err = tokenize("x = 1;\nPRINT(\"oops);").unwrap_err();

    assert_eq!(err.code(), Some(errors::UNTERMINATED_STRING));
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_comments_and_whitespace_are_skipped() {
    let source = "# header comment\n  x = 2; # trailing\n";
    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Identifier,
            TokenKind::Equal,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_unexpected_character_stops_the_stream() {
    let tokens = tokenize("x = 1 @ 2;").unwrap();

    let last = tokens.last().unwrap();
    assert_eq!(last.kind, TokenKind::Unexpected);
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_next_token_is_resumable_from_cursor() {
    let source = "a + b";
    let (first, cursor) = next_token(source, 0).unwrap();
    let (second, cursor) = next_token(source, cursor).unwrap();
    let (third, _) = next_token(source, cursor).unwrap();

    assert_eq!(first.kind, TokenKind::Identifier);
    assert_eq!(second.kind, TokenKind::Plus);
    assert_eq!(third.span, Span::new(4, 5));
}

#[test]
fn test_line_numbers() {
    let source = "a\nb\n\nc";
    let tokens = tokenize(source).unwrap();

    let lines: Vec<usize> = tokens.iter().map(|t| t.span.line_in(source)).collect();
    assert_eq!(lines, vec![1, 2, 4, 4]);
}
