#[macro_use]
mod macros;

error!(
    mixed_indentation,
    "a\n  color: red\n\tmargin: 0\n",
    "mixes tabs and spaces"
);

error!(unterminated_string, "a\n  content: 'oops\n", "unterminated string");

error!(
    unterminated_block_comment,
    "/* never closed\na\n  color: red\n",
    "unterminated block comment"
);

error!(illegal_character, "a\n  width: 1 | 2\n", "illegal character");

#[test]
fn errors_carry_kind_and_location() {
    let err = stylet::from_string(
        "a\n  width: 1px + true\n".to_string(),
        &stylet::Options::default(),
    )
    .expect_err("coercion should fail");
    assert_eq!(err.kind(), stylet::ErrorKind::Type);

    let rendered = err.to_string();
    assert!(rendered.contains("TypeError"), "got {:?}", rendered);
    assert!(rendered.contains("stdin:2:"), "got {:?}", rendered);
}

#[test]
fn errors_include_call_trace() {
    let err = stylet::from_string(
        "inner()\n  return 1px + true\nouter()\n  return inner()\na\n  width: outer()\n".to_string(),
        &stylet::Options::default(),
    )
    .expect_err("coercion should fail");

    let rendered = err.to_string();
    assert!(rendered.contains("at inner() (stdin:4)"), "got {:?}", rendered);
    assert!(rendered.contains("at outer() (stdin:6)"), "got {:?}", rendered);
}

#[test]
fn lex_error_reports_line() {
    let err = stylet::from_string(
        "a\n  content: 'oops\n".to_string(),
        &stylet::Options::default(),
    )
    .expect_err("string should be unterminated");
    assert_eq!(err.kind(), stylet::ErrorKind::Lex);
    assert!(err.to_string().contains("stdin:2:"), "got {}", err);
}
