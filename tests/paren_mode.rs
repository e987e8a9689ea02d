//! Paren Mode: close-parens are authoritative, indentation follows.

use parinfer::{paren_mode, ErrorName, Options};
use rstest::rstest;

fn transform(text: &str) -> parinfer::Answer {
    paren_mode(text, &Options::default())
}

#[rstest]
#[case::child_pushed_inside_its_opener("(foo\nbar)", "(foo\n bar)")]
#[case::valid_indent_within_range_kept("(foo\n  bar)", "(foo\n  bar)")]
#[case::nested_form_untouched("(foo\n  (bar)\n  baz)", "(foo\n  (bar)\n  baz)")]
#[case::indent_clamped_to_max_child_indent(
    "(foo\n  (bar)\n      baz)",
    "(foo\n  (bar)\n  baz)"
)]
#[case::top_level_line_dedented_after_form_closes("(foo)\n  bar", "(foo)\nbar")]
#[case::leading_close_paren_joins_previous_trail("(foo\n)", "(foo)\n")]
#[case::crlf_input_normalized_to_lf("(foo\r\nbar)", "(foo\n bar)")]
#[case::plain_text("hello world", "hello world")]
fn test_paren_mode_text(#[case] input: &str, #[case] expected: &str) {
    let answer = transform(input);
    assert!(answer.success, "expected success, got {:?}", answer.error);
    assert_eq!(answer.text, expected);
}

#[test]
fn test_unclosed_paren_fails() {
    let answer = transform("(foo");
    assert!(!answer.success);
    assert_eq!(answer.text, "(foo");
    let error = answer.error.expect("failure carries an error");
    assert_eq!(error.name, ErrorName::UnclosedParen);
    assert_eq!((error.line_no, error.x), (1, 1));
}

#[test]
fn test_unclosed_paren_points_at_the_outermost_opener() {
    let answer = transform("(foo\n  (bar");
    let error = answer.error.expect("failure carries an error");
    assert_eq!(error.name, ErrorName::UnclosedParen);
    assert_eq!((error.line_no, error.x), (1, 1));
}

#[test]
fn test_unmatched_close_paren_fails_with_opener_hint() {
    let answer = transform("(foo]");
    assert!(!answer.success);
    let error = answer.error.expect("failure carries an error");
    assert_eq!(error.name, ErrorName::UnmatchedCloseParen);
    assert_eq!((error.line_no, error.x), (1, 5));
    let extra = error.extra.expect("hint at the open paren");
    assert_eq!(extra.name, ErrorName::UnmatchedOpenParen);
    assert_eq!((extra.line_no, extra.x), (1, 1));
}

#[test]
fn test_extra_close_paren_fails_without_hint() {
    let answer = transform("(foo))");
    assert!(!answer.success);
    let error = answer.error.expect("failure carries an error");
    assert_eq!(error.name, ErrorName::UnmatchedCloseParen);
    assert_eq!((error.line_no, error.x), (1, 6));
    assert!(error.extra.is_none());
}

#[test]
fn test_indent_shift_drags_the_cursor() {
    let options = Options {
        cursor_line: Some(2),
        cursor_x: Some(2),
        ..Options::default()
    };
    let answer = paren_mode("(foo\nbar)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(foo\n bar)");
    assert_eq!(answer.cursor_line, Some(2));
    assert_eq!(answer.cursor_x, Some(3));
}

#[test]
fn test_remembered_trail_after_append() {
    let answer = transform("(foo\n)");
    assert!(answer.success);
    let trails = answer.paren_trails.expect("trails on success");
    assert_eq!(trails.len(), 1);
    assert_eq!(trails[0].line_no, 1);
    assert_eq!(trails[0].start_x, 5);
    assert_eq!(trails[0].end_x, 6);
}

#[test]
fn test_failure_keeps_original_text() {
    let answer = transform("(foo\nbar");
    assert!(!answer.success);
    assert_eq!(answer.text, "(foo\nbar");
    assert!(answer.paren_trails.is_none());
}
