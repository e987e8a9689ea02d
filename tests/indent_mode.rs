//! Indent Mode: indentation is authoritative, trailing close-parens follow.

use parinfer::{indent_mode, Options};
use rstest::rstest;

fn transform(text: &str) -> parinfer::Answer {
    indent_mode(text, &Options::default())
}

#[rstest]
#[case::balanced_form_unchanged("(foo\n  bar)", "(foo\n  bar)")]
#[case::indented_child_stays_inside("(def foo\n  [1 2 3])", "(def foo\n  [1 2 3])")]
#[case::dedent_closes_the_form("(foo\n  bar\nbaz)", "(foo\n  bar)\nbaz")]
#[case::stray_trailing_close_dropped("(foo))", "(foo)")]
#[case::mismatched_close_dropped_and_closed("(foo]", "(foo)")]
#[case::unclosed_form_gets_closed("(foo", "(foo)")]
#[case::trailing_space_before_close_collapses("(foo )", "(foo)")]
#[case::deeper_indent_reopens_inner_form("((a)\n  b)", "((a\n  b))")]
#[case::tab_becomes_two_spaces("(foo\n\tbar)", "(foo\n  bar)")]
#[case::comment_does_not_anchor_indent("(foo ; bar\n  baz)", "(foo ; bar\n  baz)")]
#[case::close_paren_in_string_ignored("(foo \"a)\"\n  bar)", "(foo \"a)\"\n  bar)")]
#[case::string_spans_lines("(foo \"bar\nbaz\")", "(foo \"bar\nbaz\")")]
#[case::empty_input("", "")]
#[case::plain_text("hello world", "hello world")]
fn test_indent_mode_text(#[case] input: &str, #[case] expected: &str) {
    let answer = transform(input);
    assert!(answer.success, "expected success, got {:?}", answer.error);
    assert_eq!(answer.text, expected);
}

#[test]
fn test_trailing_newline_is_preserved() {
    let answer = transform("(foo\n  bar)\n");
    assert!(answer.success);
    assert_eq!(answer.text, "(foo\n  bar)\n");
}

#[test]
fn test_paren_trails_are_reported() {
    let answer = transform("(foo\n  bar)");
    let trails = answer.paren_trails.expect("trails on success");
    assert_eq!(trails.len(), 1);
    assert_eq!(trails[0].line_no, 2);
    assert_eq!(trails[0].start_x, 6);
    assert_eq!(trails[0].end_x, 7);
}

#[test]
fn test_cursor_is_preserved_when_nothing_moves() {
    let options = Options {
        cursor_line: Some(1),
        cursor_x: Some(4),
        ..Options::default()
    };
    let answer = indent_mode("(foo)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(foo)");
    assert_eq!(answer.cursor_line, Some(1));
    assert_eq!(answer.cursor_x, Some(4));
}

#[test]
fn test_cursor_holds_space_before_trail() {
    // without a cursor the space collapses; with the cursor on the closer
    // the trail is clamped to it and the space survives
    let options = Options {
        cursor_line: Some(1),
        cursor_x: Some(6),
        ..Options::default()
    };
    let answer = indent_mode("(foo )", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(foo )");
    assert_eq!(answer.cursor_x, Some(6));
}

#[test]
fn test_leading_close_paren_alone_is_absorbed() {
    let answer = transform("(foo\n)");
    assert!(answer.success);
    assert_eq!(answer.text, "(foo)\n");
}

#[test]
fn test_force_balance_drops_leading_close_before_code() {
    let options = Options {
        force_balance: true,
        ..Options::default()
    };
    let answer = indent_mode("(foo\n) bar", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(foo\n bar)");
}

#[test]
fn test_tab_stops_on_cursor_line() {
    let options = Options {
        cursor_line: Some(2),
        cursor_x: Some(3),
        ..Options::default()
    };
    let answer = indent_mode("(foo bar\n  baz", &options);
    assert!(answer.success);
    assert_eq!(answer.tab_stops.len(), 1);
    let stop = &answer.tab_stops[0];
    assert_eq!(stop.ch, '(');
    assert_eq!(stop.line_no, 1);
    assert_eq!(stop.x, 1);
    // first argument of the form sits after "(foo "
    assert_eq!(stop.arg_x, Some(6));
}

#[test]
fn test_return_parens_reports_the_opener_tree() {
    let options = Options {
        return_parens: true,
        ..Options::default()
    };
    let answer = indent_mode("(foo [a])", &options);
    assert!(answer.success);
    let parens = answer.parens.expect("opener tree requested");
    assert_eq!(parens.len(), 1);

    let root = &parens[0];
    assert_eq!(root.ch, '(');
    assert_eq!((root.line_no, root.x), (1, 1));
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].ch, '[');
    assert_eq!(root.children[0].x, 6);

    let closer = root.closer.expect("matched opener has a closer");
    assert_eq!(closer.ch, ')');
    assert_eq!((closer.line_no, closer.x), (1, 9));
}

#[test]
fn test_custom_comment_chars() {
    let options = Options {
        comment_chars: vec!['#'],
        ..Options::default()
    };
    // '#' starts the comment, so the close-paren after it is not code
    let answer = indent_mode("(foo # )\n  bar)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(foo # )\n  bar)");
}
