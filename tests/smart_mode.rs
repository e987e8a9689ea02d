//! Smart Mode: Indent Mode that retreats to Paren Mode around cursor events
//! and attributes indentation shifts to the editor's change log.

use parinfer::{indent_mode, smart_mode, Change, Options};

fn change(line_no: usize, x: usize, old_text: &str, new_text: &str) -> Change {
    Change {
        line_no,
        x,
        old_text: old_text.to_string(),
        new_text: new_text.to_string(),
    }
}

#[test]
fn test_leading_close_paren_restarts_in_paren_mode() {
    // plain Indent Mode rejects this; the smart pass reruns it as Paren Mode
    let answer = smart_mode("(foo\n) bar", &Options::default());
    assert!(answer.success);
    assert_eq!(answer.text, "(foo)\nbar");
}

#[test]
fn test_selection_disables_the_smart_fallback() {
    let options = Options {
        selection_start_line: Some(1),
        ..Options::default()
    };
    let answer = smart_mode("(foo\n) bar", &options);
    assert!(!answer.success);
}

#[test]
fn test_indenting_parent_shifts_children() {
    // the user indented line 1 by two; bar follows its parent
    let options = Options {
        changes: vec![change(1, 1, "", "  ")],
        ..Options::default()
    };
    let answer = smart_mode("  (foo\n  bar)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "  (foo\n    bar)");
}

#[test]
fn test_dedenting_parent_shifts_children() {
    let options = Options {
        changes: vec![change(1, 1, "  ", "")],
        ..Options::default()
    };
    let answer = smart_mode("(foo\n    bar)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(foo\n  bar)");
}

#[test]
fn test_without_change_log_child_is_adopted() {
    // same text, but no change record: the indentation is taken at face
    // value and bar stays where the parens put it
    let answer = smart_mode("(foo\n    bar)", &Options::default());
    assert!(answer.success);
    assert_eq!(answer.text, "(foo\n    bar)");
}

#[test]
fn test_released_cursor_hold_restarts_in_paren_mode() {
    // the previous cursor held [b] open from inside; moving away releases
    // the hold and the pass restarts with parens authoritative
    let options = Options {
        prev_cursor_line: Some(1),
        prev_cursor_x: Some(4),
        cursor_line: Some(2),
        cursor_x: Some(1),
        ..Options::default()
    };
    let answer = smart_mode("(a [b]\nc)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(a [b]\n c)");
    assert_eq!(answer.cursor_line, Some(2));
    assert_eq!(answer.cursor_x, Some(2));
}

#[test]
fn test_same_input_without_prev_cursor_stays_in_indent_mode() {
    let options = Options {
        cursor_line: Some(2),
        cursor_x: Some(1),
        ..Options::default()
    };
    let answer = smart_mode("(a [b]\nc)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(a [b])\nc");
}

#[test]
fn test_cursor_holding_between_openers_succeeds() {
    let options = Options {
        cursor_line: Some(1),
        cursor_x: Some(4),
        ..Options::default()
    };
    let answer = smart_mode("(a [b]\nc)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "(a [b])\nc");
}

#[test]
fn test_smart_mode_matches_indent_mode_without_cursor() {
    for text in ["(foo\n  bar\nbaz)", "(foo))", "((a)\n  b)"] {
        let smart = smart_mode(text, &Options::default());
        let indent = indent_mode(text, &Options::default());
        assert_eq!(smart.text, indent.text);
        assert_eq!(smart.success, indent.success);
    }
}

#[test]
fn test_change_delta_shifts_only_pending_lines() {
    // line 2 was indented together with line 1 by the user; the recorded
    // change covers line 1 only, so line 2's own delta matches and no
    // second shift is applied
    let options = Options {
        changes: vec![change(1, 1, "", "  "), change(2, 1, "", "  ")],
        ..Options::default()
    };
    let answer = smart_mode("  (foo\n    bar)", &options);
    assert!(answer.success);
    assert_eq!(answer.text, "  (foo\n    bar)");
}
