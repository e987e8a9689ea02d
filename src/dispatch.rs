//! Character dispatch: the per-character heart of a pass.
//!
//! Each character is routed by priority (escape first, then parens, quote,
//! comment, backslash, tab, newline), mutating the paren stack and the
//! current paren trail. A handler may rewrite the character (`""` deletes
//! it, a tab becomes two spaces); `commit_char` splices the rewrite into
//! the output line afterwards.

use crate::error::{cache_error_pos, raise, Abort, ErrorName, Restart, Step};
use crate::paren_trail::reset_paren_trail;
use crate::state::{ArgTabStop, Closer, Mode, Opener, State};

pub(crate) const DOUBLE_SPACE: &str = "  ";

pub(crate) fn is_open_paren(ch: &str) -> bool {
    matches!(ch, "(" | "[" | "{")
}

pub(crate) fn is_close_paren(ch: &str) -> bool {
    matches!(ch, ")" | "]" | "}")
}

pub(crate) fn is_close_paren_char(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}')
}

/// The partner of a paren character, in either direction.
pub(crate) fn match_paren(ch: char) -> char {
    match ch {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        other => other,
    }
}

pub(crate) fn is_comment_char(state: &State, ch: &str) -> bool {
    let mut chars = ch.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => state.comment_chars.contains(&c),
        _ => false,
    }
}

/// Does the close-paren under the cursor match the opener on top of the
/// stack?
pub(crate) fn is_valid_close_paren(state: &State, ch: &str) -> bool {
    let close = match ch.chars().next() {
        Some(c) => c,
        None => return false,
    };
    match state.paren_stack.last() {
        Some(&id) => state.openers[id].ch == match_paren(close),
        None => false,
    }
}

pub(crate) fn is_whitespace(state: &State) -> bool {
    !state.is_escaped && (state.ch == " " || state.ch == DOUBLE_SPACE)
}

/// Could the current character be the last of a list element? Anything in
/// code that is not whitespace, not deleted, and not an unescaped closer.
fn is_closable(state: &State) -> bool {
    let ch = state.ch;
    let closer = is_close_paren(ch) && !state.is_escaped;
    state.is_in_code && !is_whitespace(state) && !ch.is_empty() && !closer
}

/// Is the cursor "holding" the trail open between a parent opener and the
/// opener being closed? Raises the release sentinel when a previously
/// holding cursor has let go.
fn check_cursor_holding(state: &State) -> Step<bool> {
    let opener = match state.paren_stack.last() {
        Some(&id) => &state.openers[id],
        None => return Ok(false),
    };
    let parent = state
        .paren_stack
        .len()
        .checked_sub(2)
        .map(|i| &state.openers[state.paren_stack[i]]);

    let hold_min_x = parent.map_or(0, |p| p.x + 1);
    let hold_max_x = opener.x;

    let in_hold_range = |x: Option<usize>, line: Option<usize>| {
        line == Some(opener.line_no) && x.is_some_and(|x| hold_min_x <= x && x <= hold_max_x)
    };

    let holding = in_hold_range(state.cursor_x, state.cursor_line);
    let should_check_prev = state.changes.is_none() && state.prev_cursor_line.is_some();
    if should_check_prev {
        let prev_holding = in_hold_range(state.prev_cursor_x, state.prev_cursor_line);
        if prev_holding && !holding {
            return Err(Abort::Restart(Restart::ReleaseCursorHold));
        }
    }
    Ok(holding)
}

fn track_arg_tab_stop(state: &mut State, tracking: ArgTabStop) {
    match tracking {
        ArgTabStop::Space => {
            if state.is_in_code && is_whitespace(state) {
                state.tracking_arg_tab_stop = Some(ArgTabStop::Arg);
            }
        }
        ArgTabStop::Arg => {
            if !is_whitespace(state) {
                if let Some(&id) = state.paren_stack.last() {
                    state.openers[id].arg_x = Some(state.x);
                }
                state.tracking_arg_tab_stop = None;
            }
        }
    }
}

fn on_open_paren(state: &mut State) {
    if !state.is_in_code {
        return;
    }
    let ch = state.ch.chars().next().unwrap_or('(');
    let opener = Opener {
        input_line_no: state.input_line_no,
        input_x: state.input_x,
        line_no: state.line_no,
        x: state.x,
        ch,
        indent_delta: state.indent_delta,
        max_child_indent: None,
        arg_x: None,
        children: Vec::new(),
        closer: None,
    };
    let id = state.openers.len();
    if state.return_parens {
        match state.paren_stack.last() {
            Some(&parent) => state.openers[parent].children.push(id),
            None => state.parens.push(id),
        }
    }
    state.openers.push(opener);
    state.paren_stack.push(id);
    state.tracking_arg_tab_stop = Some(ArgTabStop::Space);
}

pub(crate) fn set_closer(opener: &mut Opener, line_no: usize, x: usize, ch: char) {
    opener.closer = Some(Closer {
        line_no,
        x,
        ch,
        trail: None,
    });
}

fn on_matched_close_paren(state: &mut State) -> Step<()> {
    let id = match state.paren_stack.last() {
        Some(&id) => id,
        None => return raise(state, ErrorName::Unhandled),
    };
    if state.return_parens {
        let (line_no, x) = (state.line_no, state.x);
        let ch = state.ch.chars().next().unwrap_or(')');
        set_closer(&mut state.openers[id], line_no, x, ch);
    }

    state.paren_trail.end_x = Some(state.x + 1);
    state.paren_trail.openers.push(id);

    if state.mode == Mode::Indent && state.smart && check_cursor_holding(state)? {
        let orig_start_x = state.paren_trail.start_x;
        let orig_end_x = state.paren_trail.end_x;
        let orig_openers = std::mem::take(&mut state.paren_trail.openers);
        let (line_no, x) = (state.line_no, state.x + 1);
        reset_paren_trail(state, line_no, x);
        state.paren_trail.clamped.start_x = orig_start_x;
        state.paren_trail.clamped.end_x = orig_end_x;
        state.paren_trail.clamped.openers = orig_openers;
    }
    state.paren_stack.pop();
    state.max_indent = Some(state.openers[id].x);
    Ok(())
}

fn on_unmatched_close_paren(state: &mut State) -> Step<()> {
    match state.mode {
        Mode::Paren => {
            // a stray closer in the leading trail of a smart pass is removable
            let trail = &state.paren_trail;
            let in_leading_paren_trail = trail.line_no == Some(state.line_no)
                && trail.start_x.is_some()
                && trail.start_x == state.indent_x;
            let can_remove = state.smart && in_leading_paren_trail;
            if !can_remove {
                return raise(state, ErrorName::UnmatchedCloseParen);
            }
        }
        Mode::Indent => {
            if !state
                .error_pos_cache
                .contains_key(&ErrorName::UnmatchedCloseParen)
            {
                cache_error_pos(state, ErrorName::UnmatchedCloseParen);
                if let Some(&id) = state.paren_stack.last() {
                    let opener = &state.openers[id];
                    let pos = crate::error::ErrorPos {
                        line_no: state.line_no,
                        x: state.x,
                        input_line_no: opener.input_line_no,
                        input_x: opener.input_x,
                    };
                    state
                        .error_pos_cache
                        .insert(ErrorName::UnmatchedOpenParen, pos);
                }
            }
        }
    }
    state.ch = "";
    Ok(())
}

fn on_close_paren(state: &mut State) -> Step<()> {
    if state.is_in_code {
        if is_valid_close_paren(state, state.ch) {
            on_matched_close_paren(state)?;
        } else {
            on_unmatched_close_paren(state)?;
        }
    }
    Ok(())
}

fn on_tab(state: &mut State) {
    if state.is_in_code {
        state.ch = DOUBLE_SPACE;
    }
}

fn on_comment_char(state: &mut State) {
    if state.is_in_code {
        state.is_in_comment = true;
        state.comment_x = Some(state.x);
        state.tracking_arg_tab_stop = None;
    }
}

fn on_newline(state: &mut State) {
    state.is_in_comment = false;
    state.ch = "";
}

fn on_quote(state: &mut State) {
    if state.is_in_str {
        state.is_in_str = false;
    } else if state.is_in_comment {
        state.quote_danger = !state.quote_danger;
        if state.quote_danger {
            cache_error_pos(state, ErrorName::QuoteDanger);
        }
    } else {
        state.is_in_str = true;
        cache_error_pos(state, ErrorName::UnclosedQuote);
    }
}

fn on_backslash(state: &mut State) {
    state.is_escaping = true;
}

fn after_backslash(state: &mut State) -> Step<()> {
    state.is_escaping = false;
    state.is_escaped = true;
    if state.ch == "\n" {
        if state.is_in_code {
            return raise(state, ErrorName::EolBackslash);
        }
        on_newline(state);
    }
    Ok(())
}

/// Route one character, then refresh derived flags, the paren trail, and the
/// arg-tab-stop micro-state.
pub(crate) fn on_char(state: &mut State) -> Step<()> {
    let ch = state.ch;
    state.is_escaped = false;

    if state.is_escaping {
        after_backslash(state)?;
    } else if is_open_paren(ch) {
        on_open_paren(state);
    } else if is_close_paren(ch) {
        on_close_paren(state)?;
    } else if ch == "\"" {
        on_quote(state);
    } else if is_comment_char(state, ch) {
        on_comment_char(state);
    } else if ch == "\\" {
        on_backslash(state);
    } else if ch == "\t" {
        on_tab(state);
    } else if ch == "\n" {
        on_newline(state);
    }

    state.is_in_code = !state.is_in_comment && !state.is_in_str;

    if is_closable(state) {
        let (line_no, x) = (state.line_no, state.x + state.ch.chars().count());
        reset_paren_trail(state, line_no, x);
    }

    if let Some(tracking) = state.tracking_arg_tab_stop {
        track_arg_tab_stop(state, tracking);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_paren() {
        assert_eq!(match_paren('('), ')');
        assert_eq!(match_paren(']'), '[');
        assert_eq!(match_paren('x'), 'x');
    }

    #[test]
    fn test_paren_classification() {
        assert!(is_open_paren("{"));
        assert!(is_close_paren("]"));
        assert!(!is_open_paren("\""));
        assert!(!is_close_paren(""));
    }
}
