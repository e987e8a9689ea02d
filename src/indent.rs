//! Indentation handling: what happens at the first meaningful character of
//! each line.
//!
//! Indent Mode corrects the previous line's paren trail to reflect the new
//! indentation; Paren Mode corrects the indentation to fit the parens that
//! already exist. Both directions share the parent-opener resolution that
//! decides which opener claims a line as its child.

use crate::dispatch::{is_close_paren, is_comment_char, is_valid_close_paren};
use crate::error::{cache_error_pos, make_error, raise, Abort, ErrorName, Restart, Step};
use crate::paren_trail::{
    append_paren_trail, correct_paren_trail, is_cursor_left_of, reset_paren_trail,
};
use crate::state::{clamp, peek, replace_within_line, Mode, OpenerId, State};

/// Shift the current line's leading whitespace by `delta` columns.
pub(crate) fn add_indent(state: &mut State, delta: i64) {
    let orig_indent = state.x;
    let new_indent = (orig_indent as i64 + delta).max(0) as usize;
    let indent_str = " ".repeat(new_indent);
    let line_no = state.line_no;
    replace_within_line(state, line_no, 0, orig_indent, &indent_str);
    state.x = new_indent;
    state.indent_x = Some(new_indent);
    state.indent_delta += delta;
}

/// An opener's pending shift only applies if the user has not already
/// applied it to this line (which happens when multiple lines are indented
/// together).
fn should_add_opener_indent(state: &State, id: OpenerId) -> bool {
    state.openers[id].indent_delta != state.indent_delta
}

/// Find the index from the top of the paren stack of the opener that claims
/// a line indented at `indent_x` as its child.
///
/// Each opener is tested in both coordinate spaces: where it sits now
/// (`curr_outside`) and where it sat before pending shifts (`prev_outside`).
/// Disagreement between the two is where fragmentation is prevented and
/// adoption is decided.
pub(crate) fn parent_opener_index(state: &mut State, indent_x: usize) -> usize {
    let len = state.paren_stack.len();
    for i in 0..len {
        let id = state.paren_stack[len - 1 - i];
        let opener_x = state.openers[id].x as i64;
        let opener_delta = state.openers[id].indent_delta;

        let curr_outside = opener_x < indent_x as i64;
        let prev_indent_x = indent_x as i64 - state.indent_delta;
        let prev_outside = opener_x - opener_delta < prev_indent_x;

        let is_parent = match (prev_outside, curr_outside) {
            (true, true) => true,
            (false, false) => false,
            (true, false) => {
                // the line moved left past this opener; keep the child with
                // its old parent unless the line itself was shifted
                state.indent_delta == 0
            }
            (false, true) => {
                // the line moved right past this opener; adoption
                let next = peek(&state.paren_stack, i + 1);
                let adopted = match next {
                    Some(next_id) => {
                        let next_delta = state.openers[next_id].indent_delta;
                        if next_delta <= opener_delta {
                            indent_x as i64 + next_delta > opener_x
                        } else {
                            true
                        }
                    }
                    None => state.indent_delta > opener_delta,
                };
                if adopted {
                    // pending shift was reserved for previous child lines
                    state.openers[id].indent_delta = 0;
                }
                adopted
            }
        };

        if is_parent {
            return i;
        }
    }
    len
}

/// Clamp the current indent into the range its parent opener allows and
/// apply any pending shift (Paren Mode).
fn correct_indent(state: &mut State) {
    let orig_indent = state.x as i64;
    let mut new_indent = orig_indent;
    let mut min_indent: i64 = 0;
    let mut max_indent = state.max_indent;

    if let Some(&id) = state.paren_stack.last() {
        let opener_x = state.openers[id].x;
        min_indent = opener_x as i64 + 1;
        max_indent = state.openers[id].max_child_indent;
        if should_add_opener_indent(state, id) {
            new_indent += state.openers[id].indent_delta;
        }
    }

    new_indent = clamp(new_indent, Some(min_indent), max_indent.map(|m| m as i64));

    if new_indent != orig_indent {
        add_indent(state, new_indent - orig_indent);
    }
}

/// The first code character of a line fixes its indentation point.
pub(crate) fn on_indent(state: &mut State) -> Step<()> {
    state.tracking_indent = false;

    if state.quote_danger {
        return raise(state, ErrorName::QuoteDanger);
    }

    match state.mode {
        Mode::Indent => {
            state.indent_x = Some(state.x);
            let indent_x = state.x;
            correct_paren_trail(state, indent_x);

            if let Some(&id) = state.paren_stack.last() {
                if should_add_opener_indent(state, id) {
                    let delta = state.openers[id].indent_delta;
                    add_indent(state, delta);
                }
            }
        }
        Mode::Paren => correct_indent(state),
    }
    Ok(())
}

/// A close-paren as the first character of a line.
fn on_leading_close_paren(state: &mut State) -> Step<()> {
    match state.mode {
        Mode::Indent => {
            if !state.force_balance {
                if state.smart {
                    return Err(Abort::Restart(Restart::LeadingCloseParen));
                }
                if !state
                    .error_pos_cache
                    .contains_key(&ErrorName::LeadingCloseParen)
                {
                    cache_error_pos(state, ErrorName::LeadingCloseParen);
                }
            }
            state.skip_char = true;
        }
        Mode::Paren => {
            if !is_valid_close_paren(state, state.ch) {
                if state.smart {
                    state.skip_char = true;
                } else {
                    return raise(state, ErrorName::UnmatchedCloseParen);
                }
            } else if is_cursor_left_of(
                state.cursor_x,
                state.cursor_line,
                Some(state.x),
                state.line_no,
            ) {
                let (line_no, x) = (state.line_no, state.x);
                reset_paren_trail(state, line_no, x);
                on_indent(state)?;
            } else {
                append_paren_trail(state)?;
                state.skip_char = true;
            }
        }
    }
    Ok(())
}

/// A comment as the first non-whitespace of a line is shifted with its
/// parent but does not count as an indentation anchor.
fn on_comment_line(state: &mut State) {
    let trail_len = state.paren_trail.openers.len();

    // resolve the parent as if the previous trail were still open
    if state.mode == Mode::Paren {
        for j in 0..trail_len {
            let id = state.paren_trail.openers[trail_len - 1 - j];
            state.paren_stack.push(id);
        }
    }

    let indent_x = state.x;
    let i = parent_opener_index(state, indent_x);
    if let Some(id) = peek(&state.paren_stack, i) {
        if should_add_opener_indent(state, id) {
            let delta = state.openers[id].indent_delta;
            add_indent(state, delta);
        }
    }

    if state.mode == Mode::Paren {
        for _ in 0..trail_len {
            state.paren_stack.pop();
        }
    }
}

/// Dispatch the first non-whitespace character of a line while indent
/// tracking is on.
pub(crate) fn check_indent(state: &mut State) -> Step<()> {
    let ch = state.ch;
    if is_close_paren(ch) {
        on_leading_close_paren(state)?;
    } else if is_comment_char(state, ch) {
        on_comment_line(state);
        state.tracking_indent = false;
    } else if ch != "\n" && ch != " " && ch != "\t" {
        on_indent(state)?;
    }
    Ok(())
}

/// A cached leading close-paren becomes an error only when code after it
/// restarted the line's trail; a lone leading closer is silently absorbed.
pub(crate) fn check_leading_close_paren(state: &State) -> Step<()> {
    if state
        .error_pos_cache
        .contains_key(&ErrorName::LeadingCloseParen)
        && state.paren_trail.line_no == Some(state.line_no)
    {
        return Err(Abort::Error(make_error(state, ErrorName::LeadingCloseParen)));
    }
    Ok(())
}
