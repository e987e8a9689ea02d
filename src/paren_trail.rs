//! Paren-trail machinery.
//!
//! The paren trail is the trailing run of close-parens on the current code
//! line. Indent Mode rewrites it to match indentation; Paren Mode treats it
//! as authoritative and only tidies it. The trail is reset after every
//! character that could end a list element, so between resets it is always
//! the suffix of consecutive closers on the line.

use crate::dispatch::{is_close_paren_char, match_paren, set_closer};
use crate::error::{make_error, raise, Abort, ErrorName, Step};
use crate::indent::parent_opener_index;
use crate::state::{
    insert_within_line, replace_within_line, ClampedTrail, Mode, OpenerId, ParenTrail, State,
    TrailSpan,
};

pub(crate) fn is_cursor_left_of(
    cursor_x: Option<usize>,
    cursor_line: Option<usize>,
    x: Option<usize>,
    line_no: usize,
) -> bool {
    match (cursor_x, cursor_line, x) {
        (Some(cursor_x), Some(cursor_line), Some(x)) => cursor_line == line_no && cursor_x <= x,
        _ => false,
    }
}

pub(crate) fn is_cursor_right_of(
    cursor_x: Option<usize>,
    cursor_line: Option<usize>,
    x: Option<usize>,
    line_no: usize,
) -> bool {
    match (cursor_x, cursor_line, x) {
        (Some(cursor_x), Some(cursor_line), Some(x)) => cursor_line == line_no && cursor_x > x,
        _ => false,
    }
}

fn is_cursor_in_comment(state: &State, cursor_x: Option<usize>, cursor_line: Option<usize>) -> bool {
    is_cursor_right_of(cursor_x, cursor_line, state.comment_x, state.line_no)
}

/// Start a fresh (empty) trail at `x` on `line_no`.
pub(crate) fn reset_paren_trail(state: &mut State, line_no: usize, x: usize) {
    state.paren_trail.line_no = Some(line_no);
    state.paren_trail.start_x = Some(x);
    state.paren_trail.end_x = Some(x);
    state.paren_trail.openers.clear();
    state.paren_trail.clamped = ClampedTrail::default();
}

pub(crate) fn invalidate_paren_trail(state: &mut State) {
    state.paren_trail = ParenTrail::default();
}

fn is_cursor_clamping_paren_trail(state: &State) -> bool {
    is_cursor_right_of(
        state.cursor_x,
        state.cursor_line,
        state.paren_trail.start_x,
        state.line_no,
    ) && !is_cursor_in_comment(state, state.cursor_x, state.cursor_line)
}

/// Pull the trail's visible extent up to the cursor, stashing what was cut
/// off in the clamped sub-record (Indent Mode).
fn clamp_paren_trail_to_cursor(state: &mut State) {
    let (start_x, end_x) = match (state.paren_trail.start_x, state.paren_trail.end_x) {
        (Some(start_x), Some(end_x)) => (start_x, end_x),
        _ => return,
    };
    if !is_cursor_clamping_paren_trail(state) {
        return;
    }
    let cursor_x = match state.cursor_x {
        Some(cursor_x) => cursor_x,
        None => return,
    };

    let new_start_x = start_x.max(cursor_x);
    let new_end_x = end_x.max(cursor_x);

    let line = &state.lines[state.line_no];
    let remove_count = line
        .chars()
        .skip(start_x)
        .take(new_start_x - start_x)
        .filter(|&ch| is_close_paren_char(ch))
        .count();

    let openers = std::mem::take(&mut state.paren_trail.openers);
    let (clamped, kept) = openers.split_at(remove_count.min(openers.len()));
    state.paren_trail.openers = kept.to_vec();
    state.paren_trail.clamped.openers = clamped.to_vec();

    state.paren_trail.start_x = Some(new_start_x);
    state.paren_trail.end_x = Some(new_end_x);
    state.paren_trail.clamped.start_x = Some(start_x);
    state.paren_trail.clamped.end_x = Some(end_x);
}

/// Give the trail's openers back to the stack (Indent Mode): the next
/// indentation point decides anew how many of them close.
fn pop_paren_trail(state: &mut State) {
    let (start_x, end_x) = match (state.paren_trail.start_x, state.paren_trail.end_x) {
        (Some(start_x), Some(end_x)) => (start_x, end_x),
        _ => return,
    };
    if start_x == end_x {
        return;
    }
    while let Some(id) = state.paren_trail.openers.pop() {
        state.paren_stack.push(id);
    }
}

/// Rewrite the trail so it closes exactly the openers that `indent_x` puts
/// out of scope (Indent Mode).
pub(crate) fn correct_paren_trail(state: &mut State, indent_x: usize) {
    let index = parent_opener_index(state, indent_x);

    let trail_pos = match (
        state.paren_trail.line_no,
        state.paren_trail.start_x,
        state.paren_trail.end_x,
    ) {
        (Some(line_no), Some(start_x), Some(end_x)) => Some((line_no, start_x, end_x)),
        _ => None,
    };

    let mut parens = String::new();
    for i in 0..index {
        let id = match state.paren_stack.pop() {
            Some(id) => id,
            None => break,
        };
        state.paren_trail.openers.push(id);
        let close_ch = match_paren(state.openers[id].ch);
        parens.push(close_ch);

        if state.return_parens {
            if let Some((line_no, start_x, _)) = trail_pos {
                set_closer(&mut state.openers[id], line_no, start_x + i, close_ch);
            }
        }
    }

    if let Some((line_no, start_x, end_x)) = trail_pos {
        replace_within_line(state, line_no, start_x, end_x, &parens);
        state.paren_trail.end_x = Some(start_x + parens.chars().count());
        remember_paren_trail(state);
    }
}

/// Strip spaces that ended up between the trail's closers (Paren Mode).
fn clean_paren_trail(state: &mut State) {
    let (start_x, end_x) = match (state.paren_trail.start_x, state.paren_trail.end_x) {
        (Some(start_x), Some(end_x)) => (start_x, end_x),
        _ => return,
    };
    if start_x == end_x || state.paren_trail.line_no != Some(state.line_no) {
        return;
    }

    let line = &state.lines[state.line_no];
    let mut new_trail = String::new();
    let mut space_count = 0;
    for ch in line.chars().skip(start_x).take(end_x - start_x) {
        if is_close_paren_char(ch) {
            new_trail.push(ch);
        } else {
            space_count += 1;
        }
    }

    if space_count > 0 {
        let line_no = state.line_no;
        replace_within_line(state, line_no, start_x, end_x, &new_trail);
        state.paren_trail.end_x = Some(end_x - space_count);
    }
}

/// Close the stack's top opener at the end of the current trail (Paren Mode
/// leading-close-paren path).
pub(crate) fn append_paren_trail(state: &mut State) -> Step<()> {
    let id = match state.paren_stack.pop() {
        Some(id) => id,
        None => return raise(state, ErrorName::Unhandled),
    };
    let close_ch = match_paren(state.openers[id].ch);

    let (line_no, end_x) = match (state.paren_trail.line_no, state.paren_trail.end_x) {
        (Some(line_no), Some(end_x)) => (line_no, end_x),
        _ => return raise(state, ErrorName::Unhandled),
    };

    if state.return_parens {
        set_closer(&mut state.openers[id], line_no, end_x, close_ch);
    }

    set_max_indent(state, id);
    insert_within_line(state, line_no, end_x, &close_ch.to_string());

    state.paren_trail.end_x = Some(end_x + 1);
    state.paren_trail.openers.push(id);
    update_remembered_paren_trail(state);
    Ok(())
}

/// A stray close-paren left of the line's final trail is a hard error.
pub(crate) fn check_unmatched_outside_paren_trail(state: &State) -> Step<()> {
    if let Some(cache) = state.error_pos_cache.get(&ErrorName::UnmatchedCloseParen) {
        if let Some(start_x) = state.paren_trail.start_x {
            if cache.x < start_x {
                return Err(Abort::Error(make_error(
                    state,
                    ErrorName::UnmatchedCloseParen,
                )));
            }
        }
    }
    Ok(())
}

/// Record how far children of the enclosing opener may be indented, now that
/// `id` closed.
pub(crate) fn set_max_indent(state: &mut State, id: OpenerId) {
    let x = state.openers[id].x;
    match state.paren_stack.last() {
        Some(&parent) => state.openers[parent].max_child_indent = Some(x),
        None => state.max_indent = Some(x),
    }
}

/// Export the finished trail for editors, using clamped extents when the
/// cursor cut the trail short.
pub(crate) fn remember_paren_trail(state: &mut State) {
    let trail = &state.paren_trail;
    if trail.clamped.openers.is_empty() && trail.openers.is_empty() {
        return;
    }
    let is_clamped = trail.clamped.start_x.is_some();
    let all_clamped = trail.openers.is_empty();

    let line_no = match trail.line_no {
        Some(line_no) => line_no,
        None => return,
    };
    let start_x = if is_clamped {
        trail.clamped.start_x
    } else {
        trail.start_x
    };
    let end_x = if all_clamped {
        trail.clamped.end_x
    } else {
        trail.end_x
    };
    let (start_x, end_x) = match (start_x, end_x) {
        (Some(start_x), Some(end_x)) => (start_x, end_x),
        _ => return,
    };

    let span = TrailSpan {
        line_no,
        start_x,
        end_x,
    };
    state.paren_trails.push(span);

    if state.return_parens {
        let ids: Vec<OpenerId> = state
            .paren_trail
            .clamped
            .openers
            .iter()
            .chain(state.paren_trail.openers.iter())
            .copied()
            .collect();
        for id in ids {
            if let Some(closer) = &mut state.openers[id].closer {
                closer.trail = Some(span);
            }
        }
    }
}

/// Extend the most recent remembered trail when it is on the same line,
/// otherwise remember a new one.
fn update_remembered_paren_trail(state: &mut State) {
    let current_line = state.paren_trail.line_no;
    let current_end = state.paren_trail.end_x;
    let extends_last = state
        .paren_trails
        .last()
        .is_some_and(|last| Some(last.line_no) == current_line);
    if extends_last {
        if let (Some(last), Some(end_x)) = (state.paren_trails.last_mut(), current_end) {
            last.end_x = end_x;
        }
    } else {
        remember_paren_trail(state);
    }
}

/// Per-line trail finalize, dispatching on mode.
pub(crate) fn finish_new_paren_trail(state: &mut State) {
    if state.is_in_str {
        invalidate_paren_trail(state);
    } else if state.mode == Mode::Indent {
        clamp_paren_trail_to_cursor(state);
        pop_paren_trail(state);
    } else {
        if let Some(&id) = state.paren_trail.openers.last() {
            set_max_indent(state, id);
        }
        if state.cursor_line != Some(state.line_no) {
            clean_paren_trail(state);
        }
        remember_paren_trail(state);
    }
}
