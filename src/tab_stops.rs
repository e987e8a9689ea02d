//! Tab-stop extraction for the cursor (or selection) line.
//!
//! Editors use these to snap indentation to meaningful columns: every open
//! paren enclosing the line, plus (in Paren Mode) the openers of the trail
//! above it, each optionally annotated with its first argument column.

use crate::state::{Mode, Opener, State, TabStop};

fn make_tab_stop(opener: &Opener) -> TabStop {
    TabStop {
        ch: opener.ch,
        x: opener.x,
        line_no: opener.line_no,
        arg_x: opener.arg_x,
    }
}

fn tab_stop_line(state: &State) -> Option<usize> {
    state.selection_start_line.or(state.cursor_line)
}

/// Collect tab stops at the start of the cursor/selection line.
pub(crate) fn set_tab_stops(state: &mut State) {
    if tab_stop_line(state) != Some(state.line_no) {
        return;
    }

    for &id in &state.paren_stack {
        state.tab_stops.push(make_tab_stop(&state.openers[id]));
    }
    if state.mode == Mode::Paren {
        for &id in state.paren_trail.openers.iter().rev() {
            state.tab_stops.push(make_tab_stop(&state.openers[id]));
        }
    }

    // an argument column that reaches past the next stop is useless
    for i in 1..state.tab_stops.len() {
        let x = state.tab_stops[i].x;
        let prev = &mut state.tab_stops[i - 1];
        if prev.arg_x.is_some_and(|arg_x| arg_x >= x) {
            prev.arg_x = None;
        }
    }
}
