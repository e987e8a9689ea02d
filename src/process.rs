//! The pass driver: line loop, per-character processing, finalization, and
//! the Paren-Mode restart trampoline.

use crate::dispatch::on_char;
use crate::error::{make_error, raise, Abort, ErrorName, Step};
use crate::indent::{check_indent, check_leading_close_paren, on_indent};
use crate::options::Options;
use crate::paren_trail::{check_unmatched_outside_paren_trail, finish_new_paren_trail};
use crate::state::{commit_char, init_line, Mode, State};
use crate::tab_stops::set_tab_stops;

/// Apply the indent shift of an edit that ends exactly here.
fn handle_change_delta(state: &mut State) {
    if state.changes.is_none() || !(state.smart || state.mode == Mode::Paren) {
        return;
    }
    let delta = state
        .changes
        .as_ref()
        .and_then(|index| index.get(&state.input_line_no))
        .and_then(|line| line.get(&state.input_x))
        .map(|change| change.new_end_x as i64 - change.old_end_x as i64);
    if let Some(delta) = delta {
        state.indent_delta += delta;
    }
}

fn process_char<'a>(state: &mut State<'a>, ch: &'a str) -> Step<()> {
    let orig_ch = ch;

    state.ch = ch;
    state.skip_char = false;

    handle_change_delta(state);

    if state.tracking_indent {
        check_indent(state)?;
    }

    if state.skip_char {
        state.ch = "";
    } else {
        on_char(state)?;
    }

    commit_char(state, orig_ch);
    Ok(())
}

fn process_line<'a>(state: &mut State<'a>, line_no: usize) -> Step<()> {
    init_line(state, line_no);
    let input_line = state.input_lines[line_no];
    state.lines.push(input_line.to_string());

    set_tab_stops(state);

    for (x, (byte_idx, ch)) in input_line.char_indices().enumerate() {
        state.input_x = x;
        process_char(state, &input_line[byte_idx..byte_idx + ch.len_utf8()])?;
    }
    process_char(state, "\n")?;

    if !state.force_balance {
        check_unmatched_outside_paren_trail(state)?;
        check_leading_close_paren(state)?;
    }

    if state.paren_trail.line_no == Some(state.line_no) {
        finish_new_paren_trail(state);
    }
    Ok(())
}

fn finalize(state: &mut State) -> Step<()> {
    if state.quote_danger {
        return raise(state, ErrorName::QuoteDanger);
    }
    if state.is_in_str {
        return raise(state, ErrorName::UnclosedQuote);
    }

    if !state.paren_stack.is_empty() && state.mode == Mode::Paren {
        return raise(state, ErrorName::UnclosedParen);
    }

    if state.mode == Mode::Indent {
        // one synthetic line start flushes the residual openers into a
        // final paren trail
        init_line(state, state.lines.len());
        on_indent(state)?;
    }
    Ok(())
}

fn run_pass(state: &mut State) -> Step<()> {
    for i in 0..state.input_lines.len() {
        state.input_line_no = i;
        process_line(state, i)?;
    }
    finalize(state)
}

/// Run a full pass, rerunning once in Paren Mode when a restart sentinel
/// fires. A restarted pass begins from a fresh state; nothing leaks from
/// the aborted one.
pub(crate) fn process_text<'a>(
    text: &'a str,
    options: &Options,
    mode: Mode,
    smart: bool,
) -> State<'a> {
    let mut mode = mode;
    loop {
        let mut state = State::new(text, options, mode, smart);
        match run_pass(&mut state) {
            Ok(()) => {
                state.success = true;
                return state;
            }
            Err(Abort::Restart(_)) if mode == Mode::Indent => {
                mode = Mode::Paren;
            }
            Err(Abort::Restart(_)) => {
                // a Paren-Mode pass asking for a Paren-Mode restart would
                // never settle
                state.error = Some(make_error(&state, ErrorName::Unhandled));
                return state;
            }
            Err(Abort::Error(error)) => {
                state.error = Some(error);
                return state;
            }
        }
    }
}
