//! The mutable working state threaded through a whole pass.
//!
//! One `State` is created per top-level invocation (and per Paren-Mode
//! restart). Every operation in the pass mutates it in place; the public
//! result is derived from it at the end. All coordinates in here are
//! 0-based character indices; the 1-based public convention is applied at
//! the answer boundary only.

use crate::changes::{transform_changes, ChangeIndex};
use crate::error::ErrorPosCache;
use crate::options::Options;

/// Which of the two reconciliation directions a pass runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Indentation is authoritative; trailing close-parens follow it.
    Indent,
    /// Close-parens are authoritative; indentation follows them.
    Paren,
}

/// Micro-state for capturing the argument column after an open-paren:
/// `Space` waits for the first whitespace after the head, `Arg` waits for
/// the first non-whitespace after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgTabStop {
    Space,
    Arg,
}

pub(crate) type OpenerId = usize;

/// A recorded open-paren, alive on the paren stack until matched or flushed.
#[derive(Debug, Clone)]
pub(crate) struct Opener {
    pub input_line_no: usize,
    pub input_x: usize,
    pub line_no: usize,
    pub x: usize,
    pub ch: char,
    pub indent_delta: i64,
    pub max_child_indent: Option<usize>,
    pub arg_x: Option<usize>,
    pub children: Vec<OpenerId>,
    pub closer: Option<Closer>,
}

/// Where an opener was closed, for the optional opener-tree output.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Closer {
    pub line_no: usize,
    pub x: usize,
    pub ch: char,
    pub trail: Option<TrailSpan>,
}

/// One remembered paren trail: the trailing close-paren run of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrailSpan {
    pub line_no: usize,
    pub start_x: usize,
    pub end_x: usize,
}

/// The trail being built for the current line, plus the extent that was
/// clamped away by the cursor.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParenTrail {
    pub line_no: Option<usize>,
    pub start_x: Option<usize>,
    pub end_x: Option<usize>,
    pub openers: Vec<OpenerId>,
    pub clamped: ClampedTrail,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ClampedTrail {
    pub start_x: Option<usize>,
    pub end_x: Option<usize>,
    pub openers: Vec<OpenerId>,
}

/// A tab stop derived from an opener on the cursor line.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TabStop {
    pub ch: char,
    pub x: usize,
    pub line_no: usize,
    pub arg_x: Option<usize>,
}

pub(crate) struct State<'a> {
    pub mode: Mode,
    pub smart: bool,

    pub orig_text: &'a str,
    pub orig_cursor_x: Option<usize>,
    pub orig_cursor_line: Option<usize>,

    pub input_lines: Vec<&'a str>,
    pub input_line_no: usize,
    pub input_x: usize,

    pub lines: Vec<String>,
    pub line_no: usize,
    pub ch: &'a str,
    pub x: usize,
    pub indent_x: Option<usize>,

    pub openers: Vec<Opener>,
    pub paren_stack: Vec<OpenerId>,
    pub paren_trail: ParenTrail,
    pub paren_trails: Vec<TrailSpan>,

    pub return_parens: bool,
    pub parens: Vec<OpenerId>,

    pub cursor_x: Option<usize>,
    pub cursor_line: Option<usize>,
    pub prev_cursor_x: Option<usize>,
    pub prev_cursor_line: Option<usize>,
    pub selection_start_line: Option<usize>,

    pub changes: Option<ChangeIndex>,

    pub is_in_code: bool,
    pub is_escaping: bool,
    pub is_escaped: bool,
    pub is_in_str: bool,
    pub is_in_comment: bool,
    pub comment_x: Option<usize>,
    pub comment_chars: Vec<char>,
    pub quote_danger: bool,

    pub tracking_indent: bool,
    pub skip_char: bool,
    pub success: bool,
    pub partial_result: bool,
    pub force_balance: bool,

    pub max_indent: Option<usize>,
    pub indent_delta: i64,
    pub tracking_arg_tab_stop: Option<ArgTabStop>,

    pub tab_stops: Vec<TabStop>,
    pub error_pos_cache: ErrorPosCache,
    pub error: Option<crate::error::Error>,
}

impl<'a> State<'a> {
    pub fn new(text: &'a str, options: &Options, mode: Mode, smart: bool) -> State<'a> {
        let to_internal = |v: Option<usize>| v.map(|n| n.saturating_sub(1));
        let cursor_x = to_internal(options.cursor_x);
        let cursor_line = to_internal(options.cursor_line);

        State {
            mode,
            smart,
            orig_text: text,
            orig_cursor_x: cursor_x,
            orig_cursor_line: cursor_line,
            input_lines: split_lines(text),
            input_line_no: 0,
            input_x: 0,
            lines: Vec::new(),
            line_no: 0,
            ch: "",
            x: 0,
            indent_x: None,
            openers: Vec::new(),
            paren_stack: Vec::new(),
            paren_trail: ParenTrail::default(),
            paren_trails: Vec::new(),
            return_parens: options.return_parens,
            parens: Vec::new(),
            cursor_x,
            cursor_line,
            prev_cursor_x: to_internal(options.prev_cursor_x),
            prev_cursor_line: to_internal(options.prev_cursor_line),
            selection_start_line: to_internal(options.selection_start_line),
            changes: transform_changes(&options.changes),
            is_in_code: true,
            is_escaping: false,
            is_escaped: false,
            is_in_str: false,
            is_in_comment: false,
            comment_x: None,
            comment_chars: options.comment_chars.clone(),
            quote_danger: false,
            tracking_indent: false,
            skip_char: false,
            success: false,
            partial_result: options.partial_result,
            force_balance: options.force_balance,
            max_indent: None,
            indent_delta: 0,
            tracking_arg_tab_stop: None,
            tab_stops: Vec::new(),
            error_pos_cache: ErrorPosCache::new(),
            error: None,
        }
    }
}

/// Split on `\n`, `\r\n`, or bare `\r`, keeping the final empty segment when
/// the text ends with a newline.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}

fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Replace the character range `[start, end)` of `orig` with `replace`.
/// Indices are character counts and clamp to the end of the string.
pub(crate) fn replace_within_string(orig: &str, start: usize, end: usize, replace: &str) -> String {
    let start_byte = char_to_byte(orig, start);
    let end_byte = char_to_byte(orig, end.max(start));
    let mut out = String::with_capacity(orig.len() + replace.len());
    out.push_str(&orig[..start_byte]);
    out.push_str(replace);
    out.push_str(&orig[end_byte..]);
    out
}

fn is_cursor_affected(cursor_x: usize, start: usize, end: usize) -> bool {
    if cursor_x == start && cursor_x == end {
        cursor_x == 0
    } else {
        cursor_x >= end
    }
}

fn shift_cursor_on_edit(state: &mut State, line_no: usize, start: usize, end: usize, replace: &str) {
    let old_len = end - start;
    let new_len = replace.chars().count();
    let dx = new_len as i64 - old_len as i64;

    if dx != 0 && state.cursor_line == Some(line_no) {
        if let Some(cursor_x) = state.cursor_x {
            if is_cursor_affected(cursor_x, start, end) {
                state.cursor_x = usize::try_from(cursor_x as i64 + dx).ok().or(Some(0));
            }
        }
    }
}

/// Splice `replace` into an output line, shifting the cursor along.
pub(crate) fn replace_within_line(
    state: &mut State,
    line_no: usize,
    start: usize,
    end: usize,
    replace: &str,
) {
    let line = &state.lines[line_no];
    let new_line = replace_within_string(line, start, end, replace);
    state.lines[line_no] = new_line;
    shift_cursor_on_edit(state, line_no, start, end, replace);
}

pub(crate) fn insert_within_line(state: &mut State, line_no: usize, idx: usize, insert: &str) {
    replace_within_line(state, line_no, idx, idx, insert);
}

/// Start a fresh output line: reset the per-line cursor and caches.
pub(crate) fn init_line(state: &mut State, line_no: usize) {
    use crate::error::ErrorName;

    state.x = 0;
    state.line_no = line_no;

    state.indent_x = None;
    state.comment_x = None;
    state.indent_delta = 0;

    state.error_pos_cache.remove(&ErrorName::UnmatchedCloseParen);
    state.error_pos_cache.remove(&ErrorName::UnmatchedOpenParen);
    state.error_pos_cache.remove(&ErrorName::LeadingCloseParen);

    state.tracking_arg_tab_stop = None;
    state.tracking_indent = !state.is_in_str;
}

/// Write the (possibly rewritten) current character into the output line and
/// advance. The `indent_delta` decrement on rewrite is deliberate
/// deletion-plus-insertion bookkeeping that the indentation math relies on.
pub(crate) fn commit_char(state: &mut State, orig_ch: &str) {
    let ch = state.ch;
    let orig_len = orig_ch.chars().count();
    let ch_len = ch.chars().count();
    if orig_ch != ch {
        let (line_no, x) = (state.line_no, state.x);
        replace_within_line(state, line_no, x, x + orig_len, ch);
        state.indent_delta -= (orig_len + ch_len) as i64;
    }
    state.x += ch_len;
}

/// Clamp with optional bounds; the upper bound wins when they cross.
pub(crate) fn clamp(val: i64, min: Option<i64>, max: Option<i64>) -> i64 {
    let mut val = val;
    if let Some(min) = min {
        val = val.max(min);
    }
    if let Some(max) = max {
        val = val.min(max);
    }
    val
}

/// `stack[len - 1 - idx]`: index from the top of a stack-like vec.
pub(crate) fn peek<T: Copy>(stack: &[T], idx_from_top: usize) -> Option<T> {
    stack.len().checked_sub(1 + idx_from_top).map(|i| stack[i])
}
