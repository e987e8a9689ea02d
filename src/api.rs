//! The three entry points.
//!
//! Each is a pure function of `(text, options)`: the same input always
//! produces the same answer, and concurrent calls share nothing.

use crate::answer::{public_result, Answer};
use crate::options::Options;
use crate::process::process_text;
use crate::state::Mode;

/// Indentation is authoritative: trailing close-parens are rewritten to
/// match it.
pub fn indent_mode(text: &str, options: &Options) -> Answer {
    public_result(process_text(text, options, Mode::Indent, false))
}

/// Close-parens are authoritative: indentation is rewritten to match them.
pub fn paren_mode(text: &str, options: &Options) -> Answer {
    public_result(process_text(text, options, Mode::Paren, false))
}

/// Indent Mode that falls back to Paren Mode around cursor events that
/// would otherwise destroy an edit in progress. A selection disables the
/// smart behavior for the pass.
pub fn smart_mode(text: &str, options: &Options) -> Answer {
    let smart = options.selection_start_line.is_none();
    public_result(process_text(text, options, Mode::Indent, smart))
}
