//! Error types for the transform passes
//!
//! A pass either succeeds, fails with a positioned domain error, or asks the
//! driver to restart the whole pass in Paren Mode. The restart sentinels are
//! internal control flow and never reach callers.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::state::State;

/// The fixed set of error codes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorName {
    #[serde(rename = "quote-danger")]
    QuoteDanger,
    #[serde(rename = "eol-backslash")]
    EolBackslash,
    #[serde(rename = "unclosed-quote")]
    UnclosedQuote,
    #[serde(rename = "unclosed-paren")]
    UnclosedParen,
    #[serde(rename = "unmatched-close-paren")]
    UnmatchedCloseParen,
    #[serde(rename = "unmatched-open-paren")]
    UnmatchedOpenParen,
    #[serde(rename = "leading-close-paren")]
    LeadingCloseParen,
    #[serde(rename = "unhandled")]
    Unhandled,
}

impl ErrorName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorName::QuoteDanger => "quote-danger",
            ErrorName::EolBackslash => "eol-backslash",
            ErrorName::UnclosedQuote => "unclosed-quote",
            ErrorName::UnclosedParen => "unclosed-paren",
            ErrorName::UnmatchedCloseParen => "unmatched-close-paren",
            ErrorName::UnmatchedOpenParen => "unmatched-open-paren",
            ErrorName::LeadingCloseParen => "leading-close-paren",
            ErrorName::Unhandled => "unhandled",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ErrorName::QuoteDanger => "Quotes must balanced inside comment blocks.",
            ErrorName::EolBackslash => "Line cannot end in a hanging backslash.",
            ErrorName::UnclosedQuote => "String is missing a closing quote.",
            ErrorName::UnclosedParen => "Unclosed open-paren.",
            ErrorName::UnmatchedCloseParen => "Unmatched close-paren.",
            ErrorName::UnmatchedOpenParen => "Unmatched open-paren.",
            ErrorName::LeadingCloseParen => "Line cannot lead with a close-paren.",
            ErrorName::Unhandled => "Unhandled error.",
        }
    }
}

impl fmt::Display for ErrorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer at the open-paren a stray close-paren should have matched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorExtra {
    pub name: ErrorName,
    pub line_no: usize,
    pub x: usize,
}

/// A positioned domain error.
///
/// Coordinates refer to the original input unless the pass ran with
/// `partial_result`, in which case they refer to the partially transformed
/// output. Internally 0-based; bumped to 1-based at the public boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    pub name: ErrorName,
    pub message: String,
    pub line_no: usize,
    pub x: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<ErrorExtra>,
}

impl Error {
    /// Shift every coordinate from the internal 0-based space to the 1-based
    /// public one.
    pub(crate) fn into_public(mut self) -> Error {
        self.line_no += 1;
        self.x += 1;
        if let Some(extra) = &mut self.extra {
            extra.line_no += 1;
            extra.x += 1;
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}: {}",
            self.name, self.line_no, self.x, self.message
        )
    }
}

impl std::error::Error for Error {}

/// Which internal sentinel asked for the pass to be rerun in Paren Mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Restart {
    LeadingCloseParen,
    ReleaseCursorHold,
}

/// Non-local exit from deep inside character dispatch.
#[derive(Debug)]
pub(crate) enum Abort {
    Restart(Restart),
    Error(Error),
}

/// Result alias used by every internal pass operation.
pub(crate) type Step<T> = Result<T, Abort>;

/// A captured error position, in both output and input coordinates.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorPos {
    pub line_no: usize,
    pub x: usize,
    pub input_line_no: usize,
    pub input_x: usize,
}

pub(crate) type ErrorPosCache = HashMap<ErrorName, ErrorPos>;

/// Record the current position under `name` so a later raise points at where
/// the condition started rather than where it was noticed.
pub(crate) fn cache_error_pos(state: &mut State, name: ErrorName) {
    let pos = ErrorPos {
        line_no: state.line_no,
        x: state.x,
        input_line_no: state.input_line_no,
        input_x: state.input_x,
    };
    state.error_pos_cache.insert(name, pos);
}

/// Build a positioned error, consulting the position cache and attaching the
/// open-paren hint for unmatched-close reports.
pub(crate) fn make_error(state: &State, name: ErrorName) -> Error {
    let partial = state.partial_result;
    let pick = |pos: &ErrorPos| {
        if partial {
            (pos.line_no, pos.x)
        } else {
            (pos.input_line_no, pos.input_x)
        }
    };

    let (line_no, x) = match state.error_pos_cache.get(&name) {
        Some(pos) => pick(pos),
        None => {
            if partial {
                (state.line_no, state.x)
            } else {
                (state.input_line_no, state.input_x)
            }
        }
    };

    let mut error = Error {
        name,
        message: name.message().to_string(),
        line_no,
        x,
        extra: None,
    };

    match name {
        ErrorName::UnmatchedCloseParen => {
            let cached = state.error_pos_cache.get(&ErrorName::UnmatchedOpenParen);
            let opener = state.paren_stack.last().map(|&id| &state.openers[id]);
            let hint = match (cached, opener) {
                (Some(pos), _) => Some(pick(pos)),
                (None, Some(op)) => Some(if partial {
                    (op.line_no, op.x)
                } else {
                    (op.input_line_no, op.input_x)
                }),
                (None, None) => None,
            };
            if let Some((line_no, x)) = hint {
                error.extra = Some(ErrorExtra {
                    name: ErrorName::UnmatchedOpenParen,
                    line_no,
                    x,
                });
            }
        }
        ErrorName::UnclosedParen => {
            // point at the bottom-most opener that never closed
            if let Some(&id) = state.paren_stack.first() {
                let op = &state.openers[id];
                let (line_no, x) = if partial {
                    (op.line_no, op.x)
                } else {
                    (op.input_line_no, op.input_x)
                };
                error.line_no = line_no;
                error.x = x;
            }
        }
        _ => {}
    }

    error
}

/// Shorthand for raising a domain error out of a pass operation.
pub(crate) fn raise<T>(state: &State, name: ErrorName) -> Step<T> {
    Err(Abort::Error(make_error(state, name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_name_round_trip() {
        assert_eq!(ErrorName::UnmatchedCloseParen.as_str(), "unmatched-close-paren");
        assert_eq!(ErrorName::QuoteDanger.to_string(), "quote-danger");
    }

    #[test]
    fn test_error_display() {
        let error = Error {
            name: ErrorName::UnclosedQuote,
            message: ErrorName::UnclosedQuote.message().to_string(),
            line_no: 3,
            x: 7,
            extra: None,
        };
        assert_eq!(
            error.to_string(),
            "unclosed-quote at line 3, column 7: String is missing a closing quote."
        );
    }

    #[test]
    fn test_into_public_shifts_coordinates() {
        let error = Error {
            name: ErrorName::UnmatchedCloseParen,
            message: String::new(),
            line_no: 0,
            x: 5,
            extra: Some(ErrorExtra {
                name: ErrorName::UnmatchedOpenParen,
                line_no: 0,
                x: 0,
            }),
        };
        let public = error.into_public();
        assert_eq!((public.line_no, public.x), (1, 6));
        let extra = public.extra.expect("extra survives the shift");
        assert_eq!((extra.line_no, extra.x), (1, 1));
    }
}
