//! # parinfer
//!
//! Infer the structure of S-expression source from two redundant cues: the
//! indentation of each line and the close-parens at the end of each form.
//! Given a buffer (and optionally a cursor, selection, and recent edits),
//! a single character-driven pass returns the reconciled text together
//! with cursor fix-ups, diagnostics, and structural annotations.
//!
//! Three entry points cover the two reconciliation directions:
//!
//! - [`indent_mode`]: indentation wins; trailing close-parens follow it.
//! - [`paren_mode`]: close-parens win; indentation follows them.
//! - [`smart_mode`]: Indent Mode that falls back to Paren Mode on cursor
//!   events that would otherwise destroy an edit in progress.
//!
//! ```
//! use parinfer::{indent_mode, Options};
//!
//! let answer = indent_mode("(foo\n  bar\nbaz)", &Options::default());
//! assert!(answer.success);
//! assert_eq!(answer.text, "(foo\n  bar)\nbaz");
//! ```

pub mod answer;
pub mod api;
pub mod error;
pub mod options;

mod changes;
mod dispatch;
mod indent;
mod paren_trail;
mod process;
mod state;
mod tab_stops;

pub use answer::{Answer, CloserNode, ParenNode, ParenTrailSpan, TabStop};
pub use api::{indent_mode, paren_mode, smart_mode};
pub use error::{Error, ErrorExtra, ErrorName};
pub use options::{Change, Options};
