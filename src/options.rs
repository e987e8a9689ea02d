//! Caller options for the three transform modes.
//!
//! All coordinates here are 1-based, matching what editors report. The
//! working state converts to its internal 0-based space on construction.

use serde::Deserialize;

/// One editor-reported text replacement, in input coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    /// 1-based line of the replaced region's start.
    pub line_no: usize,
    /// 1-based column of the replaced region's start.
    pub x: usize,
    pub old_text: String,
    pub new_text: String,
}

/// Options accepted by [`indent_mode`](crate::indent_mode),
/// [`paren_mode`](crate::paren_mode), and [`smart_mode`](crate::smart_mode).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// 1-based cursor column.
    pub cursor_x: Option<usize>,
    /// 1-based cursor line.
    pub cursor_line: Option<usize>,
    /// Cursor column before the edit being processed.
    pub prev_cursor_x: Option<usize>,
    /// Cursor line before the edit being processed.
    pub prev_cursor_line: Option<usize>,
    /// First line of the current selection, if any. Its presence downgrades
    /// smart mode to plain Indent Mode.
    pub selection_start_line: Option<usize>,
    /// Edits applied since the last pass, oldest first.
    pub changes: Vec<Change>,
    /// Insert missing close-parens instead of erroring where possible.
    pub force_balance: bool,
    /// On failure, return the partially transformed text instead of the
    /// original, with error positions in output coordinates.
    pub partial_result: bool,
    /// Return the opener tree alongside the text.
    pub return_parens: bool,
    /// Characters that start a comment. Defaults to `;`.
    pub comment_chars: Vec<char>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            cursor_x: None,
            cursor_line: None,
            prev_cursor_x: None,
            prev_cursor_line: None,
            selection_start_line: None,
            changes: Vec::new(),
            force_balance: false,
            partial_result: false,
            return_parens: false,
            comment_chars: vec![';'],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_comment_chars() {
        assert_eq!(Options::default().comment_chars, vec![';']);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let options: Options = serde_json::from_str(r#"{"cursorX": 3, "cursorLine": 1}"#)
            .expect("valid options json");
        assert_eq!(options.cursor_x, Some(3));
        assert_eq!(options.cursor_line, Some(1));
        assert_eq!(options.comment_chars, vec![';']);
        assert!(!options.force_balance);
    }

    #[test]
    fn test_deserialize_changes() {
        let options: Options = serde_json::from_str(
            r#"{"changes": [{"lineNo": 1, "x": 1, "oldText": "", "newText": "  "}]}"#,
        )
        .expect("valid changes json");
        assert_eq!(options.changes.len(), 1);
        assert_eq!(options.changes[0].new_text, "  ");
    }
}
