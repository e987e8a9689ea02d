//! Index of editor-reported edits.
//!
//! Each change is re-keyed by where its replacement text *ends* in the new
//! buffer, so the character loop can look up "did an edit just finish here?"
//! in O(1) while walking the input. The index is built once per pass and
//! read-only afterwards.

use std::collections::HashMap;

use crate::options::Change;
use crate::state::split_lines;

/// A change record annotated with its old/new end coordinates (0-based).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransformedChange {
    pub x: usize,
    pub line_no: usize,
    pub old_text: String,
    pub new_text: String,
    pub old_end_x: usize,
    pub new_end_x: usize,
    pub new_end_line_no: usize,
}

/// Two-level lookup: new-end line -> new-end column -> change.
pub(crate) type ChangeIndex = HashMap<usize, HashMap<usize, TransformedChange>>;

fn transform_change(change: &Change) -> TransformedChange {
    // public coordinates are 1-based
    let x = change.x.saturating_sub(1);
    let line_no = change.line_no.saturating_sub(1);

    let old_lines = split_lines(&change.old_text);
    let new_lines = split_lines(&change.new_text);

    let last_old_len = old_lines.last().map_or(0, |l| l.chars().count());
    let last_new_len = new_lines.last().map_or(0, |l| l.chars().count());

    // a replacement spanning lines restarts its end column at 0
    let old_base = if old_lines.len() == 1 { x } else { 0 };
    let new_base = if new_lines.len() == 1 { x } else { 0 };
    let old_end_x = old_base + last_old_len;
    let new_end_x = new_base + last_new_len;
    let new_end_line_no = line_no + (new_lines.len() - 1);

    TransformedChange {
        x,
        line_no,
        old_text: change.old_text.clone(),
        new_text: change.new_text.clone(),
        old_end_x,
        new_end_x,
        new_end_line_no,
    }
}

/// Build the change index, or `None` when there is nothing to index.
pub(crate) fn transform_changes(changes: &[Change]) -> Option<ChangeIndex> {
    if changes.is_empty() {
        return None;
    }
    let mut index: ChangeIndex = HashMap::new();
    for change in changes {
        let transformed = transform_change(change);
        index
            .entry(transformed.new_end_line_no)
            .or_default()
            .insert(transformed.new_end_x, transformed);
    }
    Some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(line_no: usize, x: usize, old_text: &str, new_text: &str) -> Change {
        Change {
            line_no,
            x,
            old_text: old_text.to_string(),
            new_text: new_text.to_string(),
        }
    }

    #[test]
    fn test_single_line_insertion() {
        let t = transform_change(&change(1, 1, "", "  "));
        assert_eq!(t.old_end_x, 0);
        assert_eq!(t.new_end_x, 2);
        assert_eq!(t.new_end_line_no, 0);
    }

    #[test]
    fn test_single_line_deletion() {
        let t = transform_change(&change(2, 5, "ab", ""));
        assert_eq!(t.line_no, 1);
        assert_eq!(t.x, 4);
        assert_eq!(t.old_end_x, 6);
        assert_eq!(t.new_end_x, 4);
        assert_eq!(t.old_text, "ab");
        assert_eq!(t.new_text, "");
    }

    #[test]
    fn test_multi_line_replacement_ends_relative_to_last_line() {
        let t = transform_change(&change(1, 3, "one", "one\ntwo!"));
        assert_eq!(t.old_end_x, 2 + 3);
        // the new text spans two lines, so its end column restarts at 0
        assert_eq!(t.new_end_x, 4);
        assert_eq!(t.new_end_line_no, 1);
    }

    #[test]
    fn test_index_keys_by_new_end() {
        let index = transform_changes(&[change(1, 1, "", "x")]).expect("non-empty index");
        let hit = index.get(&0).and_then(|line| line.get(&1));
        assert!(hit.is_some());
        assert!(transform_changes(&[]).is_none());
    }
}
