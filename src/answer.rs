//! The public result of a pass.
//!
//! Everything here is a 1-based view over the internal 0-based state; the
//! conversion happens in this module and nowhere else.

use serde::Serialize;

use crate::error::Error;
use crate::state::{OpenerId, State};

/// One remembered paren trail, for editors that highlight them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParenTrailSpan {
    pub line_no: usize,
    pub start_x: usize,
    pub end_x: usize,
}

/// An indentation stop on the cursor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStop {
    pub ch: char,
    pub x: usize,
    pub line_no: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_x: Option<usize>,
}

/// Where an opener was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloserNode {
    pub line_no: usize,
    pub x: usize,
    pub ch: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trail: Option<ParenTrailSpan>,
}

/// One opener of the optional paren tree, with its children nested inside.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParenNode {
    pub line_no: usize,
    pub x: usize,
    pub ch: char,
    pub input_line_no: usize,
    pub input_x: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg_x: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closer: Option<CloserNode>,
    pub children: Vec<ParenNode>,
}

/// What a pass returns to the caller. On failure the text reverts to the
/// input unless the pass ran with `partial_result`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub success: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_x: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Error>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tab_stops: Vec<TabStop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paren_trails: Option<Vec<ParenTrailSpan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parens: Option<Vec<ParenNode>>,
}

fn public_paren_trails(state: &State) -> Vec<ParenTrailSpan> {
    state
        .paren_trails
        .iter()
        .map(|trail| ParenTrailSpan {
            line_no: trail.line_no + 1,
            start_x: trail.start_x + 1,
            end_x: trail.end_x + 1,
        })
        .collect()
}

fn public_tab_stops(state: &State) -> Vec<TabStop> {
    state
        .tab_stops
        .iter()
        .map(|stop| TabStop {
            ch: stop.ch,
            x: stop.x + 1,
            line_no: stop.line_no + 1,
            arg_x: stop.arg_x.map(|x| x + 1),
        })
        .collect()
}

fn build_paren_node(state: &State, id: OpenerId) -> ParenNode {
    let opener = &state.openers[id];
    ParenNode {
        line_no: opener.line_no + 1,
        x: opener.x + 1,
        ch: opener.ch,
        input_line_no: opener.input_line_no + 1,
        input_x: opener.input_x + 1,
        arg_x: opener.arg_x.map(|x| x + 1),
        closer: opener.closer.map(|closer| CloserNode {
            line_no: closer.line_no + 1,
            x: closer.x + 1,
            ch: closer.ch,
            trail: closer.trail.map(|trail| ParenTrailSpan {
                line_no: trail.line_no + 1,
                start_x: trail.start_x + 1,
                end_x: trail.end_x + 1,
            }),
        }),
        children: opener
            .children
            .iter()
            .map(|&child| build_paren_node(state, child))
            .collect(),
    }
}

fn public_parens(state: &State) -> Vec<ParenNode> {
    state
        .parens
        .iter()
        .map(|&id| build_paren_node(state, id))
        .collect()
}

/// Derive the public answer from a finished pass.
pub(crate) fn public_result(state: State) -> Answer {
    let to_public = |v: Option<usize>| v.map(|n| n + 1);

    if state.success {
        Answer {
            success: true,
            text: state.lines.join("\n"),
            cursor_x: to_public(state.cursor_x),
            cursor_line: to_public(state.cursor_line),
            error: None,
            tab_stops: public_tab_stops(&state),
            paren_trails: Some(public_paren_trails(&state)),
            parens: state.return_parens.then(|| public_parens(&state)),
        }
    } else {
        let partial = state.partial_result;
        Answer {
            success: false,
            text: if partial {
                state.lines.join("\n")
            } else {
                state.orig_text.to_string()
            },
            cursor_x: to_public(if partial {
                state.cursor_x
            } else {
                state.orig_cursor_x
            }),
            cursor_line: to_public(if partial {
                state.cursor_line
            } else {
                state.orig_cursor_line
            }),
            error: state.error.clone().map(Error::into_public),
            tab_stops: Vec::new(),
            paren_trails: partial.then(|| public_paren_trails(&state)),
            parens: (partial && state.return_parens).then(|| public_parens(&state)),
        }
    }
}
