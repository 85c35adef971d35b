// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Sentence clustering: raw word boxes into editable text units.
//!
//! The algorithm is a layout heuristic, not grammatical segmentation. Words
//! are scanned in (top, left) order and accumulated into a unit until the
//! layout block or line changes, or a word ends with terminal punctuation.
//! Two true sentences on one physical line collapse into separate units at
//! the punctuation break; a single sentence wrapping across two lines splits
//! at the wrap. Both are documented behavior, not defects to fix here.

use crate::engine::WordBox;
use kurbo::Rect;

/// Margin added on all sides of a unit's bounding rect, in document units.
pub const UNIT_MARGIN: f64 = 2.0;

/// A clustered run of words treated as one editable piece.
///
/// Rebuilt on every render; never persisted. Only its effect (reinserted
/// text after a mutation) survives in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit {
    /// Member words joined with single spaces.
    pub text: String,
    pub words: Vec<WordBox>,
    /// Union of member word boxes, inflated by [`UNIT_MARGIN`].
    pub rect: Rect,
}

/// Group word boxes into text units.
pub fn cluster_words(words: &[WordBox]) -> Vec<TextUnit> {
    let mut sorted = words.to_vec();
    sorted.sort_by(|a, b| {
        a.rect
            .y0
            .total_cmp(&b.rect.y0)
            .then(a.rect.x0.total_cmp(&b.rect.x0))
    });

    let mut units = Vec::new();
    let mut run: Vec<WordBox> = Vec::new();
    let mut prev: Option<(u32, u32)> = None;

    for word in sorted {
        // A block or line change closes the current unit even without
        // terminal punctuation. Layout dominates punctuation.
        if let Some((block, line)) = prev
            && !run.is_empty()
            && (word.block != block || word.line != line)
        {
            flush(&mut run, &mut units);
        }

        let terminal = word.text.ends_with(['.', '!', '?']);
        prev = Some((word.block, word.line));
        run.push(word);
        if terminal {
            flush(&mut run, &mut units);
        }
    }

    // Trailing unit at end of page is flushed unconditionally.
    flush(&mut run, &mut units);
    units
}

fn flush(run: &mut Vec<WordBox>, units: &mut Vec<TextUnit>) {
    if run.is_empty() {
        return;
    }
    let words = std::mem::take(run);
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let rect = unit_rect(&words);
    units.push(TextUnit { text, words, rect });
}

fn unit_rect(words: &[WordBox]) -> Rect {
    let mut rect = words[0].rect;
    for word in &words[1..] {
        rect = rect.union(word.rect);
    }
    rect.inflate(UNIT_MARGIN, UNIT_MARGIN)
}
