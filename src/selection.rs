// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! The single active selection.
//!
//! At most one piece of content is selected at a time, tagged by kind. The
//! selection owns a snapshot of what it needs to mutate later (the unit's
//! text, the field's name) because units and widget wrappers are rebuilt on
//! every render and cannot be borrowed across one.
//!
//! A selection is cleared whenever the page changes, a new selection is
//! made, or an edit/drag commits or is cancelled.

use crate::stroke::StrokeId;
use crate::theme;
use kurbo::Rect;
use peniko::Color;

/// What is selected, with the data needed to act on it later.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionTarget {
    /// A clustered text unit. Carries the concatenated text so a move can
    /// reinsert it after the units have been rebuilt.
    Text { text: String },
    /// A form field, addressed by name and re-resolved before mutation.
    Field { name: String },
    /// A freehand stroke.
    Stroke { id: StrokeId },
}

/// The active selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Page the selection belongs to.
    pub page: usize,
    pub target: SelectionTarget,
    /// Current bounds: document space for text and fields, viewport space
    /// for strokes. Updated during a drag to track the preview.
    pub rect: Rect,
}

impl Selection {
    pub fn text(page: usize, text: String, rect: Rect) -> Self {
        Self {
            page,
            target: SelectionTarget::Text { text },
            rect,
        }
    }

    pub fn field(page: usize, name: String, rect: Rect) -> Self {
        Self {
            page,
            target: SelectionTarget::Field { name },
            rect,
        }
    }

    pub fn stroke(page: usize, id: StrokeId, rect: Rect) -> Self {
        Self {
            page,
            target: SelectionTarget::Stroke { id },
            rect,
        }
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self.target, SelectionTarget::Stroke { .. })
    }

    /// Highlight color, keyed by kind.
    pub fn highlight_color(&self) -> Color {
        match self.target {
            SelectionTarget::Text { .. } => theme::HIGHLIGHT_TEXT,
            SelectionTarget::Field { .. } => theme::HIGHLIGHT_FIELD,
            SelectionTarget::Stroke { .. } => theme::HIGHLIGHT_STROKE,
        }
    }
}
