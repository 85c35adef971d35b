// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! The document-engine seam.
//!
//! Everything pagemark knows about the underlying document goes through the
//! [`DocumentEngine`] trait: page geometry, rasterization, word and widget
//! extraction, redaction, text insertion, widget mutation, and save. The
//! editor never holds engine-internal handles; widgets are addressed by
//! field name and re-resolved before every mutation.

pub mod mock;

use kurbo::{Point, Rect, Size};
use std::path::Path;
use thiserror::Error;

/// Failure reported by a document engine call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EngineError(String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A single extracted word and its position, regenerated every render.
#[derive(Debug, Clone, PartialEq)]
pub struct WordBox {
    pub text: String,
    /// Document-space bounds of the word.
    pub rect: Rect,
    /// Layout block the word belongs to.
    pub block: u32,
    /// Line within the block.
    pub line: u32,
    /// Word index within the line.
    pub word: u32,
}

/// Form-widget kind, matched exhaustively in hit testing and mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    Text,
    Checkbox,
    Other,
}

/// Transient per-render snapshot of a form widget.
///
/// The engine owns widget identity; this wrapper carries only the field
/// name (unique within a page), which is enough to re-resolve the live
/// widget before mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInfo {
    pub name: String,
    pub kind: WidgetKind,
    /// Document-space bounds.
    pub rect: Rect,
    /// Current field value.
    pub value: String,
    /// Declared "on" export value for checkbox-kind widgets.
    pub on_value: Option<String>,
}

impl WidgetInfo {
    /// Whether a checkbox-kind widget is currently checked.
    ///
    /// Checked means the value matches the declared export value, or one of
    /// the conventional tokens when no export value is declared.
    pub fn is_checked(&self) -> bool {
        match &self.on_value {
            Some(on) => self.value == *on,
            None => matches!(self.value.as_str(), "Yes" | "On"),
        }
    }
}

/// A rasterized page, tightly packed RGB8.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Abstract paginated-document engine.
///
/// All page arguments are 0-based indices in `[0, page_count())`. Redactions
/// are staged with [`redact`](Self::redact) and take effect on
/// [`apply_redactions`](Self::apply_redactions). Widget mutations are staged
/// with the `set_widget_*` calls and take effect on
/// [`commit_widget`](Self::commit_widget).
pub trait DocumentEngine {
    fn page_count(&self) -> usize;

    /// Encrypted or edit-restricted documents are rejected outright at open.
    fn is_encrypted(&self) -> bool;

    fn page_size(&self, page: usize) -> Result<Size, EngineError>;

    fn rasterize(&mut self, page: usize, scale: f64) -> Result<Bitmap, EngineError>;

    fn words(&self, page: usize) -> Result<Vec<WordBox>, EngineError>;

    fn widgets(&self, page: usize) -> Result<Vec<WidgetInfo>, EngineError>;

    /// Stage a redaction that paints over `rect`, removing the glyphs under it.
    fn redact(&mut self, page: usize, rect: Rect) -> Result<(), EngineError>;

    fn apply_redactions(&mut self, page: usize) -> Result<(), EngineError>;

    /// Insert text with its baseline anchored at `at`. `font` is an
    /// engine-native font name (see [`crate::settings::FontFamily`]),
    /// `color` is normalized RGB.
    fn insert_text(
        &mut self,
        page: usize,
        at: Point,
        text: &str,
        font_size: f64,
        font: &str,
        color: [f32; 3],
    ) -> Result<(), EngineError>;

    fn set_widget_value(&mut self, page: usize, name: &str, value: &str)
    -> Result<(), EngineError>;

    fn set_widget_rect(&mut self, page: usize, name: &str, rect: Rect)
    -> Result<(), EngineError>;

    fn commit_widget(&mut self, page: usize, name: &str) -> Result<(), EngineError>;

    fn delete_widget(&mut self, page: usize, name: &str) -> Result<(), EngineError>;

    /// Draw a connected polyline on the page, in document space.
    fn draw_path(
        &mut self,
        page: usize,
        points: &[Point],
        color: [f32; 3],
        width: f64,
    ) -> Result<(), EngineError>;

    fn save(&mut self, path: &Path) -> Result<(), EngineError>;
}
