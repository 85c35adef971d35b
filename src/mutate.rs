// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! The content mutator: committed edits applied to the document engine.
//!
//! Text edits follow an erase-then-reinsert protocol: stage a redaction
//! over the old bounds, apply it, then insert the replacement text at a
//! deterministic anchor. The window between a successful redaction and a
//! failed insert is the one place the document can lose content; it is
//! reported as [`MutationError::ContentLost`], distinct from every safe
//! failure, and is never retried automatically.
//!
//! Widget mutations re-resolve the live widget by field name immediately
//! before acting. Handles are never cached across renders because the
//! engine may reallocate them.
//!
//! Every reinsertion uses one anchor rule: the baseline sits at
//! `(rect.x0, rect.y0 + font_size)`. The document-visible result therefore
//! matches the previewed rect for both in-place replaces and drag moves.

use crate::engine::{DocumentEngine, EngineError, WidgetInfo};
use crate::settings::{self, EditorConfig};
use crate::stroke::Stroke;
use crate::viewport::Viewport;
use kurbo::{Point, Rect};
use thiserror::Error;

/// Fallback export value used to check a checkbox that declares none.
pub const CHECKBOX_FALLBACK_ON: &str = "Yes";

#[derive(Debug, Error)]
pub enum MutationError {
    /// The operation failed before anything was destroyed. The original
    /// content is intact.
    #[error("mutation failed, original content intact: {source}")]
    Safe {
        #[source]
        source: EngineError,
    },

    /// Redaction succeeded but reinsertion failed: the original text is
    /// gone and the replacement was not written. Callers must warn the
    /// user explicitly rather than silently succeeding, and must not
    /// retry.
    #[error("reinsertion failed after redaction, original content lost: {source}")]
    ContentLost {
        #[source]
        source: EngineError,
    },

    /// No widget with this field name exists on the page. Widget handles
    /// are re-resolved by name before every mutation; a vanished name means
    /// the render the user acted on is stale.
    #[error("form field '{0}' not found on page")]
    MissingField(String),
}

impl MutationError {
    pub fn is_data_loss(&self) -> bool {
        matches!(self, MutationError::ContentLost { .. })
    }

    fn safe(source: EngineError) -> Self {
        MutationError::Safe { source }
    }
}

/// Replace the text under `rect` in place.
pub fn replace_text<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    rect: Rect,
    new_text: &str,
    config: &EditorConfig,
) -> Result<(), MutationError> {
    erase(engine, page, rect)?;
    insert_at_anchor(engine, page, rect, new_text, config)?;
    tracing::info!(page, ?rect, "replaced text in place");
    Ok(())
}

/// Move previously extracted text from `old_rect` to `new_rect`.
pub fn move_text<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    old_rect: Rect,
    new_rect: Rect,
    text: &str,
    config: &EditorConfig,
) -> Result<(), MutationError> {
    erase(engine, page, old_rect)?;
    insert_at_anchor(engine, page, new_rect, text, config)?;
    tracing::info!(page, from = ?old_rect, to = ?new_rect, "moved text");
    Ok(())
}

/// Remove the text under `rect` without reinserting anything.
pub fn delete_text<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    rect: Rect,
) -> Result<(), MutationError> {
    erase(engine, page, rect)?;
    tracing::info!(page, ?rect, "deleted text");
    Ok(())
}

/// Insert brand-new text near a placement click.
///
/// The insertion point is offset from the raw click so the first character
/// does not start directly under the cursor.
pub fn place_text<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    click: Point,
    text: &str,
    config: &EditorConfig,
) -> Result<(), MutationError> {
    let at = Point::new(
        click.x + settings::PLACEMENT_X_OFFSET,
        click.y + config.font_size_pts() / 2.0,
    );
    engine
        .insert_text(
            page,
            at,
            text,
            config.font_size_pts(),
            config.font_family.engine_name(),
            config.font_color.normalized(),
        )
        .map_err(MutationError::safe)?;
    tracing::info!(page, ?at, "placed new text");
    Ok(())
}

/// Set a field's value and commit it.
pub fn set_field_value<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    name: &str,
    value: &str,
) -> Result<(), MutationError> {
    resolve_widget(engine, page, name)?;
    engine
        .set_widget_value(page, name, value)
        .map_err(MutationError::safe)?;
    engine
        .commit_widget(page, name)
        .map_err(MutationError::safe)?;
    tracing::info!(page, field = name, "updated form field value");
    Ok(())
}

/// Reassign a field's bounds and commit it.
pub fn move_field<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    name: &str,
    rect: Rect,
) -> Result<(), MutationError> {
    resolve_widget(engine, page, name)?;
    engine
        .set_widget_rect(page, name, rect)
        .map_err(MutationError::safe)?;
    engine
        .commit_widget(page, name)
        .map_err(MutationError::safe)?;
    tracing::info!(page, field = name, ?rect, "moved form field");
    Ok(())
}

/// Delete a field from the page.
pub fn delete_field<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    name: &str,
) -> Result<(), MutationError> {
    resolve_widget(engine, page, name)?;
    engine
        .delete_widget(page, name)
        .map_err(MutationError::safe)?;
    tracing::info!(page, field = name, "deleted form field");
    Ok(())
}

/// Check a checkbox: its value becomes the declared export value, or the
/// fallback token when none is declared. Returns the value that was set.
pub fn toggle_checkbox<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    name: &str,
) -> Result<String, MutationError> {
    let widget = resolve_widget(engine, page, name)?;
    let on_value = widget
        .on_value
        .unwrap_or_else(|| CHECKBOX_FALLBACK_ON.to_string());
    engine
        .set_widget_value(page, name, &on_value)
        .map_err(MutationError::safe)?;
    engine
        .commit_widget(page, name)
        .map_err(MutationError::safe)?;
    tracing::info!(page, field = name, value = %on_value, "checked checkbox");
    Ok(on_value)
}

/// Bake the stroke layer onto the page as document-space paths.
pub fn bake_strokes<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    strokes: &[Stroke],
    viewport: &Viewport,
) -> Result<(), MutationError> {
    for stroke in strokes {
        let points: Vec<Point> = stroke
            .points
            .iter()
            .map(|p| viewport.to_document(*p))
            .collect();
        engine
            .draw_path(page, &points, stroke.color.normalized(), stroke.width)
            .map_err(MutationError::safe)?;
    }
    if !strokes.is_empty() {
        tracing::info!(page, count = strokes.len(), "baked strokes onto page");
    }
    Ok(())
}

fn erase<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    rect: Rect,
) -> Result<(), MutationError> {
    engine.redact(page, rect).map_err(MutationError::safe)?;
    engine.apply_redactions(page).map_err(MutationError::safe)
}

fn insert_at_anchor<E: DocumentEngine>(
    engine: &mut E,
    page: usize,
    rect: Rect,
    text: &str,
    config: &EditorConfig,
) -> Result<(), MutationError> {
    let anchor = Point::new(rect.x0, rect.y0 + config.font_size_pts());
    engine
        .insert_text(
            page,
            anchor,
            text,
            config.font_size_pts(),
            config.font_family.engine_name(),
            config.font_color.normalized(),
        )
        .map_err(|source| MutationError::ContentLost { source })
}

fn resolve_widget<E: DocumentEngine>(
    engine: &E,
    page: usize,
    name: &str,
) -> Result<WidgetInfo, MutationError> {
    engine
        .widgets(page)
        .map_err(MutationError::safe)?
        .into_iter()
        .find(|w| w.name == name)
        .ok_or_else(|| MutationError::MissingField(name.to_string()))
}
