// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! The edit session: all mutable editor state behind one controller.
//!
//! `EditSession` owns the engine, the current page, the extracted content
//! (rebuilt every refresh), the stroke layer, and the single active
//! selection. The host shell feeds pointer events in (`session/pointer.rs`)
//! and commands in (this module), and gets [`Outcome`] values and
//! [`RenderFrame`]s back. The session never paints and never blocks; every
//! operation completes synchronously or fails with an [`EditorError`].

mod pointer;

use crate::cluster::{self, TextUnit};
use crate::engine::{Bitmap, DocumentEngine, WidgetInfo};
use crate::error::EditorError;
use crate::mutate;
use crate::overlay::{self, Overlay};
use crate::selection::{Selection, SelectionTarget};
use crate::settings::{EditorConfig, FontFamily, Rgb};
use crate::stroke::StrokeLayer;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size};
use std::path::Path;

/// Interaction mode, consulted at a single dispatch point in the pointer
/// handlers. Modes are switched explicitly, never by rebinding handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Click to select, click again to drag.
    #[default]
    Select,
    /// Freehand stroke capture. Mutually exclusive with selection.
    Draw,
    /// The next pointer-down arms a new-text placement point.
    PlaceText,
}

/// What a pointer event or command produced, for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing to do.
    None,
    /// Hit test found nothing; informational, not an error.
    Miss,
    /// A text unit was selected. `seed` pre-fills the host's edit surface;
    /// `rect` is its viewport-space bounds for placing that surface.
    SelectedText { seed: String, rect: Rect },
    /// A form field was selected, seeded with its current value.
    SelectedField {
        name: String,
        seed: String,
        rect: Rect,
    },
    /// A freehand stroke was selected.
    SelectedStroke {
        id: crate::stroke::StrokeId,
        rect: Rect,
    },
    /// A checkbox was clicked; the host should ask the user to confirm and
    /// call [`EditSession::confirm_checkbox`] with the answer.
    ConfirmCheckbox { field: String },
    /// Placement mode consumed a click; the host should collect text and
    /// call [`EditSession::place_new_text`]. `at` is in document space.
    PlaceTextAt { at: Point },
    /// A stroke grew by one segment (viewport space); the host may draw it
    /// incrementally instead of re-rendering.
    StrokeSegment { from: Point, to: Point },
    /// Session state changed; the host should request a new frame.
    NeedsRender,
}

/// One rendered frame: the rasterized page plus the overlay to composite.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub bitmap: Bitmap,
    pub overlay: Overlay,
}

/// An in-flight drag. `original`/`current` are document-space rects for
/// text and field drags; stroke drags translate the stroke itself and
/// ignore them.
#[derive(Debug, Clone, Copy)]
struct DragState {
    /// Last pointer position, viewport space.
    last: Point,
    /// Whether any nonzero movement happened. A zero-delta drag commits
    /// nothing.
    moved: bool,
    original: Rect,
    current: Rect,
}

/// The editing session for one open document.
#[derive(Debug)]
pub struct EditSession<E: DocumentEngine> {
    engine: E,
    page: usize,
    config: EditorConfig,
    view_size: Size,
    viewport: Viewport,
    units: Vec<TextUnit>,
    fields: Vec<WidgetInfo>,
    strokes: StrokeLayer,
    selection: Option<Selection>,
    drag: Option<DragState>,
    mode: Mode,
    /// Document-space point armed by a placement click, consumed by
    /// [`place_new_text`](Self::place_new_text).
    pending_placement: Option<Point>,
}

impl<E: DocumentEngine> EditSession<E> {
    /// Open a document for editing on page 0.
    ///
    /// Encrypted or edit-restricted documents are rejected outright, as are
    /// documents with no pages.
    pub fn open(engine: E, view_size: Size, config: EditorConfig) -> Result<Self, EditorError> {
        if engine.is_encrypted() {
            return Err(EditorError::Encrypted);
        }
        if engine.page_count() == 0 {
            return Err(EditorError::EmptyDocument);
        }
        let mut session = Self {
            engine,
            page: 0,
            config,
            view_size,
            viewport: Viewport::fit(Size::new(1.0, 1.0), view_size),
            units: Vec::new(),
            fields: Vec::new(),
            strokes: StrokeLayer::new(),
            selection: None,
            drag: None,
            mode: Mode::Select,
            pending_placement: None,
        };
        session.refresh()?;
        tracing::info!(pages = session.engine.page_count(), "opened document");
        Ok(session)
    }

    /// Rebuild the viewport transform and the extracted content for the
    /// current page.
    ///
    /// Word and widget extraction degrade to empty sets with a logged
    /// warning; only geometry lookup failure fails the refresh.
    fn refresh(&mut self) -> Result<(), EditorError> {
        let page_size = self
            .engine
            .page_size(self.page)
            .map_err(|source| EditorError::Render {
                page: self.page,
                source,
            })?;
        self.viewport = Viewport::fit(page_size, self.view_size);

        self.units = match self.engine.words(self.page) {
            Ok(words) => cluster::cluster_words(&words),
            Err(err) => {
                tracing::warn!(page = self.page, %err, "word extraction failed, no text units");
                Vec::new()
            }
        };
        self.fields = match self.engine.widgets(self.page) {
            Ok(widgets) => widgets,
            Err(err) => {
                tracing::warn!(page = self.page, %err, "widget extraction failed, no form fields");
                Vec::new()
            }
        };
        Ok(())
    }

    /// Rasterize the current page and assemble the overlay.
    pub fn render_frame(&mut self) -> Result<RenderFrame, EditorError> {
        let bitmap = self
            .engine
            .rasterize(self.page, self.viewport.scale)
            .map_err(|source| EditorError::Render {
                page: self.page,
                source,
            })?;
        let overlay = overlay::build_overlay(
            &self.viewport,
            &self.fields,
            &self.strokes,
            self.selection.as_ref(),
            self.drag_preview_rect(),
        );
        Ok(RenderFrame { bitmap, overlay })
    }

    /// Viewport-space rect of the dashed drag preview, if a content drag
    /// has moved. Stroke drags translate the stroke itself and need no
    /// preview rect.
    fn drag_preview_rect(&self) -> Option<Rect> {
        let drag = self.drag.as_ref()?;
        if !drag.moved || self.selection.as_ref().is_some_and(Selection::is_stroke) {
            return None;
        }
        Some(self.viewport.rect_to_viewport(drag.current))
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.engine.page_count()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The underlying document engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn text_units(&self) -> &[TextUnit] {
        &self.units
    }

    pub fn form_fields(&self) -> &[WidgetInfo] {
        &self.fields
    }

    pub fn set_font_size(&mut self, size: u32) -> Result<(), EditorError> {
        self.config.set_font_size(size)
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.config.font_family = family;
    }

    pub fn set_font_color(&mut self, color: Rgb) {
        self.config.font_color = color;
    }

    /// Switch interaction mode, discarding any in-progress selection, drag,
    /// or armed placement.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(?mode, "switching interaction mode");
        }
        self.mode = mode;
        self.selection = None;
        self.drag = None;
        self.pending_placement = None;
        self.strokes.cancel_pending();
    }

    /// Toggle freehand capture on or off.
    pub fn toggle_draw_mode(&mut self) {
        let next = if self.mode == Mode::Draw {
            Mode::Select
        } else {
            Mode::Draw
        };
        self.set_mode(next);
    }

    /// Arm placement mode: the next pointer-down picks the insertion point.
    pub fn begin_place_text(&mut self) {
        self.set_mode(Mode::PlaceText);
    }

    /// Advance to the next page. Returns whether the page changed.
    pub fn next_page(&mut self) -> Result<bool, EditorError> {
        if self.page + 1 >= self.engine.page_count() {
            return Ok(false);
        }
        self.page += 1;
        self.reset_page_session();
        self.refresh()?;
        Ok(true)
    }

    /// Go back one page. Returns whether the page changed.
    pub fn prev_page(&mut self) -> Result<bool, EditorError> {
        if self.page == 0 {
            return Ok(false);
        }
        self.page -= 1;
        self.reset_page_session();
        self.refresh()?;
        Ok(true)
    }

    /// Strokes, undo history, selection, and drags are per-page-session
    /// state; navigation discards them.
    fn reset_page_session(&mut self) {
        self.strokes.clear();
        self.selection = None;
        self.drag = None;
        self.pending_placement = None;
    }

    /// The host reported a new viewport size. The transform is recomputed
    /// and existing strokes are remapped so they keep their page position.
    pub fn resize(&mut self, view_size: Size) -> Result<(), EditorError> {
        self.view_size = view_size;
        self.drag = None;
        let old = self.viewport;
        self.refresh()?;
        let new = self.viewport;
        self.strokes.remap(|p| new.to_viewport(old.to_document(p)));
        if let Some(sel) = self.selection.as_mut()
            && let SelectionTarget::Stroke { id } = sel.target
            && let Some(stroke) = self.strokes.get(id)
        {
            sel.rect = stroke.bbox;
        }
        Ok(())
    }

    /// Undo the most recent stroke. Returns whether anything was removed.
    pub fn undo(&mut self) -> bool {
        match self.strokes.undo() {
            Some(id) => {
                let selected_it = self.selection.as_ref().is_some_and(|sel| {
                    matches!(sel.target, SelectionTarget::Stroke { id: sid } if sid == id)
                });
                if selected_it {
                    self.selection = None;
                }
                true
            }
            None => false,
        }
    }

    /// Abandon the in-progress edit, drag, or placement without mutating.
    pub fn cancel_edit(&mut self) {
        self.selection = None;
        self.drag = None;
        self.pending_placement = None;
        self.strokes.cancel_pending();
    }

    /// Commit an in-place text replacement for the selected text unit.
    pub fn submit_text_edit(&mut self, text: &str) -> Result<(), EditorError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EditorError::InvalidInput(
                "replacement text is empty".into(),
            ));
        }
        let Some(selection) = self.selection.take() else {
            return Err(EditorError::InvalidInput("no active selection".into()));
        };
        if !matches!(selection.target, SelectionTarget::Text { .. }) {
            self.selection = Some(selection);
            return Err(EditorError::InvalidInput(
                "active selection is not a text unit".into(),
            ));
        }
        mutate::replace_text(
            &mut self.engine,
            self.page,
            selection.rect,
            trimmed,
            &self.config,
        )?;
        self.refresh()
    }

    /// Commit a new value for the selected form field.
    pub fn submit_field_edit(&mut self, value: &str) -> Result<(), EditorError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EditorError::InvalidInput("field value is empty".into()));
        }
        let Some(selection) = self.selection.take() else {
            return Err(EditorError::InvalidInput("no active selection".into()));
        };
        let SelectionTarget::Field { name } = &selection.target else {
            self.selection = Some(selection);
            return Err(EditorError::InvalidInput(
                "active selection is not a form field".into(),
            ));
        };
        mutate::set_field_value(&mut self.engine, self.page, name, trimmed)?;
        self.refresh()
    }

    /// Delete the selected content, whatever its kind.
    pub fn delete_selection(&mut self) -> Result<(), EditorError> {
        let Some(selection) = self.selection.take() else {
            return Err(EditorError::InvalidInput("nothing selected".into()));
        };
        self.drag = None;
        match selection.target {
            SelectionTarget::Text { .. } => {
                mutate::delete_text(&mut self.engine, self.page, selection.rect)?;
                self.refresh()
            }
            SelectionTarget::Field { name } => {
                mutate::delete_field(&mut self.engine, self.page, &name)?;
                self.refresh()
            }
            SelectionTarget::Stroke { id } => {
                if !self.strokes.remove(id) {
                    tracing::warn!(?id, "selected stroke was already gone");
                }
                Ok(())
            }
        }
    }

    /// Resolve a checkbox confirmation. Declining leaves the field
    /// untouched; accepting checks it and returns the value that was set.
    pub fn confirm_checkbox(
        &mut self,
        field: &str,
        accepted: bool,
    ) -> Result<Option<String>, EditorError> {
        if !accepted {
            tracing::debug!(field, "checkbox change declined");
            return Ok(None);
        }
        let value = mutate::toggle_checkbox(&mut self.engine, self.page, field)?;
        self.refresh()?;
        Ok(Some(value))
    }

    /// Insert new text at the armed placement point.
    pub fn place_new_text(&mut self, text: &str) -> Result<(), EditorError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EditorError::InvalidInput("text is empty".into()));
        }
        let Some(at) = self.pending_placement.take() else {
            return Err(EditorError::InvalidInput(
                "no placement point armed".into(),
            ));
        };
        mutate::place_text(&mut self.engine, self.page, at, trimmed, &self.config)?;
        self.refresh()
    }

    /// Bake the stroke layer onto the page and save the document.
    ///
    /// The layer (and its undo history) is cleared after a successful save
    /// so a second save does not duplicate the baked ink.
    pub fn save(&mut self, path: &Path) -> Result<(), EditorError> {
        mutate::bake_strokes(&mut self.engine, self.page, self.strokes.strokes(), &self.viewport)?;
        self.engine.save(path).map_err(EditorError::Save)?;
        self.strokes.clear();
        tracing::info!(path = %path.display(), "saved document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{EngineCall, MockEngine};
    use crate::engine::{WidgetKind, WordBox};

    fn word(text: &str, rect: Rect, block: u32, line: u32, index: u32) -> WordBox {
        WordBox {
            text: text.into(),
            rect,
            block,
            line,
            word: index,
        }
    }

    fn letter_view() -> Size {
        // Same size as the mock page, so scale is 1 and offset is zero.
        Size::new(612.0, 792.0)
    }

    fn text_session() -> EditSession<MockEngine> {
        let engine = MockEngine::single_page().with_words(
            0,
            vec![
                word("Hello", Rect::new(10.0, 10.0, 40.0, 20.0), 0, 0, 0),
                word("world.", Rect::new(45.0, 10.0, 80.0, 20.0), 0, 0, 1),
            ],
        );
        EditSession::open(engine, letter_view(), EditorConfig::new()).unwrap()
    }

    #[test]
    fn encrypted_documents_are_rejected_at_open() {
        let err = EditSession::open(MockEngine::encrypted(), letter_view(), EditorConfig::new())
            .unwrap_err();
        assert!(matches!(err, EditorError::Encrypted));
    }

    #[test]
    fn empty_documents_are_rejected_at_open() {
        let err = EditSession::open(MockEngine::default(), letter_view(), EditorConfig::new())
            .unwrap_err();
        assert!(matches!(err, EditorError::EmptyDocument));
    }

    #[test]
    fn extraction_failure_degrades_to_empty_sets() {
        let mut engine = MockEngine::single_page();
        engine.fail_words = true;
        engine.fail_widgets = true;
        let mut session = EditSession::open(engine, letter_view(), EditorConfig::new()).unwrap();

        assert!(session.text_units().is_empty());
        assert!(session.form_fields().is_empty());
        assert!(session.render_frame().is_ok());
    }

    #[test]
    fn submit_text_edit_redacts_then_reinserts_in_place() {
        let mut session = text_session();
        let outcome = session.pointer_down(Point::new(20.0, 15.0));
        assert!(matches!(outcome, Outcome::SelectedText { .. }));

        session.submit_text_edit("Updated").unwrap();

        // Unit rect is the word union inflated by the cluster margin.
        let unit_rect = Rect::new(8.0, 8.0, 82.0, 22.0);
        assert_eq!(
            session.engine.calls[0],
            EngineCall::Redact {
                page: 0,
                rect: unit_rect
            }
        );
        assert_eq!(
            session.engine.calls[2],
            EngineCall::InsertText {
                page: 0,
                at: Point::new(8.0, 20.0),
                text: "Updated".into(),
            }
        );
        assert!(session.selection().is_none());
    }

    #[test]
    fn empty_submission_is_rejected_and_keeps_the_selection() {
        let mut session = text_session();
        session.pointer_down(Point::new(20.0, 15.0));

        let err = session.submit_text_edit("   ").unwrap_err();
        assert!(matches!(err, EditorError::InvalidInput(_)));
        assert!(session.selection().is_some());
        assert!(session.engine.calls.is_empty());
    }

    #[test]
    fn checkbox_confirm_and_decline() {
        let engine = MockEngine::single_page().with_widgets(
            0,
            vec![WidgetInfo {
                name: "agree".into(),
                kind: WidgetKind::Checkbox,
                rect: Rect::new(10.0, 10.0, 30.0, 30.0),
                value: "Off".into(),
                on_value: Some("Approved".into()),
            }],
        );
        let mut session = EditSession::open(engine, letter_view(), EditorConfig::new()).unwrap();

        let outcome = session.pointer_down(Point::new(20.0, 20.0));
        assert_eq!(
            outcome,
            Outcome::ConfirmCheckbox {
                field: "agree".into()
            }
        );
        assert!(session.selection().is_none());

        assert_eq!(session.confirm_checkbox("agree", false).unwrap(), None);
        assert_eq!(session.engine.widget(0, "agree").unwrap().value, "Off");

        let set = session.confirm_checkbox("agree", true).unwrap();
        assert_eq!(set.as_deref(), Some("Approved"));
        assert_eq!(
            session.engine.widget(0, "agree").unwrap().value,
            "Approved"
        );
    }

    #[test]
    fn navigation_resets_strokes_selection_and_undo() {
        let engine = MockEngine::single_page()
            .with_page(Size::new(612.0, 792.0))
            .with_words(0, vec![word("Hi.", Rect::new(10.0, 10.0, 40.0, 20.0), 0, 0, 0)]);
        let mut session = EditSession::open(engine, letter_view(), EditorConfig::new()).unwrap();

        session.toggle_draw_mode();
        session.pointer_down(Point::new(0.0, 0.0));
        session.pointer_move(Point::new(10.0, 10.0));
        session.pointer_up(Point::new(10.0, 10.0)).unwrap();
        session.toggle_draw_mode();
        session.pointer_down(Point::new(20.0, 15.0));
        assert!(session.selection().is_some());

        assert!(session.next_page().unwrap());
        assert_eq!(session.page_index(), 1);
        assert!(session.selection().is_none());
        assert!(!session.undo());

        // Already at the last page.
        assert!(!session.next_page().unwrap());
    }

    #[test]
    fn place_text_flow_offsets_the_armed_click() {
        let mut session = text_session();
        session.begin_place_text();

        let outcome = session.pointer_down(Point::new(100.0, 200.0));
        assert_eq!(
            outcome,
            Outcome::PlaceTextAt {
                at: Point::new(100.0, 200.0)
            }
        );
        assert_eq!(session.mode(), Mode::Select);

        session.place_new_text("note").unwrap();
        assert_eq!(
            session.engine.calls,
            vec![EngineCall::InsertText {
                page: 0,
                at: Point::new(120.0, 206.0),
                text: "note".into(),
            }]
        );

        // The placement point is consumed.
        let err = session.place_new_text("again").unwrap_err();
        assert!(matches!(err, EditorError::InvalidInput(_)));
    }

    #[test]
    fn save_bakes_strokes_in_document_space_then_clears_the_layer() {
        // Page 306x396 in a 612x792 view: scale 2, no padding.
        let engine = MockEngine::default().with_page(Size::new(306.0, 396.0));
        let mut session = EditSession::open(engine, letter_view(), EditorConfig::new()).unwrap();

        session.toggle_draw_mode();
        session.pointer_down(Point::new(10.0, 10.0));
        session.pointer_move(Point::new(30.0, 50.0));
        session.pointer_up(Point::new(30.0, 50.0)).unwrap();

        session.save(Path::new("/tmp/out.pdf")).unwrap();

        assert_eq!(
            session.engine.calls,
            vec![
                EngineCall::DrawPath {
                    page: 0,
                    points: vec![Point::new(5.0, 5.0), Point::new(15.0, 25.0)],
                    width: 2.0,
                },
                EngineCall::Save {
                    path: "/tmp/out.pdf".into()
                },
            ]
        );

        // A second save bakes nothing new.
        session.save(Path::new("/tmp/out.pdf")).unwrap();
        let draws = session
            .engine
            .calls
            .iter()
            .filter(|c| matches!(c, EngineCall::DrawPath { .. }))
            .count();
        assert_eq!(draws, 1);
    }

    #[test]
    fn resize_keeps_strokes_anchored_to_the_page() {
        // Scale 1 initially.
        let engine = MockEngine::default().with_page(Size::new(612.0, 792.0));
        let mut session = EditSession::open(engine, letter_view(), EditorConfig::new()).unwrap();

        session.toggle_draw_mode();
        session.pointer_down(Point::new(100.0, 100.0));
        session.pointer_move(Point::new(200.0, 200.0));
        session.pointer_up(Point::new(200.0, 200.0)).unwrap();
        session.toggle_draw_mode();

        // Half-size view: scale 0.5.
        session.resize(Size::new(306.0, 396.0)).unwrap();

        let stroke = &session.strokes.strokes()[0];
        assert_eq!(stroke.points[0], Point::new(50.0, 50.0));
        assert_eq!(stroke.points[1], Point::new(100.0, 100.0));
    }

    #[test]
    fn font_size_setter_validates() {
        let mut session = text_session();
        assert!(session.set_font_size(5).is_err());
        assert!(session.set_font_size(18).is_ok());
        assert_eq!(session.config().font_size(), 18);
    }
}
