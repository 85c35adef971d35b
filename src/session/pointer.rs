// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer dispatch for the edit session.
//!
//! All three handlers take the raw viewport-space position and consult the
//! interaction mode at a single point. Select mode follows the state
//! machine: a click with no selection hit-tests and selects; a click while
//! a selection exists starts a drag; release commits the drag through the
//! mutator. Draw mode routes everything to the stroke layer. Placement mode
//! consumes exactly one click.

use super::{DragState, EditSession, Mode, Outcome};
use crate::engine::{DocumentEngine, WidgetKind};
use crate::hit_test::{self, Hit};
use crate::mutate;
use crate::selection::{Selection, SelectionTarget};
use crate::settings;
use crate::stroke::StrokeId;
use kurbo::{Point, Rect};

/// Owned copy of a hit, so the extraction borrows end before the session
/// mutates its own state.
enum Resolved {
    Checkbox(String),
    Field { name: String, value: String, rect: Rect },
    Text { text: String, rect: Rect },
    Stroke { id: StrokeId, rect: Rect },
    Miss,
}

impl<E: DocumentEngine> EditSession<E> {
    pub fn pointer_down(&mut self, pos: Point) -> Outcome {
        match self.mode {
            Mode::Draw => {
                self.strokes.begin(pos);
                Outcome::None
            }
            Mode::PlaceText => {
                let at = self.viewport.to_document(pos);
                self.pending_placement = Some(at);
                self.mode = Mode::Select;
                Outcome::PlaceTextAt { at }
            }
            Mode::Select => {
                if self.selection.is_some() {
                    self.begin_drag(pos);
                    Outcome::None
                } else {
                    self.select_at(pos)
                }
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Point) -> Outcome {
        if self.mode == Mode::Draw {
            return match self.strokes.extend(pos) {
                Some((from, to)) => Outcome::StrokeSegment { from, to },
                None => Outcome::None,
            };
        }

        let scale = self.viewport.scale;
        let Some(drag) = self.drag.as_mut() else {
            return Outcome::None;
        };
        let delta = pos - drag.last;
        drag.last = pos;
        if delta.x == 0.0 && delta.y == 0.0 {
            return Outcome::None;
        }
        drag.moved = true;

        match self.selection.as_mut() {
            Some(sel) => match &sel.target {
                SelectionTarget::Stroke { id } => {
                    // Strokes live in viewport space and are translated live.
                    let id = *id;
                    if let Some(stroke) = self.strokes.get_mut(id) {
                        stroke.translate(delta);
                        sel.rect = stroke.bbox;
                    }
                }
                _ => {
                    // Text and field previews track in document space.
                    drag.current = drag.current + delta / scale;
                    sel.rect = drag.current;
                }
            },
            None => return Outcome::None,
        }
        Outcome::NeedsRender
    }

    pub fn pointer_up(&mut self, pos: Point) -> Result<Outcome, crate::error::EditorError> {
        if self.mode == Mode::Draw {
            let finished = self
                .strokes
                .finish(self.config.font_color, settings::STROKE_WIDTH);
            return Ok(match finished {
                Some(_) => Outcome::NeedsRender,
                None => Outcome::None,
            });
        }
        if self.drag.is_some() {
            self.pointer_move(pos);
            return self.finish_drag();
        }
        Ok(Outcome::None)
    }

    fn select_at(&mut self, pos: Point) -> Outcome {
        let doc_pos = self.viewport.to_document(pos);
        let resolved = match hit_test::hit_test(doc_pos, pos, &self.fields, &self.units, &self.strokes)
        {
            Some(Hit::Field(field)) if field.kind == WidgetKind::Checkbox => {
                Resolved::Checkbox(field.name.clone())
            }
            Some(Hit::Field(field)) => Resolved::Field {
                name: field.name.clone(),
                value: field.value.clone(),
                rect: field.rect,
            },
            Some(Hit::Text(unit)) => Resolved::Text {
                text: unit.text.clone(),
                rect: unit.rect,
            },
            Some(Hit::Stroke(id)) => match self.strokes.get(id) {
                Some(stroke) => Resolved::Stroke {
                    id,
                    rect: stroke.bbox,
                },
                None => Resolved::Miss,
            },
            None => Resolved::Miss,
        };

        match resolved {
            Resolved::Checkbox(field) => {
                // Checkboxes short-circuit selection: the host confirms the
                // toggle instead of opening an edit surface.
                self.selection = None;
                Outcome::ConfirmCheckbox { field }
            }
            Resolved::Field { name, value, rect } => {
                self.selection = Some(Selection::field(self.page, name.clone(), rect));
                Outcome::SelectedField {
                    name,
                    seed: value,
                    rect: self.viewport.rect_to_viewport(rect),
                }
            }
            Resolved::Text { text, rect } => {
                self.selection = Some(Selection::text(self.page, text.clone(), rect));
                Outcome::SelectedText {
                    seed: text,
                    rect: self.viewport.rect_to_viewport(rect),
                }
            }
            Resolved::Stroke { id, rect } => {
                self.selection = Some(Selection::stroke(self.page, id, rect));
                Outcome::SelectedStroke { id, rect }
            }
            Resolved::Miss => {
                self.selection = None;
                Outcome::Miss
            }
        }
    }

    fn begin_drag(&mut self, pos: Point) {
        let Some(selection) = self.selection.as_ref() else {
            return;
        };
        self.drag = Some(DragState {
            last: pos,
            moved: false,
            original: selection.rect,
            current: selection.rect,
        });
        tracing::debug!(rect = ?selection.rect, "drag started");
    }

    /// Commit a finished drag through the mutator. The selection is cleared
    /// before the mutation runs, so a failure still leaves the state machine
    /// in `Idle`.
    fn finish_drag(&mut self) -> Result<Outcome, crate::error::EditorError> {
        let Some(drag) = self.drag.take() else {
            return Ok(Outcome::None);
        };
        let Some(selection) = self.selection.take() else {
            return Ok(Outcome::None);
        };
        if !drag.moved {
            tracing::debug!("zero-delta drag, nothing committed");
            return Ok(Outcome::NeedsRender);
        }
        match selection.target {
            // The stroke was translated live during the moves.
            SelectionTarget::Stroke { .. } => Ok(Outcome::NeedsRender),
            SelectionTarget::Text { text } => {
                mutate::move_text(
                    &mut self.engine,
                    self.page,
                    drag.original,
                    drag.current,
                    &text,
                    &self.config,
                )?;
                self.refresh()?;
                Ok(Outcome::NeedsRender)
            }
            SelectionTarget::Field { name } => {
                mutate::move_field(&mut self.engine, self.page, &name, drag.current)?;
                self.refresh()?;
                Ok(Outcome::NeedsRender)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::{EngineCall, MockEngine};
    use crate::engine::{WidgetInfo, WordBox};
    use crate::settings::EditorConfig;
    use kurbo::Size;

    fn word(text: &str, rect: Rect) -> WordBox {
        WordBox {
            text: text.into(),
            rect,
            block: 0,
            line: 0,
            word: 0,
        }
    }

    fn scaled_session() -> EditSession<MockEngine> {
        // Page 306x396 in a 612x792 view: scale 2, no padding.
        let engine = MockEngine::default()
            .with_page(Size::new(306.0, 396.0))
            .with_words(0, vec![word("Hi.", Rect::new(10.0, 10.0, 40.0, 20.0))]);
        EditSession::open(engine, Size::new(612.0, 792.0), EditorConfig::new()).unwrap()
    }

    #[test]
    fn click_selects_the_unit_under_the_scaled_point() {
        let mut session = scaled_session();
        // Viewport (40,30) maps to document (20,15), inside the unit.
        let outcome = session.pointer_down(Point::new(40.0, 30.0));
        assert_eq!(
            outcome,
            Outcome::SelectedText {
                seed: "Hi.".into(),
                rect: Rect::new(16.0, 16.0, 84.0, 44.0),
            }
        );
    }

    #[test]
    fn miss_clears_the_selection_and_reports_it() {
        let mut session = scaled_session();
        session.pointer_down(Point::new(40.0, 30.0));
        // Second click would start a drag, so release it with no movement
        // first to get back to an unselected state.
        session.pointer_down(Point::new(40.0, 30.0));
        session.pointer_up(Point::new(40.0, 30.0)).unwrap();

        let outcome = session.pointer_down(Point::new(500.0, 700.0));
        assert_eq!(outcome, Outcome::Miss);
        assert!(session.selection().is_none());
    }

    #[test]
    fn drag_commit_divides_the_viewport_delta_by_the_scale() {
        let mut session = scaled_session();
        session.pointer_down(Point::new(40.0, 30.0));
        session.pointer_down(Point::new(40.0, 30.0));
        assert_eq!(session.pointer_move(Point::new(70.0, 70.0)), Outcome::NeedsRender);
        session.pointer_up(Point::new(70.0, 70.0)).unwrap();

        // Viewport delta (30,40) becomes (15,20) in document units. The
        // unit rect (8,8,42,22) lands at (23,28,57,42); anchor is its top
        // left plus the font size down.
        assert_eq!(
            session.engine.calls,
            vec![
                EngineCall::Redact {
                    page: 0,
                    rect: Rect::new(8.0, 8.0, 42.0, 22.0)
                },
                EngineCall::ApplyRedactions { page: 0 },
                EngineCall::InsertText {
                    page: 0,
                    at: Point::new(23.0, 40.0),
                    text: "Hi.".into(),
                },
            ]
        );
        assert!(session.selection().is_none());
    }

    #[test]
    fn zero_delta_drag_commits_nothing() {
        let mut session = scaled_session();
        session.pointer_down(Point::new(40.0, 30.0));
        session.pointer_down(Point::new(40.0, 30.0));
        session.pointer_up(Point::new(40.0, 30.0)).unwrap();

        assert!(session.engine.calls.is_empty());
        assert!(session.selection().is_none());
    }

    #[test]
    fn failed_drag_commit_surfaces_the_error_and_clears_the_selection() {
        let mut session = scaled_session();
        session.engine.fail_redact = true;
        session.pointer_down(Point::new(40.0, 30.0));
        session.pointer_down(Point::new(40.0, 30.0));
        session.pointer_move(Point::new(70.0, 70.0));

        let err = session.pointer_up(Point::new(70.0, 70.0)).unwrap_err();
        assert!(!err.is_data_loss());
        assert!(session.selection().is_none());
    }

    #[test]
    fn field_drag_reassigns_the_widget_rect() {
        let engine = MockEngine::single_page().with_widgets(
            0,
            vec![WidgetInfo {
                name: "name".into(),
                kind: WidgetKind::Text,
                rect: Rect::new(10.0, 10.0, 110.0, 30.0),
                value: "Ada".into(),
                on_value: None,
            }],
        );
        let mut session =
            EditSession::open(engine, Size::new(612.0, 792.0), EditorConfig::new()).unwrap();

        let outcome = session.pointer_down(Point::new(50.0, 20.0));
        assert_eq!(
            outcome,
            Outcome::SelectedField {
                name: "name".into(),
                seed: "Ada".into(),
                rect: Rect::new(10.0, 10.0, 110.0, 30.0),
            }
        );

        session.pointer_down(Point::new(50.0, 20.0));
        session.pointer_move(Point::new(55.0, 25.0));
        session.pointer_up(Point::new(55.0, 25.0)).unwrap();

        assert_eq!(
            session.engine.widget(0, "name").unwrap().rect,
            Rect::new(15.0, 15.0, 115.0, 35.0)
        );
        assert!(session.engine.calls.contains(&EngineCall::CommitWidget {
            page: 0,
            name: "name".into()
        }));
    }

    #[test]
    fn stroke_drag_translates_the_stroke_without_touching_the_document() {
        let mut session = scaled_session();
        session.toggle_draw_mode();
        session.pointer_down(Point::new(100.0, 100.0));
        session.pointer_move(Point::new(140.0, 140.0));
        session.pointer_up(Point::new(140.0, 140.0)).unwrap();
        session.toggle_draw_mode();

        let outcome = session.pointer_down(Point::new(120.0, 120.0));
        let id = match outcome {
            Outcome::SelectedStroke { id, .. } => id,
            other => panic!("expected a stroke selection, got {other:?}"),
        };

        session.pointer_down(Point::new(120.0, 120.0));
        session.pointer_move(Point::new(130.0, 125.0));
        session.pointer_up(Point::new(130.0, 125.0)).unwrap();

        let stroke = session.strokes.get(id).unwrap();
        assert_eq!(stroke.points[0], Point::new(110.0, 105.0));
        assert_eq!(stroke.bbox, Rect::new(110.0, 105.0, 150.0, 145.0));
        assert!(session.engine.calls.is_empty());
        assert!(session.selection().is_none());
    }

    #[test]
    fn draw_mode_reports_growing_segments() {
        let mut session = scaled_session();
        session.toggle_draw_mode();

        assert_eq!(session.pointer_down(Point::new(0.0, 0.0)), Outcome::None);
        assert_eq!(
            session.pointer_move(Point::new(5.0, 5.0)),
            Outcome::StrokeSegment {
                from: Point::new(0.0, 0.0),
                to: Point::new(5.0, 5.0),
            }
        );
        assert_eq!(
            session.pointer_up(Point::new(5.0, 5.0)).unwrap(),
            Outcome::NeedsRender
        );
        assert_eq!(session.strokes.strokes().len(), 1);
    }

    #[test]
    fn single_click_in_draw_mode_leaves_no_stroke() {
        let mut session = scaled_session();
        session.toggle_draw_mode();
        session.pointer_down(Point::new(10.0, 10.0));
        assert_eq!(
            session.pointer_up(Point::new(10.0, 10.0)).unwrap(),
            Outcome::None
        );
        assert!(session.strokes.strokes().is_empty());
    }
}
