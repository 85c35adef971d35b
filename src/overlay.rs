// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Declarative overlay draw list, rebuilt from session state each frame.
//!
//! The session never paints; it hands the host a list of viewport-space
//! shapes to composite over the rasterized page. Draw order matters and is
//! fixed: field outlines and ticks first, then strokes, then the selection
//! highlight, then the drag preview on top.

use crate::engine::{WidgetInfo, WidgetKind};
use crate::selection::Selection;
use crate::stroke::StrokeLayer;
use crate::theme;
use crate::viewport::Viewport;
use kurbo::{Point, Rect};
use peniko::Color;

/// A single shape in the overlay, all coordinates in viewport pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    Rect {
        rect: Rect,
        color: Color,
        width: f64,
        /// Dash pattern as (on, off) lengths; `None` draws solid.
        dash: Option<[f64; 2]>,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Polyline {
        points: Vec<Point>,
        color: Color,
        width: f64,
    },
}

/// Everything to draw over the page bitmap this frame, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub shapes: Vec<OverlayShape>,
}

/// Assemble the overlay for the current frame.
///
/// `drag_preview` is the previewed rect of an in-flight drag, already in
/// viewport space.
pub fn build_overlay(
    viewport: &Viewport,
    fields: &[WidgetInfo],
    strokes: &StrokeLayer,
    selection: Option<&Selection>,
    drag_preview: Option<Rect>,
) -> Overlay {
    let mut shapes = Vec::new();

    for field in fields {
        let rect = viewport.rect_to_viewport(field.rect);
        shapes.push(OverlayShape::Rect {
            rect,
            color: theme::FIELD_OUTLINE,
            width: theme::FIELD_OUTLINE_WIDTH,
            dash: Some(theme::FIELD_DASH),
        });
        if field.kind == WidgetKind::Checkbox && field.is_checked() {
            push_tick(&mut shapes, rect);
        }
    }

    for stroke in strokes.strokes() {
        shapes.push(OverlayShape::Polyline {
            points: stroke.points.clone(),
            color: stroke.color.to_color(),
            width: stroke.width,
        });
    }

    if let Some(selection) = selection {
        // Stroke selections are stored in viewport space already; text and
        // field rects live in document space.
        let rect = if selection.is_stroke() {
            selection.rect
        } else {
            viewport.rect_to_viewport(selection.rect)
        };
        shapes.push(OverlayShape::Rect {
            rect,
            color: selection.highlight_color(),
            width: theme::HIGHLIGHT_WIDTH,
            dash: None,
        });
    }

    if let Some(rect) = drag_preview {
        shapes.push(OverlayShape::Rect {
            rect,
            color: theme::DRAG_PREVIEW,
            width: theme::DRAG_PREVIEW_WIDTH,
            dash: Some(theme::DRAG_DASH),
        });
    }

    Overlay { shapes }
}

/// Two-segment tick inside a checked checkbox, inset from its edges.
fn push_tick(shapes: &mut Vec<OverlayShape>, rect: Rect) {
    let pad = theme::CHECKBOX_TICK_PADDING;
    let low = Point::new(rect.center().x, rect.y1 - pad);
    shapes.push(OverlayShape::Line {
        from: Point::new(rect.x0 + pad, rect.y0 + pad),
        to: low,
        color: theme::CHECKBOX_TICK,
        width: theme::CHECKBOX_TICK_WIDTH,
    });
    shapes.push(OverlayShape::Line {
        from: low,
        to: Point::new(rect.x1 - pad, rect.y0 + pad),
        color: theme::CHECKBOX_TICK,
        width: theme::CHECKBOX_TICK_WIDTH,
    });
}
