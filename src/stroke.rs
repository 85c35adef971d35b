// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Freehand stroke storage and its undo history.
//!
//! Strokes live in viewport pixel space and belong to the current page
//! session only: navigating away clears the layer and the undo stack. They
//! become document content at save time, when their points are mapped back
//! through the viewport transform and baked as paths.
//!
//! The undo stack is append-only and records stroke creation only. Deleting
//! a stroke through selection also drops its undo entry so the two
//! structures stay consistent.

use crate::settings::Rgb;
use kurbo::{Point, Rect, Vec2};
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a stroke, never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StrokeId(u64);

static STROKE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl StrokeId {
    pub fn next() -> Self {
        Self(STROKE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A freehand annotation path.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub id: StrokeId,
    /// Ordered points in viewport pixel space, always at least two.
    pub points: Vec<Point>,
    /// Cached bounding box of `points`, viewport space.
    pub bbox: Rect,
    pub color: Rgb,
    pub width: f64,
}

impl Stroke {
    fn bbox_of(points: &[Point]) -> Rect {
        let first = points[0];
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            rect.x0 = rect.x0.min(p.x);
            rect.y0 = rect.y0.min(p.y);
            rect.x1 = rect.x1.max(p.x);
            rect.y1 = rect.y1.max(p.y);
        }
        rect
    }

    /// Translate every point and refresh the cached bounding box.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
        self.bbox = Self::bbox_of(&self.points);
    }
}

/// Completed strokes, in-progress capture, and the undo stack.
#[derive(Debug, Default)]
pub struct StrokeLayer {
    strokes: Vec<Stroke>,
    undo_stack: Vec<StrokeId>,
    pending: Vec<Point>,
}

impl StrokeLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| s.id == id)
    }

    /// Start capturing a stroke at `p`.
    pub fn begin(&mut self, p: Point) {
        self.pending.clear();
        self.pending.push(p);
    }

    /// Append a point to the in-progress stroke.
    ///
    /// Returns the newly grown segment so the host can draw it
    /// incrementally, or `None` when no capture is active.
    pub fn extend(&mut self, p: Point) -> Option<(Point, Point)> {
        let prev = *self.pending.last()?;
        self.pending.push(p);
        Some((prev, p))
    }

    /// Close the in-progress stroke and push it onto the layer and the
    /// undo stack. Single-click strokes (fewer than two points) are
    /// discarded.
    pub fn finish(&mut self, color: Rgb, width: f64) -> Option<StrokeId> {
        let points = std::mem::take(&mut self.pending);
        if points.len() < 2 {
            if !points.is_empty() {
                tracing::debug!("discarding single-point stroke");
            }
            return None;
        }
        let stroke = Stroke {
            id: StrokeId::next(),
            bbox: Stroke::bbox_of(&points),
            points,
            color,
            width,
        };
        let id = stroke.id;
        self.strokes.push(stroke);
        self.undo_stack.push(id);
        Some(id)
    }

    pub fn cancel_pending(&mut self) {
        self.pending.clear();
    }

    /// Pop the most recent stroke-creation entry and remove that stroke.
    ///
    /// An empty stack is a reported no-op, not an error.
    pub fn undo(&mut self) -> Option<StrokeId> {
        let id = match self.undo_stack.pop() {
            Some(id) => id,
            None => {
                tracing::debug!("undo stack is empty");
                return None;
            }
        };
        let before = self.strokes.len();
        self.strokes.retain(|s| s.id != id);
        if self.strokes.len() == before {
            tracing::warn!(?id, "undo entry had no matching stroke");
        }
        Some(id)
    }

    /// Remove a stroke by id, also dropping its undo entry if present.
    pub fn remove(&mut self, id: StrokeId) -> bool {
        let before = self.strokes.len();
        self.strokes.retain(|s| s.id != id);
        self.undo_stack.retain(|&entry| entry != id);
        self.strokes.len() != before
    }

    /// Topmost stroke whose bounding box contains `p` (viewport space).
    /// Most recently drawn wins.
    pub fn hit_topmost(&self, p: Point) -> Option<StrokeId> {
        self.strokes
            .iter()
            .rev()
            .find(|s| s.bbox.contains(p))
            .map(|s| s.id)
    }

    /// Rewrite every stored point through `f` and refresh the cached
    /// bounding boxes. Used when the viewport transform changes so strokes
    /// keep their page position. Any in-progress capture is discarded.
    pub fn remap(&mut self, f: impl Fn(Point) -> Point) {
        for stroke in &mut self.strokes {
            for p in &mut stroke.points {
                *p = f(*p);
            }
            stroke.bbox = Stroke::bbox_of(&stroke.points);
        }
        self.pending.clear();
    }

    /// Drop everything, including the undo history. Called on navigation.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.undo_stack.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb = Rgb([0, 0, 0]);

    fn draw(layer: &mut StrokeLayer, points: &[(f64, f64)]) -> Option<StrokeId> {
        let mut iter = points.iter();
        let (x, y) = iter.next().copied()?;
        layer.begin(Point::new(x, y));
        for &(x, y) in iter {
            layer.extend(Point::new(x, y));
        }
        layer.finish(BLACK, 2.0)
    }

    #[test]
    fn undo_removes_the_most_recent_stroke() {
        let mut layer = StrokeLayer::new();
        let a = draw(&mut layer, &[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        let b = draw(&mut layer, &[(20.0, 20.0), (30.0, 30.0)]).unwrap();

        assert_eq!(layer.undo(), Some(b));
        assert_eq!(layer.strokes().len(), 1);
        assert_eq!(layer.strokes()[0].id, a);
    }

    #[test]
    fn undo_on_empty_history_is_a_noop() {
        let mut layer = StrokeLayer::new();
        assert_eq!(layer.undo(), None);
    }

    #[test]
    fn single_point_stroke_is_discarded() {
        let mut layer = StrokeLayer::new();
        layer.begin(Point::new(5.0, 5.0));
        assert_eq!(layer.finish(BLACK, 2.0), None);
        assert!(layer.is_empty());
        assert_eq!(layer.undo(), None);
    }

    #[test]
    fn delete_via_selection_drops_the_undo_entry() {
        let mut layer = StrokeLayer::new();
        let a = draw(&mut layer, &[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        let b = draw(&mut layer, &[(20.0, 20.0), (30.0, 30.0)]).unwrap();

        assert!(layer.remove(b));
        // Undo now pops A, not the already-deleted B.
        assert_eq!(layer.undo(), Some(a));
        assert!(layer.is_empty());
    }

    #[test]
    fn hit_topmost_prefers_most_recently_drawn() {
        let mut layer = StrokeLayer::new();
        let _a = draw(&mut layer, &[(0.0, 0.0), (50.0, 50.0)]).unwrap();
        let b = draw(&mut layer, &[(10.0, 10.0), (40.0, 40.0)]).unwrap();

        assert_eq!(layer.hit_topmost(Point::new(25.0, 25.0)), Some(b));
        assert_eq!(layer.hit_topmost(Point::new(200.0, 200.0)), None);
    }

    #[test]
    fn translate_refreshes_bbox() {
        let mut layer = StrokeLayer::new();
        let id = draw(&mut layer, &[(0.0, 0.0), (10.0, 20.0)]).unwrap();
        layer.get_mut(id).unwrap().translate(Vec2::new(5.0, -5.0));

        let stroke = layer.get(id).unwrap();
        assert_eq!(stroke.bbox, Rect::new(5.0, -5.0, 15.0, 15.0));
        assert_eq!(stroke.points[0], Point::new(5.0, -5.0));
    }

    #[test]
    fn clear_resets_strokes_and_history() {
        let mut layer = StrokeLayer::new();
        draw(&mut layer, &[(0.0, 0.0), (10.0, 10.0)]);
        layer.clear();
        assert!(layer.is_empty());
        assert_eq!(layer.undo(), None);
    }
}
