// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Bidirectional mapping between document space and viewport space.
//!
//! The page is scaled uniformly to fit the viewport (aspect ratio preserved)
//! and centered when the scaled page is smaller than the viewport in either
//! axis. The centering offset is tracked in document-space units so both
//! directions of the transform share the same numbers.

use kurbo::{Point, Rect, Size, Vec2};

/// Viewport transform for the currently rendered page.
///
/// Recomputed from scratch on every render (page change, resize, or
/// navigation), never updated incrementally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Uniform document-to-viewport scale factor.
    pub scale: f64,
    /// Document-space position of the viewport origin. Negative components
    /// mean the page is centered with padding (offset = -padding / scale).
    pub offset: Vec2,
    /// Viewport size in pixels.
    pub view_size: Size,
    /// Page size in document units.
    pub page_size: Size,
}

impl Viewport {
    /// Fit `page_size` into `view_size` with a uniform scale and centering.
    pub fn fit(page_size: Size, view_size: Size) -> Self {
        let scale = (view_size.width / page_size.width)
            .min(view_size.height / page_size.height);
        let pad_x = ((view_size.width - page_size.width * scale) / 2.0).max(0.0);
        let pad_y = ((view_size.height - page_size.height * scale) / 2.0).max(0.0);

        Self {
            scale,
            offset: Vec2::new(-pad_x / scale, -pad_y / scale),
            view_size,
            page_size,
        }
    }

    /// Map a viewport-space point to document space.
    pub fn to_document(&self, p: Point) -> Point {
        Point::new(
            p.x / self.scale + self.offset.x,
            p.y / self.scale + self.offset.y,
        )
    }

    /// Map a document-space point to viewport space.
    pub fn to_viewport(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) * self.scale,
            (p.y - self.offset.y) * self.scale,
        )
    }

    /// Map a document-space rect to viewport space.
    pub fn rect_to_viewport(&self, r: Rect) -> Rect {
        let p0 = self.to_viewport(Point::new(r.x0, r.y0));
        let p1 = self.to_viewport(Point::new(r.x1, r.y1));
        Rect::new(p0.x, p0.y, p1.x, p1.y)
    }

    /// Viewport-space rect covering the rendered page area.
    pub fn page_frame(&self) -> Rect {
        self.rect_to_viewport(Rect::new(
            0.0,
            0.0,
            self.page_size.width,
            self.page_size.height,
        ))
    }
}
