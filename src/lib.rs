// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Spatial annotation and content-mutation core for paginated documents.
//!
//! Pagemark is the editing layer of an interactive document editor: it maps
//! viewport clicks into document space, clusters raw word boxes into
//! editable text units, hit-tests text runs, form widgets, and freehand
//! strokes under a point, tracks a movable selection across the coordinate
//! transform, and commits edits through an erase-then-reinsert protocol
//! that never leaves the document half-applied outside one documented
//! unsafe window.
//!
//! Parsing, rasterization, and low-level mutation are delegated to a
//! [`DocumentEngine`]; windowing and widgets are the host shell's job. The
//! shell drives an [`EditSession`] with pointer events and commands and
//! receives [`Outcome`]s and [`RenderFrame`]s back.

pub mod cluster;
pub mod engine;
pub mod error;
pub mod mutate;
pub mod overlay;
pub mod selection;
pub mod session;
pub mod settings;
pub mod stroke;
pub mod theme;
pub mod viewport;

pub use cluster::TextUnit;
pub use engine::{Bitmap, DocumentEngine, EngineError, WidgetInfo, WidgetKind, WordBox};
pub use error::EditorError;
pub use mutate::MutationError;
pub use overlay::{Overlay, OverlayShape};
pub use selection::{Selection, SelectionTarget};
pub use session::{EditSession, Mode, Outcome, RenderFrame};
pub use settings::{EditorConfig, FontFamily, Rgb};
pub use stroke::{Stroke, StrokeId, StrokeLayer};
pub use viewport::Viewport;
