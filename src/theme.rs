// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Overlay colors and stroke styling constants.
//!
//! All colors use hexadecimal format: Color::from_rgb8(0xRR, 0xGG, 0xBB)

use peniko::Color;

// ============================================================================
// SELECTION HIGHLIGHTS -- keyed by selection kind
// ============================================================================
/// Selected text unit.
pub const HIGHLIGHT_TEXT: Color = Color::from_rgb8(0xe0, 0x20, 0x20);
/// Selected form field.
pub const HIGHLIGHT_FIELD: Color = Color::from_rgb8(0x20, 0xa0, 0x20);
/// Selected freehand stroke.
pub const HIGHLIGHT_STROKE: Color = Color::from_rgb8(0x80, 0x20, 0xa0);

pub const HIGHLIGHT_WIDTH: f64 = 2.0;

// ============================================================================
// FORM FIELD OVERLAY
// ============================================================================
/// Dashed outline drawn around every extracted widget.
pub const FIELD_OUTLINE: Color = Color::from_rgb8(0x20, 0x50, 0xe0);
pub const FIELD_OUTLINE_WIDTH: f64 = 2.0;
pub const FIELD_DASH: [f64; 2] = [4.0, 2.0];

/// Tick mark inside a checked checkbox.
pub const CHECKBOX_TICK: Color = Color::from_rgb8(0x20, 0xa0, 0x20);
pub const CHECKBOX_TICK_WIDTH: f64 = 2.0;
/// Inset of the tick endpoints from the checkbox edges, viewport pixels.
pub const CHECKBOX_TICK_PADDING: f64 = 4.0;

// ============================================================================
// DRAG PREVIEW
// ============================================================================
/// Dashed rectangle shown at the previewed position during a drag.
pub const DRAG_PREVIEW: Color = Color::from_rgb8(0xff, 0xa5, 0x00);
pub const DRAG_PREVIEW_WIDTH: f64 = 2.0;
pub const DRAG_DASH: [f64; 2] = [2.0, 2.0];
