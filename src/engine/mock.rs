// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Scriptable in-memory document engine.
//!
//! `MockEngine` backs the crate's tests and is useful for host-shell
//! development before a real engine is wired in. It records every mutating
//! call in order, applies widget mutations to its own widget table so the
//! next extraction observes them, and has per-call failure switches for
//! exercising the safe/unsafe mutation error paths.

use super::{Bitmap, DocumentEngine, EngineError, WidgetInfo, WordBox};
use kurbo::{Point, Rect, Size};
use std::path::{Path, PathBuf};

/// One page of scripted content.
#[derive(Debug, Clone, Default)]
pub struct MockPage {
    pub size: Size,
    pub words: Vec<WordBox>,
    pub widgets: Vec<WidgetInfo>,
}

/// A recorded mutating engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Redact { page: usize, rect: Rect },
    ApplyRedactions { page: usize },
    InsertText { page: usize, at: Point, text: String },
    SetWidgetValue { page: usize, name: String, value: String },
    SetWidgetRect { page: usize, name: String, rect: Rect },
    CommitWidget { page: usize, name: String },
    DeleteWidget { page: usize, name: String },
    DrawPath { page: usize, points: Vec<Point>, width: f64 },
    Save { path: PathBuf },
}

/// In-memory engine with a call log and failure injection.
#[derive(Debug, Default)]
pub struct MockEngine {
    pages: Vec<MockPage>,
    encrypted: bool,
    /// Ordered log of every mutating call.
    pub calls: Vec<EngineCall>,
    pub fail_rasterize: bool,
    pub fail_words: bool,
    pub fail_widgets: bool,
    pub fail_redact: bool,
    pub fail_apply_redactions: bool,
    pub fail_insert_text: bool,
    pub fail_commit_widget: bool,
}

impl MockEngine {
    /// Engine with a single empty US-letter page.
    pub fn single_page() -> Self {
        Self::default().with_page(Size::new(612.0, 792.0))
    }

    pub fn encrypted() -> Self {
        Self {
            encrypted: true,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, size: Size) -> Self {
        self.pages.push(MockPage {
            size,
            ..MockPage::default()
        });
        self
    }

    pub fn with_words(mut self, page: usize, words: Vec<WordBox>) -> Self {
        self.pages[page].words = words;
        self
    }

    pub fn with_widgets(mut self, page: usize, widgets: Vec<WidgetInfo>) -> Self {
        self.pages[page].widgets = widgets;
        self
    }

    /// Current widget state, for asserting committed values.
    pub fn widget(&self, page: usize, name: &str) -> Option<&WidgetInfo> {
        self.pages
            .get(page)?
            .widgets
            .iter()
            .find(|w| w.name == name)
    }

    /// Recorded text insertions, in order.
    pub fn inserted_texts(&self) -> Vec<&EngineCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, EngineCall::InsertText { .. }))
            .collect()
    }

    fn page(&self, page: usize) -> Result<&MockPage, EngineError> {
        self.pages
            .get(page)
            .ok_or_else(|| EngineError::new(format!("page {page} out of range")))
    }

    fn fail_if(flag: bool, what: &str) -> Result<(), EngineError> {
        if flag {
            Err(EngineError::new(format!("scripted {what} failure")))
        } else {
            Ok(())
        }
    }

    fn page_mut(&mut self, page: usize) -> Result<&mut MockPage, EngineError> {
        self.pages
            .get_mut(page)
            .ok_or_else(|| EngineError::new(format!("page {page} out of range")))
    }
}

impl DocumentEngine for MockEngine {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    fn page_size(&self, page: usize) -> Result<Size, EngineError> {
        Ok(self.page(page)?.size)
    }

    fn rasterize(&mut self, page: usize, scale: f64) -> Result<Bitmap, EngineError> {
        Self::fail_if(self.fail_rasterize, "rasterize")?;
        let size = self.page(page)?.size;
        let width = (size.width * scale).round() as u32;
        let height = (size.height * scale).round() as u32;
        Ok(Bitmap {
            width,
            height,
            pixels: vec![0xff; (width * height * 3) as usize],
        })
    }

    fn words(&self, page: usize) -> Result<Vec<WordBox>, EngineError> {
        Self::fail_if(self.fail_words, "word extraction")?;
        Ok(self.page(page)?.words.clone())
    }

    fn widgets(&self, page: usize) -> Result<Vec<WidgetInfo>, EngineError> {
        Self::fail_if(self.fail_widgets, "widget extraction")?;
        Ok(self.page(page)?.widgets.clone())
    }

    fn redact(&mut self, page: usize, rect: Rect) -> Result<(), EngineError> {
        Self::fail_if(self.fail_redact, "redact")?;
        self.page(page)?;
        self.calls.push(EngineCall::Redact { page, rect });
        Ok(())
    }

    fn apply_redactions(&mut self, page: usize) -> Result<(), EngineError> {
        Self::fail_if(self.fail_apply_redactions, "apply_redactions")?;
        self.page(page)?;
        self.calls.push(EngineCall::ApplyRedactions { page });
        Ok(())
    }

    fn insert_text(
        &mut self,
        page: usize,
        at: Point,
        text: &str,
        _font_size: f64,
        _font: &str,
        _color: [f32; 3],
    ) -> Result<(), EngineError> {
        Self::fail_if(self.fail_insert_text, "insert_text")?;
        self.page(page)?;
        self.calls.push(EngineCall::InsertText {
            page,
            at,
            text: text.to_string(),
        });
        Ok(())
    }

    fn set_widget_value(
        &mut self,
        page: usize,
        name: &str,
        value: &str,
    ) -> Result<(), EngineError> {
        let widget = self
            .page_mut(page)?
            .widgets
            .iter_mut()
            .find(|w| w.name == name)
            .ok_or_else(|| EngineError::new(format!("no widget '{name}'")))?;
        widget.value = value.to_string();
        self.calls.push(EngineCall::SetWidgetValue {
            page,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn set_widget_rect(&mut self, page: usize, name: &str, rect: Rect) -> Result<(), EngineError> {
        let widget = self
            .page_mut(page)?
            .widgets
            .iter_mut()
            .find(|w| w.name == name)
            .ok_or_else(|| EngineError::new(format!("no widget '{name}'")))?;
        widget.rect = rect;
        self.calls.push(EngineCall::SetWidgetRect {
            page,
            name: name.to_string(),
            rect,
        });
        Ok(())
    }

    fn commit_widget(&mut self, page: usize, name: &str) -> Result<(), EngineError> {
        Self::fail_if(self.fail_commit_widget, "commit_widget")?;
        self.page(page)?;
        self.calls.push(EngineCall::CommitWidget {
            page,
            name: name.to_string(),
        });
        Ok(())
    }

    fn delete_widget(&mut self, page: usize, name: &str) -> Result<(), EngineError> {
        let widgets = &mut self.page_mut(page)?.widgets;
        let before = widgets.len();
        widgets.retain(|w| w.name != name);
        if widgets.len() == before {
            return Err(EngineError::new(format!("no widget '{name}'")));
        }
        self.calls.push(EngineCall::DeleteWidget {
            page,
            name: name.to_string(),
        });
        Ok(())
    }

    fn draw_path(
        &mut self,
        page: usize,
        points: &[Point],
        _color: [f32; 3],
        width: f64,
    ) -> Result<(), EngineError> {
        self.page(page)?;
        self.calls.push(EngineCall::DrawPath {
            page,
            points: points.to_vec(),
            width,
        });
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Save {
            path: path.to_path_buf(),
        });
        Ok(())
    }
}
