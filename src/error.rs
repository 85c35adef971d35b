// Copyright 2026 the Pagemark Authors
// SPDX-License-Identifier: Apache-2.0

//! Session-level error taxonomy.
//!
//! Extraction failures are not represented here: word and widget extraction
//! degrade to empty sets for the page (with a logged warning) rather than
//! failing the render. A hit-test miss is likewise not an error; it surfaces
//! as [`crate::session::Outcome::Miss`].

use crate::engine::EngineError;
use crate::mutate::MutationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// Encrypted or edit-restricted documents are rejected outright.
    #[error("document is encrypted or has editing restrictions")]
    Encrypted,

    #[error("document has no pages")]
    EmptyDocument,

    /// Rasterization or page-geometry lookup failed. Page state unchanged.
    #[error("failed to render page {page}: {source}")]
    Render {
        page: usize,
        #[source]
        source: EngineError,
    },

    /// A committed edit failed. `MutationError` distinguishes the safe case
    /// (original content intact) from the unsafe one (content lost).
    #[error(transparent)]
    Mutation(#[from] MutationError),

    /// Rejected before reaching the mutator: empty text, invalid font size,
    /// command with no matching selection.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to save document: {0}")]
    Save(#[source] EngineError),
}

impl EditorError {
    /// Whether this failure destroyed original content (the documented
    /// unsafe window of the erase-then-reinsert protocol). Callers must
    /// warn the user explicitly in this case.
    pub fn is_data_loss(&self) -> bool {
        matches!(self, EditorError::Mutation(m) if m.is_data_loss())
    }
}
