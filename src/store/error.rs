// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Store error type.

use thiserror::Error;

use super::storage::StorageError;
use crate::model::{NoteId, SongId, ValidationError};

/// Failure of a store operation. The store is unchanged whenever one is returned.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("song not found: {0}")]
    SongNotFound(SongId),

    #[error("note not found: {0}")]
    NoteNotFound(NoteId),

    #[error("a note already exists at track {track}, time {time}s")]
    DuplicatePosition { track: u8, time: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("import rejected: {0}")]
    MalformedImport(String),

    #[error("stored snapshot is unreadable: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("failed to encode songs: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    /// Whether this is a song or note lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::SongNotFound(_) | StoreError::NoteNotFound(_))
    }
}
