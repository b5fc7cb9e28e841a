// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song and note store for a piano-roll annotation editor.
//!
//! Songs have a duration and eight labeled tracks; notes are markers placed
//! at a (track, time) slot, at most one per slot. All state lives in a
//! [`SongStore`], which persists a snapshot after every change and can
//! export/import the whole collection as a JSON document.

pub mod config;
pub mod logging;
pub mod model;
pub mod store;

pub use model::{Note, NoteDraft, NoteId, NoteUpdate, Song, SongDraft, SongId, SongUpdate};
pub use store::{JsonFileStorage, MemoryStorage, SnapshotStorage, SongStore, StoreError};
