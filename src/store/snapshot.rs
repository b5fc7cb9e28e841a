// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Snapshot encoding for persistence and export/import.
//!
//! Two documents are produced here:
//! - the persisted snapshot, `{ "state": { "songs", "currentSongId" }, "version" }`
//! - the export document, `{ "songs": [...] }`, pretty-printed

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;
use crate::model::{Song, SongId, ValidationError};

/// Fixed namespace of the persisted slot
pub const STORAGE_KEY: &str = "midi-editor-data";

/// Version written into persisted snapshots
pub const SNAPSHOT_VERSION: u32 = 0;

/// Everything the store persists
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Songs in insertion/import order
    #[serde(default)]
    pub songs: Vec<Song>,
    /// Currently selected song, possibly stale
    #[serde(default)]
    pub current_song_id: Option<SongId>,
}

impl StoreState {
    /// Find a song by id
    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|s| s.id() == id)
    }

    /// Find a song by id, mutably
    pub fn song_mut(&mut self, id: SongId) -> Option<&mut Song> {
        self.songs.iter_mut().find(|s| s.id() == id)
    }
}

#[derive(Serialize)]
struct PersistedRef<'a> {
    state: &'a StoreState,
    version: u32,
}

#[derive(Deserialize)]
struct Persisted {
    state: StoreState,
    #[serde(default)]
    #[allow(dead_code)]
    version: u32,
}

/// Encode the state for the persisted slot
pub fn encode_snapshot(state: &StoreState) -> Result<String, StoreError> {
    serde_json::to_string(&PersistedRef {
        state,
        version: SNAPSHOT_VERSION,
    })
    .map_err(StoreError::Encode)
}

/// Decode the persisted slot
pub fn decode_snapshot(text: &str) -> Result<StoreState, StoreError> {
    serde_json::from_str::<Persisted>(text)
        .map(|p| p.state)
        .map_err(StoreError::Snapshot)
}

#[derive(Serialize)]
struct ExportRef<'a> {
    songs: &'a [Song],
}

/// Export document for a song collection
pub fn export_document(songs: &[Song]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(&ExportRef { songs }).map_err(StoreError::Encode)
}

/// Parse an export document.
///
/// The text must be JSON with a `songs` array whose entries decode as songs.
/// With `strict`, every song is also checked by [`validate_songs`].
pub fn parse_import(text: &str, strict: bool) -> Result<Vec<Song>, StoreError> {
    let mut document: Value = serde_json::from_str(text)
        .map_err(|e| StoreError::MalformedImport(format!("not valid JSON: {}", e)))?;

    let songs = match document.get_mut("songs") {
        Some(songs) if songs.is_array() => songs.take(),
        Some(_) => {
            return Err(StoreError::MalformedImport(
                "`songs` is not an array".to_string(),
            ))
        }
        None => {
            return Err(StoreError::MalformedImport(
                "missing `songs` array".to_string(),
            ))
        }
    };

    let songs: Vec<Song> = serde_json::from_value(songs)
        .map_err(|e| StoreError::MalformedImport(format!("invalid song entry: {}", e)))?;

    if strict {
        validate_songs(&songs)
            .map_err(|e| StoreError::MalformedImport(e.to_string()))?;
    }

    Ok(songs)
}

/// Check every song and that song ids are unique
pub fn validate_songs(songs: &[Song]) -> Result<(), ValidationError> {
    let mut ids = HashSet::with_capacity(songs.len());
    for song in songs {
        if !ids.insert(song.id()) {
            return Err(ValidationError::DuplicateSongId(song.id()));
        }
        song.validate()?;
    }
    Ok(())
}

/// File name offered for a backup taken on `date`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("midi-editor-backup-{}.json", date.format("%Y-%m-%d"))
}
