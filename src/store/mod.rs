// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song store: the single owner of all songs and notes.
//!
//! This module provides:
//! - `SongStore`: song and note commands, current-song selection, export/import
//! - Snapshot persistence through an injected `SnapshotStorage`
//! - An advisory busy status reported around each command
//!
//! Every command either fully succeeds (state updated and persisted) or
//! returns an error with the state untouched.

pub mod error;
pub mod snapshot;
pub mod status;
pub mod storage;

use chrono::Utc;
use tracing::{debug, info, warn};

pub use error::StoreError;
pub use snapshot::{backup_file_name, StoreState, STORAGE_KEY};
pub use status::{StatusReporter, StoreStatus};
pub use storage::{JsonFileStorage, MemoryStorage, SnapshotStorage, StorageError};

use crate::model::note::{check_time, check_track};
use crate::model::{Note, NoteDraft, NoteId, NoteUpdate, Song, SongDraft, SongId, SongUpdate};
use snapshot::{decode_snapshot, encode_snapshot, export_document, parse_import};

/// Owns the song collection and the current-song selection
pub struct SongStore<S: SnapshotStorage> {
    state: StoreState,
    status: StoreStatus,
    storage: S,
    strict_import: bool,
    reporter: Option<Box<dyn StatusReporter>>,
}

impl<S: SnapshotStorage> SongStore<S> {
    /// Open a store over `storage`, restoring any saved snapshot.
    ///
    /// An empty slot yields an empty store. A slot that cannot be decoded
    /// is an error, so unreadable data is never overwritten.
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let state = match storage.load()? {
            Some(text) => decode_snapshot(&text)?,
            None => StoreState::default(),
        };
        info!(songs = state.songs.len(), "Opened song store");

        Ok(Self {
            state,
            status: StoreStatus::idle(),
            storage,
            strict_import: true,
            reporter: None,
        })
    }

    /// Builder: choose whether imports are fully validated (default) or shape-checked only
    pub fn with_strict_import(mut self, strict: bool) -> Self {
        self.strict_import = strict;
        self
    }

    /// Forward every status change to `reporter`
    pub fn set_status_reporter(&mut self, reporter: impl StatusReporter + 'static) {
        self.reporter = Some(Box::new(reporter));
    }

    /// Get the busy status
    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    /// Set the busy status
    pub fn set_loading(&mut self, busy: bool, message: impl Into<String>) {
        self.status = StoreStatus::new(busy, message);
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report(&self.status);
        }
    }

    /// Get the storage adapter
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Get the full state
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Get all songs in order
    pub fn songs(&self) -> &[Song] {
        &self.state.songs
    }

    /// Get a song by id
    pub fn song(&self, id: SongId) -> Option<&Song> {
        self.state.song(id)
    }

    /// Number of songs
    pub fn len(&self) -> usize {
        self.state.songs.len()
    }

    /// Check if there are no songs
    pub fn is_empty(&self) -> bool {
        self.state.songs.is_empty()
    }

    /// Get the selected song id, which may be stale
    pub fn current_song_id(&self) -> Option<SongId> {
        self.state.current_song_id
    }

    /// Get the selected song if it still exists
    pub fn current_song(&self) -> Option<&Song> {
        self.state.current_song_id.and_then(|id| self.state.song(id))
    }

    /// Select a song. The id is stored as given.
    pub fn set_current_song(&mut self, id: SongId) -> Result<(), StoreError> {
        self.commit(|state| {
            state.current_song_id = Some(id);
            Ok(())
        })?;
        debug!(song = %id, "Selected song");
        Ok(())
    }

    /// Create a song from a draft and select it
    pub fn create_song(&mut self, draft: SongDraft) -> Result<Song, StoreError> {
        let song = self.transact("Creating song...", |state| {
            let song = draft.into_song(Utc::now())?;
            state.current_song_id = Some(song.id());
            state.songs.push(song.clone());
            Ok(song)
        })?;
        info!(song = %song.id(), name = song.name(), "Created song");
        Ok(song)
    }

    /// Merge `update` into a song
    pub fn update_song(&mut self, id: SongId, update: SongUpdate) -> Result<(), StoreError> {
        self.transact("Updating song...", |state| {
            let song = state.song_mut(id).ok_or(StoreError::SongNotFound(id))?;
            song.apply(update)?;
            song.touch(Utc::now());
            Ok(())
        })?;
        debug!(song = %id, "Updated song");
        Ok(())
    }

    /// Delete a song and its notes. Returns `None` if there was no such song.
    pub fn delete_song(&mut self, id: SongId) -> Result<Option<Song>, StoreError> {
        if self.song(id).is_none() {
            debug!(song = %id, "Delete of unknown song ignored");
            return Ok(None);
        }

        let removed = self.transact("Deleting song...", |state| {
            let index = state
                .songs
                .iter()
                .position(|s| s.id() == id)
                .ok_or(StoreError::SongNotFound(id))?;
            if state.current_song_id == Some(id) {
                state.current_song_id = None;
            }
            Ok(state.songs.remove(index))
        })?;
        info!(song = %id, notes = removed.notes().len(), "Deleted song");
        Ok(Some(removed))
    }

    /// Add a note to a song.
    ///
    /// Fails with `SongNotFound` for an unknown song and `DuplicatePosition`
    /// if another note already sits at the same track and time.
    pub fn add_note(&mut self, song_id: SongId, draft: NoteDraft) -> Result<Note, StoreError> {
        let note = self.transact("Adding note...", |state| {
            let song = state
                .song_mut(song_id)
                .ok_or(StoreError::SongNotFound(song_id))?;

            if song.conflicting_note(draft.track, draft.time, None).is_some() {
                return Err(StoreError::DuplicatePosition {
                    track: draft.track,
                    time: draft.time,
                });
            }

            let now = Utc::now();
            let note = draft.into_note(song.duration(), now)?;
            song.push_note(note.clone());
            song.touch(now);
            Ok(note)
        })?;
        debug!(song = %song_id, note = %note.id(), track = note.track(), time = note.time(), "Added note");
        Ok(note)
    }

    /// Merge `update` into a note and return the result.
    ///
    /// When track or time change, the effective slot must be free of every
    /// other note in the song. A note never conflicts with itself.
    pub fn update_note(
        &mut self,
        song_id: SongId,
        note_id: NoteId,
        update: NoteUpdate,
    ) -> Result<Note, StoreError> {
        let note = self.transact("Updating note...", |state| {
            let song = state
                .song_mut(song_id)
                .ok_or(StoreError::SongNotFound(song_id))?;
            let current = song.note(note_id).ok_or(StoreError::NoteNotFound(note_id))?;

            if update.is_positional() {
                let (track, time) = update.resolve_position(current);
                check_track(track)?;
                check_time(time, song.duration())?;
                if song.conflicting_note(track, time, Some(note_id)).is_some() {
                    return Err(StoreError::DuplicatePosition { track, time });
                }
            }
            update.validate_fields()?;

            let note = song
                .note_mut(note_id)
                .ok_or(StoreError::NoteNotFound(note_id))?;
            note.apply(update);
            let note = note.clone();
            song.touch(Utc::now());
            Ok(note)
        })?;
        debug!(song = %song_id, note = %note_id, "Updated note");
        Ok(note)
    }

    /// Delete a note. Returns `None` if the song or note does not exist.
    pub fn delete_note(&mut self, song_id: SongId, note_id: NoteId) -> Result<Option<Note>, StoreError> {
        if self.song(song_id).and_then(|s| s.note(note_id)).is_none() {
            debug!(song = %song_id, note = %note_id, "Delete of unknown note ignored");
            return Ok(None);
        }

        let removed = self.transact("Deleting note...", |state| {
            let song = state
                .song_mut(song_id)
                .ok_or(StoreError::SongNotFound(song_id))?;
            let removed = song.remove_note(note_id);
            song.touch(Utc::now());
            Ok(removed)
        })?;
        debug!(song = %song_id, note = %note_id, "Deleted note");
        Ok(removed)
    }

    /// Pretty-printed `{ "songs": [...] }` document of every song
    pub fn export_data(&mut self) -> Result<String, StoreError> {
        self.set_loading(true, "Exporting data...");
        let result = export_document(&self.state.songs);
        self.set_loading(false, "");

        let text = result?;
        info!(songs = self.len(), bytes = text.len(), "Exported songs");
        Ok(text)
    }

    /// Replace every song with those of an export document.
    ///
    /// Selects the first imported song (or none). On any failure the store
    /// is unchanged. Returns the number of imported songs.
    pub fn import_data(&mut self, text: &str) -> Result<usize, StoreError> {
        let strict = self.strict_import;
        let result = self.transact("Importing data...", |state| {
            let songs = parse_import(text, strict)?;
            state.current_song_id = songs.first().map(Song::id);
            state.songs = songs;
            Ok(state.songs.len())
        });

        match &result {
            Ok(count) => info!(songs = count, strict, "Imported songs"),
            Err(e) => warn!("Import failed: {}", e),
        }
        result
    }

    /// Remove every song and clear the selection
    pub fn clear_all_data(&mut self) -> Result<(), StoreError> {
        self.transact("Clearing data...", |state| {
            *state = StoreState::default();
            Ok(())
        })?;
        info!("Cleared all songs");
        Ok(())
    }

    /// Run a command with the busy status set around it
    fn transact<T>(
        &mut self,
        message: &str,
        op: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        self.set_loading(true, message);
        let result = self.commit(op);
        self.set_loading(false, "");
        result
    }

    /// Apply `op` to a copy of the state, persist it, then swap it in
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut working = self.state.clone();
        let value = op(&mut working)?;
        let text = encode_snapshot(&working)?;
        self.storage.save(&text)?;
        self.state = working;
        Ok(value)
    }
}
