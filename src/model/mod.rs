// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song and note data model.
//!
//! This module provides:
//! - Songs: named, timed containers with eight labeled tracks
//! - Notes: markers placed at a (track, time) slot within a song
//! - Drafts and partial updates, normalized and checked before use

pub mod ids;
pub mod note;
pub mod song;

use thiserror::Error;

pub use ids::{NoteId, SongId};
pub use note::{Note, NoteDraft, NoteUpdate, DEFAULT_NOTE_COLOR};
pub use song::{default_track_labels, Song, SongDraft, SongUpdate, DEFAULT_DURATION};

/// Number of track lanes per song
pub const TRACK_COUNT: usize = 8;

/// A field rule violated by a song or note
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("song name must not be empty")]
    EmptyName,

    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("expected {max} track labels, got {0}", max = TRACK_COUNT)]
    TrackLabelCount(usize),

    #[error("track must be between 1 and {max}, got {0}", max = TRACK_COUNT)]
    TrackOutOfRange(u8),

    #[error("time {time}s is outside the song (0 to {duration}s)")]
    TimeOutOfRange { time: f64, duration: f64 },

    #[error("note title must not be empty")]
    EmptyTitle,

    #[error("note id {0} appears more than once")]
    DuplicateNoteId(NoteId),

    #[error("song id {0} appears more than once")]
    DuplicateSongId(SongId),

    #[error("more than one note at track {track}, time {time}s")]
    DuplicatePosition { track: u8, time: f64 },
}
