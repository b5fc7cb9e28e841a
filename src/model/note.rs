// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note markers placed on a song's timeline.
//!
//! A note sits at a (track, time) position and carries cosmetic fields
//! for the piano-roll display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{NoteId, ValidationError, TRACK_COUNT};

/// Color given to notes created without one
pub const DEFAULT_NOTE_COLOR: &str = "#3b82f6";

fn default_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

/// Check that a track index lies in 1..=TRACK_COUNT
pub fn check_track(track: u8) -> Result<(), ValidationError> {
    if track == 0 || track as usize > TRACK_COUNT {
        return Err(ValidationError::TrackOutOfRange(track));
    }
    Ok(())
}

/// Check that a time lies in [0, duration]
pub fn check_time(time: f64, duration: f64) -> Result<(), ValidationError> {
    if !time.is_finite() || time < 0.0 || time > duration {
        return Err(ValidationError::TimeOutOfRange { time, duration });
    }
    Ok(())
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

/// An annotation marker on a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: NoteId,
    track: u8,
    time: f64,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    icon: String,
    created_at: DateTime<Utc>,
}

impl Note {
    /// Get note id
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Get track index (1-based)
    pub fn track(&self) -> u8 {
        self.track
    }

    /// Get time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Get (track, time) position
    pub fn position(&self) -> (u8, f64) {
        (self.track, self.time)
    }

    /// Check whether this note occupies the given slot
    pub fn is_at(&self, track: u8, time: f64) -> bool {
        self.track == track && self.time == time
    }

    /// Get title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get color
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Get icon
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Get creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check the note's own field rules against its song's duration
    pub fn validate(&self, duration: f64) -> Result<(), ValidationError> {
        check_track(self.track)?;
        check_time(self.time, duration)?;
        check_title(&self.title)
    }

    /// Merge a partial update. Position checks are the caller's job.
    pub(crate) fn apply(&mut self, update: NoteUpdate) {
        if let Some(track) = update.track {
            self.track = track;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
    }
}

/// Input for creating a note. Unset cosmetic fields get defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    /// Track index (1-based)
    pub track: u8,
    /// Time in seconds
    pub time: f64,
    /// Title
    pub title: String,
    /// Description (default empty)
    pub description: Option<String>,
    /// Color (default `DEFAULT_NOTE_COLOR`)
    pub color: Option<String>,
    /// Icon glyph (default empty)
    pub icon: Option<String>,
}

impl NoteDraft {
    /// Create a draft with the required fields
    pub fn new(track: u8, time: f64, title: impl Into<String>) -> Self {
        Self {
            track,
            time,
            title: title.into(),
            description: None,
            color: None,
            icon: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder: set icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Normalize and validate into a note for a song of the given duration
    pub fn into_note(self, duration: f64, now: DateTime<Utc>) -> Result<Note, ValidationError> {
        check_track(self.track)?;
        check_time(self.time, duration)?;
        check_title(&self.title)?;

        Ok(Note {
            id: NoteId::new(),
            track: self.track,
            time: self.time,
            title: self.title,
            description: self.description.unwrap_or_default(),
            color: self.color.unwrap_or_else(default_color),
            icon: self.icon.unwrap_or_default(),
            created_at: now,
        })
    }
}

/// Partial update of a note. `id` and `created_at` cannot change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteUpdate {
    pub track: Option<u8>,
    pub time: Option<f64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl NoteUpdate {
    /// Update that moves a note to a new slot
    pub fn moved_to(track: u8, time: f64) -> Self {
        Self {
            track: Some(track),
            time: Some(time),
            ..Default::default()
        }
    }

    /// Builder: set track
    pub fn with_track(mut self, track: u8) -> Self {
        self.track = Some(track);
        self
    }

    /// Builder: set time
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Builder: set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder: set icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Whether this update touches track or time
    pub fn is_positional(&self) -> bool {
        self.track.is_some() || self.time.is_some()
    }

    /// Effective (track, time) after applying this update to `note`
    pub fn resolve_position(&self, note: &Note) -> (u8, f64) {
        (
            self.track.unwrap_or(note.track),
            self.time.unwrap_or(note.time),
        )
    }

    /// Check the non-positional fields
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => check_title(title),
            None => Ok(()),
        }
    }
}
