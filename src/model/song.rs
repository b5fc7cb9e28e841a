// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Songs: a named, timed container of notes over eight labeled tracks.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Note, NoteId, SongId, ValidationError, TRACK_COUNT};

/// Duration given to songs created without one, in seconds
pub const DEFAULT_DURATION: f64 = 300.0;

/// Labels given to songs created without any: "Track 1" .. "Track 8"
pub fn default_track_labels() -> Vec<String> {
    (1..=TRACK_COUNT).map(|n| format!("Track {}", n)).collect()
}

fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

fn check_duration(duration: f64) -> Result<(), ValidationError> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(ValidationError::InvalidDuration(duration));
    }
    Ok(())
}

fn check_track_labels(labels: &[String]) -> Result<(), ValidationError> {
    if labels.len() != TRACK_COUNT {
        return Err(ValidationError::TrackLabelCount(labels.len()));
    }
    Ok(())
}

/// A song and the notes placed on it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    id: SongId,
    name: String,
    #[serde(default)]
    description: String,
    duration: f64,
    #[serde(default = "default_track_labels")]
    track_labels: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    notes: Vec<Note>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Song {
    /// Get song id
    pub fn id(&self) -> SongId {
        self.id
    }

    /// Get song name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Get track labels, index 0 is track 1
    pub fn track_labels(&self) -> &[String] {
        &self.track_labels
    }

    /// Get label of a 1-based track
    pub fn track_label(&self, track: u8) -> Option<&str> {
        let index = (track as usize).checked_sub(1)?;
        self.track_labels.get(index).map(String::as_str)
    }

    /// Get tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Get notes in insertion order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Get a note by id
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id() == id)
    }

    /// Get the note occupying a slot, if any
    pub fn note_at(&self, track: u8, time: f64) -> Option<&Note> {
        self.notes.iter().find(|n| n.is_at(track, time))
    }

    /// Find a note other than `exclude` that occupies the slot
    pub fn conflicting_note(&self, track: u8, time: f64, exclude: Option<NoteId>) -> Option<&Note> {
        self.notes
            .iter()
            .find(|n| Some(n.id()) != exclude && n.is_at(track, time))
    }

    /// Latest time used by any note
    pub fn last_note_time(&self) -> Option<f64> {
        self.notes.iter().map(Note::time).reduce(f64::max)
    }

    /// Get creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Get last modification timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check every field rule, the notes' rules, and slot uniqueness
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_name(&self.name)?;
        check_duration(self.duration)?;
        check_track_labels(&self.track_labels)?;

        let mut ids = HashSet::with_capacity(self.notes.len());
        for (index, note) in self.notes.iter().enumerate() {
            note.validate(self.duration)?;
            if !ids.insert(note.id()) {
                return Err(ValidationError::DuplicateNoteId(note.id()));
            }
            let (track, time) = note.position();
            if self.notes[..index].iter().any(|n| n.is_at(track, time)) {
                return Err(ValidationError::DuplicatePosition { track, time });
            }
        }
        Ok(())
    }

    /// Refresh `updated_at`, never moving it backwards
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }

    pub(crate) fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub(crate) fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id() == id)
    }

    pub(crate) fn remove_note(&mut self, id: NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id() == id)?;
        Some(self.notes.remove(index))
    }

    /// Merge a partial update after checking it
    pub(crate) fn apply(&mut self, update: SongUpdate) -> Result<(), ValidationError> {
        update.validate()?;

        if let Some(duration) = update.duration {
            if let Some(last) = self.last_note_time() {
                if last > duration {
                    return Err(ValidationError::TimeOutOfRange { time: last, duration });
                }
            }
            self.duration = duration;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(track_labels) = update.track_labels {
            self.track_labels = track_labels;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        Ok(())
    }
}

/// Input for creating a song. Unset fields get defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongDraft {
    /// Song name
    pub name: String,
    /// Description (default empty)
    pub description: Option<String>,
    /// Duration in seconds (default `DEFAULT_DURATION`)
    pub duration: Option<f64>,
    /// Eight track labels (default "Track 1" .. "Track 8")
    pub track_labels: Option<Vec<String>>,
    /// Tags (default none)
    pub tags: Option<Vec<String>>,
}

impl SongDraft {
    /// Create a draft with just a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Builder: set track labels
    pub fn with_track_labels(mut self, labels: Vec<String>) -> Self {
        self.track_labels = Some(labels);
        self
    }

    /// Builder: set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Normalize and validate into a song with no notes
    pub fn into_song(self, now: DateTime<Utc>) -> Result<Song, ValidationError> {
        let duration = self.duration.unwrap_or(DEFAULT_DURATION);
        let track_labels = self.track_labels.unwrap_or_else(default_track_labels);

        check_name(&self.name)?;
        check_duration(duration)?;
        check_track_labels(&track_labels)?;

        Ok(Song {
            id: SongId::new(),
            name: self.name,
            description: self.description.unwrap_or_default(),
            duration,
            track_labels,
            tags: self.tags.unwrap_or_default(),
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a song. `id`, `notes` and `created_at` cannot change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<f64>,
    pub track_labels: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl SongUpdate {
    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set duration
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Builder: set track labels
    pub fn with_track_labels(mut self, labels: Vec<String>) -> Self {
        self.track_labels = Some(labels);
        self
    }

    /// Builder: set tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Check the provided fields
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(duration) = self.duration {
            check_duration(duration)?;
        }
        if let Some(labels) = &self.track_labels {
            check_track_labels(labels)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteDraft;

    fn song() -> Song {
        SongDraft::new("Test Song").into_song(Utc::now()).unwrap()
    }

    #[test]
    fn test_draft_defaults() {
        let song = song();

        assert_eq!(song.name(), "Test Song");
        assert_eq!(song.duration(), DEFAULT_DURATION);
        assert_eq!(song.track_labels().len(), TRACK_COUNT);
        assert_eq!(song.track_labels()[0], "Track 1");
        assert_eq!(song.track_labels()[7], "Track 8");
        assert!(song.tags().is_empty());
        assert!(song.notes().is_empty());
        assert_eq!(song.created_at(), song.updated_at());
    }

    #[test]
    fn test_draft_validation() {
        let now = Utc::now();

        assert_eq!(SongDraft::new("").into_song(now), Err(ValidationError::EmptyName));
        assert_eq!(
            SongDraft::new("A").with_duration(0.0).into_song(now),
            Err(ValidationError::InvalidDuration(0.0))
        );
        assert_eq!(
            SongDraft::new("A").with_track_labels(vec!["Kick".into()]).into_song(now),
            Err(ValidationError::TrackLabelCount(1))
        );
    }

    #[test]
    fn test_duplicate_tags_kept() {
        let song = SongDraft::new("A")
            .with_tags(vec!["demo".into(), "demo".into()])
            .into_song(Utc::now())
            .unwrap();
        assert_eq!(song.tags(), &["demo", "demo"]);
    }

    #[test]
    fn test_track_label_lookup() {
        let song = song();
        assert_eq!(song.track_label(1), Some("Track 1"));
        assert_eq!(song.track_label(8), Some("Track 8"));
        assert_eq!(song.track_label(0), None);
        assert_eq!(song.track_label(9), None);
    }

    #[test]
    fn test_conflicting_note_excludes_self() {
        let mut song = song();
        let note = NoteDraft::new(2, 5.0, "A").into_note(song.duration(), Utc::now()).unwrap();
        let id = note.id();
        song.push_note(note);

        assert!(song.conflicting_note(2, 5.0, None).is_some());
        assert!(song.conflicting_note(2, 5.0, Some(id)).is_none());
        assert!(song.conflicting_note(2, 5.5, None).is_none());
        assert_eq!(song.note_at(2, 5.0).map(Note::id), Some(id));
    }

    #[test]
    fn test_validate_detects_duplicate_position() {
        let mut song = song();
        let now = Utc::now();
        song.push_note(NoteDraft::new(1, 1.0, "A").into_note(300.0, now).unwrap());
        song.push_note(NoteDraft::new(1, 2.0, "B").into_note(300.0, now).unwrap());
        assert!(song.validate().is_ok());

        song.push_note(NoteDraft::new(1, 1.0, "C").into_note(300.0, now).unwrap());
        assert_eq!(
            song.validate(),
            Err(ValidationError::DuplicatePosition { track: 1, time: 1.0 })
        );
    }

    #[test]
    fn test_apply_update() {
        let mut song = song();
        let created = song.created_at();

        song.apply(
            SongUpdate::default()
                .with_name("Renamed")
                .with_duration(120.0)
                .with_tags(vec!["live".into()]),
        )
        .unwrap();

        assert_eq!(song.name(), "Renamed");
        assert_eq!(song.duration(), 120.0);
        assert_eq!(song.tags(), &["live"]);
        assert_eq!(song.created_at(), created);
    }

    #[test]
    fn test_shrinking_duration_below_notes_rejected() {
        let mut song = song();
        song.push_note(NoteDraft::new(1, 200.0, "Late").into_note(300.0, Utc::now()).unwrap());

        let result = song.apply(SongUpdate::default().with_duration(100.0));
        assert!(matches!(result, Err(ValidationError::TimeOutOfRange { .. })));
        assert_eq!(song.duration(), 300.0);
    }

    #[test]
    fn test_touch_never_goes_backwards() {
        let mut song = song();
        let before = song.updated_at();

        song.touch(before - chrono::Duration::seconds(10));
        assert_eq!(song.updated_at(), before);

        song.touch(before + chrono::Duration::seconds(10));
        assert!(song.updated_at() > before);
    }

    #[test]
    fn test_remove_note() {
        let mut song = song();
        let note = NoteDraft::new(3, 3.0, "A").into_note(300.0, Utc::now()).unwrap();
        let id = note.id();
        song.push_note(note);

        assert!(song.remove_note(NoteId::new()).is_none());
        assert_eq!(song.remove_note(id).map(|n| n.id()), Some(id));
        assert!(song.notes().is_empty());
    }
}
