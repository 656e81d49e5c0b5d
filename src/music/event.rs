//! Note and event data model: the atoms a composition is built from.

use std::collections::BTreeSet;

use super::beat::Beat;

/// Pitch sentinel carried by rests.
pub const REST_PITCH: i32 = -1;

/// A single sounding note (or rest) with its length.
///
/// Ordered by pitch first, so the notes of a chord iterate low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteValue {
    /// MIDI number, or [`REST_PITCH`] for silence.
    pub pitch: i32,
    /// Length in beats; always positive for literal notes.
    pub duration: Beat,
}

impl NoteValue {
    pub fn note(pitch: i32, duration: Beat) -> Self {
        Self { pitch, duration }
    }

    pub fn rest(duration: Beat) -> Self {
        Self {
            pitch: REST_PITCH,
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.pitch == REST_PITCH
    }
}

/// A cluster of notes starting at the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MusicEvent {
    pub start_time: Beat,
    pub notes: BTreeSet<NoteValue>,
}

impl MusicEvent {
    pub fn new(start_time: Beat, notes: impl IntoIterator<Item = NoteValue>) -> Self {
        Self {
            start_time,
            notes: notes.into_iter().collect(),
        }
    }

    /// Longest note in the cluster, zero if it holds none.
    pub fn longest(&self) -> Beat {
        self.notes
            .iter()
            .map(|n| n.duration)
            .max()
            .unwrap_or(Beat::ZERO)
    }

    /// The same notes at a different start time.
    pub fn at(&self, start_time: Beat) -> Self {
        Self {
            start_time,
            notes: self.notes.clone(),
        }
    }
}
