//! The musical algebra: sequential composition, harmonic merge,
//! transposition and list-style deconstruction over [`Music`] values.
//!
//! Every operation is pure and returns a fresh value.

use std::fmt;

use serde::{Serialize, Serializer};

use super::beat::Beat;
use super::event::{MusicEvent, NoteValue};

/// Why a sequence operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("empty sequence")]
    Empty,
    #[error("first event of the sequence has no notes")]
    NoNotes,
    #[error("transposing by {0} semitones leaves the pitch range")]
    PitchOverflow(i32),
    #[error("sequence extends past the last representable tick")]
    TooLong,
}

/// A composition fragment: events ordered by start time.
///
/// The empty sequence is silence of zero length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Music {
    events: Vec<MusicEvent>,
}

impl Music {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single note or rest at time zero.
    pub fn single(note: NoteValue) -> Self {
        Self {
            events: vec![MusicEvent::new(Beat::ZERO, [note])],
        }
    }

    /// Build from events assumed to already be in start-time order.
    pub fn from_events(events: Vec<MusicEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[MusicEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Start of the last event plus its longest note.
    ///
    /// Saturates at the last representable tick. Sequences produced by
    /// [`Music::concat`] always end before it.
    pub fn total_duration(&self) -> Beat {
        match self.events.last() {
            Some(last) => last.start_time.saturating_add(last.longest()),
            None => Beat::ZERO,
        }
    }

    /// `self` followed by `other`, shifted to start where `self` ends.
    pub fn concat(&self, other: &Music) -> Result<Music, SequenceError> {
        let shift = self.total_duration();
        let mut events = Vec::with_capacity(self.events.len() + other.events.len());
        events.extend(self.events.iter().cloned());
        for event in &other.events {
            let start = event
                .start_time
                .checked_add(shift)
                .ok_or(SequenceError::TooLong)?;
            start
                .checked_add(event.longest())
                .ok_or(SequenceError::TooLong)?;
            events.push(event.at(start));
        }
        Ok(Music { events })
    }

    /// Both sequences sounding together, re-sorted by start time.
    /// The sort is stable: on equal start times `self`'s events come first.
    pub fn harmony(&self, other: &Music) -> Music {
        let mut events: Vec<MusicEvent> = self
            .events
            .iter()
            .chain(other.events.iter())
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Music { events }
    }

    /// Shift every pitch by `semitones`. Rests are shifted too: their
    /// sentinel pitch is treated like any other pitch.
    pub fn transpose(&self, semitones: i32) -> Result<Music, SequenceError> {
        let events = self
            .events
            .iter()
            .map(|e| {
                let notes = e
                    .notes
                    .iter()
                    .map(|n| {
                        let pitch = n
                            .pitch
                            .checked_add(semitones)
                            .ok_or(SequenceError::PitchOverflow(semitones))?;
                        Ok(NoteValue {
                            pitch,
                            duration: n.duration,
                        })
                    })
                    .collect::<Result<Vec<_>, SequenceError>>()?;
                Ok(MusicEvent::new(e.start_time, notes))
            })
            .collect::<Result<Vec<_>, SequenceError>>()?;
        Ok(Music { events })
    }

    /// The first event as a one-event sequence.
    pub fn head(&self) -> Result<Music, SequenceError> {
        let first = self.events.first().ok_or(SequenceError::Empty)?;
        Ok(Music {
            events: vec![first.clone()],
        })
    }

    /// Everything after the first event, start times untouched.
    pub fn tail(&self) -> Result<Music, SequenceError> {
        if self.events.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Music {
            events: self.events[1..].to_vec(),
        })
    }

    /// Pitch of a note in the first event. For a chord this is the lowest
    /// member, since clusters keep their notes in pitch order.
    pub fn first_pitch(&self) -> Result<i32, SequenceError> {
        let first = self.events.first().ok_or(SequenceError::Empty)?;
        first
            .notes
            .iter()
            .next()
            .map(|n| n.pitch)
            .ok_or(SequenceError::NoNotes)
    }

    /// Every event moved to time zero, notes unchanged.
    pub fn initialize(&self) -> Music {
        Music {
            events: self.events.iter().map(|e| e.at(Beat::ZERO)).collect(),
        }
    }

    /// Flatten to `(start, pitch, duration)` triples in time order,
    /// chord members low to high. Rests are included.
    pub fn note_triples(&self) -> Vec<NoteTriple> {
        self.events
            .iter()
            .flat_map(|e| {
                e.notes.iter().map(move |n| NoteTriple {
                    start: e.start_time,
                    pitch: n.pitch,
                    duration: n.duration,
                })
            })
            .collect()
    }
}

impl fmt::Display for Music {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "@{} {{", event.start_time)?;
            for (j, note) in event.notes.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if note.is_rest() {
                    write!(f, "R/{}", note.duration)?;
                } else {
                    write!(f, "{}/{}", note.pitch, note.duration)?;
                }
            }
            write!(f, "}}")?;
        }
        write!(f, "]")
    }
}

/// One note as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteTriple {
    #[serde(serialize_with = "as_beats")]
    pub start: Beat,
    pub pitch: i32,
    #[serde(serialize_with = "as_beats")]
    pub duration: Beat,
}

fn as_beats<S: Serializer>(beat: &Beat, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(beat.as_beats_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::event::REST_PITCH;

    fn note(pitch: i32, beats: u32) -> Music {
        Music::single(NoteValue::note(pitch, Beat::from_beats(beats)))
    }

    fn starts(m: &Music) -> Vec<u64> {
        m.events().iter().map(|e| e.start_time.ticks()).collect()
    }

    #[test]
    fn empty_has_zero_duration() {
        assert_eq!(Music::empty().total_duration(), Beat::ZERO);
        assert!(Music::empty().is_empty());
    }

    #[test]
    fn duration_uses_last_event_longest_note() {
        let chord = note(60, 1).harmony(&note(64, 3));
        let m = note(55, 2).concat(&chord).unwrap();
        assert_eq!(m.total_duration(), Beat::from_beats(5));
    }

    #[test]
    fn concat_shifts_right_operand() {
        let m = note(60, 2).concat(&note(62, 1)).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.events()[1].start_time, Beat::from_beats(2));
    }

    #[test]
    fn concat_with_empty_is_identity() {
        let m = note(60, 1).concat(&note(62, 1)).unwrap();
        assert_eq!(Music::empty().concat(&m).unwrap(), m);
        assert_eq!(m.concat(&Music::empty()).unwrap(), m);
    }

    #[test]
    fn harmony_sorts_by_start_time() {
        let late = note(60, 1).concat(&note(62, 1)).unwrap();
        let early = note(48, 4);
        let m = late.harmony(&early);
        assert_eq!(starts(&m), vec![0, 0, 960]);
        // stable: the left operand's event at time 0 stays first
        assert_eq!(m.first_pitch().unwrap(), 60);
    }

    #[test]
    fn transpose_keeps_timing() {
        let m = note(60, 1).concat(&note(62, 2)).unwrap().transpose(5).unwrap();
        let pitches: Vec<i32> = m.note_triples().iter().map(|t| t.pitch).collect();
        assert_eq!(pitches, vec![65, 67]);
        assert_eq!(m.events()[1].start_time, Beat::from_beats(1));
        assert_eq!(m.total_duration(), Beat::from_beats(3));
    }

    #[test]
    fn transpose_moves_rest_sentinel_too() {
        // Known edge case: a rest's sentinel pitch is shifted like any pitch.
        let r = Music::single(NoteValue::rest(Beat::from_beats(1))).transpose(2).unwrap();
        assert_eq!(r.first_pitch().unwrap(), REST_PITCH + 2);
    }

    #[test]
    fn transpose_out_of_pitch_range_fails() {
        assert_eq!(
            note(60, 1).transpose(i32::MAX),
            Err(SequenceError::PitchOverflow(i32::MAX))
        );
        let low = Music::single(NoteValue::rest(Beat::from_beats(1)));
        assert!(low.transpose(i32::MIN).is_err());
    }

    #[test]
    fn concat_past_the_last_tick_fails() {
        let huge = Music::single(NoteValue::note(60, Beat::from_ticks(u64::MAX / 2 + 1)));
        let twice = huge.concat(&huge);
        assert_eq!(twice, Err(SequenceError::TooLong));
        assert_eq!(huge.concat(&Music::empty()).unwrap(), huge);
    }

    #[test]
    fn head_and_tail() {
        let m = note(60, 1).concat(&note(62, 1)).unwrap().concat(&note(64, 1)).unwrap();
        assert_eq!(m.head().unwrap(), note(60, 1));
        let t = m.tail().unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(starts(&t), vec![960, 1920]);
    }

    #[test]
    fn deconstructing_empty_fails() {
        assert_eq!(Music::empty().head(), Err(SequenceError::Empty));
        assert_eq!(Music::empty().tail(), Err(SequenceError::Empty));
        assert_eq!(Music::empty().first_pitch(), Err(SequenceError::Empty));
    }

    #[test]
    fn pitch_of_noteless_event_fails() {
        let m = Music::from_events(vec![MusicEvent::new(Beat::ZERO, [])]);
        assert_eq!(m.first_pitch(), Err(SequenceError::NoNotes));
    }

    #[test]
    fn pitch_of_chord_is_lowest() {
        let chord = note(67, 1).harmony(&note(60, 1));
        let merged = Music::from_events(vec![MusicEvent::new(
            Beat::ZERO,
            chord.events().iter().flat_map(|e| e.notes.iter().copied()),
        )]);
        assert_eq!(merged.first_pitch().unwrap(), 60);
    }

    #[test]
    fn initialize_resets_start_times() {
        let m = note(60, 1).concat(&note(62, 1)).unwrap().initialize();
        assert_eq!(starts(&m), vec![0, 0]);
        assert_eq!(m.initialize(), m);
    }

    #[test]
    fn triples_flatten_chords() {
        let m = note(64, 1).harmony(&note(60, 1)).concat(&note(62, 2)).unwrap();
        let triples = m.note_triples();
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[2].start, Beat::from_beats(1));
        assert_eq!(triples[2].duration, Beat::from_beats(2));
    }

    #[test]
    fn triple_serializes_beats_as_numbers() {
        let t = NoteTriple {
            start: Beat::from_beats_f64(1.5),
            pitch: 60,
            duration: Beat::from_beats(1),
        };
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"start":1.5,"pitch":60,"duration":1.0}"#);
    }

    #[test]
    fn display_lists_events() {
        let m = note(60, 1)
            .concat(&Music::single(NoteValue::rest(Beat::from_beats_f64(0.5))))
            .unwrap();
        assert_eq!(m.to_string(), "[@0 {60/1}, @1 {R/0.5}]");
    }
}
