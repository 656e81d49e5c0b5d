//! Musical value domain: time, notes, events and the sequence algebra.

pub mod beat;
pub mod event;
pub mod pitch;
pub mod sequence;

pub use beat::{Beat, TICKS_PER_BEAT};
pub use event::{MusicEvent, NoteValue, REST_PITCH};
pub use pitch::{midi_pitch, pitch_name, Accidental, PitchClass};
pub use sequence::{Music, NoteTriple, SequenceError};
