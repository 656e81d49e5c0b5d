//! Pitch spelling → MIDI number.

use std::fmt;

/// A natural pitch letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl PitchClass {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            'E' => Some(Self::E),
            'F' => Some(Self::F),
            'G' => Some(Self::G),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            _ => None,
        }
    }

    /// Semitone offset above C within one octave.
    pub fn offset(self) -> i32 {
        match self {
            Self::C => 0,
            Self::D => 2,
            Self::E => 4,
            Self::F => 5,
            Self::G => 7,
            Self::A => 9,
            Self::B => 11,
        }
    }
}

/// Accidental as written in source: `bb`, `b`, `n`, `d` (diesis), `dd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
}

impl Accidental {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "bb" => Some(Self::DoubleFlat),
            "b" => Some(Self::Flat),
            "n" => Some(Self::Natural),
            "d" => Some(Self::Sharp),
            "dd" => Some(Self::DoubleSharp),
            _ => None,
        }
    }

    pub fn offset(self) -> i32 {
        match self {
            Self::DoubleFlat => -2,
            Self::Flat => -1,
            Self::Natural => 0,
            Self::Sharp => 1,
            Self::DoubleSharp => 2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::DoubleFlat => "bb",
            Self::Flat => "b",
            Self::Natural => "n",
            Self::Sharp => "d",
            Self::DoubleSharp => "dd",
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// MIDI note = (octave + 1) * 12 + pitch class + accidental.
///
/// C-1 = 0, C4 = 60, A4 = 69. The result is not clamped to 0..=127.
pub fn midi_pitch(pitch: PitchClass, accidental: Accidental, octave: i32) -> i32 {
    (octave + 1) * 12 + pitch.offset() + accidental.offset()
}

/// Conventional name of a MIDI pitch, e.g. 61 → "C#4".
pub fn pitch_name(midi: i32) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    let class = midi.rem_euclid(12) as usize;
    let octave = midi.div_euclid(12) - 1;
    format!("{}{}", NAMES[class], octave)
}
