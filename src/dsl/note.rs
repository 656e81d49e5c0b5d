//! Note name parsing: converts "Cn4", "Eb2", "Fd3", "Gbb3" to pitch spellings.

use crate::music::{Accidental, PitchClass};

/// Parse a note name into its spelling.
///
/// Format: `<letter><accidental><octave>`
/// - Letter: C, D, E, F, G, A, B
/// - Accidental (required): bb, b, n, d, dd
/// - Octave: a single digit 0-9 (Cn4 = middle C = MIDI 60)
pub fn parse_note_name(name: &str) -> Option<(PitchClass, Accidental, i32)> {
    let mut chars = name.chars();
    let pitch = PitchClass::from_letter(chars.next()?)?;
    let rest = chars.as_str();

    let octave_char = rest.chars().last()?;
    let octave = octave_char.to_digit(10)? as i32;

    let accidental = Accidental::from_symbol(&rest[..rest.len() - 1])?;
    Some((pitch, accidental, octave))
}
