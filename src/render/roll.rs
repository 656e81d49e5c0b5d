//! Text piano roll.
//!
//! One row per sounding pitch, highest first; one column per grid step.
//! `#` marks an onset, `=` a held note, `.` silence. Rests are not drawn
//! and trailing rests add no columns. Rolls wider than [`MAX_COLUMNS`] are
//! cut off with a note saying how much was left out.

use std::collections::BTreeSet;
use std::io::{self, Write};

use super::Renderer;
use crate::music::{pitch_name, NoteTriple, REST_PITCH, TICKS_PER_BEAT};

pub const DEFAULT_COLUMNS_PER_BEAT: u32 = 4;

/// Widest roll drawn.
pub const MAX_COLUMNS: usize = 1024;

/// Draw `triples` at `columns_per_beat` grid steps per beat.
pub fn piano_roll(triples: &[NoteTriple], columns_per_beat: u32) -> String {
    let cpb = u64::from(columns_per_beat.max(1));
    let notes: Vec<&NoteTriple> = triples.iter().filter(|t| t.pitch != REST_PITCH).collect();
    if notes.is_empty() {
        return String::from("(silence)\n");
    }

    let column = |ticks: u64| ticks.saturating_mul(cpb) / TICKS_PER_BEAT;
    let column_ceil = |ticks: u64| ticks.saturating_mul(cpb).div_ceil(TICKS_PER_BEAT);
    let end = |t: &NoteTriple| column_ceil(t.start.saturating_add(t.duration).ticks());

    let full_width = notes.iter().map(|t| end(*t)).max().unwrap_or(0);
    let width = usize::try_from(full_width).map_or(MAX_COLUMNS, |w| w.min(MAX_COLUMNS));
    let pitches: BTreeSet<i32> = notes.iter().map(|t| t.pitch).collect();

    let mut out = String::new();
    for &pitch in pitches.iter().rev() {
        let mut row = vec!['.'; width];
        for note in notes.iter().filter(|t| t.pitch == pitch) {
            let from = column(note.start.ticks());
            if from >= width as u64 {
                continue;
            }
            let from = from as usize;
            let to = (end(*note).min(width as u64) as usize).max(from + 1);
            for (i, cell) in row.iter_mut().enumerate().take(to).skip(from) {
                // An onset is never overwritten by a held note.
                if i == from {
                    *cell = '#';
                } else if *cell != '#' {
                    *cell = '=';
                }
            }
        }
        out.push_str(&format!("{:<4} |", pitch_name(pitch)));
        out.extend(row);
        out.push_str("|\n");
    }
    if full_width > width as u64 {
        out.push_str(&format!(
            "({} more columns not shown)\n",
            full_width - width as u64
        ));
    }
    out
}

/// Writes a piano roll per printed sequence, separated by a blank line.
pub struct PianoRoll<W: Write> {
    out: W,
    columns_per_beat: u32,
}

impl<W: Write> PianoRoll<W> {
    pub fn new(out: W, columns_per_beat: u32) -> Self {
        Self {
            out,
            columns_per_beat,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for PianoRoll<W> {
    fn render(&mut self, triples: &[NoteTriple]) -> io::Result<()> {
        writeln!(self.out, "{}", piano_roll(triples, self.columns_per_beat))
    }
}
