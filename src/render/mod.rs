//! Renderers for printed music.
//!
//! A printed sequence reaches each renderer as its flattened
//! `(start, pitch, duration)` triples, see [`Music::note_triples`].
//!
//! [`Music::note_triples`]: crate::music::Music::note_triples

pub mod json;
pub mod roll;
pub mod synth;
pub mod wav;

use std::io;
use std::path::PathBuf;

use crate::music::NoteTriple;

pub use json::JsonExport;
pub use roll::{piano_roll, PianoRoll};
pub use synth::{AdsrEnvelope, Waveform};
pub use wav::{synthesize, SynthSettings, WavExport};

/// Consumes one printed sequence at a time.
pub trait Renderer {
    fn render(&mut self, triples: &[NoteTriple]) -> io::Result<()>;
}

/// Output file names for successive renders: `out.wav`, then `out-2.wav`,
/// `out-3.wav` and so on.
#[derive(Debug, Clone)]
pub struct NumberedPath {
    base: PathBuf,
    count: usize,
}

impl NumberedPath {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            count: 0,
        }
    }

    pub fn next_path(&mut self) -> PathBuf {
        self.count += 1;
        if self.count == 1 {
            return self.base.clone();
        }
        let stem = self
            .base
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match self.base.extension() {
            Some(ext) => format!("{stem}-{}.{}", self.count, ext.to_string_lossy()),
            None => format!("{stem}-{}", self.count),
        };
        self.base.with_file_name(name)
    }
}
