//! JSON export of printed sequences.

use std::io::{self, Write};
use std::path::PathBuf;

use super::{NumberedPath, Renderer};
use crate::music::NoteTriple;

enum Target {
    Writer(Box<dyn Write>),
    Files(NumberedPath),
}

/// Writes each printed sequence as a JSON array of
/// `{"start", "pitch", "duration"}` objects, times in beats.
pub struct JsonExport {
    target: Target,
}

impl JsonExport {
    /// One compact JSON document per line on `out`.
    pub fn to_writer(out: impl Write + 'static) -> Self {
        Self {
            target: Target::Writer(Box::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    /// One pretty-printed file per sequence, numbered after the first.
    pub fn to_files(base: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::Files(NumberedPath::new(base)),
        }
    }
}

impl Renderer for JsonExport {
    fn render(&mut self, triples: &[NoteTriple]) -> io::Result<()> {
        match &mut self.target {
            Target::Writer(out) => {
                serde_json::to_writer(&mut *out, triples).map_err(io::Error::other)?;
                writeln!(out)
            }
            Target::Files(paths) => {
                let path = paths.next_path();
                let json = serde_json::to_string_pretty(triples).map_err(io::Error::other)?;
                tracing::debug!(path = %path.display(), notes = triples.len(), "write json");
                std::fs::write(path, json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::{Beat, REST_PITCH};

    #[test]
    fn files_are_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let mut export = JsonExport::to_files(dir.path().join("seq.json"));
        let notes = [NoteTriple {
            start: Beat::ZERO,
            pitch: 60,
            duration: Beat::from_beats(1),
        }];
        export.render(&notes).unwrap();
        export.render(&[]).unwrap();

        let first = std::fs::read_to_string(dir.path().join("seq.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed[0]["pitch"], 60);
        assert_eq!(parsed[0]["duration"], 1.0);

        let second = std::fs::read_to_string(dir.path().join("seq-2.json")).unwrap();
        assert_eq!(second.trim(), "[]");
    }

    #[test]
    fn rests_keep_their_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rest.json");
        let mut export = JsonExport::to_files(&path);
        export
            .render(&[NoteTriple {
                start: Beat::from_beats_f64(0.5),
                pitch: REST_PITCH,
                duration: Beat::from_beats_f64(0.5),
            }])
            .unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed[0]["pitch"], -1);
        assert_eq!(parsed[0]["start"], 0.5);
    }
}
