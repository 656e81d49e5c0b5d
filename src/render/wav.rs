//! WAV export: a simple additive synth over printed sequences.

use std::io;
use std::path::{Path, PathBuf};

use super::synth::{midi_to_freq, oscillator, AdsrEnvelope, Waveform};
use super::{NumberedPath, Renderer};
use crate::music::{NoteTriple, REST_PITCH};

/// Per-voice gain before normalization.
const VOICE_GAIN: f64 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct SynthSettings {
    pub tempo: f64,
    pub sample_rate: u32,
    pub waveform: Waveform,
    pub envelope: AdsrEnvelope,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            sample_rate: 44_100,
            waveform: Waveform::Sine,
            envelope: AdsrEnvelope::default(),
        }
    }
}

/// Render `triples` to mono samples. Overlapping notes are summed and the
/// mix is scaled down if it would clip. Rests are silent.
pub fn synthesize(triples: &[NoteTriple], settings: &SynthSettings) -> Vec<f32> {
    let sr = settings.sample_rate;
    let seconds_per_beat = 60.0 / settings.tempo;

    let length = triples
        .iter()
        .map(|t| {
            let held = t.duration.as_beats_f64() * seconds_per_beat;
            t.start.to_sample_offset(settings.tempo, sr) as usize
                + (settings.envelope.total_duration(held) * sr as f64).ceil() as usize
        })
        .max()
        .unwrap_or(0);
    let mut mix = vec![0.0f64; length];

    for note in triples.iter().filter(|t| t.pitch != REST_PITCH) {
        let offset = note.start.to_sample_offset(settings.tempo, sr) as usize;
        let held = note.duration.as_beats_f64() * seconds_per_beat;
        let samples = (settings.envelope.total_duration(held) * sr as f64).ceil() as usize;
        let step = midi_to_freq(note.pitch) / sr as f64;

        let mut phase = 0.0f64;
        for (i, out) in mix.iter_mut().skip(offset).take(samples).enumerate() {
            let t = i as f64 / sr as f64;
            *out += oscillator(settings.waveform, phase) * settings.envelope.amplitude(t, held) * VOICE_GAIN;
            phase = (phase + step).fract();
        }
    }

    let peak = mix.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    let scale = if peak > 1.0 { 1.0 / peak } else { 1.0 };
    mix.into_iter().map(|s| (s * scale) as f32).collect()
}

/// Write mono samples as 16-bit PCM.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> io::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(wav_error)?;
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value).map_err(wav_error)?;
    }
    writer.finalize().map_err(wav_error)
}

fn wav_error(e: hound::Error) -> io::Error {
    match e {
        hound::Error::IoError(e) => e,
        other => io::Error::other(other),
    }
}

/// Synthesizes each printed sequence to its own WAV file.
pub struct WavExport {
    paths: NumberedPath,
    settings: SynthSettings,
}

impl WavExport {
    pub fn new(base: impl Into<PathBuf>, settings: SynthSettings) -> Self {
        Self {
            paths: NumberedPath::new(base),
            settings,
        }
    }
}

impl Renderer for WavExport {
    fn render(&mut self, triples: &[NoteTriple]) -> io::Result<()> {
        let path = self.paths.next_path();
        let samples = synthesize(triples, &self.settings);
        tracing::debug!(path = %path.display(), samples = samples.len(), "write wav");
        write_wav(&path, &samples, self.settings.sample_rate)
    }
}
