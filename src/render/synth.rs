//! Oscillator and envelope primitives used by the WAV renderer.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Available waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Saw,
    Square,
    Triangle,
}

/// One sample of `waveform` at `phase` in `[0.0, 1.0)`. Output is in
/// `[-1.0, 1.0]`.
pub fn oscillator(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => (phase * 2.0 * PI).sin(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => {
            if phase < 0.25 {
                4.0 * phase
            } else if phase < 0.75 {
                2.0 - 4.0 * phase
            } else {
                4.0 * phase - 4.0
            }
        }
    }
}

/// MIDI note number to frequency, A4 (69) = 440 Hz.
pub fn midi_to_freq(pitch: i32) -> f64 {
    440.0 * 2.0f64.powf((pitch as f64 - 69.0) / 12.0)
}

/// Attack-decay-sustain-release envelope. Times in seconds, sustain is a
/// level in `0.0..=1.0`.
#[derive(Debug, Clone, Copy)]
pub struct AdsrEnvelope {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Default for AdsrEnvelope {
    fn default() -> Self {
        Self {
            attack: 0.01,
            decay: 0.08,
            sustain: 0.7,
            release: 0.05,
        }
    }
}

impl AdsrEnvelope {
    /// Amplitude at `t` seconds into a note held for `held` seconds.
    pub fn amplitude(&self, t: f64, held: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }

        if t < self.attack {
            if self.attack <= 0.0 {
                1.0
            } else {
                t / self.attack
            }
        } else if t < self.attack + self.decay {
            if self.decay <= 0.0 {
                self.sustain
            } else {
                let decay_t = (t - self.attack) / self.decay;
                1.0 - decay_t * (1.0 - self.sustain)
            }
        } else if t < held {
            self.sustain
        } else if t < held + self.release {
            if self.release <= 0.0 {
                0.0
            } else {
                let release_t = (t - held) / self.release;
                self.sustain * (1.0 - release_t)
            }
        } else {
            0.0
        }
    }

    /// Length of the sound including the release tail.
    pub fn total_duration(&self, held: f64) -> f64 {
        held + self.release
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn sine_at_quarter() {
        assert_approx_eq!(oscillator(Waveform::Sine, 0.25), 1.0, 1e-10);
    }

    #[test]
    fn square_halves() {
        assert_approx_eq!(oscillator(Waveform::Square, 0.25), 1.0);
        assert_approx_eq!(oscillator(Waveform::Square, 0.75), -1.0);
    }

    #[test]
    fn all_waveforms_bounded() {
        for wf in [Waveform::Sine, Waveform::Saw, Waveform::Square, Waveform::Triangle] {
            for i in 0..1000 {
                let v = oscillator(wf, i as f64 / 1000.0);
                assert!((-1.0..=1.0).contains(&v), "{wf:?}: {v}");
            }
        }
    }

    #[test]
    fn a4_is_440() {
        assert_approx_eq!(midi_to_freq(69), 440.0, 1e-9);
        assert_approx_eq!(midi_to_freq(72) / midi_to_freq(60), 2.0, 1e-10);
    }

    #[test]
    fn envelope_phases() {
        let env = AdsrEnvelope {
            attack: 0.01,
            decay: 0.05,
            sustain: 0.7,
            release: 0.1,
        };
        assert_approx_eq!(env.amplitude(0.0, 1.0), 0.0);
        assert_approx_eq!(env.amplitude(0.01, 1.0), 1.0, 1e-10);
        assert_approx_eq!(env.amplitude(0.5, 1.0), 0.7);
        assert_approx_eq!(env.amplitude(1.05, 1.0), 0.35, 1e-10);
        assert_approx_eq!(env.amplitude(2.0, 1.0), 0.0);
        assert_approx_eq!(env.total_duration(1.0), 1.1);
    }

    #[test]
    fn waveform_names_in_yaml() {
        let wf: Waveform = serde_yaml::from_str("triangle").unwrap();
        assert_eq!(wf, Waveform::Triangle);
    }
}
