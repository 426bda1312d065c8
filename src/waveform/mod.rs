// src/waveform/mod.rs
pub mod wav;

use crate::decoder::{decode_bytes, dsp, resample};
use crate::error::Result;
use crate::normalize::NormalizedAudio;
use log::info;
use serde::Serialize;

/// Decoded clip at the configured rate and channel count.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    /// One buffer per channel, all the same length.
    pub channels: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaveformSummary {
    pub sample_rate: u32,
    pub channels: usize,
    pub frames: usize,
    pub duration_secs: f64,
    pub peak: f32,
}

impl Waveform {
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frames(&self) -> usize {
        dsp::planar_len(&self.channels)
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn interleaved(&self) -> Vec<f32> {
        dsp::interleave(&self.channels)
    }

    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        Ok(wav::encode_pcm16(&self.interleaved(), self.sample_rate, self.channel_count())?)
    }

    pub fn summary(&self) -> WaveformSummary {
        let peak = self
            .channels
            .iter()
            .flatten()
            .fold(0.0f32, |m, s| m.max(s.abs()));
        WaveformSummary {
            sample_rate: self.sample_rate,
            channels: self.channel_count(),
            frames: self.frames(),
            duration_secs: self.duration_secs(),
            peak,
        }
    }
}

/// Second decode pass: resamples and mixes accepted bytes.
#[derive(Debug, Clone, Copy)]
pub struct WaveformLoader {
    sample_rate: u32,
    mono: bool,
}

impl WaveformLoader {
    pub fn new(sample_rate: u32, mono: bool) -> Self {
        Self { sample_rate, mono }
    }

    pub fn load(&self, audio: &NormalizedAudio) -> Result<Waveform> {
        let decoded = decode_bytes(&audio.bytes, audio.extension.as_deref())?;
        let out_channels = if self.mono { 1 } else { 2 };

        let mixed = dsp::updown_mix_interleaved(&decoded.samples, decoded.channels, out_channels);
        let planar = dsp::deinterleave(&mixed, out_channels);
        let channels = resample::resample_planar(&planar, decoded.sample_rate, self.sample_rate)?;

        let waveform = Waveform { sample_rate: self.sample_rate, channels };
        info!(
            "loaded waveform: {} Hz -> {} Hz, {} ch -> {} ch, {} frames",
            decoded.sample_rate,
            self.sample_rate,
            decoded.channels,
            out_channels,
            waveform.frames()
        );
        Ok(waveform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wav::encode_pcm16;

    fn stereo_tone(rate: u32, frames: usize) -> NormalizedAudio {
        let interleaved: Vec<f32> = (0..frames)
            .flat_map(|i| {
                let s = (2.0 * std::f32::consts::PI * 330.0 * i as f32 / rate as f32).sin() * 0.4;
                [s, -s]
            })
            .collect();
        NormalizedAudio { bytes: encode_pcm16(&interleaved, rate, 2).unwrap(), extension: Some("wav".into()) }
    }

    #[test]
    fn mono_load_downmixes_and_resamples() {
        let clip = stereo_tone(44100, 44100);
        let wf = WaveformLoader::new(22050, true).load(&clip).unwrap();
        assert_eq!(wf.channel_count(), 1);
        assert_eq!(wf.sample_rate, 22050);
        assert_eq!(wf.frames(), 22050);
        // left and right cancel out
        assert!(wf.summary().peak < 0.05);
    }

    #[test]
    fn stereo_load_keeps_two_channels() {
        let clip = stereo_tone(22050, 11025);
        let wf = WaveformLoader::new(22050, false).load(&clip).unwrap();
        assert_eq!(wf.channel_count(), 2);
        assert_eq!(wf.frames(), 11025);
        assert!((wf.duration_secs() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn mono_source_is_duplicated_for_stereo() {
        let bytes = encode_pcm16(&vec![0.5; 1000], 8000, 1).unwrap();
        let clip = NormalizedAudio { bytes, extension: Some("wav".into()) };
        let wf = WaveformLoader::new(8000, false).load(&clip).unwrap();
        assert_eq!(wf.channel_count(), 2);
        assert_eq!(wf.channels[0], wf.channels[1]);
    }

    #[test]
    fn wav_export_decodes_back() {
        let wf = Waveform { sample_rate: 16000, channels: vec![vec![0.25; 1600]] };
        let bytes = wf.to_wav_bytes().unwrap();
        let decoded = decode_bytes(&bytes, Some("wav")).unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.frames(), 1600);
    }
}
