// src/waveform/wav.rs

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Encodes interleaved `f32` samples as 16-bit PCM wave bytes.
pub fn encode_pcm16(interleaved: &[f32], sample_rate: u32, channels: usize) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: channels as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &s in interleaved {
            // clamp and convert
            let samp = if s.is_finite() {
                (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
            } else {
                0i16
            };
            writer.write_sample(samp)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}
