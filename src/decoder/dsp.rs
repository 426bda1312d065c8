// src/decoder/dsp.rs

/// Splits interleaved frames into one buffer per channel. A trailing
/// partial frame is dropped.
pub fn deinterleave(interleaved: &[f32], channels: usize) -> Vec<Vec<f32>> {
    if channels == 0 {
        return Vec::new();
    }
    let frames = interleaved.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (ch, &s) in frame.iter().enumerate() {
            planar[ch].push(s);
        }
    }
    planar
}

pub fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let channels = planar.len();
    let frames = planar_len(planar);
    let mut out = Vec::with_capacity(frames * channels);
    for f in 0..frames {
        out.extend(planar.iter().map(|ch| ch[f]));
    }
    out
}

pub fn planar_len(planar: &[Vec<f32>]) -> usize {
    planar.iter().map(|v| v.len()).min().unwrap_or(0)
}

/// Removes and returns the first `frames` frames of every channel.
pub fn take_from_planar(planar: &mut [Vec<f32>], frames: usize) -> Vec<Vec<f32>> {
    planar
        .iter_mut()
        .map(|ch| {
            let n = frames.min(ch.len());
            let tail = ch.split_off(n);
            std::mem::replace(ch, tail)
        })
        .collect()
}

/// Converts interleaved audio between channel counts.
///
/// Down-mixing averages groups of source channels (all of them for mono);
/// up-mixing repeats source channels round-robin.
pub fn updown_mix_interleaved(input: &[f32], in_ch: usize, out_ch: usize) -> Vec<f32> {
    if in_ch == out_ch {
        return input.to_vec();
    }
    if in_ch == 0 || out_ch == 0 {
        return Vec::new();
    }
    let frames = input.len() / in_ch;
    let mut out = Vec::with_capacity(frames * out_ch);

    for frame in input.chunks_exact(in_ch) {
        if out_ch < in_ch {
            let factor = in_ch as f32 / out_ch as f32;
            for oc in 0..out_ch {
                let start = (oc as f32 * factor).floor() as usize;
                let end = (((oc + 1) as f32 * factor).ceil() as usize).min(in_ch);
                let group = &frame[start..end];
                let mean = if group.is_empty() {
                    0.0
                } else {
                    group.iter().sum::<f32>() / group.len() as f32
                };
                out.push(mean);
            }
        } else {
            out.extend((0..out_ch).map(|oc| frame[oc % in_ch]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deinterleave_then_interleave_keeps_frames() {
        let planar = deinterleave(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0, 9.0], 2);
        assert_eq!(planar, vec![vec![1.0, 2.0, 3.0], vec![-1.0, -2.0, -3.0]]);
        assert_eq!(interleave(&planar), vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
    }

    #[test]
    fn stereo_to_mono_is_the_mean() {
        let mono = updown_mix_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, 1);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn surround_to_mono_averages_every_channel() {
        let mono = updown_mix_interleaved(&[0.6, 0.0, 0.0, 0.0, 0.0, 0.0], 6, 1);
        assert!((mono[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn mono_to_stereo_duplicates() {
        assert_eq!(updown_mix_interleaved(&[0.1, 0.2], 1, 2), vec![0.1, 0.1, 0.2, 0.2]);
    }

    #[test]
    fn take_from_planar_splits_at_frame_count() {
        let mut planar = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let head = take_from_planar(&mut planar, 2);
        assert_eq!(head, vec![vec![1.0, 2.0], vec![4.0, 5.0]]);
        assert_eq!(planar, vec![vec![3.0], vec![6.0]]);
        assert_eq!(planar_len(&planar), 1);
    }
}
