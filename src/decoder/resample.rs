// src/decoder/resample.rs

use crate::decoder::dsp;
use crate::error::Result;
use rubato::{
    calculate_cutoff, Resampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

const CHUNK_FRAMES: usize = 1024;

pub fn build_resampler(
    src_rate: u32,
    dst_rate: u32,
    channels: usize,
) -> Result<Option<SincFixedIn<f32>>> {
    if src_rate == dst_rate {
        return Ok(None);
    }
    let ratio = dst_rate as f64 / src_rate as f64;
    let sinc_len = 256usize;
    let window = WindowFunction::BlackmanHarris2;
    let f_cutoff = calculate_cutoff(sinc_len, window);
    let params = SincInterpolationParameters {
        sinc_len,
        f_cutoff,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window,
    };
    let r = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, channels)?;
    Ok(Some(r))
}

fn try_process_exact(
    resampler: &mut SincFixedIn<f32>,
    stage_planar: &mut [Vec<f32>],
) -> Result<Option<Vec<Vec<f32>>>> {
    let need = resampler.input_frames_next();
    if dsp::planar_len(stage_planar) < need {
        return Ok(None);
    }
    let in_block = dsp::take_from_planar(stage_planar, need);
    Ok(Some(resampler.process(&in_block, None)?))
}

fn append(out: &mut [Vec<f32>], block: Vec<Vec<f32>>) {
    for (dst, src) in out.iter_mut().zip(block) {
        dst.extend(src);
    }
}

/// Resamples a whole clip held in planar buffers.
///
/// The filter delay is trimmed from the front and the result holds exactly
/// `round(frames * dst / src)` frames per channel.
pub fn resample_planar(input: &[Vec<f32>], src_rate: u32, dst_rate: u32) -> Result<Vec<Vec<f32>>> {
    let channels = input.len();
    let in_frames = dsp::planar_len(input);
    if src_rate == dst_rate {
        return Ok(input.to_vec());
    }
    if channels == 0 || in_frames == 0 {
        return Ok(vec![Vec::new(); channels]);
    }
    let Some(mut resampler) = build_resampler(src_rate, dst_rate, channels)? else {
        return Ok(input.to_vec());
    };

    let expected = (in_frames as f64 * dst_rate as f64 / src_rate as f64).round() as usize;
    let delay = resampler.output_delay();
    let wanted = delay + expected;

    let mut stage: Vec<Vec<f32>> = input.iter().map(|ch| ch[..in_frames].to_vec()).collect();
    let mut out: Vec<Vec<f32>> = vec![Vec::with_capacity(wanted); channels];

    while let Some(block) = try_process_exact(&mut resampler, &mut stage)? {
        append(&mut out, block);
    }

    let rest = dsp::take_from_planar(&mut stage, in_frames);
    if dsp::planar_len(&rest) > 0 {
        let block = resampler.process_partial(Some(rest.as_slice()), None)?;
        append(&mut out, block);
    }

    // flush the filter tail with silence until the delayed output is complete
    while dsp::planar_len(&out) < wanted {
        let block = resampler.process_partial::<Vec<f32>>(None, None)?;
        if block.first().is_none_or(|ch| ch.is_empty()) {
            break;
        }
        append(&mut out, block);
    }

    for ch in &mut out {
        ch.drain(..delay.min(ch.len()));
        ch.resize(expected, 0.0);
    }
    Ok(out)
}
