//! Sample rate conversion using rubato
//!
//! The buffer is fed to the converter in fixed-size chunks, then silence is
//! pushed through until the converter delay has drained. The delay is
//! trimmed so that the output lines up with the input and holds
//! `ceil(n * target / source)` samples.

use log::debug;
use rubato::{
    FastFixedIn, PolynomialDegree, Resampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};
use serde::{Deserialize, Serialize};

/// Converter used when source and target rates differ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplerQuality {
    /// Septic polynomial interpolation, cheap
    Fast,
    /// Windowed sinc interpolation, highest quality
    #[default]
    Sinc,
}

impl std::str::FromStr for ResamplerQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "sinc" => Ok(Self::Sinc),
            other => Err(format!("unknown resampler quality \"{}\"", other)),
        }
    }
}

/// Number of samples produced when converting `len` samples
pub fn resampled_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    let num = len as u64 * target_rate as u64;
    let den = source_rate as u64;
    ((num + den - 1) / den) as usize
}

/// Frames handed to the converter per call
const CHUNK_FRAMES: usize = 1024;

/// Consecutive empty flushes tolerated before giving up
const MAX_IDLE_FLUSHES: usize = 8;

/// Convert mono `input` from `source_rate` to `target_rate`
pub fn resample(
    input: &[f32],
    source_rate: u32,
    target_rate: u32,
    quality: ResamplerQuality,
) -> Result<Vec<f32>, String> {
    if source_rate == target_rate {
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let expected = resampled_len(input.len(), source_rate, target_rate);
    debug!(
        "Resampling {} samples from {}Hz to {}Hz ({:?})",
        input.len(),
        source_rate,
        target_rate,
        quality
    );

    let output = match quality {
        ResamplerQuality::Fast => {
            let resampler = FastFixedIn::<f32>::new(
                ratio,
                1.0,
                PolynomialDegree::Septic,
                CHUNK_FRAMES,
                1,
            )
            .map_err(|e| format!("failed to create resampler: {}", e))?;
            run(resampler, input, expected)?
        }
        ResamplerQuality::Sinc => {
            let params = SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            };
            let resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, 1)
                .map_err(|e| format!("failed to create sinc resampler: {}", e))?;
            run(resampler, input, expected)?
        }
    };

    debug!("Resampled to {} samples", output.len());
    Ok(output)
}

/// Feed `input` in fixed chunks, then flush with silence until the
/// converter delay has drained and `expected` aligned samples exist
fn run<R: Resampler<f32>>(
    mut resampler: R,
    input: &[f32],
    expected: usize,
) -> Result<Vec<f32>, String> {
    let delay = resampler.output_delay();
    let wanted = expected + delay;
    let mut output: Vec<f32> = Vec::with_capacity(wanted + CHUNK_FRAMES);

    let mut pos = 0;
    loop {
        let needed = resampler.input_frames_next();
        if input.len() - pos < needed {
            break;
        }
        let chunk = resampler
            .process(&[&input[pos..pos + needed]], None)
            .map_err(|e| e.to_string())?;
        output.extend_from_slice(first_channel(&chunk));
        pos += needed;
    }
    if pos < input.len() {
        let rest: [&[f32]; 1] = [&input[pos..]];
        let chunk = resampler
            .process_partial(Some(&rest[..]), None)
            .map_err(|e| e.to_string())?;
        output.extend_from_slice(first_channel(&chunk));
    }

    let mut idle = 0;
    while output.len() < wanted {
        let tail = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|e| e.to_string())?;
        let tail = first_channel(&tail);
        if tail.is_empty() {
            idle += 1;
            if idle >= MAX_IDLE_FLUSHES {
                break;
            }
            continue;
        }
        idle = 0;
        output.extend_from_slice(tail);
    }

    if output.len() < wanted {
        return Err(format!(
            "converter produced {} of {} samples ({} delay + {} output)",
            output.len(),
            wanted,
            delay,
            expected
        ));
    }
    Ok(output[delay..wanted].to_vec())
}

fn first_channel(frames: &[Vec<f32>]) -> &[f32] {
    frames.first().map_or(&[], Vec::as_slice)
}
