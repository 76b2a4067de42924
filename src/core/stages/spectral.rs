// src/core/stages/spectral.rs
//
// Fourier transforms and complex-to-real reductions. Complex data travels
// between stages as interleaved (re, im) pairs.

use crate::core::dsp::{ComplexFft, RealFft};
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

/// Frame length either declared through `length` or taken from the
/// previous stage
fn frame_length(
    params: &mut StageParams,
    ctx: &StageContext,
    stage: &str,
) -> Result<usize, StageError> {
    match params.take_positive("length")? {
        Some(length) => Ok(length),
        None => ctx.fixed_input_len(stage),
    }
}

fn require_even(ctx: &StageContext, stage: &str) -> Result<(), StageError> {
    match ctx.input_len {
        Some(n) if n % 2 == 1 => Err(StageError::shape(format!(
            "{} expects interleaved complex pairs, got an odd frame length {}",
            stage, n
        ))),
        _ => Ok(()),
    }
}

/// Real-input discrete Fourier transform: `n -> 2 * (n / 2 + 1)`
pub struct Rdft {
    fft: RealFft,
}

impl Rdft {
    pub const NAME: &'static str = "RDFT";

    pub fn configure(
        params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let length = frame_length(params, ctx, Self::NAME)?;
        Ok(Box::new(Self { fft: RealFft::new(length) }))
    }
}

impl Stage for Rdft {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.fft.size())
    }

    fn output_len(&self, _input_len: usize) -> usize {
        2 * self.fft.bins()
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        self.fft
            .process_interleaved(input, output)
            .map_err(StageError::runtime)
    }
}

/// Complex DFT of a real frame: `n -> 2n`
pub struct Dft {
    fft: ComplexFft,
}

impl Dft {
    pub const NAME: &'static str = "DFT";

    pub fn configure(
        params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let length = frame_length(params, ctx, Self::NAME)?;
        Ok(Box::new(Self { fft: ComplexFft::new(length) }))
    }
}

impl Stage for Dft {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.fft.size())
    }

    fn output_len(&self, _input_len: usize) -> usize {
        2 * self.fft.size()
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        self.fft.process_interleaved(input, output);
        Ok(())
    }
}

/// Rebuilds the full spectrum from the one-sided RDFT output.
///
/// An even frame is taken as complex pairs (`m -> 2(m - 2)`, mirrored bins
/// conjugated); an odd frame as a real-valued spectrum (`m -> 2(m - 1)`).
pub struct UnpackRdft;

impl UnpackRdft {
    pub const NAME: &'static str = "UnpackRDFT";

    pub fn configure(
        _params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        match ctx.input_len {
            Some(n) if n < 3 => Err(StageError::shape(format!(
                "{} needs at least 3 values per frame, got {}",
                Self::NAME,
                n
            ))),
            _ => Ok(Box::new(Self)),
        }
    }
}

impl Stage for UnpackRdft {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        if input_len % 2 == 1 {
            input_len.saturating_sub(1) * 2
        } else {
            input_len.saturating_sub(2) * 2
        }
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        let m = input.len();
        if m < 3 {
            return Err(StageError::runtime(format!("frame of {} values is too short", m)));
        }
        output[..m].copy_from_slice(input);
        let mirrored = &mut output[m..];
        if m % 2 == 1 {
            // Real spectrum: bins k-2 down to 1
            for (j, out) in mirrored.iter_mut().enumerate() {
                *out = input[m - 2 - j];
            }
        } else {
            let bins = m / 2;
            for (j, pair) in mirrored.chunks_exact_mut(2).enumerate() {
                let src = 2 * (bins - 2 - j);
                pair[0] = input[src];
                pair[1] = -input[src + 1];
            }
        }
        Ok(())
    }
}

/// `re^2 + im^2` per complex pair: `2k -> k`
pub struct SpectralEnergy;

impl SpectralEnergy {
    pub const NAME: &'static str = "SpectralEnergy";

    pub fn configure(
        _params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        require_even(ctx, Self::NAME)?;
        Ok(Box::new(Self))
    }
}

impl Stage for SpectralEnergy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        input_len / 2
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        if input.len() % 2 == 1 {
            return Err(StageError::runtime("odd number of values for complex input"));
        }
        for (out, pair) in output.iter_mut().zip(input.chunks_exact(2)) {
            *out = pair[0] * pair[0] + pair[1] * pair[1];
        }
        Ok(())
    }
}

/// `sqrt(re^2 + im^2)` per complex pair: `2k -> k`
pub struct ComplexMagnitude;

impl ComplexMagnitude {
    pub const NAME: &'static str = "ComplexMagnitude";

    pub fn configure(
        _params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        require_even(ctx, Self::NAME)?;
        Ok(Box::new(Self))
    }
}

impl Stage for ComplexMagnitude {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        input_len / 2
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        if input.len() % 2 == 1 {
            return Err(StageError::runtime("odd number of values for complex input"));
        }
        for (out, pair) in output.iter_mut().zip(input.chunks_exact(2)) {
            *out = pair[0].hypot(pair[1]);
        }
        Ok(())
    }
}
