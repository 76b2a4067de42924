// src/core/stages/summary.rs
//
// Stages reducing a frame to a single value.

use crate::core::dsp::stats;
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

/// Sum of squares, or mean square with `normalize=true`
pub struct Energy {
    normalize: bool,
}

impl Energy {
    pub const NAME: &'static str = "Energy";

    pub fn configure(
        params: &mut StageParams,
        _ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let normalize = params.take_bool("normalize", false)?;
        Ok(Box::new(Self { normalize }))
    }
}

impl Stage for Energy {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, _input_len: usize) -> usize {
        1
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        output[0] = stats::energy(input, self.normalize);
        Ok(())
    }
}

/// Natural log of the frame energy
pub struct Intensity;

impl Intensity {
    pub const NAME: &'static str = "Intensity";

    pub fn configure(
        _params: &mut StageParams,
        _ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        Ok(Box::new(Self))
    }
}

impl Stage for Intensity {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, _input_len: usize) -> usize {
        1
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        let energy = stats::energy(input, false);
        if energy <= 0.0 {
            return Err(StageError::runtime("log of zero energy (silent frame)"));
        }
        output[0] = energy.ln();
        Ok(())
    }
}

/// Centre of mass of a one-sided spectrum, in Hz.
///
/// The index-weighted mean is divided by the frame duration
/// `2 * n / sample_rate`, which maps bin `k` of `n` bins spanning
/// 0..Nyquist to `k * sample_rate / (2 * n)`.
pub struct Centroid {
    sample_rate: f32,
}

impl Centroid {
    pub const NAME: &'static str = "Centroid";

    pub fn configure(
        _params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        if ctx.sample_rate == 0 {
            return Err(StageError::shape("Centroid needs a positive sample rate"));
        }
        Ok(Box::new(Self {
            sample_rate: ctx.sample_rate as f32,
        }))
    }
}

impl Stage for Centroid {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, _input_len: usize) -> usize {
        1
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        let duration = 2.0 * input.len() as f32 / self.sample_rate;
        output[0] = stats::centroid(input) / duration;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stages::test_support::{build, run};

    #[test]
    fn test_energy() {
        let stage = build("Energy", &[], None).unwrap();
        assert_eq!(run(stage.as_ref(), &[3.0, 4.0]), vec![25.0]);
        let stage = build("Energy", &[("normalize", "true")], None).unwrap();
        assert_eq!(run(stage.as_ref(), &[3.0, 4.0]), vec![12.5]);
    }

    #[test]
    fn test_intensity() {
        let stage = build("Intensity", &[], None).unwrap();
        let out = run(stage.as_ref(), &[1.0, 0.0]);
        assert_eq!(out, vec![0.0]);
        let mut out = [0.0];
        assert!(matches!(
            stage.apply(&[0.0, 0.0], &mut out),
            Err(StageError::Runtime(_))
        ));
    }

    #[test]
    fn test_centroid() {
        let stage = build("Centroid", &[], None).unwrap();
        // Index centroid 2 of 4 bins at 16 kHz: 2 * 16000 / 8
        assert_eq!(run(stage.as_ref(), &[0.0, 1.0, 0.0, 1.0]), vec![4000.0]);
        assert_eq!(run(stage.as_ref(), &[0.0; 4]), vec![0.0]);
    }
}
