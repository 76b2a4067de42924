// src/core/stages/window.rs
//
// Framing of the raw signal into fixed-length frames.

use crate::core::dsp::{create_window, WindowType};
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

/// Multiplies frames of `length` samples by a window function.
///
/// Without `step` a single frame is taken from the start of the input
/// (zero padded when shorter). With `step` the input is covered by
/// sliding frames `step` samples apart.
pub struct Window {
    length: usize,
    step: Option<usize>,
    coefficients: Vec<f32>,
}

impl Window {
    pub const NAME: &'static str = "Window";

    pub fn new(length: usize, step: Option<usize>, window_type: WindowType) -> Self {
        Self {
            length,
            step,
            coefficients: create_window(length, window_type),
        }
    }

    pub fn configure(
        params: &mut StageParams,
        _ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let length = params
            .take_positive("length")?
            .ok_or_else(|| StageError::parameter("length", "missing required value"))?;
        let step = params.take_positive("step")?;
        let window_type: WindowType = params.take_or("type", WindowType::default())?;
        Ok(Box::new(Self::new(length, step, window_type)))
    }
}

impl Stage for Window {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, _input_len: usize) -> usize {
        self.length
    }

    fn declared_output_len(&self, _input_len: Option<usize>) -> Option<usize> {
        Some(self.length)
    }

    fn frames_out(&self, input_len: usize) -> usize {
        match self.step {
            Some(step) if input_len > self.length => 1 + (input_len - self.length) / step,
            _ => 1,
        }
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        let step = self.step.unwrap_or(self.length);
        for (index, frame) in output.chunks_exact_mut(self.length).enumerate() {
            let start = index * step;
            for (i, (out, w)) in frame.iter_mut().zip(self.coefficients.iter()).enumerate() {
                *out = input.get(start + i).copied().unwrap_or(0.0) * w;
            }
        }
        Ok(())
    }
}
