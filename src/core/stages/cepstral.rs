// src/core/stages/cepstral.rs
//
// Log compression and the decorrelating cosine transform.

use std::f64::consts::PI;

use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

const DEFAULT_FLOOR: f32 = 1e-10;

/// Elementwise `log(max(x, floor))`
pub struct Log {
    /// 1 / ln(base)
    scale: f32,
    floor: f32,
}

impl Log {
    pub const NAME: &'static str = "Log";

    pub fn configure(
        params: &mut StageParams,
        _ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let base = params.take_raw("base").unwrap_or_else(|| "e".to_string());
        let scale = match base.trim() {
            "e" => 1.0,
            "2" => 1.0 / std::f32::consts::LN_2,
            "10" => 1.0 / std::f32::consts::LN_10,
            other => {
                return Err(StageError::parameter(
                    "base",
                    format!("expected e, 2 or 10, got \"{}\"", other),
                ))
            }
        };
        let floor = params.take_f32("floor", DEFAULT_FLOOR)?;
        if floor <= 0.0 {
            return Err(StageError::parameter("floor", "must be positive"));
        }
        Ok(Box::new(Self { scale, floor }))
    }
}

impl Stage for Log {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        input_len
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        for (i, (out, &x)) in output.iter_mut().zip(input.iter()).enumerate() {
            if x.is_nan() {
                return Err(StageError::runtime(format!("NaN input at index {}", i)));
            }
            *out = x.max(self.floor).ln() * self.scale;
        }
        Ok(())
    }
}

/// Orthonormal DCT-II with a precomputed cosine table
pub struct Dct {
    length: usize,
    /// Row-major `length x length`, row k holds basis function k
    table: Vec<f32>,
}

impl Dct {
    pub const NAME: &'static str = "DCT";

    pub fn new(length: usize) -> Self {
        let n = length as f64;
        let mut table = Vec::with_capacity(length * length);
        for k in 0..length {
            let norm = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            for i in 0..length {
                let angle = PI / n * (i as f64 + 0.5) * k as f64;
                table.push((norm * angle.cos()) as f32);
            }
        }
        Self { length, table }
    }

    pub fn configure(
        _params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let length = ctx.fixed_input_len(Self::NAME)?;
        Ok(Box::new(Self::new(length)))
    }
}

impl Stage for Dct {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.length)
    }

    fn output_len(&self, _input_len: usize) -> usize {
        self.length
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        for (out, basis) in output.iter_mut().zip(self.table.chunks_exact(self.length)) {
            *out = basis.iter().zip(input.iter()).map(|(b, x)| b * x).sum();
        }
        Ok(())
    }
}
