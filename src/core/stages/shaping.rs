// src/core/stages/shaping.rs
//
// Stages that reshape or filter a frame without changing its domain.

use crate::core::dsp::{pre_emphasis, stats};
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Keeps `length` values from the start (`from=left`) or end of a frame
pub struct Selector {
    length: usize,
    side: Side,
}

impl Selector {
    pub const NAME: &'static str = "Selector";

    pub fn configure(
        params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let length = params
            .take_positive("length")?
            .ok_or_else(|| StageError::parameter("length", "missing required value"))?;
        let side = match params.take_raw("from").as_deref().map(str::trim) {
            None | Some("left") => Side::Left,
            Some("right") => Side::Right,
            Some(other) => {
                return Err(StageError::parameter(
                    "from",
                    format!("expected left or right, got \"{}\"", other),
                ))
            }
        };
        if let Some(n) = ctx.input_len {
            if n < length {
                return Err(StageError::shape(format!(
                    "{} keeps {} values but frames only have {}",
                    Self::NAME,
                    length,
                    n
                )));
            }
        }
        Ok(Box::new(Self { length, side }))
    }
}

impl Stage for Selector {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, _input_len: usize) -> usize {
        self.length
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        if input.len() < self.length {
            return Err(StageError::runtime(format!(
                "cannot keep {} values of a {}-value frame",
                self.length,
                input.len()
            )));
        }
        let kept = match self.side {
            Side::Left => &input[..self.length],
            Side::Right => &input[input.len() - self.length..],
        };
        output.copy_from_slice(kept);
        Ok(())
    }
}

/// Repeats each value `factor` times
pub struct Stretch {
    factor: usize,
}

impl Stretch {
    pub const NAME: &'static str = "Stretch";

    pub fn new(factor: usize) -> Self {
        Self { factor }
    }

    pub fn configure(
        params: &mut StageParams,
        _ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let factor = params.take_positive("factor")?.unwrap_or(1);
        Ok(Box::new(Self::new(factor)))
    }
}

impl Stage for Stretch {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        input_len * self.factor
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        for (chunk, &x) in output.chunks_exact_mut(self.factor).zip(input.iter()) {
            chunk.fill(x);
        }
        Ok(())
    }
}

/// Rectified difference between neighbouring values: `n -> n - 1`
pub struct Diffrect;

impl Diffrect {
    pub const NAME: &'static str = "Diffrect";

    pub fn configure(
        _params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        match ctx.input_len {
            Some(n) if n < 2 => Err(StageError::shape(format!(
                "{} needs at least 2 values per frame, got {}",
                Self::NAME,
                n
            ))),
            _ => Ok(Box::new(Self)),
        }
    }
}

impl Stage for Diffrect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        input_len.saturating_sub(1)
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        stats::rectified_diff(input, output);
        Ok(())
    }
}

/// `y[i] = x[i] - value * x[i - 1]`
pub struct Preemphasis {
    value: f32,
}

impl Preemphasis {
    pub const NAME: &'static str = "Preemphasis";

    pub fn configure(
        params: &mut StageParams,
        _ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let value = params.take_f32("value", 0.97)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(StageError::parameter("value", "must lie in 0..1"));
        }
        Ok(Box::new(Self { value }))
    }
}

impl Stage for Preemphasis {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn output_len(&self, input_len: usize) -> usize {
        input_len
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        pre_emphasis(input, self.value, output);
        Ok(())
    }
}
