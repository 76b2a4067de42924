// src/core/stages/bands.rs
//
// Cuts each time-domain frame into frequency bands.

use crate::core::dsp::BandSplitter;
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

const DEFAULT_NUMBER: usize = 4;

/// Band-limited copies of a frame: one frame of `n` samples becomes
/// `number` frames of `n` samples, lowest band first.
///
/// `number` splits 0..Nyquist into equal bands. `bands` lists ascending
/// upper edges in Hz instead and overrides `number`.
pub struct FrequencyBands {
    splitter: BandSplitter,
}

impl FrequencyBands {
    pub const NAME: &'static str = "FrequencyBands";

    pub fn configure(
        params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let number = params.take_positive("number")?.unwrap_or(DEFAULT_NUMBER);
        let edges = params.take_raw("bands").map(|raw| parse_edges(&raw)).transpose()?;
        for key in ["filter", "lengths"] {
            if params.take_raw(key).is_some() {
                return Err(StageError::parameter(
                    key,
                    "bands are cut in the frequency domain; IIR filters are not available",
                ));
            }
        }
        let length = ctx.fixed_input_len(Self::NAME)?;

        let splitter = match edges {
            Some(edges) => BandSplitter::new(length, ctx.sample_rate, &edges)
                .map_err(|reason| StageError::parameter("bands", reason))?,
            None => BandSplitter::uniform(length, ctx.sample_rate, number)
                .map_err(|reason| StageError::parameter("number", reason))?,
        };
        Ok(Box::new(Self { splitter }))
    }
}

fn parse_edges(raw: &str) -> Result<Vec<f64>, StageError> {
    let edges = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| StageError::parameter("bands", format!("invalid edge \"{}\"", t)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if edges.is_empty() {
        return Err(StageError::parameter("bands", "no band edges given"));
    }
    Ok(edges)
}

impl Stage for FrequencyBands {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn input_len(&self) -> Option<usize> {
        Some(self.splitter.size())
    }

    fn output_len(&self, _input_len: usize) -> usize {
        self.splitter.size()
    }

    fn frames_out(&self, _input_len: usize) -> usize {
        self.splitter.len()
    }

    fn apply(&self, input: &[f32], output: &mut [f32]) -> Result<(), StageError> {
        self.splitter.split(input, output).map_err(StageError::runtime)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::stages::test_support::{build, run};
    use crate::error::StageError;

    #[test]
    fn test_default_four_bands() {
        let stage = build("FrequencyBands", &[], Some(64)).unwrap();
        assert_eq!(stage.frames_out(64), 4);
        assert_eq!(stage.output_len(64), 64);
        let out = run(stage.as_ref(), &[1.0; 64]);
        assert_eq!(out.len(), 256);
        // A constant is all DC, so only the first band carries it
        assert!(out[..64].iter().all(|v| (v - 1.0).abs() < 1e-4));
        assert!(out[64..].iter().all(|v| v.abs() < 1e-4));
    }

    #[test]
    fn test_bands_override_number() {
        let stage = build(
            "FrequencyBands",
            &[("number", "8"), ("bands", "1000 3000 8000")],
            Some(64),
        )
        .unwrap();
        assert_eq!(stage.frames_out(64), 3);
    }

    #[test]
    fn test_parameter_errors() {
        for (key, value) in [("bands", "3000 1000"), ("bands", "1k"), ("bands", " "), ("number", "0")] {
            assert!(
                matches!(
                    build("FrequencyBands", &[(key, value)], Some(64)),
                    Err(StageError::Parameter { key: ref k, .. }) if k == key
                ),
                "accepted {}={}",
                key,
                value
            );
        }
        assert!(matches!(
            build("FrequencyBands", &[("filter", "butterworth")], Some(64)),
            Err(StageError::Parameter { ref key, .. }) if key == "filter"
        ));
        assert!(matches!(build("FrequencyBands", &[], None), Err(StageError::Shape(_))));
    }
}
