// src/core/stages/wavelet.rs
//
// Wavelet packet decomposition of time-domain frames.

use crate::core::dsp::{TreeFingerprint, WaveletFamily, WaveletFilter, WaveletPacket};
use crate::core::stage::{Stage, StageContext, StageParams};
use crate::error::StageError;

const DEFAULT_TREE: &str = "3 3 3 4 4 2 4 4 3";
const DEFAULT_ORDER: usize = 8;

/// Discrete wavelet packet transform: `n -> n`.
///
/// `tree` lists the depth of every leaf from left to right, low band
/// first. The output is the leaf coefficients concatenated in that order,
/// so a leaf at depth `d` contributes `n / 2^d` values.
pub struct Dwpt {
    packet: WaveletPacket,
    length: usize,
}

impl Dwpt {
    pub const NAME: &'static str = "DWPT";

    pub fn configure(
        params: &mut StageParams,
        ctx: &StageContext,
    ) -> Result<Box<dyn Stage>, StageError> {
        let family: WaveletFamily = params.take_or("type", WaveletFamily::default())?;
        let order = params.take_positive("order")?.unwrap_or(DEFAULT_ORDER);
        let tree: TreeFingerprint = params
            .take_raw("tree")
            .as_deref()
            .unwrap_or(DEFAULT_TREE)
            .parse()
            .map_err(|reason| StageError::parameter("tree", reason))?;
        let filter =
            WaveletFilter::new(family, order).map_err(|reason| StageError::parameter("order", reason))?;
        let length = ctx.fixed_input_len(Self::NAME)?;

        let packet = WaveletPacket::new(filter, tree);
        if !packet.supports_len(length) {
            return Err(StageError::shape(format!(
                "DWPT tree \"{}\" needs a frame length divisible by {}, got {}",
                packet.tree(),
                1usize << packet.tree().max_depth(),
                length
            )));
        }
        Ok(Box::new(Self { packet, length }))
    }
}

impl Stage for Dwpt {
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
        self.packet.transform(input, output);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::stages::test_support::{build, run};
    use crate::error::StageError;

    #[test]
    fn test_defaults() {
        let stage = build("DWPT", &[], Some(512)).unwrap();
        assert_eq!(stage.input_len(), Some(512));
        assert_eq!(stage.output_len(512), 512);
    }

    #[test]
    fn test_energy_is_preserved() {
        let stage = build("DWPT", &[("type", "coif"), ("order", "6"), ("tree", "1 2 3 3")], Some(64)).unwrap();
        let input: Vec<f32> = (0..64).map(|i| ((i * 5) % 9) as f32 - 4.0).collect();
        let out = run(stage.as_ref(), &input);
        let before: f32 = input.iter().map(|v| v * v).sum();
        let after: f32 = out.iter().map(|v| v * v).sum();
        assert!((before - after).abs() < before * 1e-4);
    }

    #[test]
    fn test_malformed_tree() {
        for tree in ["1 2", "2 1 2", "1 0", "a b"] {
            assert!(
                matches!(
                    build("DWPT", &[("tree", tree)], Some(64)),
                    Err(StageError::Parameter { ref key, .. }) if key == "tree"
                ),
                "accepted tree \"{}\"",
                tree
            );
        }
    }

    #[test]
    fn test_unsupported_wavelet() {
        assert!(matches!(
            build("DWPT", &[("type", "coif"), ("order", "8")], Some(64)),
            Err(StageError::Parameter { ref key, .. }) if key == "order"
        ));
        assert!(matches!(
            build("DWPT", &[("type", "haar")], Some(64)),
            Err(StageError::Parameter { ref key, .. }) if key == "type"
        ));
    }

    #[test]
    fn test_frame_length_must_divide() {
        // Default tree is 4 levels deep
        assert!(matches!(build("DWPT", &[], Some(24)), Err(StageError::Shape(_))));
        assert!(matches!(build("DWPT", &[], None), Err(StageError::Shape(_))));
        assert!(build("DWPT", &[], Some(32)).is_ok());
    }
}
