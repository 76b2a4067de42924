//! Orthogonal wavelet filters and wavelet packet decomposition
//!
//! Filtering is periodic, so every split halves the length exactly and the
//! whole packet transform preserves length and energy.

use std::fmt;
use std::str::FromStr;

/// Wavelet family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WaveletFamily {
    /// Daubechies
    #[default]
    Daub,
    /// Coiflet
    Coif,
    /// Symlet
    Sym,
}

impl FromStr for WaveletFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daub" => Ok(Self::Daub),
            "coif" => Ok(Self::Coif),
            "sym" => Ok(Self::Sym),
            other => Err(format!("unknown wavelet type \"{}\" (daub, coif or sym)", other)),
        }
    }
}

// Scaling (low-pass) filters normalised to sum sqrt(2)
const DAUB2: [f64; 2] = [
    std::f64::consts::FRAC_1_SQRT_2,
    std::f64::consts::FRAC_1_SQRT_2,
];
const DAUB4: [f64; 4] = [
    0.482_962_913_144_690_3,
    0.836_516_303_737_469,
    0.224_143_868_041_857_35,
    -0.129_409_522_550_921_45,
];
const DAUB6: [f64; 6] = [
    0.332_670_552_950_956_9,
    0.806_891_509_313_338_8,
    0.459_877_502_119_331_3,
    -0.135_011_020_010_390_8,
    -0.085_441_273_882_241_49,
    0.035_226_291_882_100_656,
];
const DAUB8: [f64; 8] = [
    0.230_377_813_308_855_2,
    0.714_846_570_552_541_5,
    0.630_880_767_929_590_4,
    -0.027_983_769_416_983_85,
    -0.187_034_811_718_881_14,
    0.030_841_381_835_986_965,
    0.032_883_011_666_982_945,
    -0.010_597_401_784_997_278,
];
const COIF6: [f64; 6] = [
    -0.015_655_728_135_464_54,
    -0.072_732_619_512_853_9,
    0.384_864_846_864_202_86,
    0.852_572_020_212_255_4,
    0.337_897_662_457_809_2,
    -0.072_732_619_512_853_9,
];
const SYM8: [f64; 8] = [
    -0.075_765_714_789_273_33,
    -0.029_635_527_645_998_51,
    0.497_618_667_632_015_45,
    0.803_738_751_805_916_1,
    0.297_857_795_605_277_36,
    -0.099_219_543_576_847_22,
    -0.012_603_967_262_037_833,
    0.032_223_100_604_042_7,
];

/// Quadrature mirror filter pair
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletFilter {
    low: Vec<f32>,
    high: Vec<f32>,
}

impl WaveletFilter {
    /// Filter pair for `family` with `order` coefficients
    pub fn new(family: WaveletFamily, order: usize) -> Result<Self, String> {
        let scaling: &[f64] = match (family, order) {
            (WaveletFamily::Daub, 2) => &DAUB2,
            (WaveletFamily::Daub, 4) | (WaveletFamily::Sym, 4) => &DAUB4,
            (WaveletFamily::Daub, 6) | (WaveletFamily::Sym, 6) => &DAUB6,
            (WaveletFamily::Daub, 8) => &DAUB8,
            (WaveletFamily::Sym, 8) => &SYM8,
            (WaveletFamily::Coif, 6) => &COIF6,
            _ => {
                return Err(format!(
                    "{:?} wavelet of order {} is not supported ({})",
                    family,
                    order,
                    supported_orders(family)
                ))
            }
        };
        let len = scaling.len();
        let low = scaling.iter().map(|&c| c as f32).collect();
        let high = (0..len)
            .map(|k| {
                let c = scaling[len - 1 - k] as f32;
                if k % 2 == 0 { c } else { -c }
            })
            .collect();
        Ok(Self { low, high })
    }

    pub fn order(&self) -> usize {
        self.low.len()
    }

    /// One periodic analysis step: `input` (even length) into approximation
    /// and detail halves
    pub fn split(&self, input: &[f32], approx: &mut [f32], detail: &mut [f32]) {
        let n = input.len();
        for (i, (a, d)) in approx.iter_mut().zip(detail.iter_mut()).enumerate() {
            let (mut lo, mut hi) = (0.0f32, 0.0f32);
            for (k, (l, h)) in self.low.iter().zip(self.high.iter()).enumerate() {
                let x = input[(2 * i + k) % n];
                lo += l * x;
                hi += h * x;
            }
            *a = lo;
            *d = hi;
        }
    }
}

fn supported_orders(family: WaveletFamily) -> &'static str {
    match family {
        WaveletFamily::Daub => "2, 4, 6 or 8",
        WaveletFamily::Coif => "6",
        WaveletFamily::Sym => "4, 6 or 8",
    }
}

/// Leaf depths of a full binary decomposition tree, left to right.
///
/// `"1 2 2"` splits once, then splits the detail half again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFingerprint {
    depths: Vec<u32>,
}

/// Deepest supported decomposition level
pub const MAX_TREE_DEPTH: u32 = 24;

impl TreeFingerprint {
    pub fn new(depths: Vec<u32>) -> Result<Self, String> {
        if depths.is_empty() {
            return Err("empty tree".to_string());
        }
        if let Some(&bad) = depths.iter().find(|&&d| d == 0 || d > MAX_TREE_DEPTH) {
            return Err(format!("leaf depth {} is outside 1..={}", bad, MAX_TREE_DEPTH));
        }

        // Every leaf must start on a boundary of its own size and the
        // leaves must tile the root exactly
        let max = *depths.iter().max().unwrap_or(&1);
        let total = 1u64 << max;
        let mut position = 0u64;
        for (index, &depth) in depths.iter().enumerate() {
            let size = 1u64 << (max - depth);
            if position % size != 0 || position + size > total {
                return Err(format!(
                    "leaf {} (depth {}) does not fit a binary tree",
                    index, depth
                ));
            }
            position += size;
        }
        if position != total {
            return Err("leaves do not cover the whole tree".to_string());
        }
        Ok(Self { depths })
    }

    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    pub fn max_depth(&self) -> u32 {
        self.depths.iter().copied().max().unwrap_or(0)
    }
}

impl FromStr for TreeFingerprint {
    type Err = String;

    /// Depths separated by spaces and/or commas
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let depths = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u32>()
                    .map_err(|_| format!("invalid leaf depth \"{}\"", t))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(depths)
    }
}

impl fmt::Display for TreeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.depths.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Wavelet packet transform over a fixed tree
#[derive(Debug, Clone)]
pub struct WaveletPacket {
    filter: WaveletFilter,
    tree: TreeFingerprint,
}

impl WaveletPacket {
    pub fn new(filter: WaveletFilter, tree: TreeFingerprint) -> Self {
        Self { filter, tree }
    }

    pub fn tree(&self) -> &TreeFingerprint {
        &self.tree
    }

    /// Whether frames of `len` samples can be split down to every leaf
    pub fn supports_len(&self, len: usize) -> bool {
        let leaves = 1usize << self.tree.max_depth();
        len >= leaves && len % leaves == 0
    }

    /// Decompose `input` and write the leaf coefficients in tree order;
    /// `output` has the same length as `input`
    pub fn transform(&self, input: &[f32], output: &mut [f32]) {
        let mut written = 0;
        self.decompose(input, 0, &mut 0, output, &mut written);
    }

    fn decompose(
        &self,
        signal: &[f32],
        depth: u32,
        leaf: &mut usize,
        output: &mut [f32],
        written: &mut usize,
    ) {
        let depths = self.tree.depths();
        if *leaf >= depths.len() {
            return;
        }
        if depths[*leaf] == depth {
            output[*written..*written + signal.len()].copy_from_slice(signal);
            *written += signal.len();
            *leaf += 1;
            return;
        }

        let half = signal.len() / 2;
        let mut approx = vec![0.0f32; half];
        let mut detail = vec![0.0f32; half];
        self.filter.split(signal, &mut approx, &mut detail);
        self.decompose(&approx, depth + 1, leaf, output, written);
        self.decompose(&detail, depth + 1, leaf, output, written);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energy(values: &[f32]) -> f32 {
        values.iter().map(|v| v * v).sum()
    }

    #[test]
    fn test_filters_are_orthonormal() {
        for (family, order) in [
            (WaveletFamily::Daub, 2),
            (WaveletFamily::Daub, 4),
            (WaveletFamily::Daub, 6),
            (WaveletFamily::Daub, 8),
            (WaveletFamily::Coif, 6),
            (WaveletFamily::Sym, 8),
        ] {
            let filter = WaveletFilter::new(family, order).unwrap();
            assert_eq!(filter.order(), order);
            let sum: f32 = filter.low.iter().sum();
            let norm: f32 = energy(&filter.low);
            assert!((sum - std::f32::consts::SQRT_2).abs() < 1e-5, "{:?}{}", family, order);
            assert!((norm - 1.0).abs() < 1e-5, "{:?}{}", family, order);
            assert!(filter.high.iter().sum::<f32>().abs() < 1e-5);
        }
        assert!(WaveletFilter::new(WaveletFamily::Coif, 8).is_err());
    }

    #[test]
    fn test_haar_split() {
        let filter = WaveletFilter::new(WaveletFamily::Daub, 2).unwrap();
        let (mut a, mut d) = ([0.0; 2], [0.0; 2]);
        filter.split(&[1.0, 1.0, 2.0, 0.0], &mut a, &mut d);
        let s = std::f32::consts::FRAC_1_SQRT_2;
        assert!((a[0] - 2.0 * s).abs() < 1e-6 && (a[1] - 2.0 * s).abs() < 1e-6);
        assert!(d[0].abs() < 1e-6 && (d[1] - 2.0 * s).abs() < 1e-6);
    }

    #[test]
    fn test_tree_validation() {
        assert!("1 2 3 3".parse::<TreeFingerprint>().is_ok());
        assert!("3, 3, 3, 4, 4, 2, 4, 4, 3".parse::<TreeFingerprint>().is_ok());
        assert!("1 1".parse::<TreeFingerprint>().is_ok());
        for bad in ["", "1", "2 1 2", "1 2", "0 1", "1 x", "1 2 2 2"] {
            assert!(bad.parse::<TreeFingerprint>().is_err(), "accepted \"{}\"", bad);
        }
        let tree: TreeFingerprint = "1,2 ,3 3".parse().unwrap();
        assert_eq!(tree.to_string(), "1 2 3 3");
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_packet_preserves_energy() {
        let filter = WaveletFilter::new(WaveletFamily::Daub, 8).unwrap();
        let packet = WaveletPacket::new(filter, "3 3 3 4 4 2 4 4 3".parse().unwrap());
        assert!(packet.supports_len(64));
        assert!(!packet.supports_len(40));

        let input: Vec<f32> = (0..64).map(|i| ((i * 7) % 11) as f32 - 5.0).collect();
        let mut output = vec![0.0; 64];
        packet.transform(&input, &mut output);
        let expected = energy(&input);
        assert!((expected - energy(&output)).abs() < expected * 1e-4);
    }

    #[test]
    fn test_constant_lands_in_approximation() {
        let filter = WaveletFilter::new(WaveletFamily::Daub, 4).unwrap();
        let packet = WaveletPacket::new(filter, "2 2 1".parse().unwrap());
        let mut output = vec![0.0; 16];
        packet.transform(&[1.0; 16], &mut output);
        // Leaf 0 (low-low) holds 4 samples of 2.0, details vanish
        for &v in &output[..4] {
            assert!((v - 2.0).abs() < 1e-5);
        }
        assert!(output[4..].iter().all(|v| v.abs() < 1e-5));
    }
}
