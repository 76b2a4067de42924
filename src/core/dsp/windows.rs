//! Window functions
//!
//! Every supported window is a generalised cosine sum
//! `w[i] = a0 - a1 cos(2 pi i / N) + a2 cos(4 pi i / N) - ...`
//! in its periodic form, so one routine evaluates all of them.

use std::f64::consts::PI;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowType {
    Rectangular,
    Hann,
    #[default]
    Hamming,
    Blackman,
    BlackmanHarris,
    FlatTop,
}

impl WindowType {
    /// Cosine-sum coefficients `a0, a1, ...`
    fn terms(self) -> &'static [f64] {
        match self {
            WindowType::Rectangular => &[1.0],
            WindowType::Hann => &[0.5, 0.5],
            WindowType::Hamming => &[0.54, 0.46],
            WindowType::Blackman => &[0.42, 0.5, 0.08],
            WindowType::BlackmanHarris => &[0.35875, 0.48829, 0.14128, 0.01168],
            WindowType::FlatTop => &[
                0.215_578_95,
                0.416_631_58,
                0.277_263_158,
                0.083_578_947,
                0.006_947_368,
            ],
        }
    }
}

impl FromStr for WindowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangular" | "rect" => Ok(Self::Rectangular),
            "hann" | "hanning" => Ok(Self::Hann),
            "hamming" => Ok(Self::Hamming),
            "blackman" => Ok(Self::Blackman),
            "blackman-harris" | "blackmanharris" => Ok(Self::BlackmanHarris),
            "flattop" | "flat-top" => Ok(Self::FlatTop),
            other => Err(format!("unknown window type \"{}\"", other)),
        }
    }
}

/// Periodic window of `size` coefficients
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f32> {
    let terms = window_type.terms();
    let n = size as f64;
    (0..size)
        .map(|i| {
            let phase = 2.0 * PI * i as f64 / n;
            terms
                .iter()
                .enumerate()
                .map(|(k, a)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * (k as f64 * phase).cos()
                })
                .sum::<f64>() as f32
        })
        .collect()
}
