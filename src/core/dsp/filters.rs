//! Signal filtering and filter bank design

use std::str::FromStr;

/// Apply pre-emphasis filter (boosts high frequencies)
pub fn pre_emphasis(samples: &[f32], coefficient: f32, output: &mut [f32]) {
    if samples.is_empty() {
        return;
    }

    output[0] = samples[0];
    for i in 1..samples.len() {
        output[i] = samples[i] - coefficient * samples[i - 1];
    }
}

/// Frequency scale used to space filter bank centres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyScale {
    Linear,
    Mel,
    Bark,
}

impl FromStr for FrequencyScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "mel" => Ok(Self::Mel),
            "bark" => Ok(Self::Bark),
            other => Err(format!("unknown scale \"{}\"", other)),
        }
    }
}

impl FrequencyScale {
    pub fn from_hz(&self, hz: f64) -> f64 {
        match self {
            FrequencyScale::Linear => hz,
            FrequencyScale::Mel => 1127.0 * (1.0 + hz / 700.0).ln(),
            // Traunmueller
            FrequencyScale::Bark => 26.81 * hz / (1960.0 + hz) - 0.53,
        }
    }

    pub fn to_hz(&self, value: f64) -> f64 {
        match self {
            FrequencyScale::Linear => value,
            FrequencyScale::Mel => 700.0 * ((value / 1127.0).exp() - 1.0),
            FrequencyScale::Bark => 1960.0 * (value + 0.53) / (26.28 - value),
        }
    }
}

/// One triangular filter, stored from its first non-zero bin
#[derive(Debug, Clone)]
struct Triangle {
    start: usize,
    weights: Vec<f32>,
}

/// Precomputed triangular filter bank over a one-sided spectrum
#[derive(Debug, Clone)]
pub struct TriangularFilterBank {
    filters: Vec<Triangle>,
    bins: usize,
}

/// Filter bank layout
#[derive(Debug, Clone, Copy)]
pub struct FilterBankDesign {
    pub scale: FrequencyScale,
    pub number: usize,
    pub frequency_min: f64,
    pub frequency_max: f64,
    pub squared: bool,
}

impl TriangularFilterBank {
    /// Design `design.number` filters for a spectrum of `bins` values
    /// spanning 0..sample_rate/2.
    ///
    /// Fails when a filter falls between two bins and would always output 0.
    pub fn new(design: &FilterBankDesign, bins: usize, sample_rate: u32) -> Result<Self, String> {
        if bins < 2 {
            return Err(format!("spectrum of {} bins is too short", bins));
        }
        let nyquist = sample_rate as f64 / 2.0;
        let bin_hz = nyquist / (bins - 1) as f64;

        let lo = design.scale.from_hz(design.frequency_min);
        let hi = design.scale.from_hz(design.frequency_max);
        let step = (hi - lo) / (design.number + 1) as f64;
        let edges: Vec<f64> = (0..design.number + 2)
            .map(|i| design.scale.to_hz(lo + step * i as f64))
            .collect();

        let mut filters = Vec::with_capacity(design.number);
        for (index, corners) in edges.windows(3).enumerate() {
            let (left, center, right) = (corners[0], corners[1], corners[2]);
            let first = (left / bin_hz).floor() as usize;
            let last = ((right / bin_hz).ceil() as usize).min(bins - 1);

            let mut start = None;
            let mut weights = Vec::new();
            for bin in first..=last {
                let f = bin as f64 * bin_hz;
                let w = if f > left && f <= center {
                    (f - left) / (center - left)
                } else if f > center && f < right {
                    (right - f) / (right - center)
                } else {
                    0.0
                };
                if w <= 0.0 && start.is_none() {
                    continue;
                }
                start.get_or_insert(bin);
                let w = if design.squared { w * w } else { w };
                weights.push(w as f32);
            }
            while weights.last() == Some(&0.0) {
                weights.pop();
            }

            match start {
                Some(start) if !weights.is_empty() => filters.push(Triangle { start, weights }),
                _ => {
                    return Err(format!(
                        "filter {} ({:.1}..{:.1} Hz) covers no spectrum bin ({:.2} Hz per bin)",
                        index, left, right, bin_hz
                    ))
                }
            }
        }

        Ok(Self { filters, bins })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Spectrum length this bank was designed for
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Weighted sums of `spectrum` for every filter
    pub fn apply(&self, spectrum: &[f32], output: &mut [f32]) {
        for (out, filter) in output.iter_mut().zip(self.filters.iter()) {
            *out = spectrum[filter.start..]
                .iter()
                .zip(filter.weights.iter())
                .map(|(s, w)| s * w)
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mel(number: usize) -> FilterBankDesign {
        FilterBankDesign {
            scale: FrequencyScale::Mel,
            number,
            frequency_min: 130.0,
            frequency_max: 6854.0,
            squared: false,
        }
    }

    #[test]
    fn test_pre_emphasis() {
        let mut out = vec![0.0; 3];
        pre_emphasis(&[1.0, 1.0, 1.0], 0.97, &mut out);
        assert_eq!(out[0], 1.0);
        assert!((out[1] - 0.03).abs() < 1e-6);
        assert!((out[2] - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_scale_round_trip() {
        for scale in [FrequencyScale::Linear, FrequencyScale::Mel, FrequencyScale::Bark] {
            let hz = 1234.5;
            assert!((scale.to_hz(scale.from_hz(hz)) - hz).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mel_bank_layout() {
        let bank = TriangularFilterBank::new(&mel(32), 257, 16000).unwrap();
        assert_eq!(bank.len(), 32);

        // A flat spectrum excites every filter
        let mut out = vec![0.0; 32];
        bank.apply(&vec![1.0; 257], &mut out);
        assert!(out.iter().all(|&v| v > 0.0));
        // Mel filters widen with frequency
        assert!(out[31] > out[0]);
    }

    #[test]
    fn test_too_many_filters_rejected() {
        assert!(TriangularFilterBank::new(&mel(400), 33, 16000).is_err());
    }
}
