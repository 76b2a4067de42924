// src/testgen/mod.rs
//
// Deterministic synthetic signals for the binary, tests and benchmarks.
// Audio decoding is out of scope, so these stand in for real recordings.

use std::f64::consts::PI;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// A synthetic mono test signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Every sample equals the value
    Constant(f32),
    /// `amplitude * sin(2 pi f t)`
    Sine { frequency: f64, amplitude: f32 },
    /// Linear chirp from `from` Hz to `to` Hz over the whole signal
    Sweep { from: f64, to: f64, amplitude: f32 },
}

impl Signal {
    /// Render `samples` samples at `sample_rate`
    pub fn generate(&self, samples: usize, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f64;
        match *self {
            Signal::Constant(value) => vec![value; samples],
            Signal::Sine { frequency, amplitude } => (0..samples)
                .map(|i| {
                    let t = i as f64 / rate;
                    amplitude * (2.0 * PI * frequency * t).sin() as f32
                })
                .collect(),
            Signal::Sweep { from, to, amplitude } => {
                let duration = samples as f64 / rate;
                let slope = if duration > 0.0 { (to - from) / duration } else { 0.0 };
                (0..samples)
                    .map(|i| {
                        let t = i as f64 / rate;
                        let phase = 2.0 * PI * (from * t + 0.5 * slope * t * t);
                        amplitude * phase.sin() as f32
                    })
                    .collect()
            }
        }
    }

    /// Render as 16-bit samples, rounding and clamping to the i16 range
    pub fn generate_i16(&self, samples: usize, sample_rate: u32) -> Vec<i16> {
        self.generate(samples, sample_rate)
            .into_iter()
            .map(|v| v.round().clamp(i16::MIN as f32, i16::MAX as f32) as i16)
            .collect()
    }
}

impl FromStr for Signal {
    type Err = anyhow::Error;

    /// `constant:VALUE`, `sine:HZ:AMPL` or `sweep:FROM:TO:AMPL`
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let number = |i: usize| -> Result<f64> {
            let text = parts[i];
            text.parse::<f64>()
                .with_context(|| format!("invalid number \"{}\" in signal \"{}\"", text, s))
        };

        match (parts[0].to_lowercase().as_str(), parts.len()) {
            ("constant", 2) => Ok(Signal::Constant(number(1)? as f32)),
            ("sine", 3) => Ok(Signal::Sine {
                frequency: number(1)?,
                amplitude: number(2)? as f32,
            }),
            ("sweep", 4) => Ok(Signal::Sweep {
                from: number(1)?,
                to: number(2)?,
                amplitude: number(3)? as f32,
            }),
            _ => bail!(
                "unknown signal \"{}\" (expected constant:V, sine:HZ:AMPL or sweep:FROM:TO:AMPL)",
                s
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("constant:1000".parse::<Signal>().unwrap(), Signal::Constant(1000.0));
        assert_eq!(
            "sine:440:0.5".parse::<Signal>().unwrap(),
            Signal::Sine { frequency: 440.0, amplitude: 0.5 }
        );
        assert_eq!(
            "sweep:100:4000:1".parse::<Signal>().unwrap(),
            Signal::Sweep { from: 100.0, to: 4000.0, amplitude: 1.0 }
        );
        assert!("sine:440".parse::<Signal>().is_err());
        assert!("noise:1".parse::<Signal>().is_err());
        assert!("constant:loud".parse::<Signal>().is_err());
    }

    #[test]
    fn test_sine_period() {
        let samples = Signal::Sine { frequency: 1000.0, amplitude: 1.0 }.generate(16, 16000);
        assert!(samples[0].abs() < 1e-6);
        assert!((samples[4] - 1.0).abs() < 1e-5);
        assert!((samples[12] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_i16_clamps() {
        let samples = Signal::Constant(40000.0).generate_i16(3, 8000);
        assert_eq!(samples, vec![i16::MAX; 3]);
    }
}
