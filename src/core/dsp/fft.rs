//! Planned FFTs that can be shared between threads

use std::sync::Arc;

use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Forward real-input FFT of a fixed length.
///
/// The plan is created once; every call allocates its own buffers.
#[derive(Clone)]
pub struct RealFft {
    plan: Arc<dyn RealToComplex<f32>>,
    size: usize,
}

impl RealFft {
    pub fn new(size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        Self {
            plan: planner.plan_fft_forward(size),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of complex bins produced (conjugate symmetry drops the rest)
    pub fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Transform `samples` into interleaved re/im pairs written to `out`
    /// (`2 * bins()` values)
    pub fn process_interleaved(&self, samples: &[f32], out: &mut [f32]) -> Result<(), String> {
        if samples.len() != self.size {
            return Err(format!(
                "expected {} samples, got {}",
                self.size,
                samples.len()
            ));
        }
        let mut input = self.plan.make_input_vec();
        input.copy_from_slice(samples);
        let mut spectrum = self.plan.make_output_vec();
        self.plan
            .process(&mut input, &mut spectrum)
            .map_err(|e| e.to_string())?;
        for (pair, c) in out.chunks_exact_mut(2).zip(spectrum.iter()) {
            pair[0] = c.re;
            pair[1] = c.im;
        }
        Ok(())
    }
}

/// Forward complex FFT of a real frame
#[derive(Clone)]
pub struct ComplexFft {
    plan: Arc<dyn Fft<f32>>,
    size: usize,
}

impl ComplexFft {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        Self {
            plan: planner.plan_fft_forward(size),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Full spectrum as interleaved re/im pairs (`2 * size` values)
    pub fn process_interleaved(&self, samples: &[f32], out: &mut [f32]) {
        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.plan.process(&mut buffer);
        for (pair, c) in out.chunks_exact_mut(2).zip(buffer.iter()) {
            pair[0] = c.re;
            pair[1] = c.im;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_real_fft_dc() {
        let fft = RealFft::new(8);
        let mut out = vec![0.0; 2 * fft.bins()];
        fft.process_interleaved(&[1.0; 8], &mut out).unwrap();
        assert!((out[0] - 8.0).abs() < 1e-5);
        assert!(out[2..].iter().all(|v| v.abs() < 1e-5));
    }

    #[test]
    fn test_real_and_complex_agree() {
        let samples: Vec<f32> = (0..16).map(|i| (2.0 * PI * 3.0 * i as f32 / 16.0).sin()).collect();
        let real = RealFft::new(16);
        let complex = ComplexFft::new(16);
        let mut a = vec![0.0; 2 * real.bins()];
        let mut b = vec![0.0; 32];
        real.process_interleaved(&samples, &mut a).unwrap();
        complex.process_interleaved(&samples, &mut b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4);
        }
        // Energy sits in bin 3
        let mag3 = (a[6] * a[6] + a[7] * a[7]).sqrt();
        assert!((mag3 - 8.0).abs() < 1e-3);
    }
}
