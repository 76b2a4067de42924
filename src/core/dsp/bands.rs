//! Spectral band splitting
//!
//! A frame is transformed once and each band is synthesised from its own
//! bins, so the bands of a frame add back up to the frame whenever the
//! last edge reaches Nyquist.

use std::ops::Range;
use std::sync::Arc;

use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

/// Splits real frames of a fixed length into band-limited copies
#[derive(Clone)]
pub struct BandSplitter {
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
    size: usize,
    bands: Vec<Range<usize>>,
}

impl BandSplitter {
    /// `edges` are ascending upper band edges in Hz. Band `j` keeps bins
    /// from the previous edge (or 0 Hz) up to, but excluding, its own edge;
    /// a band ending at Nyquist keeps the Nyquist bin too.
    pub fn new(size: usize, sample_rate: u32, edges: &[f64]) -> Result<Self, String> {
        if size < 2 {
            return Err(format!("frames of {} samples cannot be split", size));
        }
        let nyquist = sample_rate as f64 / 2.0;
        let bins = size / 2 + 1;
        let resolution = sample_rate as f64 / size as f64;

        let mut bands = Vec::with_capacity(edges.len());
        let mut lower_hz = 0.0;
        let mut lower_bin = 0usize;
        for &upper_hz in edges {
            if !(upper_hz > lower_hz && upper_hz <= nyquist) {
                return Err(format!(
                    "band edge {} Hz must be above {} Hz and at most {} Hz",
                    upper_hz, lower_hz, nyquist
                ));
            }
            let upper_bin = if upper_hz >= nyquist {
                bins
            } else {
                ((upper_hz / resolution).ceil() as usize).min(bins)
            };
            bands.push(lower_bin..upper_bin);
            lower_hz = upper_hz;
            lower_bin = upper_bin;
        }

        let mut planner = RealFftPlanner::<f32>::new();
        Ok(Self {
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
            size,
            bands,
        })
    }

    /// `number` bands of equal width over 0..Nyquist
    pub fn uniform(size: usize, sample_rate: u32, number: usize) -> Result<Self, String> {
        let nyquist = sample_rate as f64 / 2.0;
        let edges: Vec<f64> = (1..=number)
            .map(|k| nyquist * k as f64 / number as f64)
            .collect();
        Self::new(size, sample_rate, &edges)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Bin range kept by each band
    pub fn bands(&self) -> &[Range<usize>] {
        &self.bands
    }

    /// Write band `j` of `samples` to `output[j * size..(j + 1) * size]`
    pub fn split(&self, samples: &[f32], output: &mut [f32]) -> Result<(), String> {
        if samples.len() != self.size {
            return Err(format!(
                "expected {} samples, got {}",
                self.size,
                samples.len()
            ));
        }
        let mut input = self.forward.make_input_vec();
        input.copy_from_slice(samples);
        let mut spectrum = self.forward.make_output_vec();
        self.forward
            .process(&mut input, &mut spectrum)
            .map_err(|e| e.to_string())?;

        let scale = 1.0 / self.size as f32;
        let last = spectrum.len() - 1;
        let mut masked = self.inverse.make_input_vec();
        for (band, frame) in self.bands.iter().zip(output.chunks_exact_mut(self.size)) {
            masked.fill(Complex::new(0.0, 0.0));
            masked[band.clone()].copy_from_slice(&spectrum[band.clone()]);
            // A real signal has no imaginary part at DC or at an even Nyquist
            masked[0].im = 0.0;
            if self.size % 2 == 0 {
                masked[last].im = 0.0;
            }
            self.inverse
                .process(&mut masked, frame)
                .map_err(|e| e.to_string())?;
            frame.iter_mut().for_each(|v| *v *= scale);
        }
        Ok(())
    }
}
