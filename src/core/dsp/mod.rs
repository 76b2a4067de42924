//! Digital Signal Processing kernels
//!
//! Numeric building blocks behind the built-in stages. Everything here is
//! plain functions or immutable precomputed tables, safe to share between
//! threads.

pub mod bands;
pub mod fft;
pub mod filters;
pub mod resample;
pub mod stats;
pub mod wavelet;
pub mod windows;

pub use bands::BandSplitter;
pub use fft::{ComplexFft, RealFft};
pub use filters::{pre_emphasis, FilterBankDesign, FrequencyScale, TriangularFilterBank};
pub use resample::{resample, resampled_len, ResamplerQuality};
pub use wavelet::{TreeFingerprint, WaveletFamily, WaveletFilter, WaveletPacket};
pub use windows::{create_window, WindowType};
