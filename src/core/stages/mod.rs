//! Built-in stages
//!
//! The static catalogue the global registry is populated with. Every stage
//! parses its string parameters once in `configure`, precomputes whatever
//! tables it needs for the incoming frame length, and keeps them read-only.

pub mod bands;
pub mod cepstral;
pub mod filter_bank;
pub mod shaping;
pub mod spectral;
pub mod summary;
pub mod wavelet;
pub mod window;

use super::registry::StageFactory;

pub use bands::FrequencyBands;
pub use cepstral::{Dct, Log};
pub use filter_bank::FilterBank;
pub use shaping::{Diffrect, Preemphasis, Selector, Stretch};
pub use spectral::{ComplexMagnitude, Dft, Rdft, SpectralEnergy, UnpackRdft};
pub use summary::{Centroid, Energy, Intensity};
pub use wavelet::Dwpt;
pub use window::Window;

/// (name, description, factory) for every built-in stage
pub fn builtins() -> Vec<(&'static str, &'static str, StageFactory)> {
    vec![
        (Window::NAME, "Cut the signal into windowed frames", Window::configure as StageFactory),
        (Preemphasis::NAME, "First-order high-frequency boost", Preemphasis::configure as StageFactory),
        (Rdft::NAME, "Real-input FFT, packed re/im pairs", Rdft::configure as StageFactory),
        (Dft::NAME, "Complex FFT of a real frame", Dft::configure as StageFactory),
        (UnpackRdft::NAME, "Restore the conjugate-symmetric half of an RDFT", UnpackRdft::configure as StageFactory),
        (SpectralEnergy::NAME, "Squared magnitude of complex pairs", SpectralEnergy::configure as StageFactory),
        (ComplexMagnitude::NAME, "Magnitude of complex pairs", ComplexMagnitude::configure as StageFactory),
        (FilterBank::NAME, "Triangular filter bank over a spectrum", FilterBank::configure as StageFactory),
        (Log::NAME, "Elementwise floored logarithm", Log::configure as StageFactory),
        (Dct::NAME, "Orthonormal DCT-II", Dct::configure as StageFactory),
        (Selector::NAME, "Keep the first or last K values", Selector::configure as StageFactory),
        (Diffrect::NAME, "Rectified first difference", Diffrect::configure as StageFactory),
        (Stretch::NAME, "Repeat every value N times", Stretch::configure as StageFactory),
        (Energy::NAME, "Sum of squares of a frame", Energy::configure as StageFactory),
        (Intensity::NAME, "Log energy of a frame", Intensity::configure as StageFactory),
        (Centroid::NAME, "Spectral centre of mass in Hz", Centroid::configure as StageFactory),
        (Dwpt::NAME, "Discrete wavelet packet transform", Dwpt::configure as StageFactory),
        (FrequencyBands::NAME, "Split frames into band-limited copies", FrequencyBands::configure as StageFactory),
    ]
}
