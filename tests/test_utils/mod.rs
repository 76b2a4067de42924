#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

use sfextract::{FeatureSpec, StageSpec};

pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sfextract"))
}

pub fn run_sfextract(args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .args(args)
        .output()
        .expect("Failed to execute sfextract")
}

/// The 16-coefficient MFCC chain used throughout the tests
pub fn mfcc_feature() -> FeatureSpec {
    FeatureSpec::new(
        "MFCC",
        vec![
            StageSpec::new("Window").param("length", "512"),
            StageSpec::new("RDFT"),
            StageSpec::new("SpectralEnergy"),
            StageSpec::new("FilterBank").param("squared", "true"),
            StageSpec::new("Log"),
            StageSpec::new("DCT"),
            StageSpec::new("Selector").param("length", "16"),
        ],
    )
}

/// Per-frame energy over half-overlapping frames
pub fn energy_feature(length: usize) -> FeatureSpec {
    FeatureSpec::new(
        "Energy",
        vec![
            StageSpec::new("Window")
                .param("length", length.to_string())
                .param("step", (length / 2).to_string())
                .param("type", "rectangular"),
            StageSpec::new("Energy"),
        ],
    )
}

pub fn centroid_feature() -> FeatureSpec {
    FeatureSpec::new(
        "Centroid",
        vec![
            StageSpec::new("Window").param("length", "256").param("step", "256"),
            StageSpec::new("RDFT"),
            StageSpec::new("ComplexMagnitude"),
            StageSpec::new("Centroid"),
        ],
    )
}

/// Deterministic pseudo-random i16 samples (LCG)
pub fn noise_i16(len: usize, seed: u32) -> Vec<i16> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            ((state >> 16) as i16) / 4
        })
        .collect()
}
