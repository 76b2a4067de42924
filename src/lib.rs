//! sfextract - audio feature extraction from named stage chains
//!
//! Each feature is an ordered chain of named, string-parameterised stages
//! (`Window`, `RDFT`, `FilterBank`, `DCT`, ...). An [`Extractor`] owns a set of
//! features plus a source and target sample rate: every `calculate` call
//! converts the buffer once and runs all feature pipelines over the same
//! signal.
//!
//! ## Module Structure
//!
//! - `core` - stages, registry, pipelines, the extractor and DSP kernels
//! - `config` - feature descriptions (JSON and text) and extractor config
//! - `cli` - command-line interface
//! - `testgen` - synthetic test signals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfextract::{parse_description, Extractor};
//!
//! let features = parse_description(
//!     "MFCC[Window(length=512), RDFT, SpectralEnergy, FilterBank(squared=true), Log, DCT, Selector(length=16)]",
//! )?;
//! let extractor = Extractor::new(features, 48000, 16000)?;
//! let results = extractor.calculate(vec![1000i16; 48000])?;
//!
//! println!("{:?}", results["MFCC"].values());
//! ```
//!
//! ## Framing
//!
//! The raw signal enters a pipeline as one frame. `Window(length=N)` keeps the
//! first N samples; `Window(length=N, step=S)` emits sliding frames.
//! `FrequencyBands` turns each frame into one frame per band. Every other
//! stage maps one frame to one frame, so a result holds
//! `frames x frame_len` values.

// Feature extraction engine
pub mod core;

// Command-line interface
pub mod cli;

// Feature descriptions and configuration
pub mod config;

pub mod error;

// Synthetic signals
pub mod testgen;

pub use config::{parse_description, ExtractorConfig, FeatureSpec, StageSpec};
pub use core::{
    AudioBuffer, Extractor, ExtractorBuilder, FeaturePipeline, FeatureValues, ResultSet, Stage,
    StageContext, StageParams, StageRegistry,
};
pub use error::{Error, Result, StageError};
