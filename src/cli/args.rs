//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::core::dsp::ResamplerQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sfextract")]
#[command(about = "Compute named audio features through configurable stage pipelines")]
pub struct Args {
    /// Feature description: a .json extractor config or a text file with one
    /// NAME[Stage(k=v), ...] line per feature. Defaults to a 16-coefficient MFCC.
    pub features: Option<PathBuf>,

    /// Sample rate of the input signal (overrides the config)
    #[arg(short, long)]
    pub source_rate: Option<u32>,

    /// Rate the features are computed at (overrides the config)
    #[arg(short, long)]
    pub target_rate: Option<u32>,

    /// Input signal: constant:VALUE, sine:HZ:AMPL or sweep:FROM:TO:AMPL
    #[arg(long, default_value = "constant:1000")]
    pub signal: String,

    /// Number of input samples to generate
    #[arg(short = 'n', long, default_value = "48000")]
    pub samples: usize,

    /// Rate converter (fast or sinc)
    #[arg(long)]
    pub resampler: Option<ResamplerQuality>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Run features one after another instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// List the registered stages and exit
    #[arg(long)]
    pub list_stages: bool,

    /// Debug logging and every frame in text output
    #[arg(short, long)]
    pub verbose: bool,
}
