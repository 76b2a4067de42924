// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::config::{parse_description, ExtractorConfig};
use crate::core::{Extractor, StageRegistry};
use crate::testgen::Signal;

pub use args::{Args, OutputFormat};
pub use output::{format_json, format_results, format_stage_list};

const DEFAULT_SOURCE_RATE: u32 = 48000;
const DEFAULT_TARGET_RATE: u32 = 16000;

/// Used when no description file is given
pub const DEFAULT_FEATURES: &str = "MFCC[Window(length=512), RDFT, SpectralEnergy, \
FilterBank(squared=true), Log, DCT, Selector(length=16)]";

/// Build the extractor configuration from a description file and overrides
pub fn load_config(args: &Args) -> Result<ExtractorConfig> {
    let mut config = match &args.features {
        Some(path) if is_json(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ExtractorConfig::from_json(&text)
                .with_context(|| format!("Invalid extractor config {}", path.display()))?
        }
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let features = parse_description(&text)
                .with_context(|| format!("Invalid feature description {}", path.display()))?;
            ExtractorConfig::new(features, DEFAULT_SOURCE_RATE, DEFAULT_TARGET_RATE)
        }
        None => ExtractorConfig::new(
            parse_description(DEFAULT_FEATURES)?,
            DEFAULT_SOURCE_RATE,
            DEFAULT_TARGET_RATE,
        ),
    };

    if let Some(rate) = args.source_rate {
        config.source_rate = rate;
    }
    if let Some(rate) = args.target_rate {
        config.target_rate = rate;
    }
    if let Some(quality) = args.resampler {
        config.resampler = quality;
    }
    if args.sequential {
        config.parallel = false;
    }
    Ok(config)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

/// Run the CLI, returning what should be printed
pub fn run(args: &Args) -> Result<String> {
    if args.list_stages {
        return Ok(format_stage_list(StageRegistry::global()));
    }

    let config = load_config(args)?;
    let extractor = Extractor::from_config(&config).context("Failed to build extractor")?;

    let signal: Signal = args.signal.parse()?;
    let samples = signal.generate(args.samples, config.source_rate);
    info!(
        "Generated {} samples of {:?} at {}Hz",
        samples.len(),
        signal,
        config.source_rate
    );

    let results = extractor
        .calculate(samples)
        .context("Feature calculation failed")?;

    match args.format {
        OutputFormat::Text => Ok(format_results(&results, args.verbose)),
        OutputFormat::Json => Ok(format_json(&results)?),
    }
}
