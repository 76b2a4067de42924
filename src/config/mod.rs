//! Feature descriptions and extractor configuration
//!
//! Features can be described in JSON (`ExtractorConfig::from_json`) or in the
//! one-line-per-feature text form handled by [`parse_description`].

mod description;
mod parser;

pub use description::{ExtractorConfig, FeatureSpec, StageSpec};
pub use parser::{parse_description, parse_feature};
