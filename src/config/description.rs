// src/config/description.rs
//
// Serialisable descriptions of features and extractors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::dsp::ResamplerQuality;
use crate::error::{Error, Result};

/// One stage of a feature: registry name plus string parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, String>,
}

impl StageSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameters<K, V>(name: impl Into<String>, parameters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add one parameter while constructing
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}

/// A named output and the ordered stages computing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSpec {
    name: String,
    stages: Vec<StageSpec>,
}

impl FeatureSpec {
    pub fn new(name: impl Into<String>, stages: Vec<StageSpec>) -> Self {
        Self {
            name: name.into(),
            stages,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }
}

fn default_parallel() -> bool {
    true
}

/// Everything needed to build an `Extractor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Rate of the buffers passed to `calculate`
    pub source_rate: u32,
    /// Rate the features are computed at
    pub target_rate: u32,
    #[serde(default)]
    pub resampler: ResamplerQuality,
    /// Run the features of one call on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    pub features: Vec<FeatureSpec>,
}

impl ExtractorConfig {
    pub fn new(features: Vec<FeatureSpec>, source_rate: u32, target_rate: u32) -> Self {
        Self {
            source_rate,
            target_rate,
            resampler: ResamplerQuality::default(),
            parallel: default_parallel(),
            features,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Description {
            line: e.line(),
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Description {
            line: 0,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let json = r#"{
            "source_rate": 48000,
            "target_rate": 16000,
            "features": [
                {"name": "MFCC", "stages": [
                    {"name": "Window", "parameters": {"length": "512"}},
                    {"name": "RDFT"}
                ]}
            ]
        }"#;
        let config = ExtractorConfig::from_json(json).unwrap();
        assert_eq!(config.resampler, ResamplerQuality::Sinc);
        assert!(config.parallel);
        let feature = &config.features[0];
        assert_eq!(feature.name(), "MFCC");
        assert_eq!(feature.stages()[0].parameters()["length"], "512");
        assert!(feature.stages()[1].parameters().is_empty());

        let again = ExtractorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(again, config);
    }

    #[test]
    fn test_json_error_has_line() {
        let err = ExtractorConfig::from_json("{\n\"source_rate\": \"fast\"\n}").unwrap_err();
        assert!(matches!(err, Error::Description { line: 2, .. }));
    }

    #[test]
    fn test_stage_builders_agree() {
        let a = StageSpec::new("Selector").param("length", "16").param("from", "left");
        let b = StageSpec::with_parameters("Selector", [("from", "left"), ("length", "16")]);
        assert_eq!(a, b);
    }
}
