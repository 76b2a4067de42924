// src/core/extractor.rs
//
// A fixed set of feature pipelines sharing one input signal.
//
// Construction validates everything up front; afterwards the extractor is
// immutable and `calculate` may be called from any number of threads.

use std::collections::HashSet;

use log::{debug, info};
use rayon::prelude::*;

use super::buffer::AudioBuffer;
use super::dsp::{resample, ResamplerQuality};
use super::pipeline::FeaturePipeline;
use super::registry::StageRegistry;
use super::result::ResultSet;
use crate::config::{ExtractorConfig, FeatureSpec};
use crate::error::{Error, Result};

/// Builder for `Extractor`
pub struct ExtractorBuilder<'r> {
    source_rate: u32,
    target_rate: u32,
    resampler: ResamplerQuality,
    parallel: bool,
    registry: Option<&'r StageRegistry>,
    features: Vec<FeatureSpec>,
}

impl<'r> ExtractorBuilder<'r> {
    pub fn new(source_rate: u32, target_rate: u32) -> Self {
        Self {
            source_rate,
            target_rate,
            resampler: ResamplerQuality::default(),
            parallel: true,
            registry: None,
            features: Vec::new(),
        }
    }

    /// Resolve stages through `registry` instead of the global one
    pub fn registry(mut self, registry: &'r StageRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn resampler(mut self, quality: ResamplerQuality) -> Self {
        self.resampler = quality;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn feature(mut self, feature: FeatureSpec) -> Self {
        self.features.push(feature);
        self
    }

    pub fn features(mut self, features: impl IntoIterator<Item = FeatureSpec>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn build(self) -> Result<Extractor> {
        if self.source_rate == 0 {
            return Err(Error::InvalidSampleRate {
                which: "source",
                rate: self.source_rate,
            });
        }
        if self.target_rate == 0 {
            return Err(Error::InvalidSampleRate {
                which: "target",
                rate: self.target_rate,
            });
        }

        let mut seen = HashSet::new();
        for feature in &self.features {
            if !seen.insert(feature.name()) {
                return Err(Error::DuplicateFeatureName(feature.name().to_string()));
            }
        }

        let registry = self.registry.unwrap_or_else(|| StageRegistry::global());
        let pipelines = self
            .features
            .iter()
            .map(|f| FeaturePipeline::build(f, registry, self.target_rate))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Extractor ready: {} feature(s), {}Hz -> {}Hz",
            pipelines.len(),
            self.source_rate,
            self.target_rate
        );

        Ok(Extractor {
            source_rate: self.source_rate,
            target_rate: self.target_rate,
            resampler: self.resampler,
            parallel: self.parallel,
            pipelines,
        })
    }
}

/// Computes a fixed set of features from mono buffers
#[derive(Debug)]
pub struct Extractor {
    source_rate: u32,
    target_rate: u32,
    resampler: ResamplerQuality,
    parallel: bool,
    pipelines: Vec<FeaturePipeline>,
}

impl Extractor {
    /// Build with the global registry and default options
    pub fn new(features: Vec<FeatureSpec>, source_rate: u32, target_rate: u32) -> Result<Self> {
        Self::builder(source_rate, target_rate).features(features).build()
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        Self::builder(config.source_rate, config.target_rate)
            .resampler(config.resampler)
            .parallel(config.parallel)
            .features(config.features.iter().cloned())
            .build()
    }

    pub fn builder<'r>(source_rate: u32, target_rate: u32) -> ExtractorBuilder<'r> {
        ExtractorBuilder::new(source_rate, target_rate)
    }

    pub fn source_rate(&self) -> u32 {
        self.source_rate
    }

    pub fn target_rate(&self) -> u32 {
        self.target_rate
    }

    /// Feature names in declaration order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.pipelines.iter().map(|p| p.name())
    }

    pub fn pipeline(&self, name: &str) -> Option<&FeaturePipeline> {
        self.pipelines.iter().find(|p| p.name() == name)
    }

    /// Compute every feature over `buffer`.
    ///
    /// The buffer is converted to `f32` and resampled once; every pipeline
    /// then reads the same signal. A failing feature fails the whole call,
    /// and when several fail the first in declaration order is reported.
    pub fn calculate(&self, buffer: impl Into<AudioBuffer>) -> Result<ResultSet> {
        let buffer = buffer.into();
        if buffer.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        let samples = buffer.into_f32();
        let signal = if self.source_rate == self.target_rate {
            samples
        } else {
            resample(&samples, self.source_rate, self.target_rate, self.resampler).map_err(
                |reason| Error::Resample {
                    source_rate: self.source_rate,
                    target_rate: self.target_rate,
                    reason,
                },
            )?
        };
        debug!("Calculating {} feature(s) over {} samples", self.pipelines.len(), signal.len());

        let outputs: Vec<_> = if self.parallel && self.pipelines.len() > 1 {
            self.pipelines.par_iter().map(|p| p.run(&signal)).collect()
        } else {
            self.pipelines.iter().map(|p| p.run(&signal)).collect()
        };

        let mut results = ResultSet::default();
        for (pipeline, output) in self.pipelines.iter().zip(outputs) {
            results.insert(pipeline.name().to_string(), output?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageSpec;

    fn mfcc() -> FeatureSpec {
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

    fn energy() -> FeatureSpec {
        FeatureSpec::new(
            "Energy",
            vec![
                StageSpec::new("Window").param("length", "256").param("step", "128"),
                StageSpec::new("Energy"),
            ],
        )
    }

    #[test]
    fn test_mfcc_from_48k() {
        let extractor = Extractor::new(vec![mfcc()], 48000, 16000).unwrap();
        let results = extractor.calculate(vec![1000i16; 48000]).unwrap();
        assert_eq!(results.len(), 1);
        let mfcc = &results["MFCC"];
        assert_eq!(mfcc.len(), 16);
        assert!(mfcc.all_finite());
    }

    #[test]
    fn test_equal_rates_skip_resampling() {
        let extractor = Extractor::new(vec![energy()], 16000, 16000).unwrap();
        let signal: Vec<f32> = (0..4000).map(|i| (i as f32 * 0.01).sin() * 100.0).collect();
        let direct = extractor.pipeline("Energy").unwrap().run(&signal).unwrap();
        let results = extractor.calculate(signal).unwrap();
        assert_eq!(results["Energy"], direct);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let signal: Vec<i16> = (0..24000).map(|i| ((i * 37) % 2001) as i16 - 1000).collect();
        let parallel = Extractor::new(vec![mfcc(), energy()], 48000, 16000).unwrap();
        let sequential = Extractor::builder(48000, 16000)
            .parallel(false)
            .features([mfcc(), energy()])
            .build()
            .unwrap();
        let a = parallel.calculate(signal.clone()).unwrap();
        let b = sequential.calculate(signal.clone()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, parallel.calculate(signal).unwrap());
    }

    #[test]
    fn test_concurrent_calls() {
        let extractor = Extractor::new(vec![mfcc(), energy()], 16000, 16000).unwrap();
        let signal: Vec<f32> = (0..8000).map(|i| (i % 50) as f32).collect();
        let expected = extractor.calculate(signal.clone()).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| extractor.calculate(signal.clone()).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_build_errors() {
        assert_eq!(
            Extractor::new(vec![mfcc(), mfcc()], 16000, 16000).unwrap_err(),
            Error::DuplicateFeatureName("MFCC".to_string())
        );
        assert!(matches!(
            Extractor::new(vec![mfcc()], 0, 16000).unwrap_err(),
            Error::InvalidSampleRate { which: "source", .. }
        ));
        assert!(matches!(
            Extractor::new(vec![mfcc()], 16000, 0).unwrap_err(),
            Error::InvalidSampleRate { which: "target", .. }
        ));
    }

    #[test]
    fn test_empty_buffer() {
        let extractor = Extractor::new(vec![energy()], 16000, 16000).unwrap();
        assert_eq!(extractor.calculate(Vec::<f32>::new()).unwrap_err(), Error::EmptyBuffer);
    }

    #[test]
    fn test_no_features_gives_empty_result() {
        let extractor = Extractor::new(Vec::new(), 16000, 16000).unwrap();
        assert!(extractor.calculate(vec![1.0f32; 10]).unwrap().is_empty());
    }

    #[test]
    fn test_local_registry_outlives_only_the_builder() {
        let registry = StageRegistry::with_builtins();
        let local = Extractor::builder(16000, 16000)
            .registry(&registry)
            .feature(energy())
            .build()
            .unwrap();
        drop(registry);
        let global = Extractor::new(vec![energy()], 16000, 16000).unwrap();
        let signal: Vec<f32> = (0..1000).map(|i| (i % 7) as f32).collect();
        assert_eq!(local.calculate(signal.clone()).unwrap(), global.calculate(signal).unwrap());
    }

    #[test]
    fn test_custom_registry() {
        let registry = StageRegistry::new();
        let err = Extractor::builder(16000, 16000)
            .registry(&registry)
            .feature(energy())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnknownStage { ref stage, .. } if stage == "Window"));
    }
}
