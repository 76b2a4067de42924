//! Feature extraction engine

pub mod buffer;
pub mod dsp;
pub mod extractor;
pub mod pipeline;
pub mod registry;
pub mod result;
pub mod stage;
pub mod stages;

pub use buffer::AudioBuffer;
pub use extractor::{Extractor, ExtractorBuilder};
pub use pipeline::FeaturePipeline;
pub use registry::{StageFactory, StageRegistry};
pub use result::{FeatureValues, ResultSet};
pub use stage::{Stage, StageContext, StageParams};
