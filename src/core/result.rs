//! Extraction result types

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;

/// Output of one feature: `frames x frame_len` values, frame-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureValues {
    frames: usize,
    frame_len: usize,
    values: Vec<f32>,
}

impl FeatureValues {
    pub(crate) fn new(values: Vec<f32>, frame_len: usize) -> Self {
        let frames = if frame_len == 0 { 0 } else { values.len() / frame_len };
        Self {
            frames,
            frame_len,
            values,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Values per frame, the last stage's output length
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        self.values.chunks_exact(self.frame_len.max(1)).nth(index)
    }

    pub fn iter_frames(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.frame_len.max(1))
    }

    /// No NaN or infinity anywhere
    pub fn all_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Feature name -> values for one `calculate` call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    features: BTreeMap<String, FeatureValues>,
}

impl ResultSet {
    pub(crate) fn insert(&mut self, name: String, values: FeatureValues) {
        self.features.insert(name, values);
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValues> {
        self.features.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValues)> {
        self.features.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_map(self) -> BTreeMap<String, FeatureValues> {
        self.features
    }
}

impl Index<&str> for ResultSet {
    type Output = FeatureValues;

    /// Panics when `name` is not a feature of the extractor
    fn index(&self, name: &str) -> &FeatureValues {
        match self.features.get(name) {
            Some(values) => values,
            None => panic!("no feature named \"{}\" in result set", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames() {
        let values = FeatureValues::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!(values.frames(), 2);
        assert_eq!(values.frame(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(values.frame(2), None);
        assert_eq!(values.iter_frames().count(), 2);
    }

    #[test]
    fn test_result_set_lookup() {
        let mut set = ResultSet::default();
        set.insert("MFCC".to_string(), FeatureValues::new(vec![0.5; 16], 16));
        assert!(set.contains("MFCC"));
        assert_eq!(set["MFCC"].len(), 16);
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["MFCC"]);

        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with("{\"MFCC\":{\"frames\":1,\"frame_len\":16"));
    }
}
