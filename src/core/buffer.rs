// src/core/buffer.rs
//
// Mono input samples in one of the supported numeric formats.

/// Single-channel input buffer handed to `Extractor::calculate` by value.
///
/// Integer samples are converted to `f32` as-is (no scaling to -1..1).
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBuffer {
    I16(Vec<i16>),
    I32(Vec<i32>),
    F32(Vec<f32>),
}

impl AudioBuffer {
    pub fn len(&self) -> usize {
        match self {
            AudioBuffer::I16(s) => s.len(),
            AudioBuffer::I32(s) => s.len(),
            AudioBuffer::F32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to the engine's working format
    pub fn into_f32(self) -> Vec<f32> {
        match self {
            AudioBuffer::I16(s) => s.into_iter().map(f32::from).collect(),
            AudioBuffer::I32(s) => s.into_iter().map(|v| v as f32).collect(),
            AudioBuffer::F32(s) => s,
        }
    }
}

impl From<Vec<i16>> for AudioBuffer {
    fn from(samples: Vec<i16>) -> Self {
        AudioBuffer::I16(samples)
    }
}

impl From<Vec<i32>> for AudioBuffer {
    fn from(samples: Vec<i32>) -> Self {
        AudioBuffer::I32(samples)
    }
}

impl From<Vec<f32>> for AudioBuffer {
    fn from(samples: Vec<f32>) -> Self {
        AudioBuffer::F32(samples)
    }
}

impl From<&[i16]> for AudioBuffer {
    fn from(samples: &[i16]) -> Self {
        AudioBuffer::I16(samples.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_magnitude() {
        let buffer = AudioBuffer::from(vec![1000i16, -32768, 0]);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.into_f32(), vec![1000.0, -32768.0, 0.0]);

        let buffer = AudioBuffer::from(vec![70000i32]);
        assert_eq!(buffer.into_f32(), vec![70000.0]);
    }

    #[test]
    fn test_empty() {
        assert!(AudioBuffer::from(Vec::<f32>::new()).is_empty());
    }
}
