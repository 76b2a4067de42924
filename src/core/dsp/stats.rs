//! Scalar summaries of a frame

/// Sum of squares, or its mean when `normalize` is set
pub fn energy(samples: &[f32], normalize: bool) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    if normalize {
        sum_sq / samples.len() as f32
    } else {
        sum_sq
    }
}

/// Index-weighted mean position, 0 for an all-zero frame
pub fn centroid(values: &[f32]) -> f32 {
    let (mut weighted, mut total) = (0.0f64, 0.0f64);
    for (i, &v) in values.iter().enumerate() {
        weighted += i as f64 * v as f64;
        total += v as f64;
    }
    if total != 0.0 {
        (weighted / total) as f32
    } else {
        0.0
    }
}

/// Positive part of the first difference; `output` is one shorter than `samples`
pub fn rectified_diff(samples: &[f32], output: &mut [f32]) {
    for (out, pair) in output.iter_mut().zip(samples.windows(2)) {
        *out = (pair[1] - pair[0]).max(0.0);
    }
}
