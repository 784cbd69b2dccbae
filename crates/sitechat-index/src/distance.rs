//! Distance kernels over `f32` slices of equal length.

use sitechat_core::Metric;

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn magnitude(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}

pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// `1 - cos(a, b)`. Similarity with a zero-magnitude vector is 0, so the
/// distance is 1.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let (na, nb) = (magnitude(a), magnitude(b));
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    (1.0 - dot(a, b) / (na * nb)).max(0.0)
}

pub fn distance(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        Metric::Cosine => cosine_distance(a, b),
        Metric::SquaredEuclidean => squared_euclidean(a, b),
    }
}

/// Unit-length copy of `v`; a zero vector stays zero.
pub fn normalized(v: &[f32]) -> Vec<f32> {
    let n = magnitude(v);
    if n == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / n).collect()
}
