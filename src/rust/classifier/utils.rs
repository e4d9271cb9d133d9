use std::cmp::Ordering;

use ndarray::Array1;

/// L2-normalizes `vec`. A zero vector is returned unchanged.
pub(crate) fn normalize_vector(vec: &Array1<f64>) -> Array1<f64> {
    let norm: f64 = vec.iter().map(|&x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        vec / norm
    } else {
        vec.clone()
    }
}

/// Softmax with max-subtraction for numerical stability.
pub(crate) fn softmax(logits: &Array1<f64>) -> Array1<f64> {
    let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp = logits.mapv(|z| (z - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Class indices ordered by `(-probability, class_index)`.
pub(crate) fn rank_indices(probabilities: &Array1<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}
