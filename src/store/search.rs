//! Exact similarity search

use crate::types::{VectorMatch, VectorRecord};

/// Cosine similarity, `0.0` when either vector has zero magnitude or a
/// non-finite component.
///
/// Lengths are not checked: the dot product runs over the shared prefix
/// while each magnitude uses the full vector. Each vector is divided by its
/// largest absolute component first so that squares cannot overflow.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (Some(scale_a), Some(scale_b)) = (max_abs(a), max_abs(b)) else {
        return 0.0;
    };

    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x / scale_a) * (y / scale_b))
        .sum();
    let norm_a = a.iter().map(|x| (x / scale_a).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (x / scale_b).powi(2)).sum::<f64>().sqrt();

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Largest absolute component, `None` for zero or non-finite vectors
fn max_abs(v: &[f64]) -> Option<f64> {
    let max = v.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    let finite = v.iter().all(|x| x.is_finite());
    (finite && max > 0.0).then_some(max)
}

/// Sort key that puts NaN below every real score
fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

/// Score every record against `query` and keep the best `top_k`, highest
/// score first. Equal scores keep iteration order.
pub(crate) fn rank<'a>(
    records: impl IntoIterator<Item = &'a VectorRecord>,
    query: &[f64],
    top_k: usize,
) -> Vec<VectorMatch> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(&VectorRecord, f64)> = records
        .into_iter()
        .map(|record| (record, cosine_similarity(query, &record.vector)))
        .collect();

    scored.sort_by(|a, b| sort_key(b.1).total_cmp(&sort_key(a.1)));
    scored.truncate(top_k);

    scored
        .into_iter()
        .map(|(record, score)| VectorMatch::from_record(record, score))
        .collect()
}
