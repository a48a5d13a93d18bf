use ndarray::Array1;

/// Absolute distance of every level's toxicity probability from the target rate
pub fn distances(probabilities: &Array1<f64>, target: f64) -> Array1<f64> {
    probabilities.mapv(|p| (target - p).abs())
}

/// Index (0-based) of the smallest distance
///
/// Levels are scanned from lowest to highest and a level only replaces the current best when
/// it is strictly closer, so ties resolve to the lowest level. A `NaN` distance never wins.
/// Returns `None` for an empty grid.
pub fn closest_level(distances: &Array1<f64>) -> Option<usize> {
    let mut iter = distances.iter().enumerate();
    let (mut best, mut small) = match iter.next() {
        Some((i, &d)) => (i, d),
        None => return None,
    };
    for (j, &d) in iter {
        if small > d {
            small = d;
            best = j;
        }
    }
    Some(best)
}
