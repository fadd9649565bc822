//! Small statistical primitives used by the rental analyzer.

use std::collections::BTreeMap;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Pearson correlation coefficient. `None` for fewer than two pairs, mismatched
/// lengths, or a constant series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mean_x = mean(xs)?;
    let mean_y = mean(ys)?;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

/// Trailing moving average; the first `window - 1` positions have no value.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut result = Vec::with_capacity(values.len());
    let mut running = 0.0;
    for (i, value) in values.iter().enumerate() {
        running += value;
        if i >= window {
            running -= values[i - window];
        }
        if i + 1 >= window {
            result.push(Some(running / window as f64));
        } else {
            result.push(None);
        }
    }
    result
}

/// Means of the first and second halves; an odd middle element goes to the second half.
pub fn half_means(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let mid = values.len() / 2;
    Some((mean(&values[..mid])?, mean(&values[mid..])?))
}

/// Sum and count of `value` per key, in key order.
pub fn group_totals<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, (u64, usize)>
where
    K: Ord,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> u64,
{
    let mut groups: BTreeMap<K, (u64, usize)> = BTreeMap::new();
    for item in items {
        let entry = groups.entry(key(item)).or_insert((0, 0));
        entry.0 += value(item);
        entry.1 += 1;
    }
    groups
}

/// Index of the first maximum, matching the usual `idxmax` tie-breaking.
pub fn first_max_by<T, F>(items: &[T], score: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, item) in items.iter().enumerate() {
        let s = score(item);
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Index of the first minimum.
pub fn first_min_by<T, F>(items: &[T], score: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    first_max_by(items, |item| -score(item))
}
