/// Evenly spaced sample grids
///
/// `linspace(start, end, n)` returns `n` values from `start` to `end` with both
/// endpoints included. The last value is pinned to `end` so accumulated
/// rounding never shifts the final sample.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

/// Pick roughly `count` evenly strided indices out of `len`, always keeping the last one.
///
/// Used by the terminal report to print a readable subset of a long curve.
pub fn decimated_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let step = (len / count.max(1)).max(1);
    let mut indices: Vec<usize> = (0..len).step_by(step).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}
