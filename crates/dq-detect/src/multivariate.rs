//! Cross-column detection: value associations and robust distance outliers.

use std::collections::HashMap;

use dq_model::{
    AssociationsOptions, Combination, FittedAssociations, FittedRobust, FittedState,
    OutliersOptions,
};

use crate::stats::{descriptive, distribution, linalg};

/// Iteration cap of the concentration steps.
const MAX_C_STEPS: usize = 50;

// === Associations ===

/// Counts the combinations of complete rows and marks which are valid.
pub fn fit_associations(options: &AssociationsOptions, rows: &[Vec<Option<String>>]) -> FittedState {
    let mut order: Vec<Vec<String>> = Vec::new();
    let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
    for row in rows {
        let Some(values) = complete(row) else {
            continue;
        };
        match counts.get_mut(&values) {
            Some(count) => *count += 1,
            None => {
                order.push(values.clone());
                counts.insert(values, 1);
            }
        }
    }

    let n_samples: usize = counts.values().sum();
    if n_samples == 0 {
        return FittedState::Trivial;
    }

    let combinations: Vec<Combination> = order
        .into_iter()
        .map(|values| {
            let count = counts.get(&values).copied().unwrap_or(0);
            let valid = match (options.min_count, options.min_freq) {
                (Some(min), _) => count > min,
                (None, Some(freq)) => count as f64 / n_samples as f64 > freq,
                (None, None) => true,
            };
            Combination {
                values,
                count,
                valid,
            }
        })
        .collect();

    tracing::debug!(
        n_samples,
        n_combinations = combinations.len(),
        n_invalid = combinations.iter().filter(|c| !c.valid).count(),
        "fitted associations"
    );
    FittedState::Associations(FittedAssociations {
        combinations,
        n_samples,
    })
}

/// Flags complete rows whose combination is unseen or invalid.
pub fn detect_associations(fitted: &FittedAssociations, rows: &[Vec<Option<String>>]) -> Vec<bool> {
    let valid: HashMap<&[String], bool> = fitted
        .combinations
        .iter()
        .map(|c| (c.values.as_slice(), c.valid))
        .collect();
    rows.iter()
        .map(|row| match complete(row) {
            Some(values) => !valid.get(values.as_slice()).copied().unwrap_or(false),
            None => false,
        })
        .collect()
}

fn complete(row: &[Option<String>]) -> Option<Vec<String>> {
    row.iter().cloned().collect()
}

// === Robust outliers ===

/// Robust location and scatter of the complete rows.
///
/// Starts from the `h` rows nearest the coordinate-wise median and applies
/// concentration steps until the support subset no longer changes. The
/// scatter is rescaled so the median squared distance matches the
/// chi-squared median.
pub fn fit_robust(options: &OutliersOptions, rows: &[Option<Vec<f64>>], dim: usize) -> FittedState {
    let points: Vec<&[f64]> = rows.iter().flatten().map(Vec::as_slice).collect();
    let n = points.len();
    if dim == 0 || n <= dim {
        tracing::debug!(n, dim, "not enough complete rows for a robust estimate");
        return FittedState::Trivial;
    }

    let h = support_size(options.support_fraction, n, dim);
    let mut subset = initial_subset(&points, dim, h);
    let mut estimate = None;

    for step in 0..MAX_C_STEPS {
        let members: Vec<&[f64]> = subset.iter().map(|&i| points[i]).collect();
        let location = linalg::column_means(&members, dim);
        let covariance = linalg::covariance(&members, &location);
        let Some((covariance, precision)) = linalg::invert_regularized(&covariance) else {
            tracing::warn!(n, dim, "scatter matrix cannot be inverted, nothing can be detected");
            return FittedState::Trivial;
        };
        let next = nearest(&points, h, |x| linalg::mahalanobis_squared(x, &location, &precision));
        estimate = Some((location, covariance, precision));
        if next == subset {
            tracing::debug!(steps = step + 1, "concentration converged");
            break;
        }
        subset = next;
    }

    let Some((location, mut covariance, mut precision)) = estimate else {
        return FittedState::Trivial;
    };

    let squared: Vec<f64> = points
        .iter()
        .map(|x| linalg::mahalanobis_squared(x, &location, &precision))
        .collect();
    if let Some(median) = descriptive::median(&squared) {
        let factor = median / distribution::chi2_quantile(0.5, dim);
        if factor.is_finite() && factor > 0.0 {
            covariance.iter_mut().flatten().for_each(|v| *v *= factor);
            precision.iter_mut().flatten().for_each(|v| *v /= factor);
        }
    }

    let threshold = options
        .threshold
        .unwrap_or_else(|| distribution::chi2_quantile(options.quantile, dim).sqrt());

    tracing::debug!(n, dim, support = h, threshold, "fitted robust outliers");
    FittedState::Robust(FittedRobust {
        location,
        covariance,
        precision,
        threshold,
        support: h,
    })
}

/// Robust distance of every complete row and whether it exceeds the threshold.
pub fn detect_robust(fitted: &FittedRobust, rows: &[Option<Vec<f64>>]) -> (Vec<bool>, Vec<Option<f64>>) {
    rows.iter()
        .map(|row| match row {
            Some(x) => {
                let d = linalg::mahalanobis_squared(x, &fitted.location, &fitted.precision).sqrt();
                (d > fitted.threshold, Some(d))
            }
            None => (false, None),
        })
        .unzip()
}

fn support_size(fraction: Option<f64>, n: usize, dim: usize) -> usize {
    let h = match fraction {
        Some(f) => (f * n as f64).ceil() as usize,
        None => (n + dim + 1) / 2,
    };
    h.clamp(dim + 1, n)
}

/// The `h` points closest to the coordinate-wise median, scaled by MAD.
fn initial_subset(points: &[&[f64]], dim: usize, h: usize) -> Vec<usize> {
    let (centers, scales): (Vec<f64>, Vec<f64>) = (0..dim)
        .map(|j| {
            let column: Vec<f64> = points.iter().map(|x| x[j]).collect();
            let center = descriptive::median(&column).unwrap_or(0.0);
            let scale = descriptive::mad(&column)
                .filter(|s| *s > 0.0)
                .or_else(|| descriptive::std(&column).filter(|s| *s > 0.0))
                .unwrap_or(1.0);
            (center, scale)
        })
        .unzip();
    nearest(points, h, |x| {
        x.iter()
            .zip(centers.iter().zip(&scales))
            .map(|(v, (c, s))| ((v - c) / s).powi(2))
            .sum()
    })
}

/// Sorted indices of the `h` points with the smallest `distance`; ties keep
/// the lower index.
fn nearest(points: &[&[f64]], h: usize, distance: impl Fn(&[f64]) -> f64) -> Vec<usize> {
    let mut ranked: Vec<(f64, usize)> = points
        .iter()
        .enumerate()
        .map(|(idx, x)| (distance(x), idx))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let mut subset: Vec<usize> = ranked.into_iter().take(h).map(|(_, idx)| idx).collect();
    subset.sort_unstable();
    subset
}
