//! Small dense matrix helpers for the robust covariance estimate.

pub type Matrix = Vec<Vec<f64>>;

/// Column means of `rows`.
pub fn column_means(rows: &[&[f64]], dim: usize) -> Vec<f64> {
    let mut means = vec![0.0; dim];
    for row in rows {
        for (m, v) in means.iter_mut().zip(row.iter()) {
            *m += v;
        }
    }
    let n = rows.len().max(1) as f64;
    means.iter_mut().for_each(|m| *m /= n);
    means
}

/// Maximum-likelihood covariance (divides by `n`) around `location`.
pub fn covariance(rows: &[&[f64]], location: &[f64]) -> Matrix {
    let dim = location.len();
    let mut cov = vec![vec![0.0; dim]; dim];
    for row in rows {
        for i in 0..dim {
            let di = row[i] - location[i];
            for j in i..dim {
                cov[i][j] += di * (row[j] - location[j]);
            }
        }
    }
    let n = rows.len().max(1) as f64;
    for i in 0..dim {
        for j in i..dim {
            cov[i][j] /= n;
            cov[j][i] = cov[i][j];
        }
    }
    cov
}

/// Gauss-Jordan inverse with partial pivoting; `None` when singular.
pub fn invert(matrix: &Matrix) -> Option<Matrix> {
    let n = matrix.len();
    let scale = matrix
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let tolerance = scale * 1e-12;

    let mut a = matrix.clone();
    let mut inv: Matrix = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot][col].abs() <= tolerance {
            return None;
        }
        a.swap(col, pivot);
        inv.swap(col, pivot);

        let p = a[col][col];
        for j in 0..n {
            a[col][j] /= p;
            inv[col][j] /= p;
        }
        let pivot_row = a[col].clone();
        let pivot_inv = inv[col].clone();
        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[r][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[r][j] -= factor * pivot_row[j];
                inv[r][j] -= factor * pivot_inv[j];
            }
        }
    }
    Some(inv)
}

/// Inverts `matrix`, adding a growing ridge to the diagonal when it is
/// singular. Returns the (possibly regularized) matrix with its inverse.
pub fn invert_regularized(matrix: &Matrix) -> Option<(Matrix, Matrix)> {
    if let Some(inv) = invert(matrix) {
        return Some((matrix.clone(), inv));
    }
    let n = matrix.len();
    let mean_diag = (0..n).map(|i| matrix[i][i]).sum::<f64>() / n.max(1) as f64;
    let mut ridge = 1e-9 * mean_diag.abs().max(1.0);
    for _ in 0..12 {
        let mut regularized = matrix.clone();
        for (i, row) in regularized.iter_mut().enumerate() {
            row[i] += ridge;
        }
        if let Some(inv) = invert(&regularized) {
            tracing::debug!(ridge, "covariance regularized before inversion");
            return Some((regularized, inv));
        }
        ridge *= 10.0;
    }
    None
}

/// Squared Mahalanobis distance of `x` from `location`.
pub fn mahalanobis_squared(x: &[f64], location: &[f64], precision: &Matrix) -> f64 {
    let diff: Vec<f64> = x.iter().zip(location).map(|(a, b)| a - b).collect();
    let mut total = 0.0;
    for (i, di) in diff.iter().enumerate() {
        let row: f64 = precision[i].iter().zip(&diff).map(|(p, dj)| p * dj).sum();
        total += di * row;
    }
    total.max(0.0)
}
