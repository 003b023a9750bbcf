//! D'Agostino-Pearson omnibus normality test.
//!
//! Combines a skewness test and a kurtosis test into
//! `K² = Z_skew² + Z_kurt²`, which follows a chi-squared distribution with
//! two degrees of freedom under normality.

use super::descriptive::{kurtosis, skewness};
use super::distribution::chi2_sf;

/// Smallest sample the test runs on; smaller samples count as not normal.
pub const MIN_SAMPLES: usize = 9;

/// Outcome of the omnibus test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalTest {
    pub statistic: f64,
    pub pvalue: f64,
}

/// Runs the test; `None` when the sample is too small or has zero variance.
pub fn normaltest(values: &[f64]) -> Option<NormalTest> {
    if values.len() < MIN_SAMPLES {
        return None;
    }
    let zs = skew_z(values)?;
    let zk = kurtosis_z(values)?;
    let statistic = zs * zs + zk * zk;
    if !statistic.is_finite() {
        return None;
    }
    Some(NormalTest {
        statistic,
        pvalue: chi2_sf(statistic, 2),
    })
}

fn skew_z(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let b2 = skewness(values)?;
    let mut y = b2 * (((n + 1.0) * (n + 3.0)) / (6.0 * (n - 2.0))).sqrt();
    let beta2 = 3.0 * (n * n + 27.0 * n - 70.0) * (n + 1.0) * (n + 3.0)
        / ((n - 2.0) * (n + 5.0) * (n + 7.0) * (n + 9.0));
    let w2 = -1.0 + (2.0 * (beta2 - 1.0)).sqrt();
    let delta = 1.0 / (0.5 * w2.ln()).sqrt();
    let alpha = (2.0 / (w2 - 1.0)).sqrt();
    if y == 0.0 {
        y = 1.0;
    }
    let ya = y / alpha;
    Some(delta * (ya + (ya * ya + 1.0).sqrt()).ln())
}

fn kurtosis_z(values: &[f64]) -> Option<f64> {
    let n = values.len() as f64;
    let b2 = kurtosis(values)?;
    let e = 3.0 * (n - 1.0) / (n + 1.0);
    let var_b2 =
        24.0 * n * (n - 2.0) * (n - 3.0) / ((n + 1.0) * (n + 1.0) * (n + 3.0) * (n + 5.0));
    let x = (b2 - e) / var_b2.sqrt();
    let sqrt_beta1 = 6.0 * (n * n - 5.0 * n + 2.0) / ((n + 7.0) * (n + 9.0))
        * (6.0 * (n + 3.0) * (n + 5.0) / (n * (n - 2.0) * (n - 3.0))).sqrt();
    let a = 6.0
        + 8.0 / sqrt_beta1 * (2.0 / sqrt_beta1 + (1.0 + 4.0 / (sqrt_beta1 * sqrt_beta1)).sqrt());
    let term1 = 1.0 - 2.0 / (9.0 * a);
    let denom = 1.0 + x * (2.0 / (a - 4.0)).sqrt();
    if denom == 0.0 {
        return None;
    }
    let term2 = denom.signum() * ((1.0 - 2.0 / a) / denom.abs()).cbrt();
    Some((term1 - term2) / (2.0 / (9.0 * a)).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_sample_is_untestable() {
        assert_eq!(normaltest(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]), None);
    }

    #[test]
    fn test_constant_sample_is_untestable() {
        assert_eq!(normaltest(&[2.0; 20]), None);
    }

    #[test]
    fn test_symmetric_bell_is_not_rejected() {
        // Evenly spaced normal quantiles: skewness 0, kurtosis close to 3.
        let values: Vec<f64> = (1..=99)
            .map(|i| super::super::distribution::normal_quantile(f64::from(i) / 100.0))
            .collect();
        let test = normaltest(&values).unwrap();
        assert!(test.pvalue > 0.05, "pvalue = {}", test.pvalue);
    }

    #[test]
    fn test_heavily_skewed_sample_is_rejected() {
        let values: Vec<f64> = (0..200).map(|i| (f64::from(i) / 20.0).exp()).collect();
        let test = normaltest(&values).unwrap();
        assert!(test.pvalue < 1e-3, "pvalue = {}", test.pvalue);
    }
}
