//! Quantile and tail functions of the normal and chi-squared distributions.
//!
//! Thin wrappers over `statrs`; an invalid parameter gives `NaN`.

use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Inverse CDF of the standard normal.
pub fn normal_quantile(p: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Inverse CDF of the chi-squared distribution with `dof` degrees of freedom.
pub fn chi2_quantile(p: f64, dof: usize) -> f64 {
    if dof == 0 {
        return 0.0;
    }
    match ChiSquared::new(dof as f64) {
        Ok(chi2) => chi2.inverse_cdf(p),
        Err(_) => f64::NAN,
    }
}

/// Upper tail probability of a chi-squared variable.
pub fn chi2_sf(x: f64, dof: usize) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    match ChiSquared::new(dof as f64) {
        Ok(chi2) => chi2.sf(x),
        Err(_) => f64::NAN,
    }
}
