//! Box-Cox and Yeo-Johnson power transforms.
//!
//! The transform parameter is chosen from a fixed grid by maximizing the
//! profile log-likelihood of normality. Ties keep the earliest grid value,
//! so the choice is reproducible.

use dq_model::{FittedTransform, PowerTransform};

use super::descriptive::variance_population;

/// Candidate lambdas: -3.0 to 3.0 in steps of 0.05.
pub fn lambda_grid() -> impl Iterator<Item = f64> {
    (-60..=60).map(|i| f64::from(i) / 20.0)
}

pub fn box_cox(x: f64, lambda: f64) -> f64 {
    if lambda == 0.0 {
        x.ln()
    } else {
        (x.powf(lambda) - 1.0) / lambda
    }
}

pub fn inverse_box_cox(y: f64, lambda: f64) -> f64 {
    if lambda == 0.0 {
        y.exp()
    } else {
        (y * lambda + 1.0).powf(1.0 / lambda)
    }
}

pub fn yeo_johnson(x: f64, lambda: f64) -> f64 {
    if x >= 0.0 {
        if lambda == 0.0 {
            x.ln_1p()
        } else {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        }
    } else if lambda == 2.0 {
        -(-x).ln_1p()
    } else {
        -((1.0 - x).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    }
}

pub fn inverse_yeo_johnson(y: f64, lambda: f64) -> f64 {
    if y >= 0.0 {
        if lambda == 0.0 {
            y.exp_m1()
        } else {
            (y * lambda + 1.0).powf(1.0 / lambda) - 1.0
        }
    } else if lambda == 2.0 {
        1.0 - (-y).exp()
    } else {
        1.0 - (-(2.0 - lambda) * y + 1.0).powf(1.0 / (2.0 - lambda))
    }
}

/// Applies a fitted transform to one value.
pub fn apply(transform: &FittedTransform, x: f64) -> f64 {
    match transform.family {
        PowerTransform::BoxCox => box_cox(x + transform.shift, transform.lambda),
        PowerTransform::YeoJohnson => yeo_johnson(x, transform.lambda),
    }
}

/// Maps a value on the transformed scale back to original units.
///
/// Returns `NaN` when the value lies outside the transform's image.
pub fn invert(transform: &FittedTransform, y: f64) -> f64 {
    match transform.family {
        PowerTransform::BoxCox => inverse_box_cox(y, transform.lambda) - transform.shift,
        PowerTransform::YeoJohnson => inverse_yeo_johnson(y, transform.lambda),
    }
}

/// Profile log-likelihood of Box-Cox on strictly positive data.
fn box_cox_llf(values: &[f64], lambda: f64) -> Option<f64> {
    let transformed: Vec<f64> = values.iter().map(|&x| box_cox(x, lambda)).collect();
    let var = variance_population(&transformed)?;
    if !(var > 0.0 && var.is_finite()) {
        return None;
    }
    let log_sum: f64 = values.iter().map(|x| x.ln()).sum();
    let n = values.len() as f64;
    Some((lambda - 1.0) * log_sum - n / 2.0 * var.ln())
}

fn yeo_johnson_llf(values: &[f64], lambda: f64) -> Option<f64> {
    let transformed: Vec<f64> = values.iter().map(|&x| yeo_johnson(x, lambda)).collect();
    let var = variance_population(&transformed)?;
    if !(var > 0.0 && var.is_finite()) {
        return None;
    }
    let log_sum: f64 = values.iter().map(|x| x.signum() * x.abs().ln_1p()).sum();
    let n = values.len() as f64;
    Some(-n / 2.0 * var.ln() + (lambda - 1.0) * log_sum)
}

/// Fits `family` to `values`, returning `None` when no candidate lambda
/// gives a finite likelihood (e.g. constant data).
pub fn fit(values: &[f64], family: PowerTransform) -> Option<FittedTransform> {
    let shift = match family {
        PowerTransform::BoxCox => {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            if min > 0.0 { 0.0 } else { 1.0 - min }
        }
        PowerTransform::YeoJohnson => 0.0,
    };
    let shifted: Vec<f64> = values.iter().map(|x| x + shift).collect();

    let mut best: Option<(f64, f64)> = None;
    for lambda in lambda_grid() {
        let llf = match family {
            PowerTransform::BoxCox => box_cox_llf(&shifted, lambda),
            PowerTransform::YeoJohnson => yeo_johnson_llf(&shifted, lambda),
        };
        let Some(llf) = llf.filter(|v| v.is_finite()) else {
            continue;
        };
        if best.is_none_or(|(_, best_llf)| llf > best_llf) {
            best = Some((lambda, llf));
        }
    }

    best.map(|(lambda, _)| FittedTransform {
        family,
        lambda,
        shift,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_cox_round_trip() {
        for lambda in [-1.5, 0.0, 0.5, 2.0] {
            let y = box_cox(3.7, lambda);
            assert!((inverse_box_cox(y, lambda) - 3.7).abs() < 1e-9);
        }
    }

    #[test]
    fn test_yeo_johnson_round_trip() {
        for lambda in [-1.0, 0.0, 0.7, 2.0, 2.5] {
            for x in [-4.2, -0.5, 0.0, 0.3, 8.0] {
                let y = yeo_johnson(x, lambda);
                assert!(
                    (inverse_yeo_johnson(y, lambda) - x).abs() < 1e-9,
                    "lambda {lambda}, x {x}"
                );
            }
        }
    }

    #[test]
    fn test_transforms_are_increasing() {
        for lambda in lambda_grid() {
            assert!(yeo_johnson(-1.0, lambda) < yeo_johnson(1.0, lambda));
            assert!(box_cox(0.5, lambda) < box_cox(2.0, lambda));
        }
    }

    #[test]
    fn test_grid_contains_exact_zero() {
        assert!(lambda_grid().any(|l| l == 0.0));
        assert_eq!(lambda_grid().count(), 121);
    }

    #[test]
    fn test_log_normal_data_picks_log() {
        let values: Vec<f64> = (1..=99)
            .map(|i| {
                super::super::distribution::normal_quantile(f64::from(i) / 100.0).exp()
            })
            .collect();
        let fitted = fit(&values, PowerTransform::BoxCox).unwrap();
        assert_eq!(fitted.shift, 0.0);
        assert!(fitted.lambda.abs() < 0.1, "lambda = {}", fitted.lambda);
    }

    #[test]
    fn test_box_cox_shifts_non_positive_data() {
        let fitted = fit(&[-2.0, 0.0, 1.0, 5.0, 9.0], PowerTransform::BoxCox).unwrap();
        assert_eq!(fitted.shift, 3.0);
        let x = apply(&fitted, -2.0);
        assert!((invert(&fitted, x) + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_data_has_no_transform() {
        assert_eq!(fit(&[4.0; 10], PowerTransform::YeoJohnson), None);
    }
}
