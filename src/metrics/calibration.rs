//! Calibration metrics: Brier score and the smoothed calibration curve

use crate::error::{BootvalError, Result};
use ndarray::Array1;

/// Smoothing fraction for the calibration curve (LOWESS convention,
/// 0 robustifying iterations).
pub const LOWESS_FRAC: f64 = 2.0 / 3.0;

/// Evenly spaced probability grid on [0, 1], inclusive of both endpoints.
pub fn probability_grid(n_points: usize) -> Result<Array1<f64>> {
    if n_points < 2 {
        return Err(BootvalError::InvalidInput(
            "probability grid needs at least 2 points".to_string(),
        ));
    }
    Ok(Array1::linspace(0.0, 1.0, n_points))
}

/// Brier score: mean squared error between probabilities and labels.
pub fn brier_score(labels: &Array1<f64>, probs: &Array1<f64>) -> Result<f64> {
    if labels.is_empty() {
        return Err(BootvalError::InvalidInput("empty label vector".to_string()));
    }
    if labels.len() != probs.len() {
        return Err(BootvalError::ShapeError {
            expected: format!("length = {}", labels.len()),
            actual: format!("length = {}", probs.len()),
        });
    }

    let n = labels.len() as f64;
    let score: f64 = labels
        .iter()
        .zip(probs.iter())
        .map(|(&y, &p)| (p - y).powi(2))
        .sum();

    Ok(score / n)
}

/// Smoothed calibration curve: locally weighted linear regression of
/// labels on predicted probabilities, evaluated at the grid points.
///
/// Tricube weights over the `LOWESS_FRAC` nearest neighbours of each
/// grid point, no robustifying iterations, so the output is fully
/// deterministic. Estimates are clamped to [0, 1] since they are
/// smoothed outcome frequencies.
pub fn calibration_curve(
    labels: &Array1<f64>,
    probs: &Array1<f64>,
    grid: &Array1<f64>,
) -> Result<Array1<f64>> {
    if labels.is_empty() {
        return Err(BootvalError::InvalidInput("empty label vector".to_string()));
    }
    if labels.len() != probs.len() {
        return Err(BootvalError::ShapeError {
            expected: format!("length = {}", labels.len()),
            actual: format!("length = {}", probs.len()),
        });
    }
    if grid.is_empty() {
        return Err(BootvalError::InvalidInput(
            "empty evaluation grid".to_string(),
        ));
    }

    let n = probs.len();
    let k = ((LOWESS_FRAC * n as f64).ceil() as usize).clamp(2.min(n), n);

    let curve: Vec<f64> = grid
        .iter()
        .map(|&x0| lowess_at(probs, labels, x0, k))
        .collect();

    Ok(Array1::from_vec(curve))
}

/// Local weighted linear estimate at a single evaluation point.
fn lowess_at(x: &Array1<f64>, y: &Array1<f64>, x0: f64, k: usize) -> f64 {
    let mut distances: Vec<f64> = x.iter().map(|&xi| (xi - x0).abs()).collect();
    let (_, dmax, _) = distances.select_nth_unstable_by(k - 1, |a, b| {
        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
    });
    let dmax = *dmax;

    // Weighted sums for the local linear fit
    let mut sw = 0.0;
    let mut swx = 0.0;
    let mut swy = 0.0;
    let mut swxx = 0.0;
    let mut swxy = 0.0;

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let d = (xi - x0).abs();
        if d > dmax {
            continue;
        }
        let w = if dmax > 0.0 {
            let u = d / dmax;
            let t = 1.0 - u * u * u;
            t * t * t
        } else {
            1.0
        };
        if w <= 0.0 {
            continue;
        }
        sw += w;
        swx += w * xi;
        swy += w * yi;
        swxx += w * xi * xi;
        swxy += w * xi * yi;
    }

    if sw <= 0.0 {
        // All in-window weights vanished (ties exactly at the window
        // edge); fall back to the unweighted neighbourhood mean.
        let mut sum = 0.0;
        let mut count = 0usize;
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            if (xi - x0).abs() <= dmax {
                sum += yi;
                count += 1;
            }
        }
        return (sum / count as f64).clamp(0.0, 1.0);
    }

    let denom = sw * swxx - swx * swx;
    let estimate = if denom.abs() < 1e-12 {
        swy / sw
    } else {
        let slope = (sw * swxy - swx * swy) / denom;
        let intercept = (swy - slope * swx) / sw;
        intercept + slope * x0
    };

    estimate.clamp(0.0, 1.0)
}

/// Ordinary least-squares fit of curve values against grid values.
/// Returns (slope, intercept).
pub fn calibration_slope_intercept(curve: &Array1<f64>, grid: &Array1<f64>) -> Result<(f64, f64)> {
    if curve.len() != grid.len() {
        return Err(BootvalError::ShapeError {
            expected: format!("length = {}", grid.len()),
            actual: format!("length = {}", curve.len()),
        });
    }
    if grid.len() < 2 {
        return Err(BootvalError::InvalidInput(
            "slope/intercept fit needs at least 2 points".to_string(),
        ));
    }

    let n = grid.len() as f64;
    let mean_x = grid.mean().unwrap_or(0.0);
    let mean_y = curve.mean().unwrap_or(0.0);

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in grid.iter().zip(curve.iter()) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if sxx / n < 1e-15 {
        return Err(BootvalError::DivisionUndefined(
            "slope undefined: grid has zero variance".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    Ok((slope, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Dataset where each predicted probability equals the exact
    /// outcome frequency at that probability.
    fn perfectly_calibrated() -> (Array1<f64>, Array1<f64>) {
        let mut probs = Vec::new();
        let mut labels = Vec::new();
        for j in 0..=20 {
            let p = j as f64 / 20.0;
            for i in 0..20 {
                probs.push(p);
                labels.push(if i < j { 1.0 } else { 0.0 });
            }
        }
        (Array1::from_vec(labels), Array1::from_vec(probs))
    }

    #[test]
    fn test_brier_perfect_and_worst() {
        let labels = array![1.0, 0.0, 1.0, 0.0];
        let perfect = array![1.0, 0.0, 1.0, 0.0];
        assert!(brier_score(&labels, &perfect).unwrap().abs() < 1e-12);

        let worst = array![0.0, 1.0, 0.0, 1.0];
        assert!((brier_score(&labels, &worst).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_probability_grid() {
        let grid = probability_grid(100).unwrap();
        assert_eq!(grid.len(), 100);
        assert!(grid[0].abs() < 1e-12);
        assert!((grid[99] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_curve_identity_on_calibrated_data() {
        let (labels, probs) = perfectly_calibrated();
        let grid = probability_grid(100).unwrap();
        let curve = calibration_curve(&labels, &probs, &grid).unwrap();

        assert_eq!(curve.len(), 100);
        for &v in curve.iter() {
            assert!((0.0..=1.0).contains(&v));
        }

        // A locally linear smoother recovers an exactly linear
        // relationship, so the fitted slope/intercept are 1 and 0.
        let (slope, intercept) = calibration_slope_intercept(&curve, &grid).unwrap();
        assert!((slope - 1.0).abs() < 1e-6, "slope = {}", slope);
        assert!(intercept.abs() < 1e-6, "intercept = {}", intercept);
    }

    #[test]
    fn test_calibration_curve_deterministic() {
        let (labels, probs) = perfectly_calibrated();
        let grid = probability_grid(50).unwrap();
        let a = calibration_curve(&labels, &probs, &grid).unwrap();
        let b = calibration_curve(&labels, &probs, &grid).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_calibration_curve_empty_input() {
        let labels = Array1::<f64>::zeros(0);
        let probs = Array1::<f64>::zeros(0);
        let grid = probability_grid(10).unwrap();
        assert!(calibration_curve(&labels, &probs, &grid).is_err());
    }

    #[test]
    fn test_slope_intercept_known_line() {
        let grid = array![0.0, 0.25, 0.5, 0.75, 1.0];
        let curve = grid.mapv(|x| 0.5 * x + 0.1);
        let (slope, intercept) = calibration_slope_intercept(&curve, &grid).unwrap();
        assert!((slope - 0.5).abs() < 1e-12);
        assert!((intercept - 0.1).abs() < 1e-12);
    }
}
