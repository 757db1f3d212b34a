//! Bootstrap resampling of paired (features, labels) rows

use crate::error::{BootvalError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;

/// Draw `n` row indices uniformly with replacement from `0..n`.
pub fn bootstrap_indices<R: Rng>(n: usize, rng: &mut R) -> Result<Vec<usize>> {
    if n == 0 {
        return Err(BootvalError::InvalidInput(
            "cannot resample an empty dataset".to_string(),
        ));
    }
    Ok((0..n).map(|_| rng.gen_range(0..n)).collect())
}

/// Draw a same-size bootstrap sample of the dataset, preserving the
/// row-wise pairing of features and labels.
pub fn bootstrap_sample<R: Rng>(
    x: &Array2<f64>,
    y: &Array1<f64>,
    rng: &mut R,
) -> Result<(Array2<f64>, Array1<f64>)> {
    if x.nrows() != y.len() {
        return Err(BootvalError::ShapeError {
            expected: format!("y length = {}", x.nrows()),
            actual: format!("y length = {}", y.len()),
        });
    }

    let indices = bootstrap_indices(x.nrows(), rng)?;
    let x_boot = x.select(Axis(0), &indices);
    let y_boot = Array1::from_vec(indices.iter().map(|&i| y[i]).collect());
    Ok((x_boot, y_boot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_sample_shape_and_index_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let indices = bootstrap_indices(50, &mut rng).unwrap();
        assert_eq!(indices.len(), 50);
        assert!(indices.iter().all(|&i| i < 50));
    }

    #[test]
    fn test_sample_preserves_pairing() {
        // Label encodes the row, so any resampled row must still match
        let x = Array2::from_shape_fn((30, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(30, |i| i as f64);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let (x_boot, y_boot) = bootstrap_sample(&x, &y, &mut rng).unwrap();

        assert_eq!(x_boot.nrows(), 30);
        assert_eq!(y_boot.len(), 30);
        for (row, &label) in x_boot.rows().into_iter().zip(y_boot.iter()) {
            assert_eq!(row[0], label * 2.0);
            assert_eq!(row[1], label * 2.0 + 1.0);
        }
    }

    #[test]
    fn test_sample_repeats_rows() {
        // With replacement, 30 draws from 30 rows almost surely repeat;
        // with a fixed seed this is deterministic.
        let x = Array2::from_shape_fn((30, 1), |(i, _)| i as f64);
        let y = Array1::zeros(30);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (x_boot, _) = bootstrap_sample(&x, &y, &mut rng).unwrap();

        let mut seen: Vec<f64> = x_boot.column(0).to_vec();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        seen.dedup();
        assert!(seen.len() < 30);
    }

    #[test]
    fn test_empty_input_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(bootstrap_indices(0, &mut rng).is_err());
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let x = Array2::zeros((5, 2));
        let y = Array1::zeros(4);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(bootstrap_sample(&x, &y, &mut rng).is_err());
    }
}
