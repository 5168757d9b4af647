// Condensed/square RDM conversions and the small statistics shared by the
// combine and screening stages.

use anyhow::{bail, Result};

/// Length of the condensed upper-triangular vector for an n×n RDM.
pub fn condensed_len(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Side length n such that condensed_len(n) == len, when one exists.
fn side_for_condensed(len: usize) -> Option<usize> {
    // len = n(n-1)/2  =>  n = (1 + sqrt(1 + 8·len)) / 2
    let n = ((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0).round() as usize;
    (condensed_len(n) == len).then_some(n)
}

/// Expand a condensed upper-triangular vector into a symmetric square
/// matrix with zero diagonal. Fails when the length is not triangular.
pub fn condensed_to_square(vec: &[f64]) -> Result<Vec<Vec<f64>>> {
    let Some(n) = side_for_condensed(vec.len()) else {
        bail!(
            "condensed vector length {} does not correspond to a square RDM",
            vec.len()
        );
    };
    let mut matrix = vec![vec![0.0f64; n]; n];
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            matrix[i][j] = vec[k];
            matrix[j][i] = vec[k];
            k += 1;
        }
    }
    Ok(matrix)
}

/// Flatten the upper triangle (i < j, row-major) of a square matrix.
pub fn square_to_condensed(matrix: &[Vec<f64>]) -> Vec<f64> {
    let n = matrix.len();
    let mut vec = Vec::with_capacity(condensed_len(n));
    for i in 0..n {
        for j in (i + 1)..n {
            vec.push(matrix[i][j]);
        }
    }
    vec
}

/// Mean of the off-diagonal entries, ignoring NaN. Returns 0.0 when there
/// are no usable entries.
pub fn mean_pairwise_distance(matrix: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (i, row) in matrix.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            if i != j && !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean of every entry in the matrix, ignoring NaN, diagonal included.
/// This is the fill value for pairs with no observations: the zero
/// diagonal is part of the average. Returns 0.0 when nothing is finite.
pub fn nan_mean(matrix: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in matrix {
        for &v in row {
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Plain Pearson correlation over two equal-length slices.
///
/// Returns NaN when either side has zero variance (the correlation is
/// undefined there, and screening treats NaN as "no agreement signal").
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "pearson inputs must have equal length");
    let n = a.len() as f64;
    if a.is_empty() {
        return f64::NAN;
    }

    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    cov / (var_a.sqrt() * var_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condensed_round_trip() {
        let vec = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let matrix = condensed_to_square(&vec).unwrap();
        assert_eq!(matrix.len(), 4);
        assert_eq!(matrix[0][1], 0.1);
        assert_eq!(matrix[2][3], 0.6);
        assert_eq!(matrix[3][2], 0.6);
        assert_eq!(square_to_condensed(&matrix), vec);
    }

    #[test]
    fn non_triangular_length_fails() {
        assert!(condensed_to_square(&[0.1, 0.2, 0.3, 0.4]).is_err());
    }

    #[test]
    fn nan_mean_counts_the_diagonal() {
        let matrix = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        // Two off-diagonal ones plus two diagonal zeros.
        assert!((nan_mean(&matrix) - 0.5).abs() < 1e-12);
        assert!((mean_pairwise_distance(&matrix) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nan_mean_skips_nan_entries() {
        let matrix = vec![vec![0.0, f64::NAN], vec![2.0, 0.0]];
        // NaN is excluded from both the sum and the count.
        assert!((nan_mean(&matrix) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_perfect_and_inverse() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0, 8.0];
        let c = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_zero_variance_is_nan() {
        let flat = [1.0, 1.0, 1.0];
        let varied = [1.0, 2.0, 3.0];
        assert!(pearson(&flat, &varied).is_nan());
    }
}
