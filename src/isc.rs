// Placement-to-dissimilarity transform ("ISC" — individual semantic
// configuration).
//
// Converts the final on-screen coordinates of arranged word tokens into a
// symmetric normalized distance matrix, its condensed upper-triangular
// vector, and summary statistics. Pure and stateless: computed once per
// completed arrangement, no I/O, no shared state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The final center coordinate of one word token at arrangement completion.
///
/// Coordinates live in whatever 2D space the arrangement UI used (pixels or
/// percentages of the zone); only relative geometry matters, so absolute
/// screen position and sign are irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub word: String,
    pub cx: f64,
    pub cy: f64,
}

impl Placement {
    pub fn new(word: impl Into<String>, cx: f64, cy: f64) -> Self {
        Self {
            word: word.into(),
            cx,
            cy,
        }
    }
}

/// Rejected input. The transform is cheap and deterministic, so callers
/// should fix the input rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInputError {
    #[error("placement {index} has an empty word label")]
    EmptyWord { index: usize },

    /// Non-finite coordinates are rejected at the boundary rather than
    /// propagated, so every downstream matrix is finite.
    #[error("placement {index} ({word}) has a non-finite coordinate ({cx}, {cy})")]
    NonFiniteCoordinate {
        index: usize,
        word: String,
        cx: f64,
        cy: f64,
    },
}

/// Summary statistics over one arrangement.
///
/// `min_distance`/`max_distance` are the raw (pre-normalization) extremes;
/// `mean_normalized` is the arithmetic mean of the condensed normalized
/// vector. Self-distances are never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrangementStats {
    pub min_distance: f64,
    pub max_distance: f64,
    pub mean_normalized: f64,
}

/// Output of [`compute_dissimilarity`].
///
/// Stored as JSON in the `dissimilarity_vector` and `distance_matrix`
/// columns of the cleaned trial CSVs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DissimilarityResult {
    /// Word labels in input order. This order defines the row/column
    /// indices of `distance_matrix` and must be preserved for any
    /// downstream join.
    pub words: Vec<String>,
    /// n×n symmetric matrix of normalized distances in [0, 1], diagonal 0.
    pub distance_matrix: Vec<Vec<f64>>,
    /// Upper-triangular (i < j) entries of `distance_matrix`, flattened in
    /// row-major order. Length n·(n−1)/2.
    pub dissimilarity_vector: Vec<f64>,
    /// `None` exactly when fewer than two placements exist (no pairs).
    pub stats: Option<ArrangementStats>,
}

/// Compute the normalized pairwise dissimilarity structure for one
/// completed arrangement.
///
/// Distances are Euclidean, min-max normalized over all unordered pairs:
/// the farthest pair maps to 1.0 and the closest to 0.0. When every
/// pairwise distance is identical (n ≤ 2, or all tokens coincident) every
/// normalized entry is 0.0 — an explicit degenerate-case policy, not an
/// error.
///
/// Entries are treated purely positionally by index; duplicate word labels
/// are the UI layer's concern and do not affect correctness.
pub fn compute_dissimilarity(
    placements: &[Placement],
) -> Result<DissimilarityResult, InvalidInputError> {
    validate(placements)?;

    let n = placements.len();
    let words: Vec<String> = placements.iter().map(|p| p.word.clone()).collect();

    // Raw Euclidean distances, stored symmetrically.
    let mut raw = vec![vec![0.0f64; n]; n];
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = placements[i].cx - placements[j].cx;
            let dy = placements[i].cy - placements[j].cy;
            let d = (dx * dx + dy * dy).sqrt();
            raw[i][j] = d;
            raw[j][i] = d;
            min = min.min(d);
            max = max.max(d);
        }
    }

    if n < 2 {
        // No pairs: empty (or 1×1 zero) matrix, empty vector, no stats.
        return Ok(DissimilarityResult {
            words,
            distance_matrix: raw,
            dissimilarity_vector: Vec::new(),
            stats: None,
        });
    }

    // Min-max normalization. Zero range means all pairwise distances are
    // identical; by policy everything normalizes to 0.0.
    let range = max - min;
    let normalize = |d: f64| if range == 0.0 { 0.0 } else { (d - min) / range };

    let mut matrix = vec![vec![0.0f64; n]; n];
    let mut vector = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let v = normalize(raw[i][j]);
            matrix[i][j] = v;
            matrix[j][i] = v;
            vector.push(v);
        }
    }

    let mean_normalized = vector.iter().sum::<f64>() / vector.len() as f64;

    Ok(DissimilarityResult {
        words,
        distance_matrix: matrix,
        dissimilarity_vector: vector,
        stats: Some(ArrangementStats {
            min_distance: min,
            max_distance: max,
            mean_normalized,
        }),
    })
}

fn validate(placements: &[Placement]) -> Result<(), InvalidInputError> {
    for (index, p) in placements.iter().enumerate() {
        if p.word.is_empty() {
            return Err(InvalidInputError::EmptyWord { index });
        }
        if !p.cx.is_finite() || !p.cy.is_finite() {
            return Err(InvalidInputError::NonFiniteCoordinate {
                index,
                word: p.word.clone(),
                cx: p.cx,
                cy: p.cy,
            });
        }
    }
    Ok(())
}
