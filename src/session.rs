// Per-participant session documents — the JSON format the collection
// endpoint writes, one file per upload (P<id>_<timestamp>.json).
//
// The document carries raw placements only; dissimilarity results are
// always recomputed here so there is exactly one authoritative
// implementation of the transform.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::isc::{compute_dissimilarity, DissimilarityResult, Placement};
use crate::words::{infer_trial_category, Language, TrialCategory};

/// A raw uploaded session, as stored by the collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    pub participant_number: String,
    pub language: Language,
    pub recorded_at: DateTime<Utc>,
    pub trials: Vec<RawTrial>,
}

impl SessionDocument {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading session file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing session file {}", path.display()))
    }
}

/// One arrangement as uploaded: just the final word placements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrial {
    /// Label recorded by the experiment script. Untrusted — cleaning
    /// re-infers the category from the actual word set.
    #[serde(default)]
    pub trial_category: Option<String>,
    pub placements: Vec<Placement>,
}

/// One validated arrangement: inferred category plus the computed
/// dissimilarity result. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrangementTrial {
    pub category: TrialCategory,
    pub n_words: usize,
    pub placements: Vec<Placement>,
    pub result: DissimilarityResult,
}

impl ArrangementTrial {
    /// Build a trial for a known category, running the transform once.
    pub fn new(category: TrialCategory, placements: Vec<Placement>) -> Result<Self> {
        let result = compute_dissimilarity(&placements)?;
        Ok(Self {
            category,
            n_words: placements.len(),
            placements,
            result,
        })
    }

    /// Build a trial from raw placements, inferring the category from the
    /// word set.
    pub fn from_placements(placements: Vec<Placement>) -> Result<Self> {
        let words: Vec<&str> = placements.iter().map(|p| p.word.as_str()).collect();
        let category = infer_trial_category(&words)
            .context("word set does not match any known trial category")?;
        Self::new(category, placements)
    }
}

/// The circular arrangement zone of the experiment page.
///
/// The "finished" control in the UI is enabled exactly when every word
/// center lies inside this zone; ingestion uses the same check to flag
/// incomplete arrangements. The core transform never enforces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrangementZone {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl ArrangementZone {
    /// The zone the experiment page renders: a 300px-diameter circle
    /// centered in its 600×600 container.
    pub fn experiment_default() -> Self {
        Self {
            cx: 300.0,
            cy: 300.0,
            radius: 150.0,
        }
    }

    pub fn contains(&self, placement: &Placement) -> bool {
        let dx = placement.cx - self.cx;
        let dy = placement.cy - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    pub fn contains_all(&self, placements: &[Placement]) -> bool {
        placements.iter().all(|p| self.contains(p))
    }

    /// Count of word centers outside the zone.
    pub fn count_outside(&self, placements: &[Placement]) -> usize {
        placements.iter().filter(|p| !self.contains(p)).count()
    }
}
