// Combining full + subset trials into one RDM per participant.
//
// The full 90-word trial defines the master word order; each trial's
// normalized distances accumulate into the master matrix and are averaged
// wherever a pair co-occurs. Across participants, chaotic responders are
// excluded by a mean-pairwise-distance (MPD) criterion.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::pipeline::clean::CleanedSession;
use crate::rdm;
use crate::words::TrialCategory;

/// Total number of words in the full arrangement trial.
pub const N_WORDS: usize = 90;

/// How much evidence each trial contributes to the combined RDM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialWeighting {
    /// Every trial weighs 1.0 (simple averaging).
    Equal,
    /// Weight = mean(dissimilarity)², Kriegeskorte & Mur style: larger
    /// distances carry more evidence. Non-positive weights fall back to 1.0.
    MeanSquared,
}

/// One participant's combined RDM in master word order.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRdm {
    pub participant_number: String,
    /// Master word order; rows/columns of `matrix` index into this.
    pub words: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

/// Combine a participant's trials into a single 90×90 RDM.
pub fn combine_session(
    session: &CleanedSession,
    weighting: TrialWeighting,
) -> Result<ParticipantRdm> {
    let full = session
        .trials
        .iter()
        .find(|t| t.category == TrialCategory::AllWords)
        .with_context(|| {
            format!(
                "participant {} has no full {}-word trial",
                session.participant_number, N_WORDS
            )
        })?;

    let master: Vec<String> = full.placements.iter().map(|p| p.word.clone()).collect();
    if master.len() != N_WORDS {
        bail!(
            "participant {}: master word list has {} words, expected {}",
            session.participant_number,
            master.len(),
            N_WORDS
        );
    }
    let index: HashMap<&str, usize> = master
        .iter()
        .enumerate()
        .map(|(i, w)| (w.as_str(), i))
        .collect();

    let mut sum = vec![vec![0.0f64; N_WORDS]; N_WORDS];
    let mut count = vec![vec![0.0f64; N_WORDS]; N_WORDS];

    for trial in &session.trials {
        let n = trial.placements.len();
        let vector = &trial.result.dissimilarity_vector;
        if vector.len() != rdm::condensed_len(n) {
            warn!(
                participant = %session.participant_number,
                category = %trial.category,
                "dissimilarity vector length mismatch, skipping trial"
            );
            continue;
        }

        let weight = match weighting {
            TrialWeighting::Equal => 1.0,
            TrialWeighting::MeanSquared => {
                let mean = if vector.is_empty() {
                    0.0
                } else {
                    vector.iter().sum::<f64>() / vector.len() as f64
                };
                let w = mean * mean;
                if w > 0.0 {
                    w
                } else {
                    1.0
                }
            }
        };

        let mut k = 0;
        for i in 0..n {
            for j in (i + 1)..n {
                let d = vector[k];
                k += 1;

                let (wi, wj) = (&trial.placements[i].word, &trial.placements[j].word);
                let (Some(&mi), Some(&mj)) = (index.get(wi.as_str()), index.get(wj.as_str()))
                else {
                    warn!(
                        participant = %session.participant_number,
                        category = %trial.category,
                        "pair contains a word missing from the master list, skipping pair"
                    );
                    continue;
                };

                sum[mi][mj] += weight * d;
                sum[mj][mi] += weight * d;
                count[mi][mj] += weight;
                count[mj][mi] += weight;
            }
        }
    }

    let mut matrix = vec![vec![0.0f64; N_WORDS]; N_WORDS];
    for i in 0..N_WORDS {
        for j in 0..N_WORDS {
            if i == j {
                continue;
            }
            matrix[i][j] = if count[i][j] > 0.0 {
                sum[i][j] / count[i][j]
            } else {
                f64::NAN
            };
        }
    }

    // Pairs that never co-occurred get the mean of the observed matrix,
    // zero diagonal included.
    let fill = rdm::nan_mean(&matrix);
    for i in 0..N_WORDS {
        for j in 0..N_WORDS {
            if i != j && matrix[i][j].is_nan() {
                matrix[i][j] = fill;
            }
        }
    }

    Ok(ParticipantRdm {
        participant_number: session.participant_number.clone(),
        words: master,
        matrix,
    })
}

/// Combine every session, verifying that all participants share one master
/// word order (downstream joins rely on it).
pub fn combine_all(
    sessions: &[CleanedSession],
    weighting: TrialWeighting,
) -> Result<Vec<ParticipantRdm>> {
    let mut rdms = Vec::with_capacity(sessions.len());
    for session in sessions {
        match combine_session(session, weighting) {
            Ok(rdm) => rdms.push(rdm),
            Err(e) => {
                warn!(
                    participant = %session.participant_number,
                    error = %e,
                    "skipping participant"
                );
            }
        }
    }

    if rdms.is_empty() {
        bail!("no participant could be combined");
    }

    let first_words = rdms[0].words.clone();
    for rdm in &rdms[1..] {
        if rdm.words != first_words {
            bail!(
                "word order mismatch for participant {}: all participants \
                 must share the same {}-word order",
                rdm.participant_number,
                N_WORDS
            );
        }
    }

    info!(participants = rdms.len(), "combined RDMs");
    Ok(rdms)
}

/// Per-participant MPD value and exclusion flag.
#[derive(Debug, Clone, Serialize)]
pub struct MpdValue {
    pub participant_number: String,
    pub mpd: f64,
    pub excluded: bool,
}

/// MPD screening summary across all participants (pre-filter values).
#[derive(Debug, Clone, Serialize)]
pub struct MpdReport {
    pub mean: f64,
    pub std_dev: f64,
    pub threshold: f64,
    pub z_threshold: f64,
    pub values: Vec<MpdValue>,
}

/// Exclude participants whose mean pairwise distance exceeds
/// group mean + z·SD (population SD). Removes random/chaotic responders.
pub fn filter_by_mpd(
    rdms: Vec<ParticipantRdm>,
    z_threshold: f64,
) -> (Vec<ParticipantRdm>, MpdReport) {
    let mpds: Vec<f64> = rdms
        .iter()
        .map(|r| rdm::mean_pairwise_distance(&r.matrix))
        .collect();

    let n = mpds.len() as f64;
    let mean = mpds.iter().sum::<f64>() / n;
    let variance = mpds.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let threshold = mean + z_threshold * std_dev;

    let values: Vec<MpdValue> = rdms
        .iter()
        .zip(&mpds)
        .map(|(r, &mpd)| MpdValue {
            participant_number: r.participant_number.clone(),
            mpd,
            excluded: mpd > threshold,
        })
        .collect();

    let kept: Vec<ParticipantRdm> = rdms
        .into_iter()
        .zip(&mpds)
        .filter(|(_, &mpd)| mpd <= threshold)
        .map(|(r, _)| r)
        .collect();

    let report = MpdReport {
        mean,
        std_dev,
        threshold,
        z_threshold,
        values,
    };
    (kept, report)
}
