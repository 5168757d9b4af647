// Participant screening: leave-one-out agreement with the group RDM, and
// distances on known-similar reference pairs.
//
// Both checks target the same failure mode — participants arranging at
// random — from two angles: global agreement with everyone else, and
// absolute distances on pairs no attentive participant separates.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::pipeline::combine::ParticipantRdm;
use crate::rdm::{pearson, square_to_condensed};
use crate::words::english_for;

/// One participant's leave-one-out agreement with the rest of the group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupCorrelation {
    pub participant_number: String,
    /// Pearson r between this participant's condensed RDM and the mean
    /// condensed RDM of all other participants.
    pub r: f64,
}

/// Leave-one-out group correlation for every participant.
pub fn leave_one_out_correlations(rdms: &[ParticipantRdm]) -> Result<Vec<GroupCorrelation>> {
    if rdms.len() < 2 {
        bail!("leave-one-out screening needs at least two participants");
    }

    let condensed: Vec<Vec<f64>> = rdms
        .iter()
        .map(|r| square_to_condensed(&r.matrix))
        .collect();
    let len = condensed[0].len();

    let mut totals = vec![0.0f64; len];
    for vec in &condensed {
        for (t, v) in totals.iter_mut().zip(vec) {
            *t += v;
        }
    }

    let others = (rdms.len() - 1) as f64;
    let mut out = Vec::with_capacity(rdms.len());
    for (rdm, vec) in rdms.iter().zip(&condensed) {
        let mean_others: Vec<f64> = totals
            .iter()
            .zip(vec)
            .map(|(t, v)| (t - v) / others)
            .collect();
        out.push(GroupCorrelation {
            participant_number: rdm.participant_number.clone(),
            r: pearson(vec, &mean_others),
        });
    }
    Ok(out)
}

/// Known-similar reference pairs: body-part pairs plus 桌子/椅子. An
/// attentive participant places these close together; large distances on
/// half of them indicate random responding.
pub const SANITY_PAIRS: [(&str, &str); 10] = [
    ("胳膊", "肩膀"),
    ("嘴唇", "鼻子"),
    ("眼睛", "鼻子"),
    ("脚踝", "大腿"),
    ("嘴唇", "眼睛"),
    ("耳朵", "鼻子"),
    ("脚踝", "膝盖"),
    ("耳朵", "嘴唇"),
    ("桌子", "椅子"),
    ("手指", "胳膊"),
];

/// One reference pair's distance for one participant.
#[derive(Debug, Clone, Serialize)]
pub struct PairDistance {
    pub word_a: &'static str,
    pub word_b: &'static str,
    pub distance: f64,
    pub above_threshold: bool,
}

/// A participant's sanity-pair distances and the resulting flag.
#[derive(Debug, Clone, Serialize)]
pub struct SanityReport {
    pub participant_number: String,
    pub pairs: Vec<PairDistance>,
    pub n_above: usize,
    /// Set when at least half of the reference pairs exceed the threshold.
    pub flagged: bool,
}

/// Check each participant's distances on the reference pairs.
pub fn sanity_pair_reports(
    rdms: &[ParticipantRdm],
    threshold: f64,
) -> Result<Vec<SanityReport>> {
    let mut reports = Vec::with_capacity(rdms.len());

    for rdm in rdms {
        let mut pairs = Vec::with_capacity(SANITY_PAIRS.len());
        let mut n_above = 0;

        for (a, b) in SANITY_PAIRS {
            let i = word_index(&rdm.words, a).with_context(|| {
                format!(
                    "participant {}: reference word {a} not in master word order",
                    rdm.participant_number
                )
            })?;
            let j = word_index(&rdm.words, b).with_context(|| {
                format!(
                    "participant {}: reference word {b} not in master word order",
                    rdm.participant_number
                )
            })?;

            let distance = rdm.matrix[i][j];
            let above = distance > threshold;
            if above {
                n_above += 1;
            }
            pairs.push(PairDistance {
                word_a: a,
                word_b: b,
                distance,
                above_threshold: above,
            });
        }

        let flagged = n_above * 2 >= SANITY_PAIRS.len();
        reports.push(SanityReport {
            participant_number: rdm.participant_number.clone(),
            pairs,
            n_above,
            flagged,
        });
    }
    Ok(reports)
}

// Word orders are language-specific; resolve the Chinese reference form or
// its English translation, whichever the participant saw.
fn word_index(words: &[String], zh: &str) -> Option<usize> {
    if let Some(i) = words.iter().position(|w| w == zh) {
        return Some(i);
    }
    let en = english_for(zh)?;
    words.iter().position(|w| w == en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanity_pairs_are_in_the_lexicon() {
        for (a, b) in SANITY_PAIRS {
            assert!(english_for(a).is_some(), "{a} missing from lexicon");
            assert!(english_for(b).is_some(), "{b} missing from lexicon");
        }
    }
}
