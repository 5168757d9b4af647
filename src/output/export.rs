// Export files for the downstream analysis stack: cleaned trial CSVs,
// combined RDM outputs, and screening diagnostics.
//
// Tabular files are CSV (one row per trial or participant, nested
// structures JSON-encoded into cells); the RDM stack itself is JSON.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::output::csv::CsvWriter;
use crate::pipeline::clean::CleanedSession;
use crate::pipeline::combine::{MpdReport, ParticipantRdm};
use crate::rdm::square_to_condensed;
use crate::screen::{GroupCorrelation, SanityReport};

/// Write one participant's cleaned trials as a CSV, one row per trial.
pub fn write_cleaned_session(path: &Path, session: &CleanedSession) -> Result<()> {
    let mut w = CsvWriter::create(path)?;
    w.write_row([
        "participant_number",
        "trial_category",
        "n_words",
        "placements",
        "dissimilarity_vector",
        "distance_matrix",
    ])?;

    for trial in &session.trials {
        let n_words = trial.n_words.to_string();
        let placements = serde_json::to_string(&trial.placements)?;
        let vector = serde_json::to_string(&trial.result.dissimilarity_vector)?;
        let matrix = serde_json::to_string(&trial.result.distance_matrix)?;
        w.write_row([
            session.participant_number.as_str(),
            trial.category.as_str(),
            n_words.as_str(),
            placements.as_str(),
            vector.as_str(),
            matrix.as_str(),
        ])?;
    }
    w.finish()
}

/// Write the combined, MPD-filtered outputs:
/// - `all_rdms.json` — the filtered RDM stack
/// - `word_order.csv` — the master word order (same for all participants)
/// - `participant_info.csv` — retained participant IDs
/// - `mpd_values_all.csv` — MPD diagnostics for every participant
/// - `dismx_<id>.json` — one condensed vector per retained participant
pub fn write_combined_outputs(
    out_dir: &Path,
    rdms: &[ParticipantRdm],
    report: &MpdReport,
) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let rdms_path = out_dir.join("all_rdms.json");
    let file = File::create(&rdms_path)
        .with_context(|| format!("creating {}", rdms_path.display()))?;
    serde_json::to_writer(BufWriter::new(file), rdms)?;

    if let Some(first) = rdms.first() {
        let mut w = CsvWriter::create(&out_dir.join("word_order.csv"))?;
        w.write_row(["word"])?;
        for word in &first.words {
            w.write_row([word.as_str()])?;
        }
        w.finish()?;
    }

    let mut w = CsvWriter::create(&out_dir.join("participant_info.csv"))?;
    w.write_row(["participant_id"])?;
    for rdm in rdms {
        w.write_row([rdm.participant_number.as_str()])?;
    }
    w.finish()?;

    let mut w = CsvWriter::create(&out_dir.join("mpd_values_all.csv"))?;
    w.write_row(["participant_id", "mpd_value", "excluded"])?;
    for value in &report.values {
        let mpd = value.mpd.to_string();
        let excluded = value.excluded.to_string();
        w.write_row([
            value.participant_number.as_str(),
            mpd.as_str(),
            excluded.as_str(),
        ])?;
    }
    w.finish()?;

    for rdm in rdms {
        let path = out_dir.join(format!("dismx_{}.json", rdm.participant_number));
        let file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &square_to_condensed(&rdm.matrix))?;
    }

    info!(dir = %out_dir.display(), participants = rdms.len(), "combined outputs written");
    Ok(())
}

/// Write screening diagnostics:
/// - `group_correlations.csv` — leave-one-out r per participant
/// - `sanity_pairs_by_participant.csv` — every reference-pair distance
pub fn write_screening_outputs(
    out_dir: &Path,
    correlations: &[GroupCorrelation],
    reports: &[SanityReport],
) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut w = CsvWriter::create(&out_dir.join("group_correlations.csv"))?;
    w.write_row(["participant_id", "rdm_group_corr"])?;
    for c in correlations {
        let r = c.r.to_string();
        w.write_row([c.participant_number.as_str(), r.as_str()])?;
    }
    w.finish()?;

    let mut w = CsvWriter::create(&out_dir.join("sanity_pairs_by_participant.csv"))?;
    w.write_row(["participant_id", "word1", "word2", "distance", "above_threshold"])?;
    for report in reports {
        for pair in &report.pairs {
            let distance = pair.distance.to_string();
            let above = pair.above_threshold.to_string();
            w.write_row([
                report.participant_number.as_str(),
                pair.word_a,
                pair.word_b,
                distance.as_str(),
                above.as_str(),
            ])?;
        }
    }
    w.finish()?;

    info!(dir = %out_dir.display(), "screening outputs written");
    Ok(())
}
