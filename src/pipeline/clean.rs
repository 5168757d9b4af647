// Cleaning raw session uploads for analysis.
//
// For each uploaded session document:
// - re-infer the true trial category by matching word sets (recorded
//   labels are untrusted)
// - recompute the dissimilarity result from raw placements
// - drop trials with unrecognized word sets
// - keep the first trial per participant × category (fixes duplicated
//   last-trial uploads)

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::output::export;
use crate::session::{ArrangementTrial, ArrangementZone, SessionDocument};
use crate::words::{infer_trial_category, Language, TrialCategory};

/// A participant's validated trials, ready for export or combination.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedSession {
    pub participant_number: String,
    pub language: Language,
    pub trials: Vec<ArrangementTrial>,
}

/// Clean one uploaded session document.
///
/// Fails only when no usable arrangement trial remains; individual bad
/// trials are dropped with a warning.
pub fn clean_session(doc: &SessionDocument) -> Result<CleanedSession> {
    let zone = ArrangementZone::experiment_default();
    let mut seen: HashSet<TrialCategory> = HashSet::new();
    let mut trials = Vec::new();

    for (index, raw) in doc.trials.iter().enumerate() {
        let words: Vec<&str> = raw.placements.iter().map(|p| p.word.as_str()).collect();

        let Some(category) = infer_trial_category(&words) else {
            warn!(
                participant = %doc.participant_number,
                trial = index,
                n_words = words.len(),
                "word set matches no known category, dropping trial"
            );
            continue;
        };

        if !seen.insert(category) {
            warn!(
                participant = %doc.participant_number,
                trial = index,
                category = %category,
                "duplicate trial for category, keeping the first"
            );
            continue;
        }

        let outside = zone.count_outside(&raw.placements);
        if outside > 0 {
            // The UI should have blocked completion; keep the trial but
            // leave a trace for manual review.
            warn!(
                participant = %doc.participant_number,
                trial = index,
                category = %category,
                outside,
                "word centers recorded outside the arrangement zone"
            );
        }

        let trial = match ArrangementTrial::new(category, raw.placements.clone()) {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    participant = %doc.participant_number,
                    trial = index,
                    category = %category,
                    error = %e,
                    "dissimilarity computation rejected trial"
                );
                continue;
            }
        };
        trials.push(trial);
    }

    if trials.is_empty() {
        bail!(
            "session {} has no usable arrangement trials",
            doc.participant_number
        );
    }

    Ok(CleanedSession {
        participant_number: doc.participant_number.clone(),
        language: doc.language,
        trials,
    })
}

/// List session JSON files in `data_dir`, sorted by file name so repeat
/// uploads resolve deterministically (earliest timestamp first).
pub fn session_files(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("reading data directory {}", data_dir.display()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Load and clean every session upload in `data_dir`.
///
/// One `CleanedSession` per participant: a participant's first upload wins,
/// later ones are dropped with a warning. Unparseable or empty sessions are
/// skipped, not fatal.
pub fn load_cleaned_sessions(data_dir: &Path) -> Result<Vec<CleanedSession>> {
    let files = session_files(data_dir)?;
    if files.is_empty() {
        bail!("no session files found in {}", data_dir.display());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Sessions [{bar:30}] {pos}/{len}")
            .unwrap(),
    );

    let mut sessions: Vec<CleanedSession> = Vec::new();
    let mut seen_participants: HashSet<String> = HashSet::new();

    for path in &files {
        pb.inc(1);

        let doc = match SessionDocument::load(path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable session file");
                continue;
            }
        };

        if !seen_participants.insert(doc.participant_number.clone()) {
            warn!(
                participant = %doc.participant_number,
                file = %path.display(),
                "repeat upload for participant, keeping the earliest"
            );
            continue;
        }

        match clean_session(&doc) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping session");
            }
        }
    }
    pb.finish_and_clear();

    if sessions.is_empty() {
        bail!("no session in {} survived cleaning", data_dir.display());
    }

    info!(
        files = files.len(),
        participants = sessions.len(),
        "cleaning complete"
    );
    Ok(sessions)
}

/// Clean every upload in `data_dir` and write one
/// `cleaned_<participant>.csv` per participant into `cleaned_dir`.
/// Returns the number of files written.
pub fn run(data_dir: &Path, cleaned_dir: &Path) -> Result<usize> {
    let sessions = load_cleaned_sessions(data_dir)?;

    fs::create_dir_all(cleaned_dir)
        .with_context(|| format!("creating {}", cleaned_dir.display()))?;

    for session in &sessions {
        let path = cleaned_dir.join(format!("cleaned_{}.csv", session.participant_number));
        export::write_cleaned_session(&path, session)?;
    }

    Ok(sessions.len())
}
