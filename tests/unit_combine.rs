// Unit tests for trial combination and MPD participant filtering.

use semspace::isc::Placement;
use semspace::pipeline::clean::CleanedSession;
use semspace::pipeline::combine::{
    combine_all, combine_session, filter_by_mpd, ParticipantRdm, TrialWeighting, N_WORDS,
};
use semspace::session::ArrangementTrial;
use semspace::words::{words_for, Language, TrialCategory};

fn circle_placements(words: &[&str], radius: f64) -> Vec<Placement> {
    let n = words.len() as f64;
    words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let angle = std::f64::consts::TAU * i as f64 / n;
            Placement::new(*w, 300.0 + radius * angle.cos(), 300.0 + radius * angle.sin())
        })
        .collect()
}

fn full_trial() -> ArrangementTrial {
    let words = words_for(TrialCategory::AllWords, Language::Zh);
    ArrangementTrial::new(TrialCategory::AllWords, circle_placements(&words, 140.0)).unwrap()
}

fn animals_line_trial() -> ArrangementTrial {
    // A line layout gives the subset trial different relative geometry
    // than the full circle trial.
    let words = words_for(TrialCategory::Animals, Language::Zh);
    let placements: Vec<Placement> = words
        .iter()
        .enumerate()
        .map(|(i, w)| Placement::new(*w, 200.0 + 10.0 * (i * i) as f64, 300.0))
        .collect();
    ArrangementTrial::new(TrialCategory::Animals, placements).unwrap()
}

fn session(id: &str, trials: Vec<ArrangementTrial>) -> CleanedSession {
    CleanedSession {
        participant_number: id.to_string(),
        language: Language::Zh,
        trials,
    }
}

#[test]
fn unobserved_pairs_fill_with_matrix_mean_including_diagonal() {
    // A full trial with an inconsistent stored vector is skipped for
    // accumulation but still fixes the master word order, so only the
    // animal pairs are observed and everything else takes the fill value.
    let mut full = full_trial();
    full.result.dissimilarity_vector.pop();
    let animals = animals_line_trial();

    let s: f64 = animals.result.dissimilarity_vector.iter().sum();
    let n_pairs = animals.result.dissimilarity_vector.len(); // 45
    // Observed entries: each pair twice (symmetric matrix) plus the 90
    // diagonal zeros, all of which count toward the nanmean fill.
    let fill = 2.0 * s / ((2 * n_pairs + N_WORDS) as f64);

    let combined =
        combine_session(&session("1", vec![full.clone(), animals]), TrialWeighting::Equal)
            .unwrap();

    // An unobserved pair (two words outside the animal subset).
    let mi = full.placements.iter().position(|p| p.word == "桌子").unwrap();
    let mj = full.placements.iter().position(|p| p.word == "椅子").unwrap();
    assert!((combined.matrix[mi][mj] - fill).abs() < 1e-12);
}

#[test]
fn full_trial_alone_reproduces_its_matrix() {
    let trial = full_trial();
    let expected = trial.result.distance_matrix.clone();
    let combined = combine_session(&session("1", vec![trial]), TrialWeighting::Equal).unwrap();

    assert_eq!(combined.matrix.len(), N_WORDS);
    for i in 0..N_WORDS {
        assert_eq!(combined.matrix[i][i], 0.0);
        for j in 0..N_WORDS {
            assert!(
                (combined.matrix[i][j] - expected[i][j]).abs() < 1e-12,
                "mismatch at ({i}, {j})"
            );
            assert_eq!(combined.matrix[i][j], combined.matrix[j][i]);
        }
    }
}

#[test]
fn subset_trial_averages_into_its_pairs_only() {
    let full = full_trial();
    let animals = animals_line_trial();

    // Master indices of the first two animal words.
    let a = animals.placements[0].word.clone();
    let b = animals.placements[1].word.clone();
    let mi = full.placements.iter().position(|p| p.word == a).unwrap();
    let mj = full.placements.iter().position(|p| p.word == b).unwrap();

    let d_full = full.result.distance_matrix[mi][mj];
    let d_sub = animals.result.distance_matrix[0][1];

    let combined =
        combine_session(&session("1", vec![full.clone(), animals]), TrialWeighting::Equal)
            .unwrap();

    // Pair covered by both trials: simple average.
    let expected = (d_full + d_sub) / 2.0;
    assert!((combined.matrix[mi][mj] - expected).abs() < 1e-12);

    // Pair covered only by the full trial: untouched.
    let other_i = full
        .placements
        .iter()
        .position(|p| p.word == "协议")
        .unwrap();
    let other_j = full
        .placements
        .iter()
        .position(|p| p.word == "概念")
        .unwrap();
    assert!(
        (combined.matrix[other_i][other_j] - full.result.distance_matrix[other_i][other_j]).abs()
            < 1e-12
    );
}

#[test]
fn mean_squared_weighting_shifts_the_average() {
    let full = full_trial();
    let animals = animals_line_trial();

    let mean_of = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    let w_full = mean_of(&full.result.dissimilarity_vector).powi(2);
    let w_sub = mean_of(&animals.result.dissimilarity_vector).powi(2);

    let a = animals.placements[0].word.clone();
    let b = animals.placements[1].word.clone();
    let mi = full.placements.iter().position(|p| p.word == a).unwrap();
    let mj = full.placements.iter().position(|p| p.word == b).unwrap();

    let d_full = full.result.distance_matrix[mi][mj];
    let d_sub = animals.result.distance_matrix[0][1];
    let expected = (w_full * d_full + w_sub * d_sub) / (w_full + w_sub);

    let combined = combine_session(
        &session("1", vec![full, animals]),
        TrialWeighting::MeanSquared,
    )
    .unwrap();
    assert!((combined.matrix[mi][mj] - expected).abs() < 1e-12);
}

#[test]
fn missing_full_trial_is_an_error() {
    let result = combine_session(
        &session("1", vec![animals_line_trial()]),
        TrialWeighting::Equal,
    );
    assert!(result.is_err());
}

#[test]
fn mismatched_word_order_across_participants_fails() {
    let words = words_for(TrialCategory::AllWords, Language::Zh);
    let forward = ArrangementTrial::new(
        TrialCategory::AllWords,
        circle_placements(&words, 140.0),
    )
    .unwrap();

    let mut reversed_words = words.clone();
    reversed_words.reverse();
    let reversed = ArrangementTrial::new(
        TrialCategory::AllWords,
        circle_placements(&reversed_words, 140.0),
    )
    .unwrap();

    let sessions = vec![session("1", vec![forward]), session("2", vec![reversed])];
    assert!(combine_all(&sessions, TrialWeighting::Equal).is_err());
}

#[test]
fn combine_all_accepts_matching_orders() {
    let sessions = vec![
        session("1", vec![full_trial()]),
        session("2", vec![full_trial(), animals_line_trial()]),
    ];
    let rdms = combine_all(&sessions, TrialWeighting::Equal).unwrap();
    assert_eq!(rdms.len(), 2);
    assert_eq!(rdms[0].words, rdms[1].words);
}

// ============================================================
// MPD filtering
// ============================================================

fn constant_rdm(id: &str, value: f64) -> ParticipantRdm {
    let n = 4;
    let mut matrix = vec![vec![value; n]; n];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    ParticipantRdm {
        participant_number: id.to_string(),
        words: (0..n).map(|i| format!("w{i}")).collect(),
        matrix,
    }
}

#[test]
fn mpd_outlier_is_excluded_at_low_z() {
    let rdms = vec![
        constant_rdm("1", 1.0),
        constant_rdm("2", 1.0),
        constant_rdm("3", 1.0),
        constant_rdm("4", 10.0),
    ];
    let (kept, report) = filter_by_mpd(rdms, 1.0);

    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|r| r.participant_number != "4"));
    assert_eq!(report.values.len(), 4);
    assert!(report.values[3].excluded);
    assert!((report.mean - 3.25).abs() < 1e-12);
}

#[test]
fn mpd_default_z_keeps_moderate_spread() {
    let rdms = vec![
        constant_rdm("1", 1.0),
        constant_rdm("2", 1.0),
        constant_rdm("3", 1.0),
        constant_rdm("4", 10.0),
    ];
    let (kept, report) = filter_by_mpd(rdms, 3.0);
    assert_eq!(kept.len(), 4);
    assert!(report.values.iter().all(|v| !v.excluded));
}
