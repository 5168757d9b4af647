// Colored terminal output for pipeline summaries and screening reports.
//
// All terminal-specific formatting lives here; the main.rs command arms
// delegate to these functions.

use colored::Colorize;

use crate::pipeline::combine::MpdReport;
use crate::screen::{GroupCorrelation, SanityReport};
use crate::session::ArrangementTrial;

/// Display one trial's dissimilarity summary (for `semspace compute`).
pub fn display_trial(trial: &ArrangementTrial) {
    println!(
        "  {:<24} {:>3} words, {:>4} pairs",
        trial.category.to_string().bold(),
        trial.n_words,
        trial.result.dissimilarity_vector.len(),
    );
    match &trial.result.stats {
        Some(stats) => println!(
            "    raw min {:.2}  raw max {:.2}  mean normalized {:.3}",
            stats.min_distance, stats.max_distance, stats.mean_normalized
        ),
        None => println!("    {}", "no pairs (fewer than two placements)".dimmed()),
    }
}

/// Display the MPD filtering summary.
pub fn display_mpd_report(report: &MpdReport) {
    println!(
        "\n{}",
        "=== Mean Pairwise Distance (MPD) Filtering ===".bold()
    );
    println!("  Mean MPD: {:.4}", report.mean);
    println!("  Std  MPD: {:.4}", report.std_dev);
    println!(
        "  Threshold (mean + {} SD): {:.4}",
        report.z_threshold, report.threshold
    );

    let excluded: Vec<&str> = report
        .values
        .iter()
        .filter(|v| v.excluded)
        .map(|v| v.participant_number.as_str())
        .collect();

    if excluded.is_empty() {
        println!("  {}", "No participants excluded.".green());
    } else {
        println!(
            "  {} {}",
            "Excluded participants:".red().bold(),
            excluded.join(", ")
        );
    }
    println!(
        "  Remaining participants: {}",
        report.values.len() - excluded.len()
    );
}

/// Display leave-one-out group correlations, lowest agreement first.
pub fn display_correlations(correlations: &[GroupCorrelation]) {
    println!("\n{}", "=== Leave-One-Out Group Agreement ===".bold());
    println!(
        "  {:<16} {:>8}",
        "Participant".dimmed(),
        "r".dimmed()
    );

    let mut sorted: Vec<&GroupCorrelation> = correlations.iter().collect();
    sorted.sort_by(|a, b| a.r.total_cmp(&b.r));

    for c in sorted {
        let r_str = format!("{:>8.3}", c.r);
        let r_colored = if c.r.is_nan() || c.r < 0.2 {
            r_str.red()
        } else if c.r < 0.4 {
            r_str.yellow()
        } else {
            r_str.normal()
        };
        println!("  {:<16} {}", c.participant_number, r_colored);
    }
}

/// Display sanity-pair reports; flagged participants get per-pair detail.
pub fn display_sanity_reports(reports: &[SanityReport], threshold: f64) {
    let flagged: Vec<&SanityReport> = reports.iter().filter(|r| r.flagged).collect();

    println!("\n{}", "=== Reference-Pair Check ===".bold());
    println!(
        "  Participants with at least half of {} pairs above {:.2}:",
        reports.first().map_or(0, |r| r.pairs.len()),
        threshold
    );

    if flagged.is_empty() {
        println!("  {}", "None.".green());
        return;
    }

    for report in flagged {
        println!(
            "\n  {} ({} of {} pairs above threshold)",
            format!("Participant {}", report.participant_number).red().bold(),
            report.n_above,
            report.pairs.len()
        );
        for (i, pair) in report.pairs.iter().enumerate() {
            let mark = if pair.above_threshold { " *" } else { "" };
            println!(
                "    {:2}. {} – {}: {:.4}{}",
                i + 1,
                pair.word_a,
                pair.word_b,
                pair.distance,
                mark
            );
        }
    }
}
