use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use semspace::config;

/// Semspace: dissimilarity analysis for bilingual circle-arrangement
/// experiments.
///
/// Converts uploaded word-arrangement sessions into normalized pairwise
/// dissimilarity structures, cleans and combines them into per-participant
/// RDMs, and screens out random responders.
#[derive(Parser)]
#[command(name = "semspace", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data, cleaned, and output directories
    Init,

    /// Compute dissimilarity results for a single session file
    Compute {
        /// Path to a session JSON document
        session: PathBuf,
    },

    /// Clean raw session uploads into per-participant CSVs
    Clean,

    /// Combine cleaned trials into MPD-filtered 90x90 RDM exports
    Combine {
        /// Weight trials by mean(dissimilarity)^2 instead of equally
        #[arg(long)]
        weighted: bool,

        /// Override the MPD exclusion z threshold (default 3.0)
        #[arg(long)]
        z_threshold: Option<f64>,
    },

    /// Screen participants: leave-one-out agreement and reference pairs
    Screen {
        /// Distance threshold for the reference-pair check
        #[arg(long, default_value = "0.3")]
        threshold: f64,
    },

    /// Show pipeline status (sessions, cleaned files, last combine)
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("semspace=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = config::Config::load()?;
            for dir in [&config.data_dir, &config.cleaned_dir, &config.output_dir] {
                fs::create_dir_all(dir)?;
                println!("Created {}", dir.display());
            }
            println!("\nSemspace is ready.");
            println!(
                "Point your collection endpoint at {} and run: semspace clean",
                config.data_dir.display()
            );
        }

        Commands::Compute { session } => {
            let doc = semspace::session::SessionDocument::load(&session)?;
            println!(
                "{}",
                format!(
                    "=== Participant {} ({}, {} trial(s), recorded {}) ===",
                    doc.participant_number,
                    doc.language,
                    doc.trials.len(),
                    doc.recorded_at.format("%Y-%m-%d %H:%M")
                )
                .bold()
            );

            let zone = semspace::session::ArrangementZone::experiment_default();
            for (index, raw) in doc.trials.iter().enumerate() {
                let outside = zone.count_outside(&raw.placements);
                if outside > 0 {
                    println!(
                        "  {} trial {index}: {outside} word center(s) outside the arrangement zone",
                        "Warning:".yellow()
                    );
                }
                match semspace::session::ArrangementTrial::from_placements(raw.placements.clone())
                {
                    Ok(trial) => semspace::output::terminal::display_trial(&trial),
                    Err(e) => println!("  {} trial {index}: {e}", "Error:".red()),
                }
            }
        }

        Commands::Clean => {
            let config = config::Config::load()?;
            config.require_data_dir()?;

            println!("Cleaning session uploads...");
            let written =
                semspace::pipeline::clean::run(&config.data_dir, &config.cleaned_dir)?;
            println!("\n{}", "Cleaning complete.".bold());
            println!(
                "  {} participant file(s) written to {}",
                written,
                config.cleaned_dir.display()
            );
        }

        Commands::Combine {
            weighted,
            z_threshold,
        } => {
            let config = config::Config::load()?;
            config.require_data_dir()?;
            let z = z_threshold.unwrap_or(config.mpd_z_threshold);

            let weighting = if weighted {
                semspace::pipeline::combine::TrialWeighting::MeanSquared
            } else {
                semspace::pipeline::combine::TrialWeighting::Equal
            };
            info!(?weighting, z_threshold = z, "combining sessions");

            let sessions = semspace::pipeline::clean::load_cleaned_sessions(&config.data_dir)?;
            let rdms = semspace::pipeline::combine::combine_all(&sessions, weighting)?;
            let (kept, report) = semspace::pipeline::combine::filter_by_mpd(rdms, z);

            semspace::output::terminal::display_mpd_report(&report);
            semspace::output::export::write_combined_outputs(&config.output_dir, &kept, &report)?;

            println!("\n{}", "Combine complete.".bold());
            println!(
                "  {} RDM(s) exported to {}",
                kept.len(),
                config.output_dir.display()
            );
        }

        Commands::Screen { threshold } => {
            let config = config::Config::load()?;
            config.require_data_dir()?;

            let sessions = semspace::pipeline::clean::load_cleaned_sessions(&config.data_dir)?;
            let rdms = semspace::pipeline::combine::combine_all(
                &sessions,
                semspace::pipeline::combine::TrialWeighting::Equal,
            )?;
            let (kept, _report) =
                semspace::pipeline::combine::filter_by_mpd(rdms, config.mpd_z_threshold);

            let correlations = semspace::screen::leave_one_out_correlations(&kept)?;
            let reports = semspace::screen::sanity_pair_reports(&kept, threshold)?;

            semspace::output::terminal::display_correlations(&correlations);
            semspace::output::terminal::display_sanity_reports(&reports, threshold);
            semspace::output::export::write_screening_outputs(
                &config.output_dir,
                &correlations,
                &reports,
            )?;
        }

        Commands::Status => {
            let config = config::Config::load()?;
            semspace::status::show(&config)?;
        }
    }

    Ok(())
}
