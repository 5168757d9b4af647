use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// value has a default matching the layout the collection endpoint writes.
pub struct Config {
    /// Directory of raw session uploads (one JSON document per upload).
    pub data_dir: PathBuf,
    /// Directory for cleaned per-participant CSVs.
    pub cleaned_dir: PathBuf,
    /// Directory for combined RDM and screening outputs.
    pub output_dir: PathBuf,
    /// Z threshold for mean-pairwise-distance participant exclusion.
    pub mpd_z_threshold: f64,
}

impl Config {
    pub fn load() -> Result<Self> {
        let mpd_z_threshold = match env::var("SEMSPACE_MPD_Z") {
            Ok(v) => v.parse().map_err(|_| {
                anyhow::anyhow!("SEMSPACE_MPD_Z must be a number, got {v:?}")
            })?,
            Err(_) => 3.0,
        };

        Ok(Self {
            data_dir: env_path("SEMSPACE_DATA_DIR", "./data"),
            cleaned_dir: env_path("SEMSPACE_CLEANED_DIR", "./cleaned"),
            output_dir: env_path("SEMSPACE_OUTPUT_DIR", "./preprocessed"),
            mpd_z_threshold,
        })
    }

    /// Check that the raw data directory exists.
    /// Call this before any operation that reads session uploads.
    pub fn require_data_dir(&self) -> Result<()> {
        if !self.data_dir.is_dir() {
            anyhow::bail!(
                "Data directory {} not found.\n\
                 Run `semspace init`, or point SEMSPACE_DATA_DIR at the \
                 directory your collection endpoint writes to.",
                self.data_dir.display()
            );
        }
        Ok(())
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
