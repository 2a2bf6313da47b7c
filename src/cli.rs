use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use common::{Pollutant, DEFAULT_PREDICTION_YEAR};

pub mod commands;

use crate::config::{Settings, SettingsOverrides};
use commands::{describe, list_sites, predict, serve};

#[derive(Parser)]
#[command(name = "lakewatch")]
#[command(about = "Water quality dashboard: pollutant predictions and observation analytics")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Artifact locations; each falls back to `lakewatch.toml` and then the
/// built-in default when not given.
#[derive(Args, Debug)]
pub struct ArtifactArgs {
    /// Observations file (`;` separated by default)
    #[arg(long, global = true, env = "LAKEWATCH_DATASET_PATH")]
    pub dataset_path: Option<PathBuf>,

    /// Trained model artifact (JSON)
    #[arg(long, global = true, env = "LAKEWATCH_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Ordered model input columns (JSON list of names)
    #[arg(long, global = true, env = "LAKEWATCH_SCHEMA_PATH")]
    pub schema_path: Option<PathBuf>,

    /// Keep rows with unparseable dates instead of refusing to load
    #[arg(long, global = true)]
    pub lenient_dates: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "LAKEWATCH_BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// List sites whose name contains the search text (case-insensitive)
    Sites {
        /// Search text; empty lists every site
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Predict pollutant levels for a site and year
    Predict {
        /// Site display name
        #[arg(short, long)]
        site: String,

        /// Year to predict for (2000-2100)
        #[arg(short, long, default_value_t = DEFAULT_PREDICTION_YEAR,
              value_parser = clap::value_parser!(i32).range(2000..=2100))]
        year: i32,
    },
    /// Show descriptive statistics of one pollutant at one site
    Stats {
        /// Site display name
        #[arg(short, long)]
        site: String,

        /// Pollutant: O2, NO3, NO2, SO4, PO4 or CL
        #[arg(short, long, default_value = "O2")]
        parameter: Pollutant,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut overrides = SettingsOverrides {
            dataset_path: self.artifacts.dataset_path,
            model_path: self.artifacts.model_path,
            schema_path: self.artifacts.schema_path,
            lenient_dates: self.artifacts.lenient_dates,
            bind_address: None,
        };

        match self.command {
            Commands::Serve { bind_address } => {
                overrides.bind_address = bind_address;
                let settings = Settings::load()?.with_overrides(overrides);
                serve(&settings).await?;
            }
            Commands::Sites { search } => {
                let settings = Settings::load()?.with_overrides(overrides);
                list_sites(&settings, &search)?;
            }
            Commands::Predict { site, year } => {
                let settings = Settings::load()?.with_overrides(overrides);
                predict(&settings, &site, year)?;
            }
            Commands::Stats { site, parameter } => {
                let settings = Settings::load()?.with_overrides(overrides);
                describe(&settings, &site, parameter)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_predict_command() {
        let cli = Cli::try_parse_from(["lakewatch", "predict", "--site", "Lake A", "--year", "2030"])
            .unwrap();
        match cli.command {
            Commands::Predict { site, year } => {
                assert_eq!(site, "Lake A");
                assert_eq!(year, 2030);
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn test_rejects_year_out_of_range() {
        assert!(Cli::try_parse_from(["lakewatch", "predict", "--site", "Lake A", "--year", "1999"]).is_err());
    }

    #[test]
    fn test_stats_parameter_is_case_insensitive() {
        let cli = Cli::try_parse_from(["lakewatch", "stats", "-s", "Lake A", "-p", "no3"]).unwrap();
        match cli.command {
            Commands::Stats { parameter, .. } => assert_eq!(parameter, Pollutant::NO3),
            _ => panic!("expected stats"),
        }
    }

    #[test]
    fn test_global_artifact_flags() {
        let cli = Cli::try_parse_from([
            "lakewatch",
            "sites",
            "--model-path",
            "m.json",
            "--lenient-dates",
        ])
        .unwrap();
        assert_eq!(cli.artifacts.model_path, Some(PathBuf::from("m.json")));
        assert!(cli.artifacts.lenient_dates);
    }
}
