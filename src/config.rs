use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use compute::{AppContext, ArtifactPaths, DatasetOptions};
use serde::Deserialize;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Optional settings file, looked up as `lakewatch.toml` (or any other
/// format the `config` crate knows) in the working directory.
pub const CONFIG_FILE: &str = "lakewatch";
/// Prefix of the environment variables, e.g. `LAKEWATCH_DATASET_PATH`.
pub const ENV_PREFIX: &str = "LAKEWATCH";

/// Application settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Observations file
    pub dataset_path: PathBuf,
    /// Trained model artifact
    pub model_path: PathBuf,
    /// Ordered model input columns
    pub schema_path: PathBuf,
    /// Dataset field separator
    pub separator: String,
    /// Keep rows with unparseable dates instead of refusing to start
    pub lenient_dates: bool,
    /// Web server bind address
    pub bind_address: String,
}

/// Command line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub dataset_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub schema_path: Option<PathBuf>,
    pub lenient_dates: bool,
    pub bind_address: Option<String>,
}

impl Settings {
    /// Reads defaults, then the settings file, then `LAKEWATCH_*` variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("dataset_path", "PB_All_2000_2021_named.csv")?
            .set_default("model_path", "model.json")?
            .set_default("schema_path", "model_columns.json")?
            .set_default("separator", ";")?
            .set_default("lenient_dates", false)?
            .set_default("bind_address", "0.0.0.0:3000")?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let settings: Settings = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    pub fn with_overrides(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(path) = overrides.dataset_path {
            self.dataset_path = path;
        }
        if let Some(path) = overrides.model_path {
            self.model_path = path;
        }
        if let Some(path) = overrides.schema_path {
            self.schema_path = path;
        }
        if let Some(address) = overrides.bind_address {
            self.bind_address = address;
        }
        self.lenient_dates |= overrides.lenient_dates;
        self
    }

    /// The separator must be a single ASCII character.
    pub fn dataset_options(&self) -> Result<DatasetOptions> {
        let separator = match self.separator.as_bytes() {
            [byte] if byte.is_ascii() => *byte,
            _ => bail!(
                "Dataset separator must be a single ASCII character, got '{}'",
                self.separator
            ),
        };
        Ok(DatasetOptions {
            separator,
            lenient_dates: self.lenient_dates,
        })
    }

    /// Loads dataset, model and schema.
    pub fn load_context(&self) -> Result<AppContext> {
        let options = self.dataset_options()?;
        let paths = ArtifactPaths {
            dataset: &self.dataset_path,
            model: &self.model_path,
            schema: &self.schema_path,
        };
        AppContext::load(paths, &options).with_context(|| {
            format!(
                "Failed to load artifacts (dataset {}, model {}, schema {})",
                self.dataset_path.display(),
                self.model_path.display(),
                self.schema_path.display()
            )
        })
    }
}

/// Initialize application state from settings
pub async fn initialize_app_state(settings: &Settings) -> Result<AppState> {
    let settings = settings.clone();
    info!("Loading dataset from {}", settings.dataset_path.display());

    // Parsing the dataset is CPU bound
    let ctx = tokio::task::spawn_blocking(move || settings.load_context()).await??;

    Ok(AppState { ctx: Arc::new(ctx) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            dataset_path: "data.csv".into(),
            model_path: "model.json".into(),
            schema_path: "model_columns.json".into(),
            separator: ";".to_string(),
            lenient_dates: false,
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let settings = settings().with_overrides(SettingsOverrides {
            model_path: Some("other.json".into()),
            lenient_dates: true,
            ..Default::default()
        });
        assert_eq!(settings.model_path, PathBuf::from("other.json"));
        assert_eq!(settings.dataset_path, PathBuf::from("data.csv"));
        assert!(settings.lenient_dates);
    }

    #[test]
    fn test_dataset_options_from_separator() {
        let options = settings().dataset_options().unwrap();
        assert_eq!(options.separator, b';');

        let mut settings = settings();
        settings.separator = ",".to_string();
        assert_eq!(settings.dataset_options().unwrap().separator, b',');

        settings.separator = ";;".to_string();
        assert!(settings.dataset_options().is_err());
    }

    #[test]
    fn test_missing_artifacts_fail_to_load() {
        let mut settings = settings();
        settings.model_path = "/nonexistent/model.json".into();
        assert!(settings.load_context().is_err());
    }
}
