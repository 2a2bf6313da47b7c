//! Everything the dashboard reads, loaded once at startup and shared
//! read-only afterwards.

use std::fmt;
use std::path::Path;

use common::{ChartDto, ChartKind, Pollutant, POLLUTANTS};
use tracing::{info, instrument, warn};

use crate::charts::build_chart;
use crate::dataset::{Dataset, DatasetOptions};
use crate::error::{ComputeError, Result};
use crate::predict::{predict, Prediction};
use crate::regressor::{Regressor, RegressorModel};
use crate::schema::{indicator_column, ModelSchema, SITE_PREFIX};
use crate::sites::{Site, SiteIndex};
use crate::stats::{describe, SummaryStatistics};

/// Locations of the three startup artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths<'a> {
    pub dataset: &'a Path,
    pub model: &'a Path,
    pub schema: &'a Path,
}

pub struct AppContext {
    dataset: Dataset,
    schema: ModelSchema,
    model: RegressorModel,
}

// Summary only, the frame itself is not printed.
impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("rows", &self.dataset.len())
            .field("sites", &self.dataset.sites().len())
            .field("features", &self.schema.len())
            .finish()
    }
}

impl AppContext {
    /// Loads dataset, model and schema from disk and checks they fit together.
    #[instrument(skip(options))]
    pub fn load(paths: ArtifactPaths<'_>, options: &DatasetOptions) -> Result<Self> {
        let model = RegressorModel::load(paths.model)?;
        let schema = ModelSchema::load(paths.schema)?;
        let dataset = Dataset::load(paths.dataset, options)?;
        Self::from_parts(dataset, schema, model)
    }

    /// Assembles a context from already loaded parts.
    ///
    /// Fails with `SchemaMismatch` when the model is not as wide as the schema
    /// and with `ModelMismatch` when it does not predict every pollutant.
    pub fn from_parts(dataset: Dataset, schema: ModelSchema, model: RegressorModel) -> Result<Self> {
        if model.n_features() != schema.len() {
            return Err(ComputeError::SchemaMismatch(format!(
                "model expects {} features but the schema lists {} columns",
                model.n_features(),
                schema.len()
            )));
        }
        if model.n_outputs() != POLLUTANTS.len() {
            return Err(ComputeError::ModelMismatch(format!(
                "model predicts {} values, expected one per pollutant ({})",
                model.n_outputs(),
                POLLUTANTS.len()
            )));
        }

        let untrained = dataset
            .sites()
            .sites()
            .into_iter()
            .filter(|site| !schema.contains(&indicator_column(SITE_PREFIX, site.id.as_str())))
            .count();
        if untrained > 0 {
            warn!(untrained, "Sites without a model indicator column");
        }

        info!(
            rows = dataset.len(),
            sites = dataset.sites().len(),
            features = schema.len(),
            "Application context ready"
        );

        Ok(Self {
            dataset,
            schema,
            model,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn model(&self) -> &RegressorModel {
        &self.model
    }

    pub fn sites(&self) -> &SiteIndex {
        self.dataset.sites()
    }

    /// Site names matching `text`; blank text lists every site sorted.
    pub fn search(&self, text: &str) -> Vec<String> {
        self.sites().search(text)
    }

    pub fn site(&self, name: &str) -> Result<Site> {
        self.sites().site(name)
    }

    /// Predicts every pollutant for a site name and year.
    pub fn predict(&self, site_name: &str, year: i32) -> Result<Prediction> {
        let site_id = self.sites().resolve(site_name)?;
        predict(&self.schema, &self.model, site_name, site_id, year)
    }

    pub fn statistics(&self, site_name: &str, pollutant: Pollutant) -> Result<SummaryStatistics> {
        self.sites().resolve(site_name)?;
        describe(&self.dataset, site_name, pollutant)
    }

    pub fn chart(
        &self,
        site_name: &str,
        pollutant: Pollutant,
        kind: ChartKind,
        compare_with: Option<Pollutant>,
    ) -> Result<ChartDto> {
        self.sites().resolve(site_name)?;
        build_chart(&self.dataset, site_name, pollutant, kind, compare_with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressor::LinearRegressor;

    const CSV: &str = "\
id;date;O2;NO3;NO2;SO4;PO4;CL;site_name
7;01.01.2000;10;1;0.1;100;0.5;50;Lake A
7;01.01.2001;12;2;0.2;110;0.6;55;Lake A
3;01.01.2000;8;3;0.3;90;0.4;40;River B
";

    fn parts(width: usize, outputs: usize) -> (Dataset, ModelSchema, RegressorModel) {
        let dataset =
            Dataset::from_csv_bytes(CSV.as_bytes().to_vec(), &DatasetOptions::default()).unwrap();
        let schema = ModelSchema::from_json(r#"["year", "id_3", "id_7"]"#).unwrap();
        let model = RegressorModel::Linear(LinearRegressor {
            intercepts: vec![1.0; outputs],
            coefficients: vec![vec![0.0; width]; outputs],
        });
        (dataset, schema, model)
    }

    fn context() -> AppContext {
        let (dataset, schema, model) = parts(3, 6);
        AppContext::from_parts(dataset, schema, model).unwrap()
    }

    #[test]
    fn test_rejects_model_narrower_than_schema() {
        let (dataset, schema, model) = parts(2, 6);
        let err = AppContext::from_parts(dataset, schema, model).unwrap_err();
        assert!(matches!(err, ComputeError::SchemaMismatch(_)));
    }

    #[test]
    fn test_rejects_model_with_wrong_output_count() {
        let (dataset, schema, model) = parts(3, 5);
        let err = AppContext::from_parts(dataset, schema, model).unwrap_err();
        assert!(matches!(err, ComputeError::ModelMismatch(_)));
    }

    #[test]
    fn test_predict_resolves_site_name() {
        let ctx = context();
        let prediction = ctx.predict("Lake A", 2025).unwrap();
        assert_eq!(prediction.site_id.as_str(), "7");
        assert_eq!(prediction.values.len(), 6);

        let err = ctx.predict("Nowhere", 2025).unwrap_err();
        assert!(matches!(err, ComputeError::MissingSite(_)));
    }

    #[test]
    fn test_statistics_and_chart_need_known_site() {
        let ctx = context();
        assert_eq!(ctx.statistics("Lake A", Pollutant::O2).unwrap().count, 2);
        assert!(matches!(
            ctx.statistics("Nowhere", Pollutant::O2),
            Err(ComputeError::MissingSite(_))
        ));
        assert!(matches!(
            ctx.chart("Nowhere", Pollutant::O2, ChartKind::Histogram, None),
            Err(ComputeError::MissingSite(_))
        ));
    }

    #[test]
    fn test_load_reads_artifacts_from_disk() {
        let dir = std::env::temp_dir().join(format!("lakewatch-context-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let dataset = dir.join("observations.csv");
        let model = dir.join("model.json");
        let schema = dir.join("model_columns.json");
        std::fs::write(&dataset, CSV).unwrap();
        std::fs::write(&schema, r#"["year", "id_3", "id_7"]"#).unwrap();
        std::fs::write(
            &model,
            r#"{"kind": "linear",
                "intercepts": [0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
                "coefficients": [[0.0, 0.0, 10.0], [0.0, 0.0, 10.0], [0.0, 0.0, 10.0],
                                 [0.0, 0.0, 10.0], [0.0, 0.0, 10.0], [0.0, 0.0, 10.0]]}"#,
        )
        .unwrap();

        let loaded = AppContext::load(
            ArtifactPaths {
                dataset: &dataset,
                model: &model,
                schema: &schema,
            },
            &DatasetOptions::default(),
        );
        std::fs::remove_dir_all(&dir).unwrap();

        let ctx = loaded.unwrap();
        assert_eq!(ctx.dataset().len(), 3);
        assert_eq!(ctx.schema().len(), 3);
        let prediction = ctx.predict("Lake A", 2025).unwrap();
        assert_eq!(prediction.value(Pollutant::O2), Some(10.0));
        assert_eq!(prediction.value(Pollutant::CL), Some(15.0));
    }

    #[test]
    fn test_search_delegates_to_site_index() {
        let ctx = context();
        assert_eq!(ctx.search(""), vec!["Lake A", "River B"]);
        assert_eq!(ctx.search("river"), vec!["River B"]);
    }
}
