use common::{Pollutant, POLLUTANTS};
use tracing::{info, instrument};

use crate::error::{ComputeError, Result};
use crate::features::build_feature_row;
use crate::regressor::Regressor;
use crate::schema::ModelSchema;
use crate::sites::SiteId;

/// Predicted concentrations for one site and year.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub site_name: String,
    pub site_id: SiteId,
    pub year: i32,
    /// One value per pollutant, in `POLLUTANTS` order
    pub values: Vec<(Pollutant, f64)>,
    pub warnings: Vec<String>,
}

impl Prediction {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        self.values
            .iter()
            .find(|(p, _)| *p == pollutant)
            .map(|(_, v)| *v)
    }
}

/// Runs the model on the feature row for `year` at `site_id`.
#[instrument(skip(schema, model))]
pub fn predict(
    schema: &ModelSchema,
    model: &dyn Regressor,
    site_name: &str,
    site_id: &SiteId,
    year: i32,
) -> Result<Prediction> {
    let row = build_feature_row(schema, year, site_id);
    let outputs = model.predict(row.values())?;

    if outputs.len() != POLLUTANTS.len() {
        return Err(ComputeError::ModelMismatch(format!(
            "model returned {} values, expected {}",
            outputs.len(),
            POLLUTANTS.len()
        )));
    }

    let values: Vec<(Pollutant, f64)> = POLLUTANTS.iter().copied().zip(outputs).collect();
    info!(?values, "Predicted pollutant levels");

    Ok(Prediction {
        site_name: site_name.to_string(),
        site_id: site_id.clone(),
        year,
        values,
        warnings: row.warnings(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regressor::LinearRegressor;

    fn schema() -> ModelSchema {
        ModelSchema::from_json(r#"["year", "id_3", "id_7"]"#).unwrap()
    }

    /// Output k is `k + year / 1000 + 10 * id_7`.
    fn model() -> LinearRegressor {
        LinearRegressor {
            intercepts: (0..6).map(f64::from).collect(),
            coefficients: (0..6).map(|_| vec![0.001, 0.0, 10.0]).collect(),
        }
    }

    #[test]
    fn test_predicts_one_value_per_pollutant() {
        let prediction = predict(&schema(), &model(), "Lake A", &SiteId::from(7), 2000).unwrap();
        assert_eq!(prediction.values.len(), 6);
        assert_eq!(
            prediction.values.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            POLLUTANTS.to_vec()
        );
        assert!((prediction.value(Pollutant::O2).unwrap() - 12.0).abs() < 1e-9);
        assert!((prediction.value(Pollutant::CL).unwrap() - 17.0).abs() < 1e-9);
        assert!(prediction.warnings.is_empty());
    }

    #[test]
    fn test_unknown_site_predicts_with_warning() {
        let prediction = predict(&schema(), &model(), "Far Lake", &SiteId::from(42), 2000).unwrap();
        assert!((prediction.value(Pollutant::O2).unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(prediction.warnings.len(), 1);
    }

    #[test]
    fn test_wrong_output_count_is_model_mismatch() {
        let model = LinearRegressor {
            intercepts: vec![0.0],
            coefficients: vec![vec![0.0, 0.0, 0.0]],
        };
        let err = predict(&schema(), &model, "Lake A", &SiteId::from(7), 2000).unwrap_err();
        assert!(matches!(err, ComputeError::ModelMismatch(_)));
    }
}
