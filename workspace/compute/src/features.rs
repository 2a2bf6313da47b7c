//! Feature row builder.
//!
//! Reconstructs a model input row that matches the training-time column
//! layout: a numeric `year` column plus one-hot site indicators named
//! `id_<site id>`. Building is split into two pure steps:
//!
//! 1. [`encode_inputs`] expands `(year, site_id)` into a sparse row holding
//!    only the columns it can name directly;
//! 2. [`align_to_schema`] selects and orders the schema columns from that row,
//!    filling every column the row does not carry with zero.

use std::collections::BTreeMap;

use tracing::{instrument, warn};

use crate::schema::{indicator_column, ModelSchema, SITE_PREFIX, YEAR_COLUMN};
use crate::sites::SiteId;

/// Column name -> value, holding only explicitly set columns.
pub type SparseRow = BTreeMap<String, f64>;

/// Expands the raw inputs into the one-hot encoded sparse row.
pub fn encode_inputs(year: i32, site_id: &SiteId) -> SparseRow {
    let mut row = SparseRow::new();
    row.insert(YEAR_COLUMN.to_string(), f64::from(year));
    row.insert(indicator_column(SITE_PREFIX, site_id.as_str()), 1.0);
    row
}

/// A fully populated row in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    values: Vec<f64>,
    /// Sparse columns the schema has no slot for
    unknown_columns: Vec<String>,
}

impl AlignedRow {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unknown_columns(&self) -> &[String] {
        &self.unknown_columns
    }
}

/// Selects the schema's columns from `row`, in schema order, defaulting to zero.
pub fn align_to_schema(schema: &ModelSchema, row: &SparseRow) -> AlignedRow {
    let values = schema
        .columns()
        .iter()
        .map(|column| row.get(column).copied().unwrap_or(0.0))
        .collect();

    let unknown_columns = row
        .keys()
        .filter(|column| !schema.contains(column))
        .cloned()
        .collect();

    AlignedRow {
        values,
        unknown_columns,
    }
}

/// Model input for one `(year, site)` request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub year: i32,
    pub site_id: SiteId,
    row: AlignedRow,
}

impl FeatureRow {
    pub fn values(&self) -> &[f64] {
        self.row.values()
    }

    /// Whether the schema has an indicator column for the site.
    pub fn site_is_known(&self) -> bool {
        let column = indicator_column(SITE_PREFIX, self.site_id.as_str());
        !self.row.unknown_columns().contains(&column)
    }

    /// Column name -> value over the schema columns.
    pub fn to_map(&self, schema: &ModelSchema) -> BTreeMap<String, f64> {
        schema
            .columns()
            .iter()
            .cloned()
            .zip(self.row.values().iter().copied())
            .collect()
    }

    /// Human readable notes about inputs the model cannot see.
    pub fn warnings(&self) -> Vec<String> {
        self.row
            .unknown_columns()
            .iter()
            .map(|column| {
                if column == YEAR_COLUMN {
                    format!(
                        "The model does not use the year; {} has no effect on the prediction",
                        self.year
                    )
                } else {
                    format!(
                        "Site id {} was not seen when the model was trained; prediction ignores the site",
                        self.site_id
                    )
                }
            })
            .collect()
    }
}

/// Builds the model input row for `year` at `site_id`.
///
/// Unknown site ids are tolerated: every indicator stays zero and a warning is
/// logged. Years are passed through unchanged.
#[instrument(skip(schema))]
pub fn build_feature_row(schema: &ModelSchema, year: i32, site_id: &SiteId) -> FeatureRow {
    let sparse = encode_inputs(year, site_id);
    let row = align_to_schema(schema, &sparse);

    for column in row.unknown_columns() {
        warn!(%column, "Input column has no slot in the model schema");
    }

    FeatureRow {
        year,
        site_id: site_id.clone(),
        row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ModelSchema {
        ModelSchema::from_json(r#"["year", "id_3", "id_7", "id_9"]"#).unwrap()
    }

    fn map(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_known_site_sets_its_indicator() {
        let schema = schema();
        let row = build_feature_row(&schema, 2025, &SiteId::from(7));

        assert_eq!(row.values(), &[2025.0, 0.0, 1.0, 0.0]);
        assert_eq!(
            row.to_map(&schema),
            map(&[("year", 2025.0), ("id_3", 0.0), ("id_7", 1.0), ("id_9", 0.0)])
        );
        assert!(row.site_is_known());
        assert!(row.warnings().is_empty());
    }

    #[test]
    fn test_unknown_site_leaves_all_indicators_zero() {
        let schema = schema();
        let row = build_feature_row(&schema, 2025, &SiteId::from(42));

        assert_eq!(
            row.to_map(&schema),
            map(&[("year", 2025.0), ("id_3", 0.0), ("id_7", 0.0), ("id_9", 0.0)])
        );
        assert!(!row.site_is_known());
        assert_eq!(row.warnings().len(), 1);
        assert!(row.warnings()[0].contains("42"));
    }

    #[test]
    fn test_exactly_one_indicator_is_hot_for_every_known_site() {
        let schema = schema();
        for site in ["3", "7", "9"] {
            for year in [1990, 2000, 2025, 2100] {
                let row = build_feature_row(&schema, year, &SiteId::from(site)).to_map(&schema);
                let hot: Vec<_> = row
                    .iter()
                    .filter(|(k, v)| k.starts_with("id_") && **v == 1.0)
                    .map(|(k, _)| k.clone())
                    .collect();
                assert_eq!(hot, vec![format!("id_{}", site)]);
                assert!(
                    row.iter()
                        .filter(|(k, _)| k.starts_with("id_"))
                        .all(|(_, v)| *v == 0.0 || *v == 1.0)
                );
                assert_eq!(row["year"], f64::from(year));
            }
        }
    }

    #[test]
    fn test_other_schema_columns_default_to_zero() {
        let schema =
            ModelSchema::from_json(r#"["month", "year", "id_7", "depth", "id_9"]"#).unwrap();
        let row = build_feature_row(&schema, 2010, &SiteId::from(9));
        assert_eq!(row.values(), &[0.0, 2010.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_builder_is_idempotent() {
        let schema = schema();
        let first = build_feature_row(&schema, 2030, &SiteId::from(3));
        let second = build_feature_row(&schema, 2030, &SiteId::from(3));
        assert_eq!(first, second);
        assert_eq!(first.to_map(&schema), second.to_map(&schema));
    }

    #[test]
    fn test_schema_without_year_warns() {
        let schema = ModelSchema::from_json(r#"["id_3", "id_7"]"#).unwrap();
        let row = build_feature_row(&schema, 2030, &SiteId::from(3));
        assert_eq!(row.values(), &[1.0, 0.0]);
        assert_eq!(row.warnings().len(), 1);
        assert!(row.site_is_known());
    }

    #[test]
    fn test_encode_inputs_names_columns_like_training() {
        let sparse = encode_inputs(2001, &SiteId::from("A12"));
        assert_eq!(sparse, map(&[("year", 2001.0), ("id_A12", 1.0)]));
    }
}
