//! The ordered column list the trained model expects at inference time.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Name of the numeric year feature.
pub const YEAR_COLUMN: &str = "year";
/// Prefix of the one-hot site indicator columns (`id_<site id>`).
pub const SITE_PREFIX: &str = "id";

/// Immutable, ordered list of model input columns.
///
/// Column names are unique and the list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSchema {
    columns: Vec<String>,
}

impl ModelSchema {
    /// Creates a schema, rejecting empty lists and duplicate names.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ComputeError::SchemaMismatch(
                "model schema has no columns".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ComputeError::SchemaMismatch(format!(
                    "duplicate column '{}' in model schema",
                    column
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Parses a JSON array of strings.
    pub fn from_json(json: &str) -> Result<Self> {
        let columns: Vec<String> = serde_json::from_str(json).map_err(|e| {
            ComputeError::SchemaMismatch(format!("expected a list of column names: {}", e))
        })?;
        Self::new(columns)
    }

    /// Reads the schema artifact from disk.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let schema = Self::from_json(&json)?;
        debug!("Loaded model schema with {} columns", schema.len());
        Ok(schema)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    /// Site indicator columns, in schema order.
    pub fn indicator_columns(&self) -> impl Iterator<Item = &str> {
        let prefix = format!("{}_", SITE_PREFIX);
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| c.starts_with(&prefix))
    }
}

/// One-hot column name for a category value, e.g. `id_7`.
pub fn indicator_column(prefix: &str, value: &str) -> String {
    format!("{}_{}", prefix, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_ordered_columns() {
        let schema = ModelSchema::from_json(r#"["year", "id_3", "id_7", "id_9"]"#).unwrap();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema.position("id_7"), Some(2));
        assert_eq!(
            schema.indicator_columns().collect::<Vec<_>>(),
            vec!["id_3", "id_7", "id_9"]
        );
    }

    #[test]
    fn test_rejects_non_string_lists() {
        let err = ModelSchema::from_json(r#"["year", 3]"#).unwrap_err();
        assert!(matches!(err, ComputeError::SchemaMismatch(_)));

        let err = ModelSchema::from_json(r#"{"columns": ["year"]}"#).unwrap_err();
        assert!(matches!(err, ComputeError::SchemaMismatch(_)));
    }

    #[test]
    fn test_rejects_empty_and_duplicate_columns() {
        assert!(matches!(
            ModelSchema::from_json("[]"),
            Err(ComputeError::SchemaMismatch(_))
        ));
        assert!(matches!(
            ModelSchema::from_json(r#"["year", "id_1", "year"]"#),
            Err(ComputeError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_indicator_column_name() {
        assert_eq!(indicator_column(SITE_PREFIX, "42"), "id_42");
    }
}
