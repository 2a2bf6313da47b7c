//! Water-quality observations loaded once from a delimited text file.
//!
//! The file is read with every column as text, then typed here so that ids
//! keep their exact spelling (they become one-hot column names) and dates can
//! be checked row by row.

use std::io::Cursor;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use common::{Pollutant, POLLUTANTS};
use polars::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::error::{ComputeError, Result};
use crate::sites::SiteIndex;

pub const ID_COLUMN: &str = "id";
pub const SITE_NAME_COLUMN: &str = "site_name";
pub const DATE_COLUMN: &str = "date";
pub const YEAR_COLUMN: &str = "year";

/// Date layouts accepted in the `date` column, tried in order.
const DATE_FORMATS: [&str; 4] = ["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// How the dataset file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Field separator
    pub separator: u8,
    /// Keep rows with unparseable dates (their year becomes missing) instead
    /// of failing the load
    pub lenient_dates: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            separator: b';',
            lenient_dates: false,
        }
    }
}

/// Parses a dataset date, returning `None` for anything unrecognised.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
                .map(|dt| dt.date())
        })
}

/// The immutable observation table plus its site lookup.
///
/// Frame columns: `id`, `site_name`, `date` (ISO text, nullable),
/// `year` (Int32, nullable) and one Float64 column per pollutant.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    sites: SiteIndex,
    undated_rows: usize,
}

impl Dataset {
    /// Reads the dataset file from disk.
    #[instrument(skip(options))]
    pub fn load(path: &Path, options: &DatasetOptions) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let dataset = Self::from_csv_bytes(bytes, options)?;
        info!(
            rows = dataset.len(),
            sites = dataset.sites.len(),
            "Loaded dataset from {}",
            path.display()
        );
        Ok(dataset)
    }

    /// Parses dataset text already in memory.
    pub fn from_csv_bytes(bytes: Vec<u8>, options: &DatasetOptions) -> Result<Self> {
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_separator(options.separator))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        debug!("Read {} raw rows", raw.height());

        let required = [ID_COLUMN, SITE_NAME_COLUMN, DATE_COLUMN]
            .into_iter()
            .chain(POLLUTANTS.iter().map(|p| p.column()));
        for name in required {
            if !raw.schema().contains(name) {
                return Err(ComputeError::MissingColumn(name.to_string()));
            }
        }

        let ids = required_text(&raw, ID_COLUMN)?;
        let names = required_text(&raw, SITE_NAME_COLUMN)?;
        let raw_dates = text_column(&raw, DATE_COLUMN)?;

        let mut dates: Vec<Option<String>> = Vec::with_capacity(raw_dates.len());
        let mut years: Vec<Option<i32>> = Vec::with_capacity(raw_dates.len());
        let mut undated_rows = 0;

        for (index, value) in raw_dates.iter().enumerate() {
            match value.as_deref().and_then(parse_date) {
                Some(date) => {
                    dates.push(Some(date.format("%Y-%m-%d").to_string()));
                    years.push(Some(date.year()));
                }
                None if options.lenient_dates => {
                    undated_rows += 1;
                    dates.push(None);
                    years.push(None);
                }
                None => {
                    return Err(ComputeError::InvalidDate {
                        row: index + 1,
                        value: value.clone().unwrap_or_default(),
                    });
                }
            }
        }

        if undated_rows > 0 {
            warn!(
                undated_rows,
                "Rows with unparseable dates kept without a year"
            );
        }

        let sites = SiteIndex::from_pairs(
            ids.iter()
                .map(String::as_str)
                .zip(names.iter().map(String::as_str)),
        )?;

        let mut columns: Vec<Column> = vec![
            Series::new(ID_COLUMN.into(), ids).into(),
            Series::new(SITE_NAME_COLUMN.into(), names).into(),
            Series::new(DATE_COLUMN.into(), dates).into(),
            Series::new(YEAR_COLUMN.into(), years).into(),
        ];
        for pollutant in POLLUTANTS {
            let values = float_column(&raw, pollutant.column())?;
            columns.push(Series::new(pollutant.column().into(), values).into());
        }

        let frame = DataFrame::new(columns)?;

        Ok(Self {
            frame,
            sites,
            undated_rows,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn sites(&self) -> &SiteIndex {
        &self.sites
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Rows kept without a year because their date did not parse.
    pub fn undated_rows(&self) -> usize {
        self.undated_rows
    }

    /// All observations of one site.
    pub fn site_frame(&self, site_name: &str) -> Result<DataFrame> {
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(col(SITE_NAME_COLUMN).eq(lit(site_name)))
            .collect()?;
        Ok(frame)
    }

    /// Non-missing readings of `pollutant` at one site, in dataset order.
    pub fn readings(&self, site_name: &str, pollutant: Pollutant) -> Result<Vec<f64>> {
        let frame = self.site_frame(site_name)?;
        Ok(float_column(&frame, pollutant.column())?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Row-aligned readings of two pollutants at one site, keeping rows where
    /// both are present.
    pub fn paired_readings(
        &self,
        site_name: &str,
        x: Pollutant,
        y: Pollutant,
    ) -> Result<Vec<(f64, f64)>> {
        let frame = self.site_frame(site_name)?;
        let xs = float_column(&frame, x.column())?;
        let ys = float_column(&frame, y.column())?;
        Ok(xs
            .into_iter()
            .zip(ys)
            .filter_map(|pair| match pair {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect())
    }
}

/// A text column with values trimmed.
fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(|v| v.trim().to_string()))
        .collect())
}

/// A text column that must be present and non-empty on every row.
fn required_text(frame: &DataFrame, name: &str) -> Result<Vec<String>> {
    text_column(frame, name)?
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(ComputeError::InvalidRow {
                row: index + 1,
                reason: format!("empty '{}'", name),
            }),
        })
        .collect()
}

/// A numeric column; blanks, non-numeric text, `NaN` and infinities become missing.
fn float_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = frame
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series
        .f64()?
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::SiteId;

    const CSV: &str = "\
id;date;NH4;O2;NO3;NO2;SO4;PO4;CL;site_name
7;17.02.2000;0.33;12.0;9.5;0.057;154;0.454;289.5;Lake A
7;11.05.2001;0.04;14.6;17.75;0.034;352;0.09;1792;Lake A
3;2002-03-01;0.1;8.0;;0.01;50;0.2;30;River B
7;23.09.2001;0.2;10.0;1.0;0.02;100;0.1;200;Lake A
";

    fn load(csv: &str, lenient_dates: bool) -> Result<Dataset> {
        Dataset::from_csv_bytes(
            csv.as_bytes().to_vec(),
            &DatasetOptions {
                separator: b';',
                lenient_dates,
            },
        )
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("17.02.2000"), NaiveDate::from_ymd_opt(2000, 2, 17));
        assert_eq!(parse_date("2002-03-01"), NaiveDate::from_ymd_opt(2002, 3, 1));
        assert_eq!(parse_date("01/03/2002"), NaiveDate::from_ymd_opt(2002, 3, 1));
        assert_eq!(
            parse_date("2002-03-01 10:15:00"),
            NaiveDate::from_ymd_opt(2002, 3, 1)
        );
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("31.02.2000"), None);
    }

    #[test]
    fn test_loads_typed_frame() {
        let dataset = load(CSV, false).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.sites().len(), 2);
        assert_eq!(dataset.undated_rows(), 0);

        let years: Vec<Option<i32>> = dataset
            .frame()
            .column("year")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2000), Some(2001), Some(2002), Some(2001)]);

        // extra columns are dropped
        assert!(dataset.frame().column("NH4").is_err());
    }

    #[test]
    fn test_site_lookup_matches_every_row() {
        let dataset = load(CSV, false).unwrap();
        let sites = dataset.sites();
        assert_eq!(sites.name_to_id("Lake A"), Some(&SiteId::from(7)));
        assert_eq!(sites.id_to_name(&SiteId::from(3)), Some("River B"));
    }

    #[test]
    fn test_readings_skip_missing_values() {
        let dataset = load(CSV, false).unwrap();
        assert_eq!(
            dataset.readings("Lake A", Pollutant::O2).unwrap(),
            vec![12.0, 14.6, 10.0]
        );
        assert!(dataset.readings("River B", Pollutant::NO3).unwrap().is_empty());
        assert!(dataset.readings("Nowhere", Pollutant::O2).unwrap().is_empty());
    }

    #[test]
    fn test_nan_and_infinite_cells_are_missing() {
        let csv = "\
id;date;O2;NO3;NO2;SO4;PO4;CL;site_name
1;01.01.2000;1;inf;0;0;0;0;L
1;01.01.2001;NaN;-inf;0;0;0;0;L
1;01.01.2002;3;nan;0;0;0;0;L
";
        let dataset = load(csv, false).unwrap();
        assert_eq!(dataset.readings("L", Pollutant::O2).unwrap(), vec![1.0, 3.0]);
        assert!(dataset.readings("L", Pollutant::NO3).unwrap().is_empty());

        let stats = crate::stats::describe(&dataset, "L", Pollutant::O2).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.median, Some(2.0));
        assert!(stats.std_dev.is_some());
    }

    #[test]
    fn test_paired_readings_require_both_values() {
        let dataset = load(CSV, false).unwrap();
        assert_eq!(
            dataset
                .paired_readings("River B", Pollutant::O2, Pollutant::NO3)
                .unwrap(),
            vec![]
        );
        assert_eq!(
            dataset
                .paired_readings("Lake A", Pollutant::O2, Pollutant::CL)
                .unwrap(),
            vec![(12.0, 289.5), (14.6, 1792.0), (10.0, 200.0)]
        );
    }

    #[test]
    fn test_strict_dates_reject_malformed_rows() {
        let csv = CSV.replace("2002-03-01", "not a date");
        let err = load(&csv, false).unwrap_err();
        assert!(matches!(
            err,
            ComputeError::InvalidDate { row: 3, ref value } if value == "not a date"
        ));
    }

    #[test]
    fn test_lenient_dates_keep_row_without_year() {
        let csv = CSV.replace("2002-03-01", "not a date");
        let dataset = load(&csv, true).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.undated_rows(), 1);
        let year = dataset
            .frame()
            .column("year")
            .unwrap()
            .as_materialized_series()
            .i32()
            .unwrap()
            .get(2);
        assert_eq!(year, None);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "id;date;O2;NO3;NO2;SO4;PO4;CL\n1;01.01.2000;1;1;1;1;1;1\n";
        let err = load(csv, false).unwrap_err();
        assert!(matches!(err, ComputeError::MissingColumn(c) if c == "site_name"));
    }

    #[test]
    fn test_inconsistent_site_mapping_fails_load() {
        let csv = CSV.replace("3;2002-03-01", "7;2002-03-01");
        let err = load(&csv, false).unwrap_err();
        assert!(matches!(err, ComputeError::InconsistentSite(_)));
    }
}
