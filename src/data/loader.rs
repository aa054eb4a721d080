use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use thiserror::Error;

use super::model::{CanonicalSeries, DailyRow, RawRow, RawSeriesRecord, SeriesStore};

/// Required date column of every source CSV, parsed as `%m/%d/%y`.
pub const DATE_COLUMN: &str = "dates";

/// Ground-truth column name.
pub const GROUND_TRUTH_COLUMN: &str = "groundtruth";

/// Accepted names for the predicted-value column, in preference order:
/// if both are present the first one wins.
pub const PREDICTED_ALIASES: [&str; 2] = ["predictions", "predicted values"];

const DATE_FORMAT: &str = "%m/%d/%y";

// ---------------------------------------------------------------------------
// Load-time errors
// ---------------------------------------------------------------------------

/// A record that cannot be reconciled. Fatal at startup: the store is never
/// published with a broken dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Zero rows, so no date range can be established.
    #[error("model '{model_id}': no rows, cannot establish a date range")]
    EmptyDateRange { model_id: String },

    /// Neither a predicted-value column (under any accepted alias) nor a
    /// ground-truth column: nothing to plot.
    #[error(
        "model '{model_id}': no plottable column \
         (expected `groundtruth`, `predictions` or `predicted values`)"
    )]
    NoPlottableColumn { model_id: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Build the series store from a directory of per-model CSV files.
///
/// The directory must exist and contain at least one `.csv`; the model id is
/// the file stem. Runs once at startup, before any UI is shown.
pub fn load_dir(dir: &Path) -> Result<SeriesStore> {
    if !dir.is_dir() {
        bail!("model data directory not found: {}", dir.display());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("csv"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!(
            "no CSV files found in {}, add model CSV files to this directory",
            dir.display()
        );
    }

    let mut all = Vec::with_capacity(paths.len());
    for path in &paths {
        let model_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .with_context(|| format!("unreadable file name: {}", path.display()))?;

        let record = read_record(path, model_id)
            .with_context(|| format!("reading {}", path.display()))?;
        let series = canonicalize(record)?;

        log::info!(
            "loaded model '{}': {} daily rows ({} .. {})",
            series.model_id,
            series.rows.len(),
            series.min_date(),
            series.max_date(),
        );
        all.push(series);
    }

    Ok(SeriesStore::from_series(all))
}

// ---------------------------------------------------------------------------
// CSV parsing + schema normalization
// ---------------------------------------------------------------------------

/// Parse one model CSV into a raw record with canonical field names.
///
/// Column lookup is by header name; the predicted column is resolved through
/// [`PREDICTED_ALIASES`] so downstream code never branches on the source
/// spelling again.
pub fn read_record(path: &Path, model_id: String) -> Result<RawSeriesRecord> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .with_context(|| format!("CSV missing '{DATE_COLUMN}' column"))?;
    let gt_idx = headers.iter().position(|h| h == GROUND_TRUTH_COLUMN);
    let pred_idx = PREDICTED_ALIASES
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias));

    if gt_idx.is_none() && pred_idx.is_none() {
        return Err(LoadError::NoPlottableColumn { model_id }.into());
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let date_str = record.get(date_idx).unwrap_or("");
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT)
            .with_context(|| format!("row {row_no}: '{date_str}' is not a {DATE_FORMAT} date"))?;

        let ground_truth = parse_optional(gt_idx.and_then(|i| record.get(i)), row_no)?;
        let predicted = parse_optional(pred_idx.and_then(|i| record.get(i)), row_no)?;

        rows.push(RawRow {
            date,
            ground_truth,
            predicted,
        });
    }

    Ok(RawSeriesRecord { model_id, rows })
}

/// Empty cells are missing values, anything else must parse as a float.
fn parse_optional(cell: Option<&str>, row_no: usize) -> Result<Option<f64>> {
    match cell.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .with_context(|| format!("row {row_no}: '{s}' is not a number")),
    }
}

// ---------------------------------------------------------------------------
// Reconciliation: raw record → canonical daily series
// ---------------------------------------------------------------------------

/// Resample a raw record onto its own full daily calendar and interpolate.
///
/// Rows are stably sorted by date (ties keep file order, and the first row
/// wins on duplicate dates). Days with no source row start as `None` in both
/// columns and are filled by [`interpolate_gaps`] where neighbors exist.
pub fn canonicalize(record: RawSeriesRecord) -> Result<CanonicalSeries, LoadError> {
    let RawSeriesRecord { model_id, mut rows } = record;

    if rows.is_empty() {
        return Err(LoadError::EmptyDateRange { model_id });
    }

    rows.sort_by_key(|r| r.date);
    let min = rows[0].date;
    let max = rows[rows.len() - 1].date;

    // Left-outer-merge by exact date; first occurrence wins on duplicates.
    let mut by_date: BTreeMap<NaiveDate, RawRow> = BTreeMap::new();
    for row in rows {
        by_date.entry(row.date).or_insert(row);
    }

    let calendar: Vec<NaiveDate> = min.iter_days().take_while(|d| *d <= max).collect();

    let mut ground_truth: Vec<Option<f64>> = calendar
        .iter()
        .map(|d| by_date.get(d).and_then(|r| r.ground_truth))
        .collect();
    let mut predicted: Vec<Option<f64>> = calendar
        .iter()
        .map(|d| by_date.get(d).and_then(|r| r.predicted))
        .collect();

    interpolate_gaps(&mut ground_truth);
    interpolate_gaps(&mut predicted);

    let daily = calendar
        .into_iter()
        .zip(ground_truth)
        .zip(predicted)
        .map(|((date, gt), pred)| DailyRow {
            date,
            ground_truth: gt,
            predicted: pred,
        })
        .collect();

    Ok(CanonicalSeries {
        model_id,
        rows: daily,
    })
}

/// Fill interior `None` runs by linear interpolation between the nearest
/// known values on each side. Leading and trailing runs stay `None`:
/// interpolation never extrapolates, and an all-`None` column is untouched.
pub fn interpolate_gaps(values: &mut [Option<f64>]) {
    let known: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    for pair in known.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b - a < 2 {
            continue;
        }
        let (Some(va), Some(vb)) = (values[a], values[b]) else {
            continue;
        };
        for i in a + 1..b {
            let t = (i - a) as f64 / (b - a) as f64;
            values[i] = Some(va + (vb - va) * t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(d: NaiveDate, gt: Option<f64>, pred: Option<f64>) -> RawRow {
        RawRow {
            date: d,
            ground_truth: gt,
            predicted: pred,
        }
    }

    #[test]
    fn canonical_series_covers_every_day_of_the_span() {
        // 10 days apart → 11 daily rows
        let record = RawSeriesRecord {
            model_id: "m".into(),
            rows: vec![
                row(date(2024, 3, 11), None, Some(300.0)),
                row(date(2024, 3, 1), Some(100.0), Some(200.0)),
            ],
        };
        let series = canonicalize(record).unwrap();
        assert_eq!(series.rows.len(), 11);
        for (i, r) in series.rows.iter().enumerate() {
            assert_eq!(r.date, date(2024, 3, 1 + i as u32));
        }
    }

    #[test]
    fn interior_gaps_are_linearly_interpolated_by_day_distance() {
        let record = RawSeriesRecord {
            model_id: "m".into(),
            rows: vec![
                row(date(2024, 1, 1), Some(100.0), None),
                row(date(2024, 1, 5), Some(300.0), None),
            ],
        };
        let series = canonicalize(record).unwrap();
        let gt: Vec<Option<f64>> = series.rows.iter().map(|r| r.ground_truth).collect();
        assert_eq!(
            gt,
            vec![
                Some(100.0),
                Some(150.0),
                Some(200.0),
                Some(250.0),
                Some(300.0)
            ]
        );
    }

    #[test]
    fn leading_and_trailing_gaps_are_never_filled() {
        // Worked example: gt known only on day 1, pred only on day 3.
        let record = RawSeriesRecord {
            model_id: "m".into(),
            rows: vec![
                row(date(2024, 1, 1), Some(100.0), None),
                row(date(2024, 1, 3), None, Some(110.0)),
            ],
        };
        let series = canonicalize(record).unwrap();
        assert_eq!(series.rows.len(), 3);
        assert_eq!(series.rows[0].ground_truth, Some(100.0));
        assert_eq!(series.rows[1].ground_truth, None);
        assert_eq!(series.rows[2].ground_truth, None);
        assert_eq!(series.rows[0].predicted, None);
        assert_eq!(series.rows[1].predicted, None);
        assert_eq!(series.rows[2].predicted, Some(110.0));
    }

    #[test]
    fn interpolation_is_idempotent_on_full_columns() {
        let mut full: Vec<Option<f64>> = vec![Some(1.0), Some(5.0), Some(2.0)];
        let before = full.clone();
        interpolate_gaps(&mut full);
        assert_eq!(full, before);
    }

    #[test]
    fn all_none_column_stays_untouched() {
        let mut empty: Vec<Option<f64>> = vec![None; 4];
        interpolate_gaps(&mut empty);
        assert!(empty.iter().all(|v| v.is_none()));
    }

    #[test]
    fn duplicate_dates_keep_the_first_row() {
        let record = RawSeriesRecord {
            model_id: "m".into(),
            rows: vec![
                row(date(2024, 1, 1), Some(1.0), None),
                row(date(2024, 1, 1), Some(9.0), None),
                row(date(2024, 1, 2), Some(2.0), None),
            ],
        };
        let series = canonicalize(record).unwrap();
        assert_eq!(series.rows[0].ground_truth, Some(1.0));
    }

    #[test]
    fn empty_record_is_rejected() {
        let record = RawSeriesRecord {
            model_id: "m".into(),
            rows: vec![],
        };
        assert_eq!(
            canonicalize(record).unwrap_err(),
            LoadError::EmptyDateRange {
                model_id: "m".into()
            }
        );
    }

    #[test]
    fn record_without_plottable_column_is_rejected() {
        let dir = std::env::temp_dir().join("forecast_dash_schema_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bare.csv");
        std::fs::write(&path, "dates,notes\n01/02/24,hello\n").unwrap();

        let err = read_record(&path, "bare".into()).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert_eq!(
            *load_err,
            LoadError::NoPlottableColumn {
                model_id: "bare".into()
            }
        );
    }

    #[test]
    fn predicted_alias_is_normalized_at_read_time() {
        let dir = std::env::temp_dir().join("forecast_dash_alias_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("aliased.csv");
        std::fs::write(
            &path,
            "dates,predicted values\n01/02/24,12.5\n01/04/24,\n",
        )
        .unwrap();

        let record = read_record(&path, "aliased".into()).unwrap();
        assert_eq!(record.rows.len(), 2);
        assert_eq!(record.rows[0].date, date(2024, 1, 2));
        assert_eq!(record.rows[0].predicted, Some(12.5));
        assert_eq!(record.rows[1].predicted, None);
    }
}
