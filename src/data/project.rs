use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::model::{DateIndex, SeriesStore};

/// Fixed y-axis quantum: the upper bound snaps to the next multiple of this
/// and grid lines are spaced by it.
pub const Y_TICK_UNIT: f64 = 2000.0;

/// Legend label of the single ground-truth line.
pub const ACTUAL_VALUES_LABEL: &str = "Actual Values";

/// Result-file prefixes stripped from model ids for display.
const DISPLAY_PREFIXES: [&str; 2] = ["results-csv_", "result-csv_"];

// ---------------------------------------------------------------------------
// Selection state – one interaction's worth of UI input
// ---------------------------------------------------------------------------

/// What the user currently has selected. Rebuilt on every interaction.
///
/// `chosen` is kept in ascending model-id order so that the
/// "ground truth from the first model that carries it" rule below is
/// deterministic regardless of click order.
#[derive(Debug, Clone)]
pub struct Selection {
    pub chosen: Vec<String>,
    /// `(start, end)` indices into the global date index, inclusive.
    pub range: (usize, usize),
}

// ---------------------------------------------------------------------------
// Chart specification – renderer-agnostic output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct PlotLine {
    pub label: String,
    /// One point per day in the window; `None` renders as a gap.
    pub points: Vec<(NaiveDate, Option<f64>)>,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisConfig {
    pub y_min: f64,
    pub y_max: f64,
    pub y_tick_step: f64,
}

/// Declarative description of one render: ordered lines plus axis policy.
/// `axis` is `None` when there is nothing to plot.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub lines: Vec<PlotLine>,
    pub axis: Option<AxisConfig>,
}

impl ChartSpec {
    /// Empty chart carrying an error message as its title. The render
    /// boundary falls back to this instead of crashing the session.
    pub fn diagnostic(message: impl Into<String>) -> Self {
        ChartSpec {
            title: message.into(),
            lines: Vec::new(),
            axis: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("date range indices ({start}, {end}) out of bounds for {len} days")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("unknown model id '{0}'")]
    UnknownModel(String),
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Map the current selection onto a chart specification.
///
/// Ground truth is emitted at most once across the whole selection, from the
/// first chosen model whose window carries any non-null ground truth, to
/// avoid duplicate overlapping "actual" lines when several models share it.
/// Every chosen model always contributes one dashed prediction line.
pub fn project(
    store: &SeriesStore,
    date_index: &DateIndex,
    selection: &Selection,
) -> Result<ChartSpec, ProjectError> {
    let (start, end) = selection.range;
    let (Some(start_date), Some(end_date)) = (date_index.get(start), date_index.get(end)) else {
        return Err(ProjectError::RangeOutOfBounds {
            start,
            end,
            len: date_index.len(),
        });
    };
    if start > end {
        return Err(ProjectError::RangeOutOfBounds {
            start,
            end,
            len: date_index.len(),
        });
    }

    let title = format!(
        "Smooth Time-Series Data from {} to {}",
        start_date.format("%Y-%m-%d"),
        end_date.format("%Y-%m-%d"),
    );

    let mut lines = Vec::new();
    let mut all_values: Vec<f64> = Vec::new();
    let mut ground_truth_emitted = false;

    for model_id in &selection.chosen {
        let series = store
            .get(model_id)
            .ok_or_else(|| ProjectError::UnknownModel(model_id.clone()))?;
        let window = series.rows_between(start_date, end_date);

        if !ground_truth_emitted && window.iter().any(|r| r.ground_truth.is_some()) {
            let points: Vec<(NaiveDate, Option<f64>)> =
                window.iter().map(|r| (r.date, r.ground_truth)).collect();
            all_values.extend(points.iter().filter_map(|(_, v)| *v));
            lines.push(PlotLine {
                label: ACTUAL_VALUES_LABEL.to_string(),
                points,
                dashed: false,
            });
            ground_truth_emitted = true;
        }

        let points: Vec<(NaiveDate, Option<f64>)> =
            window.iter().map(|r| (r.date, r.predicted)).collect();
        all_values.extend(points.iter().filter_map(|(_, v)| *v));
        lines.push(PlotLine {
            label: display_name(model_id),
            points,
            dashed: true,
        });
    }

    let axis = axis_for(&all_values);

    Ok(ChartSpec { title, lines, axis })
}

/// Model id with known result-file prefixes stripped.
pub fn display_name(model_id: &str) -> String {
    let mut name = model_id;
    for prefix in DISPLAY_PREFIXES {
        name = name.strip_prefix(prefix).unwrap_or(name);
    }
    name.to_string()
}

/// Quantized axis policy: floor fixed at zero, ceiling at the smallest
/// multiple of [`Y_TICK_UNIT`] strictly above the largest plotted value.
/// No values → no axis config.
fn axis_for(all_values: &[f64]) -> Option<AxisConfig> {
    let max = all_values.iter().copied().reduce(f64::max)?;
    Some(AxisConfig {
        y_min: 0.0,
        y_max: ((max / Y_TICK_UNIT).floor() + 1.0) * Y_TICK_UNIT,
        y_tick_step: Y_TICK_UNIT,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CanonicalSeries, DailyRow};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Series with one row per value pair, starting 2024-01-01.
    fn series(model_id: &str, values: &[(Option<f64>, Option<f64>)]) -> CanonicalSeries {
        let rows = date(2024, 1, 1)
            .iter_days()
            .zip(values.iter())
            .map(|(d, &(gt, pred))| DailyRow {
                date: d,
                ground_truth: gt,
                predicted: pred,
            })
            .collect();
        CanonicalSeries {
            model_id: model_id.to_string(),
            rows,
        }
    }

    fn store_of(all: Vec<CanonicalSeries>) -> (SeriesStore, DateIndex) {
        let store = SeriesStore::from_series(all);
        let index = store.date_index();
        (store, index)
    }

    #[test]
    fn empty_selection_yields_empty_chart_not_an_error() {
        let (store, index) = store_of(vec![series(
            "a",
            &[(Some(1.0), Some(2.0)), (Some(1.0), Some(2.0))],
        )]);
        let spec = project(
            &store,
            &index,
            &Selection {
                chosen: vec![],
                range: (0, 1),
            },
        )
        .unwrap();
        assert!(spec.lines.is_empty());
        assert!(spec.axis.is_none());
        assert_eq!(
            spec.title,
            "Smooth Time-Series Data from 2024-01-01 to 2024-01-02"
        );
    }

    #[test]
    fn ground_truth_is_emitted_at_most_once() {
        let shared = [(Some(500.0), Some(400.0)), (Some(600.0), Some(450.0))];
        let (store, index) = store_of(vec![series("a", &shared), series("b", &shared)]);
        let spec = project(
            &store,
            &index,
            &Selection {
                chosen: vec!["a".into(), "b".into()],
                range: (0, 1),
            },
        )
        .unwrap();

        let actual_lines = spec
            .lines
            .iter()
            .filter(|l| l.label == ACTUAL_VALUES_LABEL)
            .count();
        assert_eq!(actual_lines, 1);
        // one solid + two dashed
        assert_eq!(spec.lines.len(), 3);
        assert!(!spec.lines[0].dashed);
        assert!(spec.lines[1].dashed && spec.lines[2].dashed);
    }

    #[test]
    fn ground_truth_comes_from_first_model_that_carries_it() {
        // "a" has no ground truth in the window; "b" does.
        let (store, index) = store_of(vec![
            series("a", &[(None, Some(10.0)), (None, Some(20.0))]),
            series("b", &[(Some(111.0), Some(30.0)), (Some(222.0), Some(40.0))]),
        ]);
        let spec = project(
            &store,
            &index,
            &Selection {
                chosen: vec!["a".into(), "b".into()],
                range: (0, 1),
            },
        )
        .unwrap();

        let actual = spec
            .lines
            .iter()
            .find(|l| l.label == ACTUAL_VALUES_LABEL)
            .unwrap();
        assert_eq!(actual.points[0].1, Some(111.0));
    }

    #[test]
    fn prediction_line_is_always_emitted_even_without_ground_truth() {
        let (store, index) = store_of(vec![series("a", &[(None, Some(5.0)), (None, None)])]);
        let spec = project(
            &store,
            &index,
            &Selection {
                chosen: vec!["a".into()],
                range: (0, 1),
            },
        )
        .unwrap();
        assert_eq!(spec.lines.len(), 1);
        assert!(spec.lines[0].dashed);
        // nulls pass through as gaps
        assert_eq!(spec.lines[0].points[1].1, None);
    }

    #[test]
    fn y_max_snaps_to_the_next_tick_multiple() {
        assert_eq!(
            axis_for(&[1999.0]),
            Some(AxisConfig {
                y_min: 0.0,
                y_max: 2000.0,
                y_tick_step: 2000.0
            })
        );
        // an exact multiple still snaps strictly upward
        assert_eq!(axis_for(&[2000.0]).unwrap().y_max, 4000.0);
        assert_eq!(axis_for(&[4500.0]).unwrap().y_max, 6000.0);
        assert_eq!(axis_for(&[]), None);
    }

    #[test]
    fn floor_never_drops_below_zero() {
        let axis = axis_for(&[-900.0, -100.0]).unwrap();
        assert_eq!(axis.y_min, 0.0);
        assert_eq!(axis.y_max % Y_TICK_UNIT, 0.0);
        assert!(axis.y_max > -100.0);
    }

    #[test]
    fn out_of_bounds_range_is_a_typed_error() {
        let (store, index) = store_of(vec![series("a", &[(Some(1.0), None)])]);
        let err = project(
            &store,
            &index,
            &Selection {
                chosen: vec!["a".into()],
                range: (0, 5),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProjectError::RangeOutOfBounds {
                start: 0,
                end: 5,
                len: 1
            }
        );
    }

    #[test]
    fn unknown_model_is_a_typed_error() {
        let (store, index) = store_of(vec![series("a", &[(Some(1.0), None)])]);
        let err = project(
            &store,
            &index,
            &Selection {
                chosen: vec!["ghost".into()],
                range: (0, 0),
            },
        )
        .unwrap_err();
        assert_eq!(err, ProjectError::UnknownModel("ghost".into()));
    }

    #[test]
    fn display_name_strips_result_file_prefixes() {
        assert_eq!(display_name("results-csv_lstm"), "lstm");
        assert_eq!(display_name("result-csv_arima"), "arima");
        assert_eq!(display_name("prophet"), "prophet");
    }

    #[test]
    fn window_filter_is_inclusive_on_both_ends() {
        let (store, index) = store_of(vec![series(
            "a",
            &[
                (Some(1.0), Some(1.0)),
                (Some(2.0), Some(2.0)),
                (Some(3.0), Some(3.0)),
            ],
        )]);
        let spec = project(
            &store,
            &index,
            &Selection {
                chosen: vec!["a".into()],
                range: (1, 2),
            },
        )
        .unwrap();
        let actual = &spec.lines[0];
        assert_eq!(actual.points.len(), 2);
        assert_eq!(actual.points[0].0, date(2024, 1, 2));
        assert_eq!(actual.points[1].0, date(2024, 1, 3));
    }
}
