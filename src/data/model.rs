use std::collections::BTreeMap;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Raw input – one CSV as parsed, before reconciliation
// ---------------------------------------------------------------------------

/// One row of a source CSV after schema normalization.
/// Whichever predicted-value alias the file used, it lands in `predicted`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRow {
    pub date: NaiveDate,
    pub ground_truth: Option<f64>,
    pub predicted: Option<f64>,
}

/// One input dataset: a model's raw series as read from disk.
/// Rows need not be sorted, contiguous, or free of duplicate dates.
#[derive(Debug, Clone)]
pub struct RawSeriesRecord {
    /// Unique model identifier, derived from the source file stem.
    pub model_id: String,
    pub rows: Vec<RawRow>,
}

// ---------------------------------------------------------------------------
// Canonical series – one row per calendar day
// ---------------------------------------------------------------------------

/// One day of a canonical series. `None` marks a gap interpolation could not
/// fill (leading/trailing, or a column the source never carried).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub ground_truth: Option<f64>,
    pub predicted: Option<f64>,
}

/// A model's series resampled to one row per calendar day over its own
/// min–max range, gaps linearly interpolated.
///
/// Invariant: `rows` is non-empty and strictly increasing by one day, so
/// `rows.len() == (max_date - min_date).num_days() + 1`.
#[derive(Debug, Clone)]
pub struct CanonicalSeries {
    pub model_id: String,
    pub rows: Vec<DailyRow>,
}

impl CanonicalSeries {
    pub fn min_date(&self) -> NaiveDate {
        self.rows[0].date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.rows[self.rows.len() - 1].date
    }

    /// Slice of rows with dates in `[start, end]` inclusive. Because rows
    /// form a contiguous daily calendar this is pure index arithmetic.
    pub fn rows_between(&self, start: NaiveDate, end: NaiveDate) -> &[DailyRow] {
        let (min, max) = (self.min_date(), self.max_date());
        let lo = start.max(min);
        let hi = end.min(max);
        if lo > hi {
            return &[];
        }
        let from = (lo - min).num_days() as usize;
        let to = (hi - min).num_days() as usize;
        &self.rows[from..=to]
    }
}

// ---------------------------------------------------------------------------
// SeriesStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Process-lifetime mapping model id → canonical series. Built once at
/// startup, read-only afterwards; rebuilding requires a restart.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    series: BTreeMap<String, CanonicalSeries>,
}

impl SeriesStore {
    pub fn from_series(all: Vec<CanonicalSeries>) -> Self {
        let series = all
            .into_iter()
            .map(|s| (s.model_id.clone(), s))
            .collect();
        SeriesStore { series }
    }

    pub fn get(&self, model_id: &str) -> Option<&CanonicalSeries> {
        self.series.get(model_id)
    }

    /// Model ids in ascending order.
    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Union date range across all series, as a scrub-bar date index.
    pub fn date_index(&self) -> DateIndex {
        let min = self.series.values().map(|s| s.min_date()).min();
        let max = self.series.values().map(|s| s.max_date()).max();
        match (min, max) {
            (Some(min), Some(max)) => DateIndex::new(min, max),
            _ => DateIndex { days: Vec::new() },
        }
    }
}

// ---------------------------------------------------------------------------
// DateIndex – global range-slider domain
// ---------------------------------------------------------------------------

/// Every calendar day in the global min–max range, in order. Translates a
/// scrub-bar integer position into a concrete date.
#[derive(Debug, Clone)]
pub struct DateIndex {
    days: Vec<NaiveDate>,
}

impl DateIndex {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        let days = min.iter_days().take_while(|d| *d <= max).collect();
        DateIndex { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.days.get(index).copied()
    }

    /// Human-readable label for a slider position (`YYYY-MM-DD`).
    pub fn label(&self, index: usize) -> String {
        match self.get(index) {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => String::new(),
        }
    }
}
