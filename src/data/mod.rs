/// Data layer: core types, loading/reconciliation, and chart projection.
///
/// Architecture:
/// ```text
///  model_data/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + normalize schema → daily-interpolated series
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ SeriesStore  │  model id → CanonicalSeries (immutable after startup)
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  project  │  selection + date window → ChartSpec
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod project;
