/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (or LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<SleepRecord>, extra column names
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  occupation + min sleep → filtered Dataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────┐
///   │ summary / aggregate  │  means, per-age line, per-gender boxes
///   └─────────────────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
