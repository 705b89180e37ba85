/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  https:// .csv  |  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse once → Arc<SalaryDataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  per-column allowed sets → FilteredTable
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ metrics   │   │  charts   │  top-N, histogram, counts, country means
///   └──────────┘   └──────────┘
///        │              │
///        └──────┬───────┘
///               ▼
///        ┌───────────┐
///        │ dashboard  │  one recomputation per interaction
///        └───────────┘
/// ```

pub mod charts;
pub mod dashboard;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
