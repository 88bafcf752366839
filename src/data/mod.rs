/// Data layer: core types, loading, derivation, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │  loader   │ ──▶ │  derive   │  ToBePromoted, ToBeRetrenched,
///   └──────────┘     └──────────┘  WorkExperience, PctAtCompany
///        │
///        ▼
///   ┌───────────┐    ┌──────────┐
///   │ HrDataset  │ ◀─ │  cache    │  reuse until the file changes
///   └───────────┘    └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  active constraints → row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  counts, percentages, group means
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ insights  │  findings judged against configured targets
///   └──────────┘
/// ```

pub mod cache;
pub mod derive;
pub mod export;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod model;
pub mod schema;
pub mod stats;
