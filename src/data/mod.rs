/// Data layer: listings, loading, filtering, and the derived views.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (+ market baseline, bounds)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply range predicates → FilteredView
///   └──────────┘
///        │
///        ├──────────────┬──────────────┬──────────────┐
///        ▼              ▼              ▼              ▼
///   ┌────────┐    ┌────────┐    ┌────────┐    ┌───────────┐
///   │ stats  │    │  rank  │    │ group  │    │ histogram │
///   └────────┘    └────────┘    └────────┘    └───────────┘
///        └──────────────┴──── insights ┴──────────────┘
///                                 │
///                                 ▼
///                          export (CSV bytes)
/// ```

pub mod export;
pub mod filter;
pub mod group;
pub mod histogram;
pub mod insights;
pub mod loader;
pub mod model;
pub mod rank;
pub mod stats;
