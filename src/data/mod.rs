/// Data layer: core types, loading, column resolution and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RecordSet (trimmed headers, group labels)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolver  │  schema + band prefixes + montage → ColumnMapping
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  selected groups → per-band, per-group mean series
///   └───────────┘
/// ```
///
/// [`session::Session`] bundles the loaded table and its mapping.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod resolver;
pub mod session;
