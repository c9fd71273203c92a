//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!   candidate paths (.csv / .parquet)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  first readable source → Dataset (or empty + diagnostic)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │   Dataset     │  Vec<TripRecord>, shared read-only
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterCriteria → FilteredView (row indices)
//!   └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
