//! Aggregation layer: everything the dashboard derives from a filtered view.
//!
//! ```text
//!   FilteredView
//!        │
//!        ├──▶ kpi        counts and sums
//!        ├──▶ counts     frequency tables, top-N
//!        ├──▶ histogram  fixed-width / fixed-category buckets
//!        └──▶ geo        random coordinate samples for the maps
//! ```
//!
//! Every function is total: an empty view yields zeros or empty sequences.

pub mod counts;
pub mod geo;
pub mod histogram;
pub mod kpi;

pub use counts::{top_n, value_counts, CategoryCount};
pub use geo::geo_sample;
pub use histogram::{histogram, Bucket, BucketSpec, HistogramBin};
pub use kpi::{count_flag, sum_distance, total_trip_count, Kpis};
