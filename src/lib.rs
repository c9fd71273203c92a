//! Interactive explorer for a static taxi-trip dataset: load once, narrow
//! with a handful of filters, recompute KPIs, distributions and map samples.

pub mod app;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod metrics;
pub mod state;
pub mod ui;
