//! Salary dashboard: load a data-career salary survey, filter it, and show
//! summary metrics, charts and the matching records.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod report;
pub mod state;
pub mod ui;
