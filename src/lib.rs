//! [![github]](https://github.com/AnthonyDickson/budgeteur-rs)&ensp;
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//!
//! <br>
//!
//! Dashboard metrics turns the monthly breakdown served by a personal finance
//! backend into the comparative views of a dashboard.
//!
//! This library provides per-month and annual tables with shares of the
//! total, above/below-average classification against the other months,
//! default top-N selections, annual rollups and drill-down filters for the
//! transaction search. Everything is computed from a [DashboardResponse] and
//! an explicit reference date; nothing here reads the clock or does I/O
//! beyond loading files the caller names.

pub mod analytics;
pub mod config;
pub mod dimension;
pub mod drill_down;
mod error;
pub mod format;
pub mod logging;
pub mod month;
pub mod response;
pub mod timezone;

pub use analytics::{DashboardReport, MonthSeries, Period, ReportRequest, build_report};
pub use config::AnalyticsConfig;
pub use dimension::Dimension;
pub use error::Error;
pub use response::DashboardResponse;
