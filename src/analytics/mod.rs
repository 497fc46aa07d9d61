//! The metric engine: month series normalization, aggregation, baselines,
//! shares, default selection and annual rollups.
//!
//! Every function here is pure. Callers pass in the reference date and any
//! selection state they hold, and get back values that can be rendered
//! directly.

mod aggregation;
mod average;
mod record;
mod report;
mod rollup;
mod series;
mod share;
mod top_n;

pub use aggregation::{EntitySeries, MetricAggregator, fold_long_tail};
pub use average::{AverageClassifier, Baseline, classify};
pub use record::{
    AggregatedTableItem, DerivedMetricView, FALLBACK_COLOR, FlowType, MetricStatus, MonthSlot,
    MonthlyMetricRecord, OTHERS_ID, OTHERS_LABEL, Scope,
};
pub use report::{DashboardReport, DrillDown, Period, ReportRequest, build_report};
pub use rollup::{ScalarRollup, annual_rollup};
pub use series::MonthSeries;
pub use share::{distribute, share_of};
pub use top_n::{DEFAULT_TOP_N, SelectionState, suggest_default_selection, top_entities};
