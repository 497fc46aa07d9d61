//! Runs the whole engine for one dimension and period.

use std::collections::BTreeSet;

use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    analytics::{
        aggregation::{EntitySeries, MetricAggregator, fold_long_tail},
        average::AverageClassifier,
        record::{AggregatedTableItem, DerivedMetricView, Scope},
        rollup::ScalarRollup,
        series::MonthSeries,
        top_n::SelectionState,
    },
    config::AnalyticsConfig,
    dimension::Dimension,
    drill_down::{DateWindow, TransactionFilter},
    response::DashboardResponse,
};

/// The period a report is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// One calendar month, which must be in the series.
    Month {
        /// The calendar year.
        year: i32,
        /// The calendar month.
        month: Month,
    },
    /// Every month in the series.
    Annual,
}

/// The inputs of a single report, besides the payload and settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub dimension: Dimension,
    pub period: Period,
    /// The date "today" is taken to be. Later months are left out of averages.
    pub reference_date: Date,
    /// The selection the caller currently holds for the comparison views.
    pub selection: Vec<String>,
    /// Whether the user chose `selection` themselves this session.
    pub user_has_selected: bool,
}

/// A link from a table row to the matching transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillDown {
    pub key: String,
    pub filter: TransactionFilter,
    pub query: String,
}

/// Everything the dashboard needs to render one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub dimension: Dimension,
    pub scope: Scope,
    /// The label of the month the report covers, or "Annual".
    pub period_label: String,
    /// Scalar totals for the period.
    pub summary: ScalarRollup,
    /// Whether the whole-series scalar totals match the upstream summary.
    pub reconciled: bool,
    pub table: Vec<AggregatedTableItem>,
    /// Month-scope views with their baselines. Empty for annual reports.
    pub comparison: Vec<DerivedMetricView>,
    /// The selection after the default has been considered.
    pub selection: Vec<String>,
    pub default_applied: bool,
    /// Short labels of every month, the x-axis of `evolution`.
    pub months: Vec<String>,
    pub evolution: Vec<EntitySeries>,
    pub drill_downs: Vec<DrillDown>,
}

/// Build the report for `request` from an upstream payload.
///
/// # Errors
/// Returns an error if the payload cannot be normalized, the requested month
/// is not in the series, or a drill-down date range cannot be built.
pub fn build_report(
    response: &DashboardResponse,
    request: &ReportRequest,
    config: &AnalyticsConfig,
) -> Result<DashboardReport, Error> {
    let series = MonthSeries::from_response(response, request.dimension)?;
    let flow = config.flow_type;

    let whole_series = ScalarRollup::from_series(&series);
    let reconciled = whole_series.reconciles_with(&response.summary);
    if !reconciled {
        tracing::warn!(
            "scalar totals {whole_series:?} do not match the upstream summary {:?}",
            response.summary
        );
    }

    let scope = match request.period {
        Period::Month { year, month } => Scope::Month(
            series
                .position_of(year, month)
                .ok_or(Error::MonthNotInSeries { year, month })?,
        ),
        Period::Annual => Scope::Annual,
    };

    let (summary, period_label, window) = match scope {
        Scope::Month(position) => {
            let slot = series.slot(position)?;
            (
                ScalarRollup {
                    revenue: slot.revenue,
                    expenses: slot.expenses,
                    investments: slot.investments,
                    balance: slot.balance,
                },
                slot.label.clone(),
                DateWindow::Month {
                    year: slot.year,
                    month: slot.month,
                },
            )
        }
        Scope::Annual => (
            whole_series,
            "Annual".to_owned(),
            match series.single_year() {
                Some(year) => DateWindow::Year(year),
                None => DateWindow::LastTwelveMonths {
                    reference: request.reference_date,
                },
            },
        ),
    };

    let aggregator = MetricAggregator::new(&series, flow);

    let mut table = aggregator.table_items(scope, Some(request.reference_date))?;
    if let Some(max_entities) = config.max_table_entities {
        table = fold_long_tail(table, max_entities);
    }

    let comparison = match scope {
        Scope::Month(position) => AverageClassifier::new(&series, flow, Some(request.reference_date))
            .derive_views(position)?,
        Scope::Annual => Vec::new(),
    };

    let mut selection = SelectionState::restore(request.selection.clone(), request.user_has_selected);
    let default_applied = selection.apply_default(&series, flow, config.top_n);

    let evolution = aggregator.evolution_series(selection.selected());

    let drill_downs = table
        .iter()
        .map(|item| drill_down(request.dimension, item, window))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "built {} report for {period_label} with {} rows",
        request.dimension,
        table.len()
    );

    Ok(DashboardReport {
        dimension: request.dimension,
        scope,
        period_label,
        summary,
        reconciled,
        table,
        comparison,
        selection: selection.selected().to_vec(),
        default_applied,
        months: series
            .slots()
            .iter()
            .map(|slot| slot.short_label.clone())
            .collect(),
        evolution,
        drill_downs,
    })
}

fn drill_down(
    dimension: Dimension,
    item: &AggregatedTableItem,
    window: DateWindow,
) -> Result<DrillDown, Error> {
    let grouped_ids: Option<&BTreeSet<String>> = item.grouped_ids.as_ref();
    let filter = dimension.drill_down_filter(&item.key, grouped_ids, window)?;

    Ok(DrillDown {
        key: item.key.clone(),
        query: filter.to_query_string(),
        filter,
    })
}
