//! Per-entity aggregation of a month series into table rows and chart series.
//!
//! Provides the rows behind the expense tables and donuts, the "Others"
//! long-tail fold, and the per-entity monthly series behind trend lines.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    analytics::{
        average::AverageClassifier,
        record::{
            AggregatedTableItem, FALLBACK_COLOR, FlowType, MetricStatus, MonthlyMetricRecord,
            OTHERS_ID, OTHERS_LABEL, Scope,
        },
        rollup::annual_rollup,
        series::MonthSeries,
        share::distribute,
    },
};

/// Aggregates the records of a series for one flow type.
#[derive(Debug, Clone, Copy)]
pub struct MetricAggregator<'a> {
    series: &'a MonthSeries,
    flow: Option<FlowType>,
}

impl<'a> MetricAggregator<'a> {
    /// Create an aggregator over `series`. A `flow` of `None` includes every
    /// record.
    pub fn new(series: &'a MonthSeries, flow: Option<FlowType>) -> Self {
        Self { series, flow }
    }

    /// Build one table row per entity over `scope`.
    ///
    /// For a single month, rows carry the status of the value against the
    /// average of the other months. Annual rows have no baseline and carry
    /// [MetricStatus::Unknown]. Percentages are shares of the scope's total
    /// absolute value, and are all zero when that total is zero.
    ///
    /// Rows are sorted by descending value. Ties keep the order entities were
    /// first seen.
    ///
    /// # Errors
    /// Returns [Error::MonthOutOfRange] if a month scope is not in the series.
    pub fn table_items(
        &self,
        scope: Scope,
        reference_date: Option<Date>,
    ) -> Result<Vec<AggregatedTableItem>, Error> {
        let rows: Vec<(MonthlyMetricRecord, MetricStatus)> = match scope {
            Scope::Month(position) => {
                let classifier = AverageClassifier::new(self.series, self.flow, reference_date);

                let mut rows = self
                    .series
                    .slot(position)?
                    .records_matching(self.flow)
                    .map(|record| -> Result<_, Error> {
                        let baseline = classifier.baseline(position, &record.entity_id)?;
                        Ok((record.clone(), baseline.status))
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                rows.sort_by(|(a, _), (b, _)| b.value().cmp(&a.value()));
                rows
            }
            Scope::Annual => annual_rollup(self.series, self.flow)
                .into_iter()
                .map(|record| (record, MetricStatus::Unknown))
                .collect(),
        };

        let values: Vec<Decimal> = rows.iter().map(|(record, _)| record.value()).collect();
        let shares = distribute(&values);

        Ok(rows
            .into_iter()
            .zip(shares)
            .map(|((record, status), percent)| AggregatedTableItem {
                value: record.value(),
                key: record.entity_id,
                name: record.name,
                color: record.color_hex,
                percent,
                status,
                grouped_ids: record.grouped_ids,
            })
            .collect())
    }

    /// The absolute value of each entity in `entity_ids` for every month.
    ///
    /// Entities absent from a month get zero for that month. Entities never
    /// seen in the series are still returned, named by their ID.
    pub fn evolution_series(&self, entity_ids: &[String]) -> Vec<EntitySeries> {
        entity_ids
            .iter()
            .map(|entity_id| {
                let mut first_seen: Option<&MonthlyMetricRecord> = None;

                let values = self
                    .series
                    .slots()
                    .iter()
                    .map(|slot| {
                        let record = slot
                            .records_matching(self.flow)
                            .find(|record| &record.entity_id == entity_id);
                        if first_seen.is_none() {
                            first_seen = record;
                        }
                        record.map(|record| record.value()).unwrap_or(Decimal::ZERO)
                    })
                    .collect();

                EntitySeries {
                    key: entity_id.clone(),
                    name: first_seen
                        .map(|record| record.name.clone())
                        .unwrap_or_else(|| entity_id.clone()),
                    color: first_seen
                        .map(|record| record.color_hex.clone())
                        .unwrap_or_else(|| FALLBACK_COLOR.to_owned()),
                    values,
                }
            })
            .collect()
    }
}

/// One entity's value in every month of a series, for trend lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySeries {
    pub key: String,
    pub name: String,
    pub color: String,
    /// One value per slot of the series, in slot order.
    pub values: Vec<Decimal>,
}

/// Fold the rows beyond a display cutoff into a single "Others" row.
///
/// When there are more than `max_entities` rows, the first
/// `max_entities - 1` are kept and the rest are folded. The folded row sums
/// the values and percentages of the rows it replaces, and its grouped IDs
/// are the union of their keys and of any grouped IDs they carried. If an
/// "Others" row is already among the kept rows, the tail is merged into it,
/// so the result never holds two rows with the same key.
///
/// The result is sorted by descending value. Ties keep their input order.
/// Folding is disabled when `max_entities` is less than 2.
pub fn fold_long_tail(items: Vec<AggregatedTableItem>, max_entities: usize) -> Vec<AggregatedTableItem> {
    if max_entities < 2 || items.len() <= max_entities {
        return items;
    }

    let mut kept = items;
    let tail = kept.split_off(max_entities - 1);

    let mut members = BTreeSet::new();
    let mut value = Decimal::ZERO;
    let mut percent = 0.0;
    let mut color = None;

    for item in tail {
        value += item.value;
        percent += item.percent;

        if item.key == OTHERS_ID {
            if item.grouped_ids.is_none() {
                tracing::warn!(
                    "{OTHERS_ID} row worth {} has no grouped IDs, its members cannot be drilled into",
                    item.value
                );
            }
            color = Some(item.color);
        } else {
            members.insert(item.key);
        }

        if let Some(ids) = item.grouped_ids {
            members.extend(ids);
        }
    }

    tracing::debug!("folded {} entities into {OTHERS_ID}", members.len());

    match kept.iter_mut().find(|item| item.key == OTHERS_ID) {
        Some(others) => {
            others.value += value;
            others.percent += percent;
            others
                .grouped_ids
                .get_or_insert_with(BTreeSet::new)
                .extend(members);
        }
        None => kept.push(AggregatedTableItem {
            key: OTHERS_ID.to_owned(),
            name: OTHERS_LABEL.to_owned(),
            value,
            color: color.unwrap_or_else(|| FALLBACK_COLOR.to_owned()),
            percent,
            status: MetricStatus::Unknown,
            grouped_ids: Some(members),
        }),
    }

    kept.sort_by(|a, b| b.value.cmp(&a.value));
    kept
}
