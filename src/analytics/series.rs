//! Dense month sequences built from the sparse upstream payload.
//!
//! A single-year window always has twelve contiguous slots, January to
//! December, so that charts get a stable x-axis. Months missing from the
//! payload are synthesized with no records and zero totals. Windows spanning
//! several years are left as the upstream sent them.

use std::collections::{BTreeSet, HashMap, HashSet};

use time::Month;

use crate::{
    Error,
    analytics::record::{FALLBACK_COLOR, FlowType, MonthSlot, MonthlyMetricRecord},
    dimension::Dimension,
    month::{month_from_index, resolve_month, short_label},
    response::{DashboardResponse, DashboardMetric, MonthlyData},
};

/// An ordered sequence of month slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSeries {
    slots: Vec<MonthSlot>,
}

impl MonthSeries {
    /// Build a series from month slots, filling gaps for single-year input.
    ///
    /// - Empty input produces an empty series.
    /// - If every slot has the same year, the result has exactly twelve slots
    ///   ordered January to December.
    /// - Otherwise the slots are kept in source order and may be sparse.
    ///
    /// # Errors
    /// Returns [Error::DuplicateMonth] if the same calendar month appears twice.
    pub fn gap_filled(slots: Vec<MonthSlot>) -> Result<Self, Error> {
        ensure_unique_months(&slots)?;

        let Some(year) = slots.first().map(|slot| slot.year) else {
            return Ok(Self::default());
        };

        if slots.iter().any(|slot| slot.year != year) {
            tracing::debug!(
                "month series spans several years, keeping {} slots as given",
                slots.len()
            );
            return Ok(Self { slots });
        }

        let mut by_month: HashMap<Month, MonthSlot> =
            slots.into_iter().map(|slot| (slot.month, slot)).collect();
        let source_count = by_month.len();

        let slots: Vec<MonthSlot> = (0..12)
            .filter_map(month_from_index)
            .map(|month| {
                by_month
                    .remove(&month)
                    .unwrap_or_else(|| MonthSlot::empty(year, month))
            })
            .collect();

        tracing::debug!(
            "synthesized {} empty months for {year}",
            slots.len() - source_count
        );

        Ok(Self { slots })
    }

    /// Normalize an upstream payload for `dimension` and fill month gaps.
    ///
    /// Records missing a name fall back to their key, and records missing a
    /// colour fall back to [FALLBACK_COLOR].
    ///
    /// # Errors
    /// Returns an error if a month cannot be parsed, a month appears twice, or
    /// a metric has no entity key.
    pub fn from_response(response: &DashboardResponse, dimension: Dimension) -> Result<Self, Error> {
        let slots = response
            .months
            .iter()
            .map(|data| month_slot_from_data(data, dimension))
            .collect::<Result<Vec<_>, _>>()?;

        Self::gap_filled(slots)
    }

    /// The slots in order.
    pub fn slots(&self) -> &[MonthSlot] {
        &self.slots
    }

    /// Consume the series, returning its slots.
    pub fn into_slots(self) -> Vec<MonthSlot> {
        self.slots
    }

    /// The number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the series has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get the slot at `position`.
    ///
    /// # Errors
    /// Returns [Error::MonthOutOfRange] if `position` is not in the series.
    pub fn slot(&self, position: usize) -> Result<&MonthSlot, Error> {
        self.slots.get(position).ok_or(Error::MonthOutOfRange {
            index: position,
            len: self.slots.len(),
        })
    }

    /// Find the position of a calendar month.
    pub fn position_of(&self, year: i32, month: Month) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.year == year && slot.month == month)
    }

    /// The year shared by every slot, or `None` for empty or multi-year series.
    pub fn single_year(&self) -> Option<i32> {
        let year = self.slots.first()?.year;

        self.slots
            .iter()
            .all(|slot| slot.year == year)
            .then_some(year)
    }
}

fn ensure_unique_months(slots: &[MonthSlot]) -> Result<(), Error> {
    let mut seen = HashSet::new();

    for slot in slots {
        if !seen.insert((slot.year, slot.month)) {
            return Err(Error::DuplicateMonth {
                year: slot.year,
                month: slot.month,
            });
        }
    }

    Ok(())
}

fn month_slot_from_data(data: &MonthlyData, dimension: Dimension) -> Result<MonthSlot, Error> {
    let month = resolve_month(&data.month_short, &data.month)?;
    let month_label = if data.month.trim().is_empty() {
        month.to_string()
    } else {
        data.month.clone()
    };

    let mut records: Vec<MonthlyMetricRecord> = Vec::with_capacity(data.metrics.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for metric in &data.metrics {
        let record = record_from_metric(metric, dimension, &month_label)?;

        match positions.get(&record.entity_id) {
            Some(&position) => {
                let target = &mut records[position];
                let flows = (target.flow_type, record.flow_type);
                tracing::warn!(
                    "{dimension} {} appears twice in {month_label} {} with flow types {:?} and {:?}, merging the records",
                    record.entity_id,
                    data.year,
                    flows.0,
                    flows.1
                );
                merge_into(target, record);
                if flows.0 != flows.1 {
                    target.flow_type = FlowType::from_sign(target.total);
                }
            }
            None => {
                positions.insert(record.entity_id.clone(), records.len());
                records.push(record);
            }
        }
    }

    Ok(MonthSlot {
        year: data.year,
        month,
        label: month_label,
        short_label: short_label(month),
        records,
        revenue: data.revenue,
        expenses: data.expenses,
        investments: data.investments,
        balance: data.balance,
    })
}

fn record_from_metric(
    metric: &DashboardMetric,
    dimension: Dimension,
    month_label: &str,
) -> Result<MonthlyMetricRecord, Error> {
    let entity_id = dimension
        .entity_key(metric)
        .ok_or_else(|| Error::MissingEntityKey {
            month: month_label.to_owned(),
        })?;

    let name = match metric.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => {
            tracing::warn!("{dimension} {entity_id} has no name, using its key instead");
            entity_id.clone()
        }
    };

    let color_hex = match metric.color.as_deref().map(str::trim) {
        Some(color) if !color.is_empty() => color.to_owned(),
        _ => FALLBACK_COLOR.to_owned(),
    };

    let flow_type = metric
        .flow_type
        .unwrap_or_else(|| FlowType::from_sign(metric.total));

    let grouped_ids = metric
        .grouped_ids
        .as_ref()
        .map(|ids| ids.iter().cloned().collect::<BTreeSet<String>>());

    Ok(MonthlyMetricRecord {
        entity_id,
        name,
        color_hex,
        flow_type,
        total: metric.total,
        grouped_ids,
    })
}

/// Add `other` into `target`, unioning their grouped IDs.
pub(super) fn merge_into(target: &mut MonthlyMetricRecord, other: MonthlyMetricRecord) {
    target.total += other.total;

    target.grouped_ids = match (target.grouped_ids.take(), other.grouped_ids) {
        (Some(mut ids), Some(other_ids)) => {
            ids.extend(other_ids);
            Some(ids)
        }
        (ids, other_ids) => ids.or(other_ids),
    };
}
