//! Value types shared by the analytics components.
//!
//! Every type here is recomputed per query. Transformations take these by
//! reference and return new values rather than mutating their inputs.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::month::short_label;

/// The entity ID of the synthetic bucket that aggregates long-tail entities.
pub const OTHERS_ID: &str = "__others__";

/// The display name given to an "Others" bucket created by the engine.
pub const OTHERS_LABEL: &str = "Others";

/// The colour used when a record does not specify one.
pub const FALLBACK_COLOR: &str = "#9ca3af";

/// The direction money moved for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Transfers and other movements that are neither.
    Neutral,
}

impl FlowType {
    /// Infer the flow type from the sign of an amount.
    pub fn from_sign(total: Decimal) -> Self {
        if total.is_zero() {
            FlowType::Neutral
        } else if total.is_sign_negative() {
            FlowType::Expense
        } else {
            FlowType::Income
        }
    }
}

/// How a value compares with its baseline average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    /// The value is greater than the baseline.
    AboveAverage,
    /// The value is less than the baseline.
    BelowAverage,
    /// The value equals the baseline, or there is nothing to compare against.
    Average,
    /// No baseline applies, e.g. a month after the reference date or a
    /// whole-window total.
    Unknown,
}

/// One entity's activity within one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMetricRecord {
    /// Stable identifier, unique within a month. May be [OTHERS_ID].
    pub entity_id: String,
    pub name: String,
    pub color_hex: String,
    pub flow_type: FlowType,
    /// Signed amount.
    pub total: Decimal,
    /// The underlying entity IDs folded into this record, only set for the
    /// "Others" bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_ids: Option<BTreeSet<String>>,
}

impl MonthlyMetricRecord {
    /// The absolute amount, used for every comparison and share.
    pub fn value(&self) -> Decimal {
        self.total.abs()
    }

    /// Whether this record is the "Others" bucket.
    pub fn is_others(&self) -> bool {
        self.entity_id == OTHERS_ID
    }

    /// Whether this record passes an optional flow type filter.
    pub fn matches_flow(&self, flow: Option<FlowType>) -> bool {
        flow.is_none_or(|flow| flow == self.flow_type)
    }
}

/// A calendar month with its per-entity records and scalar totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSlot {
    pub year: i32,
    pub month: Month,
    /// Display label, e.g. "January".
    pub label: String,
    /// Short display label, e.g. "Jan".
    pub short_label: String,
    pub records: Vec<MonthlyMetricRecord>,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub balance: Decimal,
}

impl MonthSlot {
    /// Create a placeholder slot with no records and zero totals.
    pub fn empty(year: i32, month: Month) -> Self {
        Self {
            year,
            month,
            label: month.to_string(),
            short_label: short_label(month),
            records: Vec::new(),
            revenue: Decimal::ZERO,
            expenses: Decimal::ZERO,
            investments: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Find the record for `entity_id`.
    pub fn record(&self, entity_id: &str) -> Option<&MonthlyMetricRecord> {
        self.records
            .iter()
            .find(|record| record.entity_id == entity_id)
    }

    /// The records that pass an optional flow type filter, in source order.
    pub fn records_matching(
        &self,
        flow: Option<FlowType>,
    ) -> impl Iterator<Item = &MonthlyMetricRecord> {
        self.records
            .iter()
            .filter(move |record| record.matches_flow(flow))
    }
}

/// A record augmented with its baseline average and status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetricView {
    #[serde(flatten)]
    pub record: MonthlyMetricRecord,
    pub average: Decimal,
    pub status: MetricStatus,
}

/// One row of a table or donut: an entity folded over a scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedTableItem {
    pub key: String,
    pub name: String,
    /// The absolute amount over the scope.
    pub value: Decimal,
    pub color: String,
    /// Share of the scope total, between 0 and 1.
    pub percent: f64,
    pub status: MetricStatus,
    /// Member entity IDs for drill-down into the "Others" bucket.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_ids: Option<BTreeSet<String>>,
}

/// The period an aggregation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    /// A single month, given by its position in the series.
    Month(usize),
    /// Every month in the series.
    Annual,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::Month;

    use crate::analytics::record::{FlowType, MonthSlot, MonthlyMetricRecord, OTHERS_ID};

    fn create_test_record(entity_id: &str, flow_type: FlowType) -> MonthlyMetricRecord {
        MonthlyMetricRecord {
            entity_id: entity_id.to_owned(),
            name: entity_id.to_owned(),
            color_hex: "#000000".to_owned(),
            flow_type,
            total: dec!(-12.5),
            grouped_ids: None,
        }
    }

    #[test]
    fn flow_type_from_sign() {
        assert_eq!(FlowType::from_sign(dec!(-1)), FlowType::Expense);
        assert_eq!(FlowType::from_sign(dec!(1)), FlowType::Income);
        assert_eq!(FlowType::from_sign(dec!(0)), FlowType::Neutral);
    }

    #[test]
    fn value_is_absolute() {
        let record = create_test_record("food", FlowType::Expense);

        assert_eq!(record.value(), dec!(12.5));
    }

    #[test]
    fn flow_filter_none_matches_everything() {
        let record = create_test_record("food", FlowType::Income);

        assert!(record.matches_flow(None));
        assert!(record.matches_flow(Some(FlowType::Income)));
        assert!(!record.matches_flow(Some(FlowType::Expense)));
    }

    #[test]
    fn empty_slot_has_labels_and_no_records() {
        let slot = MonthSlot::empty(2024, Month::March);

        assert_eq!(slot.label, "March");
        assert_eq!(slot.short_label, "Mar");
        assert!(slot.records.is_empty());
        assert_eq!(slot.balance, dec!(0));
    }

    #[test]
    fn finds_records_by_entity() {
        let mut slot = MonthSlot::empty(2024, Month::March);
        slot.records.push(create_test_record("food", FlowType::Expense));
        slot.records.push(create_test_record(OTHERS_ID, FlowType::Expense));

        assert!(slot.record("food").is_some());
        assert!(slot.record(OTHERS_ID).unwrap().is_others());
        assert!(slot.record("rent").is_none());
    }
}
