//! Whole-window rollups.
//!
//! There are two independent rollups: the per-entity rollup feeding tables
//! and donuts, and the scalar rollup feeding the headline summary cards. The
//! scalar rollup sums the month totals sent by the upstream; it is never
//! recomputed from the metric records.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    analytics::{
        record::{FlowType, MonthlyMetricRecord},
        series::{MonthSeries, merge_into},
    },
    response::DashboardSummary,
};

/// Fold every month of `series` into one record per entity.
///
/// Each entity's total is the sum of its absolute monthly values, so the
/// returned totals are never negative. Grouped IDs of the "Others" bucket are
/// unioned across months so drill-down recovers the complete membership.
///
/// The result is sorted by descending total. Ties keep the order in which
/// entities were first seen.
pub fn annual_rollup(series: &MonthSeries, flow: Option<FlowType>) -> Vec<MonthlyMetricRecord> {
    let mut totals: Vec<MonthlyMetricRecord> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in series
        .slots()
        .iter()
        .flat_map(|slot| slot.records_matching(flow))
    {
        let absolute = MonthlyMetricRecord {
            total: record.value(),
            ..record.clone()
        };

        match positions.get(record.entity_id.as_str()) {
            Some(&position) => merge_into(&mut totals[position], absolute),
            None => {
                positions.insert(&record.entity_id, totals.len());
                totals.push(absolute);
            }
        }
    }

    tracing::debug!(
        "folded {} months into {} entities",
        series.len(),
        totals.len()
    );

    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// The scalar month totals summed across the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarRollup {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub investments: Decimal,
    pub balance: Decimal,
}

impl ScalarRollup {
    /// Sum the scalar totals of every slot in `series`.
    pub fn from_series(series: &MonthSeries) -> Self {
        series
            .slots()
            .iter()
            .fold(Self::default(), |rollup, slot| Self {
                revenue: rollup.revenue + slot.revenue,
                expenses: rollup.expenses + slot.expenses,
                investments: rollup.investments + slot.investments,
                balance: rollup.balance + slot.balance,
            })
    }

    /// Whether the rollup agrees with the summary sent by the upstream.
    pub fn reconciles_with(&self, summary: &DashboardSummary) -> bool {
        self.revenue == summary.total_revenue
            && self.expenses == summary.total_expenses
            && self.investments == summary.total_investments
            && self.balance == summary.balance
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::Month;

    use crate::{
        analytics::{
            record::{FlowType, MonthSlot, MonthlyMetricRecord, OTHERS_ID},
            rollup::{ScalarRollup, annual_rollup},
            series::MonthSeries,
        },
        response::DashboardSummary,
    };

    fn create_test_record(entity_id: &str, total: Decimal) -> MonthlyMetricRecord {
        MonthlyMetricRecord {
            entity_id: entity_id.to_owned(),
            name: entity_id.to_uppercase(),
            color_hex: "#123456".to_owned(),
            flow_type: FlowType::Expense,
            total,
            grouped_ids: None,
        }
    }

    fn create_test_others(total: Decimal, members: &[&str]) -> MonthlyMetricRecord {
        MonthlyMetricRecord {
            grouped_ids: Some(members.iter().map(|id| id.to_string()).collect()),
            ..create_test_record(OTHERS_ID, total)
        }
    }

    fn create_test_slot(month: Month, records: Vec<MonthlyMetricRecord>) -> MonthSlot {
        let mut slot = MonthSlot::empty(2024, month);
        slot.records = records;
        slot
    }

    #[test]
    fn rollup_sums_absolute_values_and_sorts() {
        let series = MonthSeries::gap_filled(vec![
            create_test_slot(
                Month::January,
                vec![
                    create_test_record("b", dec!(-50)),
                    create_test_record("a", dec!(-100)),
                ],
            ),
            create_test_slot(
                Month::February,
                vec![
                    create_test_record("a", dec!(-200)),
                    create_test_record("b", dec!(0)),
                ],
            ),
        ])
        .unwrap();

        let rollup = annual_rollup(&series, Some(FlowType::Expense));

        assert_eq!(rollup.len(), 2);
        assert_eq!(rollup[0].entity_id, "a");
        assert_eq!(rollup[0].total, dec!(300));
        assert_eq!(rollup[0].name, "A");
        assert_eq!(rollup[1].entity_id, "b");
        assert_eq!(rollup[1].total, dec!(50));
    }

    #[test]
    fn rollup_ties_keep_first_seen_order() {
        let series = MonthSeries::gap_filled(vec![
            create_test_slot(Month::January, vec![create_test_record("late", dec!(-10))]),
            create_test_slot(
                Month::February,
                vec![
                    create_test_record("early", dec!(-10)),
                    create_test_record("late", dec!(0)),
                ],
            ),
        ])
        .unwrap();

        let rollup = annual_rollup(&series, None);
        let keys: Vec<&str> = rollup.iter().map(|record| record.entity_id.as_str()).collect();

        assert_eq!(keys, vec!["late", "early"]);
    }

    #[test]
    fn others_membership_is_a_union() {
        let series = MonthSeries::gap_filled(vec![
            create_test_slot(Month::January, vec![create_test_others(dec!(-5), &["x", "y"])]),
            create_test_slot(Month::March, vec![create_test_others(dec!(-7), &["y", "z"])]),
        ])
        .unwrap();

        let rollup = annual_rollup(&series, Some(FlowType::Expense));
        let expected: BTreeSet<String> = ["x", "y", "z"].iter().map(|id| id.to_string()).collect();

        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].total, dec!(12));
        assert_eq!(rollup[0].grouped_ids, Some(expected));
    }

    #[test]
    fn rollup_filters_flow_type() {
        let mut income = create_test_record("salary", dec!(1000));
        income.flow_type = FlowType::Income;
        let series = MonthSeries::gap_filled(vec![create_test_slot(
            Month::January,
            vec![income, create_test_record("food", dec!(-10))],
        )])
        .unwrap();

        let rollup = annual_rollup(&series, Some(FlowType::Expense));

        assert_eq!(rollup.len(), 1);
        assert_eq!(rollup[0].entity_id, "food");
    }

    #[test]
    fn scalar_rollup_sums_months_and_reconciles() {
        let mut january = MonthSlot::empty(2024, Month::January);
        january.revenue = dec!(1000);
        january.expenses = dec!(400);
        january.balance = dec!(600);
        let mut february = MonthSlot::empty(2024, Month::February);
        february.revenue = dec!(500);
        february.expenses = dec!(450.50);
        february.investments = dec!(25);
        february.balance = dec!(24.50);
        let series = MonthSeries::gap_filled(vec![january, february]).unwrap();

        let rollup = ScalarRollup::from_series(&series);

        assert_eq!(
            rollup,
            ScalarRollup {
                revenue: dec!(1500),
                expenses: dec!(850.50),
                investments: dec!(25),
                balance: dec!(624.50),
            }
        );

        let mut summary = DashboardSummary {
            total_revenue: dec!(1500),
            total_expenses: dec!(850.5),
            total_investments: dec!(25),
            balance: dec!(624.5),
        };
        assert!(rollup.reconciles_with(&summary));

        summary.total_expenses = dec!(850);
        assert!(!rollup.reconciles_with(&summary));
    }

    #[test]
    fn empty_series_rolls_up_to_nothing() {
        let series = MonthSeries::default();

        assert!(annual_rollup(&series, None).is_empty());
        assert_eq!(ScalarRollup::from_series(&series), ScalarRollup::default());
    }
}
