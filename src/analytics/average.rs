//! Baseline averages and above/below-average classification.
//!
//! The baseline for an entity in a month is the mean of its absolute value in
//! every *other* month of the active window. Months where the entity has no
//! record count as zero, so the denominator is always the number of other
//! active months.

use rust_decimal::Decimal;
use time::Date;

use crate::{
    Error,
    analytics::{
        record::{DerivedMetricView, FlowType, MetricStatus, MonthSlot},
        series::MonthSeries,
    },
};

/// A value's baseline average and how the value compares with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub average: Decimal,
    pub status: MetricStatus,
}

/// Classify `value` against `average`.
///
/// This is a plain decimal comparison with no tolerance.
pub fn classify(value: Decimal, average: Decimal) -> MetricStatus {
    if value > average {
        MetricStatus::AboveAverage
    } else if value < average {
        MetricStatus::BelowAverage
    } else {
        MetricStatus::Average
    }
}

/// Computes baselines for the months of a series.
///
/// When a reference date is given, months starting after it are outside the
/// active window: they are ignored when averaging and classify as
/// [MetricStatus::Unknown].
#[derive(Debug, Clone, Copy)]
pub struct AverageClassifier<'a> {
    series: &'a MonthSeries,
    flow: Option<FlowType>,
    reference_date: Option<Date>,
}

impl<'a> AverageClassifier<'a> {
    /// Create a classifier over `series`, considering only records that
    /// match `flow`.
    pub fn new(series: &'a MonthSeries, flow: Option<FlowType>, reference_date: Option<Date>) -> Self {
        Self {
            series,
            flow,
            reference_date,
        }
    }

    /// Whether `slot` is inside the active window.
    fn is_active(&self, slot: &MonthSlot) -> bool {
        self.reference_date.is_none_or(|reference| {
            (slot.year, u8::from(slot.month)) <= (reference.year(), u8::from(reference.month()))
        })
    }

    fn value_in(&self, slot: &MonthSlot, entity_id: &str) -> Decimal {
        slot.records_matching(self.flow)
            .find(|record| record.entity_id == entity_id)
            .map(|record| record.value())
            .unwrap_or(Decimal::ZERO)
    }

    /// The number of months in the active window.
    pub fn window_len(&self) -> usize {
        self.series
            .slots()
            .iter()
            .filter(|slot| self.is_active(slot))
            .count()
    }

    /// Compute the baseline of `entity_id` for the month at `position`.
    ///
    /// If the active window has at most one month, the average is zero and
    /// the status is [MetricStatus::Average].
    ///
    /// # Errors
    /// Returns [Error::MonthOutOfRange] if `position` is not in the series.
    pub fn baseline(&self, position: usize, entity_id: &str) -> Result<Baseline, Error> {
        let target = self.series.slot(position)?;

        if !self.is_active(target) {
            return Ok(Baseline {
                average: Decimal::ZERO,
                status: MetricStatus::Unknown,
            });
        }

        let other_values: Vec<Decimal> = self
            .series
            .slots()
            .iter()
            .enumerate()
            .filter(|(index, slot)| *index != position && self.is_active(slot))
            .map(|(_, slot)| self.value_in(slot, entity_id))
            .collect();

        if other_values.is_empty() {
            return Ok(Baseline {
                average: Decimal::ZERO,
                status: MetricStatus::Average,
            });
        }

        let sum: Decimal = other_values.iter().sum();
        let average = sum / Decimal::from(other_values.len());

        Ok(Baseline {
            average,
            status: classify(self.value_in(target, entity_id), average),
        })
    }

    /// Augment each record of the month at `position` with its baseline.
    ///
    /// The views are sorted by descending absolute value. Ties keep the order
    /// the records appear in the month.
    ///
    /// # Errors
    /// Returns [Error::MonthOutOfRange] if `position` is not in the series.
    pub fn derive_views(&self, position: usize) -> Result<Vec<DerivedMetricView>, Error> {
        let slot = self.series.slot(position)?;

        let mut views = slot
            .records_matching(self.flow)
            .map(|record| -> Result<DerivedMetricView, Error> {
                let baseline = self.baseline(position, &record.entity_id)?;

                Ok(DerivedMetricView {
                    record: record.clone(),
                    average: baseline.average,
                    status: baseline.status,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        views.sort_by(|a, b| b.record.value().cmp(&a.record.value()));

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Month, macros::date};

    use crate::{
        Error,
        analytics::{
            average::{AverageClassifier, Baseline, classify},
            record::{FlowType, MetricStatus, MonthSlot, MonthlyMetricRecord},
            series::MonthSeries,
        },
        month::month_from_index,
    };

    fn create_test_record(entity_id: &str, total: Decimal) -> MonthlyMetricRecord {
        MonthlyMetricRecord {
            entity_id: entity_id.to_owned(),
            name: entity_id.to_owned(),
            color_hex: "#ff0000".to_owned(),
            flow_type: FlowType::Expense,
            total,
            grouped_ids: None,
        }
    }

    /// Builds one January slot per year from 2000. Two or more months span
    /// several years, so no gap filling happens; a single month is filled to
    /// a whole year.
    fn create_test_series(months: &[&[(&str, Decimal)]]) -> MonthSeries {
        let slots = months
            .iter()
            .enumerate()
            .map(|(index, records)| {
                let mut slot = MonthSlot::empty(2000 + index as i32, Month::January);
                slot.records = records
                    .iter()
                    .map(|(id, total)| create_test_record(id, *total))
                    .collect();
                slot
            })
            .collect();

        MonthSeries::gap_filled(slots).unwrap()
    }

    #[test]
    fn classify_compares_with_average() {
        assert_eq!(classify(dec!(10), dec!(5)), MetricStatus::AboveAverage);
        assert_eq!(classify(dec!(5), dec!(10)), MetricStatus::BelowAverage);
        assert_eq!(classify(dec!(5.00), dec!(5)), MetricStatus::Average);
        assert_eq!(classify(dec!(0), dec!(0)), MetricStatus::Average);
        assert_eq!(classify(dec!(1), dec!(0)), MetricStatus::AboveAverage);
    }

    #[test]
    fn baseline_excludes_the_month_being_compared() {
        let series = create_test_series(&[
            &[("food", dec!(-10))],
            &[("food", dec!(-20))],
            &[("food", dec!(-30))],
        ]);
        let classifier = AverageClassifier::new(&series, Some(FlowType::Expense), None);

        let baseline = classifier.baseline(0, "food").unwrap();

        assert_eq!(
            baseline,
            Baseline {
                average: dec!(25),
                status: MetricStatus::BelowAverage
            }
        );
    }

    #[test]
    fn absent_months_count_as_zero() {
        let series = create_test_series(&[&[("food", dec!(-30))], &[], &[("food", dec!(-30))]]);
        let classifier = AverageClassifier::new(&series, None, None);

        let baseline = classifier.baseline(0, "food").unwrap();

        assert_eq!(baseline.average, dec!(15));
        assert_eq!(baseline.status, MetricStatus::AboveAverage);
    }

    #[test]
    fn single_month_window_is_average() {
        let mut january = MonthSlot::empty(2024, Month::January);
        january.records = vec![create_test_record("food", dec!(-30))];
        let series = MonthSeries::gap_filled(vec![january]).unwrap();
        let classifier = AverageClassifier::new(&series, None, Some(date!(2024 - 01 - 10)));

        let baseline = classifier.baseline(0, "food").unwrap();

        assert_eq!(classifier.window_len(), 1);
        assert_eq!(baseline.average, Decimal::ZERO);
        assert_eq!(baseline.status, MetricStatus::Average);
    }

    #[test]
    fn zero_value_and_zero_average_is_average() {
        let series = create_test_series(&[&[], &[], &[]]);
        let classifier = AverageClassifier::new(&series, None, None);

        let baseline = classifier.baseline(1, "food").unwrap();

        assert_eq!(baseline.status, MetricStatus::Average);
    }

    #[test]
    fn future_months_are_excluded_and_unknown() {
        let mut slots: Vec<MonthSlot> = (0..12)
            .filter_map(month_from_index)
            .map(|month| {
                let mut slot = MonthSlot::empty(2024, month);
                slot.records = vec![create_test_record("food", dec!(-10))];
                slot
            })
            .collect();
        slots[2].records = vec![create_test_record("food", dec!(-40))];
        let series = MonthSeries::gap_filled(slots).unwrap();
        let classifier = AverageClassifier::new(&series, None, Some(date!(2024 - 03 - 15)));

        assert_eq!(classifier.window_len(), 3);

        let march = classifier.baseline(2, "food").unwrap();
        assert_eq!(march.average, dec!(10));
        assert_eq!(march.status, MetricStatus::AboveAverage);

        let april = classifier.baseline(3, "food").unwrap();
        assert_eq!(april.average, Decimal::ZERO);
        assert_eq!(april.status, MetricStatus::Unknown);
    }

    #[test]
    fn flow_filter_ignores_other_flows() {
        let mut income = create_test_record("salary", dec!(500));
        income.flow_type = FlowType::Income;
        let mut slot = MonthSlot::empty(2000, Month::January);
        slot.records = vec![income];
        let series = MonthSeries::gap_filled(vec![slot, MonthSlot::empty(2001, Month::January)]).unwrap();
        let classifier = AverageClassifier::new(&series, Some(FlowType::Expense), None);

        assert!(classifier.derive_views(0).unwrap().is_empty());
    }

    #[test]
    fn derive_views_sorts_descending_and_keeps_ties_stable() {
        let series = create_test_series(&[
            &[("a", dec!(-10)), ("b", dec!(-50)), ("c", dec!(-10))],
            &[("a", dec!(-20)), ("b", dec!(-50))],
        ]);
        let classifier = AverageClassifier::new(&series, Some(FlowType::Expense), None);

        let views = classifier.derive_views(0).unwrap();
        let keys: Vec<&str> = views.iter().map(|view| view.record.entity_id.as_str()).collect();

        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(views[0].status, MetricStatus::Average);
        assert_eq!(views[1].average, dec!(20));
        assert_eq!(views[1].status, MetricStatus::BelowAverage);
        assert_eq!(views[2].status, MetricStatus::AboveAverage);
    }

    #[test]
    fn out_of_range_month_is_an_error() {
        let series = create_test_series(&[&[("food", dec!(-10))]]);
        let classifier = AverageClassifier::new(&series, None, None);

        assert_eq!(series.len(), 12);
        assert_eq!(
            classifier.baseline(12, "food"),
            Err(Error::MonthOutOfRange { index: 12, len: 12 })
        );
    }
}
