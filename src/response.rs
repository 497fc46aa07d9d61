//! Wire types for the dashboard payload served by the backend.
//!
//! These mirror the JSON shape exactly and are deliberately permissive: most
//! fields are optional so that a single malformed record degrades to a
//! fallback instead of rejecting the whole payload.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, analytics::FlowType};

/// The dashboard payload: headline totals plus a per-month breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Headline totals over the whole window.
    #[serde(default)]
    pub summary: DashboardSummary,
    /// The months in the window, in source order.
    #[serde(default)]
    pub months: Vec<MonthlyData>,
}

impl DashboardResponse {
    /// Parse a dashboard payload from a JSON string.
    ///
    /// # Errors
    /// Returns [Error::InvalidPayload] if the JSON does not match the payload shape.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Headline totals for the summary cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    /// Income over the window.
    pub total_revenue: Decimal,
    /// Spending over the window.
    pub total_expenses: Decimal,
    /// Money moved into investments over the window.
    pub total_investments: Decimal,
    /// Net balance at the end of the window.
    pub balance: Decimal,
}

/// One month of the dashboard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    /// Display label, e.g. "Janeiro" or "2024-01".
    #[serde(default)]
    pub month: String,
    /// Short month code, e.g. "Jan" or "fev".
    #[serde(default)]
    pub month_short: String,
    /// Calendar year of the month.
    pub year: i32,
    /// Income in the month.
    #[serde(default)]
    pub revenue: Decimal,
    /// Spending in the month.
    #[serde(default)]
    pub expenses: Decimal,
    /// Money moved into investments in the month.
    #[serde(default)]
    pub investments: Decimal,
    /// Net balance for the month.
    #[serde(default)]
    pub balance: Decimal,
    /// Per-entity breakdown for the requested dimension.
    #[serde(default)]
    pub metrics: Vec<DashboardMetric>,
}

/// One entity's activity within a month.
///
/// `id` and `slug` are alternate entity keys; `id` wins when both are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetric {
    /// Preferred entity key.
    #[serde(default)]
    pub id: Option<String>,
    /// Alternate entity key, used when `id` is missing.
    #[serde(default)]
    pub slug: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Chart colour as a hex string.
    #[serde(default, alias = "colorHex")]
    pub color: Option<String>,
    /// Whether the money flowed in, out, or neither.
    #[serde(default, alias = "type")]
    pub flow_type: Option<FlowType>,
    /// Signed amount for the month.
    #[serde(default)]
    pub total: Decimal,
    /// Entity IDs folded into this record. Only set on the "Others" bucket.
    #[serde(default)]
    pub grouped_ids: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        analytics::FlowType,
        response::{DashboardMetric, DashboardResponse},
    };

    #[test]
    fn parses_camel_case_payload() {
        let json = r##"{
            "summary": {
                "totalRevenue": 1000,
                "totalExpenses": "350.50",
                "totalInvestments": 0,
                "balance": 649.5
            },
            "months": [
                {
                    "month": "Janeiro",
                    "monthShort": "Jan",
                    "year": 2024,
                    "revenue": 1000,
                    "expenses": 350.5,
                    "metrics": [
                        {"id": "food", "name": "Food", "color": "#ff0000", "type": "expense", "total": -350.5},
                        {"slug": "__others__", "type": "expense", "total": 0, "groupedIds": ["a", "b"]}
                    ]
                }
            ]
        }"##;

        let response = DashboardResponse::from_json(json).unwrap();

        assert_eq!(response.summary.total_expenses, dec!(350.50));
        assert_eq!(response.summary.balance, dec!(649.5));
        assert_eq!(response.months.len(), 1);

        let month = &response.months[0];
        assert_eq!(month.month_short, "Jan");
        assert_eq!(month.investments, dec!(0));
        assert_eq!(
            month.metrics[0],
            DashboardMetric {
                id: Some("food".to_owned()),
                slug: None,
                name: Some("Food".to_owned()),
                color: Some("#ff0000".to_owned()),
                flow_type: Some(FlowType::Expense),
                total: dec!(-350.5),
                grouped_ids: None,
            }
        );
        assert_eq!(
            month.metrics[1].grouped_ids,
            Some(vec!["a".to_owned(), "b".to_owned()])
        );
    }

    #[test]
    fn accepts_color_hex_alias() {
        let json = r##"{"months": [{"year": 2024, "monthShort": "Feb", "metrics": [
            {"id": "bank-1", "colorHex": "#00ff00", "flowType": "income", "total": 10}
        ]}]}"##;

        let response = DashboardResponse::from_json(json).unwrap();
        let metric = &response.months[0].metrics[0];

        assert_eq!(metric.color.as_deref(), Some("#00ff00"));
        assert_eq!(metric.flow_type, Some(FlowType::Income));
    }

    #[test]
    fn rejects_malformed_json() {
        let result = DashboardResponse::from_json("{\"months\": 3}");

        assert!(matches!(result, Err(Error::InvalidPayload(_))));
    }
}
