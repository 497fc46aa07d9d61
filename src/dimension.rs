//! The grouping axes for dashboard metrics.

use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    analytics::OTHERS_ID,
    drill_down::{DateWindow, EntitySelector, TransactionFilter},
    response::DashboardMetric,
};

/// The axis metrics are grouped by.
///
/// Each variant knows how to key its upstream records and how to build the
/// transaction filter used when drilling into one of its entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Spending categories.
    Category,
    /// Merchants, identified by their alias IDs.
    Merchant,
    /// Banks linked through Open Finance.
    Bank,
}

impl Dimension {
    /// The lower case name of the dimension.
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Merchant => "merchant",
            Dimension::Bank => "bank",
        }
    }

    /// Extract the entity key of an upstream metric.
    ///
    /// `id` is preferred and `slug` is the fallback. Merchants without either
    /// are keyed by name, since merchant aliases are often created from the
    /// raw transaction description.
    pub fn entity_key(self, metric: &DashboardMetric) -> Option<String> {
        let key = non_empty(&metric.id).or_else(|| non_empty(&metric.slug));

        match self {
            Dimension::Merchant => key.or_else(|| non_empty(&metric.name)),
            Dimension::Category | Dimension::Bank => key,
        }
    }

    /// Build the transaction filter for drilling into the entity `key`.
    ///
    /// For the "Others" bucket the filter matches all of `grouped_ids`. If the
    /// bucket has no members, the filter falls back to the key itself so the
    /// search still returns a well-formed (empty) result.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `window` cannot be turned into a date range.
    pub fn drill_down_filter(
        self,
        key: &str,
        grouped_ids: Option<&BTreeSet<String>>,
        window: DateWindow,
    ) -> Result<TransactionFilter, Error> {
        let members: Option<Vec<String>> = grouped_ids
            .filter(|ids| key == OTHERS_ID && !ids.is_empty())
            .map(|ids| ids.iter().cloned().collect());

        let entity = match (self, members) {
            (Dimension::Category, Some(ids)) => EntitySelector::CategoryIds(ids),
            (Dimension::Category, None) => EntitySelector::CategoryId(key.to_owned()),
            (Dimension::Merchant, Some(ids)) => EntitySelector::MerchantAliasIds(ids),
            (Dimension::Merchant, None) => EntitySelector::MerchantAliasIds(vec![key.to_owned()]),
            (Dimension::Bank, Some(ids)) => EntitySelector::BankIds(ids),
            (Dimension::Bank, None) => EntitySelector::BankId(key.to_owned()),
        };

        TransactionFilter::new(entity, window)
    }
}

fn non_empty(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "category" | "categories" => Ok(Dimension::Category),
            "merchant" | "merchants" => Ok(Dimension::Merchant),
            "bank" | "banks" => Ok(Dimension::Bank),
            _ => Err(Error::InvalidDimension(s.to_owned())),
        }
    }
}
