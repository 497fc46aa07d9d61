//! Transaction search filters for drilling into a dimension entity.
//!
//! The transaction search accepts one entity selector plus an inclusive date
//! range. The date range is derived from the month or year window the user
//! was looking at when they drilled in.

use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    month::{first_day, last_day, month_from_index, month_index},
};

/// The entity part of a transaction search filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntitySelector {
    /// Transactions in a single category.
    CategoryId(String),
    /// Transactions in any of several categories.
    CategoryIds(Vec<String>),
    /// Transactions for any of the merchant aliases.
    MerchantAliasIds(Vec<String>),
    /// Transactions from a single bank.
    BankId(String),
    /// Transactions from any of several banks.
    BankIds(Vec<String>),
}

impl EntitySelector {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            EntitySelector::CategoryId(id) => vec![("categoryId", id.clone())],
            EntitySelector::CategoryIds(ids) => repeat_key("categoryIds", ids),
            EntitySelector::MerchantAliasIds(ids) => repeat_key("merchantAliasIds", ids),
            EntitySelector::BankId(id) => vec![("bankId", id.clone())],
            EntitySelector::BankIds(ids) => repeat_key("bankIds", ids),
        }
    }
}

fn repeat_key(key: &'static str, ids: &[String]) -> Vec<(&'static str, String)> {
    ids.iter().map(|id| (key, id.clone())).collect()
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

/// The period the user was viewing when they drilled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// A single calendar month.
    Month {
        /// The calendar year.
        year: i32,
        /// The calendar month.
        month: Month,
    },
    /// A whole calendar year.
    Year(i32),
    /// The twelve calendar months up to and including the reference date.
    LastTwelveMonths {
        /// The date the window ends on, usually today.
        reference: Date,
    },
}

impl DateWindow {
    /// Get the inclusive date range covered by this window.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if the year is outside the supported range.
    pub fn range(self) -> Result<DateRange, Error> {
        match self {
            DateWindow::Month { year, month } => Ok(DateRange {
                start: first_day(year, month)?,
                end: last_day(year, month)?,
            }),
            DateWindow::Year(year) => Ok(DateRange {
                start: first_day(year, Month::January)?,
                end: last_day(year, Month::December)?,
            }),
            DateWindow::LastTwelveMonths { reference } => {
                let (year, month) = months_before(reference.year(), reference.month(), 11);

                Ok(DateRange {
                    start: first_day(year, month)?,
                    end: reference,
                })
            }
        }
    }
}

fn months_before(year: i32, month: Month, count: i32) -> (i32, Month) {
    let absolute = year * 12 + month_index(month) as i32 - count;
    let month = month_from_index(absolute.rem_euclid(12) as usize).unwrap_or(Month::January);

    (absolute.div_euclid(12), month)
}

/// The parameters for a transaction search scoped to one dimension entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(flatten)]
    pub entity: EntitySelector,
    pub start_date: Date,
    pub end_date: Date,
}

impl TransactionFilter {
    /// Create a filter for `entity` over the dates covered by `window`.
    pub fn new(entity: EntitySelector, window: DateWindow) -> Result<Self, Error> {
        let range = window.range()?;

        Ok(Self {
            entity,
            start_date: range.start,
            end_date: range.end,
        })
    }

    /// Encode the filter as a URL query string.
    ///
    /// ID lists repeat their key, e.g. `merchantAliasIds=a&merchantAliasIds=b`.
    pub fn to_query_string(&self) -> String {
        let mut pairs = self.entity.query_pairs();
        pairs.push(("startDate", self.start_date.to_string()));
        pairs.push(("endDate", self.end_date.to_string()));

        serde_urlencoded::to_string(&pairs).unwrap_or_else(|error| {
            tracing::error!("could not encode transaction filter {self:?}: {error}");
            String::new()
        })
    }
}
