//! Settings for running the analytics engine.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    Error,
    analytics::{DEFAULT_TOP_N, FlowType},
};

/// The engine settings, loaded from an optional JSON file.
///
/// Every field may be omitted from the file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsConfig {
    /// How many entities to pre-select for comparison and evolution views.
    pub top_n: usize,
    /// The flow type comparative views are restricted to. `None` includes all
    /// records.
    pub flow_type: Option<FlowType>,
    /// Fold table rows beyond this many into an "Others" row.
    pub max_table_entities: Option<usize>,
    /// The prefix used when formatting amounts as text.
    pub currency_symbol: String,
    /// The canonical timezone used to work out today's date, e.g.
    /// "America/Sao_Paulo".
    pub timezone: String,
    /// The default log level when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            flow_type: Some(FlowType::Expense),
            max_table_entities: None,
            currency_symbol: "$".to_owned(),
            timezone: "UTC".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse settings from a JSON string.
    ///
    /// # Errors
    /// Returns [Error::InvalidPayload] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be read, or
    /// [Error::InvalidPayload] if its contents are malformed.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path).map_err(|error| Error::Io {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;

        Self::from_json(&json)
    }
}
