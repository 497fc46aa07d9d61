//! Default entity selection for comparison and evolution views.
//!
//! The default is a suggestion made only while the user has not chosen
//! anything. Once the user has made a selection in a session, including
//! clearing it back to nothing, the default is never applied again.

use crate::analytics::{record::FlowType, rollup::annual_rollup, series::MonthSeries};

/// The number of entities selected by default.
pub const DEFAULT_TOP_N: usize = 2;

/// The IDs of the `n` entities with the largest total absolute value over
/// the whole series.
///
/// Ties keep the order in which entities were first seen.
pub fn top_entities(series: &MonthSeries, flow: Option<FlowType>, n: usize) -> Vec<String> {
    annual_rollup(series, flow)
        .into_iter()
        .take(n)
        .map(|record| record.entity_id)
        .collect()
}

/// Suggest a default selection.
///
/// Returns `None` when the current selection is not empty, when the user
/// has already made a selection this session, or when there is no data.
pub fn suggest_default_selection(
    series: &MonthSeries,
    flow: Option<FlowType>,
    n: usize,
    current_selection: &[String],
    user_has_selected: bool,
) -> Option<Vec<String>> {
    if user_has_selected || !current_selection.is_empty() {
        return None;
    }

    let top = top_entities(series, flow, n);

    (!top.is_empty()).then_some(top)
}

/// A caller-owned selection with sticky default semantics.
///
/// The engine itself holds no state. A UI session keeps one of these per
/// view and calls [SelectionState::apply_default] whenever new data arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Vec<String>,
    user_has_selected: bool,
}

impl SelectionState {
    /// Create a state with nothing selected and no user selection yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state saved by the caller between requests.
    pub fn restore(selected: Vec<String>, user_has_selected: bool) -> Self {
        Self {
            selected,
            user_has_selected,
        }
    }

    /// The selected entity IDs.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Whether the user has made a selection this session.
    pub fn user_has_selected(&self) -> bool {
        self.user_has_selected
    }

    /// Replace the selection with the user's choice.
    ///
    /// An empty choice still counts as a user selection.
    pub fn select(&mut self, entity_ids: Vec<String>) {
        self.selected = entity_ids;
        self.user_has_selected = true;
    }

    /// Apply the default selection if it is allowed.
    ///
    /// Returns whether the selection changed.
    pub fn apply_default(&mut self, series: &MonthSeries, flow: Option<FlowType>, n: usize) -> bool {
        match suggest_default_selection(series, flow, n, &self.selected, self.user_has_selected) {
            Some(suggestion) => {
                tracing::debug!("applying default selection {suggestion:?}");
                self.selected = suggestion;
                true
            }
            None => false,
        }
    }
}
