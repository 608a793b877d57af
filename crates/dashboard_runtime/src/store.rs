//! Single-owner document store: reads go through selectors, writes through reducer actions.

use crate::effect_executor::run_effects;
use crate::model::DashboardState;
use crate::propagation::PropagationReport;
use crate::reducer::{reduce_layout, LayoutAction, ReducerError};
use crate::sizing::InsightSizingProvider;

#[derive(Debug, Clone, Default)]
pub struct DashboardStore {
    state: DashboardState,
}

impl DashboardStore {
    pub fn new(state: DashboardState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Runs a selector against the current state.
    pub fn select<'s, T>(&'s self, selector: impl FnOnce(&'s DashboardState) -> T) -> T {
        selector(&self.state)
    }

    /// Reduces `action` and drains the resulting effects before returning.
    ///
    /// # Errors
    ///
    /// Returns the reducer error; the state is unchanged in that case.
    pub fn put(
        &mut self,
        action: LayoutAction,
        provider: &dyn InsightSizingProvider,
    ) -> Result<Vec<PropagationReport>, ReducerError> {
        let effects = reduce_layout(&mut self.state, action)?;
        Ok(run_effects(&mut self.state, effects, provider))
    }
}
