//! Explicit runtime effect-queue executor for reducer-emitted side effects.

use crate::model::DashboardState;
use crate::propagation::{propagate_heights, PropagationReport};
use crate::reducer::RuntimeEffect;
use crate::sizing::{InsightSizingProvider, SizingContext};

/// Drains reducer-emitted runtime effects in order and returns one report per propagation.
pub fn run_effects(
    state: &mut DashboardState,
    effects: Vec<RuntimeEffect>,
    provider: &dyn InsightSizingProvider,
) -> Vec<PropagationReport> {
    let mut reports = Vec::with_capacity(effects.len());
    for effect in effects {
        match effect {
            RuntimeEffect::PropagateHeights { parent } => {
                let context = SizingContext::new(state.screen, &state.settings, &state.insights);
                reports.push(propagate_heights(
                    &mut state.layout,
                    parent.as_ref(),
                    provider,
                    &context,
                ));
            }
        }
    }
    reports
}
