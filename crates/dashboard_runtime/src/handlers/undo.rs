use dashboard_contract::DashboardCommand;

use super::{HandlerContext, HandlerResult};
use crate::emitters;
use crate::emitters::invalid_arguments;
use crate::reducer::LayoutAction;
use crate::selectors::select_undo_depth;

pub(super) fn undo_layout_changes(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    steps: usize,
) -> HandlerResult {
    if steps == 0 {
        return Err(invalid_arguments(command, "Attempting to undo zero changes."));
    }
    let undone: Vec<String> = ctx.select(|state| {
        state
            .undo
            .entries()
            .iter()
            .rev()
            .take(steps)
            .map(|entry| entry.command_type.clone())
            .collect()
    });
    let depth = ctx.select(select_undo_depth);
    if depth < steps {
        return Err(invalid_arguments(
            command,
            format!("Cannot undo {steps} changes; only {depth} recorded."),
        ));
    }

    ctx.put(command, LayoutAction::Undo { steps })?;
    Ok(emitters::layout_changes_undone(command, undone))
}
