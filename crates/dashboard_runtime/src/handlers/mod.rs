//! Command handlers: one validated state transition per command payload.
//!
//! A handler reads through [`HandlerContext::select`], converts failed validations into
//! [`CommandFailed`] values, writes through [`HandlerContext::put`], and returns the success
//! event. Handlers never await, so one command completes before the next starts.

use std::collections::BTreeSet;

use dashboard_contract::{
    CommandFailed, CommandPayload, DashboardCommand, DashboardEvent, ItemDefinition, LayoutItem,
    RelativeIndex, Widget, WidgetKind,
};

use crate::emitters::{internal_error, invalid_arguments};
use crate::model::DashboardState;
use crate::propagation::PropagationReport;
use crate::reducer::LayoutAction;
use crate::selectors::{select_insights, select_screen, select_settings, select_stash};
use crate::settings::MoveIndexConvention;
use crate::sizing::{InsightSizingProvider, SizeInfo, SizingContext};
use crate::store::DashboardStore;

mod items;
mod resize;
mod sections;
mod undo;
mod widgets;

/// Outcome of a handler: the success event or a typed failure.
pub type HandlerResult = Result<DashboardEvent, CommandFailed>;

/// Store access granted to a running handler.
pub struct HandlerContext<'a> {
    store: &'a mut DashboardStore,
    provider: &'a dyn InsightSizingProvider,
    propagations: Vec<PropagationReport>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(store: &'a mut DashboardStore, provider: &'a dyn InsightSizingProvider) -> Self {
        Self {
            store,
            provider,
            propagations: Vec::new(),
        }
    }

    /// Synchronous read through a selector.
    pub fn select<'s, T>(&'s self, selector: impl FnOnce(&'s DashboardState) -> T) -> T {
        let store: &'s DashboardStore = &*self.store;
        store.select(selector)
    }

    /// Applies an action and its runtime effects.
    ///
    /// Handlers validate before writing, so a reducer error here is an internal error.
    pub fn put(
        &mut self,
        command: &DashboardCommand,
        action: LayoutAction,
    ) -> Result<(), CommandFailed> {
        match self.store.put(action, self.provider) {
            Ok(reports) => {
                self.propagations.extend(reports);
                Ok(())
            }
            Err(err) => Err(internal_error(command, err.to_string())),
        }
    }

    /// Size constraints of `widget` at the current breakpoint.
    pub fn size_info(&self, widget: &Widget) -> SizeInfo {
        let state = self.store.state();
        let context = SizingContext::new(
            select_screen(state),
            select_settings(state),
            select_insights(state),
        );
        self.provider.size_info(widget, &context)
    }

    /// Propagation walks performed by the handler's writes.
    pub fn into_propagations(self) -> Vec<PropagationReport> {
        self.propagations
    }
}

/// Routes a command to its handler.
pub fn handle_command(ctx: &mut HandlerContext<'_>, command: &DashboardCommand) -> HandlerResult {
    match &command.payload {
        CommandPayload::AddLayoutSection {
            index,
            initial_header,
            initial_items,
        } => sections::add_layout_section(
            ctx,
            command,
            index,
            initial_header.as_ref(),
            initial_items,
        ),
        CommandPayload::MoveLayoutSection {
            section_index,
            to_index,
        } => sections::move_layout_section(ctx, command, section_index, to_index),
        CommandPayload::RemoveLayoutSection {
            index,
            stash_identifier,
        } => sections::remove_layout_section(ctx, command, index, stash_identifier.as_deref()),
        CommandPayload::ChangeLayoutSectionHeader {
            index,
            header,
            merge,
        } => sections::change_layout_section_header(ctx, command, index, header, *merge),
        CommandPayload::AddSectionItems {
            section_index,
            item_index,
            items,
        } => items::add_section_items(ctx, command, section_index, *item_index, items),
        CommandPayload::MoveSectionItem {
            section_index,
            item_index,
            to_section_index,
            to_item_index,
        } => items::move_section_item(
            ctx,
            command,
            section_index,
            *item_index,
            to_section_index,
            *to_item_index,
        ),
        CommandPayload::RemoveSectionItem {
            section_index,
            item_index,
            stash_identifier,
            eager,
        } => items::remove_section_item(
            ctx,
            command,
            section_index,
            *item_index,
            stash_identifier.as_deref(),
            *eager,
        ),
        CommandPayload::ReplaceSectionItem {
            section_index,
            item_index,
            item,
            stash_identifier,
        } => items::replace_section_item(
            ctx,
            command,
            section_index,
            *item_index,
            item,
            stash_identifier.as_deref(),
        ),
        CommandPayload::ResizeHeight {
            section_index,
            item_indexes,
            height,
        } => resize::resize_height(ctx, command, section_index, item_indexes, *height),
        CommandPayload::ResizeWidth {
            section_index,
            item_index,
            width,
        } => resize::resize_width(ctx, command, section_index, *item_index, *width),
        CommandPayload::ChangeInsightWidgetVisProperties {
            widget_ref,
            properties,
        } => widgets::change_insight_widget_vis_properties(
            ctx,
            command,
            widget_ref,
            properties.as_ref(),
        ),
        CommandPayload::ChangeWidgetHeader { widget_ref, title } => {
            widgets::change_widget_header(ctx, command, widget_ref, title)
        }
        CommandPayload::ModifyDrillsForInsightWidget { widget_ref, drills } => {
            widgets::modify_drills_for_insight_widget(ctx, command, widget_ref, drills)
        }
        CommandPayload::RemoveDrillsForInsightWidget {
            widget_ref,
            origins,
        } => widgets::remove_drills_for_insight_widget(ctx, command, widget_ref, origins),
        CommandPayload::ChangeInsightWidgetFilterSettings {
            widget_ref,
            operation,
        } => widgets::change_widget_filter_settings(
            ctx,
            command,
            widget_ref,
            WidgetKind::Insight,
            operation,
        ),
        CommandPayload::ChangeKpiWidgetFilterSettings {
            widget_ref,
            operation,
        } => widgets::change_widget_filter_settings(
            ctx,
            command,
            widget_ref,
            WidgetKind::Kpi,
            operation,
        ),
        CommandPayload::UndoLayoutChanges { steps } => {
            undo::undo_layout_changes(ctx, command, *steps)
        }
    }
}

/// Resolves a move destination under `convention`.
///
/// `len` is the destination length before the move; `source_index` is the moved element's index
/// when it shares the destination sequence. The result is a position in the sequence after the
/// element was taken out and is not bounds checked.
pub(crate) fn resolve_move_index(
    convention: MoveIndexConvention,
    index: RelativeIndex,
    len: usize,
    source_index: Option<usize>,
) -> Option<usize> {
    match convention {
        MoveIndexConvention::PostRemoval => {
            let post_len = if source_index.is_some() {
                len.saturating_sub(1)
            } else {
                len
            };
            index.resolve(post_len)
        }
        MoveIndexConvention::PreRemoval => {
            let insertion_point = index.resolve(len)?;
            Some(match source_index {
                Some(source) if insertion_point > source => insertion_point - 1,
                _ => insertion_point,
            })
        }
    }
}

/// Converts a resolved position back to a relative index for the placement validators.
pub(crate) fn relative(index: usize) -> RelativeIndex {
    RelativeIndex(i64::try_from(index).unwrap_or(i64::MAX))
}

/// Expands item definitions, pulling stashed items by identifier.
///
/// Returns the items and the consumed stash identifiers in first-use order.
pub(crate) fn resolve_item_definitions(
    ctx: &HandlerContext<'_>,
    command: &DashboardCommand,
    definitions: &[ItemDefinition],
) -> Result<(Vec<LayoutItem>, Vec<String>), CommandFailed> {
    let mut items = Vec::new();
    let mut used = Vec::new();
    let mut seen = BTreeSet::new();
    for definition in definitions {
        match definition {
            ItemDefinition::Item(item) => items.push(item.clone()),
            ItemDefinition::Stash(stash_identifier) => {
                if !seen.insert(stash_identifier.as_str()) {
                    return Err(invalid_arguments(
                        command,
                        format!("Stash {stash_identifier} is referenced more than once."),
                    ));
                }
                let Some(stashed) = ctx.select(select_stash).get(stash_identifier) else {
                    return Err(invalid_arguments(
                        command,
                        format!("Attempting to use non-existing stash {stash_identifier}."),
                    ));
                };
                items.extend(stashed.iter().cloned());
                used.push(stash_identifier.clone());
            }
        }
    }
    Ok((items, used))
}
