//! Reducer actions, side-effect intents, and transition logic for the dashboard layout.

use thiserror::Error;

use dashboard_contract::{ItemPath, LayoutItem, LayoutSection, SectionHeader, SectionPath};

use crate::coordinates::{
    adjust_after_item_insertion, adjust_after_section_insertion, find_item_mut, find_layout_mut,
    find_section_mut,
};
use crate::model::{DashboardSnapshot, DashboardState, UndoEntry};

mod widgets;

pub use widgets::WidgetAction;

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_layout`] to mutate [`DashboardState`].
///
/// Paths are absolute in the layout the action is applied to. Move destinations are expressed in
/// the layout as it looks after the moved element was taken out.
pub enum LayoutAction {
    /// Insert a section.
    AddSection {
        /// Position of the new section.
        path: SectionPath,
        /// Section to insert.
        section: LayoutSection,
        /// Stashes whose items were placed in the section and are now consumed.
        used_stashes: Vec<String>,
    },
    /// Remove a section, optionally stashing its items.
    RemoveSection {
        /// Section to remove.
        path: SectionPath,
        /// Stash receiving the items.
        stash_identifier: Option<String>,
    },
    /// Move a section in one atomic step.
    MoveSection {
        /// Current position.
        from: SectionPath,
        /// Destination in post-removal coordinates.
        to: SectionPath,
    },
    /// Replace a section header.
    ChangeSectionHeader {
        /// Section to update.
        path: SectionPath,
        /// New header.
        header: Option<SectionHeader>,
    },
    /// Insert items into a section.
    AddItems {
        /// Receiving section.
        section: SectionPath,
        /// Index of the first inserted item.
        index: usize,
        /// Items to insert.
        items: Vec<LayoutItem>,
        /// Stashes consumed by the insertion.
        used_stashes: Vec<String>,
    },
    /// Remove an item, optionally stashing it.
    RemoveItem {
        /// Item to remove.
        path: ItemPath,
        /// Stash receiving the item.
        stash_identifier: Option<String>,
    },
    /// Replace an item with `items`, optionally stashing the replaced item.
    ReplaceItem {
        /// Item to replace.
        path: ItemPath,
        /// Items inserted where the replaced item was.
        items: Vec<LayoutItem>,
        /// Stash receiving the replaced item.
        stash_identifier: Option<String>,
        /// Stashes consumed by the replacement.
        used_stashes: Vec<String>,
    },
    /// Move an item in one atomic step.
    MoveItem {
        /// Current position.
        from: ItemPath,
        /// Receiving section in post-removal coordinates.
        to_section: SectionPath,
        /// Destination index in the receiving section.
        to_index: usize,
    },
    /// Set the authoring height of several items; custom widgets are left untouched.
    ChangeItemsHeight {
        /// Section holding the items.
        section: SectionPath,
        /// Items to resize.
        item_indexes: Vec<usize>,
        /// New height.
        height: u32,
    },
    /// Set the authoring width of an item.
    ChangeItemWidth {
        /// Item to resize.
        path: ItemPath,
        /// New width.
        width: u32,
    },
    /// Apply a widget-level mutation.
    UpdateWidget {
        /// Item holding the widget.
        path: ItemPath,
        /// Mutation to apply.
        action: WidgetAction,
    },
    /// Record the state before an undoable command.
    RecordUndoPoint(UndoEntry),
    /// Restore the layout recorded `steps` undo points ago.
    Undo {
        /// Number of undo points to revert.
        steps: usize,
    },
    /// Replace the document from a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: DashboardSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_layout`] and drained by the effect executor.
pub enum RuntimeEffect {
    /// Recompute container heights along the chain ending at `parent`.
    PropagateHeights {
        /// Deepest container of the chain; `None` is the root layout.
        parent: Option<ItemPath>,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that do not fit the current state.
pub enum ReducerError {
    /// No nested layout exists at the path.
    #[error("layout {0} not found")]
    LayoutNotFound(String),
    /// No section exists at the path.
    #[error("section {0} not found")]
    SectionNotFound(String),
    /// No item exists at the path.
    #[error("item {0} not found")]
    ItemNotFound(String),
    /// Insertion index beyond the end of the sequence.
    #[error("cannot insert at {0}")]
    InvalidPlacement(String),
    /// The stash does not exist.
    #[error("stash {0} not found")]
    StashNotFound(String),
    /// The widget at the path has the wrong kind for the action.
    #[error("widget at {path} is not an {expected} widget")]
    WidgetMismatch {
        /// Item path.
        path: String,
        /// Required widget kind.
        expected: &'static str,
    },
    /// Fewer undo points exist than requested.
    #[error("cannot undo {requested} changes; {available} recorded")]
    NothingToUndo {
        /// Requested steps.
        requested: usize,
        /// Recorded undo points.
        available: usize,
    },
}

/// Applies a [`LayoutAction`] to the dashboard state and collects resulting side effects.
///
/// Structural actions are applied to a working copy and committed only when every step succeeds,
/// so a failing action leaves the state untouched.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action references a missing section, item, layout, or
/// stash, or an index beyond the end of the target sequence.
pub fn reduce_layout(
    state: &mut DashboardState,
    action: LayoutAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        LayoutAction::AddSection {
            path,
            section,
            used_stashes,
        } => {
            let container = find_layout_mut(&mut state.layout, path.parent())
                .ok_or_else(|| layout_not_found(path.parent()))?;
            if path.section_index > container.sections.len() {
                return Err(ReducerError::InvalidPlacement(path.to_string()));
            }
            container.sections.insert(path.section_index, section);
            consume_stashes(state, &used_stashes);
            push_propagation(&mut effects, path.parent().cloned());
        }
        LayoutAction::RemoveSection {
            path,
            stash_identifier,
        } => {
            let section = take_section(&mut state.layout, &path)?;
            if let Some(stash_identifier) = stash_identifier {
                state.stash.insert(stash_identifier, section.items);
            }
            push_propagation(&mut effects, path.parent().cloned());
        }
        LayoutAction::MoveSection { from, to } => {
            let mut layout = state.layout.clone();
            let section = take_section(&mut layout, &from)?;
            let container = find_layout_mut(&mut layout, to.parent())
                .ok_or_else(|| layout_not_found(to.parent()))?;
            if to.section_index > container.sections.len() {
                return Err(ReducerError::InvalidPlacement(to.to_string()));
            }
            container.sections.insert(to.section_index, section);
            state.layout = layout;

            let source_parent = from
                .parent()
                .map(|parent| adjust_after_section_insertion(parent, &to));
            push_propagation(&mut effects, source_parent);
            push_propagation(&mut effects, to.parent().cloned());
        }
        LayoutAction::ChangeSectionHeader { path, header } => {
            let section = find_section_mut(&mut state.layout, &path)
                .ok_or_else(|| ReducerError::SectionNotFound(path.to_string()))?;
            section.header = header;
            push_propagation(&mut effects, path.parent().cloned());
        }
        LayoutAction::AddItems {
            section,
            index,
            items,
            used_stashes,
        } => {
            let target = find_section_mut(&mut state.layout, &section)
                .ok_or_else(|| ReducerError::SectionNotFound(section.to_string()))?;
            if index > target.items.len() {
                return Err(ReducerError::InvalidPlacement(
                    section.item_path(index).to_string(),
                ));
            }
            target.items.splice(index..index, items);
            consume_stashes(state, &used_stashes);
            push_propagation(&mut effects, section.parent().cloned());
        }
        LayoutAction::RemoveItem {
            path,
            stash_identifier,
        } => {
            let item = take_item(&mut state.layout, &path)?;
            if let Some(stash_identifier) = stash_identifier {
                state.stash.insert(stash_identifier, vec![item]);
            }
            push_propagation(&mut effects, path.parent());
        }
        LayoutAction::ReplaceItem {
            path,
            items,
            stash_identifier,
            used_stashes,
        } => {
            let not_found = || ReducerError::ItemNotFound(path.to_string());
            let (section_path, leaf) = path.section_path().zip(path.leaf()).ok_or_else(not_found)?;
            let target = find_section_mut(&mut state.layout, &section_path).ok_or_else(not_found)?;
            if leaf.item_index >= target.items.len() {
                return Err(not_found());
            }
            let replaced: Vec<LayoutItem> = target
                .items
                .splice(leaf.item_index..=leaf.item_index, items)
                .collect();
            // The replaced item may go back into the stash the replacement came from.
            let kept: Vec<String> = used_stashes
                .into_iter()
                .filter(|used| stash_identifier.as_ref() != Some(used))
                .collect();
            consume_stashes(state, &kept);
            if let Some(stash_identifier) = stash_identifier {
                state.stash.insert(stash_identifier, replaced);
            }
            push_propagation(&mut effects, path.parent());
        }
        LayoutAction::MoveItem {
            from,
            to_section,
            to_index,
        } => {
            let mut layout = state.layout.clone();
            let item = take_item(&mut layout, &from)?;
            let target = find_section_mut(&mut layout, &to_section)
                .ok_or_else(|| ReducerError::SectionNotFound(to_section.to_string()))?;
            if to_index > target.items.len() {
                return Err(ReducerError::InvalidPlacement(
                    to_section.item_path(to_index).to_string(),
                ));
            }
            target.items.insert(to_index, item);
            state.layout = layout;

            let inserted = to_section.item_path(to_index);
            let source_parent = from
                .parent()
                .map(|parent| adjust_after_item_insertion(&parent, &inserted));
            push_propagation(&mut effects, source_parent);
            push_propagation(&mut effects, to_section.parent().cloned());
        }
        LayoutAction::ChangeItemsHeight {
            section,
            item_indexes,
            height,
        } => {
            let target = find_section_mut(&mut state.layout, &section)
                .ok_or_else(|| ReducerError::SectionNotFound(section.to_string()))?;
            if let Some(missing) = item_indexes
                .iter()
                .find(|index| **index >= target.items.len())
            {
                return Err(ReducerError::ItemNotFound(
                    section.item_path(*missing).to_string(),
                ));
            }
            for index in &item_indexes {
                let item = &mut target.items[*index];
                if !item.widget.is_custom() {
                    item.size.xl.grid_height = Some(height);
                }
            }
            push_propagation(&mut effects, section.parent().cloned());
        }
        LayoutAction::ChangeItemWidth { path, width } => {
            let item = find_item_mut(&mut state.layout, &path)
                .ok_or_else(|| ReducerError::ItemNotFound(path.to_string()))?;
            item.size.xl.grid_width = width;
        }
        LayoutAction::UpdateWidget { path, action } => {
            let item = find_item_mut(&mut state.layout, &path)
                .ok_or_else(|| ReducerError::ItemNotFound(path.to_string()))?;
            widgets::reduce_widget_action(&path, &mut item.widget, action)?;
        }
        LayoutAction::RecordUndoPoint(entry) => {
            let limit = state.settings.undo_limit;
            state.undo.push(entry, limit);
        }
        LayoutAction::Undo { steps } => {
            let available = state.undo.depth();
            if steps == 0 || steps > available {
                return Err(ReducerError::NothingToUndo {
                    requested: steps,
                    available,
                });
            }
            if let Some(oldest) = state.undo.pop(steps).pop() {
                state.layout = oldest.layout;
                state.stash = oldest.stash;
            }
        }
        LayoutAction::HydrateSnapshot { snapshot } => {
            state.layout = snapshot.layout;
            state.stash = snapshot.stash;
            state.screen = snapshot.screen;
            state.insights = snapshot.insights;
            state.dashboards = snapshot.dashboards;
            state.date_datasets = snapshot.date_datasets;
            state.attribute_filters = snapshot.attribute_filters;
            state.undo.clear();
        }
    }
    Ok(effects)
}

fn push_propagation(effects: &mut Vec<RuntimeEffect>, parent: Option<ItemPath>) {
    let Some(parent) = parent else {
        return;
    };
    let effect = RuntimeEffect::PropagateHeights {
        parent: Some(parent),
    };
    if !effects.contains(&effect) {
        effects.push(effect);
    }
}

fn take_section(
    layout: &mut dashboard_contract::Layout,
    path: &SectionPath,
) -> Result<LayoutSection, ReducerError> {
    let container =
        find_layout_mut(layout, path.parent()).ok_or_else(|| layout_not_found(path.parent()))?;
    if path.section_index >= container.sections.len() {
        return Err(ReducerError::SectionNotFound(path.to_string()));
    }
    Ok(container.sections.remove(path.section_index))
}

fn take_item(
    layout: &mut dashboard_contract::Layout,
    path: &ItemPath,
) -> Result<LayoutItem, ReducerError> {
    let not_found = || ReducerError::ItemNotFound(path.to_string());
    let section_path = path.section_path().ok_or_else(not_found)?;
    let leaf = path.leaf().ok_or_else(not_found)?;
    let section = find_section_mut(layout, &section_path).ok_or_else(not_found)?;
    if leaf.item_index >= section.items.len() {
        return Err(not_found());
    }
    Ok(section.items.remove(leaf.item_index))
}

fn consume_stashes(state: &mut DashboardState, used_stashes: &[String]) {
    for stash_identifier in used_stashes {
        state.stash.remove(stash_identifier);
    }
}

fn layout_not_found(parent: Option<&ItemPath>) -> ReducerError {
    ReducerError::LayoutNotFound(parent.map_or_else(|| "root".to_string(), ToString::to_string))
}
