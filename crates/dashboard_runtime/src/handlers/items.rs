use dashboard_contract::{DashboardCommand, ItemDefinition, RelativeIndex, SectionIndex, SectionPath};

use super::{relative, resolve_item_definitions, resolve_move_index, HandlerContext, HandlerResult};
use crate::coordinates::{adjust_after_item_removal, find_section};
use crate::emitters;
use crate::emitters::invalid_arguments;
use crate::reducer::LayoutAction;
use crate::selectors::{select_layout, select_settings};
use crate::validators::{validate_item_exists, validate_item_placement};

pub(super) fn add_section_items(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    item_index: RelativeIndex,
    definitions: &[ItemDefinition],
) -> HandlerResult {
    let path = section_index.to_path();
    let Some(section) = ctx.select(|state| find_section(&state.layout, &path)) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to add items to non-existing section at {path}."),
        ));
    };
    if !validate_item_placement(section, item_index) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to insert items at invalid index {item_index} of section {path}."),
        ));
    }
    let Some(start_index) = item_index.resolve(section.items.len()) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to insert items at invalid index {item_index} of section {path}."),
        ));
    };
    if definitions.is_empty() {
        return Err(invalid_arguments(command, "Attempting to add no items."));
    }

    let (items, stashes_used) = resolve_item_definitions(ctx, command, definitions)?;
    ctx.put(
        command,
        LayoutAction::AddItems {
            section: path.clone(),
            index: start_index,
            items: items.clone(),
            used_stashes: stashes_used.clone(),
        },
    )?;
    Ok(emitters::layout_section_items_added(
        command,
        path,
        start_index,
        items,
        stashes_used,
    ))
}

pub(super) fn move_section_item(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    item_index: usize,
    to_section_index: &SectionIndex,
    to_item_index: RelativeIndex,
) -> HandlerResult {
    let from_section = section_index.to_path();
    let from = from_section.item_path(item_index);
    let convention = ctx.select(select_settings).move_index_convention;
    let layout = ctx.select(select_layout);

    let Some(item) = find_section(layout, &from_section)
        .filter(|section| validate_item_exists(section, item_index))
        .map(|section| section.items[item_index].clone())
    else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move non-existing item from {from}."),
        ));
    };

    let target = to_section_index.to_path();
    let Some(target_section) = find_section(layout, &target) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move item to non-existing section at {target}."),
        ));
    };
    let target_after_removal = match target.parent() {
        None => target.clone(),
        Some(parent) => match adjust_after_item_removal(parent, &from) {
            Some(adjusted) => SectionPath::new(Some(adjusted), target.section_index),
            None => {
                return Err(invalid_arguments(
                    command,
                    format!("Attempting to move item {from} into itself."),
                ))
            }
        },
    };

    let same_section = from_section == target;
    let source_index = same_section.then_some(item_index);
    let Some(resolved) = resolve_move_index(
        convention,
        to_item_index,
        target_section.items.len(),
        source_index,
    ) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move item to invalid index {to_item_index}."),
        ));
    };

    let mut staged = target_section.clone();
    if same_section {
        staged.items.remove(item_index);
    }
    if !validate_item_placement(&staged, relative(resolved)) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move item to invalid index {to_item_index}."),
        ));
    }
    if same_section && resolved == item_index {
        return Err(invalid_arguments(
            command,
            "Attempting to move item to the same position.",
        ));
    }

    let to = target_after_removal.item_path(resolved);
    ctx.put(
        command,
        LayoutAction::MoveItem {
            from: from.clone(),
            to_section: target_after_removal,
            to_index: resolved,
        },
    )?;
    Ok(emitters::layout_section_item_moved(command, item, from, to))
}

pub(super) fn remove_section_item(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    item_index: usize,
    stash_identifier: Option<&str>,
    eager: bool,
) -> HandlerResult {
    let section_path = section_index.to_path();
    let path = section_path.item_path(item_index);
    let Some((item, last_item)) = ctx.select(|state| {
        find_section(&state.layout, &section_path)
            .filter(|section| validate_item_exists(section, item_index))
            .map(|section| (section.items[item_index].clone(), section.items.len() == 1))
    }) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to remove non-existing item at {path}."),
        ));
    };

    let stash_identifier = stash_identifier.map(str::to_string);
    ctx.put(
        command,
        LayoutAction::RemoveItem {
            path: path.clone(),
            stash_identifier: stash_identifier.clone(),
        },
    )?;

    let section_removed = if eager && last_item {
        let removed = ctx.select(|state| find_section(&state.layout, &section_path).cloned());
        ctx.put(
            command,
            LayoutAction::RemoveSection {
                path: section_path,
                stash_identifier: None,
            },
        )?;
        removed
    } else {
        None
    };

    Ok(emitters::layout_section_item_removed(
        command,
        item,
        path,
        section_removed,
        stash_identifier,
    ))
}

pub(super) fn replace_section_item(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    item_index: usize,
    definition: &ItemDefinition,
    stash_identifier: Option<&str>,
) -> HandlerResult {
    let section_path = section_index.to_path();
    let path = section_path.item_path(item_index);
    let Some(previous_item) = ctx.select(|state| {
        find_section(&state.layout, &section_path)
            .filter(|section| validate_item_exists(section, item_index))
            .map(|section| section.items[item_index].clone())
    }) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to replace non-existing item at {path}."),
        ));
    };

    let (items, stashes_used) =
        resolve_item_definitions(ctx, command, std::slice::from_ref(definition))?;
    if items.is_empty() {
        return Err(invalid_arguments(
            command,
            format!("Attempting to replace item at {path} with no items."),
        ));
    }

    let stash_identifier = stash_identifier.map(str::to_string);
    ctx.put(
        command,
        LayoutAction::ReplaceItem {
            path: path.clone(),
            items: items.clone(),
            stash_identifier: stash_identifier.clone(),
            used_stashes: stashes_used.clone(),
        },
    )?;
    Ok(emitters::layout_section_item_replaced(
        command,
        path,
        previous_item,
        items,
        stashes_used,
        stash_identifier,
    ))
}
