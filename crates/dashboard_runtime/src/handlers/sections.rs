use dashboard_contract::{
    DashboardCommand, ItemDefinition, LayoutSection, SectionHeader, SectionIndex, SectionPath,
    SectionTarget,
};

use super::{relative, resolve_item_definitions, resolve_move_index, HandlerContext, HandlerResult};
use crate::coordinates::{adjust_after_section_removal, find_layout, find_layout_mut, find_section};
use crate::emitters;
use crate::emitters::invalid_arguments;
use crate::reducer::LayoutAction;
use crate::selectors::{select_layout, select_settings};
use crate::validators::{validate_section_exists, validate_section_path, validate_section_placement};

pub(super) fn add_layout_section(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    index: &SectionTarget,
    initial_header: Option<&SectionHeader>,
    initial_items: &[ItemDefinition],
) -> HandlerResult {
    let layout = ctx.select(select_layout);
    if !validate_section_placement(layout, index) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to insert new section at invalid index {index}."),
        ));
    }
    let section_count = find_layout(layout, index.parent()).map_or(0, |found| found.sections.len());
    let Some(position) = index.index.resolve(section_count) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to insert new section at invalid index {index}."),
        ));
    };

    let (items, stashes_used) = resolve_item_definitions(ctx, command, initial_items)?;
    let section = LayoutSection {
        header: initial_header.cloned(),
        items,
    };
    let path = SectionPath::new(index.parent().cloned(), position);

    ctx.put(
        command,
        LayoutAction::AddSection {
            path: path.clone(),
            section: section.clone(),
            used_stashes: stashes_used.clone(),
        },
    )?;
    Ok(emitters::layout_section_added(command, section, path, stashes_used))
}

pub(super) fn move_layout_section(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    to_index: &SectionTarget,
) -> HandlerResult {
    let from = section_index.to_path();
    let convention = ctx.select(select_settings).move_index_convention;
    let layout = ctx.select(select_layout);

    if !validate_section_exists(layout, &from) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move non-existing section at {from}."),
        ));
    }
    let target_parent = to_index.parent().cloned();
    if !validate_section_path(layout, &SectionPath::new(target_parent.clone(), 0)) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move section into non-existing layout at {to_index}."),
        ));
    }
    let Some(section) = find_section(layout, &from).cloned() else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move non-existing section at {from}."),
        ));
    };

    let destination_parent = match &target_parent {
        None => None,
        Some(parent) => match adjust_after_section_removal(parent, &from) {
            Some(adjusted) => Some(adjusted),
            None => {
                return Err(invalid_arguments(
                    command,
                    format!("Attempting to move section {from} into itself."),
                ))
            }
        },
    };

    let same_container = from.parent() == target_parent.as_ref();
    let destination_len =
        find_layout(layout, target_parent.as_ref()).map_or(0, |found| found.sections.len());
    let source_index = same_container.then_some(from.section_index);
    let Some(resolved) =
        resolve_move_index(convention, to_index.index, destination_len, source_index)
    else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move section to invalid index {to_index}."),
        ));
    };

    let mut staged = layout.clone();
    if let Some(container) = find_layout_mut(&mut staged, from.parent()) {
        container.sections.remove(from.section_index);
    }
    let staged_target = SectionTarget {
        parent: destination_parent.clone(),
        index: relative(resolved),
    };
    if !validate_section_placement(&staged, &staged_target) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to move section to invalid index {to_index}."),
        ));
    }
    if same_container && resolved == from.section_index {
        return Err(invalid_arguments(
            command,
            "Attempting to move section to the same position.",
        ));
    }

    let destination = SectionPath::new(destination_parent, resolved);
    tracing::debug!(
        target: "dashboard.layout",
        from = %from,
        to = %destination,
        requested = %to_index,
        "resolved section move"
    );
    ctx.put(
        command,
        LayoutAction::MoveSection {
            from: from.clone(),
            to: destination.clone(),
        },
    )?;
    Ok(emitters::layout_section_moved(
        command,
        section,
        from,
        destination,
    ))
}

pub(super) fn remove_layout_section(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    index: &SectionIndex,
    stash_identifier: Option<&str>,
) -> HandlerResult {
    let path = index.to_path();
    let layout = ctx.select(select_layout);
    if !validate_section_exists(layout, &path) {
        return Err(invalid_arguments(
            command,
            format!("Attempting to remove non-existing section at {path}."),
        ));
    }
    let Some(section) = find_section(layout, &path).cloned() else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to remove non-existing section at {path}."),
        ));
    };

    let stash_identifier = stash_identifier.map(str::to_string);
    ctx.put(
        command,
        LayoutAction::RemoveSection {
            path: path.clone(),
            stash_identifier: stash_identifier.clone(),
        },
    )?;
    Ok(emitters::layout_section_removed(
        command,
        section,
        path,
        stash_identifier,
    ))
}

pub(super) fn change_layout_section_header(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    index: &SectionIndex,
    header: &SectionHeader,
    merge: bool,
) -> HandlerResult {
    let path = index.to_path();
    let Some(previous_header) =
        ctx.select(|state| find_section(&state.layout, &path).map(|section| section.header.clone()))
    else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to change header of non-existing section at {path}."),
        ));
    };

    let next = match (&previous_header, merge) {
        (Some(previous), true) => SectionHeader {
            title: header.title.clone().or_else(|| previous.title.clone()),
            description: header
                .description
                .clone()
                .or_else(|| previous.description.clone()),
        },
        _ => header.clone(),
    };

    ctx.put(
        command,
        LayoutAction::ChangeSectionHeader {
            path: path.clone(),
            header: Some(next.clone()),
        },
    )?;
    Ok(emitters::layout_section_header_changed(
        command,
        path,
        previous_header,
        next,
    ))
}
