use dashboard_contract::{DashboardCommand, SectionIndex};

use super::{HandlerContext, HandlerResult};
use crate::coordinates::{find_item, find_section};
use crate::emitters;
use crate::emitters::{constraint_violation, invalid_arguments};
use crate::reducer::LayoutAction;
use crate::selectors::{select_layout, select_settings};
use crate::sizing::combined_height_limits;

pub(super) fn resize_height(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    item_indexes: &[usize],
    height: u32,
) -> HandlerResult {
    let path = section_index.to_path();
    let Some(section) = ctx.select(|state| find_section(&state.layout, &path)) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to resize items of non-existing section at {path}."),
        ));
    };
    if item_indexes.is_empty() {
        return Err(invalid_arguments(command, "Attempting to resize no items."));
    }
    if let Some(missing) = item_indexes
        .iter()
        .find(|index| **index >= section.items.len())
    {
        return Err(invalid_arguments(
            command,
            format!(
                "Attempting to resize non-existing item at {}.",
                path.item_path(*missing)
            ),
        ));
    }

    let items: Vec<_> = item_indexes.iter().map(|index| &section.items[*index]).collect();
    let previous_heights = items.iter().map(|item| item.size.xl.grid_height).collect();
    let limits = combined_height_limits(
        items
            .iter()
            .filter(|item| !item.widget.is_custom())
            .map(|item| ctx.size_info(&item.widget)),
    );
    let Some(limits) = limits else {
        return Err(invalid_arguments(
            command,
            "Attempting to resize only custom widgets; their height is not managed by the layout.",
        ));
    };
    if !limits.contains(height) {
        return Err(constraint_violation(
            command, "height", height, limits.min, limits.max,
        ));
    }

    ctx.put(
        command,
        LayoutAction::ChangeItemsHeight {
            section: path.clone(),
            item_indexes: item_indexes.to_vec(),
            height,
        },
    )?;
    Ok(emitters::layout_section_items_height_resized(
        command,
        path,
        item_indexes.to_vec(),
        previous_heights,
        height,
    ))
}

pub(super) fn resize_width(
    ctx: &mut HandlerContext<'_>,
    command: &DashboardCommand,
    section_index: &SectionIndex,
    item_index: usize,
    width: u32,
) -> HandlerResult {
    let section_path = section_index.to_path();
    let path = section_path.item_path(item_index);
    let layout = ctx.select(select_layout);
    let Some(item) = find_item(layout, &path) else {
        return Err(invalid_arguments(
            command,
            format!("Attempting to resize non-existing item at {path}."),
        ));
    };

    let available = match section_path.parent() {
        None => ctx.select(select_settings).grid_columns,
        Some(parent) => match find_item(layout, parent) {
            Some(container) => container.size.xl.grid_width,
            None => {
                return Err(invalid_arguments(
                    command,
                    format!("Attempting to resize item in non-existing layout at {parent}."),
                ))
            }
        },
    };
    let info = ctx.size_info(&item.widget);
    let min_limit = info.width.min.min(available);
    let max_limit = info.width.max.min(available);
    if width < min_limit || width > max_limit {
        return Err(constraint_violation(
            command, "width", width, min_limit, max_limit,
        ));
    }

    let previous_width = item.size.xl.grid_width;
    ctx.put(command, LayoutAction::ChangeItemWidth { path: path.clone(), width })?;
    Ok(emitters::layout_section_item_width_resized(
        command,
        path,
        previous_width,
        width,
    ))
}
