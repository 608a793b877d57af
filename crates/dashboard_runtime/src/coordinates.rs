//! Resolution of section and item paths against a layout tree.
//!
//! Every lookup walks the parent chain from the root; an intermediate coordinate must address an
//! item whose widget is a nested layout. Lookups never panic and report missing targets as `None`.

use dashboard_contract::{
    ItemPath, Layout, LayoutCoordinate, LayoutItem, LayoutSection, ObjRef, SectionPath, Widget,
};

/// Resolves the layout addressed by a parent chain (`None` is the root layout).
pub fn find_layout<'a>(layout: &'a Layout, parent: Option<&ItemPath>) -> Option<&'a Layout> {
    let Some(parent) = parent else {
        return Some(layout);
    };
    parent
        .coordinates()
        .iter()
        .try_fold(layout, |current, coordinate| {
            item_at(current, *coordinate)?.widget.as_layout()
        })
}

/// Mutable variant of [`find_layout`].
pub fn find_layout_mut<'a>(
    layout: &'a mut Layout,
    parent: Option<&ItemPath>,
) -> Option<&'a mut Layout> {
    let Some(parent) = parent else {
        return Some(layout);
    };
    let mut current = layout;
    for coordinate in parent.coordinates() {
        current = current
            .sections
            .get_mut(coordinate.section_index)?
            .items
            .get_mut(coordinate.item_index)?
            .widget
            .as_layout_mut()?;
    }
    Some(current)
}

/// Resolves the sibling sequence a section path points into.
///
/// The sequence exists as soon as the parent chain resolves, even if the section index is out of
/// range, so callers can validate insertions.
pub fn find_sections<'a>(layout: &'a Layout, path: &SectionPath) -> Option<&'a [LayoutSection]> {
    find_layout(layout, path.parent()).map(|layout| layout.sections.as_slice())
}

pub fn find_section<'a>(layout: &'a Layout, path: &SectionPath) -> Option<&'a LayoutSection> {
    find_sections(layout, path)?.get(path.section_index)
}

pub fn find_section_mut<'a>(
    layout: &'a mut Layout,
    path: &SectionPath,
) -> Option<&'a mut LayoutSection> {
    find_layout_mut(layout, path.parent())?
        .sections
        .get_mut(path.section_index)
}

pub fn find_item<'a>(layout: &'a Layout, path: &ItemPath) -> Option<&'a LayoutItem> {
    let (leaf, parent) = path.coordinates().split_last()?;
    let container = find_layout(layout, Some(&ItemPath::new(parent.to_vec())))?;
    item_at(container, *leaf)
}

pub fn find_item_mut<'a>(layout: &'a mut Layout, path: &ItemPath) -> Option<&'a mut LayoutItem> {
    let (leaf, parent) = path.coordinates().split_last()?;
    find_layout_mut(layout, Some(&ItemPath::new(parent.to_vec())))?
        .sections
        .get_mut(leaf.section_index)?
        .items
        .get_mut(leaf.item_index)
}

fn item_at(layout: &Layout, coordinate: LayoutCoordinate) -> Option<&LayoutItem> {
    layout
        .sections
        .get(coordinate.section_index)?
        .items
        .get(coordinate.item_index)
}

/// Finds the first widget matching `reference` in depth-first visual order, including widgets
/// inside nested layouts.
pub fn find_widget_path(layout: &Layout, reference: &ObjRef) -> Option<ItemPath> {
    fn walk(layout: &Layout, reference: &ObjRef, prefix: &ItemPath) -> Option<ItemPath> {
        for (section_index, section) in layout.sections.iter().enumerate() {
            for (item_index, item) in section.items.iter().enumerate() {
                let path = prefix.child(section_index, item_index);
                if item.widget.matches(reference) {
                    return Some(path);
                }
                if let Some(nested) = item.widget.as_layout() {
                    if let Some(found) = walk(nested, reference, &path) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    walk(layout, reference, &ItemPath::default())
}

/// Resolves a widget reference to its path and widget.
pub fn find_widget<'a>(layout: &'a Layout, reference: &ObjRef) -> Option<(ItemPath, &'a Widget)> {
    let path = find_widget_path(layout, reference)?;
    let item = find_item(layout, &path)?;
    Some((path, &item.widget))
}

/// Re-resolves `path` after the section at `removed` was taken out of its layout.
///
/// Returns `None` when `path` runs through the removed section.
pub fn adjust_after_section_removal(path: &ItemPath, removed: &SectionPath) -> Option<ItemPath> {
    shift_section(path, removed, |index| {
        use std::cmp::Ordering::*;
        match index.cmp(&removed.section_index) {
            Less => Some(index),
            Equal => None,
            Greater => Some(index - 1),
        }
    })
}

/// Re-resolves `path` after a section was inserted at `inserted`.
pub fn adjust_after_section_insertion(path: &ItemPath, inserted: &SectionPath) -> ItemPath {
    shift_section(path, inserted, |index| {
        Some(if index >= inserted.section_index {
            index + 1
        } else {
            index
        })
    })
    .unwrap_or_else(|| path.clone())
}

/// Re-resolves `path` after the item at `removed` was taken out of its section.
///
/// Returns `None` when `path` runs through the removed item.
pub fn adjust_after_item_removal(path: &ItemPath, removed: &ItemPath) -> Option<ItemPath> {
    let Some(leaf) = removed.leaf() else {
        return Some(path.clone());
    };
    shift_item(path, removed, |index| {
        use std::cmp::Ordering::*;
        match index.cmp(&leaf.item_index) {
            Less => Some(index),
            Equal => None,
            Greater => Some(index - 1),
        }
    })
}

/// Re-resolves `path` after an item was inserted at `inserted`.
pub fn adjust_after_item_insertion(path: &ItemPath, inserted: &ItemPath) -> ItemPath {
    let Some(leaf) = inserted.leaf() else {
        return path.clone();
    };
    shift_item(path, inserted, |index| {
        Some(if index >= leaf.item_index {
            index + 1
        } else {
            index
        })
    })
    .unwrap_or_else(|| path.clone())
}

fn shift_section(
    path: &ItemPath,
    changed: &SectionPath,
    shift: impl Fn(usize) -> Option<usize>,
) -> Option<ItemPath> {
    let depth = changed.parent().map_or(0, ItemPath::len);
    let in_container = changed
        .parent()
        .map_or(true, |parent| path.starts_with(parent));
    if !in_container || path.len() <= depth {
        return Some(path.clone());
    }
    let step = path.coordinates()[depth];
    let ancestor = ItemPath::new(path.coordinates()[..=depth].to_vec());
    let shifted = ancestor.with_leaf(shift(step.section_index)?, step.item_index);
    Some(extend(shifted, &path.coordinates()[depth + 1..]))
}

fn shift_item(
    path: &ItemPath,
    changed: &ItemPath,
    shift: impl Fn(usize) -> Option<usize>,
) -> Option<ItemPath> {
    let Some((leaf, parent)) = changed.coordinates().split_last() else {
        return Some(path.clone());
    };
    let depth = parent.len();
    let same_section = path.len() > depth
        && path.coordinates()[..depth] == *parent
        && path.coordinates()[depth].section_index == leaf.section_index;
    if !same_section {
        return Some(path.clone());
    }
    let ancestor = ItemPath::new(path.coordinates()[..=depth].to_vec());
    let shifted = ancestor.with_item_index(shift(path.coordinates()[depth].item_index)?);
    Some(extend(shifted, &path.coordinates()[depth + 1..]))
}

fn extend(path: ItemPath, rest: &[LayoutCoordinate]) -> ItemPath {
    rest.iter()
        .fold(path, |acc, step| acc.child(step.section_index, step.item_index))
}
