//! Pure precondition checks used by command handlers. They never panic and report only `bool`.

use dashboard_contract::{Layout, LayoutSection, RelativeIndex, SectionPath, SectionTarget};

use crate::coordinates::{find_layout, find_section};

/// Returns `true` when the section path resolves to an existing section.
pub fn validate_section_exists(layout: &Layout, path: &SectionPath) -> bool {
    find_section(layout, path).is_some()
}

/// Returns `true` when every coordinate of the parent chain addresses a nested layout.
pub fn validate_section_path(layout: &Layout, path: &SectionPath) -> bool {
    find_layout(layout, path.parent()).is_some()
}

/// Returns `true` when a section may be inserted at `target`.
///
/// The parent chain must resolve and the index must be `-1` or within `[0, section_count]`.
pub fn validate_section_placement(layout: &Layout, target: &SectionTarget) -> bool {
    find_layout(layout, target.parent()).is_some_and(|container| {
        index_within(target.index, container.sections.len())
    })
}

/// Returns `true` when `item_index` addresses an item of `section`.
pub fn validate_item_exists(section: &LayoutSection, item_index: usize) -> bool {
    item_index < section.items.len()
}

/// Returns `true` when an item may be inserted at `index` (`-1` or within `[0, item_count]`).
pub fn validate_item_placement(section: &LayoutSection, index: RelativeIndex) -> bool {
    index_within(index, section.items.len())
}

fn index_within(index: RelativeIndex, len: usize) -> bool {
    index.resolve(len).is_some_and(|resolved| resolved <= len)
}
