//! Bottom-up recomputation of nested container heights.

use dashboard_contract::{ItemPath, Layout, LayoutItem};

use crate::coordinates::{find_item, find_item_mut};
use crate::sizing::{InsightSizingProvider, SizingContext};

/// Containers inspected and updated by one propagation walk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropagationReport {
    /// Container paths visited, deepest first.
    pub visited: Vec<ItemPath>,
    /// Container paths whose height changed.
    pub updated: Vec<ItemPath>,
}

/// Height an item occupies: its explicit height or the provider default.
pub fn item_height(
    item: &LayoutItem,
    provider: &dyn InsightSizingProvider,
    context: &SizingContext<'_>,
) -> u32 {
    item.size
        .xl
        .grid_height
        .unwrap_or_else(|| provider.size_info(&item.widget, context).height.default)
}

/// Height a layout needs: per section, the tallest item plus the header when headers render.
pub fn required_height(
    layout: &Layout,
    provider: &dyn InsightSizingProvider,
    context: &SizingContext<'_>,
) -> u32 {
    let header_height = context.settings.section_header_height;
    layout
        .sections
        .iter()
        .map(|section| {
            let header = match &section.header {
                Some(header) if layout.configuration.enable_section_headers && !header.is_blank() => {
                    header_height
                }
                _ => 0,
            };
            let tallest = section
                .items
                .iter()
                .map(|item| item_height(item, provider, context))
                .max()
                .unwrap_or(0);
            header + tallest
        })
        .sum()
}

/// Recomputes the heights of every container on the chain ending at `parent`, deepest first.
///
/// Only the containers named by the chain are touched; siblings and unrelated branches are not
/// visited. A `None` parent (root layout) has no container to update.
pub fn propagate_heights(
    layout: &mut Layout,
    parent: Option<&ItemPath>,
    provider: &dyn InsightSizingProvider,
    context: &SizingContext<'_>,
) -> PropagationReport {
    let mut report = PropagationReport::default();
    let Some(parent) = parent else {
        return report;
    };

    for depth in (1..=parent.len()).rev() {
        let container_path = ItemPath::new(parent.coordinates()[..depth].to_vec());
        let Some(item) = find_item(layout, &container_path) else {
            continue;
        };
        let Some(nested) = item.widget.as_layout() else {
            continue;
        };
        let required = required_height(nested, provider, context);
        let current = item.size.xl.grid_height;
        report.visited.push(container_path.clone());

        if current != Some(required) {
            if let Some(item) = find_item_mut(layout, &container_path) {
                item.size.xl.grid_height = Some(required);
            }
            tracing::trace!(
                target: "dashboard.layout",
                container = %container_path,
                previous = ?current,
                height = required,
                "container height updated"
            );
            report.updated.push(container_path);
        }
    }

    report
}
