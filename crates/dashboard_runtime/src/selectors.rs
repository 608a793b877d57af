//! Pure read projections over [`DashboardState`].

use std::collections::BTreeMap;

use dashboard_contract::{ItemPath, Layout, LayoutItem, ObjRef, ScreenSize, Widget};

use crate::coordinates::find_widget;
use crate::model::{CatalogObject, DashboardIdentity, DashboardState, Insight};
use crate::settings::DashboardSettings;

pub fn select_layout(state: &DashboardState) -> &Layout {
    &state.layout
}

pub fn select_settings(state: &DashboardState) -> &DashboardSettings {
    &state.settings
}

pub fn select_insights(state: &DashboardState) -> &[Insight] {
    &state.insights
}

pub fn select_accessible_dashboards(state: &DashboardState) -> &[DashboardIdentity] {
    &state.dashboards
}

pub fn select_date_datasets(state: &DashboardState) -> &[CatalogObject] {
    &state.date_datasets
}

pub fn select_attribute_filters(state: &DashboardState) -> &[CatalogObject] {
    &state.attribute_filters
}

pub fn select_screen(state: &DashboardState) -> ScreenSize {
    state.screen
}

pub fn select_stash(state: &DashboardState) -> &BTreeMap<String, Vec<LayoutItem>> {
    &state.stash
}

pub fn select_undo_depth(state: &DashboardState) -> usize {
    state.undo.depth()
}

/// Resolves a widget reference anywhere in the layout tree.
pub fn select_widget_by_ref<'a>(
    state: &'a DashboardState,
    reference: &ObjRef,
) -> Option<(ItemPath, &'a Widget)> {
    find_widget(&state.layout, reference)
}

/// Resolves an insight from the insights map.
pub fn select_insight_by_ref<'a>(
    state: &'a DashboardState,
    reference: &ObjRef,
) -> Option<&'a Insight> {
    state
        .insights
        .iter()
        .find(|insight| insight.matches(reference))
}
