use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dashboard_contract::{Layout, LayoutItem, ObjRef, ScreenSize};

use crate::settings::DashboardSettings;

pub const DASHBOARD_SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationType {
    Table,
    Headline,
    Bar,
    Column,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Heatmap,
    Geo,
}

/// Insight metadata loaded alongside the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub identifier: String,
    pub uri: String,
    pub title: String,
    pub visualization_type: VisualizationType,
    /// Local identifiers of measures usable as drill origins.
    #[serde(default)]
    pub measures: Vec<String>,
    /// Local identifiers of attributes usable as drill origins.
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Number of result rows, when the backend reported one.
    #[serde(default)]
    pub row_count: Option<u32>,
}

impl Insight {
    pub fn new(identifier: impl Into<String>, visualization_type: VisualizationType) -> Self {
        let identifier = identifier.into();
        Self {
            uri: format!("/insights/{identifier}"),
            title: identifier.clone(),
            identifier,
            visualization_type,
            measures: Vec::new(),
            attributes: Vec::new(),
            row_count: None,
        }
    }

    pub fn matches(&self, reference: &ObjRef) -> bool {
        match reference {
            ObjRef::Identifier(identifier) => &self.identifier == identifier,
            ObjRef::Uri(uri) => &self.uri == uri,
            ObjRef::LocalId(_) => false,
        }
    }

    pub fn reference(&self) -> ObjRef {
        ObjRef::Identifier(self.identifier.clone())
    }
}

/// Dashboard the current user may navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardIdentity {
    pub identifier: String,
    pub uri: String,
    pub title: String,
}

impl DashboardIdentity {
    pub fn matches(&self, reference: &ObjRef) -> bool {
        match reference {
            ObjRef::Identifier(identifier) => &self.identifier == identifier,
            ObjRef::Uri(uri) => &self.uri == uri,
            ObjRef::LocalId(_) => false,
        }
    }

    pub fn reference(&self) -> ObjRef {
        ObjRef::Identifier(self.identifier.clone())
    }
}

/// Date dataset or attribute display form the dashboard filters can work with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogObject {
    pub identifier: String,
    pub uri: String,
    pub title: String,
}

impl CatalogObject {
    pub fn new(identifier: impl Into<String>, uri: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            title: identifier.clone(),
            identifier,
            uri: uri.into(),
        }
    }

    pub fn matches(&self, reference: &ObjRef) -> bool {
        match reference {
            ObjRef::Identifier(identifier) => &self.identifier == identifier,
            ObjRef::Uri(uri) => &self.uri == uri,
            ObjRef::LocalId(_) => false,
        }
    }

    pub fn reference(&self) -> ObjRef {
        ObjRef::Identifier(self.identifier.clone())
    }
}

/// Layout and stash as they were before an undoable command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub command_type: String,
    pub correlation_id: Option<String>,
    pub layout: Layout,
    pub stash: BTreeMap<String, Vec<LayoutItem>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UndoHistory {
    entries: Vec<UndoEntry>,
}

impl UndoHistory {
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[UndoEntry] {
        &self.entries
    }

    /// Records an entry, dropping the oldest ones beyond `limit`.
    pub fn push(&mut self, entry: UndoEntry, limit: usize) {
        self.entries.push(entry);
        if self.entries.len() > limit {
            let overflow = self.entries.len() - limit;
            self.entries.drain(..overflow);
        }
    }

    /// Removes the newest `steps` entries, most recent first.
    pub fn pop(&mut self, steps: usize) -> Vec<UndoEntry> {
        let keep = self.entries.len().saturating_sub(steps);
        let mut popped = self.entries.split_off(keep);
        popped.reverse();
        popped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub layout: Layout,
    pub stash: BTreeMap<String, Vec<LayoutItem>>,
    pub undo: UndoHistory,
    pub screen: ScreenSize,
    pub settings: DashboardSettings,
    pub insights: Vec<Insight>,
    pub dashboards: Vec<DashboardIdentity>,
    /// Date datasets available to the dashboard date filter.
    pub date_datasets: Vec<CatalogObject>,
    /// Display forms of the dashboard attribute filters.
    pub attribute_filters: Vec<CatalogObject>,
}

impl DashboardState {
    pub fn new(layout: Layout, settings: DashboardSettings) -> Self {
        Self {
            layout,
            settings,
            ..Self::default()
        }
    }

    pub fn with_insights(mut self, insights: Vec<Insight>) -> Self {
        self.insights = insights;
        self
    }

    pub fn with_dashboards(mut self, dashboards: Vec<DashboardIdentity>) -> Self {
        self.dashboards = dashboards;
        self
    }

    pub fn with_filter_catalog(
        mut self,
        date_datasets: Vec<CatalogObject>,
        attribute_filters: Vec<CatalogObject>,
    ) -> Self {
        self.date_datasets = date_datasets;
        self.attribute_filters = attribute_filters;
        self
    }

    pub fn with_screen(mut self, screen: ScreenSize) -> Self {
        self.screen = screen;
        self
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            schema_version: DASHBOARD_SNAPSHOT_SCHEMA_VERSION,
            layout: self.layout.clone(),
            stash: self.stash.clone(),
            screen: self.screen,
            insights: self.insights.clone(),
            dashboards: self.dashboards.clone(),
            date_datasets: self.date_datasets.clone(),
            attribute_filters: self.attribute_filters.clone(),
        }
    }

    /// Restores state from a snapshot. Undo history is not persisted and starts empty.
    pub fn from_snapshot(snapshot: DashboardSnapshot, settings: DashboardSettings) -> Self {
        Self {
            layout: snapshot.layout,
            stash: snapshot.stash,
            undo: UndoHistory::default(),
            screen: snapshot.screen,
            settings,
            insights: snapshot.insights,
            dashboards: snapshot.dashboards,
            date_datasets: snapshot.date_datasets,
            attribute_filters: snapshot.attribute_filters,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub schema_version: u32,
    pub layout: Layout,
    #[serde(default)]
    pub stash: BTreeMap<String, Vec<LayoutItem>>,
    #[serde(default)]
    pub screen: ScreenSize,
    #[serde(default)]
    pub insights: Vec<Insight>,
    #[serde(default)]
    pub dashboards: Vec<DashboardIdentity>,
    #[serde(default)]
    pub date_datasets: Vec<CatalogObject>,
    #[serde(default)]
    pub attribute_filters: Vec<CatalogObject>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(command_type: &str) -> UndoEntry {
        UndoEntry {
            command_type: command_type.to_string(),
            correlation_id: None,
            layout: Layout::default(),
            stash: BTreeMap::new(),
        }
    }

    #[test]
    fn undo_history_honors_limit_and_pops_newest_first() {
        let mut history = UndoHistory::default();
        for name in ["a", "b", "c", "d"] {
            history.push(entry(name), 3);
        }

        assert_eq!(history.depth(), 3);
        let popped: Vec<_> = history
            .pop(2)
            .into_iter()
            .map(|entry| entry.command_type)
            .collect();
        assert_eq!(popped, vec!["d".to_string(), "c".to_string()]);
        assert_eq!(history.entries()[0].command_type, "b");
    }

    #[test]
    fn snapshot_round_trip_drops_undo_history() {
        let mut state = DashboardState::default()
            .with_insights(vec![Insight::new("i1", VisualizationType::Table)])
            .with_screen(ScreenSize::Md);
        state.undo.push(entry("x"), 10);

        let restored = DashboardState::from_snapshot(state.snapshot(), state.settings.clone());

        assert_eq!(restored.insights, state.insights);
        assert_eq!(restored.screen, ScreenSize::Md);
        assert_eq!(restored.undo.depth(), 0);
    }

    #[test]
    fn insight_matches_identifier_and_uri_only() {
        let insight = Insight::new("i1", VisualizationType::Bar);
        assert!(insight.matches(&ObjRef::identifier("i1")));
        assert!(insight.matches(&ObjRef::uri("/insights/i1")));
        assert!(!insight.matches(&ObjRef::local_id("i1")));
    }
}
