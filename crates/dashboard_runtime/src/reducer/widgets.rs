use serde_json::Value;

use dashboard_contract::{DrillDefinition, ItemPath, Widget, WidgetFilterSettings};

use super::ReducerError;

#[derive(Debug, Clone, PartialEq)]
/// Widget-level mutations applied through [`super::LayoutAction::UpdateWidget`].
pub enum WidgetAction {
    /// Replace insight visualization properties.
    SetVisProperties {
        /// New properties.
        properties: Option<Value>,
    },
    /// Rename an insight or KPI widget.
    SetTitle {
        /// New title.
        title: String,
    },
    /// Replace the drill definitions of an insight widget.
    SetDrills {
        /// Complete drill list.
        drills: Vec<DrillDefinition>,
    },
    /// Replace the filter settings of an insight or KPI widget.
    SetFilterSettings {
        /// New settings.
        settings: WidgetFilterSettings,
    },
}

pub(super) fn reduce_widget_action(
    path: &ItemPath,
    widget: &mut Widget,
    action: WidgetAction,
) -> Result<(), ReducerError> {
    let mismatch = |expected: &'static str| ReducerError::WidgetMismatch {
        path: path.to_string(),
        expected,
    };
    match action {
        WidgetAction::SetVisProperties { properties } => match widget {
            Widget::Insight(insight) => insight.properties = properties,
            _ => return Err(mismatch("insight")),
        },
        WidgetAction::SetTitle { title } => match widget {
            Widget::Insight(insight) => insight.title = title,
            Widget::Kpi(kpi) => kpi.title = title,
            _ => return Err(mismatch("insight or kpi")),
        },
        WidgetAction::SetDrills { drills } => match widget {
            Widget::Insight(insight) => insight.drills = drills,
            _ => return Err(mismatch("insight")),
        },
        WidgetAction::SetFilterSettings { settings } => match widget {
            Widget::Insight(insight) => insight.filter_settings = settings,
            Widget::Kpi(kpi) => kpi.filter_settings = settings,
            _ => return Err(mismatch("insight or kpi")),
        },
    }
    Ok(())
}
