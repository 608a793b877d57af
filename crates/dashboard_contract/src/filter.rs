use serde::{Deserialize, Serialize};

use crate::widget::ObjRef;

/// How an insight or KPI widget reacts to the dashboard filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetFilterSettings {
    /// Date dataset the dashboard date filter applies through; `None` disables date filtering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_dataset: Option<ObjRef>,
    /// Display forms of the dashboard attribute filters the widget ignores.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_attribute_filters: Vec<ObjRef>,
}

/// Change requested by a filter-settings command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSettingsOperation {
    /// Replace both the date dataset and the ignored attribute filters.
    ReplaceSettings {
        /// New date dataset; `None` disables date filtering.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date_dataset: Option<ObjRef>,
        /// New ignored attribute filters.
        #[serde(default)]
        ignored_attribute_filters: Vec<ObjRef>,
    },
    /// Filter by date through `date_dataset`, keeping ignored attribute filters.
    EnableDateFilter {
        /// Date dataset to use.
        date_dataset: ObjRef,
    },
    /// Stop reacting to the date filter, keeping ignored attribute filters.
    DisableDateFilter,
    /// Replace the ignored attribute filters, keeping the date dataset.
    ReplaceIgnoredAttributeFilters {
        /// Display forms of the filters to ignore.
        display_forms: Vec<ObjRef>,
    },
    /// Add attribute filters to the ignore list.
    IgnoreAttributeFilters {
        /// Display forms of the filters to ignore.
        display_forms: Vec<ObjRef>,
    },
    /// Remove attribute filters from the ignore list.
    UnignoreAttributeFilters {
        /// Display forms of the filters to stop ignoring.
        display_forms: Vec<ObjRef>,
    },
}

impl FilterSettingsOperation {
    /// Applies the operation to `current`.
    ///
    /// References are compared as given, so callers normalize them first. Ignore lists keep
    /// their order and never hold duplicates.
    pub fn apply(&self, current: &WidgetFilterSettings) -> WidgetFilterSettings {
        let mut next = current.clone();
        match self {
            Self::ReplaceSettings {
                date_dataset,
                ignored_attribute_filters,
            } => {
                next.date_dataset = date_dataset.clone();
                next.ignored_attribute_filters = dedup(ignored_attribute_filters.iter());
            }
            Self::EnableDateFilter { date_dataset } => {
                next.date_dataset = Some(date_dataset.clone());
            }
            Self::DisableDateFilter => next.date_dataset = None,
            Self::ReplaceIgnoredAttributeFilters { display_forms } => {
                next.ignored_attribute_filters = dedup(display_forms.iter());
            }
            Self::IgnoreAttributeFilters { display_forms } => {
                next.ignored_attribute_filters =
                    dedup(current.ignored_attribute_filters.iter().chain(display_forms));
            }
            Self::UnignoreAttributeFilters { display_forms } => {
                next.ignored_attribute_filters
                    .retain(|ignored| !display_forms.contains(ignored));
            }
        }
        next
    }
}

fn dedup<'a>(refs: impl Iterator<Item = &'a ObjRef>) -> Vec<ObjRef> {
    let mut unique: Vec<ObjRef> = Vec::new();
    for reference in refs {
        if !unique.contains(reference) {
            unique.push(reference.clone());
        }
    }
    unique
}
