use serde::{Deserialize, Serialize};

use crate::widget::ObjRef;

/// Wildcard origin accepted by [`DrillRemoval::from_origins`] meaning "every drill".
pub const ALL_DRILLS: &str = "*";

/// Data point a drill starts from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrillOrigin {
    /// Drill from a measure of the insight.
    FromMeasure {
        /// Measure local identifier.
        local_identifier: String,
    },
    /// Drill from an attribute of the insight.
    FromAttribute {
        /// Attribute local identifier.
        local_identifier: String,
    },
}

impl DrillOrigin {
    /// Returns the origin local identifier used to key drill definitions.
    pub fn local_identifier(&self) -> &str {
        match self {
            Self::FromMeasure { local_identifier } | Self::FromAttribute { local_identifier } => {
                local_identifier
            }
        }
    }
}

/// Where a drill navigates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrillTarget {
    /// Open another insight in an overlay.
    ToInsight {
        /// Target insight.
        insight: ObjRef,
    },
    /// Navigate to a dashboard; `None` targets the current one.
    ToDashboard {
        /// Target dashboard.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dashboard: Option<ObjRef>,
    },
    /// Open a fixed URL.
    ToCustomUrl {
        /// URL template.
        url: String,
    },
    /// Open a URL stored in an attribute hyperlink display form.
    ToAttributeUrl {
        /// Display form providing the drilled value.
        display_form: ObjRef,
        /// Display form holding hyperlinks.
        hyperlink_display_form: ObjRef,
    },
}

/// Drill configured on an insight widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillDefinition {
    /// Drill origin; its local identifier keys the definition.
    pub origin: DrillOrigin,
    /// Drill target.
    pub target: DrillTarget,
}

impl DrillDefinition {
    /// Creates a drill definition.
    pub fn new(origin: DrillOrigin, target: DrillTarget) -> Self {
        Self { origin, target }
    }

    /// Returns the key of the definition.
    pub fn origin_id(&self) -> &str {
        self.origin.local_identifier()
    }
}

/// Selection of drills to remove from a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillRemoval {
    /// Remove every drill definition.
    All,
    /// Remove drills whose origin local identifiers are listed.
    Origins(Vec<String>),
}

impl DrillRemoval {
    /// Builds a selection from origin identifiers; a list containing [`ALL_DRILLS`] selects all.
    pub fn from_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();
        if origins.iter().any(|origin| origin == ALL_DRILLS) {
            Self::All
        } else {
            Self::Origins(origins)
        }
    }

    /// Returns `true` when every drill is selected, including an origin list holding
    /// [`ALL_DRILLS`].
    pub fn selects_all(&self) -> bool {
        match self {
            Self::All => true,
            Self::Origins(origins) => origins.iter().any(|origin| origin == ALL_DRILLS),
        }
    }

    /// Returns `true` when `drill` is selected for removal.
    pub fn selects(&self, drill: &DrillDefinition) -> bool {
        match self {
            Self::Origins(origins) if !self.selects_all() => {
                origins.iter().any(|origin| origin == drill.origin_id())
            }
            _ => true,
        }
    }
}
