use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drill::DrillDefinition;
use crate::filter::WidgetFilterSettings;
use crate::layout::Layout;

/// Reference to a metadata object or widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjRef {
    /// Reference by stable identifier.
    Identifier(String),
    /// Reference by URI.
    Uri(String),
    /// Reference by client-side local identifier.
    LocalId(String),
}

impl ObjRef {
    /// Creates an identifier reference.
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self::Identifier(identifier.into())
    }

    /// Creates a URI reference.
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    /// Creates a local identifier reference.
    pub fn local_id(local_id: impl Into<String>) -> Self {
        Self::LocalId(local_id.into())
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(identifier) => write!(f, "identifier:{identifier}"),
            Self::Uri(uri) => write!(f, "uri:{uri}"),
            Self::LocalId(local_id) => write!(f, "local_id:{local_id}"),
        }
    }
}

/// Identity fields shared by every widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WidgetIdentity {
    /// Stable identifier.
    pub identifier: String,
    /// Backend URI.
    pub uri: String,
    /// Client-side local identifier for widgets not yet persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
}

impl WidgetIdentity {
    /// Creates an identity whose URI is derived from the identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        Self {
            uri: format!("/widgets/{identifier}"),
            identifier,
            local_id: None,
        }
    }

    /// Returns `true` when `reference` addresses this widget.
    pub fn matches(&self, reference: &ObjRef) -> bool {
        match reference {
            ObjRef::Identifier(identifier) => &self.identifier == identifier,
            ObjRef::Uri(uri) => &self.uri == uri,
            ObjRef::LocalId(local_id) => self.local_id.as_ref() == Some(local_id),
        }
    }

    /// Returns the canonical identifier reference.
    pub fn reference(&self) -> ObjRef {
        ObjRef::Identifier(self.identifier.clone())
    }
}

/// Widget rendering a saved insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightWidget {
    /// Widget identity.
    #[serde(flatten)]
    pub identity: WidgetIdentity,
    /// Header title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rendered insight.
    pub insight: ObjRef,
    /// Visualization property overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    /// Configured drill definitions keyed by origin.
    #[serde(default)]
    pub drills: Vec<DrillDefinition>,
    /// Reaction to the dashboard filters.
    #[serde(default)]
    pub filter_settings: WidgetFilterSettings,
}

/// Widget rendering a single metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiWidget {
    /// Widget identity.
    #[serde(flatten)]
    pub identity: WidgetIdentity,
    /// Header title.
    pub title: String,
    /// Measured metric.
    pub metric: ObjRef,
    /// Configured drill definitions.
    #[serde(default)]
    pub drills: Vec<DrillDefinition>,
    /// Reaction to the dashboard filters.
    #[serde(default)]
    pub filter_settings: WidgetFilterSettings,
}

/// Static rich text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextWidget {
    /// Widget identity.
    #[serde(flatten)]
    pub identity: WidgetIdentity,
    /// Markdown content.
    pub content: String,
}

/// Container widget embedding a nested layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutWidget {
    /// Widget identity.
    #[serde(flatten)]
    pub identity: WidgetIdentity,
    /// Nested layout.
    pub layout: Layout,
}

/// Host-provided widget the runtime treats as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomWidget {
    /// Widget identity.
    #[serde(flatten)]
    pub identity: WidgetIdentity,
    /// Host-defined widget type.
    pub custom_type: String,
    /// Host-defined payload.
    #[serde(default)]
    pub payload: Value,
}

/// Widget placed in a layout item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    /// Insight widget.
    Insight(InsightWidget),
    /// KPI widget.
    Kpi(KpiWidget),
    /// Rich text widget.
    RichText(RichTextWidget),
    /// Nested layout container.
    Layout(LayoutWidget),
    /// Custom widget.
    Custom(CustomWidget),
}

/// Discriminant of [`Widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// [`Widget::Insight`].
    Insight,
    /// [`Widget::Kpi`].
    Kpi,
    /// [`Widget::RichText`].
    RichText,
    /// [`Widget::Layout`].
    Layout,
    /// [`Widget::Custom`].
    Custom,
}

impl WidgetKind {
    /// Returns a lowercase label for messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Insight => "insight",
            Self::Kpi => "kpi",
            Self::RichText => "rich text",
            Self::Layout => "layout",
            Self::Custom => "custom",
        }
    }
}

impl Widget {
    /// Returns the widget discriminant.
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Insight(_) => WidgetKind::Insight,
            Self::Kpi(_) => WidgetKind::Kpi,
            Self::RichText(_) => WidgetKind::RichText,
            Self::Layout(_) => WidgetKind::Layout,
            Self::Custom(_) => WidgetKind::Custom,
        }
    }

    /// Returns the identity fields.
    pub fn identity(&self) -> &WidgetIdentity {
        match self {
            Self::Insight(widget) => &widget.identity,
            Self::Kpi(widget) => &widget.identity,
            Self::RichText(widget) => &widget.identity,
            Self::Layout(widget) => &widget.identity,
            Self::Custom(widget) => &widget.identity,
        }
    }

    /// Returns `true` when `reference` addresses this widget.
    pub fn matches(&self, reference: &ObjRef) -> bool {
        self.identity().matches(reference)
    }

    /// Returns the nested layout of a container widget.
    pub fn as_layout(&self) -> Option<&Layout> {
        match self {
            Self::Layout(widget) => Some(&widget.layout),
            _ => None,
        }
    }

    /// Mutable variant of [`Widget::as_layout`].
    pub fn as_layout_mut(&mut self) -> Option<&mut Layout> {
        match self {
            Self::Layout(widget) => Some(&mut widget.layout),
            _ => None,
        }
    }

    /// Returns the filter settings of insight and KPI widgets.
    pub fn filter_settings(&self) -> Option<&WidgetFilterSettings> {
        match self {
            Self::Insight(widget) => Some(&widget.filter_settings),
            Self::Kpi(widget) => Some(&widget.filter_settings),
            _ => None,
        }
    }

    /// Returns `true` for host-provided widgets.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}
