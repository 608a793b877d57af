use serde::{Deserialize, Serialize};

use crate::widget::Widget;

/// Responsive breakpoint used to pick the effective item size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenSize {
    /// Extra small screens.
    Xs,
    /// Small screens.
    Sm,
    /// Medium screens.
    Md,
    /// Large screens.
    Lg,
    /// Extra large screens; the authoring breakpoint.
    #[default]
    Xl,
}

/// Grid size of an item at one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    /// Width in grid columns.
    pub grid_width: u32,
    /// Height in grid rows; `None` means the widget default height applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_height: Option<u32>,
}

/// Responsive item size. `xl` is always present; other breakpoints fall back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSize {
    /// Extra large (authoring) size.
    pub xl: GridSize,
    /// Large screen override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lg: Option<GridSize>,
    /// Medium screen override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<GridSize>,
    /// Small screen override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sm: Option<GridSize>,
    /// Extra small screen override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xs: Option<GridSize>,
}

impl ItemSize {
    /// Creates an `xl`-only size.
    pub fn new(grid_width: u32, grid_height: Option<u32>) -> Self {
        Self {
            xl: GridSize {
                grid_width,
                grid_height,
            },
            lg: None,
            md: None,
            sm: None,
            xs: None,
        }
    }

    /// Returns the effective size for `screen`, falling back to `xl`.
    pub fn for_screen(&self, screen: ScreenSize) -> &GridSize {
        let specific = match screen {
            ScreenSize::Xs => self.xs.as_ref(),
            ScreenSize::Sm => self.sm.as_ref(),
            ScreenSize::Md => self.md.as_ref(),
            ScreenSize::Lg => self.lg.as_ref(),
            ScreenSize::Xl => None,
        };
        specific.unwrap_or(&self.xl)
    }
}

/// Optional section header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionHeader {
    /// Header title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Header description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SectionHeader {
    /// Creates a header with a title only.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    /// Returns `true` when neither title nor description carries text.
    pub fn is_blank(&self) -> bool {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);
        blank(&self.title) && blank(&self.description)
    }
}

/// One widget slot in a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Responsive size.
    pub size: ItemSize,
    /// Placed widget.
    pub widget: Widget,
}

impl LayoutItem {
    /// Creates an item with an `xl`-only size.
    pub fn new(widget: Widget, grid_width: u32, grid_height: Option<u32>) -> Self {
        Self {
            size: ItemSize::new(grid_width, grid_height),
            widget,
        }
    }
}

/// Ordered group of items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutSection {
    /// Optional header rendered above the items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SectionHeader>,
    /// Items in visual order.
    #[serde(default)]
    pub items: Vec<LayoutItem>,
}

impl LayoutSection {
    /// Creates a headerless section.
    pub fn new(items: Vec<LayoutItem>) -> Self {
        Self {
            header: None,
            items,
        }
    }

    /// Returns a copy of the section carrying `header`.
    pub fn with_header(mut self, header: SectionHeader) -> Self {
        self.header = Some(header);
        self
    }
}

/// Flow direction of a layout's sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Items flow left to right and sections stack vertically.
    #[default]
    Row,
    /// Items stack vertically inside a section.
    Column,
}

/// Per-layout rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfiguration {
    /// Flow direction.
    #[serde(default)]
    pub direction: LayoutDirection,
    /// Whether section headers are rendered (and therefore take vertical space).
    #[serde(default = "default_enable_section_headers")]
    pub enable_section_headers: bool,
}

fn default_enable_section_headers() -> bool {
    true
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::Row,
            enable_section_headers: true,
        }
    }
}

/// Layout tree: sections of items, where items may embed nested layouts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    /// Sections in visual order.
    #[serde(default)]
    pub sections: Vec<LayoutSection>,
    /// Rendering configuration.
    #[serde(default)]
    pub configuration: LayoutConfiguration,
}

impl Layout {
    /// Creates a layout with default configuration.
    pub fn new(sections: Vec<LayoutSection>) -> Self {
        Self {
            sections,
            configuration: LayoutConfiguration::default(),
        }
    }
}
