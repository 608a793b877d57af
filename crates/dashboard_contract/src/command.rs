use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::drill::{DrillDefinition, DrillRemoval};
use crate::filter::FilterSettingsOperation;
use crate::layout::{LayoutItem, SectionHeader};
use crate::path::{RelativeIndex, SectionIndex, SectionTarget};
use crate::widget::ObjRef;

/// Item to place by an add command: a fresh item or the contents of a stash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemDefinition {
    /// New item.
    Item(LayoutItem),
    /// Items previously parked under a stash identifier.
    Stash(String),
}

/// Command payloads accepted by the dashboard runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandPayload {
    /// Insert a new section.
    AddLayoutSection {
        /// Destination of the new section.
        index: SectionTarget,
        /// Header of the new section.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_header: Option<SectionHeader>,
        /// Items placed in the new section.
        #[serde(default)]
        initial_items: Vec<ItemDefinition>,
    },
    /// Move a section to another position, possibly into another layout.
    MoveLayoutSection {
        /// Section to move.
        section_index: SectionIndex,
        /// Destination.
        to_index: SectionTarget,
    },
    /// Remove a section.
    RemoveLayoutSection {
        /// Section to remove.
        index: SectionIndex,
        /// Stash receiving the section's items.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<String>,
    },
    /// Replace or merge a section header.
    ChangeLayoutSectionHeader {
        /// Section to update.
        index: SectionIndex,
        /// New header.
        header: SectionHeader,
        /// Keep existing header fields the new header leaves empty.
        #[serde(default)]
        merge: bool,
    },
    /// Insert items into a section.
    AddSectionItems {
        /// Receiving section.
        section_index: SectionIndex,
        /// Insertion index within the section.
        item_index: RelativeIndex,
        /// Items to insert.
        items: Vec<ItemDefinition>,
    },
    /// Move an item to another position, possibly into another section.
    MoveSectionItem {
        /// Section holding the item.
        section_index: SectionIndex,
        /// Item to move.
        item_index: usize,
        /// Receiving section.
        to_section_index: SectionIndex,
        /// Destination index within the receiving section.
        to_item_index: RelativeIndex,
    },
    /// Remove an item.
    RemoveSectionItem {
        /// Section holding the item.
        section_index: SectionIndex,
        /// Item to remove.
        item_index: usize,
        /// Stash receiving the item.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<String>,
        /// Also remove the section when it becomes empty.
        #[serde(default)]
        eager: bool,
    },
    /// Replace an item with a fresh item or the contents of a stash.
    ReplaceSectionItem {
        /// Section holding the item.
        section_index: SectionIndex,
        /// Item to replace.
        item_index: usize,
        /// Replacement.
        item: ItemDefinition,
        /// Stash receiving the replaced item.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<String>,
    },
    /// Set the height of several items in one section.
    ResizeHeight {
        /// Section holding the items.
        section_index: SectionIndex,
        /// Items to resize.
        item_indexes: Vec<usize>,
        /// New height in grid rows.
        height: u32,
    },
    /// Set the width of one item.
    ResizeWidth {
        /// Section holding the item.
        section_index: SectionIndex,
        /// Item to resize.
        item_index: usize,
        /// New width in grid columns.
        width: u32,
    },
    /// Replace visualization properties of an insight widget.
    ChangeInsightWidgetVisProperties {
        /// Target widget.
        widget_ref: ObjRef,
        /// New properties; `None` clears overrides.
        properties: Option<Value>,
    },
    /// Rename an insight or KPI widget.
    ChangeWidgetHeader {
        /// Target widget.
        widget_ref: ObjRef,
        /// New title.
        title: String,
    },
    /// Add or update drill definitions of an insight widget.
    ModifyDrillsForInsightWidget {
        /// Target widget.
        widget_ref: ObjRef,
        /// Definitions keyed by origin.
        drills: Vec<DrillDefinition>,
    },
    /// Remove drill definitions of an insight widget.
    RemoveDrillsForInsightWidget {
        /// Target widget.
        widget_ref: ObjRef,
        /// Drills to remove.
        origins: DrillRemoval,
    },
    /// Change how an insight widget reacts to the dashboard filters.
    ChangeInsightWidgetFilterSettings {
        /// Target widget.
        widget_ref: ObjRef,
        /// Requested change.
        operation: FilterSettingsOperation,
    },
    /// Change how a KPI widget reacts to the dashboard filters.
    ChangeKpiWidgetFilterSettings {
        /// Target widget.
        widget_ref: ObjRef,
        /// Requested change.
        operation: FilterSettingsOperation,
    },
    /// Revert the most recent undoable layout changes.
    UndoLayoutChanges {
        /// Number of changes to revert.
        steps: usize,
    },
}

impl CommandPayload {
    /// Returns the stable command type name.
    pub fn command_type(&self) -> &'static str {
        match self {
            Self::AddLayoutSection { .. } => "CMD.LAYOUT.ADD_SECTION",
            Self::MoveLayoutSection { .. } => "CMD.LAYOUT.MOVE_SECTION",
            Self::RemoveLayoutSection { .. } => "CMD.LAYOUT.REMOVE_SECTION",
            Self::ChangeLayoutSectionHeader { .. } => "CMD.LAYOUT.CHANGE_SECTION_HEADER",
            Self::AddSectionItems { .. } => "CMD.LAYOUT.ADD_ITEMS",
            Self::MoveSectionItem { .. } => "CMD.LAYOUT.MOVE_ITEM",
            Self::RemoveSectionItem { .. } => "CMD.LAYOUT.REMOVE_ITEM",
            Self::ReplaceSectionItem { .. } => "CMD.LAYOUT.REPLACE_ITEM",
            Self::ResizeHeight { .. } => "CMD.LAYOUT.RESIZE_HEIGHT",
            Self::ResizeWidth { .. } => "CMD.LAYOUT.RESIZE_WIDTH",
            Self::ChangeInsightWidgetVisProperties { .. } => {
                "CMD.INSIGHT_WIDGET.CHANGE_PROPERTIES"
            }
            Self::ChangeWidgetHeader { .. } => "CMD.WIDGET.CHANGE_HEADER",
            Self::ModifyDrillsForInsightWidget { .. } => "CMD.INSIGHT_WIDGET.MODIFY_DRILLS",
            Self::RemoveDrillsForInsightWidget { .. } => "CMD.INSIGHT_WIDGET.REMOVE_DRILLS",
            Self::ChangeInsightWidgetFilterSettings { .. } => {
                "CMD.INSIGHT_WIDGET.CHANGE_FILTER_SETTINGS"
            }
            Self::ChangeKpiWidgetFilterSettings { .. } => "CMD.KPI_WIDGET.CHANGE_FILTER_SETTINGS",
            Self::UndoLayoutChanges { .. } => "CMD.LAYOUT.UNDO",
        }
    }

    /// Returns `true` when a successful run should record an undo point.
    pub fn is_undoable(&self) -> bool {
        !matches!(
            self,
            Self::ResizeHeight { .. } | Self::ResizeWidth { .. } | Self::UndoLayoutChanges { .. }
        )
    }
}

/// Command envelope: payload plus an optional caller correlation id echoed in results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardCommand {
    /// Opaque caller correlation id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Command payload.
    pub payload: CommandPayload,
}

impl DashboardCommand {
    /// Creates a command without a correlation id.
    pub fn new(payload: CommandPayload) -> Self {
        Self {
            correlation_id: None,
            payload,
        }
    }

    /// Returns the command carrying `correlation_id`.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Returns the stable command type name.
    pub fn command_type(&self) -> &'static str {
        self.payload.command_type()
    }

    /// Creates an [`CommandPayload::AddLayoutSection`] command.
    pub fn add_layout_section(
        index: impl Into<SectionTarget>,
        initial_header: Option<SectionHeader>,
        initial_items: Vec<ItemDefinition>,
    ) -> Self {
        Self::new(CommandPayload::AddLayoutSection {
            index: index.into(),
            initial_header,
            initial_items,
        })
    }

    /// Creates a [`CommandPayload::MoveLayoutSection`] command.
    pub fn move_layout_section(
        section_index: impl Into<SectionIndex>,
        to_index: impl Into<SectionTarget>,
    ) -> Self {
        Self::new(CommandPayload::MoveLayoutSection {
            section_index: section_index.into(),
            to_index: to_index.into(),
        })
    }

    /// Creates a [`CommandPayload::RemoveLayoutSection`] command.
    pub fn remove_layout_section(
        index: impl Into<SectionIndex>,
        stash_identifier: Option<String>,
    ) -> Self {
        Self::new(CommandPayload::RemoveLayoutSection {
            index: index.into(),
            stash_identifier,
        })
    }

    /// Creates a [`CommandPayload::ChangeLayoutSectionHeader`] command.
    pub fn change_layout_section_header(
        index: impl Into<SectionIndex>,
        header: SectionHeader,
        merge: bool,
    ) -> Self {
        Self::new(CommandPayload::ChangeLayoutSectionHeader {
            index: index.into(),
            header,
            merge,
        })
    }

    /// Creates an [`CommandPayload::AddSectionItems`] command.
    pub fn add_section_items(
        section_index: impl Into<SectionIndex>,
        item_index: i64,
        items: Vec<ItemDefinition>,
    ) -> Self {
        Self::new(CommandPayload::AddSectionItems {
            section_index: section_index.into(),
            item_index: RelativeIndex(item_index),
            items,
        })
    }

    /// Creates a [`CommandPayload::MoveSectionItem`] command.
    pub fn move_section_item(
        section_index: impl Into<SectionIndex>,
        item_index: usize,
        to_section_index: impl Into<SectionIndex>,
        to_item_index: i64,
    ) -> Self {
        Self::new(CommandPayload::MoveSectionItem {
            section_index: section_index.into(),
            item_index,
            to_section_index: to_section_index.into(),
            to_item_index: RelativeIndex(to_item_index),
        })
    }

    /// Creates a [`CommandPayload::RemoveSectionItem`] command.
    pub fn remove_section_item(
        section_index: impl Into<SectionIndex>,
        item_index: usize,
        stash_identifier: Option<String>,
        eager: bool,
    ) -> Self {
        Self::new(CommandPayload::RemoveSectionItem {
            section_index: section_index.into(),
            item_index,
            stash_identifier,
            eager,
        })
    }

    /// Creates a [`CommandPayload::ReplaceSectionItem`] command.
    pub fn replace_section_item(
        section_index: impl Into<SectionIndex>,
        item_index: usize,
        item: ItemDefinition,
        stash_identifier: Option<String>,
    ) -> Self {
        Self::new(CommandPayload::ReplaceSectionItem {
            section_index: section_index.into(),
            item_index,
            item,
            stash_identifier,
        })
    }

    /// Creates a [`CommandPayload::ResizeHeight`] command.
    pub fn resize_height(
        section_index: impl Into<SectionIndex>,
        item_indexes: Vec<usize>,
        height: u32,
    ) -> Self {
        Self::new(CommandPayload::ResizeHeight {
            section_index: section_index.into(),
            item_indexes,
            height,
        })
    }

    /// Creates a [`CommandPayload::ResizeWidth`] command.
    pub fn resize_width(section_index: impl Into<SectionIndex>, item_index: usize, width: u32) -> Self {
        Self::new(CommandPayload::ResizeWidth {
            section_index: section_index.into(),
            item_index,
            width,
        })
    }

    /// Creates a [`CommandPayload::ChangeInsightWidgetVisProperties`] command.
    pub fn change_insight_widget_vis_properties(
        widget_ref: ObjRef,
        properties: Option<Value>,
    ) -> Self {
        Self::new(CommandPayload::ChangeInsightWidgetVisProperties {
            widget_ref,
            properties,
        })
    }

    /// Creates a [`CommandPayload::ChangeWidgetHeader`] command.
    pub fn change_widget_header(widget_ref: ObjRef, title: impl Into<String>) -> Self {
        Self::new(CommandPayload::ChangeWidgetHeader {
            widget_ref,
            title: title.into(),
        })
    }

    /// Creates a [`CommandPayload::ModifyDrillsForInsightWidget`] command.
    pub fn modify_drills_for_insight_widget(
        widget_ref: ObjRef,
        drills: Vec<DrillDefinition>,
    ) -> Self {
        Self::new(CommandPayload::ModifyDrillsForInsightWidget { widget_ref, drills })
    }

    /// Creates a [`CommandPayload::RemoveDrillsForInsightWidget`] command.
    pub fn remove_drills_for_insight_widget(widget_ref: ObjRef, origins: DrillRemoval) -> Self {
        Self::new(CommandPayload::RemoveDrillsForInsightWidget {
            widget_ref,
            origins,
        })
    }

    /// Creates a [`CommandPayload::ChangeInsightWidgetFilterSettings`] command.
    pub fn change_insight_widget_filter_settings(
        widget_ref: ObjRef,
        operation: FilterSettingsOperation,
    ) -> Self {
        Self::new(CommandPayload::ChangeInsightWidgetFilterSettings {
            widget_ref,
            operation,
        })
    }

    /// Creates a [`CommandPayload::ChangeKpiWidgetFilterSettings`] command.
    pub fn change_kpi_widget_filter_settings(
        widget_ref: ObjRef,
        operation: FilterSettingsOperation,
    ) -> Self {
        Self::new(CommandPayload::ChangeKpiWidgetFilterSettings {
            widget_ref,
            operation,
        })
    }

    /// Creates an [`CommandPayload::UndoLayoutChanges`] command.
    pub fn undo_layout_changes(steps: usize) -> Self {
        Self::new(CommandPayload::UndoLayoutChanges { steps })
    }
}
