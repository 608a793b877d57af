use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::DashboardCommand;
use crate::drill::DrillDefinition;
use crate::filter::WidgetFilterSettings;
use crate::layout::{Layout, LayoutItem, LayoutSection, SectionHeader};
use crate::path::{ItemPath, SectionPath};
use crate::widget::ObjRef;

/// Machine-checkable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// The command was invalid for the current state; resubmitting it unchanged fails again.
    UserError,
    /// The runtime broke an invariant while applying a validated command.
    InternalError,
}

impl FailureReason {
    /// Returns the wire label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserError => "USER_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Typed failure result of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFailed {
    /// Correlation id echoed from the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Failure category.
    pub reason: FailureReason,
    /// Human-readable description.
    pub message: String,
    /// Command that failed, for replay and debugging.
    pub command: DashboardCommand,
}

impl fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed with {}: {}",
            self.command.command_type(),
            self.reason.as_str(),
            self.message
        )
    }
}

impl std::error::Error for CommandFailed {}

/// Event payloads emitted by the dashboard runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// A command began processing.
    CommandStarted {
        /// Command being processed.
        command: DashboardCommand,
    },
    /// A section was inserted.
    LayoutSectionAdded {
        /// Inserted section.
        section: LayoutSection,
        /// Absolute path of the inserted section.
        index: SectionPath,
        /// Stashes consumed to populate the section.
        stashes_used: Vec<String>,
    },
    /// A section moved.
    LayoutSectionMoved {
        /// Moved section.
        section: LayoutSection,
        /// Path before the move.
        from_index: SectionPath,
        /// Path after the move.
        to_index: SectionPath,
    },
    /// A section was removed.
    LayoutSectionRemoved {
        /// Removed section.
        section: LayoutSection,
        /// Path the section occupied.
        index: SectionPath,
        /// Stash now holding the section's items.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<String>,
    },
    /// A section header changed.
    LayoutSectionHeaderChanged {
        /// Section path.
        index: SectionPath,
        /// Header before the change.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_header: Option<SectionHeader>,
        /// Header after the change.
        header: SectionHeader,
    },
    /// Items were inserted into a section.
    LayoutSectionItemsAdded {
        /// Receiving section.
        section_index: SectionPath,
        /// Index of the first inserted item.
        start_index: usize,
        /// Inserted items.
        items_added: Vec<LayoutItem>,
        /// Stashes consumed.
        stashes_used: Vec<String>,
    },
    /// An item moved.
    LayoutSectionItemMoved {
        /// Moved item.
        item: LayoutItem,
        /// Path before the move.
        from_index: ItemPath,
        /// Path after the move.
        to_index: ItemPath,
    },
    /// An item was removed.
    LayoutSectionItemRemoved {
        /// Removed item.
        item: LayoutItem,
        /// Path the item occupied.
        item_index: ItemPath,
        /// Section removed because it became empty.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_removed: Option<LayoutSection>,
        /// Stash now holding the item.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<String>,
    },
    /// An item was replaced.
    LayoutSectionItemReplaced {
        /// Path the replaced item occupied.
        item_index: ItemPath,
        /// Replaced item.
        previous_item: LayoutItem,
        /// Items now starting at `item_index`.
        items: Vec<LayoutItem>,
        /// Stashes consumed by the replacement.
        stashes_used: Vec<String>,
        /// Stash now holding the replaced item.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stash_identifier: Option<String>,
    },
    /// Items of a section received a new height.
    LayoutSectionItemsHeightResized {
        /// Section holding the items.
        section_index: SectionPath,
        /// Resized items.
        item_indexes: Vec<usize>,
        /// Heights before the change, aligned with `item_indexes`.
        previous_heights: Vec<Option<u32>>,
        /// Applied height.
        new_height: u32,
    },
    /// An item received a new width.
    LayoutSectionItemWidthResized {
        /// Resized item.
        item_index: ItemPath,
        /// Width before the change.
        previous_width: u32,
        /// Applied width.
        new_width: u32,
    },
    /// Visualization properties of an insight widget changed.
    InsightWidgetVisPropertiesChanged {
        /// Target widget.
        widget_ref: ObjRef,
        /// Properties before the change.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_properties: Option<Value>,
        /// Properties after the change.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        properties: Option<Value>,
    },
    /// A widget title changed.
    WidgetHeaderChanged {
        /// Target widget.
        widget_ref: ObjRef,
        /// Title before the change.
        previous_title: String,
        /// Title after the change.
        title: String,
    },
    /// Drill definitions of an insight widget were added or updated.
    InsightWidgetDrillsModified {
        /// Target widget.
        widget_ref: ObjRef,
        /// Definitions with a new origin.
        added: Vec<DrillDefinition>,
        /// Definitions replacing an existing origin.
        updated: Vec<DrillDefinition>,
        /// Definitions replaced by `updated`.
        replaced: Vec<DrillDefinition>,
    },
    /// Drill definitions of an insight widget were removed.
    InsightWidgetDrillsRemoved {
        /// Target widget.
        widget_ref: ObjRef,
        /// Definitions that existed and were removed.
        removed: Vec<DrillDefinition>,
    },
    /// Filter settings of an insight or KPI widget changed.
    WidgetFilterSettingsChanged {
        /// Target widget.
        widget_ref: ObjRef,
        /// Settings before the change.
        previous_settings: WidgetFilterSettings,
        /// Settings after the change, with canonical references.
        settings: WidgetFilterSettings,
    },
    /// Recent layout changes were reverted.
    LayoutChangesUndone {
        /// Command types of the reverted changes, most recent first.
        undone: Vec<String>,
    },
    /// The layout differs from the layout before the command.
    LayoutChanged {
        /// Layout after the command.
        layout: Layout,
    },
    /// The command failed.
    CommandFailed(CommandFailed),
}

impl EventPayload {
    /// Returns the stable event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CommandStarted { .. } => "EVT.COMMAND.STARTED",
            Self::LayoutSectionAdded { .. } => "EVT.LAYOUT.SECTION_ADDED",
            Self::LayoutSectionMoved { .. } => "EVT.LAYOUT.SECTION_MOVED",
            Self::LayoutSectionRemoved { .. } => "EVT.LAYOUT.SECTION_REMOVED",
            Self::LayoutSectionHeaderChanged { .. } => "EVT.LAYOUT.SECTION_HEADER_CHANGED",
            Self::LayoutSectionItemsAdded { .. } => "EVT.LAYOUT.ITEMS_ADDED",
            Self::LayoutSectionItemMoved { .. } => "EVT.LAYOUT.ITEM_MOVED",
            Self::LayoutSectionItemRemoved { .. } => "EVT.LAYOUT.ITEM_REMOVED",
            Self::LayoutSectionItemReplaced { .. } => "EVT.LAYOUT.ITEM_REPLACED",
            Self::LayoutSectionItemsHeightResized { .. } => "EVT.LAYOUT.ITEMS_HEIGHT_RESIZED",
            Self::LayoutSectionItemWidthResized { .. } => "EVT.LAYOUT.ITEM_WIDTH_RESIZED",
            Self::InsightWidgetVisPropertiesChanged { .. } => {
                "EVT.INSIGHT_WIDGET.PROPERTIES_CHANGED"
            }
            Self::WidgetHeaderChanged { .. } => "EVT.WIDGET.HEADER_CHANGED",
            Self::InsightWidgetDrillsModified { .. } => "EVT.INSIGHT_WIDGET.DRILLS_MODIFIED",
            Self::InsightWidgetDrillsRemoved { .. } => "EVT.INSIGHT_WIDGET.DRILLS_REMOVED",
            Self::WidgetFilterSettingsChanged { .. } => "EVT.WIDGET.FILTER_SETTINGS_CHANGED",
            Self::LayoutChangesUndone { .. } => "EVT.LAYOUT.CHANGES_UNDONE",
            Self::LayoutChanged { .. } => "EVT.LAYOUT.CHANGED",
            Self::CommandFailed(_) => "EVT.COMMAND.FAILED",
        }
    }
}

/// Event envelope: payload plus the correlation id of the originating command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardEvent {
    /// Correlation id echoed from the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// Event payload.
    pub payload: EventPayload,
}

impl DashboardEvent {
    /// Returns the stable event type name.
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }

    /// Returns the failure when this event reports one.
    pub fn as_failure(&self) -> Option<&CommandFailed> {
        match &self.payload {
            EventPayload::CommandFailed(failure) => Some(failure),
            _ => None,
        }
    }
}
