//! Pure constructors for events and failures. Every result echoes the command correlation id.

use serde_json::Value;

use dashboard_contract::{
    CommandFailed, DashboardCommand, DashboardEvent, DrillDefinition, EventPayload,
    FailureReason, ItemPath, Layout, LayoutItem, LayoutSection, ObjRef, SectionHeader,
    SectionPath, WidgetFilterSettings,
};

fn event(command: &DashboardCommand, payload: EventPayload) -> DashboardEvent {
    DashboardEvent {
        correlation_id: command.correlation_id.clone(),
        payload,
    }
}

fn failure(command: &DashboardCommand, reason: FailureReason, message: String) -> CommandFailed {
    CommandFailed {
        correlation_id: command.correlation_id.clone(),
        reason,
        message,
        command: command.clone(),
    }
}

/// Failure for arguments that do not fit the current layout.
pub fn invalid_arguments(command: &DashboardCommand, message: impl Into<String>) -> CommandFailed {
    failure(command, FailureReason::UserError, message.into())
}

/// Failure for a value outside data-dependent bounds; the message states the bounds.
pub fn constraint_violation(
    command: &DashboardCommand,
    field: &str,
    value: u32,
    min_limit: u32,
    max_limit: u32,
) -> CommandFailed {
    failure(
        command,
        FailureReason::UserError,
        format!(
            "Validation failed for {field}: {value} must be within minLimit={min_limit} and \
             maxLimit={max_limit}."
        ),
    )
}

/// Failure for an invariant breach after validation passed.
pub fn internal_error(command: &DashboardCommand, message: impl Into<String>) -> CommandFailed {
    failure(command, FailureReason::InternalError, message.into())
}

pub fn command_failed(failure: &CommandFailed) -> DashboardEvent {
    DashboardEvent {
        correlation_id: failure.correlation_id.clone(),
        payload: EventPayload::CommandFailed(failure.clone()),
    }
}

pub fn command_started(command: &DashboardCommand) -> DashboardEvent {
    event(
        command,
        EventPayload::CommandStarted {
            command: command.clone(),
        },
    )
}

pub fn layout_changed(command: &DashboardCommand, layout: &Layout) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutChanged {
            layout: layout.clone(),
        },
    )
}

pub fn layout_section_added(
    command: &DashboardCommand,
    section: LayoutSection,
    index: SectionPath,
    stashes_used: Vec<String>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionAdded {
            section,
            index,
            stashes_used,
        },
    )
}

pub fn layout_section_moved(
    command: &DashboardCommand,
    section: LayoutSection,
    from_index: SectionPath,
    to_index: SectionPath,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionMoved {
            section,
            from_index,
            to_index,
        },
    )
}

pub fn layout_section_removed(
    command: &DashboardCommand,
    section: LayoutSection,
    index: SectionPath,
    stash_identifier: Option<String>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionRemoved {
            section,
            index,
            stash_identifier,
        },
    )
}

pub fn layout_section_header_changed(
    command: &DashboardCommand,
    index: SectionPath,
    previous_header: Option<SectionHeader>,
    header: SectionHeader,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionHeaderChanged {
            index,
            previous_header,
            header,
        },
    )
}

pub fn layout_section_items_added(
    command: &DashboardCommand,
    section_index: SectionPath,
    start_index: usize,
    items_added: Vec<LayoutItem>,
    stashes_used: Vec<String>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionItemsAdded {
            section_index,
            start_index,
            items_added,
            stashes_used,
        },
    )
}

pub fn layout_section_item_moved(
    command: &DashboardCommand,
    item: LayoutItem,
    from_index: ItemPath,
    to_index: ItemPath,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionItemMoved {
            item,
            from_index,
            to_index,
        },
    )
}

pub fn layout_section_item_removed(
    command: &DashboardCommand,
    item: LayoutItem,
    item_index: ItemPath,
    section_removed: Option<LayoutSection>,
    stash_identifier: Option<String>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionItemRemoved {
            item,
            item_index,
            section_removed,
            stash_identifier,
        },
    )
}

pub fn layout_section_item_replaced(
    command: &DashboardCommand,
    item_index: ItemPath,
    previous_item: LayoutItem,
    items: Vec<LayoutItem>,
    stashes_used: Vec<String>,
    stash_identifier: Option<String>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionItemReplaced {
            item_index,
            previous_item,
            items,
            stashes_used,
            stash_identifier,
        },
    )
}

pub fn layout_section_items_height_resized(
    command: &DashboardCommand,
    section_index: SectionPath,
    item_indexes: Vec<usize>,
    previous_heights: Vec<Option<u32>>,
    new_height: u32,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionItemsHeightResized {
            section_index,
            item_indexes,
            previous_heights,
            new_height,
        },
    )
}

pub fn layout_section_item_width_resized(
    command: &DashboardCommand,
    item_index: ItemPath,
    previous_width: u32,
    new_width: u32,
) -> DashboardEvent {
    event(
        command,
        EventPayload::LayoutSectionItemWidthResized {
            item_index,
            previous_width,
            new_width,
        },
    )
}

pub fn insight_widget_vis_properties_changed(
    command: &DashboardCommand,
    widget_ref: ObjRef,
    previous_properties: Option<Value>,
    properties: Option<Value>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::InsightWidgetVisPropertiesChanged {
            widget_ref,
            previous_properties,
            properties,
        },
    )
}

pub fn widget_header_changed(
    command: &DashboardCommand,
    widget_ref: ObjRef,
    previous_title: String,
    title: String,
) -> DashboardEvent {
    event(
        command,
        EventPayload::WidgetHeaderChanged {
            widget_ref,
            previous_title,
            title,
        },
    )
}

pub fn insight_widget_drills_modified(
    command: &DashboardCommand,
    widget_ref: ObjRef,
    added: Vec<DrillDefinition>,
    updated: Vec<DrillDefinition>,
    replaced: Vec<DrillDefinition>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::InsightWidgetDrillsModified {
            widget_ref,
            added,
            updated,
            replaced,
        },
    )
}

pub fn insight_widget_drills_removed(
    command: &DashboardCommand,
    widget_ref: ObjRef,
    removed: Vec<DrillDefinition>,
) -> DashboardEvent {
    event(
        command,
        EventPayload::InsightWidgetDrillsRemoved {
            widget_ref,
            removed,
        },
    )
}

pub fn widget_filter_settings_changed(
    command: &DashboardCommand,
    widget_ref: ObjRef,
    previous_settings: WidgetFilterSettings,
    settings: WidgetFilterSettings,
) -> DashboardEvent {
    event(
        command,
        EventPayload::WidgetFilterSettingsChanged {
            widget_ref,
            previous_settings,
            settings,
        },
    )
}

pub fn layout_changes_undone(command: &DashboardCommand, undone: Vec<String>) -> DashboardEvent {
    event(command, EventPayload::LayoutChangesUndone { undone })
}
