//! Shared dashboard layout contracts used by the command runtime and its callers.
//!
//! This crate is intentionally runtime-agnostic. It defines the serializable layout tree,
//! widget and drill payloads, coordinate paths, commands, events, and command failures without
//! depending on the store, reducer, or sizing internals of the runtime.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod command;
mod drill;
mod event;
mod filter;
mod layout;
mod path;
mod widget;

pub use command::{CommandPayload, DashboardCommand, ItemDefinition};
pub use drill::{DrillDefinition, DrillOrigin, DrillRemoval, DrillTarget, ALL_DRILLS};
pub use event::{CommandFailed, DashboardEvent, EventPayload, FailureReason};
pub use filter::{FilterSettingsOperation, WidgetFilterSettings};
pub use layout::{
    GridSize, ItemSize, Layout, LayoutConfiguration, LayoutDirection, LayoutItem, LayoutSection,
    ScreenSize, SectionHeader,
};
pub use path::{ItemPath, LayoutCoordinate, RelativeIndex, SectionIndex, SectionPath, SectionTarget};
pub use widget::{
    CustomWidget, InsightWidget, KpiWidget, LayoutWidget, ObjRef, RichTextWidget, Widget,
    WidgetIdentity, WidgetKind,
};
