//! Dashboard layout command runtime: validated layout edits, height propagation, and the serial
//! command queue that drives them.

pub mod coordinates;
mod effect_executor;
pub mod emitters;
mod handlers;
pub mod model;
pub mod persistence;
pub mod propagation;
pub mod queue;
pub mod reducer;
pub mod runtime;
pub mod selectors;
pub mod settings;
pub mod sizing;
pub mod store;
pub mod validators;

#[cfg(test)]
mod test_support;

pub use model::*;
pub use persistence::{
    decode_snapshot, encode_snapshot, load_snapshot, save_snapshot, MemorySnapshotStore,
    PersistenceError, SnapshotEnvelope, SnapshotStore,
};
pub use queue::{command_channel, CommandLoop, CommandQueue, QueueError};
pub use reducer::{reduce_layout, LayoutAction, ReducerError, RuntimeEffect};
pub use runtime::{CommandOutcome, DashboardRuntime};
pub use settings::{load_dashboard_settings, DashboardSettings, MoveIndexConvention, SettingsError};
pub use sizing::{DefaultSizingProvider, InsightSizingProvider, SizeInfo, SizeLimits, SizingContext};
