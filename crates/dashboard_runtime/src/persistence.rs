//! Versioned snapshot envelopes and the async store contract used to persist dashboards.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use dashboard_contract::{Layout, ScreenSize};

use crate::model::{DashboardSnapshot, DASHBOARD_SNAPSHOT_SCHEMA_VERSION};

/// Version for [`SnapshotEnvelope`] metadata serialization.
pub const SNAPSHOT_ENVELOPE_VERSION: u32 = 1;
/// Namespace of persisted dashboard layouts.
pub const DASHBOARD_STATE_NAMESPACE: &str = "dashboard.layout";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope for a persisted [`DashboardSnapshot`].
pub struct SnapshotEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owning document.
    pub namespace: String,
    /// Schema version of the payload.
    pub schema_version: u32,
    /// Serialized snapshot.
    pub payload: Value,
}

#[derive(Debug, Error)]
/// Errors raised while encoding or restoring snapshots.
pub enum PersistenceError {
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("envelope namespace `{found}` is not `{expected}`")]
    NamespaceMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("unsupported snapshot schema version {0}")]
    UnsupportedSchema(u32),
    #[error("unsupported envelope version {0}")]
    UnsupportedEnvelope(u32),
    #[error("snapshot store: {0}")]
    Store(String),
}

/// Schema 0 stored only the layout and the active breakpoint.
#[derive(Debug, Deserialize)]
struct LegacySnapshot {
    layout: Layout,
    #[serde(default)]
    screen: ScreenSize,
}

/// Wraps `snapshot` in an envelope stamped with the current schema version.
///
/// # Errors
///
/// Returns an error when the snapshot cannot be converted to JSON.
pub fn build_snapshot_envelope(
    snapshot: &DashboardSnapshot,
) -> Result<SnapshotEnvelope, PersistenceError> {
    Ok(SnapshotEnvelope {
        envelope_version: SNAPSHOT_ENVELOPE_VERSION,
        namespace: DASHBOARD_STATE_NAMESPACE.to_string(),
        schema_version: DASHBOARD_SNAPSHOT_SCHEMA_VERSION,
        payload: serde_json::to_value(snapshot)?,
    })
}

/// Restores a snapshot, migrating older payload schemas.
///
/// # Errors
///
/// Returns an error for foreign namespaces, unknown envelope or schema versions, and payloads
/// that do not match their declared schema.
pub fn restore_snapshot(envelope: &SnapshotEnvelope) -> Result<DashboardSnapshot, PersistenceError> {
    if envelope.envelope_version != SNAPSHOT_ENVELOPE_VERSION {
        return Err(PersistenceError::UnsupportedEnvelope(envelope.envelope_version));
    }
    if envelope.namespace != DASHBOARD_STATE_NAMESPACE {
        return Err(PersistenceError::NamespaceMismatch {
            expected: DASHBOARD_STATE_NAMESPACE,
            found: envelope.namespace.clone(),
        });
    }
    match envelope.schema_version {
        0 => {
            let legacy: LegacySnapshot = serde_json::from_value(envelope.payload.clone())?;
            tracing::debug!(target: "dashboard.layout", "migrated schema 0 snapshot");
            Ok(DashboardSnapshot {
                schema_version: DASHBOARD_SNAPSHOT_SCHEMA_VERSION,
                layout: legacy.layout,
                screen: legacy.screen,
                ..DashboardSnapshot::default()
            })
        }
        DASHBOARD_SNAPSHOT_SCHEMA_VERSION => {
            let mut snapshot: DashboardSnapshot = serde_json::from_value(envelope.payload.clone())?;
            snapshot.schema_version = DASHBOARD_SNAPSHOT_SCHEMA_VERSION;
            Ok(snapshot)
        }
        other => Err(PersistenceError::UnsupportedSchema(other)),
    }
}

/// Serializes a snapshot envelope to a JSON string.
///
/// # Errors
///
/// Returns an error when the snapshot cannot be serialized.
pub fn encode_snapshot(snapshot: &DashboardSnapshot) -> Result<String, PersistenceError> {
    let envelope = build_snapshot_envelope(snapshot)?;
    Ok(serde_json::to_string(&envelope)?)
}

/// Parses and restores a snapshot envelope from JSON.
///
/// # Errors
///
/// Returns an error for malformed JSON or any [`restore_snapshot`] failure.
pub fn decode_snapshot(raw: &str) -> Result<DashboardSnapshot, PersistenceError> {
    let envelope: SnapshotEnvelope = serde_json::from_str(raw)?;
    restore_snapshot(&envelope)
}

/// Object-safe boxed future used by [`SnapshotStore`] methods.
pub type SnapshotStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Storage service for snapshot envelopes keyed by dashboard identifier.
pub trait SnapshotStore {
    fn load_envelope<'a>(
        &'a self,
        dashboard: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<Option<SnapshotEnvelope>, String>>;

    fn save_envelope<'a>(
        &'a self,
        dashboard: &'a str,
        envelope: &'a SnapshotEnvelope,
    ) -> SnapshotStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory snapshot store keyed by dashboard identifier.
pub struct MemorySnapshotStore {
    inner: Rc<RefCell<HashMap<String, SnapshotEnvelope>>>,
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_envelope<'a>(
        &'a self,
        dashboard: &'a str,
    ) -> SnapshotStoreFuture<'a, Result<Option<SnapshotEnvelope>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(dashboard).cloned()) })
    }

    fn save_envelope<'a>(
        &'a self,
        dashboard: &'a str,
        envelope: &'a SnapshotEnvelope,
    ) -> SnapshotStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(dashboard.to_string(), envelope.clone());
            Ok(())
        })
    }
}

/// Saves `snapshot` for `dashboard`.
///
/// # Errors
///
/// Returns an error when encoding or the store fails.
pub async fn save_snapshot(
    store: &dyn SnapshotStore,
    dashboard: &str,
    snapshot: &DashboardSnapshot,
) -> Result<(), PersistenceError> {
    let envelope = build_snapshot_envelope(snapshot)?;
    store
        .save_envelope(dashboard, &envelope)
        .await
        .map_err(PersistenceError::Store)
}

/// Loads and migrates the snapshot for `dashboard`, if one was saved.
///
/// # Errors
///
/// Returns an error when the store fails or the envelope cannot be restored.
pub async fn load_snapshot(
    store: &dyn SnapshotStore,
    dashboard: &str,
) -> Result<Option<DashboardSnapshot>, PersistenceError> {
    let envelope = store
        .load_envelope(dashboard)
        .await
        .map_err(PersistenceError::Store)?;
    envelope.as_ref().map(restore_snapshot).transpose()
}
