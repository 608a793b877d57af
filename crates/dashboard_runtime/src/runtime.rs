//! Command dispatcher: runs one command to completion and fans events out to listeners.

use dashboard_contract::{CommandFailed, DashboardCommand, DashboardEvent, FailureReason};

use crate::emitters;
use crate::handlers::{handle_command, HandlerContext};
use crate::model::{DashboardSnapshot, DashboardState, UndoEntry};
use crate::propagation::PropagationReport;
use crate::reducer::{LayoutAction, ReducerError};
use crate::sizing::{DefaultSizingProvider, InsightSizingProvider};
use crate::store::DashboardStore;

/// Result of a dispatched command: the success event or the failure that was emitted.
pub type CommandOutcome = Result<DashboardEvent, CommandFailed>;

type Listener = Box<dyn FnMut(&DashboardEvent)>;

/// Owns the store and processes commands strictly one at a time.
pub struct DashboardRuntime {
    store: DashboardStore,
    provider: Box<dyn InsightSizingProvider>,
    listeners: Vec<Listener>,
    last_propagation: Vec<PropagationReport>,
}

impl DashboardRuntime {
    /// Creates a runtime using [`DefaultSizingProvider`].
    pub fn new(state: DashboardState) -> Self {
        Self::with_sizing_provider(state, DefaultSizingProvider)
    }

    pub fn with_sizing_provider(
        state: DashboardState,
        provider: impl InsightSizingProvider + 'static,
    ) -> Self {
        Self {
            store: DashboardStore::new(state),
            provider: Box::new(provider),
            listeners: Vec::new(),
            last_propagation: Vec::new(),
        }
    }

    /// Registers a listener receiving every emitted event in order.
    pub fn subscribe(&mut self, listener: impl FnMut(&DashboardEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &DashboardState {
        self.store.state()
    }

    pub fn select<'s, T>(&'s self, selector: impl FnOnce(&'s DashboardState) -> T) -> T {
        self.store.select(selector)
    }

    /// Propagation walks performed by the last dispatched command.
    pub fn last_propagation(&self) -> &[PropagationReport] {
        &self.last_propagation
    }

    /// Replaces the document with a persisted snapshot and clears undo history.
    ///
    /// # Errors
    ///
    /// Returns the reducer error when the snapshot cannot be applied.
    pub fn hydrate(&mut self, snapshot: DashboardSnapshot) -> Result<(), ReducerError> {
        self.store
            .put(LayoutAction::HydrateSnapshot { snapshot }, self.provider.as_ref())?;
        self.last_propagation.clear();
        Ok(())
    }

    /// Runs `command` to completion.
    ///
    /// Emits `CommandStarted`, then either the handler's event (followed by `LayoutChanged` when
    /// the layout differs) or `CommandFailed`. A failed command leaves the state untouched.
    pub fn dispatch(&mut self, command: DashboardCommand) -> CommandOutcome {
        let command_type = command.command_type();
        let span = tracing::debug_span!(
            target: "dashboard.command",
            "dispatch",
            command_type,
            correlation_id = command.correlation_id.as_deref().unwrap_or("")
        );
        let _entered = span.enter();

        self.emit(&emitters::command_started(&command));
        tracing::debug!(target: "dashboard.command", "command started");

        let before = self.store.state().clone();
        let mut ctx = HandlerContext::new(&mut self.store, self.provider.as_ref());
        let result = handle_command(&mut ctx, &command);
        let propagations = ctx.into_propagations();

        match result {
            Ok(event) => {
                self.last_propagation = propagations;
                let state = self.store.state();
                let layout_changed = state.layout != before.layout;
                let stash_changed = state.stash != before.stash;
                if command.payload.is_undoable() && (layout_changed || stash_changed) {
                    let entry = UndoEntry {
                        command_type: command_type.to_string(),
                        correlation_id: command.correlation_id.clone(),
                        layout: before.layout,
                        stash: before.stash,
                    };
                    if let Err(err) = self
                        .store
                        .put(LayoutAction::RecordUndoPoint(entry), self.provider.as_ref())
                    {
                        tracing::error!(
                            target: "dashboard.command",
                            error = %err,
                            "failed to record undo point"
                        );
                    }
                }

                tracing::debug!(
                    target: "dashboard.command",
                    event_type = event.event_type(),
                    layout_changed,
                    "command succeeded"
                );
                self.emit(&event);
                if layout_changed {
                    let changed = emitters::layout_changed(&command, &self.store.state().layout);
                    self.emit(&changed);
                }
                Ok(event)
            }
            Err(failure) => {
                // Handlers validate before writing; restore if a later write failed mid-command.
                if self.store.state() != &before {
                    self.store = DashboardStore::new(before);
                }
                self.last_propagation.clear();
                match failure.reason {
                    FailureReason::UserError => tracing::warn!(
                        target: "dashboard.command",
                        message = %failure.message,
                        "command failed"
                    ),
                    FailureReason::InternalError => tracing::error!(
                        target: "dashboard.command",
                        message = %failure.message,
                        "command failed with internal error"
                    ),
                }
                self.emit(&emitters::command_failed(&failure));
                Err(failure)
            }
        }
    }

    fn emit(&mut self, event: &DashboardEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl Default for DashboardRuntime {
    fn default() -> Self {
        Self::new(DashboardState::default())
    }
}
