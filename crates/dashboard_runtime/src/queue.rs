//! Serial async command queue in front of [`DashboardRuntime`].
//!
//! Callers on any task enqueue commands and await their outcome; a single [`CommandLoop`]
//! drains the queue and dispatches one command at a time, so outcomes complete in submission
//! order.

use std::future::Future;

use futures::channel::{mpsc, oneshot};
use futures::StreamExt;
use thiserror::Error;

use dashboard_contract::DashboardCommand;

use crate::runtime::{CommandOutcome, DashboardRuntime};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// Errors surfaced to callers of [`CommandQueue::submit`].
pub enum QueueError {
    /// The command loop is gone and no longer accepts commands.
    #[error("command queue is closed")]
    Closed,
    /// The command loop stopped before replying.
    #[error("command loop dropped the reply")]
    Dropped,
}

/// Queued command with its reply channel.
#[derive(Debug)]
pub struct CommandEnvelope {
    pub command: DashboardCommand,
    pub reply: oneshot::Sender<CommandOutcome>,
}

/// Cloneable submission handle.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    sender: mpsc::UnboundedSender<CommandEnvelope>,
}

impl CommandQueue {
    /// Enqueues `command` immediately and returns a future resolving to its outcome.
    ///
    /// The command is queued when this is called, not when the future is first polled.
    pub fn submit(
        &self,
        command: DashboardCommand,
    ) -> impl Future<Output = Result<CommandOutcome, QueueError>> {
        let (reply, receiver) = oneshot::channel();
        let sent = self
            .sender
            .unbounded_send(CommandEnvelope { command, reply })
            .map_err(|_| QueueError::Closed);
        async move {
            sent?;
            receiver.await.map_err(|_| QueueError::Dropped)
        }
    }
}

/// Receiving side of the queue.
#[derive(Debug)]
pub struct CommandLoop {
    receiver: mpsc::UnboundedReceiver<CommandEnvelope>,
}

impl CommandLoop {
    /// Dispatches queued commands until every [`CommandQueue`] handle is dropped.
    pub async fn run(mut self, runtime: &mut DashboardRuntime) {
        while let Some(CommandEnvelope { command, reply }) = self.receiver.next().await {
            let outcome = runtime.dispatch(command);
            if reply.send(outcome).is_err() {
                tracing::debug!(target: "dashboard.command", "caller stopped waiting for outcome");
            }
        }
        tracing::debug!(target: "dashboard.command", "command queue closed");
    }
}

/// Creates a connected queue handle and loop.
pub fn command_channel() -> (CommandQueue, CommandLoop) {
    let (sender, receiver) = mpsc::unbounded();
    (CommandQueue { sender }, CommandLoop { receiver })
}
