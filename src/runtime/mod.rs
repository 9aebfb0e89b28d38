//! Threaded driver that runs a [`QueryGate`](query_gate::QueryGate) against
//! wall-clock time and a real [`Lookup`].
//!
//! A coordinator thread owns the gate and receives every event (input
//! changes, lookup completions) over one channel. Each dispatch runs on its own
//! lookup thread, so an older lookup may still be in flight when a newer one
//! starts; its completion is discarded by the gate's id check.

mod commands;
mod coordinator;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use query_gate::{GateConfig, GateState};
use thiserror::Error;

pub use commands::{GateSnapshot, GateUpdate};
use commands::GateCommand;

use crate::lookup::Lookup;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to start gate coordinator: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("gate coordinator is no longer running")]
    Stopped,
}

/// Cloneable input side of a running gate.
#[derive(Debug, Clone)]
pub struct Submitter {
    tx: Sender<GateCommand>,
}

impl Submitter {
    /// Report the latest input value.
    pub fn submit(&self, query: impl Into<String>) -> Result<(), RuntimeError> {
        self.tx
            .send(GateCommand::Submit(query.into()))
            .map_err(|_| RuntimeError::Stopped)
    }
}

/// Presentation-facing handle to a running gate.
///
/// Every visible state change is queued on an unbounded update channel until
/// it is received. Embedders that only poll [`GateHandle::state`] should still
/// drain updates with [`GateHandle::try_recv`] now and then.
///
/// Dropping the handle shuts the coordinator down.
pub struct GateHandle {
    submitter: Submitter,
    updates: Receiver<GateUpdate>,
    shared: Arc<RwLock<GateState>>,
    worker: Option<JoinHandle<()>>,
}

impl GateHandle {
    pub fn spawn(config: GateConfig, lookup: Arc<dyn Lookup>) -> Result<Self, RuntimeError> {
        let spawned = coordinator::spawn(config, lookup)?;
        Ok(Self {
            submitter: Submitter {
                tx: spawned.commands,
            },
            updates: spawned.updates,
            shared: spawned.shared,
            worker: Some(spawned.worker),
        })
    }

    pub fn submit(&self, query: impl Into<String>) -> Result<(), RuntimeError> {
        self.submitter.submit(query)
    }

    pub fn submitter(&self) -> Submitter {
        self.submitter.clone()
    }

    /// Most recently published state.
    pub fn state(&self) -> GateState {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// State after every command sent so far has been processed.
    ///
    /// Updates published before the reply are already queued on the update
    /// channel when this returns.
    pub fn snapshot(&self) -> Result<GateSnapshot, RuntimeError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.submitter
            .tx
            .send(GateCommand::Snapshot(reply_tx))
            .map_err(|_| RuntimeError::Stopped)?;
        reply_rx.recv().map_err(|_| RuntimeError::Stopped)
    }

    pub fn try_recv(&self) -> Result<GateUpdate, TryRecvError> {
        self.updates.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<GateUpdate, RecvTimeoutError> {
        self.updates.recv_timeout(timeout)
    }

    /// Block until an update satisfies `predicate` or `timeout` passes.
    pub fn wait_for(
        &self,
        timeout: Duration,
        mut predicate: impl FnMut(&GateState) -> bool,
    ) -> Option<GateUpdate> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.updates.recv_timeout(remaining) {
                Ok(update) if predicate(&update.state) => return Some(update),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }

    /// Wait for the input submitted so far to reach a resting state.
    ///
    /// Returns immediately when nothing is scheduled or in flight. Otherwise
    /// waits for the settle of the outstanding dispatch (the running timer's,
    /// if any) and returns `None` if that takes longer than `timeout`.
    pub fn settle(&self, timeout: Duration) -> Result<Option<GateState>, RuntimeError> {
        let snapshot = self.snapshot()?;
        let target = if snapshot.debouncing {
            snapshot.dispatched + 1
        } else {
            match snapshot.state {
                GateState::Pending { id, .. } => id,
                state => return Ok(Some(state)),
            }
        };

        Ok(self
            .wait_for(timeout, |state| {
                state.is_settled() && state.query_id() == Some(target)
            })
            .map(|update| update.state))
    }

    /// Stop the coordinator. Late lookup completions are ignored.
    pub fn shutdown(&mut self) {
        let _ = self.submitter.tx.send(GateCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }
}

impl Drop for GateHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
