use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, trace, warn};
use query_gate::{
    Completion, Dispatch, GateConfig, GateState, LookupFailed, QueryGate, Record, Submission,
};

use super::commands::{GateCommand, GateSnapshot, GateUpdate};
use crate::lookup::Lookup;

pub(crate) struct Spawned {
    pub(crate) commands: Sender<GateCommand>,
    pub(crate) updates: Receiver<GateUpdate>,
    pub(crate) shared: Arc<RwLock<GateState>>,
    pub(crate) worker: JoinHandle<()>,
}

/// Launch the coordinator thread that owns the gate.
pub(crate) fn spawn(config: GateConfig, lookup: Arc<dyn Lookup>) -> std::io::Result<Spawned> {
    let (command_tx, command_rx) = mpsc::channel();
    let (update_tx, update_rx) = mpsc::channel();
    let shared = Arc::new(RwLock::new(GateState::default()));

    let coordinator = Coordinator {
        gate: QueryGate::new(config),
        lookup,
        commands: command_rx,
        completions: command_tx.clone(),
        updates: update_tx,
        shared: Arc::clone(&shared),
        revision: 0,
    };
    let worker = thread::Builder::new()
        .name("usersearch-gate".into())
        .spawn(move || coordinator.run())?;

    Ok(Spawned {
        commands: command_tx,
        updates: update_rx,
        shared,
        worker,
    })
}

struct Coordinator {
    gate: QueryGate,
    lookup: Arc<dyn Lookup>,
    commands: Receiver<GateCommand>,
    completions: Sender<GateCommand>,
    updates: Sender<GateUpdate>,
    shared: Arc<RwLock<GateState>>,
    revision: u64,
}

impl Coordinator {
    /// Process commands until shutdown.
    ///
    /// The deadline slot is only touched on this thread, so a timer elapse can
    /// never race with the submit that replaces it.
    fn run(mut self) {
        loop {
            let command = match self.gate.deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match self.commands.recv_timeout(wait) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.commands.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(GateCommand::Shutdown) => break,
                Some(command) => {
                    // Only a timer that elapsed before the command arrived fires first.
                    let received_at = Instant::now();
                    self.fire_due_timer(received_at);
                    self.handle_command(command);
                }
                None => {}
            }

            self.fire_due_timer(Instant::now());
        }

        self.gate.teardown();
        // Visible to `GateHandle::state`, but not sent as an update.
        *self.shared.write().unwrap_or_else(PoisonError::into_inner) = self.gate.state().clone();
        debug!("gate coordinator stopped");
    }

    fn handle_command(&mut self, command: GateCommand) {
        match command {
            GateCommand::Submit(query) => self.submit(&query),
            GateCommand::Completed { id, result } => self.complete(id, result),
            GateCommand::Snapshot(reply) => {
                let _ = reply.send(GateSnapshot {
                    state: self.gate.state().clone(),
                    dispatched: self.gate.dispatch_count(),
                    debouncing: self.gate.is_debouncing(),
                });
            }
            GateCommand::Shutdown => {}
        }
    }

    fn submit(&mut self, query: &str) {
        match self.gate.submit(query, Instant::now()) {
            Submission::Cleared => {
                debug!("input cleared");
                self.publish();
            }
            Submission::Rejected(rejection) => {
                debug!("not searching for {query:?}: {rejection}");
                self.publish();
            }
            Submission::Scheduled { replaced, .. } => {
                if replaced {
                    debug!("cancelled pending timer, rescheduling for {query:?}");
                } else {
                    trace!("scheduled {query:?}");
                }
            }
        }
    }

    fn fire_due_timer(&mut self, now: Instant) {
        let Some(dispatch) = self.gate.poll_timer(now) else {
            return;
        };
        self.publish();
        self.dispatch(dispatch);
    }

    /// Run the lookup on its own thread so slow lookups never block input.
    fn dispatch(&mut self, dispatch: Dispatch) {
        let Dispatch { id, query } = dispatch;
        debug!("dispatching query {id} ({query:?}) to {} lookup", self.lookup.name());

        let lookup = Arc::clone(&self.lookup);
        let completions = self.completions.clone();
        let spawned = thread::Builder::new()
            .name(format!("usersearch-lookup-{id}"))
            .spawn(move || {
                let result = lookup.fetch(&query).map_err(LookupFailed::from);
                // The coordinator may already be gone; the result is moot then.
                let _ = completions.send(GateCommand::Completed { id, result });
            });

        if let Err(err) = spawned {
            self.complete(
                id,
                Err(LookupFailed::new(format!("failed to start lookup: {err}"))),
            );
        }
    }

    fn complete(&mut self, id: u64, result: Result<Vec<Record>, LookupFailed>) {
        let failure = result.as_ref().err().map(ToString::to_string);
        match self.gate.complete(id, result) {
            Completion::Applied => {
                if let Some(message) = failure {
                    warn!("lookup for query {id} failed: {message}");
                } else {
                    debug!(
                        "query {id} settled with {} result(s)",
                        self.gate.results().len()
                    );
                }
                self.publish();
            }
            Completion::Discarded => debug!("discarding stale result for query {id}"),
        }
    }

    fn publish(&mut self) {
        let state = self.gate.state().clone();
        *self.shared.write().unwrap_or_else(PoisonError::into_inner) = state.clone();
        self.revision += 1;
        let _ = self.updates.send(GateUpdate {
            revision: self.revision,
            state,
        });
    }
}
