use std::sync::mpsc::Sender;

use query_gate::{GateState, LookupFailed, Record};
use serde::Serialize;

/// Commands understood by the gate coordinator thread.
#[derive(Debug)]
pub(crate) enum GateCommand {
    /// The input changed to the given value.
    Submit(String),
    /// A lookup thread finished.
    Completed {
        /// Identifier the gate assigned when the lookup was dispatched.
        id: u64,
        result: Result<Vec<Record>, LookupFailed>,
    },
    /// Reply with the current state once every earlier command is processed.
    Snapshot(Sender<GateSnapshot>),
    /// Tear the gate down and stop the coordinator thread.
    Shutdown,
}

/// A visible state change published by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateUpdate {
    /// Increases by one per published update.
    pub revision: u64,
    pub state: GateState,
}

/// Point-in-time view of the coordinator, taken in command order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSnapshot {
    pub state: GateState,
    /// Number of lookups dispatched so far.
    pub dispatched: u64,
    /// Whether a quiet-period timer is still running.
    pub debouncing: bool,
}
