//! Debounced user search.
//!
//! The root crate wires the clock-free [`query_gate`] state machine to real
//! time and real lookups. Embedders usually only need [`GateHandle`] and one
//! of the [`lookup`] collaborators.

pub mod app_dirs;
pub mod logging;
pub mod lookup;
pub mod runtime;

pub use lookup::{FileLookup, HttpLookup, Lookup, LookupError, StaticLookup};
pub use query_gate::{
    DEFAULT_MIN_LENGTH, DEFAULT_QUIET_PERIOD, GateConfig, GateState, LookupFailed, Outcome,
    Record, Rejection, ResultSet, SearchPolicy,
};
pub use runtime::{GateHandle, GateSnapshot, GateUpdate, RuntimeError, Submitter};
