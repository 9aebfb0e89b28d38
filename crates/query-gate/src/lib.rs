//! Core state machine for debounced, cancel-by-ignoring search lookups.
//!
//! [`QueryGate`] never touches a clock or performs I/O itself. Callers feed it
//! user input together with the current [`Instant`](std::time::Instant), poll
//! it for due dispatches, run the lookup however they like, and hand the
//! outcome back tagged with the id the gate assigned. Completions for any id
//! other than the latest one are discarded.
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use query_gate::{Completion, GateConfig, QueryGate, Record};
//!
//! let mut gate = QueryGate::new(GateConfig::default());
//! let start = Instant::now();
//! gate.submit("john", start);
//!
//! let later = start + Duration::from_millis(300);
//! let dispatch = gate.poll_timer(later).expect("timer elapsed");
//! let records = vec![Record::new(1, "John Smith", "john@example.com")];
//! assert_eq!(gate.complete(dispatch.id, Ok(records)), Completion::Applied);
//! assert_eq!(gate.results().len(), 1);
//! ```

mod gate;
pub mod policy;
mod record;
mod state;

pub use gate::{Completion, DEFAULT_QUIET_PERIOD, Dispatch, GateConfig, QueryGate, Submission};
pub use policy::{DEFAULT_MIN_LENGTH, Rejection, SearchPolicy};
pub use record::{Record, ResultSet};
pub use state::{GateState, LookupFailed, Outcome};
