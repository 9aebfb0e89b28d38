use std::time::{Duration, Instant};

use crate::policy::{Rejection, SearchPolicy};
use crate::record::{Record, ResultSet};
use crate::state::{GateState, LookupFailed, Outcome};


/// Delay after the last accepted input before a lookup is dispatched.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Tuning knobs for a [`QueryGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateConfig {
    pub quiet_period: Duration,
    pub min_length: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            quiet_period: DEFAULT_QUIET_PERIOD,
            min_length: crate::policy::DEFAULT_MIN_LENGTH,
        }
    }
}

/// What the gate did with a submitted query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The input was emptied; the gate went idle without a hint.
    Cleared,
    /// The input broke the policy; the gate went idle with a hint.
    Rejected(Rejection),
    /// A quiet-period timer is running for the query.
    ///
    /// `replaced` is set when an earlier timer was cancelled to make room.
    Scheduled { deadline: Instant, replaced: bool },
}

/// A lookup the caller must perform on behalf of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub id: u64,
    pub query: String,
}

/// Whether a lookup completion changed the visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The completion belonged to a superseded or torn-down query.
    Discarded,
}

#[derive(Debug)]
struct Debounce {
    query: String,
    deadline: Instant,
}

/// Debounces input, assigns query ids and guards the visible state against
/// stale completions.
///
/// Only one timer slot exists, so scheduling a query always cancels the
/// previous one. Ids increase by one per dispatch and are never reused.
#[derive(Debug)]
pub struct QueryGate {
    policy: SearchPolicy,
    quiet_period: Duration,
    timer: Option<Debounce>,
    next_query_id: u64,
    current_query_id: Option<u64>,
    state: GateState,
}

impl Default for QueryGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl QueryGate {
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self {
            policy: SearchPolicy::new(config.min_length),
            quiet_period: config.quiet_period,
            timer: None,
            next_query_id: 0,
            current_query_id: None,
            state: GateState::default(),
        }
    }

    /// Feed the latest input value into the gate.
    ///
    /// Invalid input drops any pending timer and makes every in-flight lookup
    /// stale. Valid input (re)starts the quiet-period timer and leaves the
    /// visible state alone until the timer fires.
    pub fn submit(&mut self, query: &str, now: Instant) -> Submission {
        if let Err(rejection) = self.policy.check(query) {
            self.timer = None;
            self.current_query_id = None;
            return match rejection {
                Rejection::Empty => {
                    self.state = GateState::Idle { rejection: None };
                    Submission::Cleared
                }
                other => {
                    self.state = GateState::Idle {
                        rejection: Some(other),
                    };
                    Submission::Rejected(other)
                }
            };
        }

        let deadline = now + self.quiet_period;
        let replaced = self
            .timer
            .replace(Debounce {
                query: query.to_string(),
                deadline,
            })
            .is_some();
        Submission::Scheduled { deadline, replaced }
    }

    /// Instant at which the pending timer elapses.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.as_ref().map(|timer| timer.deadline)
    }

    /// Fire the pending timer if it has elapsed by `now`.
    ///
    /// Returns the lookup to perform. At most one dispatch is produced per
    /// scheduled query.
    pub fn poll_timer(&mut self, now: Instant) -> Option<Dispatch> {
        if self.timer.as_ref()?.deadline > now {
            return None;
        }
        let Debounce { query, .. } = self.timer.take()?;

        self.next_query_id = self.next_query_id.saturating_add(1);
        let id = self.next_query_id;
        self.current_query_id = Some(id);
        self.state = GateState::Pending {
            id,
            query: query.clone(),
        };
        Some(Dispatch { id, query })
    }

    /// Deliver the outcome of the lookup dispatched under `id`.
    pub fn complete(
        &mut self,
        id: u64,
        result: Result<Vec<Record>, LookupFailed>,
    ) -> Completion {
        if !self.matches_latest(id) {
            return Completion::Discarded;
        }
        let query = match &self.state {
            GateState::Pending { id: pending, query } if *pending == id => query.clone(),
            _ => return Completion::Discarded,
        };

        let outcome = match result {
            Ok(records) => Outcome::Results {
                records: ResultSet::filter(records, &query),
            },
            Err(error) => Outcome::Failed { error },
        };
        self.state = GateState::Settled { id, query, outcome };
        Completion::Applied
    }

    /// Dispose of the gate's pending work.
    ///
    /// The timer is cancelled and the latest id forgotten, so lookups still in
    /// flight complete as [`Completion::Discarded`]. A pending state falls back
    /// to idle; a settled state stays visible.
    pub fn teardown(&mut self) {
        self.timer = None;
        self.current_query_id = None;
        if self.state.is_loading() {
            self.state = GateState::default();
        }
    }

    #[must_use]
    pub fn matches_latest(&self, id: u64) -> bool {
        Some(id) == self.current_query_id
    }

    /// Number of lookups dispatched so far, which is also the most recent id.
    #[must_use]
    pub fn dispatch_count(&self) -> u64 {
        self.next_query_id
    }

    /// Id of the most recent dispatch that is still current.
    #[must_use]
    pub fn latest_id(&self) -> Option<u64> {
        self.current_query_id
    }

    #[must_use]
    pub fn state(&self) -> &GateState {
        &self.state
    }

    #[must_use]
    pub fn results(&self) -> &[Record] {
        self.state.results()
    }

    #[must_use]
    pub fn error(&self) -> Option<&LookupFailed> {
        self.state.error()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    #[must_use]
    pub fn is_debouncing(&self) -> bool {
        self.timer.is_some()
    }
}
