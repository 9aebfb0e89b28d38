use serde::Serialize;
use thiserror::Error;

use crate::policy::Rejection;
use crate::record::{Record, ResultSet};

/// The only failure a lookup can surface to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct LookupFailed {
    pub message: String,
}

impl LookupFailed {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Terminal result of a settled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The lookup succeeded; `records` may be empty.
    Results { records: ResultSet },
    /// The lookup failed and the result set was cleared.
    Failed { error: LookupFailed },
}

/// Observable state of a [`QueryGate`](crate::QueryGate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    /// No lookup is current.
    ///
    /// `rejection` is `None` for untouched or cleared input and carries the
    /// policy violation when the user typed something unsearchable.
    Idle { rejection: Option<Rejection> },
    /// A lookup for `query` has been dispatched under `id`.
    Pending { id: u64, query: String },
    /// The lookup for `id` finished.
    Settled {
        id: u64,
        query: String,
        outcome: Outcome,
    },
}

impl Default for GateState {
    fn default() -> Self {
        Self::Idle { rejection: None }
    }
}

impl GateState {
    /// Records to render. Empty for every state except a successful settle.
    #[must_use]
    pub fn results(&self) -> &[Record] {
        match self {
            Self::Settled {
                outcome: Outcome::Results { records },
                ..
            } => records.records(),
            _ => &[],
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&LookupFailed> {
        match self {
            Self::Settled {
                outcome: Outcome::Failed { error },
                ..
            } => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Idle { rejection } => rejection.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled { .. })
    }

    /// Id of the dispatched query this state belongs to, if any.
    #[must_use]
    pub fn query_id(&self) -> Option<u64> {
        match self {
            Self::Idle { .. } => None,
            Self::Pending { id, .. } | Self::Settled { id, .. } => Some(*id),
        }
    }
}
