//! Collaborators that fetch the records a query is filtered against.
//!
//! The gate treats a lookup as an opaque, possibly slow, possibly failing
//! capability. Implementations block; the runtime runs each dispatch on its
//! own thread.

mod file;
mod http;

use query_gate::{LookupFailed, Record};
use thiserror::Error;

pub use file::FileLookup;
pub use http::{DEFAULT_ENDPOINT, HttpLookup};

/// Failures a lookup may report.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The server answered with a non-success status code.
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The payload could not be decoded into records.
    #[error("invalid lookup payload: {0}")]
    Decode(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<LookupError> for LookupFailed {
    fn from(err: LookupError) -> Self {
        LookupFailed::new(err.to_string())
    }
}

/// Source of candidate records for a query.
pub trait Lookup: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Fetch the candidate records for `query`.
    ///
    /// Implementations may use `query` to narrow the request, but the gate
    /// filters the returned records again either way.
    fn fetch(&self, query: &str) -> Result<Vec<Record>, LookupError>;
}

/// Fixed in-memory records, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    records: Vec<Record>,
    failure: Option<u16>,
}

impl StaticLookup {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            failure: None,
        }
    }

    /// A lookup that always answers with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(status),
        }
    }

    /// A handful of sample people for offline use.
    pub fn sample() -> Self {
        Self::new(vec![
            Record::new(1, "Leanne Graham", "Sincere@april.biz"),
            Record::new(2, "Ervin Howell", "Shanna@melissa.tv"),
            Record::new(3, "Clementine Bauch", "Nathan@yesenia.net"),
            Record::new(4, "Patricia Lebsack", "Julianne.OConner@kory.org"),
            Record::new(5, "Chelsey Dietrich", "Lucio_Hettinger@annie.ca"),
            Record::new(6, "Mrs. Dennis Schulist", "Karley_Dach@jasper.info"),
            Record::new(7, "Kurtis Weissnat", "Telly.Hoeger@billy.biz"),
            Record::new(8, "Nicholas Runolfsdottir V", "Sherwood@rosamond.me"),
            Record::new(9, "Glenna Reichert", "Chaim_McDermott@dana.io"),
            Record::new(10, "Clementina DuBuque", "Rey.Padberg@karina.biz"),
        ])
    }
}

impl Lookup for StaticLookup {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, _query: &str) -> Result<Vec<Record>, LookupError> {
        match self.failure {
            Some(status) => Err(LookupError::Status(status)),
            None => Ok(self.records.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_matches_display_format() {
        let failed = LookupFailed::from(LookupError::Status(500));
        assert_eq!(failed.message, "HTTP error! status: 500");
    }

    #[test]
    fn failing_static_lookup_reports_status() {
        let err = StaticLookup::failing(503).fetch("john").unwrap_err();
        assert!(matches!(err, LookupError::Status(503)));
    }

    #[test]
    fn sample_lookup_returns_all_records() {
        let records = StaticLookup::sample().fetch("anything").expect("records");
        assert_eq!(records.len(), 10);
    }
}
