use std::fs;
use std::path::PathBuf;

use query_gate::Record;

use super::{Lookup, LookupError};

/// Reads a JSON array of records from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileLookup {
    path: PathBuf,
}

impl FileLookup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Lookup for FileLookup {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, _query: &str) -> Result<Vec<Record>, LookupError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| LookupError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|err| LookupError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn reads_records_from_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(
            &path,
            r#"[{"id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv"}]"#,
        )
        .unwrap();

        let records = FileLookup::new(&path).fetch("ervin").expect("records");
        assert_eq!(records, vec![Record::new(2, "Ervin Howell", "Shanna@melissa.tv")]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let lookup = FileLookup::new(dir.path().join("absent.json"));
        let err = lookup.fetch("john").unwrap_err();
        assert!(matches!(err, LookupError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
