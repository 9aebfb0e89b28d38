use std::time::Duration;

use log::debug;
use query_gate::Record;
use reqwest::blocking::Client;

use super::{Lookup, LookupError};

/// Public demo directory the user search was written against.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Fetches the full record list from a JSON endpoint.
///
/// The endpoint is expected to answer `GET` with a JSON array of records. The
/// query is not forwarded; filtering happens in the gate.
pub struct HttpLookup {
    client: Client,
    endpoint: String,
}

impl HttpLookup {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(format!("usersearch/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Lookup for HttpLookup {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, query: &str) -> Result<Vec<Record>, LookupError> {
        debug!("GET {} for query {query:?}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        response
            .json::<Vec<Record>>()
            .map_err(|err| LookupError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serve exactly one canned HTTP response on a loopback port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/users")
    }

    #[test]
    fn decodes_record_array() {
        let url = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"id":1,"name":"Leanne Graham","email":"Sincere@april.biz","phone":"1-770"}]"#,
        );
        let lookup = HttpLookup::new(url, Duration::from_secs(5)).expect("client");
        let records = lookup.fetch("lea").expect("records");
        assert_eq!(records, vec![Record::new(1, "Leanne Graham", "Sincere@april.biz")]);
    }

    #[test]
    fn server_error_maps_to_status() {
        let url = serve_once("HTTP/1.1 500 Internal Server Error", "{}");
        let lookup = HttpLookup::new(url, Duration::from_secs(5)).expect("client");
        let err = lookup.fetch("john").unwrap_err();
        assert!(matches!(err, LookupError::Status(500)));
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let lookup =
            HttpLookup::new(format!("http://{addr}/users"), Duration::from_secs(2)).expect("client");
        let err = lookup.fetch("john").unwrap_err();
        assert!(matches!(err, LookupError::Transport(_)));
        assert!(err.to_string().starts_with("request failed"));
    }

    #[test]
    fn unexpected_payload_is_a_decode_error() {
        let url = serve_once("HTTP/1.1 200 OK", r#"{"users": []}"#);
        let lookup = HttpLookup::new(url, Duration::from_secs(5)).expect("client");
        assert!(matches!(lookup.fetch("john"), Err(LookupError::Decode(_))));
    }
}
