//! HTTP application probe

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::ports::AppProbe;
use crate::error::{CutoverError, CutoverResult};

/// Upper bound for a single probe request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Probes the app with a GET request; any 2xx counts as "responds"
pub struct HttpProbe {
    url: String,
    client: Client,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>) -> CutoverResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CutoverError::internal(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl AppProbe for HttpProbe {
    fn responds(&self, within: Duration) -> bool {
        let request = self.client.get(&self.url).timeout(within.min(REQUEST_TIMEOUT));
        match request.send() {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(url = %self.url, %status, "probe");
                status.is_success()
            }
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "probe failed");
                false
            }
        }
    }

    fn target(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one request with `status_line`, return the URL
    fn serve_once(status_line: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let response =
                format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).unwrap();
        });
        (url, handle)
    }

    #[test]
    fn ok_status_responds() {
        let (url, server) = serve_once("200 OK");
        let probe = HttpProbe::new(url.clone()).unwrap();
        assert!(probe.responds(Duration::from_secs(5)));
        assert_eq!(probe.target(), url);
        server.join().unwrap();
    }

    #[test]
    fn error_status_does_not_respond() {
        let (url, server) = serve_once("503 Service Unavailable");
        assert!(!HttpProbe::new(url).unwrap().responds(Duration::from_secs(5)));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_does_not_respond() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);
        assert!(!HttpProbe::new(url).unwrap().responds(Duration::from_secs(5)));
    }

    #[test]
    fn silent_server_is_cut_off_at_the_budget() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        // accepts, never answers
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(3));
            drop(stream);
        });

        let started = std::time::Instant::now();
        assert!(!HttpProbe::new(url).unwrap().responds(Duration::from_millis(300)));
        assert!(started.elapsed() < Duration::from_secs(2));
        server.join().unwrap();
    }
}
