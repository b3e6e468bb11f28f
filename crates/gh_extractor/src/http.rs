//! Transport boundary between the GitHub client and the network.
//!
//! Everything above this module speaks [`HttpRequest`] and [`HttpResponse`];
//! only [`reqwest_transport`] touches a socket.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Response or request headers as `(name, value)` pairs, in wire order.
///
/// Lookups go through [`header_get`], which ignores ASCII case.
pub type HttpHeaders = Vec<(String, String)>;

/// An outgoing GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HttpHeaders,
    /// Deadline for this request alone. `None` keeps the client default.
    pub timeout: Option<Duration>,
}

/// Status, headers and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Any 2xx status, including 204 No Content.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// Failures below the HTTP status layer.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("transport failure: {0}")]
    Transport(String),

    /// The per-request deadline elapsed.
    #[error("deadline elapsed before a response arrived")]
    Timeout,

    #[error("nothing scripted for {url}")]
    NoMockResponse { url: String },
}

/// Sends one request and waits for its response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// First value for `name`, ignoring ASCII case.
pub fn header_get<'a>(headers: &'a HttpHeaders, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v.as_str()))
}

pub mod reqwest_transport {
    use super::*;

    /// [`HttpTransport`] over a pooled `reqwest::Client`.
    #[derive(Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        /// GitHub rejects requests without a user agent.
        pub fn with_user_agent(user_agent: &str) -> Result<Self, HttpError> {
            reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .map(Self::new)
                .map_err(|e| HttpError::Transport(e.to_string()))
        }
    }

    impl From<reqwest::Error> for HttpError {
        fn from(e: reqwest::Error) -> Self {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Transport(e.to_string())
            }
        }
    }

    #[async_trait]
    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let mut builder = request
                .headers
                .iter()
                .fold(self.client.get(&request.url), |b, (name, value)| {
                    b.header(name, value)
                });
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

#[cfg(test)]
pub use mock::MockTransport;


#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::reqwest_transport::ReqwestTransport;
    use super::*;

    fn get(url: &str) -> HttpRequest {
        HttpRequest {
            url: url.to_string(),
            headers: Vec::new(),
            timeout: None,
        }
    }

    #[test]
    fn header_lookup_ignores_case_and_prefers_first() {
        let headers: HttpHeaders = vec![
            ("X-RateLimit-Remaining".to_string(), "10".to_string()),
            ("x-ratelimit-remaining".to_string(), "9".to_string()),
        ];
        assert_eq!(header_get(&headers, "x-ratelimit-remaining"), Some("10"));
        assert_eq!(header_get(&headers, "X-RATELIMIT-REMAINING"), Some("10"));
        assert_eq!(header_get(&headers, "link"), None);
    }

    #[test]
    fn only_2xx_counts_as_success() {
        let response = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(304).is_success());
        assert!(!response(403).is_success());
    }

    #[tokio::test]
    async fn mock_replays_queue_per_url_and_logs_requests() {
        let mock = MockTransport::new();
        let url = "https://api.github.com/user/orgs?per_page=100&page=1";
        mock.push_status(url, 200, Vec::new());
        mock.push_error(url, HttpError::Timeout);

        assert_eq!(mock.send(get(url)).await.unwrap().status, 200);
        assert!(matches!(mock.send(get(url)).await, Err(HttpError::Timeout)));
        assert!(matches!(
            mock.send(get(url)).await,
            Err(HttpError::NoMockResponse { .. })
        ));
        assert_eq!(mock.requested_urls(), vec![url; 3]);
    }

    /// Serve one canned HTTP/1.1 response, returning the request head.
    fn serve_once(listener: TcpListener, response: &'static str) -> thread::JoinHandle<String> {
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut head = String::new();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            stream.write_all(response.as_bytes()).unwrap();
            head
        })
    }

    #[tokio::test]
    async fn reqwest_transport_round_trips_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = serve_once(
            listener,
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nX-RateLimit-Remaining: 42\r\n\
             Connection: close\r\n\r\n[]",
        );

        let request = HttpRequest {
            url: format!("http://{addr}/user/orgs?page=1"),
            headers: vec![("Authorization".to_string(), "Bearer t0ken".to_string())],
            timeout: Some(Duration::from_secs(5)),
        };
        let response = ReqwestTransport::new(reqwest::Client::new())
            .send(request)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("X-RateLimit-Remaining"), Some("42"));
        assert_eq!(response.body, b"[]");

        let head = server.join().unwrap().to_lowercase();
        assert!(head.starts_with("get /user/orgs?page=1 "), "{head}");
        assert!(head.contains("authorization: bearer t0ken"), "{head}");
    }

    #[tokio::test]
    async fn reqwest_transport_reports_elapsed_deadline_as_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept, then stay silent past the deadline.
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(800));
            drop(stream);
        });

        let request = HttpRequest {
            timeout: Some(Duration::from_millis(100)),
            ..get(&format!("http://{addr}/slow"))
        };
        let err = ReqwestTransport::new(reqwest::Client::new())
            .send(request)
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Timeout), "{err:?}");
        server.join().unwrap();
    }

    #[tokio::test]
    async fn reqwest_transport_rejects_malformed_urls() {
        let err = ReqwestTransport::new(reqwest::Client::new())
            .send(get("not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
    }
}
