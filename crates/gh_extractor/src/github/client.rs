//! GitHub API client: request building, status mapping and header parsing.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use url::Url;

use super::types::RateLimitInfo;
use crate::error::{ExtractorError, Result};
use crate::http::{HttpError, HttpHeaders, HttpRequest, HttpResponse, HttpTransport, header_get};

/// Public GitHub REST API root.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Page numbers advertised by a `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next_page: Option<u32>,
    pub last_page: Option<u32>,
}

impl PageLinks {
    /// Page count, known only when the server sent `rel="last"`.
    pub fn total_pages(&self) -> Option<u32> {
        self.last_page
    }
}

/// Read `rel="next"` and `rel="last"` page numbers out of a `Link` header.
///
/// Entries take the form `<url>; rel="next"`, separated by commas. Entries
/// whose URL carries no numeric `page` query parameter are skipped.
pub fn parse_link_header(link_header: &str) -> PageLinks {
    link_header
        .split(',')
        .filter_map(link_entry)
        .fold(PageLinks::default(), |mut links, (rel, page)| {
            match rel {
                "next" => links.next_page = Some(page),
                "last" => links.last_page = Some(page),
                _ => {}
            }
            links
        })
}

/// One `<url>; rel="..."` entry as `(rel, page)`.
fn link_entry(entry: &str) -> Option<(&str, u32)> {
    let (target, params) = entry.trim().split_once(';')?;
    let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
    let rel = params
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rel="))
        .map(|value| value.trim_matches('"'))
        .next()?;
    Some((rel, page_param(target)?))
}

/// The `page` query parameter of `url`, if present and numeric.
fn page_param(url: &str) -> Option<u32> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Extract rate limit info from GitHub response headers.
///
/// Returns `None` unless limit, remaining and reset are all present.
pub fn parse_rate_limit_headers(headers: &HttpHeaders) -> Option<RateLimitInfo> {
    let number = |name: &str| header_get(headers, name).and_then(|v| v.trim().parse::<i64>().ok());

    let limit = number("x-ratelimit-limit")?;
    let remaining = number("x-ratelimit-remaining")?;
    let reset_epoch = number("x-ratelimit-reset")?;
    let used = number("x-ratelimit-used");

    Some(RateLimitInfo {
        limit: limit.max(0) as usize,
        remaining: remaining.max(0) as usize,
        used: used.map(|u| u.max(0) as usize),
        reset_at: DateTime::from_timestamp(reset_epoch, 0).unwrap_or_else(Utc::now),
    })
}

/// A successful response with its pagination and quota metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: u16,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
    pub pagination: PageLinks,
    pub rate_limit: Option<RateLimitInfo>,
}

impl ApiResponse {
    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ExtractorError::Decode {
            url: self.url.clone(),
            message: e.to_string(),
        })
    }

    /// Decode the body as a list of `T`.
    ///
    /// An empty body (204) or `null` is an empty list; a single JSON object is
    /// a one-element list.
    pub fn items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let value: serde_json::Value = self.json()?;
        let decode = |v: serde_json::Value| {
            serde_json::from_value::<T>(v).map_err(|e| ExtractorError::Decode {
                url: self.url.clone(),
                message: e.to_string(),
            })
        };

        match value {
            serde_json::Value::Null => Ok(Vec::new()),
            serde_json::Value::Array(values) => values.into_iter().map(decode).collect(),
            other => Ok(vec![decode(other)?]),
        }
    }
}

/// Map a non-success response to the error taxonomy.
pub(crate) fn status_error(url: &str, response: &HttpResponse) -> ExtractorError {
    let rate_limit = parse_rate_limit_headers(&response.headers);
    let quota_exhausted = header_get(&response.headers, "x-ratelimit-remaining")
        .is_some_and(|v| v.trim() == "0");

    match response.status {
        401 => ExtractorError::Authentication,
        429 => ExtractorError::RateLimitExceeded {
            url: url.to_string(),
            reset_at: rate_limit.map(|r| r.reset_at),
        },
        403 if quota_exhausted => ExtractorError::RateLimitExceeded {
            url: url.to_string(),
            reset_at: rate_limit.map(|r| r.reset_at),
        },
        403 | 404 => ExtractorError::not_found(url),
        status => ExtractorError::request(format!("HTTP error {status} for URL: {url}")),
    }
}

/// GitHub API client.
///
/// Holds the transport, the API root, the optional token and the per-request
/// timeout. Cheap to clone.
#[derive(Clone)]
pub struct GitHubClient {
    transport: Arc<dyn HttpTransport>,
    api_base: Url,
    token: Option<Arc<String>>,
    timeout: Duration,
}

impl GitHubClient {
    /// Create a client over an existing transport.
    ///
    /// An empty token is treated as no token.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        api_base: Url,
        token: Option<&str>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            api_base,
            token: token
                .filter(|t| !t.is_empty())
                .map(|t| Arc::new(t.to_string())),
            timeout,
        }
    }

    /// The configured token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(String::as_str)
    }

    /// Absolute URL for a path under the API root plus query parameters.
    ///
    /// Each element of `path` becomes exactly one percent-encoded segment, so
    /// a name containing `/`, `?` or `#` cannot reach another endpoint. Empty,
    /// `.` and `..` segments are refused.
    pub fn endpoint_url<S: AsRef<str>>(
        &self,
        path: &[S],
        params: &[(String, String)],
    ) -> Result<Url> {
        if let Some(bad) = path
            .iter()
            .map(AsRef::as_ref)
            .find(|segment| matches!(*segment, "" | "." | ".."))
        {
            return Err(ExtractorError::request(format!(
                "Invalid path segment '{bad}'"
            )));
        }

        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ExtractorError::request(format!("API root {} cannot take a path", self.api_base))
            })?
            .pop_if_empty()
            .extend(path);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    fn request_headers(&self) -> HttpHeaders {
        let mut headers = vec![
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("X-GitHub-Api-Version".to_string(), "2022-11-28".to_string()),
        ];
        if let Some(token) = self.token() {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }

    /// Issue a single GET and map the outcome onto the error taxonomy.
    pub async fn get(&self, url: &Url) -> Result<ApiResponse> {
        let request = HttpRequest {
            url: url.to_string(),
            headers: self.request_headers(),
            timeout: Some(self.timeout),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| match e {
                HttpError::Timeout => ExtractorError::RequestTimeout {
                    seconds: self.timeout.as_secs(),
                },
                other => ExtractorError::request(format!("An error occurred: {other}")),
            })?;

        if !response.is_success() {
            return Err(status_error(url.as_str(), &response));
        }

        let pagination = response
            .header("link")
            .map(parse_link_header)
            .unwrap_or_default();
        let rate_limit = parse_rate_limit_headers(&response.headers);

        Ok(ApiResponse {
            url: url.to_string(),
            status: response.status,
            headers: response.headers,
            body: response.body,
            pagination,
            rate_limit,
        })
    }

    /// GET a single, non-paginated endpoint.
    pub async fn get_path(&self, path: &[&str]) -> Result<ApiResponse> {
        let url = self.endpoint_url(path, &[])?;
        self.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;

    fn client(transport: &MockTransport, token: Option<&str>) -> GitHubClient {
        GitHubClient::new(
            Arc::new(transport.clone()),
            Url::parse("https://api.github.com/").unwrap(),
            token,
            DEFAULT_TIMEOUT,
        )
    }

    fn headers(pairs: &[(&str, &str)]) -> HttpHeaders {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_link_header_next_and_last() {
        let header = r#"<https://api.github.com/user/repos?per_page=100&page=2>; rel="next", <https://api.github.com/user/repos?per_page=100&page=5>; rel="last""#;
        let info = parse_link_header(header);
        assert_eq!(info.next_page, Some(2));
        assert_eq!(info.last_page, Some(5));
        assert_eq!(info.total_pages(), Some(5));
    }

    #[test]
    fn test_link_header_ignores_first_and_prev() {
        let header = r#"<https://api.github.com/user/repos?page=1>; rel="first", <https://api.github.com/user/repos?page=4>; rel="prev""#;
        let info = parse_link_header(header);
        assert_eq!(info, PageLinks::default());
    }

    #[test]
    fn test_link_header_empty() {
        assert_eq!(parse_link_header(""), PageLinks::default());
    }

    #[test]
    fn test_page_param_reads_query_pairs() {
        assert_eq!(page_param("https://x/y?per_page=100&page=3"), Some(3));
        assert_eq!(page_param("https://x/y?page=7&per_page=1"), Some(7));
        assert_eq!(page_param("https://x/y?per_page=100"), None);
        assert_eq!(page_param("https://x/y?page=abc"), None);
        assert_eq!(page_param("/relative?page=2"), None);
    }

    #[test]
    fn test_link_entry_without_page_is_skipped() {
        let header = r#"<https://api.github.com/user/repos?cursor=abc>; rel="next""#;
        assert_eq!(parse_link_header(header).next_page, None);
    }

    #[test]
    fn test_parse_rate_limit_headers() {
        let info = parse_rate_limit_headers(&headers(&[
            ("X-RateLimit-Limit", "5000"),
            ("X-RateLimit-Remaining", "4990"),
            ("X-RateLimit-Used", "10"),
            ("X-RateLimit-Reset", "1700000000"),
        ]))
        .expect("complete headers parse");
        assert_eq!(info.limit, 5000);
        assert_eq!(info.remaining, 4990);
        assert_eq!(info.used, Some(10));
        assert_eq!(info.reset_at.timestamp(), 1_700_000_000);

        assert!(parse_rate_limit_headers(&headers(&[("X-RateLimit-Limit", "60")])).is_none());
    }

    #[test]
    fn test_status_error_mapping() {
        let resp = |status: u16, h: &[(&str, &str)]| HttpResponse {
            status,
            headers: headers(h),
            body: Vec::new(),
        };

        assert!(matches!(
            status_error("u", &resp(401, &[])),
            ExtractorError::Authentication
        ));
        assert!(matches!(
            status_error("u", &resp(404, &[])),
            ExtractorError::NotFound { .. }
        ));
        assert!(matches!(
            status_error("u", &resp(403, &[])),
            ExtractorError::NotFound { .. }
        ));
        assert!(matches!(
            status_error("u", &resp(429, &[])),
            ExtractorError::RateLimitExceeded { reset_at: None, .. }
        ));
        assert!(matches!(
            status_error("u", &resp(500, &[])),
            ExtractorError::Request { .. }
        ));

        let exhausted = status_error(
            "u",
            &resp(
                403,
                &[
                    ("x-ratelimit-limit", "5000"),
                    ("x-ratelimit-remaining", "0"),
                    ("x-ratelimit-reset", "1700000000"),
                ],
            ),
        );
        match exhausted {
            ExtractorError::RateLimitExceeded { reset_at, .. } => {
                assert_eq!(reset_at.map(|r| r.timestamp()), Some(1_700_000_000));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_url_appends_params() {
        let transport = MockTransport::new();
        let c = client(&transport, None);
        let url = c
            .endpoint_url(
                &["orgs", "rust-lang", "repos"],
                &[
                    ("per_page".to_string(), "100".to_string()),
                    ("page".to_string(), "2".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/orgs/rust-lang/repos?per_page=100&page=2"
        );
    }

    #[test]
    fn test_endpoint_url_respects_base_path() {
        let transport = MockTransport::new();
        let c = GitHubClient::new(
            Arc::new(transport),
            Url::parse("https://ghe.example.com/api/v3/").unwrap(),
            None,
            DEFAULT_TIMEOUT,
        );
        let url = c.endpoint_url(&["user", "orgs"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/user/orgs");
    }

    #[test]
    fn test_endpoint_url_encodes_each_segment() {
        let transport = MockTransport::new();
        let c = client(&transport, None);

        let url = c
            .endpoint_url(&["orgs", "acme/../../user", "repos"], &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/orgs/acme%2F..%2F..%2Fuser/repos"
        );

        let url = c
            .endpoint_url(
                &["users", "octo?type=member&x=#frag", "repos"],
                &[("page".to_string(), "1".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/octo%3Ftype=member&x=%23frag/repos?page=1"
        );
        assert_eq!(url.query(), Some("page=1"));
    }

    #[test]
    fn test_endpoint_url_refuses_dot_segments() {
        let transport = MockTransport::new();
        let c = client(&transport, None);
        for bad in ["", ".", ".."] {
            let err = c.endpoint_url(&["orgs", bad, "repos"], &[]).unwrap_err();
            assert!(matches!(err, ExtractorError::Request { .. }), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn test_get_sends_bearer_token_and_timeout() {
        let transport = MockTransport::new();
        transport.push_json("https://api.github.com/user", serde_json::json!({"login": "me"}), Vec::new());

        let c = client(&transport, Some("secret"));
        let resp = c.get_path(&["user"]).await.unwrap();
        assert_eq!(resp.status, 200);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            header_get(&requests[0].headers, "authorization"),
            Some("Bearer secret")
        );
        assert_eq!(requests[0].timeout, Some(DEFAULT_TIMEOUT));
    }

    #[tokio::test]
    async fn test_get_without_token_sends_no_authorization() {
        let transport = MockTransport::new();
        transport.push_json("https://api.github.com/users/octocat/repos", serde_json::json!([]), Vec::new());

        let c = client(&transport, Some(""));
        assert!(c.token().is_none());
        c.get_path(&["users", "octocat", "repos"]).await.unwrap();

        let requests = transport.requests();
        assert!(header_get(&requests[0].headers, "authorization").is_none());
    }

    #[tokio::test]
    async fn test_get_maps_transport_timeout() {
        let transport = MockTransport::new();
        transport.push_error("https://api.github.com/user", HttpError::Timeout);

        let err = client(&transport, Some("t"))
            .get_path(&["user"])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::RequestTimeout { seconds: 10 }));
    }

    #[tokio::test]
    async fn test_get_maps_transport_failure_to_request_error() {
        let transport = MockTransport::new();
        transport.push_error(
            "https://api.github.com/user",
            HttpError::Transport("connection reset".to_string()),
        );

        let err = client(&transport, Some("t"))
            .get_path(&["user"])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::Request { .. }));
    }

    #[test]
    fn test_items_accepts_list_object_and_empty_body() {
        let response = |body: &str| ApiResponse {
            url: "u".to_string(),
            status: 200,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            pagination: PageLinks::default(),
            rate_limit: None,
        };

        let list: Vec<serde_json::Value> = response(r#"[{"a":1},{"a":2}]"#).items().unwrap();
        assert_eq!(list.len(), 2);

        let single: Vec<serde_json::Value> = response(r#"{"names":["x"]}"#).items().unwrap();
        assert_eq!(single.len(), 1);

        let empty: Vec<serde_json::Value> = response("").items().unwrap();
        assert!(empty.is_empty());

        let err = response("not json").items::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, ExtractorError::Decode { .. }));
    }
}
