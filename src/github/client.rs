// src/github/client.rs
// =============================================================================
// Thin adapter over the GitHub REST API.
//
// Every call goes through `request()`, which turns whatever happened on the
// wire into a `Result<T, ApiError>`:
// - no response at all (DNS, TLS, connection reset...) -> ApiError::Transport
// - a non-2xx status                                  -> ApiError::Http
// - a 2xx status with a body we can't decode           -> ApiError::Decode
//
// Nothing here panics or retries. There is no timeout beyond reqwest's
// default (which is none), so a hung server hangs the call.
// =============================================================================

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::endpoints;
use super::models::{Commit, Contents, Issue, PullRequest, Repository, SearchResponse};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PER_PAGE: u32 = 20;

const NETWORK_FALLBACK: &str = "Network error occurred";
const REQUEST_FALLBACK: &str = "Request failed";

/// Everything that can go wrong talking to the API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("GitHub API error {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered 2xx, but the body wasn't what we expected.
    #[error("Unexpected response from GitHub: {0}")]
    Decode(String),

    /// The configured base URL plus the endpoint path isn't a valid URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Uniform success/data-or-error/message structure, used for --json output.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub result: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> From<ApiResult<T>> for Envelope<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Envelope {
                result: true,
                data: Some(data),
                message: None,
            },
            Err(e) => Envelope {
                result: false,
                data: None,
                message: Some(e.to_string()),
            },
        }
    }
}

/// The sort orders this client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Updated,
    Stars,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Sort::Updated => "updated",
            Sort::Stars => "stars",
        }
    }
}

/// Paging and ordering for a list request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        PageRequest {
            page,
            per_page,
            sort: None,
        }
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}

// Shape of GitHub's error bodies: {"message": "Not Found", "documentation_url": "..."}
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base: Url,
}

impl GitHubClient {
    /// Creates a client for the given API host (normally `DEFAULT_API_BASE`).
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // GitHub rejects requests without a User-Agent
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("repo-browser/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(GitHubClient { http, base })
    }

    /// Builds the absolute URL for `path` with the given query parameters.
    ///
    /// The path is appended to the base (not resolved against it), so a base
    /// with a path prefix like `http://localhost:8080/api` keeps its prefix.
    pub fn build_url(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Url> {
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a GET and decodes the JSON body into `T`.
    pub async fn request<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = self.build_url(path, query)?;
        debug!(%url, "GET");

        let response = match self.http.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "GitHub request failed without a response");
                return Err(transport_error(&e));
            }
        };

        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            let error = error_from_body(status.as_u16(), &body);
            warn!(%url, status = status.as_u16(), "GitHub returned an error status");
            return Err(error);
        }

        decode_body(&body)
    }

    pub async fn user_repositories(&self, user: &str, page: PageRequest) -> ApiResult<Vec<Repository>> {
        let page = if page.sort.is_none() { page.sorted(Sort::Updated) } else { page };
        self.request(&endpoints::user_repos(user), &page.query()).await
    }

    /// Searches all of GitHub. Scope the query yourself (e.g. `user:facebook`).
    pub async fn search_repositories(&self, query: &str, page: PageRequest) -> ApiResult<SearchResponse> {
        let page = if page.sort.is_none() { page.sorted(Sort::Stars) } else { page };
        let mut params = vec![("q", query.to_string())];
        params.extend(page.query());
        self.request(endpoints::SEARCH_REPOS, &params).await
    }

    pub async fn repository(&self, owner: &str, repo: &str) -> ApiResult<Repository> {
        self.request(&endpoints::repo(owner, repo), &[]).await
    }

    pub async fn repository_contents(&self, owner: &str, repo: &str, path: Option<&str>) -> ApiResult<Contents> {
        self.request(&endpoints::repo_contents(owner, repo, path), &[]).await
    }

    pub async fn repository_commits(&self, owner: &str, repo: &str, page: PageRequest) -> ApiResult<Vec<Commit>> {
        self.request(&endpoints::repo_commits(owner, repo), &page.query()).await
    }

    pub async fn repository_issues(&self, owner: &str, repo: &str, page: PageRequest) -> ApiResult<Vec<Issue>> {
        self.request(&endpoints::repo_issues(owner, repo), &page.query()).await
    }

    pub async fn repository_pulls(&self, owner: &str, repo: &str, page: PageRequest) -> ApiResult<Vec<PullRequest>> {
        self.request(&endpoints::repo_pulls(owner, repo), &page.query()).await
    }
}

fn transport_error(error: &reqwest::Error) -> ApiError {
    let message = error.to_string();
    if message.is_empty() {
        ApiError::Transport(NETWORK_FALLBACK.to_string())
    } else {
        ApiError::Transport(message)
    }
}

// Prefers the server's own message; falls back to a generic one when the
// body is empty, not JSON, or has no "message".
fn error_from_body(status: u16, body: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| REQUEST_FALLBACK.to_string());
    ApiError::Http { status, message }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{RepoPage, RepoSource};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> GitHubClient {
        GitHubClient::new(DEFAULT_API_BASE).unwrap()
    }

    // Answers exactly one request on a local port with a canned JSON response.
    // Returns the base URL to point a client at.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_request_without_response_is_transport_error() {
        // Nothing listens on port 1
        let client = GitHubClient::new("http://127.0.0.1:1").unwrap();
        match client.repository("o", "r").await {
            Err(ApiError::Transport(message)) => assert!(!message.is_empty()),
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_request_error_status_carries_server_message() {
        let base = serve_once("404 Not Found", r#"{"message":"Not Found"}"#).await;
        let client = GitHubClient::new(&base).unwrap();
        assert_eq!(
            client.repository("o", "missing").await,
            Err(ApiError::Http {
                status: 404,
                message: "Not Found".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_empty_listing_page_through_source() {
        let base = serve_once("200 OK", "[]").await;
        let client = GitHubClient::new(&base).unwrap();
        let page = client.fetch_page("facebook", "", 1, 20).await;
        assert_eq!(
            page,
            Ok(RepoPage {
                items: vec![],
                total_count: 0
            })
        );
    }

    #[test]
    fn test_build_url_with_paging() {
        let page = PageRequest::new(2, 20).sorted(Sort::Updated);
        let url = client().build_url("/users/facebook/repos", &page.query()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/users/facebook/repos?page=2&per_page=20&sort=updated"
        );
    }

    #[test]
    fn test_build_url_encodes_search_query() {
        let url = client()
            .build_url(endpoints::SEARCH_REPOS, &[("q", "react native user:facebook".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/search/repositories?q=react+native+user%3Afacebook"
        );
    }

    #[test]
    fn test_build_url_keeps_base_path_prefix() {
        let client = GitHubClient::new("http://localhost:8080/api/").unwrap();
        let url = client.build_url("/repos/o/r", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/repos/o/r");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(GitHubClient::new("not a url"), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_error_uses_server_message() {
        let error = error_from_body(404, br#"{"message":"Not Found","documentation_url":"x"}"#);
        assert_eq!(
            error,
            ApiError::Http {
                status: 404,
                message: "Not Found".to_string()
            }
        );
        assert_eq!(error.to_string(), "GitHub API error 404: Not Found");
    }

    #[test]
    fn test_error_falls_back_to_generic_message() {
        let bodies: [&[u8]; 3] = [b"", b"<html>oops</html>", br#"{"message":""}"#];
        for body in bodies {
            let error = error_from_body(500, body);
            assert_eq!(
                error,
                ApiError::Http {
                    status: 500,
                    message: "Request failed".to_string()
                }
            );
        }
    }

    #[test]
    fn test_decode_failure_is_typed() {
        let result: ApiResult<Vec<Repository>> = decode_body(br#"{"not":"a list"}"#);
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_envelope_from_result() {
        let ok = Envelope::from(Ok::<u32, ApiError>(7));
        assert!(ok.result);
        assert_eq!(ok.data, Some(7));
        assert!(ok.message.is_none());

        let failed = Envelope::from(Err::<u32, ApiError>(ApiError::Transport("connection refused".into())));
        assert!(!failed.result);
        assert!(failed.data.is_none());
        assert_eq!(failed.message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_envelope_serializes_without_empty_message() {
        let ok = Envelope::from(Ok::<u32, ApiError>(1));
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"result":true,"data":1}"#);
    }
}
