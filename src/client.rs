use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{DashboardError, DashboardResult};
use crate::model::{RepoId, RepoInfo};
use crate::range::StatsRequest;
use crate::security::{self, SecurityAlert};
use crate::session::StatsSource;

const STATS_PATH: &str = "/contributors/stats";
const INFO_PATH: &str = "/repo/info";
const LANGUAGES_PATH: &str = "/repo/languages";
const SECURITY_PATH: &str = "/security/dependabot";

/// HTTP client for the analyzer backend.
#[derive(Clone)]
pub struct BackendClient {
    base_url: Arc<String>,
    user_agent: Arc<String>,
    http: Arc<Client>,
}

impl BackendClient {
    /// Create a client rooted at `base_url` (trailing slashes are ignored).
    pub fn new(base_url: &str, user_agent: &str) -> Self {
        Self {
            base_url: Arc::new(base_url.trim_end_matches('/').to_string()),
            user_agent: Arc::new(user_agent.to_string()),
            http: Arc::new(Client::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and decode the body. Any transport failure,
    /// non-success status or undecodable body is `UpstreamUnavailable`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> DashboardResult<T> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, ?query, "GET");

        let resp = self
            .http
            .get(&url)
            .header("User-Agent", &*self.user_agent)
            .query(query)
            .send()
            .await
            .map_err(|e| DashboardError::upstream(path, format!("network error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::upstream(
                path,
                format!("backend returned HTTP {}", status.as_u16()),
            ));
        }

        resp.json::<T>()
            .await
            .map_err(|e| DashboardError::upstream(path, format!("failed to parse JSON: {e}")))
    }

    /// Repository summary counters.
    pub async fn repo_info(&self, repo: &RepoId) -> DashboardResult<RepoInfo> {
        self.get_json(INFO_PATH, &identity_query(repo)).await
    }

    /// Bytes of code per language.
    pub async fn languages(&self, repo: &RepoId) -> DashboardResult<BTreeMap<String, u64>> {
        self.get_json(LANGUAGES_PATH, &identity_query(repo)).await
    }

    /// Open Dependabot alerts. A body without an `alerts` array means none.
    pub async fn security_alerts(&self, repo: &RepoId) -> DashboardResult<Vec<SecurityAlert>> {
        let body: Value = self.get_json(SECURITY_PATH, &identity_query(repo)).await?;
        Ok(security::decode_alerts(body))
    }
}

impl StatsSource for BackendClient {
    /// Raw contributor records; each element is decoded later on its own.
    async fn contributor_stats(&self, request: &StatsRequest) -> DashboardResult<Vec<Value>> {
        self.get_json(STATS_PATH, &request.query_pairs()).await
    }
}

fn identity_query(repo: &RepoId) -> [(&'static str, String); 2] {
    [("owner", repo.owner.clone()), ("repo", repo.repo.clone())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::DateRange;
    use crate::security::Severity;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `response` to the first connection and return the base URL.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}")
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn stats_request() -> StatsRequest {
        StatsRequest::new(RepoId::new("o", "r"), DateRange::ALL)
    }

    fn assert_stats_unavailable(err: DashboardError, reason_part: &str) {
        match err {
            DashboardError::UpstreamUnavailable { endpoint, reason } => {
                assert_eq!(endpoint, STATS_PATH);
                assert!(reason.contains(reason_part), "unexpected reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:8000///", "repovista");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[tokio::test]
    async fn unreachable_backend_is_upstream_unavailable() {
        // Port 9 (discard) on loopback is not expected to run an HTTP server.
        let client = BackendClient::new("http://127.0.0.1:9", "repovista");
        let err = client
            .repo_info(&RepoId::new("o", "r"))
            .await
            .unwrap_err();
        match err {
            DashboardError::UpstreamUnavailable { endpoint, .. } => assert_eq!(endpoint, INFO_PATH),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_upstream_unavailable() {
        let base = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        )
        .await;
        let client = BackendClient::new(&base, "repovista");
        let err = client.contributor_stats(&stats_request()).await.unwrap_err();
        assert_stats_unavailable(err, "HTTP 500");
    }

    #[tokio::test]
    async fn non_array_stats_body_is_upstream_unavailable() {
        let base = serve_once(json_response(r#"{"oops":1}"#)).await;
        let client = BackendClient::new(&base, "repovista");
        let err = client.contributor_stats(&stats_request()).await.unwrap_err();
        assert_stats_unavailable(err, "failed to parse JSON");
    }

    #[tokio::test]
    async fn stats_array_is_returned_raw() {
        let base = serve_once(json_response(r#"[{"author":"a"},"odd"]"#)).await;
        let client = BackendClient::new(&base, "repovista");
        let values = client.contributor_stats(&stats_request()).await.unwrap();
        assert_eq!(values.len(), 2);
    }

    #[tokio::test]
    async fn security_alerts_are_decoded() {
        let body = r#"{"alerts":[{"number":3,"security_vulnerability":{"severity":"high","package":{"name":"lodash"}}}]}"#;
        let base = serve_once(json_response(body)).await;
        let client = BackendClient::new(&base, "repovista");
        let alerts = client.security_alerts(&RepoId::new("o", "r")).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::High);
        assert_eq!(alerts[0].title, "lodash");
    }

    #[tokio::test]
    async fn security_body_without_alerts_is_empty() {
        let base = serve_once(json_response(r#"{"alerts":null}"#)).await;
        let client = BackendClient::new(&base, "repovista");
        let alerts = client.security_alerts(&RepoId::new("o", "r")).await.unwrap();
        assert!(alerts.is_empty());
    }
}
