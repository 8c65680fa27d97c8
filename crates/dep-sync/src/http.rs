//! JSON-over-HTTP transport.
//!
//! Every call is a `POST` to `{host}/manifest`, `{host}/commit` or
//! `{host}/push` with the remote coordinates in the body.

use async_trait::async_trait;
use dep_types::{BranchManifest, Commit, CommitHash, RootManifest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::transport::RemoteTransport;
use crate::types::RemoteRef;

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<&'a str>,
    handle: &'a str,
    repo: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a Commit>,
    #[serde(rename = "personalAccessToken", skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
}

impl<'a> RequestBody<'a> {
    fn new(remote: &'a RemoteRef, branch: &'a str) -> Self {
        Self {
            kind: None,
            handle: &remote.handle,
            repo: &remote.repo,
            branch,
            hash: None,
            commit: None,
            token: remote.token.as_deref(),
        }
    }
}

/// Transport backed by a dep history server.
pub struct HttpTransport {
    host: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    async fn send(&self, endpoint: &str, body: &RequestBody<'_>) -> SyncResult<reqwest::Response> {
        let url = format!("{}/{}", self.host, endpoint);
        debug!(url = %url, branch = body.branch, "POST");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await?;
            return Err(SyncError::RemoteError { status, message });
        }
        Ok(response)
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, body: &RequestBody<'_>) -> SyncResult<T> {
        Ok(self.send(endpoint, body).await?.json().await?)
    }
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    async fn fetch_root(&self, remote: &RemoteRef, branch: &str) -> SyncResult<RootManifest> {
        let body = RequestBody {
            kind: Some("root"),
            ..RequestBody::new(remote, branch)
        };
        self.post("manifest", &body).await
    }

    async fn fetch_manifest(&self, remote: &RemoteRef, branch: &str) -> SyncResult<BranchManifest> {
        let body = RequestBody {
            kind: Some("history"),
            ..RequestBody::new(remote, branch)
        };
        self.post("manifest", &body).await
    }

    async fn fetch_commit(
        &self,
        remote: &RemoteRef,
        branch: &str,
        hash: &CommitHash,
    ) -> SyncResult<Commit> {
        let body = RequestBody {
            hash: Some(hash.as_str()),
            ..RequestBody::new(remote, branch)
        };
        self.post("commit", &body).await
    }

    async fn push_commit(&self, remote: &RemoteRef, branch: &str, commit: &Commit) -> SyncResult<()> {
        let body = RequestBody {
            commit: Some(commit),
            ..RequestBody::new(remote, branch)
        };
        self.send("push", &body).await?;
        Ok(())
    }
}
