//! GitHub REST client: posts replies on issues and looks up a user's
//! comment history in a repository.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::commands::{CommentCallback, ContributionLookup};
use crate::error::CallbackError;
use crate::event::{Comment, EventContext};
use crate::pipeline::ActionKind;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("bounty-agent/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    token: SecretString,
    api_base: String,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(token: SecretString, api_base: impl Into<String>) -> Self {
        Self {
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Token from `GITHUB_TOKEN`, API base from `GITHUB_API_URL` (as set on
    /// Actions runners) or the public API.
    pub fn from_env() -> Self {
        let token = std::env::var("GITHUB_TOKEN").unwrap_or_default();
        let api_base = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::new(SecretString::from(token), api_base)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        let token = self.token.expose_secret();
        if token.is_empty() {
            builder
        } else {
            builder.bearer_auth(token)
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, CallbackError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| CallbackError::Http(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CallbackError::Rejected { status, body });
        }
        Ok(resp)
    }
}

#[async_trait]
impl CommentCallback for GitHubClient {
    async fn post(
        &self,
        ctx: &EventContext,
        issue_number: u64,
        text: &str,
        action: ActionKind,
        source: Option<&Comment>,
    ) -> Result<(), CallbackError> {
        let repo = &ctx.payload.repository.full_name;
        let url = self.api_url(&format!("repos/{repo}/issues/{issue_number}/comments"));
        tracing::debug!(
            repo = %repo,
            issue = issue_number,
            action = %action,
            source_comment = ?source.map(|c| c.id),
            "Posting issue comment"
        );

        let body = serde_json::json!({ "body": text });
        self.send(self.request(reqwest::Method::POST, &url).json(&body)).await?;
        Ok(())
    }
}

#[async_trait]
impl ContributionLookup for GitHubClient {
    async fn commented_count(&self, repo: &str, login: &str) -> Result<u64, CallbackError> {
        let url = self.api_url("search/issues");
        let query = format!("repo:{repo} commenter:{login}");
        let resp = self
            .send(
                self.request(reqwest::Method::GET, &url)
                    .query(&[("q", query.as_str()), ("per_page", "1")]),
            )
            .await?;

        let data: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| CallbackError::Http(e.to_string()))?;
        total_count(&data)
    }
}

fn total_count(data: &serde_json::Value) -> Result<u64, CallbackError> {
    data.get("total_count")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| CallbackError::Http("search response has no total_count".into()))
}
