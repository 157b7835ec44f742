//! Minimal GitHub REST client: look up a pull request, post a comment.

use anyhow::{Context, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tex_pr_report_core::RepoSlug;
use tracing::{debug, info, instrument};

use crate::review::{PullRequest, PullRequestClient};

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    number: u64,
    title: String,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    html_url: String,
}

/// Blocking client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
}

impl GitHubClient {
    /// Create a client authenticating with `token` against `api_url`.
    pub fn new(token: &str, api_url: &str) -> anyhow::Result<Self> {
        Self::with_builder(token, api_url, Client::builder())
    }

    /// Like [`GitHubClient::new`], starting from a preconfigured builder.
    pub fn with_builder(token: &str, api_url: &str, builder: ClientBuilder) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| anyhow!("invalid token: {e}"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = builder
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, repo: &RepoSlug) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.repo)
    }

    /// GET a resource; 404 maps to `None`.
    fn get_optional<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<Option<T>> {
        let response = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("failed to send request to {url}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(url, "not found");
            return Ok(None);
        }
        let body = checked(response, url)?
            .json()
            .with_context(|| format!("failed to decode response from {url}"))?;
        Ok(Some(body))
    }
}

fn checked(response: Response, url: &str) -> anyhow::Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(anyhow!("GitHub returned {status} for {url}: {body}"))
}

impl PullRequestClient for GitHubClient {
    /// Looks up the repository, then the pull request.
    ///
    /// There is no separate organization lookup: `GET /orgs/{owner}` fails
    /// for user-owned repositories, and the repository lookup already covers
    /// an unknown owner with a 404.
    #[instrument(skip(self, repo), fields(repo = %repo))]
    fn find_pull_request(&self, repo: &RepoSlug, number: u64) -> anyhow::Result<Option<PullRequest>> {
        let repo_url = self.repo_url(repo);
        let Some(repository) = self.get_optional::<RepositoryResponse>(&repo_url)? else {
            return Ok(None);
        };
        debug!(full_name = %repository.full_name, "repository found");

        let pull_url = format!("{repo_url}/pulls/{number}");
        let pull = self.get_optional::<PullRequestResponse>(&pull_url)?;
        Ok(pull.map(|p| PullRequest {
            repo: repo.clone(),
            number: p.number,
            title: p.title,
            html_url: p.html_url,
        }))
    }

    #[instrument(skip(self, body), fields(pr = pull_request.number, body_len = body.len()))]
    fn create_comment(&self, pull_request: &PullRequest, body: &str) -> anyhow::Result<()> {
        // Pull request conversation comments live on the issue endpoint.
        let url = format!(
            "{}/issues/{}/comments",
            self.repo_url(&pull_request.repo),
            pull_request.number
        );
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .with_context(|| format!("failed to send request to {url}"))?;
        let comment: CommentResponse = checked(response, &url)?
            .json()
            .with_context(|| format!("failed to decode response from {url}"))?;
        info!(url = %comment.html_url, "comment posted");
        Ok(())
    }
}
