use std::time::Duration;

use base64::Engine as _;
use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{GitHubError, Result};
use crate::repo::RepoId;
use crate::retry::{RetryConfig, retry_with_backoff};
use crate::types::{
    CreatedRelease, GitObject, GitRef, NewPullRequest, NewRelease, PullRequest,
    PullRequestUpdate, TreeEntry,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const CLIENT_AGENT: &str = concat!("changeset-release/", env!("CARGO_PKG_VERSION"));

/// Authenticated client scoped to one repository.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    repo: RepoId,
    token: String,
    retry: RetryConfig,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(repo: RepoId, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            http,
            api_url: Url::parse(DEFAULT_API_URL).map_err(|source| GitHubError::InvalidApiUrl {
                url: DEFAULT_API_URL.to_string(),
                source,
            })?,
            repo,
            token: token.into(),
            retry: RetryConfig::DEFAULT,
        })
    }

    /// Points the client at a GitHub Enterprise or test server.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidApiUrl`] if `api_url` is not a URL.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let trimmed = api_url.trim_end_matches('/');
        self.api_url = Url::parse(trimmed).map_err(|source| GitHubError::InvalidApiUrl {
            url: api_url.to_string(),
            source,
        })?;
        Ok(self)
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Open pull requests from `head_branch` into `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn find_open_pulls(&self, head_branch: &str, base: &str) -> Result<Vec<PullRequest>> {
        let head = format!("{}:{head_branch}", self.repo.owner);
        let path = self.repo_path("pulls");

        self.execute("list pull requests", Method::GET, &path, |req| {
            req.query(&[("state", "open"), ("head", head.as_str()), ("base", base)])
        })
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_pull(&self, pull: &NewPullRequest) -> Result<PullRequest> {
        let path = self.repo_path("pulls");
        self.execute("create pull request", Method::POST, &path, |req| req.json(pull))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn update_pull(&self, number: u64, update: &PullRequestUpdate) -> Result<PullRequest> {
        let path = self.repo_path(&format!("pulls/{number}"));
        self.execute("update pull request", Method::PATCH, &path, |req| req.json(update))
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn add_labels(&self, issue: u64, labels: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct Labels<'a> {
            labels: &'a [String],
        }

        let path = self.repo_path(&format!("issues/{issue}/labels"));
        self.execute_discarding("add labels", Method::POST, &path, |req| {
            req.json(&Labels { labels })
        })
    }

    /// Commit sha of `refs/heads/<branch>`, or `None` if the branch does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for a reason other than 404.
    pub fn branch_sha(&self, branch: &str) -> Result<Option<String>> {
        let path = self.repo_path(&format!("git/ref/heads/{branch}"));
        match self.execute::<GitRef, _>("get branch", Method::GET, &path, |req| req) {
            Ok(git_ref) => Ok(Some(git_ref.object.sha)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates `refs/<name>` pointing at `sha`.
    ///
    /// `name` is relative to `refs/`, e.g. `tags/pkg-a@1.0.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; an existing ref fails with a
    /// 422 for which [`GitHubError::is_already_exists`] holds.
    pub fn create_ref(&self, name: &str, sha: &str) -> Result<()> {
        #[derive(Serialize)]
        struct NewRef<'a> {
            #[serde(rename = "ref")]
            name: String,
            sha: &'a str,
        }

        let path = self.repo_path("git/refs");
        let body = NewRef {
            name: format!("refs/{name}"),
            sha,
        };
        self.execute_discarding("create ref", Method::POST, &path, |req| req.json(&body))
    }

    /// Moves `refs/<name>` to `sha`, discarding whatever it pointed at.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn force_update_ref(&self, name: &str, sha: &str) -> Result<()> {
        #[derive(Serialize)]
        struct RefUpdate<'a> {
            sha: &'a str,
            force: bool,
        }

        let path = self.repo_path(&format!("git/refs/{name}"));
        let body = RefUpdate { sha, force: true };
        self.execute_discarding("update ref", Method::PATCH, &path, |req| req.json(&body))
    }

    /// Uploads file content and returns the blob sha.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_blob(&self, content: &[u8]) -> Result<String> {
        #[derive(Serialize)]
        struct NewBlob {
            content: String,
            encoding: &'static str,
        }

        let path = self.repo_path("git/blobs");
        let body = NewBlob {
            content: base64::engine::general_purpose::STANDARD.encode(content),
            encoding: "base64",
        };
        let blob: GitObject =
            self.execute("create blob", Method::POST, &path, |req| req.json(&body))?;
        Ok(blob.sha)
    }

    /// Builds a tree from `base_tree` with `entries` applied, returning its sha.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        #[derive(Serialize)]
        struct NewTree<'a> {
            base_tree: &'a str,
            tree: &'a [TreeEntry],
        }

        let path = self.repo_path("git/trees");
        let body = NewTree {
            base_tree,
            tree: entries,
        };
        let tree: GitObject =
            self.execute("create tree", Method::POST, &path, |req| req.json(&body))?;
        Ok(tree.sha)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_commit(&self, message: &str, tree: &str, parents: &[String]) -> Result<String> {
        #[derive(Serialize)]
        struct NewCommit<'a> {
            message: &'a str,
            tree: &'a str,
            parents: &'a [String],
        }

        let path = self.repo_path("git/commits");
        let body = NewCommit {
            message,
            tree,
            parents,
        };
        let commit: GitObject =
            self.execute("create commit", Method::POST, &path, |req| req.json(&body))?;
        Ok(commit.sha)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease> {
        let path = self.repo_path("releases");
        self.execute("create release", Method::POST, &path, |req| req.json(release))
    }

    fn repo_path(&self, rest: &str) -> String {
        format!("repos/{}/{}/{rest}", self.repo.owner, self.repo.name)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{path}", self.api_url.as_str().trim_end_matches('/'));
        debug!(%method, %url, "GitHub request");

        self.http
            .request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, ACCEPT_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(USER_AGENT, CLIENT_AGENT)
    }

    fn execute<T, F>(&self, what: &str, method: Method, path: &str, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        retry_with_backoff(self.retry, what, retry_policy(&method), || {
            let response = check_status(build(self.request(method.clone(), path)).send()?)?;
            Ok(response.json()?)
        })
    }

    fn execute_discarding<F>(
        &self,
        what: &str,
        method: Method,
        path: &str,
        build: F,
    ) -> Result<()>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        retry_with_backoff(self.retry, what, retry_policy(&method), || {
            check_status(build(self.request(method.clone(), path)).send()?)?;
            Ok(())
        })
    }
}

/// A POST that timed out or hit a server error may still have created its
/// pull request, ref or release, so it is only repeated after a rate limit.
fn retry_policy(method: &Method) -> fn(&GitHubError) -> bool {
    if *method == Method::POST {
        GitHubError::is_rate_limited
    } else {
        GitHubError::is_retriable
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs);

    let text = response.text().unwrap_or_default();

    Err(GitHubError::Api {
        status: status.as_u16(),
        message: error_message(&text),
        retry_after,
    })
}

/// GitHub error bodies carry `message` plus optional `errors[].message`
/// details; the details say things like "Reference already exists".
fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let mut parts: Vec<String> = Vec::new();
    if let Some(message) = value.get("message").and_then(serde_json::Value::as_str) {
        parts.push(message.to_string());
    }
    if let Some(errors) = value.get("errors").and_then(serde_json::Value::as_array) {
        parts.extend(errors.iter().filter_map(|e| match e {
            serde_json::Value::String(s) => Some(s.clone()),
            other => other
                .get("message")
                .or_else(|| other.get("code"))
                .and_then(serde_json::Value::as_str)
                .map(String::from),
        }));
    }

    if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join(": ")
    }
}
