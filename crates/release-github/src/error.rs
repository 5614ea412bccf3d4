use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitHubError>;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("request to GitHub failed")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Wait requested by the server through `Retry-After`.
        retry_after: Option<Duration>,
    },

    #[error("invalid repository '{0}': expected 'owner/repo'")]
    InvalidRepository(String),

    #[error("invalid GitHub API url '{url}'")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl GitHubError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// A 422 whose message says the object is already there, as returned when
    /// creating a ref or release that exists.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::Api {
                status: 422,
                message,
                ..
            } => {
                let lower = message.to_lowercase();
                lower.contains("already exists") || lower.contains("already_exists")
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Rate limiting, server errors and dropped connections are worth retrying.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            _ if self.is_rate_limited() => true,
            Self::Api { status, .. } => (500..600).contains(status),
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The request was rejected before GitHub acted on it, so even a
    /// non-idempotent call can be sent again.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api { status: 429, .. } => true,
            Self::Api {
                status: 403,
                message,
                ..
            } => is_rate_limit_message(message),
            _ => false,
        }
    }

    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("rate limit") || lower.contains("abuse detection")
}
