use release_core::PublishedPackage;
use release_operations::operations::RunOutcome;

use crate::error::Result;

/// Values exposed to later workflow steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ActionOutputs {
    pub(crate) published: bool,
    pub(crate) published_packages: Vec<PublishedPackage>,
    pub(crate) has_changesets: bool,
    pub(crate) pull_request_number: Option<u64>,
}

impl ActionOutputs {
    pub(crate) fn from_outcome(outcome: &RunOutcome) -> Self {
        let published = outcome.published();
        Self {
            published: published.is_some_and(|p| p.published),
            published_packages: published.map(|p| p.packages.clone()).unwrap_or_default(),
            has_changesets: outcome.has_changesets(),
            pull_request_number: outcome.pr_number(),
        }
    }

    /// `key=value` lines; `pullRequestNumber` only when a pull request exists.
    pub(crate) fn to_lines(&self) -> Result<Vec<String>> {
        let mut lines = vec![
            format!("published={}", self.published),
            format!(
                "publishedPackages={}",
                serde_json::to_string(&self.published_packages)?
            ),
            format!("hasChangesets={}", self.has_changesets),
        ];
        if let Some(number) = self.pull_request_number {
            lines.push(format!("pullRequestNumber={number}"));
        }
        Ok(lines)
    }
}
