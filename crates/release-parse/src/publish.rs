//! Recovers released packages from the publish tool's console output.
//!
//! The publish tool announces every tag it created with a line such as
//! `New tag: pkg-a@1.2.0` (optionally decorated, e.g. `🦋  New tag:  pkg-a@1.2.0`).
//! The wording belongs to the tool, so anything that does not match is ignored
//! rather than reported as an error.

use std::sync::LazyLock;

use regex::Regex;

static NEW_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"New tag:\s+`?((?:@[^/\s`]+/)?[^@\s`]+)@([^\s`]+)`?")
        .expect("new tag pattern is valid")
});

/// A package/version pair announced by the publish tool, not yet matched
/// against the local packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCandidate {
    pub name: String,
    pub version: String,
}

/// Extracts every `New tag: <name>@<version>` announcement, in output order.
#[must_use]
pub fn parse_publish_output(output: &str) -> Vec<PublishCandidate> {
    output
        .lines()
        .filter_map(|line| {
            let captures = NEW_TAG.captures(line)?;
            Some(PublishCandidate {
                name: captures[1].to_string(),
                version: captures[2].to_string(),
            })
        })
        .collect()
}

/// Single-package projects tag as `v<version>`, so any announcement counts.
#[must_use]
pub fn mentions_new_tag(output: &str) -> bool {
    output.lines().any(|line| line.contains("New tag:"))
}
