use std::path::Path;

use release_core::BumpType;

use crate::entry::ChangelogEntry;
use crate::error::ChangelogError;
use crate::heading::{Heading, scan_headings};

pub const CHANGELOG_FILENAME: &str = "CHANGELOG.md";

#[derive(Debug, Clone, Default)]
pub struct Changelog {
    content: String,
}

impl Changelog {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Reads the changelog at `path`. A missing file is `Ok(None)`; a package
    /// may not have been released before.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::Read` if the file exists but cannot be read.
    pub fn from_file_if_exists(path: &Path) -> Result<Option<Self>, ChangelogError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(Self { content })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ChangelogError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Returns the section released as `version`, or `None` when no heading
    /// names that version.
    ///
    /// A heading matches when its text equals `version`, or when it is the
    /// Keep a Changelog form `[version]` optionally followed by a date.
    #[must_use]
    pub fn entry_for_version(&self, version: &str) -> Option<ChangelogEntry> {
        let headings = scan_headings(&self.content);

        let index = headings
            .iter()
            .position(|h| heading_names_version(h.text, version))?;
        let heading = &headings[index];

        let section: Vec<&Heading<'_>> = headings[index + 1..]
            .iter()
            .take_while(|h| h.depth > heading.depth)
            .collect();

        let end = headings[index + 1 + section.len()..]
            .first()
            .map_or(self.content.len(), |h| h.start);

        let content = self.content[heading.end..end].trim().to_string();
        let highest_level = section
            .iter()
            .filter_map(|h| bump_level_of(h.text))
            .max();

        Some(ChangelogEntry {
            content,
            highest_level,
        })
    }
}

fn heading_names_version(text: &str, version: &str) -> bool {
    if text == version {
        return true;
    }

    text.strip_prefix('[')
        .and_then(|rest| rest.strip_prefix(version))
        .and_then(|rest| rest.strip_prefix(']'))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

fn bump_level_of(text: &str) -> Option<BumpType> {
    text.split_whitespace().next()?.parse().ok()
}
