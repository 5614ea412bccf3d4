use release_core::BumpType;

/// The body of one version section of a changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Markdown between the version heading and the next heading of the same
    /// or shallower depth, trimmed.
    pub content: String,
    /// Highest bump named by a sub-heading such as `### Minor Changes`.
    pub highest_level: Option<BumpType>,
}

impl ChangelogEntry {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            highest_level: None,
        }
    }

    #[must_use]
    pub fn with_highest_level(mut self, level: BumpType) -> Self {
        self.highest_level = Some(level);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_entry() {
        let entry = ChangelogEntry::new("- Fixed a bug");
        assert_eq!(entry.content, "- Fixed a bug");
        assert!(entry.highest_level.is_none());
        assert!(!entry.is_empty());
    }

    #[test]
    fn create_entry_with_level() {
        let entry = ChangelogEntry::new("").with_highest_level(BumpType::Minor);
        assert_eq!(entry.highest_level, Some(BumpType::Minor));
        assert!(entry.is_empty());
    }
}
