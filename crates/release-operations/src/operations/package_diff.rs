use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use release_changelog::ChangelogEntry;
use release_project::CargoProject;

/// Manifest version of every package, keyed by package directory, in
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionSnapshot(IndexMap<PathBuf, String>);

impl VersionSnapshot {
    #[must_use]
    pub fn capture(project: &CargoProject) -> Self {
        project
            .packages
            .iter()
            .map(|pkg| (pkg.path.clone(), pkg.version.to_string()))
            .collect()
    }

    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PathBuf, String)> for VersionSnapshot {
    fn from_iter<T: IntoIterator<Item = (PathBuf, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Package directories whose version differs between the snapshots.
///
/// Directories only in `after` (new packages) and only in `before` (removed
/// packages) count as changed. The result follows `after`'s order, then the
/// removed directories in `before`'s order.
#[must_use]
pub fn diff_versions(before: &VersionSnapshot, after: &VersionSnapshot) -> Vec<PathBuf> {
    let changed = after
        .0
        .iter()
        .filter(|(path, version)| before.0.get(*path) != Some(*version))
        .map(|(path, _)| path.clone());

    let removed = before
        .0
        .keys()
        .filter(|path| !after.0.contains_key(*path))
        .cloned();

    changed.chain(removed).collect()
}

/// A package whose version the version command changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPackage {
    pub name: String,
    /// `None` for a package that did not exist before.
    pub old_version: Option<String>,
    pub new_version: String,
    /// Package directory relative to the project root, `/`-separated; empty
    /// for the root package.
    pub relative_dir: String,
    pub publishable: bool,
    pub changelog: Option<ChangelogEntry>,
}

impl ChangedPackage {
    #[must_use]
    pub fn tag_name(&self) -> String {
        format!("{}@{}", self.name, self.new_version)
    }

    #[must_use]
    pub fn changelog_path(&self) -> String {
        if self.relative_dir.is_empty() {
            release_changelog::CHANGELOG_FILENAME.to_string()
        } else {
            format!("{}/{}", self.relative_dir, release_changelog::CHANGELOG_FILENAME)
        }
    }
}

/// `/`-separated path of `path` relative to `root`.
pub(crate) fn relative_dir(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, &str)]) -> VersionSnapshot {
        entries
            .iter()
            .map(|(path, version)| (PathBuf::from(path), (*version).to_string()))
            .collect()
    }

    fn paths(diff: &[PathBuf]) -> Vec<&str> {
        diff.iter().filter_map(|p| p.to_str()).collect()
    }

    #[test]
    fn identical_snapshots_have_no_diff() {
        let before = snapshot(&[("crates/a", "1.0.0"), ("crates/b", "2.0.0")]);

        assert!(diff_versions(&before, &before.clone()).is_empty());
    }

    #[test]
    fn reports_only_changed_versions() {
        let before = snapshot(&[
            ("crates/a", "1.0.0"),
            ("crates/b", "2.0.0"),
            ("crates/c", "0.1.0"),
        ]);
        let after = snapshot(&[
            ("crates/a", "1.1.0"),
            ("crates/b", "2.0.0"),
            ("crates/c", "0.2.0"),
        ]);

        assert_eq!(paths(&diff_versions(&before, &after)), vec!["crates/a", "crates/c"]);
    }

    #[test]
    fn follows_after_order_not_sorted_order() {
        let before = snapshot(&[("crates/a", "1.0.0"), ("crates/z", "1.0.0")]);
        let after = snapshot(&[("crates/z", "1.0.1"), ("crates/a", "1.0.1")]);

        assert_eq!(paths(&diff_versions(&before, &after)), vec!["crates/z", "crates/a"]);
    }

    #[test]
    fn added_and_removed_packages_count_as_changed() {
        let before = snapshot(&[("crates/old", "1.0.0"), ("crates/a", "1.0.0")]);
        let after = snapshot(&[("crates/a", "1.0.0"), ("crates/new", "0.1.0")]);

        assert_eq!(paths(&diff_versions(&before, &after)), vec!["crates/new", "crates/old"]);
    }

    #[test]
    fn relative_dir_is_slash_separated() {
        let root = Path::new("/repo");

        assert_eq!(relative_dir(root, &root.join("crates").join("pkg-a")), "crates/pkg-a");
        assert_eq!(relative_dir(root, root), "");
    }

    #[test]
    fn changelog_path_for_root_and_member() {
        let mut package = ChangedPackage {
            name: "pkg-a".to_string(),
            old_version: Some("1.0.0".to_string()),
            new_version: "1.1.0".to_string(),
            relative_dir: "crates/pkg-a".to_string(),
            publishable: true,
            changelog: None,
        };

        assert_eq!(package.changelog_path(), "crates/pkg-a/CHANGELOG.md");
        assert_eq!(package.tag_name(), "pkg-a@1.1.0");

        package.relative_dir = String::new();
        assert_eq!(package.changelog_path(), "CHANGELOG.md");
    }
}
