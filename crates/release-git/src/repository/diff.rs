use crate::{FileChange, FileStatus, GitError, Result};

use super::Repository;

impl Repository {
    /// Lists every path whose working tree content differs from HEAD,
    /// untracked files included, sorted by path.
    ///
    /// Renames are reported as a deletion plus an addition.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved or the diff fails.
    pub fn working_tree_changes(&self) -> Result<Vec<FileChange>> {
        let head_tree = self.inner.head()?.peel_to_tree()?;

        let mut opts = git2::DiffOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true);

        let diff = self
            .inner
            .diff_tree_to_workdir_with_index(Some(&head_tree), Some(&mut opts))?;

        let mut changes = Vec::new();

        for delta in diff.deltas() {
            let status = match delta.status() {
                git2::Delta::Added | git2::Delta::Untracked => FileStatus::Added,
                git2::Delta::Deleted => FileStatus::Deleted,
                git2::Delta::Modified | git2::Delta::Typechange => FileStatus::Modified,
                _ => continue,
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .ok_or(GitError::MissingDeltaPath)?;

            let path = path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            changes.push(FileChange::new(path, status));
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(changes)
    }
}
