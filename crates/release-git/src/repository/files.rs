use std::path::Path;

use crate::{GitError, Result, WorktreeFile};

use super::Repository;

impl Repository {
    /// Reads a file from the working tree. Relative paths resolve against
    /// the repository root.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::FileRead`] if the file cannot be read.
    pub fn read_worktree_file(&self, path: &Path) -> Result<WorktreeFile> {
        let relative = self.to_relative_path(path);
        let absolute = self.root().join(&relative);

        let content = std::fs::read(&absolute).map_err(|source| GitError::FileRead {
            path: absolute.clone(),
            source,
        })?;

        let metadata = std::fs::metadata(&absolute).map_err(|source| GitError::FileRead {
            path: absolute.clone(),
            source,
        })?;

        Ok(WorktreeFile {
            path: relative,
            content,
            executable: is_executable(&metadata),
        })
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}
