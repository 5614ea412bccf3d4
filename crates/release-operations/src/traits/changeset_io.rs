use std::path::{Path, PathBuf};

use release_core::Changeset;

use crate::Result;

pub trait ChangesetReader: Send + Sync {
    /// Paths of the pending changeset files in `changeset_dir`. A missing
    /// directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    fn list_changesets(&self, changeset_dir: &Path) -> Result<Vec<PathBuf>>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn read_changeset(&self, path: &Path) -> Result<Changeset>;
}
