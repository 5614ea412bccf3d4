use std::path::Path;

use release_project::PreReleaseState;

use crate::Result;

pub trait ReleaseStateReader: Send + Sync {
    /// Loads `pre.toml` from `changeset_dir`; `Ok(None)` when there is no
    /// active pre-release line.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load_pre_state(&self, changeset_dir: &Path) -> Result<Option<PreReleaseState>>;
}
