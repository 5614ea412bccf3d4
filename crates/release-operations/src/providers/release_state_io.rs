use std::fs;
use std::path::Path;

use release_project::PreReleaseState;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ReleaseStateReader;

pub const PRE_STATE_FILENAME: &str = "pre.toml";

pub struct FileSystemReleaseStateIO;

impl FileSystemReleaseStateIO {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReleaseStateIO {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseStateReader for FileSystemReleaseStateIO {
    fn load_pre_state(&self, changeset_dir: &Path) -> Result<Option<PreReleaseState>> {
        let path = changeset_dir.join(PRE_STATE_FILENAME);

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(OperationError::ReleaseStateRead { path, source }),
        };

        let state = toml::from_str(&content)
            .map_err(|source| OperationError::ReleaseStateParse { path, source })?;

        Ok(Some(state))
    }
}
