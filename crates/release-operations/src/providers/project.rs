use std::path::Path;

use release_changelog::{CHANGELOG_FILENAME, Changelog};
use release_project::{CargoProject, discover_project};

use crate::Result;
use crate::traits::ProjectProvider;

pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    fn discover_project(&self, start_path: &Path) -> Result<CargoProject> {
        Ok(discover_project(start_path)?)
    }

    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>> {
        Ok(Changelog::from_file_if_exists(
            &package_dir.join(CHANGELOG_FILENAME),
        )?)
    }
}
