use std::path::Path;

use release_changelog::Changelog;
use release_project::CargoProject;

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no project can be found from the given path.
    fn discover_project(&self, start_path: &Path) -> Result<CargoProject>;

    /// The package's `CHANGELOG.md`, or `None` when it has none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read_changelog(&self, package_dir: &Path) -> Result<Option<Changelog>>;
}
