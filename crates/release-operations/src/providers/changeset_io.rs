use std::fs;
use std::path::{Path, PathBuf};

use release_core::Changeset;
use release_parse::parse_changeset;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ChangesetReader;

const README_FILENAME: &str = "README.md";

pub struct FileSystemChangesetIO {
    project_root: PathBuf,
}

impl FileSystemChangesetIO {
    #[must_use]
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

impl ChangesetReader for FileSystemChangesetIO {
    fn list_changesets(&self, changeset_dir: &Path) -> Result<Vec<PathBuf>> {
        let full_path = self.resolve(changeset_dir);

        let entries = match fs::read_dir(&full_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(OperationError::ChangesetList {
                    path: full_path,
                    source,
                });
            }
        };

        let mut changesets = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|source| OperationError::ChangesetList {
                path: full_path.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            if path
                .file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(README_FILENAME))
            {
                continue;
            }

            let relative = path
                .strip_prefix(&self.project_root)
                .map_or_else(|_| path.clone(), Path::to_path_buf);
            changesets.push(relative);
        }

        changesets.sort();
        Ok(changesets)
    }

    fn read_changeset(&self, path: &Path) -> Result<Changeset> {
        let full_path = self.resolve(path);
        let content =
            fs::read_to_string(&full_path).map_err(|source| OperationError::ChangesetFileRead {
                path: full_path.clone(),
                source,
            })?;

        let id = full_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        parse_changeset(&id, &content).map_err(|source| OperationError::ChangesetParse {
            path: full_path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use release_core::BumpType;
    use tempfile::TempDir;

    const CHANGESET: &str = "---\npkg-a: minor\n---\n\nAdd the widget API\n";

    fn setup() -> anyhow::Result<(TempDir, FileSystemChangesetIO)> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join(".changeset"))?;
        let io = FileSystemChangesetIO::new(dir.path());
        Ok((dir, io))
    }

    #[test]
    fn missing_directory_lists_nothing() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let io = FileSystemChangesetIO::new(dir.path());

        assert!(io.list_changesets(Path::new(".changeset"))?.is_empty());

        Ok(())
    }

    #[test]
    fn lists_markdown_files_sorted_without_readme() -> anyhow::Result<()> {
        let (dir, io) = setup()?;
        let changeset_dir = dir.path().join(".changeset");
        fs::write(changeset_dir.join("quiet-owls.md"), CHANGESET)?;
        fs::write(changeset_dir.join("brave-lions.md"), CHANGESET)?;
        fs::write(changeset_dir.join("README.md"), "# Changesets")?;
        fs::write(changeset_dir.join("pre.toml"), "tag = \"beta\"")?;
        fs::write(changeset_dir.join("config.json"), "{}")?;

        let listed = io.list_changesets(Path::new(".changeset"))?;

        assert_eq!(
            listed,
            vec![
                PathBuf::from(".changeset/brave-lions.md"),
                PathBuf::from(".changeset/quiet-owls.md"),
            ]
        );

        Ok(())
    }

    #[test]
    fn read_uses_file_stem_as_id() -> anyhow::Result<()> {
        let (dir, io) = setup()?;
        fs::write(dir.path().join(".changeset/brave-lions.md"), CHANGESET)?;

        let changeset = io.read_changeset(Path::new(".changeset/brave-lions.md"))?;

        assert_eq!(changeset.id, "brave-lions");
        assert_eq!(changeset.summary, "Add the widget API");
        assert_eq!(changeset.releases.len(), 1);
        assert_eq!(changeset.releases[0].name, "pkg-a");
        assert_eq!(changeset.releases[0].bump_type, BumpType::Minor);

        Ok(())
    }

    #[test]
    fn malformed_changeset_reports_path() -> anyhow::Result<()> {
        let (dir, io) = setup()?;
        fs::write(dir.path().join(".changeset/broken.md"), "no front matter")?;

        let err = io
            .read_changeset(Path::new(".changeset/broken.md"))
            .expect_err("front matter is required");

        assert!(
            matches!(
                &err,
                OperationError::ChangesetParse { path, .. } if path.ends_with("broken.md")
            ),
            "unexpected error: {err:?}"
        );

        Ok(())
    }
}
