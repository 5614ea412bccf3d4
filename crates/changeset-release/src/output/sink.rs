use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::ActionOutputs;
use crate::error::{CliError, Result};

/// Appends the outputs to `file` (the `GITHUB_OUTPUT` file in a workflow),
/// or prints them when no file is given.
pub(crate) fn write_outputs(outputs: &ActionOutputs, file: Option<&Path>) -> Result<()> {
    let lines = outputs.to_lines()?;

    let Some(path) = file else {
        for line in &lines {
            println!("{line}");
        }
        return Ok(());
    };

    let write_error = |source| CliError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut handle = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_error)?;

    for line in &lines {
        writeln!(handle, "{line}").map_err(write_error)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_to_existing_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("github_output");
        std::fs::write(&path, "earlier=1\n")?;

        let outputs = ActionOutputs {
            has_changesets: true,
            pull_request_number: Some(9),
            ..ActionOutputs::default()
        };
        write_outputs(&outputs, Some(&path))?;

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(
            content,
            "earlier=1\npublished=false\npublishedPackages=[]\nhasChangesets=true\npullRequestNumber=9\n"
        );

        Ok(())
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("missing-dir").join("github_output");

        let result = write_outputs(&ActionOutputs::default(), Some(&path));

        assert!(matches!(result, Err(CliError::OutputWrite { .. })));
    }
}
