use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown commit mode '{0}' (expected 'cli' or 'api')")]
    UnknownCommitMode(String),

    #[error("unknown bump type '{0}' (expected 'major', 'minor' or 'patch')")]
    UnknownBumpType(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_commit_mode_names_value() {
        let err = CoreError::UnknownCommitMode("svn".to_string());

        assert!(err.to_string().contains("'svn'"));
    }
}
