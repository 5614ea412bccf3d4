use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreMode {
    #[default]
    Pre,
    Exit,
}

/// Active pre-release line.
/// File: `.changeset/pre.toml`
/// Format:
/// ```toml
/// mode = "pre"
/// tag = "beta"
/// changesets = ["brave-lions-dance", "quiet-owls-sing"]
/// ```
///
/// `changesets` lists the ids already folded into the pre-release versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreReleaseState {
    #[serde(default)]
    mode: PreMode,
    tag: String,
    #[serde(default)]
    changesets: Vec<String>,
}

impl PreReleaseState {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            mode: PreMode::Pre,
            tag: tag.into(),
            changesets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_applied(mut self, id: impl Into<String>) -> Self {
        self.mark_applied(id.into());
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: PreMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn mode(&self) -> PreMode {
        self.mode
    }

    fn mark_applied(&mut self, id: String) {
        if !self.changesets.contains(&id) {
            self.changesets.push(id);
        }
    }

    /// Whether the changeset with `id` is already part of the pre-release line.
    #[must_use]
    pub fn is_applied(&self, id: &str) -> bool {
        self.changesets.iter().any(|c| c == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_no_applied_changesets() {
        let state = PreReleaseState::new("beta");

        assert_eq!(state.tag(), "beta");
        assert_eq!(state.mode(), PreMode::Pre);
        assert!(!state.is_applied("brave-lions"));
    }

    #[test]
    fn mark_applied_is_idempotent() {
        let mut state = PreReleaseState::new("alpha");

        state.mark_applied("brave-lions".to_string());
        state.mark_applied("brave-lions".to_string());

        assert_eq!(state, PreReleaseState::new("alpha").with_applied("brave-lions"));
        assert!(state.is_applied("brave-lions"));
        assert!(!state.is_applied("quiet-owls"));
    }

    #[test]
    fn parses_toml_file_format() {
        let content = r#"
mode = "exit"
tag = "rc"
changesets = ["a", "b"]
"#;

        let state: PreReleaseState = toml::from_str(content).expect("valid pre state");

        assert_eq!(state.mode(), PreMode::Exit);
        assert_eq!(state.tag(), "rc");
        assert!(state.is_applied("a"));
        assert!(state.is_applied("b"));
    }

    #[test]
    fn mode_and_changesets_default_when_missing() {
        let state: PreReleaseState = toml::from_str(r#"tag = "beta""#).expect("valid pre state");

        assert_eq!(state.mode(), PreMode::Pre);
        assert_eq!(state, PreReleaseState::new("beta"));
    }

    #[test]
    fn roundtrips_through_toml() {
        let state = PreReleaseState::new("beta").with_applied("x");

        let serialized = toml::to_string(&state).expect("serialize");
        let parsed: PreReleaseState = toml::from_str(&serialized).expect("parse");

        assert_eq!(parsed, state);
    }
}
