use std::path::Path;

use release_core::Changeset;
use release_project::{PreMode, PreReleaseState};
use tracing::debug;

use crate::Result;
use crate::traits::{ChangesetReader, ReleaseStateReader};

/// Pending changesets for one run, minus those already folded into an
/// active pre-release line. Once the line is exiting, every changeset is
/// pending again so the stable release picks them up.
#[derive(Debug, Clone, Default)]
pub struct ReleasePlan {
    pub changesets: Vec<Changeset>,
    pub pre_state: Option<PreReleaseState>,
}

impl ReleasePlan {
    #[must_use]
    pub fn has_changesets(&self) -> bool {
        !self.changesets.is_empty()
    }

    /// Whether at least one changeset names a package to release.
    #[must_use]
    pub fn has_releases(&self) -> bool {
        self.changesets.iter().any(|c| !c.is_empty())
    }

    /// Pre-release tag to suffix titles with, if a pre-release line exists.
    #[must_use]
    pub fn pre_tag(&self) -> Option<&str> {
        self.pre_state.as_ref().map(PreReleaseState::tag)
    }
}

/// # Errors
///
/// Returns an error if a changeset or the pre-release state cannot be read.
pub fn read_release_plan<R, S>(
    changeset_reader: &R,
    state_reader: &S,
    changeset_dir: &Path,
) -> Result<ReleasePlan>
where
    R: ChangesetReader + ?Sized,
    S: ReleaseStateReader + ?Sized,
{
    let pre_state = state_reader.load_pre_state(changeset_dir)?;
    let consumed = pre_state
        .as_ref()
        .filter(|state| state.mode() == PreMode::Pre);

    let mut changesets = Vec::new();
    for path in changeset_reader.list_changesets(changeset_dir)? {
        let changeset = changeset_reader.read_changeset(&path)?;

        if consumed.is_some_and(|state| state.is_applied(&changeset.id)) {
            debug!(id = %changeset.id, "changeset already applied to pre-release");
            continue;
        }

        changesets.push(changeset);
    }

    changesets.sort_by(|a, b| a.id.cmp(&b.id));

    Ok(ReleasePlan {
        changesets,
        pre_state,
    })
}
