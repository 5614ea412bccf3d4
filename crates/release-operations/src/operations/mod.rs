mod package_diff;
mod pr_body;
mod release_plan;
mod run;

pub use package_diff::{ChangedPackage, VersionSnapshot, diff_versions};
pub use pr_body::{PrBody, PrBodyBuilder};
pub use release_plan::{ReleasePlan, read_release_plan};
pub use run::{
    NoOpReason, PublishOutcome, RunInput, RunOperation, RunOutcome, VersionOutcome,
};
