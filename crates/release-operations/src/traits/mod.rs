mod changeset_io;
mod command_runner;
mod forge;
mod git_data;
mod project_provider;
mod release_state_io;
mod scm;

pub use changeset_io::ChangesetReader;
pub use command_runner::CommandRunner;
pub use forge::ForgeProvider;
pub use git_data::GitDataApi;
pub use project_provider::ProjectProvider;
pub use release_state_io::ReleaseStateReader;
pub use scm::ScmAdapter;
