mod changelog;
mod entry;
mod error;
mod heading;

pub use changelog::{CHANGELOG_FILENAME, Changelog};
pub use entry::ChangelogEntry;
pub use error::ChangelogError;

pub type Result<T> = std::result::Result<T, ChangelogError>;
