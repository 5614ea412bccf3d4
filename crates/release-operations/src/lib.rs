mod error;
pub mod operations;
pub mod providers;
pub mod traits;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod mocks;

pub use error::{OperationError, Result};
pub use types::{CommandOutput, CommandSpec, GitIdentity};
