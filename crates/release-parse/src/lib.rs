mod error;
mod parse;
mod publish;

pub use error::{FormatError, FrontMatterError, ValidationError};
pub use parse::parse_changeset;
pub use publish::{PublishCandidate, mentions_new_tag, parse_publish_output};
