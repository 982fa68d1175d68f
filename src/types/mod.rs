// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod repo_slug;
mod revision;
mod root_pattern;
mod timestamp;

pub use id::{DeployHandle, Id, RecordId, TaskId};
pub use repo_slug::{RepoSlug, RepoSlugError};
pub use revision::{Revision, RevisionError};
pub use root_pattern::{RootPattern, RootPatternError};
pub use timestamp::RemoteTimestamp;
pub(crate) use timestamp::deserialize_optional as deserialize_optional_timestamp;
