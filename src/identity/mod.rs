//! Opaque identities for every entity in a namespace.
//!
//! Identities are assigned once, at construction, by an [`IdGenerator`] that the
//! namespace is configured with, and are compared by equality only.

mod generator;
mod id;

pub use generator::{IdGenerator, RandomIds, SequentialIds};
pub use id::{DirectoryId, FileId, Id, UserId, VersionId};
