use snafu::Snafu;

use crate::identity::Id;

/// Conditions reported by namespace operations.
///
/// The first six are plain sentinels. The remaining ones carry the identity of the
/// node that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TreeError {
    #[snafu(display("is root"))]
    IsRoot,
    #[snafu(display("no match"))]
    NoMatch,
    #[snafu(display("not empty"))]
    NotEmpty,
    #[snafu(display("already exists"))]
    Exists,
    #[snafu(display("is set as current version"))]
    IsCurrentVersion,
    #[snafu(display("name must not be empty"))]
    IsEmpty,
    #[snafu(display("{id} is already attached to a container"))]
    AlreadyAttached { id: Id },
    #[snafu(display("attaching {id} would place a directory beneath itself"))]
    Cycle { id: Id },
    #[snafu(display("{id} has been deleted"))]
    Deleted { id: Id },
    #[snafu(display("{id} belongs to a different namespace"))]
    ForeignNode { id: Id },
    #[snafu(display("{id} was handed out twice by the id generator"))]
    IdReused { id: Id },
}

pub type TreeResult<T> = Result<T, TreeError>;

/// Rejects empty names with [`TreeError::IsEmpty`].
pub(crate) fn require_name(name: &str) -> TreeResult<()> {
    snafu::ensure!(!name.is_empty(), IsEmptySnafu);
    Ok(())
}
