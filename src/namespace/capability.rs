use crate::namespace::TreeResult;
use crate::user::User;

/// Entities that carry a mutable, non-empty name.
pub trait Named {
    fn name(&self) -> TreeResult<String>;
    /// Fails with [`TreeError::IsEmpty`](crate::namespace::TreeError::IsEmpty) on an empty name.
    fn rename(&self, name: &str) -> TreeResult<()>;
}

/// Entities that record which user owns them. Ownership is stored, never enforced.
pub trait Owned {
    fn owner(&self) -> TreeResult<Option<User>>;
    fn set_owner(&self, owner: Option<User>) -> TreeResult<()>;
}

/// Entities that can remove themselves from the namespace once their invariants allow it.
pub trait Deletable {
    fn delete(&self) -> TreeResult<()>;
}
