use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::identity::UserId;
use crate::namespace::{Named, TreeResult, require_name};

/// A named identity. Cloning yields another reference to the same user.
///
/// Users live outside the namespace arena, so each one guards its own name.
#[derive(Clone)]
pub struct User {
    inner: Arc<UserRecord>,
}

struct UserRecord {
    id: UserId,
    name: RwLock<String>,
}

impl User {
    pub(crate) fn new(id: UserId, name: String) -> Self {
        Self {
            inner: Arc::new(UserRecord {
                id,
                name: RwLock::new(name),
            }),
        }
    }

    pub fn id(&self) -> UserId {
        self.inner.id
    }

    pub fn set_name(&self, name: impl Into<String>) -> TreeResult<()> {
        let name = name.into();
        require_name(&name)?;
        *self.inner.name.write() = name;
        Ok(())
    }
}

impl Named for User {
    fn name(&self) -> TreeResult<String> {
        Ok(self.inner.name.read().clone())
    }

    fn rename(&self, name: &str) -> TreeResult<()> {
        self.set_name(name)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for User {}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.inner.id)
            .field("name", &*self.inner.name.read())
            .finish()
    }
}
