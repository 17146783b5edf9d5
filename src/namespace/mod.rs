//! In-memory namespace of directories, files and versions.
//!
//! All records live in a single arena keyed by identity and guarded by one
//! reader/writer lock. Structural operations (attach, detach, move, delete) take the
//! write lock once and are atomic; searches take the read lock once and see a
//! consistent snapshot of the tree.
//!
//! [`Directory`], [`File`] and [`Version`] are cheap handles: a clone of the namespace
//! plus an identity. A handle whose record has been deleted reports
//! [`TreeError::Deleted`] from every operation.

mod arena;
mod capability;
mod directory;
mod error;
mod file;
mod node;
mod path;
mod search;
mod version;

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use snafu::ensure;

pub use capability::{Deletable, Named, Owned};
pub use directory::Directory;
pub use error::{TreeError, TreeResult};
pub use file::File;
pub use node::Node;
pub use path::{Located, SEPARATOR, path};
pub use search::{SearchDepth, VersionQuery};
pub use version::Version;

pub(crate) use error::require_name;

use crate::identity::{DirectoryId, FileId, Id, IdGenerator, RandomIds, UserId, VersionId};
use crate::namespace::arena::Arena;
use crate::namespace::error::ForeignNodeSnafu;
use crate::user::User;

/// Shared handle to an arena of trees. Cloning is cheap and every clone sees the same
/// records.
#[derive(Clone)]
pub struct Namespace {
    arena: Arc<RwLock<Arena>>,
    ids: Arc<dyn IdGenerator>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::with_id_generator(RandomIds)
    }

    /// Uses `ids` for every entity created through this namespace.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            arena: Arc::new(RwLock::new(Arena::default())),
            ids: Arc::new(ids),
        }
    }

    /// Creates the root directory of a new tree.
    pub fn create_root(&self, name: impl Into<String>) -> TreeResult<Directory> {
        let id: DirectoryId = self.next_id();
        self.write().insert_root(id, name.into())?;
        Ok(Directory::from_parts(self.clone(), id))
    }

    /// Creates a file that is not placed in any directory yet.
    pub fn create_file(&self, name: impl Into<String>) -> TreeResult<File> {
        let id: FileId = self.next_id();
        self.write().insert_file(id, None, name.into())?;
        Ok(File::from_parts(self.clone(), id))
    }

    pub fn create_user(&self, name: impl Into<String>) -> TreeResult<User> {
        let name = name.into();
        require_name(&name)?;
        Ok(User::new(self.next_id::<UserId>(), name))
    }

    pub fn directory(&self, id: DirectoryId) -> Option<Directory> {
        self.read()
            .contains_directory(id)
            .then(|| Directory::from_parts(self.clone(), id))
    }

    pub fn file(&self, id: FileId) -> Option<File> {
        self.read()
            .contains_file(id)
            .then(|| File::from_parts(self.clone(), id))
    }

    pub fn version(&self, id: VersionId) -> Option<Version> {
        self.read()
            .contains_version(id)
            .then(|| Version::from_parts(self.clone(), id))
    }

    pub(crate) fn next_id<T: From<Id>>(&self) -> T {
        T::from(self.ids.next_id())
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Arena> {
        self.arena.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Arena> {
        self.arena.write()
    }

    /// Fails with [`TreeError::ForeignNode`] unless `other` is this same namespace.
    pub(crate) fn ensure_same(&self, other: &Namespace, id: impl Into<Id>) -> TreeResult<()> {
        let id: Id = id.into();
        ensure!(
            Arc::ptr_eq(&self.arena, &other.arena),
            ForeignNodeSnafu { id }
        );
        Ok(())
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (directories, files, versions) = self.read().counts();
        f.debug_struct("Namespace")
            .field("directories", &directories)
            .field("files", &files)
            .field("versions", &versions)
            .field("ids", &self.ids)
            .finish()
    }
}
