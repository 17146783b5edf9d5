use std::fmt;
use std::time::SystemTime;

use crate::identity::{FileId, VersionId};
use crate::namespace::{
    Deletable, Directory, Named, Namespace, Owned, SearchDepth, TreeResult, Version, VersionQuery,
    require_name,
};
use crate::user::User;

/// Handle to a file record and its version history.
#[derive(Clone)]
pub struct File {
    pub(crate) namespace: Namespace,
    pub(crate) id: FileId,
}

impl File {
    pub(crate) fn from_parts(namespace: Namespace, id: FileId) -> Self {
        Self { namespace, id }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn version_handle(&self, id: VersionId) -> Version {
        Version::from_parts(self.namespace.clone(), id)
    }

    /// The directory holding this file, if it has been placed in one.
    pub fn directory(&self) -> TreeResult<Option<Directory>> {
        let directory = self.namespace.read().file(self.id)?.directory;
        Ok(directory.map(|id| Directory::from_parts(self.namespace.clone(), id)))
    }

    /// Moves the file into `directory`, or out of any directory with `None`.
    pub fn set_directory(&self, directory: Option<&Directory>) -> TreeResult<()> {
        if let Some(directory) = directory {
            self.namespace
                .ensure_same(&directory.namespace, directory.id)?;
        }
        self.namespace
            .write()
            .move_file(self.id, directory.map(|d| d.id))
    }

    pub fn versions(&self) -> TreeResult<Vec<Version>> {
        let arena = self.namespace.read();
        let record = arena.file(self.id)?;
        Ok(record
            .versions
            .iter()
            .map(|id| self.version_handle(*id))
            .collect())
    }

    /// The active version, which need not be the newest one.
    pub fn current_version(&self) -> TreeResult<Option<Version>> {
        let current = self.namespace.read().file(self.id)?.current_version;
        Ok(current.map(|id| self.version_handle(id)))
    }

    /// Makes `version` current, attaching it first if it is not part of the history yet.
    pub fn set_current_version(&self, version: &Version) -> TreeResult<()> {
        self.namespace.ensure_same(&version.namespace, version.id)?;
        self.namespace
            .write()
            .set_current_version(self.id, version.id)
    }

    /// Fails with `Exists` if `version` is already in this file's history.
    pub fn attach_version(&self, version: &Version) -> TreeResult<()> {
        self.namespace.ensure_same(&version.namespace, version.id)?;
        self.namespace.write().attach_version(self.id, version.id)
    }

    /// Fails with `IsCurrentVersion` while `version` is current and others remain.
    /// Detaching the only version also clears the current version.
    pub fn detach_version(&self, version: &Version) -> TreeResult<()> {
        self.namespace.ensure_same(&version.namespace, version.id)?;
        self.namespace.write().detach_version(self.id, version.id)
    }

    /// Records a new version and appends it to the history.
    pub fn create_version(&self, timestamp: SystemTime, creator: &User) -> TreeResult<Version> {
        self.insert_version(timestamp, creator, true)
    }

    /// Records a new version owned by this file without adding it to the history.
    pub fn new_version(&self, timestamp: SystemTime, creator: &User) -> TreeResult<Version> {
        self.insert_version(timestamp, creator, false)
    }

    fn insert_version(
        &self,
        timestamp: SystemTime,
        creator: &User,
        attach: bool,
    ) -> TreeResult<Version> {
        let id = self.namespace.next_id();
        self.namespace
            .write()
            .insert_version(id, self.id, timestamp, creator.clone(), attach)?;
        Ok(self.version_handle(id))
    }

    /// Versions passing every filter in `query`. Versions have no substructure, so
    /// `depth` is accepted only to mirror the directory searches.
    pub fn find_versions(
        &self,
        query: &VersionQuery,
        _depth: impl Into<SearchDepth>,
    ) -> TreeResult<Vec<Version>> {
        let matches = self.namespace.read().find_versions(self.id, query)?;
        Ok(matches
            .into_iter()
            .map(|id| self.version_handle(id))
            .collect())
    }
}

impl Named for File {
    fn name(&self) -> TreeResult<String> {
        Ok(self.namespace.read().file(self.id)?.name.clone())
    }

    fn rename(&self, name: &str) -> TreeResult<()> {
        require_name(name)?;
        self.namespace.write().file_mut(self.id)?.name = name.to_string();
        Ok(())
    }
}

impl Owned for File {
    fn owner(&self) -> TreeResult<Option<User>> {
        Ok(self.namespace.read().file(self.id)?.owner.clone())
    }

    fn set_owner(&self, owner: Option<User>) -> TreeResult<()> {
        self.namespace.write().file_mut(self.id)?.owner = owner;
        Ok(())
    }
}

impl Deletable for File {
    /// Fails with `NotEmpty` while any version is attached.
    fn delete(&self) -> TreeResult<()> {
        self.namespace.write().delete_file(self.id)
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for File {}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("File").field(&self.id).finish()
    }
}
