use std::fmt;

use regex::Regex;

use crate::identity::DirectoryId;
use crate::namespace::arena::Entry;
use crate::namespace::{
    Deletable, File, Named, Namespace, Node, Owned, SearchDepth, TreeResult, require_name,
};
use crate::user::User;

/// Handle to a directory record.
#[derive(Clone)]
pub struct Directory {
    pub(crate) namespace: Namespace,
    pub(crate) id: DirectoryId,
}

impl Directory {
    pub(crate) fn from_parts(namespace: Namespace, id: DirectoryId) -> Self {
        Self { namespace, id }
    }

    pub fn id(&self) -> DirectoryId {
        self.id
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    fn handle(&self, id: DirectoryId) -> Directory {
        Directory::from_parts(self.namespace.clone(), id)
    }

    /// Creates a subdirectory. Nothing is created if the attach fails.
    pub fn create_directory(&self, name: impl Into<String>) -> TreeResult<Directory> {
        let id: DirectoryId = self.namespace.next_id();
        self.namespace
            .write()
            .insert_directory(id, self.id, name.into())?;
        Ok(self.handle(id))
    }

    /// Creates a file inside this directory. Nothing is created if the attach fails.
    pub fn create_file(&self, name: impl Into<String>) -> TreeResult<File> {
        let id = self.namespace.next_id();
        self.namespace
            .write()
            .insert_file(id, Some(self.id), name.into())?;
        Ok(File::from_parts(self.namespace.clone(), id))
    }

    /// `None` for the root of a tree.
    pub fn parent(&self) -> TreeResult<Option<Directory>> {
        let parent = self.namespace.read().directory(self.id)?.parent;
        Ok(parent.map(|id| self.handle(id)))
    }

    pub fn is_root(&self) -> TreeResult<bool> {
        Ok(self.namespace.read().directory(self.id)?.parent.is_none())
    }

    pub fn root(&self) -> TreeResult<Directory> {
        let root = self.namespace.read().directory(self.id)?.root;
        Ok(self.handle(root))
    }

    /// Directories from the root down to this one, inclusive.
    pub fn ancestry(&self) -> TreeResult<Vec<Directory>> {
        let chain = self.namespace.read().ancestry(self.id)?;
        Ok(chain.into_iter().map(|id| self.handle(id)).collect())
    }

    pub fn children(&self) -> TreeResult<Vec<Directory>> {
        let arena = self.namespace.read();
        let record = arena.directory(self.id)?;
        Ok(record.child_ids().map(|id| self.handle(id)).collect())
    }

    pub fn files(&self) -> TreeResult<Vec<File>> {
        let arena = self.namespace.read();
        let record = arena.directory(self.id)?;
        Ok(record
            .file_ids()
            .map(|id| File::from_parts(self.namespace.clone(), id))
            .collect())
    }

    /// Subdirectories and files in the order they were attached.
    pub fn entries(&self) -> TreeResult<Vec<Node>> {
        let arena = self.namespace.read();
        let record = arena.directory(self.id)?;
        Ok(record
            .entries
            .iter()
            .map(|entry| match *entry {
                Entry::Directory(id) => Node::Directory(self.handle(id)),
                Entry::File(id) => Node::File(File::from_parts(self.namespace.clone(), id)),
            })
            .collect())
    }

    /// Appends `child`, which must be the root of its own tree, and re-roots its whole
    /// subtree under this directory's root.
    pub fn attach_directory(&self, child: &Directory) -> TreeResult<()> {
        self.namespace.ensure_same(&child.namespace, child.id)?;
        self.namespace.write().attach_directory(self.id, child.id)
    }

    /// Removes `child`, leaving it as the root of its own tree.
    pub fn detach_directory(&self, child: &Directory) -> TreeResult<()> {
        self.namespace.ensure_same(&child.namespace, child.id)?;
        self.namespace.write().detach_directory(self.id, child.id)
    }

    pub fn attach_file(&self, file: &File) -> TreeResult<()> {
        self.namespace.ensure_same(&file.namespace, file.id)?;
        self.namespace.write().attach_file(self.id, file.id)
    }

    pub fn detach_file(&self, file: &File) -> TreeResult<()> {
        self.namespace.ensure_same(&file.namespace, file.id)?;
        self.namespace.write().detach_file(self.id, file.id)
    }

    /// Moves this directory, with its subtree, beneath `new_parent`.
    pub fn move_to(&self, new_parent: &Directory) -> TreeResult<()> {
        self.namespace
            .ensure_same(&new_parent.namespace, new_parent.id)?;
        self.namespace.write().move_directory(self.id, new_parent.id)
    }

    /// Directories whose name matches `pattern`, in preorder.
    ///
    /// Fails with [`TreeError::NoMatch`](crate::namespace::TreeError::NoMatch) when
    /// nothing matches.
    pub fn find_directories(
        &self,
        pattern: &Regex,
        depth: impl Into<SearchDepth>,
    ) -> TreeResult<Vec<Directory>> {
        let matches = self
            .namespace
            .read()
            .find_directories(self.id, pattern, depth.into())?;
        Ok(matches.into_iter().map(|id| self.handle(id)).collect())
    }

    /// Files whose name matches `pattern`. Each visited directory contributes its own
    /// files before those of its subdirectories.
    pub fn find_files(
        &self,
        pattern: &Regex,
        depth: impl Into<SearchDepth>,
    ) -> TreeResult<Vec<File>> {
        let matches = self
            .namespace
            .read()
            .find_files(self.id, pattern, depth.into())?;
        Ok(matches
            .into_iter()
            .map(|id| File::from_parts(self.namespace.clone(), id))
            .collect())
    }
}

impl Named for Directory {
    fn name(&self) -> TreeResult<String> {
        Ok(self.namespace.read().directory(self.id)?.name.clone())
    }

    fn rename(&self, name: &str) -> TreeResult<()> {
        require_name(name)?;
        self.namespace.write().directory_mut(self.id)?.name = name.to_string();
        Ok(())
    }
}

impl Owned for Directory {
    fn owner(&self) -> TreeResult<Option<User>> {
        Ok(self.namespace.read().directory(self.id)?.owner.clone())
    }

    fn set_owner(&self, owner: Option<User>) -> TreeResult<()> {
        self.namespace.write().directory_mut(self.id)?.owner = owner;
        Ok(())
    }
}

impl Deletable for Directory {
    /// Fails with `IsRoot` for a root and with `NotEmpty` while anything is attached.
    fn delete(&self) -> TreeResult<()> {
        self.namespace.write().delete_directory(self.id)
    }
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Directory {}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Directory").field(&self.id).finish()
    }
}
