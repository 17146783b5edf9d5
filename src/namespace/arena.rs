use std::collections::HashMap;
use std::time::SystemTime;

use regex::Regex;
use snafu::{OptionExt, ensure};
use tracing::{debug, trace};

use crate::identity::{DirectoryId, FileId, VersionId};
use crate::namespace::error::{
    AlreadyAttachedSnafu, CycleSnafu, DeletedSnafu, ExistsSnafu, IdReusedSnafu,
    IsCurrentVersionSnafu, IsRootSnafu, NoMatchSnafu, NotEmptySnafu, TreeResult, require_name,
};
use crate::namespace::search::{SearchDepth, VersionQuery};
use crate::user::User;

/// One slot in a directory's ordered contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Directory(DirectoryId),
    File(FileId),
}

#[derive(Debug)]
pub(crate) struct DirectoryRecord {
    pub name: String,
    pub parent: Option<DirectoryId>,
    pub root: DirectoryId,
    pub entries: Vec<Entry>,
    pub owner: Option<User>,
}

impl DirectoryRecord {
    /// A fresh directory that is the root of its own tree.
    fn detached(id: DirectoryId, name: String) -> Self {
        Self {
            name,
            parent: None,
            root: id,
            entries: Vec::new(),
            owner: None,
        }
    }

    pub fn child_ids(&self) -> impl Iterator<Item = DirectoryId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Directory(id) => Some(*id),
            Entry::File(_) => None,
        })
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::File(id) => Some(*id),
            Entry::Directory(_) => None,
        })
    }
}

#[derive(Debug)]
pub(crate) struct FileRecord {
    pub name: String,
    pub directory: Option<DirectoryId>,
    pub versions: Vec<VersionId>,
    pub current_version: Option<VersionId>,
    pub owner: Option<User>,
}

#[derive(Debug)]
pub(crate) struct VersionRecord {
    pub file: FileId,
    pub timestamp: SystemTime,
    pub creator: User,
}

/// Every record of a namespace, keyed by identity.
///
/// Parent, root and file back-references are plain keys into these maps, so removing
/// a record can never leave a dangling pointer behind: a later lookup reports
/// `Deleted` instead.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    directories: HashMap<DirectoryId, DirectoryRecord>,
    files: HashMap<FileId, FileRecord>,
    versions: HashMap<VersionId, VersionRecord>,
}

impl Arena {
    pub fn directory(&self, id: DirectoryId) -> TreeResult<&DirectoryRecord> {
        self.directories.get(&id).context(DeletedSnafu { id })
    }

    pub fn directory_mut(&mut self, id: DirectoryId) -> TreeResult<&mut DirectoryRecord> {
        self.directories.get_mut(&id).context(DeletedSnafu { id })
    }

    pub fn file(&self, id: FileId) -> TreeResult<&FileRecord> {
        self.files.get(&id).context(DeletedSnafu { id })
    }

    pub fn file_mut(&mut self, id: FileId) -> TreeResult<&mut FileRecord> {
        self.files.get_mut(&id).context(DeletedSnafu { id })
    }

    pub fn version(&self, id: VersionId) -> TreeResult<&VersionRecord> {
        self.versions.get(&id).context(DeletedSnafu { id })
    }

    pub fn version_mut(&mut self, id: VersionId) -> TreeResult<&mut VersionRecord> {
        self.versions.get_mut(&id).context(DeletedSnafu { id })
    }

    pub fn contains_directory(&self, id: DirectoryId) -> bool {
        self.directories.contains_key(&id)
    }

    pub fn contains_file(&self, id: FileId) -> bool {
        self.files.contains_key(&id)
    }

    pub fn contains_version(&self, id: VersionId) -> bool {
        self.versions.contains_key(&id)
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.directories.len(), self.files.len(), self.versions.len())
    }

    pub fn insert_root(&mut self, id: DirectoryId, name: String) -> TreeResult<()> {
        require_name(&name)?;
        ensure!(!self.directories.contains_key(&id), IdReusedSnafu { id });
        debug!("Creating root directory {id} '{name}'");
        self.directories.insert(id, DirectoryRecord::detached(id, name));
        Ok(())
    }

    /// Creates a directory and attaches it beneath `parent` in one step.
    pub fn insert_directory(
        &mut self,
        id: DirectoryId,
        parent: DirectoryId,
        name: String,
    ) -> TreeResult<()> {
        require_name(&name)?;
        self.directory(parent)?;
        ensure!(!self.directories.contains_key(&id), IdReusedSnafu { id });
        debug!("Creating directory {id} '{name}' under {parent}");
        self.directories.insert(id, DirectoryRecord::detached(id, name));
        if let Err(err) = self.attach_directory(parent, id) {
            self.directories.remove(&id);
            return Err(err);
        }
        Ok(())
    }

    pub fn insert_file(
        &mut self,
        id: FileId,
        directory: Option<DirectoryId>,
        name: String,
    ) -> TreeResult<()> {
        require_name(&name)?;
        if let Some(directory) = directory {
            self.directory(directory)?;
        }
        ensure!(!self.files.contains_key(&id), IdReusedSnafu { id });
        debug!("Creating file {id} '{name}'");
        self.files.insert(
            id,
            FileRecord {
                name,
                directory: None,
                versions: Vec::new(),
                current_version: None,
                owner: None,
            },
        );
        if let Some(directory) = directory {
            if let Err(err) = self.attach_file(directory, id) {
                self.files.remove(&id);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Creates a version owned by `file`. It only joins the file's history when `attach`
    /// is set.
    pub fn insert_version(
        &mut self,
        id: VersionId,
        file: FileId,
        timestamp: SystemTime,
        creator: User,
        attach: bool,
    ) -> TreeResult<()> {
        self.file(file)?;
        ensure!(!self.versions.contains_key(&id), IdReusedSnafu { id });
        debug!("Creating version {id} of file {file}");
        self.versions.insert(
            id,
            VersionRecord {
                file,
                timestamp,
                creator,
            },
        );
        if attach {
            if let Err(err) = self.attach_version(file, id) {
                self.versions.remove(&id);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Directories from the root down to `id`, inclusive.
    pub fn ancestry(&self, id: DirectoryId) -> TreeResult<Vec<DirectoryId>> {
        let mut chain = vec![id];
        let mut current = self.directory(id)?.parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.directory(parent)?.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Whether `node` is `ancestor` or lies somewhere beneath it.
    fn is_within(&self, node: DirectoryId, ancestor: DirectoryId) -> TreeResult<bool> {
        Ok(self.ancestry(node)?.contains(&ancestor))
    }

    /// Points `id` and its whole subtree at `root`.
    pub fn set_root(&mut self, id: DirectoryId, root: DirectoryId) -> TreeResult<()> {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let record = self.directory_mut(current)?;
            record.root = root;
            pending.extend(record.child_ids());
        }
        Ok(())
    }

    pub fn attach_directory(&mut self, parent: DirectoryId, child: DirectoryId) -> TreeResult<()> {
        let root = self.directory(parent)?.root;
        ensure!(
            self.directory(child)?.parent.is_none(),
            AlreadyAttachedSnafu { id: child }
        );
        ensure!(!self.is_within(parent, child)?, CycleSnafu { id: child });

        self.directory_mut(parent)?
            .entries
            .push(Entry::Directory(child));
        self.directory_mut(child)?.parent = Some(parent);
        self.set_root(child, root)?;
        debug!("Attached directory {child} to {parent}");
        Ok(())
    }

    /// Unlinks `child` from `parent`. The child becomes the root of its own tree.
    pub fn detach_directory(&mut self, parent: DirectoryId, child: DirectoryId) -> TreeResult<()> {
        let entries = &mut self.directory_mut(parent)?.entries;
        let index = entries
            .iter()
            .position(|entry| *entry == Entry::Directory(child))
            .context(NoMatchSnafu)?;
        entries.remove(index);

        self.directory_mut(child)?.parent = None;
        self.set_root(child, child)?;
        debug!("Detached directory {child} from {parent}");
        Ok(())
    }

    pub fn move_directory(&mut self, id: DirectoryId, new_parent: DirectoryId) -> TreeResult<()> {
        let parent = self.directory(id)?.parent.context(IsRootSnafu)?;
        self.directory(new_parent)?;
        ensure!(!self.is_within(new_parent, id)?, CycleSnafu { id });

        self.detach_directory(parent, id)?;
        self.attach_directory(new_parent, id)
    }

    pub fn delete_directory(&mut self, id: DirectoryId) -> TreeResult<()> {
        let record = self.directory(id)?;
        let parent = record.parent.context(IsRootSnafu)?;
        ensure!(record.entries.is_empty(), NotEmptySnafu);

        self.detach_directory(parent, id)?;
        self.directories.remove(&id);
        debug!("Deleted directory {id}");
        Ok(())
    }

    pub fn attach_file(&mut self, directory: DirectoryId, file: FileId) -> TreeResult<()> {
        self.directory(directory)?;
        ensure!(
            self.file(file)?.directory.is_none(),
            AlreadyAttachedSnafu { id: file }
        );

        self.directory_mut(directory)?
            .entries
            .push(Entry::File(file));
        self.file_mut(file)?.directory = Some(directory);
        debug!("Attached file {file} to {directory}");
        Ok(())
    }

    pub fn detach_file(&mut self, directory: DirectoryId, file: FileId) -> TreeResult<()> {
        let entries = &mut self.directory_mut(directory)?.entries;
        let index = entries
            .iter()
            .position(|entry| *entry == Entry::File(file))
            .context(NoMatchSnafu)?;
        entries.remove(index);

        self.file_mut(file)?.directory = None;
        debug!("Detached file {file} from {directory}");
        Ok(())
    }

    /// Re-homes `file`, keeping the directory's entries and the file's back-reference
    /// in agreement.
    pub fn move_file(&mut self, file: FileId, target: Option<DirectoryId>) -> TreeResult<()> {
        if let Some(target) = target {
            self.directory(target)?;
        }
        if let Some(current) = self.file(file)?.directory {
            self.detach_file(current, file)?;
        }
        if let Some(target) = target {
            self.attach_file(target, file)?;
        }
        Ok(())
    }

    pub fn delete_file(&mut self, id: FileId) -> TreeResult<()> {
        let record = self.file(id)?;
        ensure!(record.versions.is_empty(), NotEmptySnafu);

        if let Some(directory) = record.directory {
            self.detach_file(directory, id)?;
        }
        self.files.remove(&id);
        debug!("Deleted file {id}");
        Ok(())
    }

    /// Whether `version` currently sits in the history of the file it points at.
    fn is_version_attached(&self, version: VersionId) -> TreeResult<bool> {
        let owner = self.version(version)?.file;
        Ok(self
            .files
            .get(&owner)
            .is_some_and(|record| record.versions.contains(&version)))
    }

    pub fn attach_version(&mut self, file: FileId, version: VersionId) -> TreeResult<()> {
        ensure!(
            !self.file(file)?.versions.contains(&version),
            ExistsSnafu
        );
        ensure!(
            !self.is_version_attached(version)?,
            AlreadyAttachedSnafu { id: version }
        );

        self.version_mut(version)?.file = file;
        self.file_mut(file)?.versions.push(version);
        debug!("Attached version {version} to file {file}");
        Ok(())
    }

    pub fn detach_version(&mut self, file: FileId, version: VersionId) -> TreeResult<()> {
        let record = self.file_mut(file)?;
        let is_current = record.current_version == Some(version);
        ensure!(
            !is_current || record.versions.len() <= 1,
            IsCurrentVersionSnafu
        );
        let index = record
            .versions
            .iter()
            .position(|candidate| *candidate == version)
            .context(NoMatchSnafu)?;

        if is_current {
            record.current_version = None;
        }
        record.versions.remove(index);
        debug!("Detached version {version} from file {file}");
        Ok(())
    }

    pub fn set_current_version(&mut self, file: FileId, version: VersionId) -> TreeResult<()> {
        if !self.file(file)?.versions.contains(&version) {
            self.attach_version(file, version)?;
        }
        self.file_mut(file)?.current_version = Some(version);
        Ok(())
    }

    /// Re-points an unattached version at another file.
    pub fn set_version_file(&mut self, version: VersionId, file: FileId) -> TreeResult<()> {
        self.file(file)?;
        if self.version(version)?.file == file {
            return Ok(());
        }
        ensure!(
            !self.is_version_attached(version)?,
            AlreadyAttachedSnafu { id: version }
        );
        self.version_mut(version)?.file = file;
        Ok(())
    }

    pub fn delete_version(&mut self, id: VersionId) -> TreeResult<()> {
        if self.is_version_attached(id)? {
            let owner = self.version(id)?.file;
            self.detach_version(owner, id)?;
        }
        self.versions.remove(&id);
        debug!("Deleted version {id}");
        Ok(())
    }

    pub fn find_directories(
        &self,
        start: DirectoryId,
        pattern: &Regex,
        depth: SearchDepth,
    ) -> TreeResult<Vec<DirectoryId>> {
        trace!("Searching directories under {start} for '{pattern}' ({depth:?})");
        let mut matches = Vec::new();
        self.collect_directories(start, pattern, depth, &mut matches)?;
        ensure!(!matches.is_empty(), NoMatchSnafu);
        Ok(matches)
    }

    fn collect_directories(
        &self,
        id: DirectoryId,
        pattern: &Regex,
        depth: SearchDepth,
        matches: &mut Vec<DirectoryId>,
    ) -> TreeResult<()> {
        let record = self.directory(id)?;
        if pattern.is_match(&record.name) {
            matches.push(id);
        }
        if let Some(next) = depth.descend() {
            for child in record.child_ids() {
                self.collect_directories(child, pattern, next, matches)?;
            }
        }
        Ok(())
    }

    pub fn find_files(
        &self,
        start: DirectoryId,
        pattern: &Regex,
        depth: SearchDepth,
    ) -> TreeResult<Vec<FileId>> {
        trace!("Searching files under {start} for '{pattern}' ({depth:?})");
        let mut matches = Vec::new();
        self.collect_files(start, pattern, depth, &mut matches)?;
        ensure!(!matches.is_empty(), NoMatchSnafu);
        Ok(matches)
    }

    fn collect_files(
        &self,
        id: DirectoryId,
        pattern: &Regex,
        depth: SearchDepth,
        matches: &mut Vec<FileId>,
    ) -> TreeResult<()> {
        let record = self.directory(id)?;
        for file in record.file_ids() {
            if pattern.is_match(&self.file(file)?.name) {
                matches.push(file);
            }
        }
        if let Some(next) = depth.descend() {
            for child in record.child_ids() {
                self.collect_files(child, pattern, next, matches)?;
            }
        }
        Ok(())
    }

    pub fn find_versions(&self, file: FileId, query: &VersionQuery) -> TreeResult<Vec<VersionId>> {
        let mut matches = Vec::new();
        for id in &self.file(file)?.versions {
            let version = self.version(*id)?;
            if query.matches(version.timestamp, &version.creator) {
                matches.push(*id);
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::identity::{Id, UserId};
    use crate::namespace::TreeError;

    fn id<T: From<Id>>(n: u128) -> T {
        T::from(Id::from(Uuid::from_u128(n)))
    }

    /// r -> a -> b, plus a file under a.
    fn sample() -> Arena {
        let mut arena = Arena::default();
        arena.insert_root(id(1), "r".into()).unwrap();
        arena.insert_directory(id(2), id(1), "a".into()).unwrap();
        arena.insert_directory(id(3), id(2), "b".into()).unwrap();
        arena.insert_file(id(10), Some(id(2)), "notes.txt".into()).unwrap();
        arena
    }

    #[test]
    fn entries_keep_insertion_order_across_kinds() {
        let arena = sample();
        let a = arena.directory(id(2)).unwrap();

        assert_eq!(
            a.entries,
            vec![Entry::Directory(id(3)), Entry::File(id(10))]
        );
        assert_eq!(a.child_ids().collect::<Vec<_>>(), vec![id(3)]);
        assert_eq!(a.file_ids().collect::<Vec<_>>(), vec![id(10)]);
    }

    #[test]
    fn ancestry_runs_from_root_to_node() {
        let arena = sample();
        assert_eq!(arena.ancestry(id(3)).unwrap(), vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn failed_construction_leaves_nothing_behind() {
        let mut arena = sample();
        let before = arena.counts();

        let result = arena.insert_directory(id(4), id(99), "orphan".into());

        assert_eq!(
            result,
            Err(TreeError::Deleted {
                id: Id::from(Uuid::from_u128(99))
            })
        );
        assert_eq!(arena.counts(), before);
        assert!(!arena.contains_directory(id(4)));
    }

    #[test]
    fn reused_ids_never_replace_existing_records() {
        let mut arena = sample();
        let creator = User::new(id::<UserId>(50), "u".into());

        let reused = || {
            Err(TreeError::IdReused {
                id: Id::from(Uuid::from_u128(2)),
            })
        };
        assert_eq!(arena.insert_root(id(2), "other".into()), reused());
        assert_eq!(arena.insert_directory(id(2), id(1), "other".into()), reused());
        assert_eq!(arena.insert_file(id(2), Some(id(1)), "other".into()), Ok(()));
        assert_eq!(arena.insert_file(id(2), None, "again".into()), reused());
        arena
            .insert_version(id(2), id(10), SystemTime::UNIX_EPOCH, creator.clone(), true)
            .unwrap();
        assert_eq!(
            arena.insert_version(id(2), id(10), SystemTime::UNIX_EPOCH, creator, true),
            reused()
        );

        let a = arena.directory(id(2)).unwrap();
        assert_eq!(a.name, "a");
        assert_eq!(a.entries, vec![Entry::Directory(id(3)), Entry::File(id(10))]);
        assert_eq!(arena.file(id(2)).unwrap().name, "other");
        assert_eq!(arena.file(id(10)).unwrap().versions, vec![id(2)]);
        assert_eq!(arena.directory(id(1)).unwrap().entries.len(), 2);
    }

    #[test]
    fn detaching_rewrites_the_root_of_the_whole_subtree() {
        let mut arena = sample();

        arena.detach_directory(id(1), id(2)).unwrap();

        assert_eq!(arena.directory(id(2)).unwrap().root, id(2));
        assert_eq!(arena.directory(id(3)).unwrap().root, id(2));
        assert!(arena.directory(id(2)).unwrap().parent.is_none());
    }

    #[test]
    fn detach_version_checks_presence_before_mutating() {
        let mut arena = sample();
        let creator = User::new(id::<UserId>(50), "u".into());
        arena
            .insert_version(id(20), id(10), SystemTime::UNIX_EPOCH, creator, false)
            .unwrap();

        assert_eq!(arena.detach_version(id(10), id(20)), Err(TreeError::NoMatch));
        assert!(arena.file(id(10)).unwrap().versions.is_empty());
    }
}
