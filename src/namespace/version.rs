use std::fmt;
use std::time::SystemTime;

use crate::identity::VersionId;
use crate::namespace::{Deletable, File, Namespace, TreeResult};
use crate::user::User;

/// Handle to a version record: metadata only, no content.
///
/// The setters exist to correct a misrecorded version; a version is treated as
/// immutable once it sits in a file's history.
#[derive(Clone)]
pub struct Version {
    pub(crate) namespace: Namespace,
    pub(crate) id: VersionId,
}

impl Version {
    pub(crate) fn from_parts(namespace: Namespace, id: VersionId) -> Self {
        Self { namespace, id }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    /// The file this version belongs to, whether or not it is in that file's history.
    pub fn file(&self) -> TreeResult<File> {
        let file = self.namespace.read().version(self.id)?.file;
        Ok(File::from_parts(self.namespace.clone(), file))
    }

    /// Only allowed while the version is not part of any file's history.
    pub fn set_file(&self, file: &File) -> TreeResult<()> {
        self.namespace.ensure_same(&file.namespace, file.id)?;
        self.namespace.write().set_version_file(self.id, file.id)
    }

    pub fn timestamp(&self) -> TreeResult<SystemTime> {
        Ok(self.namespace.read().version(self.id)?.timestamp)
    }

    pub fn set_timestamp(&self, timestamp: SystemTime) -> TreeResult<()> {
        self.namespace.write().version_mut(self.id)?.timestamp = timestamp;
        Ok(())
    }

    pub fn creator(&self) -> TreeResult<User> {
        Ok(self.namespace.read().version(self.id)?.creator.clone())
    }

    pub fn set_creator(&self, creator: &User) -> TreeResult<()> {
        self.namespace.write().version_mut(self.id)?.creator = creator.clone();
        Ok(())
    }
}

impl Deletable for Version {
    /// Detaches from the owning file first, so the current-version guard still applies.
    fn delete(&self) -> TreeResult<()> {
        self.namespace.write().delete_version(self.id)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Version {}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Version").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::namespace::TreeError;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn file_with_author() -> (File, User) {
        let namespace = Namespace::new();
        let file = namespace
            .create_root("R")
            .and_then(|root| root.create_file("f"))
            .unwrap();
        let author = namespace.create_user("author").unwrap();
        (file, author)
    }

    #[test]
    fn delete_respects_the_current_version_guard() {
        let (file, author) = file_with_author();
        let v1 = file.create_version(at(1), &author).unwrap();
        let v2 = file.create_version(at(2), &author).unwrap();
        file.set_current_version(&v1).unwrap();

        assert_eq!(v1.delete(), Err(TreeError::IsCurrentVersion));

        v2.delete().unwrap();
        v1.delete().unwrap();
        assert_eq!(file.current_version().unwrap(), None);
        assert!(file.versions().unwrap().is_empty());
        assert!(matches!(v1.timestamp(), Err(TreeError::Deleted { .. })));
    }

    #[test]
    fn unattached_versions_can_be_deleted() {
        let (file, author) = file_with_author();
        let draft = file.new_version(at(1), &author).unwrap();

        draft.delete().unwrap();
        assert!(file.namespace().version(draft.id()).is_none());
    }

    #[test]
    fn corrections_update_metadata() {
        let (file, author) = file_with_author();
        let editor = file.namespace().create_user("editor").unwrap();
        let version = file.create_version(at(1), &author).unwrap();

        version.set_timestamp(at(5)).unwrap();
        version.set_creator(&editor).unwrap();

        assert_eq!(version.timestamp().unwrap(), at(5));
        assert_eq!(version.creator().unwrap(), editor);
        assert_eq!(version.file().unwrap(), file);
    }

    #[test]
    fn set_file_is_refused_while_attached() {
        let (file, author) = file_with_author();
        let other = file.namespace().create_file("other").unwrap();
        let version = file.create_version(at(1), &author).unwrap();
        let draft = file.new_version(at(2), &author).unwrap();

        assert!(matches!(
            version.set_file(&other),
            Err(TreeError::AlreadyAttached { .. })
        ));

        draft.set_file(&other).unwrap();
        assert_eq!(draft.file().unwrap(), other);
        other.set_current_version(&draft).unwrap();
        assert_eq!(other.versions().unwrap(), vec![draft]);
    }
}
