use crate::namespace::{Deletable, Directory, File, Named, Owned, TreeResult};
use crate::user::User;

/// Either kind of directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(File),
}

impl Node {
    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(directory) => Some(directory),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }
}

impl From<Directory> for Node {
    fn from(directory: Directory) -> Self {
        Node::Directory(directory)
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl Named for Node {
    fn name(&self) -> TreeResult<String> {
        match self {
            Node::Directory(directory) => directory.name(),
            Node::File(file) => file.name(),
        }
    }

    fn rename(&self, name: &str) -> TreeResult<()> {
        match self {
            Node::Directory(directory) => directory.rename(name),
            Node::File(file) => file.rename(name),
        }
    }
}

impl Owned for Node {
    fn owner(&self) -> TreeResult<Option<User>> {
        match self {
            Node::Directory(directory) => directory.owner(),
            Node::File(file) => file.owner(),
        }
    }

    fn set_owner(&self, owner: Option<User>) -> TreeResult<()> {
        match self {
            Node::Directory(directory) => directory.set_owner(owner),
            Node::File(file) => file.set_owner(owner),
        }
    }
}

impl Deletable for Node {
    fn delete(&self) -> TreeResult<()> {
        match self {
            Node::Directory(directory) => directory.delete(),
            Node::File(file) => file.delete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Namespace;

    #[test]
    fn capabilities_dispatch_to_the_wrapped_entry() {
        let namespace = Namespace::new();
        let root = namespace.create_root("R").unwrap();
        let owner = namespace.create_user("owner").unwrap();
        root.create_directory("docs").unwrap();
        root.create_file("readme").unwrap();

        let entries = root.entries().unwrap();
        for entry in &entries {
            entry.set_owner(Some(owner.clone())).unwrap();
            entry.rename(&format!("{}-old", entry.name().unwrap())).unwrap();
        }

        assert!(entries[0].is_directory());
        assert_eq!(entries[0].as_directory().unwrap().name().unwrap(), "docs-old");
        assert_eq!(entries[1].as_file().unwrap().name().unwrap(), "readme-old");
        assert_eq!(entries[1].owner().unwrap(), Some(owner));

        for entry in &entries {
            entry.delete().unwrap();
        }
        assert!(root.entries().unwrap().is_empty());
    }
}
