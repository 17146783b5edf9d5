//! Human-readable paths, derived on every call by walking the ancestry.
//!
//! Nothing is cached, so a rename anywhere above a node shows up the next time its
//! path is asked for.

use crate::identity::DirectoryId;
use crate::namespace::arena::Arena;
use crate::namespace::{Directory, File, Node, TreeResult, Version};

pub const SEPARATOR: char = '/';

/// Anything that can list the names leading to it, root first.
pub trait Located {
    fn segments(&self) -> TreeResult<Vec<String>>;
}

/// Joins the segments of `node`, each preceded by [`SEPARATOR`]: `/root/child`.
pub fn path<N: Located + ?Sized>(node: &N) -> TreeResult<String> {
    Ok(node
        .segments()?
        .iter()
        .fold(String::new(), |mut path, segment| {
            path.push(SEPARATOR);
            path.push_str(segment);
            path
        }))
}

fn directory_segments(arena: &Arena, id: DirectoryId) -> TreeResult<Vec<String>> {
    arena
        .ancestry(id)?
        .into_iter()
        .map(|ancestor| Ok(arena.directory(ancestor)?.name.clone()))
        .collect()
}

fn file_segments(arena: &Arena, file: &File) -> TreeResult<Vec<String>> {
    let record = arena.file(file.id)?;
    let mut segments = match record.directory {
        Some(directory) => directory_segments(arena, directory)?,
        None => Vec::new(),
    };
    segments.push(record.name.clone());
    Ok(segments)
}

impl Located for Directory {
    fn segments(&self) -> TreeResult<Vec<String>> {
        directory_segments(&self.namespace.read(), self.id)
    }
}

impl Located for File {
    fn segments(&self) -> TreeResult<Vec<String>> {
        file_segments(&self.namespace.read(), self)
    }
}

/// A version is addressed as `<file name>@<version id>` in its last segment.
impl Located for Version {
    fn segments(&self) -> TreeResult<Vec<String>> {
        let arena = self.namespace.read();
        let file = File::from_parts(self.namespace.clone(), arena.version(self.id)?.file);
        let mut segments = file_segments(&arena, &file)?;
        if let Some(last) = segments.last_mut() {
            last.push('@');
            last.push_str(&self.id.to_string());
        }
        Ok(segments)
    }
}

impl Located for Node {
    fn segments(&self) -> TreeResult<Vec<String>> {
        match self {
            Node::Directory(directory) => directory.segments(),
            Node::File(file) => file.segments(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::identity::SequentialIds;
    use crate::namespace::{Named, Namespace};

    #[test]
    fn paths_follow_the_ancestry() {
        let namespace = Namespace::new();
        let root = namespace.create_root("R").unwrap();
        let a = root.create_directory("A").unwrap();
        let f = a.create_file("f1").unwrap();

        assert_eq!(path(&root).unwrap(), "/R");
        assert_eq!(path(&a).unwrap(), "/R/A");
        assert_eq!(path(&f).unwrap(), "/R/A/f1");
        assert_eq!(path(&Node::from(f)).unwrap(), "/R/A/f1");
    }

    #[test]
    fn renaming_an_ancestor_changes_descendant_paths() {
        let namespace = Namespace::new();
        let root = namespace.create_root("R").unwrap();
        let leaf = root
            .create_directory("A")
            .and_then(|a| a.create_directory("B"))
            .unwrap();

        root.rename("Renamed").unwrap();

        assert_eq!(path(&leaf).unwrap(), "/Renamed/A/B");
    }

    #[test]
    fn loose_files_have_a_single_segment() {
        let namespace = Namespace::new();
        let loose = namespace.create_file("scratch").unwrap();
        assert_eq!(path(&loose).unwrap(), "/scratch");
    }

    #[test]
    fn version_paths_name_the_version() {
        let namespace = Namespace::with_id_generator(SequentialIds::default());
        let author = namespace.create_user("author").unwrap();
        let file = namespace
            .create_root("R")
            .and_then(|root| root.create_file("f1"))
            .unwrap();
        let version = file.create_version(SystemTime::now(), &author).unwrap();

        assert_eq!(
            path(&version).unwrap(),
            format!("/R/f1@{}", version.id())
        );
    }
}
