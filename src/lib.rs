//! Hierarchical in-memory namespace of directories and versioned files.
//!
//! A [`Namespace`](namespace::Namespace) owns every directory, file and version
//! created through it. Each node records an owner, each version a creator, and the
//! tree can be renamed, moved, pruned and searched by name.

pub mod identity;
pub mod namespace;
pub mod user;

/// The handle types and capability traits needed for everyday use.
pub mod prelude {
    pub use crate::identity::{DirectoryId, FileId, IdGenerator, UserId, VersionId};
    pub use crate::namespace::{
        Deletable, Directory, File, Located, Named, Namespace, Node, Owned, SearchDepth,
        TreeError, TreeResult, Version, VersionQuery, path,
    };
    pub use crate::user::User;
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::{Duration, SystemTime};

    use regex::Regex;

    use crate::identity::SequentialIds;
    use crate::prelude::*;

    #[test]
    fn end_to_end_tree_with_a_versioned_file() {
        let namespace = Namespace::with_id_generator(SequentialIds::default());
        let u1 = namespace.create_user("U1").unwrap();
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);

        let root = namespace.create_root("R").unwrap();
        let a = root.create_directory("A").unwrap();
        let f1 = a.create_file("f1").unwrap();
        let v1 = f1.new_version(t1, &u1).unwrap();
        f1.set_current_version(&v1).unwrap();

        assert_eq!(path(&a).unwrap(), "/R/A");
        assert_eq!(f1.current_version().unwrap(), Some(v1.clone()));
        assert_eq!(
            f1.find_versions(&VersionQuery::new().created_by(&u1), -1)
                .unwrap(),
            vec![v1]
        );
    }

    #[test]
    fn searches_see_a_consistent_tree_while_writers_run() {
        let namespace = Namespace::new();
        let root = namespace.create_root("root").unwrap();
        let pattern = Regex::new("^dir").unwrap();

        let writer = {
            let root = root.clone();
            thread::spawn(move || {
                for n in 0..200 {
                    let dir = root.create_directory(format!("dir{n}")).unwrap();
                    dir.create_directory(format!("dir{n}-child")).unwrap();
                }
            })
        };

        for _ in 0..200 {
            // A child is never visible without its parent.
            let found = match root.find_directories(&pattern, -1) {
                Ok(found) => found,
                Err(TreeError::NoMatch) => continue,
                Err(err) => panic!("unexpected search failure: {err}"),
            };
            for dir in found {
                if let Some(parent) = dir.parent().unwrap() {
                    assert!(parent == root || parent.parent().unwrap() == Some(root.clone()));
                }
            }
        }

        writer.join().unwrap();
        assert_eq!(root.children().unwrap().len(), 200);
    }
}
