use std::{
    borrow::Cow,
    io::Cursor,
    path::Path,
    time::{Duration, SystemTime},
};

use compio::{BufResult, fs::File, io::AsyncReadExt, io::BufReader};
use dirtree::{
    namespace::{Directory, Namespace, Owned, TreeResult},
    user::User,
};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

/// The tree built when no layout file is given.
pub const SAMPLE_LAYOUT: &str = r#"
root: My Root Directory
entries:
  Fruit:
    Green:
      Grapes:
        Sour: {}
  Grains:
    Wheat: {}
  Dessert:
    Cake: {}
"#;

const ANONYMOUS_CREATOR: &str = "anonymous";

/// Upper bound on the versions a layout may request for a single file.
const MAX_VERSIONS_PER_FILE: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEntry {
    Directory {
        name: String,
        entries: Vec<LayoutEntry>,
    },
    File {
        name: String,
        versions: u32,
    },
}

/// A tree description loaded from YAML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: String,
    pub owner: Option<String>,
    pub entries: Vec<LayoutEntry>,
}

impl Layout {
    pub fn sample() -> Result<Self, LayoutError> {
        SAMPLE_LAYOUT.try_into()
    }

    pub async fn read(path: &Path) -> Result<Self, LayoutError> {
        debug!("Opening layout file: {}", path.display());
        let file = File::open(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;

        let mut reader = BufReader::new(Cursor::new(file));
        let BufResult(read, contents) = reader.read_to_string(String::new()).await;
        let n = read.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Read layout file: {n} bytes");
        contents.as_str().try_into()
    }

    /// Creates the described tree in `namespace` and returns its root.
    ///
    /// Every file gets its versions in creation order, one second apart, and the newest
    /// becomes current. Versions are credited to the owner, or to an anonymous user when
    /// the layout names none.
    pub fn build(&self, namespace: &Namespace) -> TreeResult<Directory> {
        let owner = self
            .owner
            .as_deref()
            .map(|name| namespace.create_user(name))
            .transpose()?;
        let creator = match &owner {
            Some(owner) => owner.clone(),
            None => namespace.create_user(ANONYMOUS_CREATOR)?,
        };

        let root = namespace.create_root(self.root.as_str())?;
        root.set_owner(owner.clone())?;
        let builder = Builder {
            owner,
            creator,
            epoch: SystemTime::now(),
        };
        builder.populate(&root, &self.entries)?;
        debug!("Built layout rooted at '{}'", self.root);
        Ok(root)
    }

    fn parse_entries(mapping: &LinkedHashMap<Yaml, Yaml>) -> Vec<LayoutEntry> {
        mapping
            .iter()
            .filter_map(|(key, value)| {
                let Yaml::Value(Scalar::String(name)) = key else {
                    debug!("Skipping entry with non-string name: {:?}", key);
                    return None;
                };
                Self::parse_entry(name, value)
            })
            .collect()
    }

    fn parse_entry(name: &str, value: &Yaml) -> Option<LayoutEntry> {
        match value {
            Yaml::Mapping(children) => Some(LayoutEntry::Directory {
                name: name.to_owned(),
                entries: Self::parse_entries(children),
            }),
            Yaml::Value(Scalar::Null) => Some(LayoutEntry::File {
                name: name.to_owned(),
                versions: 0,
            }),
            Yaml::Value(Scalar::Integer(count)) => match u32::try_from(*count) {
                Ok(versions) if versions <= MAX_VERSIONS_PER_FILE => Some(LayoutEntry::File {
                    name: name.to_owned(),
                    versions,
                }),
                _ => {
                    debug!("Skipping file '{name}' with invalid version count {count}");
                    None
                }
            },
            other => {
                debug!("Skipping entry '{name}': unsupported value {:?}", other);
                None
            }
        }
    }
}

struct Builder {
    owner: Option<User>,
    creator: User,
    epoch: SystemTime,
}

impl Builder {
    fn populate(&self, directory: &Directory, entries: &[LayoutEntry]) -> TreeResult<()> {
        for entry in entries {
            match entry {
                LayoutEntry::Directory { name, entries } => {
                    let child = directory.create_directory(name.as_str())?;
                    child.set_owner(self.owner.clone())?;
                    self.populate(&child, entries)?;
                }
                LayoutEntry::File { name, versions } => {
                    let file = directory.create_file(name.as_str())?;
                    file.set_owner(self.owner.clone())?;
                    let mut latest = None;
                    for n in 0..*versions {
                        let timestamp = self.epoch + Duration::from_secs(u64::from(n));
                        latest = Some(file.create_version(timestamp, &self.creator)?);
                    }
                    if let Some(latest) = latest {
                        file.set_current_version(&latest)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Layout {
    type Error = LayoutError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| LayoutError::ParseError { source: e })?;
        let document = documents.first().ok_or(LayoutError::MalformedLayout)?;
        let top_level = document.as_mapping().ok_or(LayoutError::TopLevelNotMap)?;

        let root = match top_level.get(&key("root")) {
            Some(Yaml::Value(Scalar::String(root))) if !root.is_empty() => root.to_string(),
            _ => return Err(LayoutError::MissingRoot),
        };
        let owner = match top_level.get(&key("owner")) {
            Some(Yaml::Value(Scalar::String(owner))) => Some(owner.to_string()),
            _ => None,
        };
        let entries = match top_level.get(&key("entries")) {
            None | Some(Yaml::Value(Scalar::Null)) => Vec::new(),
            Some(Yaml::Mapping(entries)) => Self::parse_entries(entries),
            Some(_) => return Err(LayoutError::EntriesNotMap),
        };

        Ok(Layout {
            root,
            owner,
            entries,
        })
    }
}

fn key(name: &str) -> Yaml<'_> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

#[derive(Debug, Snafu)]
pub enum LayoutError {
    #[snafu(display("Failed to read the layout file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the layout file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted layout file"))]
    MalformedLayout,
    #[snafu(display("Top level of the layout should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Layout needs a non-empty 'root' name"))]
    MissingRoot,
    #[snafu(display("Entries section should be a map"))]
    EntriesNotMap,
}
