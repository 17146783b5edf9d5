use derive_more::{Display, From, Into};
use uuid::Uuid;

/// Globally unique, immutable token shared by all entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct Id(Uuid);

impl Id {
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct DirectoryId(Id);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct FileId(Id);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct VersionId(Id);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct UserId(Id);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_ids_display_like_the_underlying_uuid() {
        let uuid = Uuid::from_u128(0x2a);
        let id = Id::from(uuid);
        let dir_id = DirectoryId::from(id);

        assert_eq!(dir_id.to_string(), uuid.to_string());
        assert_eq!(Id::from(dir_id), id);
        assert_eq!(id.as_uuid(), &uuid);
    }
}
