use std::time::SystemTime;

use crate::user::User;

/// How far below the starting directory a search may recurse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDepth {
    /// Visit every descendant.
    #[default]
    Unlimited,
    /// Recurse this many additional levels; `Levels(0)` examines only the start.
    Levels(u32),
}

impl SearchDepth {
    /// The budget left for the next level down, or `None` when recursion stops here.
    pub fn descend(self) -> Option<SearchDepth> {
        match self {
            SearchDepth::Unlimited => Some(SearchDepth::Unlimited),
            SearchDepth::Levels(0) => None,
            SearchDepth::Levels(n) => Some(SearchDepth::Levels(n - 1)),
        }
    }
}

/// Any negative limit means unlimited, following the `-1` convention.
impl From<i32> for SearchDepth {
    fn from(limit: i32) -> Self {
        u32::try_from(limit)
            .map(SearchDepth::Levels)
            .unwrap_or(SearchDepth::Unlimited)
    }
}

/// Filters for [`File::find_versions`](crate::namespace::File::find_versions).
///
/// All filters are ANDed and an unset filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct VersionQuery {
    /// Exclusive lower bound on the timestamp.
    pub after: Option<SystemTime>,
    /// Inclusive upper bound on the timestamp.
    pub before: Option<SystemTime>,
    pub creator: Option<User>,
}

impl VersionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, after: SystemTime) -> Self {
        self.after = Some(after);
        self
    }

    pub fn before(mut self, before: SystemTime) -> Self {
        self.before = Some(before);
        self
    }

    pub fn created_by(mut self, creator: &User) -> Self {
        self.creator = Some(creator.clone());
        self
    }

    pub(crate) fn matches(&self, timestamp: SystemTime, creator: &User) -> bool {
        self.after.is_none_or(|after| timestamp > after)
            && self.before.is_none_or(|before| timestamp <= before)
            && self
                .creator
                .as_ref()
                .is_none_or(|wanted| wanted.id() == creator.id())
    }
}
