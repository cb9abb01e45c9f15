use std::fmt;

use serde::Serialize;
use serde::Serializer;

/// Identifies a node among its siblings.
///
/// Keys are typed so that, say, course 7 and category 7 can sit under the
/// same parent without colliding. Fixed anchors (the root nodes, course
/// essentials) use `Slug` keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Slug(String),
    Category(i64),
    Course(i64),
    Section(i64),
    Activity(i64),
    User(i64),
}

impl NodeKey {
    pub fn slug(value: impl Into<String>) -> Self {
        Self::Slug(value.into())
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug(slug) => f.write_str(slug),
            Self::Category(id) => write!(f, "category:{id}"),
            Self::Course(id) => write!(f, "course:{id}"),
            Self::Section(id) => write!(f, "section:{id}"),
            Self::Activity(id) => write!(f, "activity:{id}"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

impl Serialize for NodeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
