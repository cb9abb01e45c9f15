use serde::Deserialize;
use serde::Serialize;

use crate::ids::ActivityId;
use crate::ids::CategoryId;
use crate::ids::CourseId;
use crate::ids::SectionId;
use crate::ids::UserId;

/// A course category as stored in the catalog.
///
/// `path` is the slash-delimited ancestor chain ending in the category's
/// own id, e.g. `/3/7` for category 7 under category 3. The chain must
/// agree with the `parent` pointers; the loader treats disagreement as
/// data corruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default = "CategoryId::top")]
    pub parent: CategoryId,
    pub path: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub course_count: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Category {
    /// The ancestor chain from the top down, the category itself last.
    #[must_use]
    pub fn ancestry(&self) -> Vec<CategoryId> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .filter_map(|segment| segment.parse::<i64>().ok())
            .map(CategoryId::new)
            .collect()
    }

    #[must_use]
    pub fn is_top_level(&self) -> bool {
        self.parent == CategoryId::TOP
    }

    /// A category is a leaf of its chain when the chain's last entry is
    /// the category itself and it sits below the top level.
    #[must_use]
    pub fn is_chain_leaf(&self) -> bool {
        let ancestry = self.ancestry();
        ancestry.len() > 1 && ancestry.last() == Some(&self.id)
    }
}

impl CategoryId {
    fn top() -> Self {
        Self::TOP
    }
}

/// How a course lays out its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseFormat {
    Topics,
    Weeks,
    Social,
    SingleActivity,
    Site,
}

impl CourseFormat {
    /// Whether navigation should descend into section nodes for this
    /// format.
    #[must_use]
    pub fn displays_sections(self) -> bool {
        matches!(self, Self::Topics | Self::Weeks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub category: CategoryId,
    pub full_name: String,
    pub short_name: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default = "CourseFormat::topics")]
    pub format: CourseFormat,
}

impl Course {
    #[must_use]
    pub fn url(&self) -> String {
        format!("/course/view.php?id={}", self.id)
    }
}

impl CourseFormat {
    fn topics() -> Self {
        Self::Topics
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub course: CourseId,
    pub number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Section {
    /// Display label: the explicit name, or "Topic N".
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Topic {}", self.number))
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("/course/view.php?id={}#section-{}", self.course, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub course: CourseId,
    pub section: SectionId,
    pub name: String,
    pub module: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Activity {
    #[must_use]
    pub fn url(&self) -> String {
        format!("/mod/{}/view.php?id={}", self.module, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
}

impl User {
    #[must_use]
    pub fn url(&self) -> String {
        format!("/user/view.php?id={}", self.id)
    }
}

/// The identity a tree is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: Option<UserId>,
    #[serde(default)]
    pub is_admin: bool,
}

impl Viewer {
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            id: None,
            is_admin: false,
        }
    }

    #[must_use]
    pub fn authenticated(id: UserId) -> Self {
        Self {
            id: Some(id),
            is_admin: false,
        }
    }

    #[must_use]
    pub fn admin(id: UserId) -> Self {
        Self {
            id: Some(id),
            is_admin: true,
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.id.is_some()
    }
}

fn default_visible() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::Category;
    use super::CourseFormat;
    use crate::ids::CategoryId;

    fn category(id: i64, parent: i64, path: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: format!("cat {id}"),
            parent: CategoryId::new(parent),
            path: path.to_string(),
            depth: 0,
            sort_order: 0,
            course_count: 0,
            visible: true,
        }
    }

    #[test]
    fn ancestry_parses_the_chain_in_order() {
        let cat = category(7, 3, "/3/7");
        assert_eq!(
            cat.ancestry(),
            vec![CategoryId::new(3), CategoryId::new(7)]
        );
    }

    #[test]
    fn chain_leaf_requires_depth_and_self_tail() {
        assert!(category(7, 3, "/3/7").is_chain_leaf());
        assert!(!category(3, 0, "/3").is_chain_leaf());
        assert!(!category(3, 0, "/3/7").is_chain_leaf());
    }

    #[test]
    fn only_sectioned_formats_display_sections() {
        assert!(CourseFormat::Topics.displays_sections());
        assert!(CourseFormat::Weeks.displays_sections());
        assert!(!CourseFormat::Social.displays_sections());
        assert!(!CourseFormat::SingleActivity.displays_sections());
        assert!(!CourseFormat::Site.displays_sections());
    }
}
