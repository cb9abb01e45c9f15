use serde::Deserialize;
use serde::Serialize;
use snav_catalog::ActivityId;
use snav_catalog::CategoryId;
use snav_catalog::CourseId;
use snav_catalog::UserId;
use snav_catalog::Viewer;

/// What kind of page the tree is being built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageContext {
    System,
    CategoryList {
        category: CategoryId,
    },
    Course {
        course: CourseId,
    },
    Module {
        course: CourseId,
        activity: ActivityId,
        #[serde(default)]
        section_number: Option<u32>,
    },
    User {
        course: CourseId,
        user: UserId,
    },
}

impl PageContext {
    /// The course the page sits in, when the context has one.
    #[must_use]
    pub fn course_id(&self) -> Option<CourseId> {
        match self {
            Self::System | Self::CategoryList { .. } => None,
            Self::Course { course }
            | Self::Module { course, .. }
            | Self::User { course, .. } => Some(*course),
        }
    }
}

/// Everything about the current render that used to live in host
/// globals: who is looking, at what, and from which URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub viewer: Viewer,
    pub context: PageContext,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub extend_for_users: Vec<UserId>,
}

impl PageView {
    #[must_use]
    pub fn new(viewer: Viewer, context: PageContext) -> Self {
        Self {
            viewer,
            context,
            page_url: None,
            extend_for_users: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_extend_for_user(mut self, user: UserId) -> Self {
        self.extend_for_users.push(user);
        self
    }
}
