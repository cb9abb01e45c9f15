use thiserror::Error;

use crate::entities::Activity;
use crate::entities::Category;
use crate::entities::Course;
use crate::entities::Section;
use crate::entities::User;
use crate::entities::Viewer;
use crate::ids::CategoryId;
use crate::ids::CourseId;
use crate::ids::UserId;

/// Failure of the storage backend itself.
///
/// "Record not found" is not an error here; queries return `Option` or an
/// empty list for that. An `Unavailable` backend aborts whatever build is
/// in flight.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog backend unavailable: {0}")]
    Unavailable(String),
    #[error("no site course registered")]
    MissingSite,
}

/// Read-only queries over categories, courses and enrolment.
///
/// Implementations must honor the ordering contracts spelled out per
/// method; the navigation loaders rely on them instead of re-sorting.
pub trait Catalog {
    /// The front-page course. Every deployment has exactly one.
    fn site_course(&self) -> Result<Course, CatalogError>;

    fn category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError>;

    /// Direct children of `parent`, ordered by `(sort_order, id)`.
    fn categories_by_parent(&self, parent: CategoryId) -> Result<Vec<Category>, CatalogError>;

    /// Categories whose id is in `chain` or whose parent is in `chain`,
    /// plus the top-level categories when `include_base` is set, ordered
    /// by `(sort_order, id)`.
    fn categories_in_chain(
        &self,
        chain: &[CategoryId],
        include_base: bool,
    ) -> Result<Vec<Category>, CatalogError>;

    fn course(&self, id: CourseId) -> Result<Option<Course>, CatalogError>;

    /// Courses in `category`, ordered by `(sort_order, id)`; hidden
    /// courses are filtered when `visible_only` is set.
    fn courses_by_category(
        &self,
        category: CategoryId,
        visible_only: bool,
    ) -> Result<Vec<Course>, CatalogError>;

    /// Courses `user` is enrolled in, visible ones first, then by
    /// `sort_order`. `limit == 0` means unlimited.
    fn enrolled_courses(&self, user: UserId, limit: usize) -> Result<Vec<Course>, CatalogError>;

    fn is_enrolled(&self, course: CourseId, user: UserId) -> Result<bool, CatalogError>;

    /// Whether `viewer` may enter `course` and see its content.
    fn can_access_course(&self, course: &Course, viewer: &Viewer) -> Result<bool, CatalogError>;

    /// Sections of `course`, ordered by section number.
    fn sections(&self, course: CourseId) -> Result<Vec<Section>, CatalogError>;

    /// Activities of `course`, ordered by `(section, id)`.
    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, CatalogError>;

    fn user(&self, id: UserId) -> Result<Option<User>, CatalogError>;
}
