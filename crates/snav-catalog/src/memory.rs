use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use crate::catalog::Catalog;
use crate::catalog::CatalogError;
use crate::entities::Activity;
use crate::entities::Category;
use crate::entities::Course;
use crate::entities::Section;
use crate::entities::User;
use crate::entities::Viewer;
use crate::ids::ActivityId;
use crate::ids::CategoryId;
use crate::ids::CourseId;
use crate::ids::SectionId;
use crate::ids::UserId;

/// Catalog held entirely in memory.
///
/// Built up with the `with_*` methods; backs CLI fixtures and tests.
/// Access rule: admins always pass; an explicit override wins next;
/// otherwise a course must be visible and the viewer enrolled.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    site: Option<CourseId>,
    categories: FxHashMap<CategoryId, Category>,
    courses: FxHashMap<CourseId, Course>,
    sections: FxHashMap<SectionId, Section>,
    activities: FxHashMap<ActivityId, Activity>,
    users: FxHashMap<UserId, User>,
    enrolments: FxHashSet<(CourseId, UserId)>,
    access_overrides: FxHashMap<(CourseId, UserId), bool>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_site_course(mut self, course: Course) -> Self {
        self.site = Some(course.id);
        self.courses.insert(course.id, course);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category.id, category);
        self
    }

    #[must_use]
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.insert(course.id, course);
        self
    }

    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.insert(section.id, section);
        self
    }

    #[must_use]
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.insert(activity.id, activity);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    #[must_use]
    pub fn with_enrolment(mut self, course: CourseId, user: UserId) -> Self {
        self.enrolments.insert((course, user));
        self
    }

    /// Force the access decision for one course/user pair.
    #[must_use]
    pub fn with_access_override(mut self, course: CourseId, user: UserId, allowed: bool) -> Self {
        self.access_overrides.insert((course, user), allowed);
        self
    }

    fn sorted_categories(mut found: Vec<Category>) -> Vec<Category> {
        found.sort_by_key(|category| (category.sort_order, category.id));
        found
    }
}

impl Catalog for InMemoryCatalog {
    fn site_course(&self) -> Result<Course, CatalogError> {
        let id = self.site.ok_or(CatalogError::MissingSite)?;
        self.courses
            .get(&id)
            .cloned()
            .ok_or(CatalogError::MissingSite)
    }

    fn category(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        Ok(self.categories.get(&id).cloned())
    }

    fn categories_by_parent(&self, parent: CategoryId) -> Result<Vec<Category>, CatalogError> {
        let found = self
            .categories
            .values()
            .filter(|category| category.parent == parent)
            .cloned()
            .collect();
        Ok(Self::sorted_categories(found))
    }

    fn categories_in_chain(
        &self,
        chain: &[CategoryId],
        include_base: bool,
    ) -> Result<Vec<Category>, CatalogError> {
        let found = self
            .categories
            .values()
            .filter(|category| {
                chain.contains(&category.id)
                    || chain.contains(&category.parent)
                    || (include_base && category.is_top_level())
            })
            .cloned()
            .collect();
        Ok(Self::sorted_categories(found))
    }

    fn course(&self, id: CourseId) -> Result<Option<Course>, CatalogError> {
        Ok(self.courses.get(&id).cloned())
    }

    fn courses_by_category(
        &self,
        category: CategoryId,
        visible_only: bool,
    ) -> Result<Vec<Course>, CatalogError> {
        let mut found: Vec<Course> = self
            .courses
            .values()
            .filter(|course| course.category == category)
            .filter(|course| !visible_only || course.visible)
            .filter(|course| Some(course.id) != self.site)
            .cloned()
            .collect();
        found.sort_by_key(|course| (course.sort_order, course.id));
        Ok(found)
    }

    fn enrolled_courses(&self, user: UserId, limit: usize) -> Result<Vec<Course>, CatalogError> {
        let mut found: Vec<Course> = self
            .courses
            .values()
            .filter(|course| self.enrolments.contains(&(course.id, user)))
            .filter(|course| Some(course.id) != self.site)
            .cloned()
            .collect();
        found.sort_by_key(|course| (!course.visible, course.sort_order, course.id));
        if limit > 0 {
            found.truncate(limit);
        }
        Ok(found)
    }

    fn is_enrolled(&self, course: CourseId, user: UserId) -> Result<bool, CatalogError> {
        Ok(self.enrolments.contains(&(course, user)))
    }

    fn can_access_course(&self, course: &Course, viewer: &Viewer) -> Result<bool, CatalogError> {
        if viewer.is_admin {
            return Ok(true);
        }
        let Some(user) = viewer.id else {
            return Ok(false);
        };
        if let Some(allowed) = self.access_overrides.get(&(course.id, user)) {
            return Ok(*allowed);
        }
        Ok(course.visible && self.enrolments.contains(&(course.id, user)))
    }

    fn sections(&self, course: CourseId) -> Result<Vec<Section>, CatalogError> {
        let mut found: Vec<Section> = self
            .sections
            .values()
            .filter(|section| section.course == course)
            .cloned()
            .collect();
        found.sort_by_key(|section| section.number);
        Ok(found)
    }

    fn activities(&self, course: CourseId) -> Result<Vec<Activity>, CatalogError> {
        let mut found: Vec<Activity> = self
            .activities
            .values()
            .filter(|activity| activity.course == course)
            .cloned()
            .collect();
        found.sort_by_key(|activity| (activity.section, activity.id));
        Ok(found)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, CatalogError> {
        Ok(self.users.get(&id).cloned())
    }
}
