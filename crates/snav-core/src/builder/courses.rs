//! Course, section and activity loading, and the per-context dispatch.

use snav_catalog::Activity;
use snav_catalog::ActivityId;
use snav_catalog::Catalog;
use snav_catalog::Course;
use snav_catalog::CourseId;
use snav_conf::CourseNavView;
use snav_model::NavigationNode;
use snav_model::NodeId;
use snav_model::NodeKey;
use snav_model::NodeType;

use super::NavigationBuilder;
use super::RootNodes;
use crate::context::PageContext;
use crate::error::BuildError;

impl<C: Catalog> NavigationBuilder<'_, C> {
    pub(crate) fn add_course_under(
        &mut self,
        parent: NodeId,
        course: &Course,
    ) -> Result<NodeId, BuildError> {
        let key = NodeKey::Course(course.id.get());
        if let Some(existing) = self.tree.child_by_key(parent, &key) {
            return Ok(existing);
        }
        let node = NavigationNode::new(key, course.full_name.clone(), NodeType::Course)
            .with_short_text(course.short_name.clone())
            .with_url(course.url())
            .with_branch_id(course.id.get())
            .expandable(true);
        Ok(self.tree.attach(parent, node)?)
    }

    /// Place `course` in the tree, creating its node if needed.
    ///
    /// Enrolled courses live under My courses in flat view; otherwise a
    /// course sits inside its category when that branch is loaded, with
    /// the Courses root as the last resort.
    pub(crate) fn load_course(
        &mut self,
        roots: &RootNodes,
        course: &Course,
    ) -> Result<NodeId, BuildError> {
        if let Some(existing) = self
            .tree
            .find(&NodeKey::Course(course.id.get()), NodeType::Course)
        {
            return Ok(existing);
        }
        let flat = self.settings.course_nav_view == CourseNavView::Courses;
        let mine = self.my_course_ids.contains(&course.id);
        let parent = if flat && mine {
            roots.my_courses
        } else if let Some(&category_node) = self.added_categories.get(&course.category) {
            category_node
        } else if mine {
            roots.my_courses
        } else {
            roots.courses
        };
        self.add_course_under(parent, course)
    }

    /// The front page always loads: essentials plus its activities,
    /// attached straight to the site node without section nodes.
    pub(crate) fn load_front_page(
        &mut self,
        roots: &RootNodes,
        site: &Course,
    ) -> Result<(), BuildError> {
        let key = NodeKey::slug("participants");
        if self.tree.child_by_key(roots.site, &key).is_none() {
            let node = NavigationNode::new(key, "Participants", NodeType::Setting)
                .with_url(format!("/user/index.php?id={}", site.id));
            self.tree.attach(roots.site, node)?;
        }

        let admin = self.view.viewer.is_admin;
        let sections = self.catalog.sections(site.id)?;
        let activities = self.catalog.activities(site.id)?;
        for activity in &activities {
            let section_visible = sections
                .iter()
                .any(|section| section.id == activity.section && section.visible);
            if section_visible && (activity.visible || admin) {
                self.add_activity_under(roots.site, activity)?;
            }
        }
        Ok(())
    }

    /// Load what the page's own context asks for on top of the general
    /// tree.
    pub(crate) fn load_page_context(
        &mut self,
        roots: &RootNodes,
        site: &Course,
    ) -> Result<(), BuildError> {
        match self.view.context.clone() {
            PageContext::System => {
                self.load_categories(roots, None, true)?;
            }
            PageContext::CategoryList { category } => {
                self.load_categories(roots, Some(category), true)?;
            }
            PageContext::Course { course } if course != site.id => {
                self.load_course_context(roots, course)?;
            }
            PageContext::Module {
                course,
                activity,
                section_number,
            } if course != site.id => {
                self.load_module_context(roots, course, activity, section_number)?;
            }
            PageContext::Module { activity, .. } => {
                // A front-page activity: its node is already under the
                // site branch, it only needs the active mark.
                let key = NodeKey::Activity(activity.get());
                if let Some(node) = self.tree.child_by_key(roots.site, &key) {
                    if self.tree.active_node().is_none() {
                        self.tree.mark_active(node);
                    }
                }
            }
            PageContext::User { course, .. } if course != site.id => {
                self.load_user_context(roots, course)?;
            }
            PageContext::Course { .. } | PageContext::User { .. } => {
                // Site-course page; the front page is already loaded.
            }
        }
        Ok(())
    }

    fn load_course_context(
        &mut self,
        roots: &RootNodes,
        course_id: CourseId,
    ) -> Result<(), BuildError> {
        let Some((course, node)) = self.resolve_page_course(roots, course_id)? else {
            return Ok(());
        };
        self.add_course_essentials(node, &course)?;
        if course.format.displays_sections() {
            self.load_course_sections(node, &course, None)?;
        }
        self.ensure_active_within(node);
        Ok(())
    }

    fn load_module_context(
        &mut self,
        roots: &RootNodes,
        course_id: CourseId,
        activity_id: ActivityId,
        section_number: Option<u32>,
    ) -> Result<(), BuildError> {
        let Some((course, node)) = self.resolve_page_course(roots, course_id)? else {
            return Ok(());
        };
        self.add_course_essentials(node, &course)?;

        let activities = self.catalog.activities(course.id)?;
        let Some(activity) = activities
            .iter()
            .find(|activity| activity.id == activity_id)
            .cloned()
        else {
            tracing::warn!("activity {activity_id} is not part of course {course_id}");
            self.course_profile_available = false;
            return Ok(());
        };

        // An explicit section number wins over looking the section up
        // by the activity's section id.
        let sections = self.catalog.sections(course.id)?;
        let include_section = section_number.or_else(|| {
            sections
                .iter()
                .find(|section| section.id == activity.section)
                .map(|section| section.number)
        });
        self.load_course_sections(node, &course, include_section)?;

        let target_key = NodeKey::Activity(activity.id.get());
        let activity_node = match self
            .tree
            .descendants(node)
            .find(|id| self.tree.node(*id).key() == &target_key)
        {
            Some(found) => found,
            None => {
                // The owning section is unavailable; surface the
                // activity on its own since the viewer targets it
                // directly.
                tracing::debug!("activity {} loaded as stealth", activity.id);
                self.add_activity_under(node, &activity)?
            }
        };
        self.ensure_active_within(activity_node);
        Ok(())
    }

    fn load_user_context(
        &mut self,
        roots: &RootNodes,
        course_id: CourseId,
    ) -> Result<(), BuildError> {
        let Some((course, node)) = self.resolve_page_course(roots, course_id)? else {
            return Ok(());
        };
        self.add_course_essentials(node, &course)?;
        self.load_course_sections(node, &course, None)?;
        Ok(())
    }

    /// Shared head of the course-bearing context branches: resolve the
    /// course, make sure its category branch exists, place its node and
    /// check access. Returns `None` when the branch should stop — the
    /// course is gone (profile unavailable) or entry is denied (the
    /// node alone is shown, marked active).
    fn resolve_page_course(
        &mut self,
        roots: &RootNodes,
        course_id: CourseId,
    ) -> Result<Option<(Course, NodeId)>, BuildError> {
        let Some(course) = self.catalog.course(course_id)? else {
            tracing::debug!("course {course_id} could not be resolved, leaving branch empty");
            self.course_profile_available = false;
            return Ok(None);
        };
        if !self.my_course_ids.contains(&course.id) {
            self.load_categories(roots, Some(course.category), true)?;
        }
        let node = self.load_course(roots, &course)?;
        if !self.catalog.can_access_course(&course, &self.view.viewer)? {
            tracing::debug!("viewer cannot enter course {course_id}, showing the node only");
            self.tree.mark_active(node);
            self.course_profile_available = false;
            return Ok(None);
        }
        Ok(Some((course, node)))
    }

    fn add_course_essentials(&mut self, node: NodeId, course: &Course) -> Result<(), BuildError> {
        let participants = NodeKey::slug("participants");
        if self.tree.child_by_key(node, &participants).is_none() {
            let child = NavigationNode::new(participants, "Participants", NodeType::Setting)
                .with_url(format!("/user/index.php?id={}", course.id));
            self.tree.attach(node, child)?;
        }
        let reports = NodeKey::slug("reports");
        if self.tree.child_by_key(node, &reports).is_none() {
            let child = NavigationNode::new(reports, "Reports", NodeType::Setting)
                .with_url(format!("/course/report.php?id={}", course.id));
            self.tree.attach(node, child)?;
        }
        Ok(())
    }

    /// Load section nodes and their activities under a course node.
    ///
    /// Hidden sections are skipped unless the viewer is an admin or the
    /// section is the explicitly included one. Activities of the
    /// general section (number 0) attach straight to the course node.
    fn load_course_sections(
        &mut self,
        course_node: NodeId,
        course: &Course,
        include_section: Option<u32>,
    ) -> Result<(), BuildError> {
        let admin = self.view.viewer.is_admin;
        let sections = self.catalog.sections(course.id)?;
        let activities = self.catalog.activities(course.id)?;
        for section in &sections {
            let included = include_section == Some(section.number);
            if !section.visible && !included && !admin {
                continue;
            }
            if section.number == 0 {
                for activity in activities.iter().filter(|a| a.section == section.id) {
                    if activity.visible || admin {
                        self.add_activity_under(course_node, activity)?;
                    }
                }
                continue;
            }
            let key = NodeKey::Section(section.id.get());
            let section_node = match self.tree.child_by_key(course_node, &key) {
                Some(existing) => existing,
                None => {
                    let child = NavigationNode::new(key, section.label(), NodeType::Section)
                        .with_url(section.url());
                    self.tree.attach(course_node, child)?
                }
            };
            for activity in activities.iter().filter(|a| a.section == section.id) {
                if activity.visible || admin || included {
                    self.add_activity_under(section_node, activity)?;
                }
            }
        }
        Ok(())
    }

    fn add_activity_under(
        &mut self,
        parent: NodeId,
        activity: &Activity,
    ) -> Result<NodeId, BuildError> {
        let key = NodeKey::Activity(activity.id.get());
        if let Some(existing) = self.tree.child_by_key(parent, &key) {
            return Ok(existing);
        }
        let node = NavigationNode::new(key, activity.name.clone(), NodeType::Activity)
            .with_url(activity.url());
        Ok(self.tree.attach(parent, node)?)
    }

    /// Make sure the branch ends up with an active node: keep an
    /// existing mark, otherwise try the page URL inside the branch,
    /// otherwise mark the branch head itself.
    fn ensure_active_within(&mut self, node: NodeId) {
        if self.tree.contains_active(node) {
            return;
        }
        let found = self
            .view
            .page_url
            .clone()
            .and_then(|url| self.tree.search_for_active_from(node, &url));
        if found.is_none() {
            self.tree.mark_active(node);
        }
    }
}
