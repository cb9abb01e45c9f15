mod categories;
mod courses;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use snav_catalog::Catalog;
use snav_catalog::CategoryId;
use snav_catalog::Course;
use snav_catalog::CourseId;
use snav_catalog::UserId;
use snav_conf::CourseNavView;
use snav_conf::HomePage;
use snav_conf::Settings;
use snav_model::NavTree;
use snav_model::NavigationNode;
use snav_model::NodeId;
use snav_model::NodeKey;
use snav_model::NodeType;

use crate::context::PageContext;
use crate::context::PageView;
use crate::error::BuildError;

/// Hook invoked after standard assembly; may append nodes anywhere.
pub trait NavigationExtension {
    fn extend(&self, tree: &mut NavTree);
}

/// Handles to the fixed top-level anchors. Home needs no handle: it is
/// exempt from pruning, so nothing touches it after creation.
#[derive(Debug, Clone, Copy)]
struct RootNodes {
    site: NodeId,
    my_profile: NodeId,
    my_courses: NodeId,
    courses: NodeId,
    users: NodeId,
}

/// The finished tree plus what the caller needs to react to it.
#[derive(Debug)]
pub struct Navigation {
    pub tree: NavTree,
    /// False when the page's course could not be resolved or entered;
    /// callers skip course-profile affordances in that case.
    pub course_profile_available: bool,
}

/// Builds one navigation tree for one page render.
///
/// The builder is single-use: construct it, optionally register
/// extensions, then call [`Self::build`]. `initialise` is latched, so a
/// second call is a successful no-op; the latch is never reset.
pub struct NavigationBuilder<'a, C: Catalog> {
    catalog: &'a C,
    settings: &'a Settings,
    view: &'a PageView,
    extensions: Vec<Box<dyn NavigationExtension + 'a>>,
    tree: NavTree,
    added_categories: FxHashMap<CategoryId, NodeId>,
    my_course_ids: FxHashSet<CourseId>,
    course_profile_available: bool,
    initialised: bool,
}

impl<'a, C: Catalog> NavigationBuilder<'a, C> {
    #[must_use]
    pub fn new(catalog: &'a C, settings: &'a Settings, view: &'a PageView) -> Self {
        Self {
            catalog,
            settings,
            view,
            extensions: Vec::new(),
            tree: NavTree::new(),
            added_categories: FxHashMap::default(),
            my_course_ids: FxHashSet::default(),
            course_profile_available: true,
            initialised: false,
        }
    }

    pub fn register_extension(&mut self, extension: Box<dyn NavigationExtension + 'a>) {
        self.extensions.push(extension);
    }

    /// Run the single construction pass.
    pub fn initialise(&mut self) -> Result<(), BuildError> {
        if self.initialised {
            return Ok(());
        }
        self.initialised = true;

        let site = self.catalog.site_course()?;
        let roots = self.build_root_nodes(&site)?;

        let flat = self.settings.course_nav_view == CourseNavView::Courses;
        let limit = if flat { self.settings.nav_course_limit } else { 0 };
        let my_courses = match self.view.viewer.id {
            Some(user) => self.catalog.enrolled_courses(user, limit)?,
            None => Vec::new(),
        };
        self.my_course_ids = my_courses.iter().map(|course| course.id).collect();

        for course in &my_courses {
            if flat {
                self.add_course_under(roots.my_courses, course)?;
            } else {
                self.load_categories(&roots, Some(course.category), false)?;
                self.load_course(&roots, course)?;
            }
        }

        if my_courses.is_empty() || self.settings.show_all_courses {
            tracing::debug!("no enrolled courses (or full listing forced), loading all branches");
            self.load_categories(&roots, None, false)?;
            self.load_courses_for_added_categories()?;
        }

        // The front page is loaded whatever the viewer is enrolled in,
        // so the tree is never empty before any interactive expansion.
        self.load_front_page(&roots, &site)?;

        self.load_page_context(&roots, &site)?;

        self.annotate_full_listings(&roots)?;

        self.load_user_branches(&roots, &site)?;

        for extension in &self.extensions {
            extension.extend(&mut self.tree);
        }

        self.prune_empty_roots(&roots);

        if self.tree.active_node().is_none() {
            if let Some(url) = self.view.page_url.clone() {
                self.tree.search_for_active(&url);
            }
        }

        if !self.view.viewer.is_logged_in() {
            self.tree.hoist_children_to_front(roots.site)?;
        }

        Ok(())
    }

    /// Initialise (if not done yet) and hand over the finished tree.
    pub fn build(mut self) -> Result<Navigation, BuildError> {
        self.initialise()?;
        Ok(Navigation {
            tree: self.tree,
            course_profile_available: self.course_profile_available,
        })
    }

    fn build_root_nodes(&mut self, site: &Course) -> Result<RootNodes, BuildError> {
        let top = self.tree.root();
        match self.settings.default_home {
            // The site is the landing page, so Home links out to the
            // dashboard; pointless for anonymous viewers.
            HomePage::Site => {
                if self.view.viewer.is_logged_in() {
                    let node =
                        NavigationNode::new(NodeKey::slug("home"), "Dashboard", NodeType::Setting)
                            .with_url("/my/");
                    self.tree.attach(top, node)?;
                }
            }
            // The dashboard is the landing page, so Home links to the
            // site front page with automatic redirection disabled.
            HomePage::Dashboard => {
                let node =
                    NavigationNode::new(NodeKey::slug("home"), "Site home", NodeType::Setting)
                        .with_url("/?redirect=0");
                self.tree.attach(top, node)?;
            }
        }
        let site_node = NavigationNode::new(
            NodeKey::Course(site.id.get()),
            site.full_name.clone(),
            NodeType::Course,
        )
        .with_short_text(site.short_name.clone())
        .with_url(site.url())
        .with_branch_id(site.id.get());
        let site_node = self.tree.attach(top, site_node)?;
        let my_profile = self.tree.attach(
            top,
            NavigationNode::new(NodeKey::slug("myprofile"), "My profile", NodeType::User),
        )?;
        let my_courses = self.tree.attach(
            top,
            NavigationNode::new(NodeKey::slug("mycourses"), "My courses", NodeType::RootNode),
        )?;
        let courses = self.tree.attach(
            top,
            NavigationNode::new(NodeKey::slug("courses"), "Courses", NodeType::RootNode),
        )?;
        let users = self.tree.attach(
            top,
            NavigationNode::new(NodeKey::slug("users"), "Users", NodeType::RootNode),
        )?;
        Ok(RootNodes {
            site: site_node,
            my_profile,
            my_courses,
            courses,
            users,
        })
    }

    /// Append "view all" links wherever a child list has grown to the
    /// display limit: per category for admins, once on the Courses root
    /// for everyone else.
    fn annotate_full_listings(&mut self, roots: &RootNodes) -> Result<(), BuildError> {
        let limit = self.settings.nav_course_limit;
        if limit == 0 {
            return Ok(());
        }
        if self.view.viewer.is_admin {
            for category_node in self.tree.find_all_of_type(NodeType::Category) {
                if self.tree.node(category_node).children().len() < limit {
                    continue;
                }
                let key = NodeKey::slug("viewallcourses");
                if self.tree.child_by_key(category_node, &key).is_some() {
                    continue;
                }
                let category = self.tree.node(category_node).branch_id().unwrap_or_default();
                let node = NavigationNode::new(key, "View all courses", NodeType::Setting)
                    .with_url(format!("/course/category.php?id={category}"));
                self.tree.attach(category_node, node)?;
            }
        } else if self.tree.node(roots.courses).children().len() >= limit {
            let node = NavigationNode::new(
                NodeKey::slug("viewallcourses"),
                "View all courses and categories",
                NodeType::Setting,
            )
            .with_url("/course/index.php");
            self.tree.attach(roots.courses, node)?;
        }
        Ok(())
    }

    /// Attach the per-user profile branches: the viewer's own, the
    /// profile owner's when looking at someone else's course-scoped
    /// page, and every explicitly registered user.
    fn load_user_branches(&mut self, roots: &RootNodes, site: &Course) -> Result<(), BuildError> {
        if let Some(viewer_id) = self.view.viewer.id {
            self.load_for_user(roots, viewer_id, true)?;
        }

        let in_course_scope = self
            .view
            .context
            .course_id()
            .is_some_and(|course| course != site.id);
        if in_course_scope && self.course_profile_available {
            if let PageContext::User { user, .. } = self.view.context {
                if Some(user) != self.view.viewer.id {
                    self.load_for_user(roots, user, false)?;
                }
            }
        }

        let extend: Vec<UserId> = self.view.extend_for_users.clone();
        for user in extend {
            if Some(user) != self.view.viewer.id {
                self.load_for_user(roots, user, false)?;
            }
        }
        Ok(())
    }

    fn load_for_user(
        &mut self,
        roots: &RootNodes,
        user_id: UserId,
        own_profile: bool,
    ) -> Result<(), BuildError> {
        let Some(user) = self.catalog.user(user_id)? else {
            tracing::debug!("user {user_id} not in catalog, skipping profile branch");
            return Ok(());
        };
        let parent = if own_profile {
            roots.my_profile
        } else {
            roots.users
        };
        let key = NodeKey::User(user.id.get());
        if self.tree.child_by_key(parent, &key).is_some() {
            return Ok(());
        }
        let node =
            NavigationNode::new(key, user.full_name.clone(), NodeType::User).with_url(user.url());
        self.tree.attach(parent, node)?;
        Ok(())
    }

    /// Drop every childless root. Home stays even when empty.
    fn prune_empty_roots(&mut self, roots: &RootNodes) {
        let prunable = [
            roots.site,
            roots.my_profile,
            roots.my_courses,
            roots.courses,
            roots.users,
        ];
        for id in prunable {
            if !self.tree.node(id).has_children() {
                self.tree.detach(id);
            }
        }
    }
}
