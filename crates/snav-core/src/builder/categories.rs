//! Category subtree loading.
//!
//! Batches fetched from the catalog arrive in sort order, not tree
//! order; attachment has to tolerate a child turning up before its
//! parent. The `added_categories` index carries the resolution state and
//! doubles as the duplicate guard.

use snav_catalog::Catalog;
use snav_catalog::Category;
use snav_catalog::CategoryId;
use snav_conf::CourseNavView;
use snav_model::NavigationNode;
use snav_model::NodeId;
use snav_model::NodeKey;
use snav_model::NodeType;

use super::NavigationBuilder;
use super::RootNodes;
use crate::error::BuildError;

impl<C: Catalog> NavigationBuilder<'_, C> {
    /// Load category nodes.
    ///
    /// With no `category_id`, loads every top-level category. With an
    /// already-loaded id, tops up its not-yet-loaded children (plus new
    /// top-level categories when `include_base`). Otherwise resolves the
    /// category's full ancestor chain and loads the chain, its siblings'
    /// children and, gated by the display mode, the chain's courses.
    pub(crate) fn load_categories(
        &mut self,
        roots: &RootNodes,
        category_id: Option<CategoryId>,
        include_base: bool,
    ) -> Result<(), BuildError> {
        if let Some(id) = category_id {
            if let Some(&node) = self.added_categories.get(&id) {
                if self.tree.node(node).has_children() {
                    return Ok(());
                }
            }
        }

        let mut chain: Vec<CategoryId> = Vec::new();
        let batch = match category_id {
            None => self.catalog.categories_by_parent(CategoryId::TOP)?,
            Some(id) if self.added_categories.contains_key(&id) => {
                let mut batch = self.catalog.categories_by_parent(id)?;
                if include_base {
                    batch.extend(self.catalog.categories_by_parent(CategoryId::TOP)?);
                }
                batch.retain(|category| !self.added_categories.contains_key(&category.id));
                if batch.is_empty() {
                    // Nothing further requires loading; not a failure.
                    return Ok(());
                }
                batch
            }
            Some(id) => {
                let Some(category) = self.catalog.category(id)? else {
                    tracing::debug!("category {id} is unknown to the catalog, nothing to load");
                    return Ok(());
                };
                chain = category.ancestry();
                let mut batch = self.catalog.categories_in_chain(&chain, include_base)?;
                if self.filters_unenrolled_branches() {
                    self.drop_unenrolled_leaves(&mut batch)?;
                }
                batch
            }
        };

        self.attach_category_batch(roots, batch)?;

        if !chain.is_empty() && !self.filters_unenrolled_branches() {
            self.load_courses_for_categories(&chain)?;
        }
        Ok(())
    }

    /// Whether the display mode hides branches the viewer is not
    /// enrolled in. Admins and anonymous viewers see everything.
    fn filters_unenrolled_branches(&self) -> bool {
        self.settings.course_nav_view == CourseNavView::CatAndCourses
            && self.view.viewer.is_logged_in()
            && !self.view.viewer.is_admin
    }

    /// Remove leaf categories none of whose visible courses have the
    /// viewer enrolled, so empty branches are not advertised.
    fn drop_unenrolled_leaves(&self, batch: &mut Vec<Category>) -> Result<(), BuildError> {
        let Some(user) = self.view.viewer.id else {
            return Ok(());
        };
        let mut keep = Vec::with_capacity(batch.len());
        for category in batch.drain(..) {
            if category.course_count != 0 && category.is_chain_leaf() {
                let courses = self.catalog.courses_by_category(category.id, true)?;
                let mut enrolled = false;
                for course in &courses {
                    if self.catalog.is_enrolled(course.id, user)? {
                        enrolled = true;
                        break;
                    }
                }
                if !enrolled {
                    tracing::debug!(
                        "dropping leaf category {} with no enrolled visible courses",
                        category.id
                    );
                    continue;
                }
            }
            keep.push(category);
        }
        *batch = keep;
        Ok(())
    }

    /// Attach a fetched batch regardless of its order.
    ///
    /// A category attaches directly when its parent is the top level or
    /// already indexed; otherwise its ancestor path is walked from the
    /// top down, attaching whatever the batch can supply. A chain the
    /// batch cannot complete means the stored path and parent pointers
    /// disagree, which is unrecoverable reference-data corruption.
    fn attach_category_batch(
        &mut self,
        roots: &RootNodes,
        batch: Vec<Category>,
    ) -> Result<(), BuildError> {
        let mut pending = batch;
        while let Some(category) = pending.first().cloned() {
            if self.added_categories.contains_key(&category.id) {
                // Already placed by an earlier path walk.
            } else if category.is_top_level() {
                self.add_category(&category, roots.courses)?;
            } else if let Some(&parent_node) = self.added_categories.get(&category.parent) {
                self.add_category(&category, parent_node)?;
            } else {
                self.attach_along_path(roots, &category, &mut pending)?;
            }
            if let Some(position) = pending.iter().position(|entry| entry.id == category.id) {
                pending.remove(position);
            }
        }
        Ok(())
    }

    fn attach_along_path(
        &mut self,
        roots: &RootNodes,
        category: &Category,
        pending: &mut Vec<Category>,
    ) -> Result<(), BuildError> {
        for ancestor_id in category.ancestry() {
            if self.added_categories.contains_key(&ancestor_id) {
                continue;
            }
            let Some(position) = pending.iter().position(|entry| entry.id == ancestor_id) else {
                return Err(BuildError::Structure {
                    category: category.id,
                    reason: format!("ancestor {ancestor_id} is missing from the fetched set"),
                });
            };
            let ancestor = pending.remove(position);
            if ancestor.is_top_level() {
                self.add_category(&ancestor, roots.courses)?;
            } else if let Some(&parent_node) = self.added_categories.get(&ancestor.parent) {
                self.add_category(&ancestor, parent_node)?;
            } else {
                return Err(BuildError::Structure {
                    category: ancestor.id,
                    reason: format!(
                        "parent {} is neither the top level nor a resolvable ancestor",
                        ancestor.parent
                    ),
                });
            }
        }
        Ok(())
    }

    fn add_category(&mut self, category: &Category, parent: NodeId) -> Result<(), BuildError> {
        if self.added_categories.contains_key(&category.id) {
            return Ok(());
        }
        let node = NavigationNode::new(
            NodeKey::Category(category.id.get()),
            category.name.clone(),
            NodeType::Category,
        )
        .with_url(format!("/course/category.php?id={}", category.id))
        .with_branch_id(category.id.get())
        .expandable(true);
        let id = self.tree.attach(parent, node)?;
        self.added_categories.insert(category.id, id);
        Ok(())
    }

    /// Attach the courses of every given category that has a node.
    pub(crate) fn load_courses_for_categories(
        &mut self,
        categories: &[CategoryId],
    ) -> Result<(), BuildError> {
        let visible_only = !self.view.viewer.is_admin;
        for &category in categories {
            let Some(&parent) = self.added_categories.get(&category) else {
                continue;
            };
            for course in self.catalog.courses_by_category(category, visible_only)? {
                self.add_course_under(parent, &course)?;
            }
        }
        Ok(())
    }

    pub(crate) fn load_courses_for_added_categories(&mut self) -> Result<(), BuildError> {
        let mut categories: Vec<CategoryId> = self.added_categories.keys().copied().collect();
        categories.sort_unstable();
        self.load_courses_for_categories(&categories)
    }
}
