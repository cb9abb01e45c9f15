//! Expansion hints for client-side progressive disclosure.

use serde::Serialize;
use snav_catalog::CourseId;
use snav_conf::ExpansionLimit;
use snav_model::NavTree;
use snav_model::NodeKey;
use snav_model::NodeType;

/// A node the client may expand lazily.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expandable {
    pub key: NodeKey,
    pub node_type: NodeType,
    pub branch_id: Option<i64>,
}

fn limit_rank(limit: ExpansionLimit) -> Option<u8> {
    match limit {
        ExpansionLimit::Everything => None,
        ExpansionLimit::Course => Some(NodeType::Course.rank()),
        ExpansionLimit::Section => Some(NodeType::Section.rank()),
        ExpansionLimit::Activity => Some(NodeType::Activity.rank()),
    }
}

/// Collect the childless expandable nodes, honoring the configured
/// limit. The front-page course node is always kept: clients treat it
/// as the anchor of the site branch no matter how tight the limit is.
#[must_use]
pub fn find_expandable(
    tree: &NavTree,
    limit: ExpansionLimit,
    site_course: CourseId,
) -> Vec<Expandable> {
    let threshold = limit_rank(limit);
    tree.descendants(tree.root())
        .filter_map(|id| {
            let node = tree.node(id);
            if !node.is_expandable() || node.has_children() {
                return None;
            }
            if let Some(threshold) = threshold {
                let within = node.node_type().rank() <= threshold;
                let site_branch = node.node_type() == NodeType::Course
                    && node.branch_id() == Some(site_course.get());
                if !within && !site_branch {
                    return None;
                }
            }
            Some(Expandable {
                key: node.key().clone(),
                node_type: node.node_type(),
                branch_id: node.branch_id(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use snav_catalog::CourseId;
    use snav_conf::ExpansionLimit;
    use snav_model::NavTree;
    use snav_model::NavigationNode;
    use snav_model::NodeKey;
    use snav_model::NodeType;

    use super::find_expandable;

    fn sample_tree() -> NavTree {
        let mut tree = NavTree::new();
        let root = tree.root();
        let courses = tree
            .attach(
                root,
                NavigationNode::new(NodeKey::slug("courses"), "Courses", NodeType::RootNode),
            )
            .unwrap();
        let category = tree
            .attach(
                courses,
                NavigationNode::new(NodeKey::Category(5), "Science", NodeType::Category)
                    .with_branch_id(5)
                    .expandable(true),
            )
            .unwrap();
        // Populated category: not a candidate.
        tree.attach(
            category,
            NavigationNode::new(NodeKey::Course(3), "Physics", NodeType::Course)
                .with_branch_id(3)
                .expandable(true),
        )
        .unwrap();
        // Empty sibling category: a candidate.
        tree.attach(
            courses,
            NavigationNode::new(NodeKey::Category(6), "Arts", NodeType::Category)
                .with_branch_id(6)
                .expandable(true),
        )
        .unwrap();
        // The site course node, childless.
        tree.attach(
            root,
            NavigationNode::new(NodeKey::Course(1), "Front page", NodeType::Course)
                .with_branch_id(1)
                .expandable(true),
        )
        .unwrap();
        tree
    }

    #[test]
    fn collects_childless_expandable_nodes() {
        let tree = sample_tree();
        let found = find_expandable(&tree, ExpansionLimit::Everything, CourseId::new(1));
        let keys: Vec<String> = found.iter().map(|entry| entry.key.to_string()).collect();
        assert_eq!(keys, vec!["course:3", "category:6", "course:1"]);
    }

    #[test]
    fn limit_excludes_deeper_kinds() {
        let mut tree = sample_tree();
        let category = tree
            .find(&NodeKey::Category(6), NodeType::Category)
            .unwrap();
        // An expandable activity ranks past the Course limit.
        tree.attach(
            category,
            NavigationNode::new(NodeKey::Activity(9), "Quiz", NodeType::Activity).expandable(true),
        )
        .unwrap();

        let found = find_expandable(&tree, ExpansionLimit::Course, CourseId::new(1));
        let keys: Vec<String> = found.iter().map(|entry| entry.key.to_string()).collect();
        assert_eq!(keys, vec!["course:3", "course:1"]);
    }

    #[test]
    fn site_course_survives_any_limit() {
        let tree = sample_tree();
        let found = find_expandable(&tree, ExpansionLimit::Course, CourseId::new(1));
        assert!(found
            .iter()
            .any(|entry| entry.key == NodeKey::Course(1) && entry.branch_id == Some(1)));
    }
}
