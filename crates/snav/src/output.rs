//! Plain-text rendering of a finished tree.

use std::fmt::Write;

use snav_conf::Settings;
use snav_model::NavTree;
use snav_model::NodeId;
use snav_model::NodeType;

/// Render the tree as an indented listing, one node per line. The
/// active node is starred; category links are shown only when the
/// configuration asks for linked categories.
pub fn render_tree(tree: &NavTree, settings: &Settings) -> String {
    let mut out = String::new();
    for child in tree.children(tree.root()) {
        render_node(tree, child, settings, 0, &mut out);
    }
    out
}

fn render_node(tree: &NavTree, id: NodeId, settings: &Settings, depth: usize, out: &mut String) {
    let node = tree.node(id);
    let indent = "  ".repeat(depth);
    let marker = if node.is_active() { " *" } else { "" };
    let show_url = node.url().is_some()
        && (node.node_type() != NodeType::Category || settings.link_categories);
    if show_url {
        let url = node.url().unwrap_or_default();
        let _ = writeln!(out, "{indent}{}{marker}  ({url})", node.text());
    } else {
        let _ = writeln!(out, "{indent}{}{marker}", node.text());
    }
    for child in tree.children(id) {
        render_node(tree, child, settings, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use snav_conf::Settings;
    use snav_model::NavTree;
    use snav_model::NavigationNode;
    use snav_model::NodeKey;
    use snav_model::NodeType;

    use super::render_tree;

    fn sample() -> NavTree {
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
                    .with_url("/course/category.php?id=5"),
            )
            .unwrap();
        let course = tree
            .attach(
                category,
                NavigationNode::new(NodeKey::Course(3), "Physics", NodeType::Course)
                    .with_url("/course/view.php?id=3"),
            )
            .unwrap();
        tree.mark_active(course);
        tree
    }

    #[test]
    fn indents_and_stars_the_active_node() {
        let out = render_tree(&sample(), &Settings::default());
        let expected = "\
Courses
  Science
    Physics *  (/course/view.php?id=3)
";
        assert_eq!(out, expected);
    }

    #[test]
    fn category_links_appear_only_when_configured() {
        let settings = Settings {
            link_categories: true,
            ..Settings::default()
        };
        let out = render_tree(&sample(), &settings);
        assert!(out.contains("Science  (/course/category.php?id=5)"));
    }
}
