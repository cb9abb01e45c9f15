//! Label trimming for display.
//!
//! All measurements are in characters, not bytes, so multi-byte labels
//! trim cleanly. A label is left alone until it exceeds the threshold
//! plus the three-character ellipsis, which keeps trimming idempotent.

use snav_conf::TrimMode;
use snav_model::NavTree;
use snav_model::NodeId;

/// Shorten a node's long and short labels, and its subtree's when
/// `recurse` is set.
pub fn trim(
    tree: &mut NavTree,
    node: NodeId,
    mode: TrimMode,
    long: usize,
    short: usize,
    recurse: bool,
) {
    let entry = tree.node_mut(node);
    if let Some(trimmed) = truncate(mode, entry.text(), long) {
        entry.set_text(trimmed);
    }
    let trimmed_short = entry
        .short_text()
        .and_then(|short_text| truncate(mode, short_text, short));
    if let Some(trimmed) = trimmed_short {
        entry.set_short_text(trimmed);
    }
    if recurse {
        let children: Vec<NodeId> = tree.children(node).collect();
        for child in children {
            trim(tree, child, mode, long, short, true);
        }
    }
}

/// Trim every node in the tree.
pub fn trim_tree(tree: &mut NavTree, mode: TrimMode, long: usize, short: usize) {
    let root = tree.root();
    trim(tree, root, mode, long, short, true);
}

fn truncate(mode: TrimMode, text: &str, limit: usize) -> Option<String> {
    let count = text.chars().count();
    if count <= limit + 3 {
        return None;
    }
    let result = match mode {
        TrimMode::Right => {
            let head: String = text.chars().take(limit).collect();
            format!("{head}...")
        }
        TrimMode::Left => {
            let tail: String = text.chars().skip(count - limit).collect();
            format!("...{tail}")
        }
        TrimMode::Center => {
            let keep = limit.div_ceil(2);
            let head: String = text.chars().take(keep).collect();
            let tail: String = text.chars().skip(count - keep).collect();
            format!("{head}...{tail}")
        }
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use snav_conf::TrimMode;
    use snav_model::NavTree;
    use snav_model::NavigationNode;
    use snav_model::NodeKey;
    use snav_model::NodeType;

    use super::trim;
    use super::truncate;

    #[test]
    fn short_text_is_left_alone() {
        for mode in [TrimMode::Left, TrimMode::Right, TrimMode::Center] {
            assert_eq!(truncate(mode, "short", 10), None);
            // Exactly at the threshold: still untouched.
            assert_eq!(truncate(mode, "1234567890123", 10), None);
        }
    }

    #[test]
    fn trimmed_length_is_limit_plus_ellipsis() {
        let input = "abcdefghijklmnopqrst"; // 20 chars
        for mode in [TrimMode::Left, TrimMode::Right, TrimMode::Center] {
            let out = truncate(mode, input, 10).unwrap();
            assert_eq!(out.chars().count(), 13, "mode {mode:?}");
        }
    }

    #[test]
    fn right_keeps_the_head() {
        let out = truncate(TrimMode::Right, "abcdefghijklmnopqrst", 10).unwrap();
        assert_eq!(out, "abcdefghij...");
    }

    #[test]
    fn left_keeps_the_tail() {
        let out = truncate(TrimMode::Left, "abcdefghijklmnopqrst", 10).unwrap();
        assert_eq!(out, "...klmnopqrst");
    }

    #[test]
    fn center_keeps_head_and_tail() {
        let out = truncate(TrimMode::Center, "abcdefghijklmnopqrst", 10).unwrap();
        assert_eq!(out, "abcde...pqrst");
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 20 two-byte characters; byte-based trimming would split one.
        let input = "αβγδεζηθικλμνξοπρστυ";
        let out = truncate(TrimMode::Right, input, 10).unwrap();
        assert_eq!(out, "αβγδεζηθικ...");
        assert_eq!(out.chars().count(), 13);
    }

    #[test]
    fn truncation_is_idempotent() {
        let once = truncate(TrimMode::Center, "abcdefghijklmnopqrst", 10).unwrap();
        assert_eq!(truncate(TrimMode::Center, &once, 10), None);
    }

    #[test]
    fn recurses_into_children_and_trims_short_text() {
        let mut tree = NavTree::new();
        let root = tree.root();
        let parent = tree
            .attach(
                root,
                NavigationNode::new(
                    NodeKey::Course(1),
                    "abcdefghijklmnopqrst",
                    NodeType::Course,
                )
                .with_short_text("abcdefghijklmnopqrst"),
            )
            .unwrap();
        let child = tree
            .attach(
                parent,
                NavigationNode::new(
                    NodeKey::Activity(2),
                    "abcdefghijklmnopqrst",
                    NodeType::Activity,
                ),
            )
            .unwrap();

        trim(&mut tree, root, TrimMode::Right, 10, 4, true);

        assert_eq!(tree.node(parent).text(), "abcdefghij...");
        assert_eq!(tree.node(parent).short_text(), Some("abcd..."));
        assert_eq!(tree.node(child).text(), "abcdefghij...");
    }

    #[test]
    fn no_recursion_when_disabled() {
        let mut tree = NavTree::new();
        let root = tree.root();
        let parent = tree
            .attach(
                root,
                NavigationNode::new(
                    NodeKey::Course(1),
                    "abcdefghijklmnopqrst",
                    NodeType::Course,
                ),
            )
            .unwrap();
        let child = tree
            .attach(
                parent,
                NavigationNode::new(
                    NodeKey::Activity(2),
                    "abcdefghijklmnopqrst",
                    NodeType::Activity,
                ),
            )
            .unwrap();

        trim(&mut tree, parent, TrimMode::Right, 10, 4, false);

        assert_eq!(tree.node(parent).text(), "abcdefghij...");
        assert_eq!(tree.node(child).text(), "abcdefghijklmnopqrst");
    }
}
