use super::{DevicePattern, DeviceTree};
use crate::Error;
use tracing::trace;

/// Outcome of one presence search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    /// Identifier of the first matching device, in search order.
    pub matched: Option<String>,
    /// Number of nodes visited, including the match.
    pub visited: usize,
}

impl Search {
    pub fn is_present(&self) -> bool {
        self.matched.is_some()
    }
}

/// Look for a device whose identifier contains `pattern`.
///
/// Nodes are visited in pre-order: a node, then its whole child subtree,
/// then its next sibling. The walk stops at the first match. Nodes without a
/// readable identifier never match but their children are still searched.
pub fn find_device<T>(tree: &T, pattern: &DevicePattern) -> Result<Search, Error>
where
    T: DeviceTree + ?Sized,
{
    let root = tree.root()?;
    let mut pending = vec![root];
    let mut visited = 0;

    while let Some(node) = pending.pop() {
        visited += 1;

        if let Some(device_id) = tree.device_id(node) {
            if pattern.matches(&device_id) {
                trace!(%device_id, visited, "device matched");
                return Ok(Search {
                    matched: Some(device_id),
                    visited,
                });
            }
        }

        // the sibling goes below the child so the child subtree is drained first
        if let Some(sibling) = tree.next_sibling(node) {
            pending.push(sibling);
        }
        if let Some(child) = tree.first_child(node) {
            pending.push(child);
        }
    }

    Ok(Search {
        matched: None,
        visited,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceForest, NodeId};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use proptest::sample::Index;

    struct Unreachable;

    impl DeviceTree for Unreachable {
        fn root(&self) -> Result<NodeId, Error> {
            Err(Error::EnumerationUnavailable("offline".into()))
        }
        fn device_id(&self, _: NodeId) -> Option<String> {
            unreachable!()
        }
        fn first_child(&self, _: NodeId) -> Option<NodeId> {
            unreachable!()
        }
        fn next_sibling(&self, _: NodeId) -> Option<NodeId> {
            unreachable!()
        }
    }

    fn pattern(s: &str) -> DevicePattern {
        DevicePattern::new(s).unwrap()
    }

    #[test]
    fn empty_forest_has_no_devices() {
        let forest = DeviceForest::new();
        let search = find_device(&forest, &pattern("VID_1234")).unwrap();
        assert_eq!(search, Search { matched: None, visited: 1 });
    }

    #[test]
    fn finds_only_child_of_root() {
        let mut forest = DeviceForest::new();
        forest.add(forest.root_node(), r"USB\VID_1234&PID_0001\5&1A2B");

        let search = find_device(&forest, &pattern("vid_1234")).unwrap();
        assert_eq!(search.matched.as_deref(), Some(r"USB\VID_1234&PID_0001\5&1A2B"));
        assert_eq!(search.visited, 2);
    }

    #[test]
    fn child_subtree_comes_before_sibling() {
        let mut forest = DeviceForest::new();
        let root = forest.root_node();
        let hub = forest.add(root, r"USB\ROOT_HUB30\4&1");
        forest.add(hub, r"USB\VID_1234&PID_0001\DEEP");
        forest.add(root, r"USB\VID_1234&PID_0002\SHALLOW");

        let search = find_device(&forest, &pattern("VID_1234")).unwrap();
        assert_eq!(search.matched.as_deref(), Some(r"USB\VID_1234&PID_0001\DEEP"));
        assert_eq!(search.visited, 3);
    }

    #[test]
    fn unreadable_nodes_are_skipped_not_fatal() {
        let mut forest = DeviceForest::new();
        let root = forest.root_node();
        let hidden = forest.add_unreadable(root);
        forest.add(hidden, r"USB\VID_1234&PID_0001\X");

        let search = find_device(&forest, &pattern("VID_1234")).unwrap();
        assert!(search.is_present());
    }

    #[test]
    fn unavailable_enumeration_is_an_error() {
        assert!(matches!(
            find_device(&Unreachable, &pattern("VID_1234")),
            Err(Error::EnumerationUnavailable(_))
        ));
    }

    /// Forest description: one `(parent, id)` pair per node, parents chosen
    /// among the nodes created before it.
    fn forest_shape() -> impl Strategy<Value = Vec<(Index, Option<String>)>> {
        prop::collection::vec((any::<Index>(), prop::option::weighted(0.9, "[a-dA-D_]{0,4}")), 0..60)
    }

    /// Forest plus a plain children-list model of it.
    fn build(shape: &[(Index, Option<String>)]) -> (DeviceForest, Vec<Vec<usize>>, Vec<Option<String>>) {
        let mut forest = DeviceForest::new();
        let mut handles = vec![forest.root_node()];
        let mut children = vec![Vec::new()];
        let mut ids = vec![None];

        for (parent, id) in shape {
            let parent = parent.index(handles.len());
            let handle = match id {
                Some(id) => forest.add(handles[parent], id.clone()),
                None => forest.add_unreadable(handles[parent]),
            };
            children[parent].push(handles.len());
            handles.push(handle);
            children.push(Vec::new());
            ids.push(id.clone());
        }
        (forest, children, ids)
    }

    fn pre_order(children: &[Vec<usize>], node: usize, out: &mut Vec<usize>) {
        out.push(node);
        for &child in &children[node] {
            pre_order(children, child, out);
        }
    }

    proptest! {
        #[test]
        fn presence_matches_brute_force(shape in forest_shape(), needle in "[a-dA-D_]{1,2}") {
            let (forest, _, ids) = build(&shape);
            let pattern = pattern(&needle);
            let expected = ids
                .iter()
                .flatten()
                .any(|id| id.to_uppercase().contains(&needle.to_uppercase()));

            let search = find_device(&forest, &pattern).unwrap();
            prop_assert_eq!(search.is_present(), expected);
        }

        #[test]
        fn stops_at_first_match_in_pre_order(shape in forest_shape(), needle in "[a-dA-D_]{1,2}") {
            let (forest, children, ids) = build(&shape);
            let pattern = pattern(&needle);
            let mut order = Vec::new();
            pre_order(&children, 0, &mut order);

            let first = order
                .iter()
                .position(|&node| ids[node].as_deref().is_some_and(|id| pattern.matches(id)));

            let search = find_device(&forest, &pattern).unwrap();
            match first {
                Some(position) => {
                    prop_assert_eq!(search.visited, position + 1);
                    prop_assert_eq!(search.matched, ids[order[position]].clone());
                }
                None => {
                    prop_assert_eq!(search.visited, order.len());
                    prop_assert_eq!(search.matched, None);
                }
            }
        }
    }
}
