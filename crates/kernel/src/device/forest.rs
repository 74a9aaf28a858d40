use super::{DeviceTree, NodeId};
use crate::Error;

#[derive(Debug, Clone, Default)]
struct Node {
    id: Option<String>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// In-memory device forest stored as an arena.
///
/// The forest always has a synthetic root without an identifier; devices are
/// appended below it with [`DeviceForest::add`]. Children keep their insertion
/// order.
#[derive(Debug, Clone)]
pub struct DeviceForest {
    nodes: Vec<Node>,
}

impl Default for DeviceForest {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceForest {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub fn root_node(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Append a device with the given identifier as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not produced by this forest.
    pub fn add(&mut self, parent: NodeId, id: impl Into<String>) -> NodeId {
        self.insert(parent, Some(id.into()))
    }

    /// Append a device whose identifier cannot be read.
    pub fn add_unreadable(&mut self, parent: NodeId) -> NodeId {
        self.insert(parent, None)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.parent
    }

    fn insert(&mut self, parent: NodeId, id: Option<String>) -> NodeId {
        let handle = NodeId::new(self.nodes.len() as u32);
        let previous = self.nodes[parent.index()].last_child.replace(handle);
        match previous {
            Some(previous) => self.nodes[previous.index()].next_sibling = Some(handle),
            None => self.nodes[parent.index()].first_child = Some(handle),
        }
        self.nodes.push(Node {
            id,
            parent: Some(parent),
            ..Node::default()
        });
        handle
    }
}

impl DeviceTree for DeviceForest {
    fn root(&self) -> Result<NodeId, Error> {
        Ok(self.root_node())
    }

    fn device_id(&self, node: NodeId) -> Option<String> {
        self.nodes.get(node.index())?.id.clone()
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index())?.next_sibling
    }
}
