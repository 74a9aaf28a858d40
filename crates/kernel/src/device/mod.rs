//! Host device enumeration and the presence search over it.
//!
//! Every backend exposes the same first-child/next-sibling view of the
//! device forest through [`DeviceTree`]. Nodes are transient: a tree is
//! queried fresh on every run and handles are only meaningful for the tree
//! that produced them.

#[cfg(windows)]
mod cfgmgr;
mod forest;
mod pattern;
mod search;
mod sysfs;

#[cfg(windows)]
pub use cfgmgr::CfgMgrTree;
pub use forest::DeviceForest;
pub use pattern::DevicePattern;
pub use search::{Search, find_device};
pub use sysfs::SysfsTree;

use crate::Error;

/// Opaque handle to one node of a [`DeviceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only view of the host's device forest.
pub trait DeviceTree {
    /// Locate the synthetic root of the enumeration.
    fn root(&self) -> Result<NodeId, Error>;

    /// Identifier of `node`, or `None` if it cannot be read.
    fn device_id(&self, node: NodeId) -> Option<String>;

    fn first_child(&self, node: NodeId) -> Option<NodeId>;

    fn next_sibling(&self, node: NodeId) -> Option<NodeId>;
}

/// Open the device tree of the running host.
pub fn system_tree() -> Result<Box<dyn DeviceTree>, Error> {
    #[cfg(windows)]
    {
        Ok(Box::new(CfgMgrTree::locate()?))
    }
    #[cfg(not(windows))]
    {
        Ok(Box::new(SysfsTree::open(SysfsTree::DEFAULT_ROOT)?))
    }
}
