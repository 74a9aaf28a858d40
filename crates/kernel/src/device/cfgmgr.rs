use super::{DeviceTree, NodeId};
use crate::Error;
use windows::Win32::Devices::DeviceAndDriverInstallation::{
    CM_Get_Child, CM_Get_Device_IDW, CM_Get_Sibling, CM_LOCATE_DEVNODE_NORMAL, CM_Locate_DevNodeW,
    CR_SUCCESS,
};
use windows::core::PCWSTR;

const DEVICE_ID_CAPACITY: usize = 1024;

/// Device tree of the Windows configuration manager.
///
/// Node handles are the configuration manager's own device instance handles.
#[derive(Debug, Default)]
pub struct CfgMgrTree;

impl CfgMgrTree {
    /// Check that the configuration manager answers before handing out a tree.
    pub fn locate() -> Result<Self, Error> {
        let tree = Self;
        tree.root()?;
        Ok(tree)
    }
}

impl DeviceTree for CfgMgrTree {
    fn root(&self) -> Result<NodeId, Error> {
        let mut devinst = 0u32;
        // SAFETY: `devinst` outlives the call and a null device id selects the root.
        let ret = unsafe { CM_Locate_DevNodeW(&mut devinst, PCWSTR::null(), CM_LOCATE_DEVNODE_NORMAL) };
        if ret != CR_SUCCESS {
            return Err(Error::EnumerationUnavailable(format!(
                "CM_Locate_DevNodeW returned {:#x}",
                ret.0
            )));
        }
        Ok(NodeId::new(devinst))
    }

    fn device_id(&self, node: NodeId) -> Option<String> {
        let mut buffer = [0u16; DEVICE_ID_CAPACITY];
        // SAFETY: the buffer length is passed along with the slice.
        let ret = unsafe { CM_Get_Device_IDW(node.get(), &mut buffer, 0) };
        if ret != CR_SUCCESS {
            return None;
        }
        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        Some(String::from_utf16_lossy(&buffer[..len]))
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        let mut child = 0u32;
        // SAFETY: `child` outlives the call.
        let ret = unsafe { CM_Get_Child(&mut child, node.get(), 0) };
        (ret == CR_SUCCESS).then_some(NodeId::new(child))
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut sibling = 0u32;
        // SAFETY: `sibling` outlives the call.
        let ret = unsafe { CM_Get_Sibling(&mut sibling, node.get(), 0) };
        (ret == CR_SUCCESS).then_some(NodeId::new(sibling))
    }
}
