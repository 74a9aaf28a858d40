use super::{DeviceTree, NodeId};
use crate::Error;
use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::trace;

#[derive(Debug, Clone, Copy)]
enum Children {
    Unexplored,
    Explored(Option<NodeId>),
}

#[derive(Debug)]
struct SysfsNode {
    path: PathBuf,
    next_sibling: Option<NodeId>,
    children: Children,
}

/// Device tree backed by the Linux sysfs device hierarchy.
///
/// Directories are listed lazily, the first time a node's children are
/// requested, so a search that matches early never touches the rest of the
/// hierarchy. Identifiers are rendered in the instance-path style used by
/// other platforms:
///
/// - USB devices: `USB\VID_046D&PID_C52B\<serial or name>`
/// - USB interfaces: `USB\VID_046D&PID_C52B&MI_00\<name>`
/// - everything else: `<SUBSYSTEM>\<name>`
///
/// Directories without an `uevent` file are not devices and have no
/// identifier.
#[derive(Debug)]
pub struct SysfsTree {
    nodes: RefCell<Vec<SysfsNode>>,
}

impl SysfsTree {
    pub const DEFAULT_ROOT: &str = "/sys/devices";

    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::EnumerationUnavailable(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            nodes: RefCell::new(vec![SysfsNode {
                path: root,
                next_sibling: None,
                children: Children::Unexplored,
            }]),
        })
    }

    fn path(&self, node: NodeId) -> Option<PathBuf> {
        self.nodes.borrow().get(node.index()).map(|n| n.path.clone())
    }

    /// List the subdirectories of `node` and append them to the arena.
    fn explore(&self, node: NodeId) -> Option<NodeId> {
        let path = self.path(node)?;
        let mut entries: Vec<PathBuf> = match fs::read_dir(&path) {
            // symlinks point back into the hierarchy, only real directories are children
            Ok(dir) => dir
                .flatten()
                .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
                .map(|entry| entry.path())
                .collect(),
            Err(err) => {
                trace!(path = %path.display(), %err, "cannot list device directory");
                Vec::new()
            }
        };
        entries.sort();

        let mut nodes = self.nodes.borrow_mut();
        let first = nodes.len();
        let count = entries.len();
        for (offset, path) in entries.into_iter().enumerate() {
            let next_sibling = (offset + 1 < count).then(|| NodeId::new((first + offset + 1) as u32));
            nodes.push(SysfsNode {
                path,
                next_sibling,
                children: Children::Unexplored,
            });
        }
        (count > 0).then(|| NodeId::new(first as u32))
    }
}

impl DeviceTree for SysfsTree {
    fn root(&self) -> Result<NodeId, Error> {
        Ok(NodeId::new(0))
    }

    fn device_id(&self, node: NodeId) -> Option<String> {
        identifier(&self.path(node)?)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        let children = self.nodes.borrow().get(node.index())?.children;
        match children {
            Children::Explored(first) => first,
            Children::Unexplored => {
                let first = self.explore(node);
                if let Some(entry) = self.nodes.borrow_mut().get_mut(node.index()) {
                    entry.children = Children::Explored(first);
                }
                first
            }
        }
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(node.index())?.next_sibling
    }
}

fn identifier(path: &Path) -> Option<String> {
    let uevent = fs::read_to_string(path.join("uevent")).ok()?;
    let name = path.file_name()?.to_str()?;
    let props: HashMap<&str, &str> = uevent
        .lines()
        .filter_map(|line| line.split_once('='))
        .collect();

    let id = match props.get("DEVTYPE").copied() {
        Some("usb_device") => {
            let (vid, pid) = vendor_product(props.get("PRODUCT")?)?;
            let instance = attribute(path, "serial").unwrap_or_else(|| name.to_owned());
            format!(r"USB\VID_{vid:04X}&PID_{pid:04X}\{instance}")
        }
        Some("usb_interface") => {
            let (vid, pid) = vendor_product(props.get("PRODUCT")?)?;
            let interface = attribute(path, "bInterfaceNumber").unwrap_or_else(|| "00".into());
            format!(r"USB\VID_{vid:04X}&PID_{pid:04X}&MI_{interface}\{name}")
        }
        _ => {
            let subsystem = subsystem(path)
                .or_else(|| props.get("SUBSYSTEM").map(|s| (*s).to_owned()))
                .unwrap_or_else(|| "DEVICE".into());
            format!(r"{subsystem}\{name}")
        }
    };
    Some(id.to_uppercase())
}

/// Parse the `PRODUCT=vid/pid/bcd` uevent field, hex without padding.
fn vendor_product(product: &str) -> Option<(u16, u16)> {
    let mut parts = product.split('/');
    let vid = u16::from_str_radix(parts.next()?, 16).ok()?;
    let pid = u16::from_str_radix(parts.next()?, 16).ok()?;
    Some((vid, pid))
}

fn attribute(path: &Path, name: &str) -> Option<String> {
    let value = fs::read_to_string(path.join(name)).ok()?;
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn subsystem(path: &Path) -> Option<String> {
    let target = fs::read_link(path.join("subsystem")).ok()?;
    Some(target.file_name()?.to_str()?.to_owned())
}
