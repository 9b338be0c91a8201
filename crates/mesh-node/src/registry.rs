//! Node registry: the nodes of the mesh and whether they are reachable.

use std::collections::HashMap;
use std::net::SocketAddr;

use mesh_core::NodeName;
use mesh_routing::Reachability;

/// What the node knows about a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub address: Option<SocketAddr>,
    pub reachable: bool,
}

pub struct NodeRegistry {
    myself: NodeName,
    nodes: HashMap<NodeName, NodeInfo>,
}

impl NodeRegistry {
    pub fn new(myself: NodeName) -> Self {
        Self {
            myself,
            nodes: HashMap::new(),
        }
    }

    pub fn myself(&self) -> &NodeName {
        &self.myself
    }

    #[must_use]
    pub fn is_myself(&self, name: &NodeName) -> bool {
        *name == self.myself
    }

    /// Register or replace a peer.
    pub fn insert(&mut self, name: NodeName, info: NodeInfo) {
        self.nodes.insert(name, info);
    }

    #[must_use]
    pub fn get(&self, name: &NodeName) -> Option<&NodeInfo> {
        self.nodes.get(name)
    }

    /// Update a peer's reachability. Returns false for unknown nodes.
    ///
    /// Does not flush the subnet lookup cache; cached lookups keep their
    /// answer until the next route change.
    pub fn set_reachable(&mut self, name: &NodeName, reachable: bool) -> bool {
        match self.nodes.get_mut(name) {
            Some(info) => {
                if info.reachable != reachable {
                    tracing::info!(node = %name, reachable, "node reachability changed");
                }
                info.reachable = reachable;
                true
            }
            None => false,
        }
    }

    /// Names of all known peers, excluding this node.
    pub fn peers(&self) -> impl Iterator<Item = &NodeName> {
        self.nodes.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// This node is always reachable; unknown nodes never are.
impl Reachability for NodeRegistry {
    fn is_reachable(&self, node: &NodeName) -> bool {
        self.is_myself(node) || self.nodes.get(node).is_some_and(|info| info.reachable)
    }
}
