//! Node: ties the registry, the subnet table and the script hooks together.

use mesh_core::{Address, NodeName, Subnet};
use mesh_routing::{Route, RouteId, SubnetTable};

use crate::config::{NodeConfig, parse_socket_addr};
use crate::error::NodeError;
use crate::registry::{NodeInfo, NodeRegistry};
use crate::script::{self, ScriptEnvironment, ScriptInvocation, ScriptRunner};

pub struct Node {
    registry: NodeRegistry,
    table: SubnetTable,
    env: ScriptEnvironment,
    scripts: ScriptRunner,
}

impl Node {
    /// Build a node from configuration, learning every configured subnet.
    pub fn from_config(config: &NodeConfig) -> Result<Self, NodeError> {
        let myself = NodeName::from(config.node.name.as_str());
        let mut node = Self {
            registry: NodeRegistry::new(myself.clone()),
            table: SubnetTable::new(),
            env: ScriptEnvironment {
                netname: config.node.netname.clone(),
                device: config.node.device.clone(),
                interface: config.node.interface.clone(),
            },
            scripts: ScriptRunner::new(&config.node.scripts_dir),
        };

        for text in &config.node.subnets {
            node.add_subnet(&myself, text)?;
        }

        for host in &config.hosts {
            let name = NodeName::from(host.name.as_str());
            let address = host
                .address
                .as_deref()
                .map(parse_socket_addr)
                .transpose()?;
            node.registry.insert(
                name.clone(),
                NodeInfo {
                    address,
                    reachable: host.reachable,
                },
            );
            for text in &host.subnets {
                node.add_subnet(&name, text)?;
            }
        }

        tracing::info!(
            node = %myself,
            peers = node.registry.len(),
            subnets = node.table.len(),
            "node initialized"
        );
        Ok(node)
    }

    /// Parse `text` and add it as a route of `owner`.
    pub fn add_subnet(&mut self, owner: &NodeName, text: &str) -> Result<RouteId, NodeError> {
        match self.table.add_spec(owner.clone(), text) {
            Ok(id) => {
                tracing::info!(owner = %owner, subnet = text, "learned subnet");
                Ok(id)
            }
            Err(source) => {
                tracing::warn!(owner = %owner, subnet = text, "rejected subnet: {source}");
                Err(NodeError::Subnet {
                    owner: owner.to_string(),
                    source,
                })
            }
        }
    }

    /// Route owning `address`, judged against the registry's reachability.
    pub fn lookup(&mut self, address: &Address) -> Option<&Route> {
        self.table.lookup(address, &self.registry)
    }

    /// Change a peer's reachability. Returns false for unknown nodes.
    pub fn set_reachable(&mut self, name: &NodeName, reachable: bool) -> bool {
        self.registry.set_reachable(name, reachable)
    }

    /// Script invocations for one owner, see [`script::subnet_update`].
    pub fn subnet_update(
        &self,
        owner: &NodeName,
        subnet: Option<&Subnet>,
        up: bool,
    ) -> Vec<ScriptInvocation> {
        script::subnet_update(&self.table, &self.registry, &self.env, owner, subnet, up)
    }

    /// Script invocations for every node's routes, this node first.
    pub fn subnet_update_all(&self, up: bool) -> Vec<ScriptInvocation> {
        let mut owners: Vec<&NodeName> = self.registry.peers().collect();
        owners.sort();
        std::iter::once(self.registry.myself())
            .chain(owners)
            .flat_map(|owner| self.subnet_update(owner, None, up))
            .collect()
    }

    /// Run `subnet-up` or `subnet-down` for every route. Returns how many
    /// scripts actually ran.
    pub async fn run_subnet_scripts(&self, up: bool) -> Result<usize, NodeError> {
        let invocations = self.subnet_update_all(up);
        self.scripts.run_all(&invocations).await
    }

    pub fn table(&self) -> &SubnetTable {
        &self.table
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }
}
