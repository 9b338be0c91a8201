//! `subnet-up` / `subnet-down` script hooks.
//!
//! Building the invocations is pure and separate from running them, so the
//! environment handed to a script can be checked without spawning anything.

use std::path::{Path, PathBuf};

use mesh_core::{NodeName, Subnet};
use mesh_routing::SubnetTable;

use crate::error::NodeError;
use crate::registry::NodeRegistry;

pub const SUBNET_UP: &str = "subnet-up";
pub const SUBNET_DOWN: &str = "subnet-down";

/// Node-wide values exported to every script.
#[derive(Debug, Clone, Default)]
pub struct ScriptEnvironment {
    pub netname: Option<String>,
    pub device: Option<String>,
    pub interface: Option<String>,
}

/// One script execution: its name and its environment, in export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    pub name: &'static str,
    pub env: Vec<(String, String)>,
}

impl ScriptInvocation {
    /// Value of an exported variable.
    #[must_use]
    pub fn var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Build the invocations announcing that `owner`'s subnets went up or down.
///
/// With `subnet` set, exactly one invocation is built for it. With `None`,
/// one is built per route of `owner` in local-index order.
pub fn subnet_update(
    table: &SubnetTable,
    registry: &NodeRegistry,
    env: &ScriptEnvironment,
    owner: &NodeName,
    subnet: Option<&Subnet>,
    up: bool,
) -> Vec<ScriptInvocation> {
    let name = if up { SUBNET_UP } else { SUBNET_DOWN };

    let mut base = vec![
        ("NETNAME".to_string(), env.netname.clone().unwrap_or_default()),
        ("DEVICE".to_string(), env.device.clone().unwrap_or_default()),
        ("INTERFACE".to_string(), env.interface.clone().unwrap_or_default()),
        ("NODE".to_string(), owner.to_string()),
    ];
    if !registry.is_myself(owner)
        && let Some(addr) = registry.get(owner).and_then(|info| info.address)
    {
        base.push(("REMOTEADDRESS".to_string(), addr.ip().to_string()));
        base.push(("REMOTEPORT".to_string(), addr.port().to_string()));
    }

    let invocation = |subnet: &Subnet| {
        let mut env = base.clone();
        env.push(("SUBNET".to_string(), subnet.to_string()));
        ScriptInvocation { name, env }
    };

    match subnet {
        Some(subnet) => vec![invocation(subnet)],
        None => table
            .routes_of(owner)
            .map(|route| invocation(route.subnet()))
            .collect(),
    }
}

/// Runs scripts from a directory.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    dir: PathBuf,
}

impl ScriptRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run one invocation and wait for it.
    ///
    /// Returns `Ok(false)` when the script does not exist.
    pub async fn run(&self, invocation: &ScriptInvocation) -> Result<bool, NodeError> {
        let path = self.dir.join(invocation.name);
        if !path.is_file() {
            tracing::debug!(script = %path.display(), "script not present, skipping");
            return Ok(false);
        }

        tracing::info!(
            script = invocation.name,
            node = invocation.var("NODE").unwrap_or_default(),
            subnet = invocation.var("SUBNET").unwrap_or_default(),
            "executing script"
        );

        let status = tokio::process::Command::new(&path)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .await?;

        if !status.success() {
            tracing::warn!(script = invocation.name, %status, "script failed");
            return Err(NodeError::Script {
                name: invocation.name.to_string(),
                status: status.to_string(),
            });
        }
        Ok(true)
    }

    /// Run invocations in order, stopping at the first failure.
    pub async fn run_all(&self, invocations: &[ScriptInvocation]) -> Result<usize, NodeError> {
        let mut ran = 0;
        for invocation in invocations {
            if self.run(invocation).await? {
                ran += 1;
            }
        }
        Ok(ran)
    }
}
