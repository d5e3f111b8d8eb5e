use crate::error::{AddInitiator, ApiError, ListInitiators, ReconcileError, RemoveInitiator};
use async_trait::async_trait;
use snafu::ResultExt;
use std::collections::BTreeSet;
use tracing::debug;

/// A cluster node which must have access to volumes mapped to an initiator
/// group, identified by its name and its initiator qualified name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NodeAccess {
    /// Name of the node.
    pub name: String,
    /// The node's initiator qualified name.
    pub iqn: String,
}

impl NodeAccess {
    /// New `NodeAccess` from a node name and its IQN.
    pub fn new(name: impl Into<String>, iqn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iqn: iqn.into(),
        }
    }
}

/// Initiator group operations on the array.
/// Implemented by the array management client; tests inject a fake.
#[async_trait]
pub trait IgroupOps: Send + Sync {
    /// List the IQNs currently members of the given initiator group.
    async fn list_initiators(&self, igroup: &str) -> Result<Vec<String>, ApiError>;
    /// Add an initiator to the given initiator group.
    async fn add_initiator(&self, igroup: &str, iqn: &str) -> Result<(), ApiError>;
    /// Remove an initiator from the given initiator group.
    async fn remove_initiator(&self, igroup: &str, iqn: &str) -> Result<(), ApiError>;
}

/// Bring the membership of an initiator group in line with the given nodes:
/// initiators no node claims are removed, missing ones are added.
///
/// Idempotent when the membership already matches. The individual add and
/// remove calls are not transactional: the first failure aborts the pass and
/// already applied changes stand, to be converged by a later pass.
pub async fn reconcile_node_access(
    client: &impl IgroupOps,
    igroup: &str,
    nodes: &[NodeAccess],
) -> Result<(), ReconcileError> {
    let current: BTreeSet<String> = client
        .list_initiators(igroup)
        .await
        .context(ListInitiators { igroup })?
        .into_iter()
        .collect();
    let desired: BTreeSet<&str> = nodes.iter().map(|node| node.iqn.as_str()).collect();

    for iqn in current.iter().filter(|iqn| !desired.contains(iqn.as_str())) {
        debug!(igroup, %iqn, "Removing stale initiator from igroup");
        client
            .remove_initiator(igroup, iqn)
            .await
            .context(RemoveInitiator { igroup, iqn })?;
    }
    for iqn in desired.iter().filter(|iqn| !current.contains(**iqn)) {
        debug!(igroup, %iqn, "Adding missing initiator to igroup");
        client
            .add_initiator(igroup, iqn)
            .await
            .context(AddInitiator { igroup, iqn: *iqn })?;
    }
    Ok(())
}
