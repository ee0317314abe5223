//! Drive a decentralized lookup hop by hop.
#![warn(missing_docs)]

use serde::Deserialize;
use serde::Serialize;

use super::node::Node;
use super::node::NodeAction;
use super::node::RemoteAction;
use super::types::Chord;
use super::types::ChordTransport;
use crate::consts::DEFAULT_MAX_HOPS;
use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;

/// Router configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Give up after this many forwards. Each hop must strictly shrink the clockwise
    /// distance to the key, so only a misbehaving transport can hit this.
    pub max_hops: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// Result of a decentralized lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The node responsible for the key.
    pub owner: Did,
    /// Nodes that handled the request, starting with the origin.
    pub path: Vec<Did>,
}

impl Route {
    /// Number of forwards it took to reach the answer.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Follows [NodeAction::RemoteAction]s through a [ChordTransport] until some node
/// answers.
pub struct Router<'a, T: ChordTransport + ?Sized> {
    transport: &'a T,
    config: RouterConfig,
}

impl<'a, T: ChordTransport + ?Sized> Router<'a, T> {
    /// Create a router on top of a transport.
    pub fn new(transport: &'a T, config: RouterConfig) -> Self {
        Self { transport, config }
    }

    /// Find the owner of `did`, starting the search at `from`.
    pub fn find_successor(&self, from: &Node, did: Did) -> Result<Route> {
        let mut path = vec![from.did];
        let mut action = from.find_successor(did)?;

        loop {
            match action {
                NodeAction::Some(owner) => {
                    tracing::debug!(
                        "lookup of {} from {} done in {} hops, owner: {}",
                        did,
                        from.did,
                        path.len() - 1,
                        owner
                    );
                    return Ok(Route { owner, path });
                }
                NodeAction::RemoteAction(next, RemoteAction::FindSuccessor(target)) => {
                    if path.len() > self.config.max_hops {
                        tracing::error!(
                            "lookup of {} from {} exceeded {} hops, path: {:?}",
                            did,
                            from.did,
                            self.config.max_hops,
                            path
                        );
                        return Err(Error::MaxHopsExceeded(self.config.max_hops));
                    }
                    // `next` must lie in `(current, target]` seen from `current`.
                    let current = path[path.len() - 1];
                    if next == current || next.bias(current) > target.bias(current) {
                        tracing::error!(
                            "lookup of {} from {} forwarded by {} to {}, path: {:?}",
                            did,
                            from.did,
                            current,
                            next,
                            path
                        );
                        return Err(Error::LookupNotConverging(next, target));
                    }
                    path.push(next);
                    action = self.transport.forward(next, target)?;
                }
            }
        }
    }

    /// Hash `key` and find its owner, starting the search at `from`.
    pub fn find_node(&self, from: &Node, key: &str) -> Result<Route> {
        self.find_successor(from, Did::hash(key))
    }
}
