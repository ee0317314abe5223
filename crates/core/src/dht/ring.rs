//! Global membership of the ring and the baseline owner lookup.
#![warn(missing_docs)]
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use super::node::Node;
use super::node::NodeAction;
use super::types::Chord;
use super::types::ChordTransport;
use super::types::Stabilization;
use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;

/// Ring keeps every member ordered by [Did].
///
/// It is the global view of the network. [Ring::find_node] answers by binary search
/// over that view, which a real deployment can't afford but which is handy to
/// bootstrap finger tables and to check the decentralized lookup against.
///
/// Every read and write of the membership happens under one lock held for the whole
/// operation, so a lookup always sees the ring after some prefix of completed
/// [Ring::add_node] calls.
#[derive(Debug, Default)]
pub struct Ring {
    members: Mutex<Vec<Arc<Node>>>,
}

/// Successor of `did` in a sorted slice: first element `>= did`, wrapping to the
/// first one.
fn successor_in(dids: &[Did], did: Did) -> Result<Did> {
    if dids.is_empty() {
        return Err(Error::EmptyRing);
    }
    let index = dids.partition_point(|x| *x < did) % dids.len();
    Ok(dids[index])
}

/// Predecessor of `did` in a sorted slice: last element `< did`, wrapping to the
/// last one.
fn predecessor_in(dids: &[Did], did: Did) -> Result<Did> {
    if dids.is_empty() {
        return Err(Error::EmptyRing);
    }
    let index = dids.partition_point(|x| *x < did);
    Ok(dids[(index + dids.len() - 1) % dids.len()])
}

impl Ring {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock and return MutexGuard of members.
    fn lock_members(&self) -> Result<MutexGuard<Vec<Arc<Node>>>> {
        self.members.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Hash a string key into the identifier space.
    pub fn hash_key(&self, key: &str) -> Did {
        Did::hash(key)
    }

    /// Insert a node, keeping members sorted by did.
    ///
    /// A node whose did is already taken is rejected with [Error::DuplicateDid] and
    /// the ring is left unchanged.
    pub fn add_node<N: Into<Arc<Node>>>(&self, node: N) -> Result<Arc<Node>> {
        let node = node.into();
        let mut members = self.lock_members()?;
        match members.binary_search_by_key(&node.did, |n| n.did) {
            Ok(_) => {
                tracing::warn!("reject node {}, did {} is taken", node.name(), node.did);
                Err(Error::DuplicateDid(node.did))
            }
            Err(pos) => {
                members.insert(pos, node.clone());
                tracing::info!(
                    "node {} joined ring with did {}, members: {}",
                    node.name(),
                    node.did,
                    members.len()
                );
                Ok(node)
            }
        }
    }

    /// Find the member responsible for `key`.
    pub fn find_node(&self, key: &str) -> Result<Arc<Node>> {
        self.find_node_by_did(self.hash_key(key))
    }

    /// Find the member responsible for `did`: the first member whose did is `>= did`,
    /// or the first member when `did` is past all of them.
    pub fn find_node_by_did(&self, did: Did) -> Result<Arc<Node>> {
        let members = self.lock_members()?;
        if members.is_empty() {
            return Err(Error::EmptyRing);
        }
        let index = members.partition_point(|n| n.did < did) % members.len();
        Ok(members[index].clone())
    }

    /// Get a member by did.
    pub fn get(&self, did: Did) -> Result<Option<Arc<Node>>> {
        let members = self.lock_members()?;
        Ok(members
            .binary_search_by_key(&did, |n| n.did)
            .ok()
            .map(|i| members[i].clone()))
    }

    /// Snapshot of all members in ring order.
    pub fn members(&self) -> Result<Vec<Arc<Node>>> {
        Ok(self.lock_members()?.clone())
    }

    /// Dids of all members in ring order.
    pub fn dids(&self) -> Result<Vec<Did>> {
        Ok(self.lock_members()?.iter().map(|n| n.did).collect())
    }

    /// Number of members.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock_members()?.len())
    }

    /// is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock_members()?.is_empty())
    }

    /// Store an entry on the member responsible for `key`.
    pub fn put(&self, key: &str, value: &str) -> Result<Arc<Node>> {
        let owner = self.find_node(key)?;
        owner.put(key, value);
        tracing::debug!("put key {} on node {}", key, owner.did);
        Ok(owner)
    }

    /// Read an entry from the member responsible for `key`.
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.find_node(key)?.get(key))
    }

    /// Rebuild predecessor and finger table of every member from the global view.
    pub fn stabilize_all(&self) -> Result<()> {
        for node in self.members()? {
            self.stabilize(&node)?;
        }
        Ok(())
    }
}

impl ChordTransport for Ring {
    fn forward(&self, to: Did, did: Did) -> Result<NodeAction> {
        let node = self.get(to)?.ok_or(Error::NodeNotFound(to))?;
        node.find_successor(did)
    }
}

impl Stabilization for Ring {
    /// Slot `k` of `node` becomes the successor of `node.did + 2^k` and the
    /// predecessor becomes the member right before `node` on the ring.
    /// A node alone on the ring is its own predecessor and fills every slot.
    fn stabilize(&self, node: &Node) -> Result<()> {
        let dids = self.dids()?;
        let size = node.lock_finger()?.size();

        let fingers = (0..size)
            .map(|k| successor_in(&dids, node.did.finger_start(k)))
            .collect::<Result<Vec<Did>>>()?;
        let pred = predecessor_in(&dids, node.did)?;

        node.update_fingers(fingers)?;
        node.set_predecessor(pred)?;
        tracing::debug!("stabilized node {}, predecessor: {}", node.did, pred);
        Ok(())
    }

    fn fix_fingers(&self, node: &Node) -> Result<()> {
        let dids = self.dids()?;
        let mut finger = node.lock_finger()?;

        let index = finger.fix_finger_index;
        let did = successor_in(&dids, node.did.finger_start(index))?;
        finger.set_fix(did)?;
        finger.fix_finger_index = (index + 1) % finger.size();
        Ok(())
    }
}
