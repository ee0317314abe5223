//! A ring member and its local half of the Chord lookup.
#![warn(missing_docs)]
use std::sync::Mutex;
use std::sync::MutexGuard;

use super::types::Chord;
use super::FingerTable;
use crate::consts::FINGER_TABLE_SIZE;
use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;
use crate::storage::MemStorage;

/// A key value entry held directly by a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Original key, before hashing.
    pub key: String,
    /// Stored value.
    pub value: String,
}

/// `Node` use this to describe the result of [Chord::find_successor]. Sometimes it's a
/// direct result, sometimes it's an action that is continued on another node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeAction {
    /// Found the owner.
    Some(Did),
    /// Forward the request to the node of the first field.
    RemoteAction(Did, RemoteAction),
}

/// Work to be done by a remote node.
/// In `NodeAction::RemoteAction(did_a, action)`, `did_a` is the node that should
/// perform `action`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteAction {
    /// Need `did_a` to find the successor of `did_b`.
    FindSuccessor(Did),
}

impl NodeAction {
    /// Returns `true` if the action is a [NodeAction::Some] value.
    pub fn is_some(&self) -> bool {
        matches!(self, Self::Some(_))
    }

    /// Returns `true` if the action is a [NodeAction::RemoteAction] value.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteAction(..))
    }
}

/// A member of the ring.
///
/// It stores some entries directly and keeps a [FingerTable] of routing references to
/// other members. The finger table and the predecessor are pushed in from outside,
/// see [Stabilization](super::Stabilization). Both are guarded by their own lock so a
/// refresh can run next to lookups.
#[derive(Debug)]
pub struct Node {
    /// The did of current node.
    pub did: Did,
    name: String,
    finger: Mutex<FingerTable>,
    predecessor: Mutex<Option<Did>>,
    storage: MemStorage<Did, Entry>,
}

impl Node {
    /// Create a node whose did is the hash of `name`.
    pub fn new(name: &str) -> Self {
        Self::new_with_did(name, Did::hash(name), FINGER_TABLE_SIZE)
    }

    /// Create a node with an explicit did and finger table size.
    pub fn new_with_did(name: &str, did: Did, finger_size: usize) -> Self {
        Self {
            did,
            name: name.to_string(),
            finger: Mutex::new(FingerTable::new(did, finger_size)),
            predecessor: Mutex::new(None),
            storage: MemStorage::new(),
        }
    }

    /// Logical name the node was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lock and return MutexGuard of finger table.
    pub fn lock_finger(&self) -> Result<MutexGuard<FingerTable>> {
        self.finger.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of predecessor.
    pub fn lock_predecessor(&self) -> Result<MutexGuard<Option<Did>>> {
        self.predecessor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Set a single finger.
    pub fn set_finger(&self, index: usize, did: Did) -> Result<()> {
        self.lock_finger()?.set(index, did)
    }

    /// Replace the whole finger table.
    pub fn update_fingers(&self, fingers: Vec<Did>) -> Result<()> {
        self.lock_finger()?.update(fingers)
    }

    /// Set the predecessor pointer.
    pub fn set_predecessor(&self, did: Did) -> Result<()> {
        *self.lock_predecessor()? = Some(did);
        Ok(())
    }

    /// Current predecessor, if known.
    pub fn predecessor(&self) -> Result<Option<Did>> {
        Ok(*self.lock_predecessor()?)
    }

    /// Current successor, which is the first finger.
    pub fn successor(&self) -> Result<Option<Did>> {
        Ok(self.lock_finger()?.successor())
    }

    /// Copy of the finger table.
    pub fn finger_snapshot(&self) -> Result<FingerTable> {
        Ok(self.lock_finger()?.clone())
    }

    /// A node is ready for decentralized lookup once every finger is populated.
    pub fn is_ready(&self) -> Result<bool> {
        Ok(self.lock_finger()?.is_complete())
    }

    /// Store an entry locally, returning the previous value.
    pub fn put(&self, key: &str, value: &str) -> Option<String> {
        let entry = Entry {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.storage
            .set(&Did::hash(key), entry)
            .map(|old| old.value)
    }

    /// Get a locally stored value.
    pub fn get(&self, key: &str) -> Option<String> {
        self.storage.get(&Did::hash(key)).map(|e| e.value)
    }

    /// Check whether an entry with this hashed key is stored locally.
    pub fn contains(&self, did: &Did) -> bool {
        self.storage.contains_key(did)
    }

    /// All entries stored locally.
    pub fn entries(&self) -> Vec<Entry> {
        self.storage.items().into_iter().map(|(_, e)| e).collect()
    }
}

impl Chord<NodeAction> for Node {
    /// One step of the successor search.
    ///
    /// Apart from keys stored here, a node with an empty finger slot refuses to route
    /// and fails with [Error::IncompleteFingerTable].
    ///
    /// The node answers itself when the key is stored here, or when the key falls in
    /// `(predecessor, self]`. It answers its successor when the key falls in
    /// `(self, successor]`. Otherwise it names the closest preceding finger as the
    /// next hop. A closest preceding node equal to self ends the search at self.
    fn find_successor(&self, did: Did) -> Result<NodeAction> {
        if self.contains(&did) {
            return Ok(NodeAction::Some(self.did));
        }

        let finger = self.lock_finger()?;
        if let Some(index) = finger.first_empty() {
            return Err(Error::IncompleteFingerTable(self.did, index));
        }

        if let Some(pred) = self.predecessor()? {
            if did.in_range(pred, self.did) {
                return Ok(NodeAction::Some(self.did));
            }
        }

        if let Some(succ) = finger.successor() {
            if did.in_range(self.did, succ) {
                return Ok(NodeAction::Some(succ));
            }
        }

        let next = finger.closest_preceding_node(did)?;
        let ret = if next == self.did {
            NodeAction::Some(self.did)
        } else {
            NodeAction::RemoteAction(next, RemoteAction::FindSuccessor(did))
        };

        tracing::debug!(
            "find_successor: self: {}, did: {}, result: {:?}",
            self.did,
            did,
            ret
        );

        Ok(ret)
    }

    fn closest_preceding_node(&self, did: Did) -> Result<Did> {
        self.lock_finger()?.closest_preceding_node(did)
    }
}
