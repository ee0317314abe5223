#![warn(missing_docs)]
use std::ops::Index;

use derivative::Derivative;
use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;

/// Finger table of Chord DHT.
///
/// Slot `k` (0-based) refers to the member responsible for `did + 2^k`, so slot 0 is
/// the successor of the node. Entries are routing references only: they name a member
/// by its [Did] and never own it.
#[derive(Derivative, Clone, Debug, Serialize, Deserialize)]
#[derivative(PartialEq)]
pub struct FingerTable {
    did: Did,
    size: usize,
    finger: Vec<Option<Did>>,
    #[derivative(PartialEq = "ignore")]
    pub(super) fix_finger_index: usize,
}

impl FingerTable {
    /// builder
    pub fn new(did: Did, size: usize) -> Self {
        Self {
            did,
            size,
            finger: vec![None; size],
            fix_finger_index: 0,
        }
    }

    /// Number of slots, populated or not.
    pub fn size(&self) -> usize {
        self.size
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<Did> {
        if index >= self.finger.len() {
            return None;
        }
        self.finger[index]
    }

    /// ref getter
    pub fn get_ref(&self, index: usize) -> &Option<Did> {
        if index >= self.finger.len() {
            return &None;
        }
        &self.finger[index]
    }

    /// setter
    /// A finger may point back to the owner of the table, which happens whenever no
    /// other member lies between `did + 2^k` and the owner.
    pub fn set(&mut self, index: usize, did: Did) -> Result<()> {
        tracing::debug!("set finger table index: {} did: {}", index, did);
        if index >= self.finger.len() {
            tracing::error!("set finger index out of range, index: {}", index);
            return Err(Error::FingerIndexOutOfRange(index));
        }
        self.finger[index] = Some(did);
        Ok(())
    }

    /// Replace every slot at once. `fingers` must hold exactly `size` entries.
    pub fn update(&mut self, fingers: Vec<Did>) -> Result<()> {
        if fingers.len() != self.size {
            return Err(Error::FingerIndexOutOfRange(fingers.len()));
        }
        self.finger = fingers.into_iter().map(Some).collect();
        Ok(())
    }

    /// setter for fix_finger_index
    pub fn set_fix(&mut self, did: Did) -> Result<()> {
        let index = self.fix_finger_index;
        self.set(index, did)
    }

    /// Successor of the owner, if known.
    pub fn successor(&self) -> Option<Did> {
        self.get(0)
    }

    /// Index of the first empty slot.
    pub fn first_empty(&self) -> Option<usize> {
        self.finger.iter().position(|x| x.is_none())
    }

    /// All slots are populated.
    pub fn is_complete(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Check finger is contains some node
    pub fn contains(&self, did: Did) -> bool {
        self.finger.contains(&Some(did))
    }

    /// Closest preceding node of `did` among the fingers.
    ///
    /// Slots are scanned from the coarsest down to the finest, and the first finger
    /// lying in `(self.did, did]` wins, which covers the longest distance per hop.
    /// When no finger qualifies the owner itself is returned.
    ///
    /// Every slot must be populated. An empty slot is reported as
    /// [Error::IncompleteFingerTable] instead of being skipped.
    pub fn closest_preceding_node(&self, did: Did) -> Result<Did> {
        if let Some(index) = self.first_empty() {
            return Err(Error::IncompleteFingerTable(self.did, index));
        }

        for v in self.finger.iter().rev().flatten() {
            if v.in_range(self.did, did) {
                return Ok(*v);
            }
        }

        Ok(self.did)
    }

    /// get length of finger
    pub fn len(&self) -> usize {
        self.finger.iter().flatten().count()
    }

    /// is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// get finger list
    pub fn list(&self) -> &Vec<Option<Did>> {
        &self.finger
    }

    #[cfg(test)]
    pub fn reset_finger(&mut self) {
        self.finger = vec![None; self.size]
    }
}

impl Index<usize> for FingerTable {
    type Output = Option<Did>;
    fn index(&self, index: usize) -> &Self::Output {
        self.get_ref(index)
    }
}
