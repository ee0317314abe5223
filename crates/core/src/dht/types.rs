//! DHT traits at the seams between the routing core and its collaborators.
#![warn(missing_docs)]

use super::did::Did;
use super::node::Node;
use super::node::NodeAction;
use crate::error::Result;

/// Chord is a distributed hash table (DHT) algorithm that is designed to efficiently
/// locate the node responsible for a key. You may want to browse its
/// [wiki](https://en.wikipedia.org/wiki/Chord_(peer-to-peer)) before you read this.
///
/// Methods here only look at local state. When the answer is held by another node,
/// `find_successor` returns an `Action` telling the caller where to forward the
/// request, see [Router](super::Router) for the loop that follows those actions.
pub trait Chord<Action> {
    /// Ask the node for the successor of `did`.
    /// May return a remote action when the successor is recorded in another node.
    fn find_successor(&self, did: Did) -> Result<Action>;

    /// Best known hop toward `did`: the finger closest to, but not past, `did`.
    /// Returns the node itself when no finger qualifies.
    fn closest_preceding_node(&self, did: Did) -> Result<Did>;
}

/// The seam a transport implements to forward a lookup to another node.
///
/// In process, [Ring](super::Ring) resolves the did to a member and calls it
/// directly. A networked deployment wraps this in an RPC and maps every error into a
/// remote error reply.
pub trait ChordTransport {
    /// Let node `to` take one [Chord::find_successor] step for `did`.
    fn forward(&self, to: Did, did: Did) -> Result<NodeAction>;
}

/// Finger table maintenance.
///
/// The routing core only reads finger tables and predecessor pointers. Whoever fills
/// them implements this trait and pushes the result into [Node] with
/// [Node::update_fingers], [Node::set_finger] and [Node::set_predecessor].
pub trait Stabilization {
    /// Refresh the predecessor and every finger of `node`.
    fn stabilize(&self, node: &Node) -> Result<()>;

    /// Refresh a single finger of `node` and move its cursor to the next slot.
    /// Calling this `size` times in a row fixes the whole table.
    fn fix_fingers(&self, node: &Node) -> Result<()>;
}
