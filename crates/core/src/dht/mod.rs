#![warn(missing_docs)]
//! Implementation of the ring's DHT
//! which is based on CHORD, ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

pub mod did;
/// Finger table of a node
pub mod finger;
pub mod node;
pub mod ring;
pub mod router;
pub mod types;

pub use did::Did;
pub use finger::FingerTable;
pub use node::Entry;
pub use node::Node;
pub use node::NodeAction;
pub use node::RemoteAction;
pub use ring::Ring;
pub use router::Route;
pub use router::Router;
pub use router::RouterConfig;
pub use types::Chord;
pub use types::ChordTransport;
pub use types::Stabilization;
