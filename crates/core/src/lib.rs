//! chordring-core
//! ===============
//!
//! Routing core of a minimal Chord DHT. It answers one question, "which node of the
//! ring owns key K", in two ways:
//!
//! * [dht::Ring::find_node] keeps a global, sorted view of the membership and resolves
//!   the owner by binary search. This is the baseline used for bootstrapping and tests.
//! * [dht::Router::find_successor] starts from any [dht::Node] and follows finger
//!   tables hop by hop, so that no single node needs the whole membership.
//!
//! Network transport, persistence and finger table maintenance are outside of this
//! crate. They plug in through [dht::ChordTransport] and [dht::Stabilization].
#![warn(missing_docs)]

pub mod consts;
pub mod dht;
pub mod error;
pub mod storage;

#[cfg(test)]
mod tests;
