//! Error of chordring_core

use crate::dht::Did;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chordring-core.
///
/// Every variant is a local, synchronous failure. The core performs no I/O, so
/// none of them is transient and none is retried internally. A transport
/// wrapping the core is expected to turn them into remote error replies.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("Cannot find owner of key on an empty ring")]
    EmptyRing,

    #[error("Finger table of node {0} is not ready, slot {1} is empty")]
    IncompleteFingerTable(Did, usize),

    #[error("Node with did {0} is already a member of the ring")]
    DuplicateDid(Did),

    #[error("Lookup did not converge within {0} hops")]
    MaxHopsExceeded(usize),

    #[error("Forward to {0} does not move closer to the key {1}")]
    LookupNotConverging(Did, Did),

    #[error("Node {0} is not known to the resolver")]
    NodeNotFound(Did),

    #[error("Finger index {0} out of range")]
    FingerIndexOutOfRange(usize),

    #[error("Invalid rustc hexadecimal id")]
    BadCHexInCache,

    #[error("DHT Lock Error")]
    DHTSyncLockError,
}
