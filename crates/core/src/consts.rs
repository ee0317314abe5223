//! Constant variables.

/// Width of the identifier space in bits. A did is a SHA-1 digest.
pub const DID_BITS: usize = 160;
/// Number of finger table slots, one per bit of the identifier space.
pub const FINGER_TABLE_SIZE: usize = DID_BITS;
/// Hop ceiling for a decentralized lookup.
/// A well formed ring converges in O(log N) hops, far below this.
pub const DEFAULT_MAX_HOPS: usize = DID_BITS;
