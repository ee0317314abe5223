#![warn(missing_docs)]

//! Identifier space of the ring.
//!
//! A [Did] is an element of the finite cyclic group Z/(2^160), wrapping an H160.
//! Node names and keys are hashed into the same space with SHA-1, whose digest is
//! exactly 160 bits wide, so hashing needs no extra reduction.
//!
//! Arithmetic (`+`, `-`, negation) wraps around 2^160. Plain `Ord` on [Did] is the
//! numeric order of the underlying integer, which is only meaningful on a ring once a
//! reference point is chosen. For clockwise comparisons use [Did::in_range], or a
//! [BiasId] that moves the zero point to a given did.

use std::cmp::PartialEq;
use std::ops::Add;
use std::ops::Deref;
use std::ops::Neg;
use std::ops::Sub;
use std::str::FromStr;

use ethereum_types::H160;
use num_bigint::BigUint;
use serde::Deserialize;
use serde::Serialize;
use sha1::Digest;
use sha1::Sha1;

use crate::consts::DID_BITS;
use crate::error::Error;
use crate::error::Result;

/// Did is a finite Ring R(P) where P = 2^160, wrap H160.
#[derive(Copy, Clone, Eq, Ord, PartialEq, PartialOrd, Debug, Serialize, Deserialize, Hash)]
pub struct Did(H160);

impl std::fmt::Display for Did {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let inner = &self.0;
        write!(f, "0x{inner:x}")
    }
}

/// A Did observed from a reference point.
/// `BiasId::new(bias, did)` stores `did - bias`, so comparing two BiasIds with the same
/// bias compares their clockwise distance from `bias`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, Hash)]
pub struct BiasId {
    /// the zero point for determine order of Did.
    bias: Did,
    /// did data without bias.
    did: Did,
}

impl BiasId {
    /// Wrap a Did into BiasDid with given bias.
    pub fn new(bias: Did, did: Did) -> BiasId {
        BiasId {
            bias,
            did: did - bias,
        }
    }

    /// Get wrapped biased value from did
    pub fn to_did(self) -> Did {
        self.did + self.bias
    }

    /// Clockwise distance from the bias to the wrapped did.
    pub fn pos(&self) -> Did {
        self.did
    }
}

impl PartialOrd for BiasId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BiasId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if other.bias != self.bias {
            let did: Did = (*other).into();
            let bid = BiasId::new(self.bias, did);
            self.did.cmp(&bid.did)
        } else {
            self.did.cmp(&other.did)
        }
    }
}

impl From<BiasId> for Did {
    fn from(id: BiasId) -> Did {
        BiasId::to_did(id)
    }
}

impl Did {
    /// Hash an arbitrary string into the identifier space.
    /// Node names and keys go through the same function, so both live on one ring.
    pub fn hash(key: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(key.as_bytes());
        let digest = hasher.finalize();
        Self(H160::from_slice(&digest))
    }

    /// Test `self` in the clockwise interval `(start, end]`.
    ///
    /// Start is exclusive and end is inclusive, whether or not the interval wraps
    /// past 2^160 - 1. Chaining such intervals around the ring covers every did
    /// exactly once.
    pub fn in_range(&self, start: Self, end: Self) -> bool {
        if start <= end {
            start < *self && *self <= end
        } else {
            *self > start || *self <= end
        }
    }

    /// Start of the `k`-th finger (0-based): `self + 2^k mod 2^160`.
    pub fn finger_start(&self, k: usize) -> Self {
        *self + Did::from(BigUint::from(1u8) << k)
    }

    /// Transform Did to BiasDid
    pub fn bias(&self, did: Self) -> BiasId {
        BiasId::new(did, *self)
    }
}

fn modulus() -> BigUint {
    BigUint::from(1u8) << DID_BITS
}

impl Deref for Did {
    type Target = H160;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Did> for H160 {
    fn from(a: Did) -> Self {
        a.0
    }
}

impl From<H160> for Did {
    fn from(addr: H160) -> Self {
        Self(addr)
    }
}

impl From<Did> for BigUint {
    fn from(did: Did) -> BigUint {
        BigUint::from_bytes_be(did.as_bytes())
    }
}

impl From<BigUint> for Did {
    fn from(a: BigUint) -> Self {
        let reduced = a % modulus();
        let mut va: Vec<u8> = reduced.to_bytes_be();
        let mut res = vec![0u8; 20 - va.len()];
        res.append(&mut va);
        Self(H160::from_slice(&res))
    }
}

impl From<u32> for Did {
    fn from(id: u32) -> Did {
        Self::from(BigUint::from(id))
    }
}

impl FromStr for Did {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self(H160::from_str(s).map_err(|_| Error::BadCHexInCache)?))
    }
}

// impl Finite Ring For Did
impl Neg for Did {
    type Output = Self;
    fn neg(self) -> Self {
        (modulus() - BigUint::from(self)).into()
    }
}

impl<'a> Neg for &'a Did {
    type Output = Did;

    fn neg(self) -> Self::Output {
        (*self).neg()
    }
}

impl Add for Did {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        (BigUint::from(self) + BigUint::from(rhs)).into()
    }
}

impl Sub for Did {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_did() {
        let a = Did::from_str("0x11E807fcc88dD319270493fB2e822e388Fe36ab0").unwrap();
        let b = Did::from_str("0x999999cf1046e68e36E1aA2E0E07105eDDD1f08E").unwrap();
        let c = Did::from_str("0xc0ffee254729296a45a3885639AC7E10F9d54979").unwrap();
        assert!(c > b && b > a);
    }

    #[test]
    fn test_hash_is_sha1() {
        assert_eq!(
            Did::hash("hello").to_string(),
            "0xaaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert_eq!(Did::hash("node1"), Did::hash("node1"));
        assert_ne!(Did::hash("node1"), Did::hash("node2"));
    }

    #[test]
    fn test_finite_ring_neg() {
        let zero = Did::from(0u32);
        let a = Did::from_str("0x11E807fcc88dD319270493fB2e822e388Fe36ab0").unwrap();
        assert_eq!(-a + a, zero);
        assert_eq!(-(-a), a);
        assert_eq!(-zero, zero);
    }

    #[test]
    fn test_wrap_around_modulus() {
        let max = Did::from_str("0xffffffffffffffffffffffffffffffffffffffff").unwrap();
        assert_eq!(max + Did::from(1u32), Did::from(0u32));
        assert_eq!(Did::from(0u32) - Did::from(1u32), max);
        assert_eq!(Did::from(modulus()), Did::from(0u32));
    }

    #[test]
    fn test_in_range_without_wrap() {
        let (start, end) = (Did::from(10u32), Did::from(60u32));
        assert!(Did::from(11u32).in_range(start, end));
        assert!(Did::from(60u32).in_range(start, end));
        assert!(!Did::from(10u32).in_range(start, end));
        assert!(!Did::from(61u32).in_range(start, end));
        assert!(!Did::from(5u32).in_range(start, end));
    }

    #[test]
    fn test_in_range_with_wrap() {
        let (start, end) = (Did::from(180u32), Did::from(10u32));
        assert!(Did::from(250u32).in_range(start, end));
        assert!(Did::from(0u32).in_range(start, end));
        assert!(Did::from(10u32).in_range(start, end));
        assert!(!Did::from(180u32).in_range(start, end));
        assert!(!Did::from(60u32).in_range(start, end));
    }

    #[test]
    fn test_in_range_boundaries() {
        let samples = [0u32, 1, 10, 60, 180, 255, u32::MAX];
        for s in samples {
            for e in samples {
                let (start, end) = (Did::from(s), Did::from(e));
                assert!(end.in_range(start, end) || start == end);
                assert!(!start.in_range(start, end));
            }
        }
    }

    #[test]
    fn test_in_range_degenerate_interval() {
        // (x, x] is empty when start == end.
        let x = Did::from(42u32);
        assert!(!x.in_range(x, x));
        assert!(!Did::from(43u32).in_range(x, x));
    }

    #[test]
    fn test_finger_start() {
        let did = Did::from(10u32);
        assert_eq!(did.finger_start(0), Did::from(11u32));
        assert_eq!(did.finger_start(3), Did::from(18u32));
        let max = Did::from_str("0xffffffffffffffffffffffffffffffffffffffff").unwrap();
        assert_eq!(max.finger_start(0), Did::from(0u32));
        assert_eq!(
            Did::from(0u32).finger_start(159),
            Did::from_str("0x8000000000000000000000000000000000000000").unwrap()
        );
    }

    #[test]
    fn test_bias_order() {
        let base = Did::from(200u32);
        let near = Did::from(210u32);
        let far = Did::from(5u32);
        assert!(near > far);
        assert!(near.bias(base) < far.bias(base));
        assert_eq!(Did::from(near.bias(base)), near);
    }

    #[test]
    fn test_dump_and_load() {
        assert!(Did::from_str("0x11E807fcc88dD319270493fB2e822e388Fe36ab").is_err());
        assert_eq!(
            Did::from_str("11E807fcc88dD319270493fB2e822e388Fe36ab0").unwrap(),
            Did::from_str("0x11E807fcc88dD319270493fB2e822e388Fe36ab0").unwrap(),
        );

        let did = Did::from_str("0x11E807fcc88dD319270493fB2e822e388Fe36ab0").unwrap();
        assert_eq!(
            serde_json::to_string(&did).unwrap(),
            "\"0x11e807fcc88dd319270493fb2e822e388fe36ab0\""
        );
        let back =
            serde_json::from_str::<Did>("\"0x11e807fcc88dd319270493fb2e822e388fe36ab0\"").unwrap();
        assert_eq!(back, did);
        assert_eq!(
            format!("{}", did),
            "0x11e807fcc88dd319270493fb2e822e388fe36ab0"
        );
    }
}
