//! Human readable reports of lookups and ring state.
use std::fmt;

use chordring_core::dht::Did;
use chordring_core::dht::Node;
use chordring_core::dht::Ring;
use chordring_core::dht::Router;
use chordring_core::dht::RouterConfig;
use num_bigint::BigUint;

use crate::error::Result;

/// Owner of one key, resolved through both paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupReport {
    pub key: String,
    pub did: Did,
    /// Name and did from the global view.
    pub baseline: (String, Did),
    /// Owner found by walking finger tables from `origin`.
    pub routed: Did,
    pub origin: Did,
    pub hops: usize,
}

impl LookupReport {
    pub fn lookup(ring: &Ring, config: RouterConfig, origin: &Node, key: &str) -> Result<Self> {
        let baseline = ring.find_node(key)?;
        let route = Router::new(ring, config).find_node(origin, key)?;
        if route.owner != baseline.did {
            tracing::warn!(
                "routed owner {} differs from baseline owner {} for key {}",
                route.owner,
                baseline.did,
                key
            );
        }
        Ok(Self {
            key: key.to_string(),
            did: ring.hash_key(key),
            baseline: (baseline.name().to_string(), baseline.did),
            routed: route.owner,
            origin: origin.did,
            hops: route.hops(),
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.baseline.1 == self.routed
    }
}

impl fmt::Display for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node responsible for '{}': {} ({} {}) | key {} routed from {} in {} hops",
            self.key,
            BigUint::from(self.baseline.1),
            self.baseline.0,
            self.baseline.1,
            self.did,
            self.origin,
            self.hops
        )?;
        if !self.is_consistent() {
            write!(f, " [MISMATCH: {}]", self.routed)?;
        }
        Ok(())
    }
}

/// Topology of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReport {
    pub name: String,
    pub did: Did,
    pub predecessor: Option<Did>,
    pub successor: Option<Did>,
    /// Distinct members referenced by the finger table.
    pub distinct_fingers: usize,
    pub entries: usize,
}

impl NodeReport {
    pub fn inspect(node: &Node) -> Result<Self> {
        let finger = node.finger_snapshot()?;
        let mut distinct: Vec<Did> = finger.list().iter().flatten().copied().collect();
        distinct.sort();
        distinct.dedup();
        Ok(Self {
            name: node.name().to_string(),
            did: node.did,
            predecessor: node.predecessor()?,
            successor: node.successor()?,
            distinct_fingers: distinct.len(),
            entries: node.entries().len(),
        })
    }

    pub fn inspect_ring(ring: &Ring) -> Result<Vec<Self>> {
        ring.members()?
            .iter()
            .map(|n| Self::inspect(n))
            .collect()
    }
}

fn fmt_opt(did: &Option<Did>) -> String {
    did.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for NodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}\n  predecessor: {}\n  successor:   {}\n  fingers:     {} distinct\n  entries:     {}",
            self.name,
            self.did,
            fmt_opt(&self.predecessor),
            fmt_opt(&self.successor),
            self.distinct_fingers,
            self.entries
        )
    }
}
