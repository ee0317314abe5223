use std::sync::Arc;

use crate::dht::Did;
use crate::dht::Node;
use crate::dht::Ring;

pub mod default;

#[allow(dead_code)]
pub fn setup_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

/// Ring with nodes at the given dids, named after them.
pub fn gen_ring(dids: &[Did]) -> Ring {
    let ring = Ring::new();
    for did in dids {
        ring.add_node(Node::new_with_did(&did.to_string(), *did, 160))
            .unwrap();
    }
    ring
}

/// Ring of nodes named `node0..noden`, with stabilized finger tables.
pub fn gen_named_ring(n: usize) -> (Ring, Vec<Arc<Node>>) {
    let ring = Ring::new();
    let nodes = (0..n)
        .map(|i| ring.add_node(Node::new(&format!("node{i}"))).unwrap())
        .collect();
    ring.stabilize_all().unwrap();
    (ring, nodes)
}
