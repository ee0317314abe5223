use std::sync::Arc;
use std::thread;

use crate::dht::Did;
use crate::dht::Node;
use crate::dht::Ring;
use crate::dht::Router;
use crate::dht::RouterConfig;
use crate::error::Error;

#[test]
fn test_concurrent_add_node() {
    let ring = Arc::new(Ring::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let ring = ring.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    ring.add_node(Node::new(&format!("node-{t}-{i}"))).unwrap();
                    // readers interleave with writers
                    ring.find_node(&format!("key-{t}-{i}")).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let dids = ring.dids().unwrap();
    assert_eq!(dids.len(), 200);
    assert!(dids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_concurrent_duplicates_admit_one() {
    let ring = Arc::new(Ring::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ring = ring.clone();
            thread::spawn(move || ring.add_node(Node::new("same-name")))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == Error::DuplicateDid(Did::hash("same-name"))));
    assert_eq!(ring.len().unwrap(), 1);
}

#[test]
fn test_lookup_while_refreshing() {
    let ring = Arc::new(Ring::new());
    for i in 0..16 {
        ring.add_node(Node::new(&format!("node{i}"))).unwrap();
    }
    ring.stabilize_all().unwrap();

    let refresher = {
        let ring = ring.clone();
        thread::spawn(move || {
            for _ in 0..20 {
                ring.stabilize_all().unwrap();
            }
        })
    };
    let members = ring.members().unwrap();
    let router = Router::new(ring.as_ref(), RouterConfig::default());
    for i in 0..200 {
        let key = format!("key{i}");
        let route = router.find_node(&members[i % members.len()], &key).unwrap();
        assert_eq!(route.owner, ring.find_node(&key).unwrap().did);
    }
    refresher.join().unwrap();
}
