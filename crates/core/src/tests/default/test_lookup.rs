use rand::Rng;

use crate::consts::DID_BITS;
use crate::dht::tests::gen_ordered_dids;
use crate::dht::tests::gen_random_did;
use crate::dht::Chord;
use crate::dht::Did;
use crate::dht::Router;
use crate::dht::RouterConfig;
use crate::dht::Stabilization;
use crate::error::Error;
use crate::tests::gen_named_ring;
use crate::tests::gen_ring;

#[test]
fn test_baseline_scenario() {
    let ring = gen_ring(&[Did::from(10u32), Did::from(60u32), Did::from(180u32)]);
    let owner = |x: u32| ring.find_node_by_did(Did::from(x)).unwrap().did;

    assert_eq!(owner(70), Did::from(180u32));
    assert_eq!(owner(5), Did::from(10u32));
    assert_eq!(owner(250), Did::from(10u32));
}

#[test]
fn test_decentralized_scenario() {
    let ring = gen_ring(&[Did::from(10u32), Did::from(60u32), Did::from(180u32)]);
    ring.stabilize_all().unwrap();
    let router = Router::new(&ring, RouterConfig::default());

    for start in ring.members().unwrap() {
        for (key, expect) in [(70u32, 180u32), (5, 10), (250, 10), (60, 60), (11, 60)] {
            let route = router.find_successor(&start, Did::from(key)).unwrap();
            assert_eq!(route.owner, Did::from(expect), "from {}", start.did);
        }
    }
}

#[test]
fn test_find_node_is_deterministic() {
    let (ring, _) = gen_named_ring(16);
    for i in 0..100 {
        let key = format!("key{i}");
        let a = ring.find_node(&key).unwrap();
        let b = ring.find_node(&key).unwrap();
        assert_eq!(a.did, b.did);
    }
}

#[test]
fn test_find_node_is_smallest_successor() {
    let (ring, _) = gen_named_ring(16);
    let dids = ring.dids().unwrap();
    for i in 0..200 {
        let key = format!("key{i}");
        let hashed = ring.hash_key(&key);
        let expect = dids
            .iter()
            .copied()
            .filter(|d| *d >= hashed)
            .min()
            .unwrap_or(dids[0]);
        assert_eq!(ring.find_node(&key).unwrap().did, expect, "key: {key}");
    }
}

#[test]
fn test_empty_ring_never_indexes() {
    let ring = gen_ring(&[]);
    assert_eq!(ring.find_node("key1").unwrap_err(), Error::EmptyRing);
}

#[test]
fn test_two_node_ring_converges() {
    let (ring, nodes) = gen_named_ring(2);
    let router = Router::new(&ring, RouterConfig::default());
    for i in 0..50 {
        let key = format!("key{i}");
        for node in nodes.iter() {
            let route = router.find_node(node, &key).unwrap();
            assert!(route.hops() <= DID_BITS);
            assert_eq!(route.owner, ring.find_node(&key).unwrap().did);
        }
    }
}

#[test]
fn test_decentralized_matches_baseline() {
    let mut rng = rand::thread_rng();
    let dids = gen_ordered_dids(64);
    let ring = gen_ring(&dids);
    ring.stabilize_all().unwrap();
    let members = ring.members().unwrap();
    let router = Router::new(&ring, RouterConfig::default());

    let mut max_hops = 0;
    for _ in 0..500 {
        let key = gen_random_did(&mut rng);
        let from = &members[rng.gen_range(0..members.len())];
        let route = router.find_successor(from, key).unwrap();
        assert_eq!(route.owner, ring.find_node_by_did(key).unwrap().did);
        max_hops = max_hops.max(route.hops());
    }
    // O(log N) with high probability, log2(64) = 6.
    assert!(max_hops <= 20, "max hops: {max_hops}");
}

#[test]
fn test_lookup_on_member_dids() {
    let dids = gen_ordered_dids(20);
    let ring = gen_ring(&dids);
    ring.stabilize_all().unwrap();
    let router = Router::new(&ring, RouterConfig::default());
    let members = ring.members().unwrap();

    for did in dids.iter() {
        for from in members.iter() {
            assert_eq!(router.find_successor(from, *did).unwrap().owner, *did);
        }
    }
}

#[test]
fn test_stored_keys_found_by_both_paths() {
    let (ring, nodes) = gen_named_ring(8);
    let router = Router::new(&ring, RouterConfig::default());
    for i in 0..40 {
        let key = format!("key{i}");
        let owner = ring.put(&key, &format!("value{i}")).unwrap();
        let route = router.find_node(&nodes[i % nodes.len()], &key).unwrap();
        assert_eq!(route.owner, owner.did);
        assert_eq!(ring.get_value(&key).unwrap(), Some(format!("value{i}")));
    }
}

#[test]
fn test_closest_preceding_node_within_interval() {
    let mut rng = rand::thread_rng();
    let (_ring, nodes) = gen_named_ring(32);
    for node in nodes.iter() {
        for _ in 0..50 {
            let key = gen_random_did(&mut rng);
            let next = node.closest_preceding_node(key).unwrap();
            assert!(next == node.did || next.in_range(node.did, key));
        }
    }
}

#[test]
fn test_unpopulated_slot_is_reported() {
    let dids = gen_ordered_dids(4);
    let ring = gen_ring(&dids);
    ring.stabilize_all().unwrap();
    let node = ring.get(dids[0]).unwrap().unwrap();

    // A fresh node that only knows part of its fingers.
    let fresh = crate::dht::Node::new_with_did("fresh", dids[0] + Did::from(1u32), 160);
    for _ in 0..10 {
        ring.fix_fingers(&fresh).unwrap();
    }
    assert!(!fresh.is_ready().unwrap());
    assert_eq!(
        fresh.closest_preceding_node(dids[2]),
        Err(Error::IncompleteFingerTable(fresh.did, 10))
    );
    assert!(node.closest_preceding_node(dids[2]).is_ok());
}
