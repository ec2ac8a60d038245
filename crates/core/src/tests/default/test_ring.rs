use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::consts::FINGER_TABLE_SIZE;
use crate::dht::Did;
use crate::dht::Peer;
use crate::error::Result;
use crate::swarm::Swarm;
use crate::tests::default::prepare_node;
use crate::tests::default::wait_stabilized;
use crate::tests::default::FILE;
use crate::tests::default::NODE_A;
use crate::tests::default::NODE_B;
use crate::tests::default::NODE_C;
use crate::transport::DummyCaller;

fn fingers(swarm: &Arc<Swarm>) -> Result<Vec<u64>> {
    Ok(swarm
        .dht()
        .finger_table()?
        .list()
        .iter()
        .map(|p| p.did.value())
        .collect())
}

#[tokio::test]
async fn test_three_node_ring_end_to_end() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    let c = prepare_node(&caller, NODE_C);
    assert_eq!(Did::hash(FILE), Did::from(600000u64));

    assert!(b.join(NODE_A).await?.is_complete());

    // with two nodes the key 600000 belongs to A, the first node after it
    let owner = b.store_file(FILE, Bytes::from("hello chord")).await?;
    assert_eq!(owner.address, NODE_A);
    assert!(a.file_table().await.contains_key(&Did::from(600000u64)));

    assert!(c.join(NODE_B).await?.is_complete());
    wait_stabilized(&[&a, &b, &c]).await;

    // pointers
    assert_eq!(a.dht().successor()?.address, NODE_B);
    assert_eq!(b.dht().successor()?.address, NODE_C);
    assert_eq!(c.dht().successor()?.address, NODE_A);
    assert_eq!(a.dht().predecessor()?.address, NODE_C);
    assert_eq!(b.dht().predecessor()?.address, NODE_A);
    assert_eq!(c.dht().predecessor()?.address, NODE_B);

    // fingers
    let mut expected_a = vec![500; 9];
    expected_a.extend(vec![900000; FINGER_TABLE_SIZE - 9]);
    assert_eq!(fingers(&a)?, expected_a);
    assert_eq!(fingers(&b)?, vec![900000; FINGER_TABLE_SIZE]);
    let mut expected_c = vec![10; 18];
    expected_c.extend(vec![900000; 2]);
    assert_eq!(fingers(&c)?, expected_c);

    // the join of C moved the file to C
    assert!(a.file_table().await.is_empty());
    assert_eq!(
        c.file_table().await.get(&Did::from(600000u64)),
        Some(&FILE.to_string())
    );

    // any entry point resolves the same owner and content
    for entry in [&a, &b, &c] {
        assert_eq!(entry.lookup(Did::from(600000u64)).await?.address, NODE_C);
        let file = entry.fetch_file(FILE).await?;
        assert_eq!(file.content, Bytes::from("hello chord"));
    }

    // every key has exactly one owner, whatever node is asked
    for key in [0u64, 10, 11, 499, 500, 501, 899999, 900000, 900001, 1048575] {
        let did = Did::from(key);
        let owner = a.lookup(did).await?;
        assert_eq!(b.lookup(did).await?, owner);
        assert_eq!(c.lookup(did).await?, owner);
    }
    assert_eq!(a.lookup(Did::from(11u64)).await?.address, NODE_B);
    assert_eq!(a.lookup(Did::from(900001u64)).await?.address, NODE_A);
    assert_eq!(a.lookup(Did::from(10u64)).await?.address, NODE_A);
    Ok(())
}

#[tokio::test]
async fn test_lookup_failure_propagates() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    let c = prepare_node(&caller, NODE_C);
    b.join(NODE_A).await?;
    c.join(NODE_A).await?;
    wait_stabilized(&[&a, &b, &c]).await;

    caller.set_reachable(NODE_B, false);
    // A hands 600000 to B
    assert!(a.lookup(Did::from(600000u64)).await.is_err());
    assert!(a.fetch_file(FILE).await.is_err());
    // keys between A and its first finger are answered locally
    assert_eq!(a.lookup(Did::from(300u64)).await?.address, NODE_B);
    Ok(())
}

#[tokio::test]
async fn test_lookup_with_stale_fingers() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let _b = prepare_node(&caller, NODE_B);

    // successor set, fingers not yet recalculated
    a.set_successor(Peer::new(NODE_B)).await?;
    let owner = tokio::time::timeout(Duration::from_secs(3), a.lookup(Did::from(300u64)))
        .await
        .expect("lookup did not finish")?;
    assert_eq!(owner.address, NODE_B);

    // B is solitary, its successor walk answers with itself
    let owner = tokio::time::timeout(Duration::from_secs(3), a.lookup(Did::from(600000u64)))
        .await
        .expect("lookup did not finish")?;
    assert_eq!(owner.address, NODE_B);
    Ok(())
}
