use std::sync::Arc;

use crate::dht::StabilizerInfo;
use crate::error::Result;
use crate::swarm::Swarm;
use crate::tests::default::prepare_node;
use crate::tests::default::wait_stabilized;
use crate::tests::default::NODE_A;
use crate::tests::default::NODE_B;
use crate::tests::default::NODE_C;
use crate::transport::DummyCaller;

async fn three_node_ring(caller: &Arc<DummyCaller>) -> Result<(Arc<Swarm>, Arc<Swarm>, Arc<Swarm>)> {
    let a = prepare_node(caller, NODE_A);
    let b = prepare_node(caller, NODE_B);
    let c = prepare_node(caller, NODE_C);
    assert!(b.join(NODE_A).await?.is_complete());
    assert!(c.join(NODE_A).await?.is_complete());
    wait_stabilized(&[&a, &b, &c]).await;
    Ok((a, b, c))
}

#[tokio::test]
async fn test_stabilize_sweep_terminates() -> Result<()> {
    let caller = DummyCaller::new();
    let (a, b, c) = three_node_ring(&caller).await?;
    let forwarded_a = a.stabilizer().info().forwarded;
    let forwarded_c = c.stabilizer().info().forwarded;
    caller.clear_calls();

    a.stabilize(NODE_A).await?;
    wait_stabilized(&[&a, &c, &b]).await;

    // A -> C -> B, and B's predecessor is the origin
    let forwards: Vec<_> = caller
        .calls()
        .into_iter()
        .filter(|c| c.method == "stabilize")
        .map(|c| c.address)
        .collect();
    assert_eq!(forwards, vec![NODE_C.to_string(), NODE_B.to_string()]);
    assert!(forwards.len() <= 3);
    assert_eq!(a.stabilizer().info().forwarded, forwarded_a + 1);
    assert_eq!(c.stabilizer().info().forwarded, forwarded_c + 1);
    Ok(())
}

#[tokio::test]
async fn test_stabilize_returns_before_forward() -> Result<()> {
    let caller = DummyCaller::new();
    let (a, b, c) = three_node_ring(&caller).await?;

    let before = a.stabilizer().info();
    a.stabilize(NODE_A).await?;
    // queued, not necessarily sent yet
    let after = a.stabilizer().info();
    assert!(after.pending + after.forwarded > before.forwarded);

    wait_stabilized(&[&a, &b, &c]).await;
    assert_eq!(a.stabilizer().info().pending, 0);
    Ok(())
}

#[tokio::test]
async fn test_stabilize_forward_failure_is_counted() -> Result<()> {
    let caller = DummyCaller::new();
    let (a, b, c) = three_node_ring(&caller).await?;
    let before = a.stabilizer().info();

    caller.set_reachable(NODE_C, false);
    a.stabilize(NODE_A).await?;
    wait_stabilized(&[&a, &b, &c]).await;

    let after = a.stabilizer().info();
    assert_eq!(after.failed, before.failed + 1);
    assert_eq!(after.forwarded, before.forwarded);
    assert_eq!(after.pending, 0);
    Ok(())
}

#[tokio::test]
async fn test_solitary_stabilize_does_not_forward() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);

    a.stabilize(NODE_B).await?;
    assert_eq!(a.stabilizer().info(), StabilizerInfo::default());
    assert!(caller.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_shutdown_drains_and_closes() -> Result<()> {
    let caller = DummyCaller::new();
    let (a, b, c) = three_node_ring(&caller).await?;

    a.stabilize(NODE_A).await?;
    a.shutdown().await;
    assert_eq!(a.stabilizer().info().pending, 0);
    assert!(a.stabilizer().forward(NODE_C.to_string(), NODE_A.to_string()).is_err());
    wait_stabilized(&[&b, &c]).await;
    Ok(())
}
