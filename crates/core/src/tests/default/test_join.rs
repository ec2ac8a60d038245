use crate::dht::Did;
use crate::dht::RingState;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::JoinStep;
use crate::swarm::StepOutcome;
use crate::tests::default::prepare_node;
use crate::tests::default::NODE_A;
use crate::tests::default::NODE_B;
use crate::tests::default::NODE_C;
use crate::transport::DummyCaller;

#[tokio::test]
async fn test_two_nodes_join() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    assert_eq!(a.did(), Did::from(10u64));
    assert_eq!(b.did(), Did::from(500u64));

    let report = b.join(NODE_A).await?;
    assert!(report.is_complete(), "{:?}", report);
    assert_eq!(report.steps.len(), 9);

    assert_eq!(a.dht().successor()?.address, NODE_B);
    assert_eq!(a.dht().predecessor()?.address, NODE_B);
    assert_eq!(b.dht().successor()?.address, NODE_A);
    assert_eq!(b.dht().predecessor()?.address, NODE_A);
    assert_eq!(a.state()?, RingState::Joined);
    assert_eq!(b.state()?, RingState::Joined);

    assert_eq!(a.lookup(Did::from(300u64)).await?.address, NODE_B);
    assert_eq!(a.lookup(Did::from(5u64)).await?.address, NODE_A);
    assert_eq!(b.lookup(Did::from(5u64)).await?.address, NODE_A);
    assert_eq!(b.lookup(Did::from(500u64)).await?.address, NODE_B);
    Ok(())
}

#[tokio::test]
async fn test_join_calls_in_order() -> Result<()> {
    let caller = DummyCaller::new();
    let _a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);

    b.join(NODE_A).await?;

    let calls: Vec<_> = caller
        .calls()
        .into_iter()
        .filter(|c| c.method != "lookupBasic")
        .collect();
    assert!(calls.iter().all(|c| c.address == NODE_A));
    let methods: Vec<_> = calls.iter().map(|c| c.method).collect();
    assert_eq!(methods, vec![
        "lookup",
        "getPred",
        "setPred",
        "setSucc",
        "calcFingerTable",
        "calcFingerTable",
        "shareFiles",
        "stabilize",
    ]);
    Ok(())
}

#[tokio::test]
async fn test_join_self_is_rejected() {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    assert!(matches!(
        a.join(NODE_A).await,
        Err(Error::ShouldNotJoinSelf)
    ));
}

#[tokio::test]
async fn test_join_twice_is_rejected() -> Result<()> {
    let caller = DummyCaller::new();
    let _a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    b.join(NODE_A).await?;
    assert!(matches!(
        b.join(NODE_A).await,
        Err(Error::AlreadyJoined(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_join_unreachable_introducer() -> Result<()> {
    let caller = DummyCaller::new();
    let b = prepare_node(&caller, NODE_B);

    let report = b.join("127.0.0.1:1").await?;
    assert!(matches!(
        report.outcome(&JoinStep::LookupSuccessor),
        Some(StepOutcome::Failed(_))
    ));
    assert_eq!(report.outcome(&JoinStep::Stabilize), Some(&StepOutcome::Skipped));
    assert_eq!(b.state()?, RingState::Solitary);
    Ok(())
}

#[tokio::test]
async fn test_join_goes_on_when_predecessor_is_unknown() -> Result<()> {
    let caller = DummyCaller::new();
    let _a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    let c = prepare_node(&caller, NODE_C);
    b.join(NODE_A).await?;

    // B answers that A owns 900000 without asking A, then every call to A fails.
    caller.set_reachable(NODE_A, false);
    let report = c.join(NODE_B).await?;

    assert_eq!(report.outcome(&JoinStep::LookupSuccessor), Some(&StepOutcome::Done));
    assert_eq!(c.dht().successor()?.address, NODE_A);
    assert_eq!(report.failed_steps(), vec![
        JoinStep::QueryPredecessor,
        JoinStep::NotifySuccessor,
        JoinStep::CalcFingerTable,
        JoinStep::RefreshSuccessorFingers,
    ]);
    for step in [
        JoinStep::NotifyPredecessor,
        JoinStep::RefreshPredecessorFingers,
        JoinStep::ShareFiles,
        JoinStep::Stabilize,
    ] {
        assert_eq!(report.outcome(&step), Some(&StepOutcome::Skipped));
    }
    // predecessor is still the node itself
    assert_eq!(c.dht().predecessor()?.address, NODE_C);
    Ok(())
}
