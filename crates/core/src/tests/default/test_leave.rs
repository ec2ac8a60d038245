use bytes::Bytes;

use crate::dht::Did;
use crate::dht::RingState;
use crate::error::Result;
use crate::swarm::LeaveStep;
use crate::swarm::StepOutcome;
use crate::tests::default::prepare_node;
use crate::tests::default::prepare_node_with_storage;
use crate::tests::default::wait_stabilized;
use crate::tests::default::BrokenReadStorage;
use crate::tests::default::NODE_A;
use crate::tests::default::NODE_B;
use crate::tests::default::NODE_C;
use crate::transport::DummyCaller;

#[tokio::test]
async fn test_two_nodes_leave() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    b.join(NODE_A).await?;
    b.upload_file(Did::from(300u64), "x.txt", b"x").await?;

    let report = b.leave().await?;
    assert!(report.is_complete(), "{:?}", report);
    assert_eq!(
        report.outcome(&LeaveStep::TransferFile(Did::from(300u64))),
        Some(&StepOutcome::Done)
    );

    assert_eq!(a.state()?, RingState::Solitary);
    assert_eq!(a.dht().successor()?.address, NODE_A);
    assert_eq!(a.dht().predecessor()?.address, NODE_A);
    assert_eq!(
        a.retrieve_file(Did::from(300u64), "x.txt").await?.content,
        Bytes::from("x")
    );

    assert_eq!(b.state()?, RingState::Solitary);
    assert!(b.file_table().await.is_empty());
    assert_eq!(b.lookup(Did::from(300u64)).await?.address, NODE_B);
    Ok(())
}

#[tokio::test]
async fn test_leave_of_three_node_ring() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    let c = prepare_node(&caller, NODE_C);
    b.join(NODE_A).await?;
    c.join(NODE_A).await?;
    wait_stabilized(&[&a, &b, &c]).await;

    let report = b.leave().await?;
    assert!(report.is_complete(), "{:?}", report);
    wait_stabilized(&[&a, &c]).await;

    assert_eq!(a.dht().successor()?.address, NODE_C);
    assert_eq!(c.dht().predecessor()?.address, NODE_A);
    // no finger of the remaining nodes points at B
    for swarm in [&a, &c] {
        let table = swarm.dht().finger_table()?;
        assert!(table.list().iter().all(|p| p.address != NODE_B));
    }
    assert_eq!(a.lookup(Did::from(300u64)).await?.address, NODE_C);
    Ok(())
}

#[tokio::test]
async fn test_leave_keeps_files_it_could_not_hand_over() -> Result<()> {
    let caller = DummyCaller::new();
    let _a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    b.join(NODE_A).await?;
    b.upload_file(Did::from(300u64), "x.txt", b"x").await?;

    caller.set_reachable(NODE_A, false);
    let report = b.leave().await?;

    assert!(matches!(
        report.outcome(&LeaveStep::TransferFile(Did::from(300u64))),
        Some(StepOutcome::Failed(_))
    ));
    assert_eq!(
        report.outcome(&LeaveStep::RemoveStorage),
        Some(&StepOutcome::Skipped)
    );
    assert_eq!(b.state()?, RingState::Solitary);
    assert_eq!(
        b.retrieve_file(Did::from(300u64), "x.txt").await?.content,
        Bytes::from("x")
    );
    Ok(())
}

#[tokio::test]
async fn test_leave_moves_the_files_it_can_read() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node_with_storage(&caller, NODE_B, Box::new(BrokenReadStorage::new("bad.txt")));
    b.join(NODE_A).await?;
    b.upload_file(Did::from(300u64), "x.txt", b"x").await?;
    b.upload_file(Did::from(400u64), "bad.txt", b"bad").await?;

    let report = b.leave().await?;

    assert_eq!(
        report.outcome(&LeaveStep::TransferFile(Did::from(300u64))),
        Some(&StepOutcome::Done)
    );
    assert!(matches!(
        report.outcome(&LeaveStep::TransferFile(Did::from(400u64))),
        Some(StepOutcome::Failed(_))
    ));
    assert_eq!(
        report.outcome(&LeaveStep::RemoveStorage),
        Some(&StepOutcome::Skipped)
    );

    let kept: Vec<_> = b.file_table().await.into_keys().collect();
    assert_eq!(kept, vec![Did::from(400u64)]);
    assert_eq!(
        a.retrieve_file(Did::from(300u64), "x.txt").await?.content,
        Bytes::from("x")
    );
    assert!(!a.file_table().await.contains_key(&Did::from(400u64)));
    Ok(())
}

#[tokio::test]
async fn test_solitary_leave_does_nothing() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    a.upload_file(Did::from(3u64), "y", b"y").await?;

    let report = a.leave().await?;
    assert!(report
        .steps
        .iter()
        .all(|(_, outcome)| *outcome == StepOutcome::Skipped));
    assert!(caller.calls().is_empty());
    assert_eq!(a.file_table().await.len(), 1);
    Ok(())
}
