use std::sync::Arc;

use bytes::Bytes;

use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;
use crate::storage::FileStorageInterface;
use crate::storage::FsStorage;
use crate::storage::MemStorage;
use crate::tests::default::prepare_node;
use crate::tests::default::prepare_node_with_storage;
use crate::tests::default::BrokenReadStorage;
use crate::tests::default::SharedStorage;
use crate::tests::default::NODE_A;
use crate::tests::default::NODE_B;
use crate::transport::Caller;
use crate::transport::DummyCaller;

#[tokio::test]
async fn test_upload_then_retrieve() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);

    a.upload_file(Did::from(42u64), "notes.txt", b"some notes")
        .await?;
    let file = a.retrieve_file(Did::from(42u64), "notes.txt").await?;
    assert_eq!(file.did, Did::from(42u64));
    assert_eq!(file.filename, "notes.txt");
    assert_eq!(file.content, Bytes::from("some notes"));
    Ok(())
}

#[tokio::test]
async fn test_retrieve_missing_key_is_not_found() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);

    let err = a.retrieve_file(Did::from(7u64), "x").await.unwrap_err();
    assert!(err.is_not_found());

    // a key owned under another filename is not found either
    a.upload_file(Did::from(7u64), "y", b"y").await?;
    let err = a.retrieve_file(Did::from(7u64), "x").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // and through the caller
    let err = caller
        .retrieve_file(NODE_A, Did::from(8u64), "y")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_share_files_moves_only_the_interval() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);

    a.upload_file(Did::from(100u64), "f100", b"100").await?;
    a.upload_file(Did::from(200u64), "f200", b"200").await?;
    a.upload_file(Did::from(300u64), "f300", b"300").await?;

    a.share_files(Did::from(150u64), Did::from(250u64), NODE_B)
        .await?;

    let kept: Vec<_> = a.file_table().await.into_keys().collect();
    assert_eq!(kept, vec![Did::from(100u64), Did::from(300u64)]);
    let moved: Vec<_> = b.file_table().await.into_keys().collect();
    assert_eq!(moved, vec![Did::from(200u64)]);

    assert_eq!(
        b.retrieve_file(Did::from(200u64), "f200").await?.content,
        Bytes::from("200")
    );
    assert!(a
        .retrieve_file(Did::from(200u64), "f200")
        .await
        .unwrap_err()
        .is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_share_files_keeps_files_it_could_not_move() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let _b = prepare_node(&caller, NODE_B);
    a.upload_file(Did::from(200u64), "f200", b"200").await?;

    caller.set_reachable(NODE_B, false);
    a.share_files(Did::from(150u64), Did::from(250u64), NODE_B)
        .await?;

    assert_eq!(
        a.retrieve_file(Did::from(200u64), "f200").await?.content,
        Bytes::from("200")
    );
    Ok(())
}

#[tokio::test]
async fn test_share_files_skips_unreadable_file() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node_with_storage(&caller, NODE_A, Box::new(BrokenReadStorage::new("f200")));
    let b = prepare_node(&caller, NODE_B);
    a.upload_file(Did::from(100u64), "f100", b"100").await?;
    a.upload_file(Did::from(200u64), "f200", b"200").await?;

    a.share_files(Did::from(50u64), Did::from(250u64), NODE_B)
        .await?;

    let kept: Vec<_> = a.file_table().await.into_keys().collect();
    assert_eq!(kept, vec![Did::from(200u64)]);
    let moved: Vec<_> = b.file_table().await.into_keys().collect();
    assert_eq!(moved, vec![Did::from(100u64)]);
    assert_eq!(
        b.retrieve_file(Did::from(100u64), "f100").await?.content,
        Bytes::from("100")
    );
    Ok(())
}

#[tokio::test]
async fn test_share_files_across_zero() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);
    let b = prepare_node(&caller, NODE_B);
    a.upload_file(Did::from(950000u64), "high", b"high").await?;
    a.upload_file(Did::from(5u64), "low", b"low").await?;
    a.upload_file(Did::from(500u64), "mid", b"mid").await?;

    a.share_files(Did::from(900000u64), Did::from(10u64), NODE_B)
        .await?;

    let kept: Vec<_> = a.file_table().await.into_keys().collect();
    assert_eq!(kept, vec![Did::from(500u64)]);
    let moved: Vec<_> = b.file_table().await.into_keys().collect();
    assert_eq!(moved, vec![Did::from(5u64), Did::from(950000u64)]);
    assert_eq!(
        b.retrieve_file(Did::from(950000u64), "high").await?.content,
        Bytes::from("high")
    );
    Ok(())
}

#[tokio::test]
async fn test_upload_under_taken_key_drops_old_bytes() -> Result<()> {
    let caller = DummyCaller::new();
    let storage = Arc::new(MemStorage::new());
    let a = prepare_node_with_storage(&caller, NODE_A, Box::new(SharedStorage(storage.clone())));

    a.upload_file(Did::from(5u64), "first", b"1").await?;
    a.upload_file(Did::from(5u64), "second", b"2").await?;

    assert_eq!(storage.len(), 1);
    assert!(storage.read("first").await.is_err());
    assert!(a
        .retrieve_file(Did::from(5u64), "first")
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(
        a.retrieve_file(Did::from(5u64), "second").await?.content,
        Bytes::from("2")
    );

    // uploading the same file again keeps it
    a.upload_file(Did::from(5u64), "second", b"3").await?;
    assert_eq!(storage.read("second").await?, Bytes::from("3"));
    Ok(())
}

#[tokio::test]
async fn test_files_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let caller = DummyCaller::new();
    let storage = FsStorage::for_node(dir.path(), Did::hash(NODE_A));
    let root = storage.root().to_path_buf();
    let a = prepare_node_with_storage(&caller, NODE_A, Box::new(storage));

    a.upload_file(Did::hash("plan.md"), "plan.md", b"# plan")
        .await?;
    assert_eq!(root, dir.path().join("10"));
    assert_eq!(std::fs::read(root.join("plan.md"))?, b"# plan");
    assert_eq!(
        a.retrieve_file(Did::hash("plan.md"), "plan.md")
            .await?
            .content,
        Bytes::from("# plan")
    );
    Ok(())
}

#[tokio::test]
async fn test_store_and_fetch_on_solitary_node() -> Result<()> {
    let caller = DummyCaller::new();
    let a = prepare_node(&caller, NODE_A);

    let owner = a.store_file("todo.txt", Bytes::from("milk")).await?;
    assert_eq!(owner.address, NODE_A);
    let file = a.fetch_file("todo.txt").await?;
    assert_eq!(file.did, Did::hash("todo.txt"));
    assert_eq!(file.content, Bytes::from("milk"));
    Ok(())
}
