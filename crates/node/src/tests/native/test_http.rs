use bytes::Bytes;
use chordfs_core::dht::Did;
use chordfs_core::dht::RingState;
use chordfs_rpc::jsonrpc::RpcError;
use chordfs_rpc::types::*;

use super::spawn_node;

#[tokio::test]
async fn test_status_endpoint() {
    let node = spawn_node().await;

    let resp = reqwest::get(format!("http://{}/status", node.address()))
        .await
        .unwrap();
    assert!(resp.headers().contains_key("X-NODE-VERSION"));
    let info: NodeInfoResponse = resp.json().await.unwrap();
    assert_eq!(info.dht.peer.address, node.address());
    assert_eq!(info.dht.state, Some(RingState::Solitary));
    assert_eq!(info.dht.finger_table.len(), 20);

    node.stop().await;
}

#[tokio::test]
async fn test_unknown_method() {
    let node = spawn_node().await;

    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "ping",
        "params": {},
        "id": 1,
    });
    let resp: serde_json::Value = reqwest::Client::new()
        .post(format!("http://{}/", node.address()))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(resp["error"]["code"], serde_json::json!(-32601));

    node.stop().await;
}

#[tokio::test]
async fn test_join_files_and_leave_over_http() {
    let a = spawn_node().await;
    let b = spawn_node().await;

    let report = b
        .client()
        .join(&JoinRequest {
            introducer: a.address(),
        })
        .await
        .unwrap();
    assert!(report.is_complete(), "{:?}", report);

    let info_a = a.client().node_info().await.unwrap();
    let info_b = b.client().node_info().await.unwrap();
    assert_eq!(info_a.dht.successor.unwrap().address, b.address());
    assert_eq!(info_a.dht.predecessor.unwrap().address, b.address());
    assert_eq!(info_b.dht.successor.unwrap().address, a.address());
    assert_eq!(info_b.dht.predecessor.unwrap().address, a.address());

    // both nodes agree on the owner of any key
    let did = Did::hash("notes.txt");
    let owner_a = a.client().lookup(&LookupRequest { did }).await.unwrap();
    let owner_b = b
        .client()
        .lookup_basic(&LookupBasicRequest { did })
        .await
        .unwrap();
    assert_eq!(owner_a, owner_b);

    let owner = a
        .processor
        .swarm
        .store_file("notes.txt", Bytes::from("hello"))
        .await
        .unwrap();
    assert_eq!(owner, owner_a);
    let file = b.processor.swarm.fetch_file("notes.txt").await.unwrap();
    assert_eq!(file.content, Bytes::from("hello"));

    let err = a
        .client()
        .retrieve_file(&RetrieveFileRequest {
            did,
            filename: "missing.txt".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::JsonClientError(_)));
    assert!(chordfs_core::error::Error::from(err).is_not_found());

    let report = b.client().leave().await.unwrap();
    assert!(report.is_complete(), "{:?}", report);
    let info_a = a.client().node_info().await.unwrap();
    assert_eq!(info_a.dht.state, Some(RingState::Solitary));
    assert_eq!(info_a.files.len(), 1);
    let file = a
        .client()
        .retrieve_file(&RetrieveFileRequest {
            did,
            filename: "notes.txt".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(file.content, Bytes::from("hello"));

    b.stop().await;
    a.stop().await;
}
