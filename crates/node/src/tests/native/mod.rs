use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chordfs_rpc::types::endpoint_url;
use chordfs_rpc::Client;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::native::config::StorageKind;
use crate::native::endpoint::advertised_address;
use crate::native::endpoint::bind;
use crate::native::endpoint::run_http_api;
use crate::processor::Processor;
use crate::processor::ProcessorBuilder;
use crate::processor::ProcessorConfig;

mod test_http;

/// A node served over HTTP on an ephemeral port of the loopback interface.
pub struct TestNode {
    pub processor: Arc<Processor>,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<Result<()>>,
}

impl TestNode {
    pub fn address(&self) -> String {
        self.processor.address().to_string()
    }

    pub fn client(&self) -> Client {
        Client::new(&endpoint_url(self.processor.address()))
    }

    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.processor.shutdown().await;
        self.server.await.unwrap().unwrap();
    }
}

pub fn prepare_processor(address: &str) -> Processor {
    let config = ProcessorConfig::new(
        StorageKind::Memory,
        PathBuf::from("data"),
        Duration::from_secs(5),
    );
    ProcessorBuilder::from_config(address, &config)
        .build()
        .unwrap()
}

pub async fn spawn_node() -> TestNode {
    let listener = bind("127.0.0.1:0").unwrap();
    let address = advertised_address(&listener, None).unwrap();
    let processor = Arc::new(prepare_processor(&address));
    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(run_http_api(listener, processor.clone(), async move {
        let _ = rx.await;
    }));
    TestNode {
        processor,
        shutdown: Some(tx),
        server,
    }
}
