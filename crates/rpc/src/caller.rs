//! [Caller] over JSON-RPC and HTTP.

use std::time::Duration;

use async_trait::async_trait;
use chordfs_core::error::Result;
use chordfs_core::message::Message;
use chordfs_core::message::Reply;
use chordfs_core::transport::Caller;
use reqwest::Client as HttpClient;

use crate::error::Error;
use crate::jsonrpc::Client;
use crate::types::endpoint_url;
use crate::types::LookupBasicRequest;
use crate::types::SetPredRequest;
use crate::types::SetSuccRequest;

/// Sends every peer procedure as one JSON-RPC POST to `http://<address>/`.
/// A call that gets no answer within the timeout fails with a transport error.
#[derive(Clone)]
pub struct HttpCaller {
    client: HttpClient,
}

impl HttpCaller {
    pub fn new(timeout: Duration) -> std::result::Result<Self, Error> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }

    fn client(&self, address: &str) -> Client {
        Client::new_with_http_client(&endpoint_url(address), self.client.clone())
    }
}

#[async_trait]
impl Caller for HttpCaller {
    async fn call(&self, address: &str, msg: Message) -> Result<Reply> {
        tracing::debug!("call {} on {}", msg.name(), address);
        let client = self.client(address);
        let reply = match msg {
            Message::Lookup(req) => client.lookup(&req).await.map(Reply::Peer),
            Message::LookupBasic(req) => client
                .lookup_basic(&LookupBasicRequest { did: req.did })
                .await
                .map(Reply::Peer),
            Message::GetPred => client.get_pred().await.map(Reply::Peer),
            Message::GetSucc => client.get_succ().await.map(Reply::Peer),
            Message::SetPred(req) => client
                .set_pred(&SetPredRequest {
                    address: req.address,
                })
                .await
                .map(Reply::Peer),
            Message::SetSucc(req) => client
                .set_succ(&SetSuccRequest {
                    address: req.address,
                })
                .await
                .map(Reply::Peer),
            Message::CalcFingerTable => client.calc_finger_table().await.map(|_| Reply::Empty),
            Message::Stabilize(req) => client.stabilize(&req).await.map(|_| Reply::Empty),
            Message::UploadFile(req) => client.upload_file(&req).await.map(|_| Reply::Empty),
            Message::RetrieveFile(req) => client.retrieve_file(&req).await.map(Reply::File),
            Message::ShareFiles(req) => client.share_files(&req).await.map(|_| Reply::Empty),
        };
        Ok(reply?)
    }
}
