#![warn(missing_docs)]
//! This module implemented the inbound side of the peer procedures.

use async_trait::async_trait;

use crate::dht::Peer;
use crate::error::Result;
use crate::message::types::Message;
use crate::message::types::Reply;
use crate::swarm::Swarm;

/// Generic trait for handle message, inspired by Actor-Model.
#[async_trait]
pub trait HandleMsg<T> {
    /// Message handler.
    async fn handle(&self, msg: T) -> Result<Reply>;
}

#[async_trait]
impl HandleMsg<Message> for Swarm {
    async fn handle(&self, msg: Message) -> Result<Reply> {
        tracing::debug!("{} handle {}", self.address(), msg.name());
        match msg {
            Message::Lookup(req) => self.lookup(req.did).await.map(Reply::Peer),
            Message::LookupBasic(req) => self.lookup_basic(req.did).await.map(Reply::Peer),
            Message::GetPred => self.dht().predecessor().map(Reply::Peer),
            Message::GetSucc => self.dht().successor().map(Reply::Peer),
            Message::SetPred(req) => self
                .set_predecessor(Peer::new(req.address))
                .await
                .map(Reply::Peer),
            Message::SetSucc(req) => self
                .set_successor(Peer::new(req.address))
                .await
                .map(Reply::Peer),
            Message::CalcFingerTable => self.calc_finger_table().await.map(|_| Reply::Empty),
            Message::Stabilize(req) => self.stabilize(&req.origin).await.map(|_| Reply::Empty),
            Message::UploadFile(req) => self
                .upload_file(req.did, &req.filename, &req.content)
                .await
                .map(|_| Reply::Empty),
            Message::RetrieveFile(req) => self
                .retrieve_file(req.did, &req.filename)
                .await
                .map(Reply::File),
            Message::ShareFiles(req) => self
                .share_files(req.predecessor, req.boundary, &req.target)
                .await
                .map(|_| Reply::Empty),
        }
    }
}
