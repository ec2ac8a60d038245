#![warn(missing_docs)]
//! JSON-RPC handler of the node: every method is served by a [HandleRpc] impl of
//! [Processor]. Peer procedures go through the swarm message handler, so they behave
//! the same whether they arrive over HTTP or from an in-process caller.
use async_trait::async_trait;
use chordfs_core::dht::Peer;
use chordfs_core::message::HandleMsg;
use chordfs_core::message::LookupRequest;
use chordfs_core::message::Message;
use chordfs_core::message::Reply;
use chordfs_core::message::SetPeerRequest;
use chordfs_rpc::handler::HandleRpc;
use chordfs_rpc::types::*;
use jsonrpc_core::types::error::Error;
use jsonrpc_core::Result;

use crate::error::Error as ServerError;
use crate::processor::Processor;

impl Processor {
    async fn handle_message(&self, msg: Message) -> Result<Reply> {
        self.swarm
            .handle(msg)
            .await
            .map_err(|e| Error::from(ServerError::from(e)))
    }

    async fn handle_peer_message(&self, msg: Message) -> Result<Peer> {
        let method = msg.name();
        self.handle_message(msg)
            .await?
            .into_peer(method)
            .map_err(|e| ServerError::from(e).into())
    }

    async fn handle_empty_message(&self, msg: Message) -> Result<()> {
        let method = msg.name();
        self.handle_message(msg)
            .await?
            .into_empty(method)
            .map_err(|e| ServerError::from(e).into())
    }
}

#[async_trait]
impl HandleRpc<LookupRequest, Peer> for Processor {
    async fn handle_rpc(&self, req: LookupRequest) -> Result<Peer> {
        self.handle_peer_message(Message::Lookup(req)).await
    }
}

#[async_trait]
impl HandleRpc<LookupBasicRequest, Peer> for Processor {
    async fn handle_rpc(&self, req: LookupBasicRequest) -> Result<Peer> {
        self.handle_peer_message(Message::LookupBasic(LookupRequest { did: req.did }))
            .await
    }
}

#[async_trait]
impl HandleRpc<GetPredRequest, Peer> for Processor {
    async fn handle_rpc(&self, _req: GetPredRequest) -> Result<Peer> {
        self.handle_peer_message(Message::GetPred).await
    }
}

#[async_trait]
impl HandleRpc<GetSuccRequest, Peer> for Processor {
    async fn handle_rpc(&self, _req: GetSuccRequest) -> Result<Peer> {
        self.handle_peer_message(Message::GetSucc).await
    }
}

#[async_trait]
impl HandleRpc<SetPredRequest, Peer> for Processor {
    async fn handle_rpc(&self, req: SetPredRequest) -> Result<Peer> {
        self.handle_peer_message(Message::SetPred(SetPeerRequest {
            address: req.address,
        }))
        .await
    }
}

#[async_trait]
impl HandleRpc<SetSuccRequest, Peer> for Processor {
    async fn handle_rpc(&self, req: SetSuccRequest) -> Result<Peer> {
        self.handle_peer_message(Message::SetSucc(SetPeerRequest {
            address: req.address,
        }))
        .await
    }
}

#[async_trait]
impl HandleRpc<CalcFingerTableRequest, ()> for Processor {
    async fn handle_rpc(&self, _req: CalcFingerTableRequest) -> Result<()> {
        self.handle_empty_message(Message::CalcFingerTable).await
    }
}

#[async_trait]
impl HandleRpc<StabilizeRequest, ()> for Processor {
    async fn handle_rpc(&self, req: StabilizeRequest) -> Result<()> {
        self.handle_empty_message(Message::Stabilize(req)).await
    }
}

#[async_trait]
impl HandleRpc<UploadFileRequest, ()> for Processor {
    async fn handle_rpc(&self, req: UploadFileRequest) -> Result<()> {
        self.handle_empty_message(Message::UploadFile(req)).await
    }
}

#[async_trait]
impl HandleRpc<RetrieveFileRequest, RetrieveFileResponse> for Processor {
    async fn handle_rpc(&self, req: RetrieveFileRequest) -> Result<RetrieveFileResponse> {
        let msg = Message::RetrieveFile(req);
        let method = msg.name();
        self.handle_message(msg)
            .await?
            .into_file(method)
            .map_err(|e| ServerError::from(e).into())
    }
}

#[async_trait]
impl HandleRpc<ShareFilesRequest, ()> for Processor {
    async fn handle_rpc(&self, req: ShareFilesRequest) -> Result<()> {
        self.handle_empty_message(Message::ShareFiles(req)).await
    }
}

#[async_trait]
impl HandleRpc<JoinRequest, JoinResponse> for Processor {
    async fn handle_rpc(&self, req: JoinRequest) -> Result<JoinResponse> {
        self.join(&req.introducer).await.map_err(Error::from)
    }
}

#[async_trait]
impl HandleRpc<LeaveRequest, LeaveResponse> for Processor {
    async fn handle_rpc(&self, _req: LeaveRequest) -> Result<LeaveResponse> {
        self.leave().await.map_err(Error::from)
    }
}

#[async_trait]
impl HandleRpc<NodeInfoRequest, NodeInfoResponse> for Processor {
    async fn handle_rpc(&self, _req: NodeInfoRequest) -> Result<NodeInfoResponse> {
        self.get_node_info().await.map_err(Error::from)
    }
}
