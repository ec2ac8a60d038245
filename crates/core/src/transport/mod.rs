//! Outbound side of the peer procedures.
//!
//! A [Caller] delivers a [Message] to the node listening on an address and returns its
//! [Reply]. The typed helpers turn the reply into what each procedure answers, so the
//! membership and file code never matches on replies itself.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::dht::Did;
use crate::dht::Peer;
use crate::error::Result;
use crate::message::LookupRequest;
use crate::message::Message;
use crate::message::Reply;
use crate::message::RetrieveFileRequest;
use crate::message::RetrieveFileResponse;
use crate::message::SetPeerRequest;
use crate::message::ShareFilesRequest;
use crate::message::StabilizeRequest;
use crate::message::UploadFileRequest;

#[cfg(any(test, feature = "dummy"))]
pub mod dummy;
#[cfg(any(test, feature = "dummy"))]
pub use dummy::DummyCaller;

/// Shared handle of a [Caller].
pub type SharedCaller = Arc<dyn Caller>;

/// Remote procedure invocation between nodes.
///
/// Implementations report an unreachable node, a refused connection, a timeout or a
/// malformed reply as [Error::Transport](crate::error::Error::Transport). Errors
/// raised by the remote handler come back as their own kind where possible.
#[async_trait]
pub trait Caller: Send + Sync {
    /// Deliver `msg` to the node listening on `address`.
    async fn call(&self, address: &str, msg: Message) -> Result<Reply>;

    /// Remote `Lookup`.
    async fn lookup(&self, address: &str, did: Did) -> Result<Peer> {
        let msg = Message::Lookup(LookupRequest { did });
        let name = msg.name();
        self.call(address, msg).await?.into_peer(name)
    }

    /// Remote `LookupBasic`.
    async fn lookup_basic(&self, address: &str, did: Did) -> Result<Peer> {
        let msg = Message::LookupBasic(LookupRequest { did });
        let name = msg.name();
        self.call(address, msg).await?.into_peer(name)
    }

    /// Remote `GetPred`.
    async fn get_predecessor(&self, address: &str) -> Result<Peer> {
        let msg = Message::GetPred;
        let name = msg.name();
        self.call(address, msg).await?.into_peer(name)
    }

    /// Remote `GetSucc`.
    async fn get_successor(&self, address: &str) -> Result<Peer> {
        let msg = Message::GetSucc;
        let name = msg.name();
        self.call(address, msg).await?.into_peer(name)
    }

    /// Remote `SetPred`.
    async fn set_predecessor(&self, address: &str, predecessor: &str) -> Result<Peer> {
        let msg = Message::SetPred(SetPeerRequest {
            address: predecessor.to_string(),
        });
        let name = msg.name();
        self.call(address, msg).await?.into_peer(name)
    }

    /// Remote `SetSucc`.
    async fn set_successor(&self, address: &str, successor: &str) -> Result<Peer> {
        let msg = Message::SetSucc(SetPeerRequest {
            address: successor.to_string(),
        });
        let name = msg.name();
        self.call(address, msg).await?.into_peer(name)
    }

    /// Remote `CalcFingerTable`.
    async fn calc_finger_table(&self, address: &str) -> Result<()> {
        let msg = Message::CalcFingerTable;
        let name = msg.name();
        self.call(address, msg).await?.into_empty(name)
    }

    /// Remote `Stabilize`.
    async fn stabilize(&self, address: &str, origin: &str) -> Result<()> {
        let msg = Message::Stabilize(StabilizeRequest {
            origin: origin.to_string(),
        });
        let name = msg.name();
        self.call(address, msg).await?.into_empty(name)
    }

    /// Remote `UploadFile`.
    async fn upload_file(
        &self,
        address: &str,
        did: Did,
        filename: &str,
        content: Bytes,
    ) -> Result<()> {
        let msg = Message::UploadFile(UploadFileRequest {
            did,
            filename: filename.to_string(),
            content,
        });
        let name = msg.name();
        self.call(address, msg).await?.into_empty(name)
    }

    /// Remote `RetrieveFile`.
    async fn retrieve_file(
        &self,
        address: &str,
        did: Did,
        filename: &str,
    ) -> Result<RetrieveFileResponse> {
        let msg = Message::RetrieveFile(RetrieveFileRequest {
            did,
            filename: filename.to_string(),
        });
        let name = msg.name();
        self.call(address, msg).await?.into_file(name)
    }

    /// Remote `ShareFiles`.
    async fn share_files(
        &self,
        address: &str,
        predecessor: Did,
        boundary: Did,
        target: &str,
    ) -> Result<()> {
        let msg = Message::ShareFiles(ShareFilesRequest {
            predecessor,
            boundary,
            target: target.to_string(),
        });
        let name = msg.name();
        self.call(address, msg).await?.into_empty(name)
    }
}
