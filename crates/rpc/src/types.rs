//! Request and response types of the JSON-RPC interface.
//! Peer procedures that carry data reuse the message types of `chordfs_core::message`.
//! Every method gets its own request type, so a processor can serve each of them
//! through a distinct [HandleRpc](crate::handler::HandleRpc) impl.

use chordfs_core::dht::Did;
use serde::Deserialize;
use serde::Serialize;

pub use chordfs_core::inspect::SwarmInspect as NodeInfoResponse;
pub use chordfs_core::message::LookupRequest;
pub use chordfs_core::message::RetrieveFileRequest;
pub use chordfs_core::message::RetrieveFileResponse;
pub use chordfs_core::message::ShareFilesRequest;
pub use chordfs_core::message::StabilizeRequest;
pub use chordfs_core::message::UploadFileRequest;
pub use chordfs_core::swarm::JoinReport as JoinResponse;
pub use chordfs_core::swarm::LeaveReport as LeaveResponse;

/// Find the owner of `did` following successor pointers only.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupBasicRequest {
    pub did: Did,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPredRequest {}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSuccRequest {}

/// Point the predecessor at the node listening on `address`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SetPredRequest {
    pub address: String,
}

/// Point the successor at the node listening on `address`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SetSuccRequest {
    pub address: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CalcFingerTableRequest {}

/// Join the ring the node on `introducer` belongs to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub introducer: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveRequest {}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfoRequest {}

/// Url of the JSON-RPC endpoint of the node listening on `address`.
pub fn endpoint_url(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        return address.to_string();
    }
    format!("http://{address}/")
}
