//! Re-exports of the types most users of chordfs-core need.
pub use bytes;

pub use crate::dht::Did;
pub use crate::dht::Peer;
pub use crate::dht::RingState;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::inspect::SwarmInspect;
pub use crate::message::HandleMsg;
pub use crate::message::Message;
pub use crate::message::Reply;
pub use crate::storage::FileStorageBox;
pub use crate::storage::FsStorage;
pub use crate::storage::MemStorage;
pub use crate::swarm::JoinReport;
pub use crate::swarm::LeaveReport;
pub use crate::swarm::Swarm;
pub use crate::swarm::SwarmBuilder;
pub use crate::transport::Caller;
pub use crate::transport::SharedCaller;
