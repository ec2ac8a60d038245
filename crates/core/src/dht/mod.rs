#![warn(missing_docs)]
//! Implementation of the chordfs DHT
//! which is based on CHORD, ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>

mod chord;
pub mod did;
/// Finger table of a node
pub mod finger;
/// Background forwarding of the stabilize sweep
pub mod stabilization;
pub mod types;

pub use chord::PeerRing;
pub use chord::PeerRingAction;
pub use chord::RemoteAction as PeerRingRemoteAction;
pub use chord::RingState;
pub use did::Did;
pub use did::RangeHit;
pub use finger::FingerTable;
pub use stabilization::Stabilizer;
pub use stabilization::StabilizerInfo;
pub use types::Chord;
pub use types::Peer;
