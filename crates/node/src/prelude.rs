//! A prelude is provided which imports all the important data types and traits of a chordfs node.
/// Use this when you want to quickly bootstrap a new project.
pub use chordfs_core;
pub use chordfs_rpc;

pub use self::chordfs_core::dht::Did;
pub use self::chordfs_core::dht::Peer;
pub use self::chordfs_core::dht::PeerRing;
pub use self::chordfs_core::message::Message;
pub use self::chordfs_core::storage::FsStorage;
pub use self::chordfs_core::storage::MemStorage;
pub use self::chordfs_core::swarm::Swarm;
pub use self::chordfs_core::swarm::SwarmBuilder;
pub use self::chordfs_rpc::Client;
pub use self::chordfs_rpc::HttpCaller;
pub use crate::native::config::Config;
pub use crate::native::endpoint::run_http_api;
pub use crate::processor::Processor;
pub use crate::processor::ProcessorBuilder;
pub use bytes;
pub use http;
