#![warn(missing_docs)]
//! This module defines the messages exchanged between chordfs nodes.
//! Every message is a request answered by exactly one [Reply].

use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::dht::Peer;
use crate::error::Error;
use crate::error::Result;

/// Ask a node for the owner of a key.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// key to resolve
    pub did: Did,
}

/// Point a successor or predecessor at the node listening on `address`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SetPeerRequest {
    /// address of the new neighbour
    pub address: String,
}

/// Rebuild fingers and pass the sweep on to the predecessor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct StabilizeRequest {
    /// address of the node that started the sweep
    pub origin: String,
}

/// Store a file under a key and take ownership of it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct UploadFileRequest {
    /// key of the file
    pub did: Did,
    /// name of the file
    pub filename: String,
    /// content of the file, base64 in JSON
    #[serde(with = "super::encoder::base64_bytes")]
    pub content: Bytes,
}

/// Read a file owned under a key.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetrieveFileRequest {
    /// key of the file
    pub did: Did,
    /// name of the file
    pub filename: String,
}

/// A file returned by `RetrieveFile`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RetrieveFileResponse {
    /// key of the file
    pub did: Did,
    /// name of the file
    pub filename: String,
    /// content of the file, base64 in JSON
    #[serde(with = "super::encoder::base64_bytes")]
    pub content: Bytes,
}

/// Hand every owned file keyed in `(predecessor, boundary]` over to `target`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ShareFilesRequest {
    /// open lower bound of the interval
    pub predecessor: Did,
    /// closed upper bound of the interval
    pub boundary: Did,
    /// address receiving the files
    pub target: String,
}

/// Peer procedures of a chordfs node.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub enum Message {
    /// Resolve the owner of a key through the finger table.
    Lookup(LookupRequest),
    /// Resolve the owner of a key through successor pointers only.
    LookupBasic(LookupRequest),
    /// Read the predecessor.
    GetPred,
    /// Read the successor.
    GetSucc,
    /// Write the predecessor.
    SetPred(SetPeerRequest),
    /// Write the successor.
    SetSucc(SetPeerRequest),
    /// Rebuild the finger table.
    CalcFingerTable,
    /// Rebuild fingers and forward the sweep.
    Stabilize(StabilizeRequest),
    /// Store a file.
    UploadFile(UploadFileRequest),
    /// Read a file.
    RetrieveFile(RetrieveFileRequest),
    /// Migrate files in an interval to another node.
    ShareFiles(ShareFilesRequest),
}

impl Message {
    /// Procedure name, as used on the wire and in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Lookup(_) => "lookup",
            Message::LookupBasic(_) => "lookupBasic",
            Message::GetPred => "getPred",
            Message::GetSucc => "getSucc",
            Message::SetPred(_) => "setPred",
            Message::SetSucc(_) => "setSucc",
            Message::CalcFingerTable => "calcFingerTable",
            Message::Stabilize(_) => "stabilize",
            Message::UploadFile(_) => "uploadFile",
            Message::RetrieveFile(_) => "retrieveFile",
            Message::ShareFiles(_) => "shareFiles",
        }
    }
}

/// Answer to a [Message].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A peer, answer of lookups and pointer accessors.
    Peer(Peer),
    /// A file, answer of `RetrieveFile`.
    File(RetrieveFileResponse),
    /// Nothing but success.
    Empty,
}

impl Reply {
    /// Expect a [Reply::Peer].
    pub fn into_peer(self, method: &'static str) -> Result<Peer> {
        match self {
            Reply::Peer(peer) => Ok(peer),
            _ => Err(Error::UnexpectedReply(method)),
        }
    }

    /// Expect a [Reply::File].
    pub fn into_file(self, method: &'static str) -> Result<RetrieveFileResponse> {
        match self {
            Reply::File(file) => Ok(file),
            _ => Err(Error::UnexpectedReply(method)),
        }
    }

    /// Expect a [Reply::Empty].
    pub fn into_empty(self, method: &'static str) -> Result<()> {
        match self {
            Reply::Empty => Ok(()),
            _ => Err(Error::UnexpectedReply(method)),
        }
    }
}
