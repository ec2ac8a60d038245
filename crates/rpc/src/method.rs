//! Rpc methods.
#![warn(missing_docs)]

use super::error::Error;
use super::error::Result;

/// supported methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Method {
    /// Find the owner of a key through the finger table
    Lookup,
    /// Find the owner of a key through successor pointers
    LookupBasic,
    /// Read the predecessor
    GetPred,
    /// Read the successor
    GetSucc,
    /// Write the predecessor
    SetPred,
    /// Write the successor
    SetSucc,
    /// Rebuild the finger table
    CalcFingerTable,
    /// Rebuild fingers and forward the sweep to the predecessor
    Stabilize,
    /// Store a file under a key
    UploadFile,
    /// Read a file stored under a key
    RetrieveFile,
    /// Hand files in an interval over to another node
    ShareFiles,
    /// Join the ring of an introducer
    Join,
    /// Leave the ring
    Leave,
    /// Retrieve Node info
    NodeInfo,
}

impl Method {
    /// Return method's name as `&str`
    pub fn as_str(&self) -> &str {
        match self {
            Method::Lookup => "lookup",
            Method::LookupBasic => "lookupBasic",
            Method::GetPred => "getPred",
            Method::GetSucc => "getSucc",
            Method::SetPred => "setPred",
            Method::SetSucc => "setSucc",
            Method::CalcFingerTable => "calcFingerTable",
            Method::Stabilize => "stabilize",
            Method::UploadFile => "uploadFile",
            Method::RetrieveFile => "retrieveFile",
            Method::ShareFiles => "shareFiles",
            Method::Join => "join",
            Method::Leave => "leave",
            Method::NodeInfo => "nodeInfo",
        }
    }

    /// Every method a node serves.
    pub fn all() -> &'static [Method] {
        &[
            Method::Lookup,
            Method::LookupBasic,
            Method::GetPred,
            Method::GetSucc,
            Method::SetPred,
            Method::SetSucc,
            Method::CalcFingerTable,
            Method::Stabilize,
            Method::UploadFile,
            Method::RetrieveFile,
            Method::ShareFiles,
            Method::Join,
            Method::Leave,
            Method::NodeInfo,
        ]
    }
}

#[allow(clippy::to_string_trait_impl)]
impl ToString for Method {
    fn to_string(&self) -> String {
        self.as_str().to_owned()
    }
}

impl TryFrom<&str> for Method {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self> {
        Ok(match value {
            "lookup" => Self::Lookup,
            "lookupBasic" => Self::LookupBasic,
            "getPred" => Self::GetPred,
            "getSucc" => Self::GetSucc,
            "setPred" => Self::SetPred,
            "setSucc" => Self::SetSucc,
            "calcFingerTable" => Self::CalcFingerTable,
            "stabilize" => Self::Stabilize,
            "uploadFile" => Self::UploadFile,
            "retrieveFile" => Self::RetrieveFile,
            "shareFiles" => Self::ShareFiles,
            "join" => Method::Join,
            "leave" => Method::Leave,
            "nodeInfo" => Method::NodeInfo,
            _ => return Err(Error::InvalidMethod),
        })
    }
}
