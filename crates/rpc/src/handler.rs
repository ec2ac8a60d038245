//! Server side of the JSON-RPC interface: routes a method name and its params
//! to the processor implementing [HandleRpc] for the matching request type.
use std::sync::Arc;

use async_trait::async_trait;
use chordfs_core::dht::Peer;
use jsonrpc_core::types::error::Error;
use jsonrpc_core::types::error::ErrorCode;
use jsonrpc_core::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::method::Method;
use crate::types::*;

/// Used for processor to match rpc request and response.
#[async_trait]
pub trait HandleRpc<Req, Resp> {
    /// Handle rpc request and return response.
    async fn handle_rpc(&self, req: Req) -> Result<Resp>;
}

/// Provide handle_request method for the node rpc api.
#[derive(Clone)]
pub struct RpcHandler;

impl RpcHandler {
    /// Handle rpc request.
    pub async fn handle_request<P>(
        &self,
        processor: Arc<P>,
        method: String,
        params: serde_json::Value,
    ) -> Result<serde_json::Value>
    where
        P: HandleRpc<LookupRequest, Peer>
            + HandleRpc<LookupBasicRequest, Peer>
            + HandleRpc<GetPredRequest, Peer>
            + HandleRpc<GetSuccRequest, Peer>
            + HandleRpc<SetPredRequest, Peer>
            + HandleRpc<SetSuccRequest, Peer>
            + HandleRpc<CalcFingerTableRequest, ()>
            + HandleRpc<StabilizeRequest, ()>
            + HandleRpc<UploadFileRequest, ()>
            + HandleRpc<RetrieveFileRequest, RetrieveFileResponse>
            + HandleRpc<ShareFilesRequest, ()>
            + HandleRpc<JoinRequest, JoinResponse>
            + HandleRpc<LeaveRequest, LeaveResponse>
            + HandleRpc<NodeInfoRequest, NodeInfoResponse>
            + Send
            + Sync,
    {
        let method = Method::try_from(method.as_str()).map_err(|_| Error {
            code: ErrorCode::MethodNotFound,
            message: format!("method {} is not found", method),
            data: None,
        })?;
        tracing::debug!("rpc {}", method.as_str());

        // Methods without arguments may be called with no params at all.
        let params = match params {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            v => v,
        };

        let p: &P = &processor;
        match method {
            Method::Lookup => dispatch::<_, LookupRequest, Peer>(p, params).await,
            Method::LookupBasic => {
                dispatch::<_, LookupBasicRequest, Peer>(p, params).await
            }
            Method::GetPred => dispatch::<_, GetPredRequest, Peer>(p, params).await,
            Method::GetSucc => dispatch::<_, GetSuccRequest, Peer>(p, params).await,
            Method::SetPred => dispatch::<_, SetPredRequest, Peer>(p, params).await,
            Method::SetSucc => dispatch::<_, SetSuccRequest, Peer>(p, params).await,
            Method::CalcFingerTable => {
                dispatch::<_, CalcFingerTableRequest, ()>(p, params).await
            }
            Method::Stabilize => dispatch::<_, StabilizeRequest, ()>(p, params).await,
            Method::UploadFile => dispatch::<_, UploadFileRequest, ()>(p, params).await,
            Method::RetrieveFile => {
                dispatch::<_, RetrieveFileRequest, RetrieveFileResponse>(p, params).await
            }
            Method::ShareFiles => dispatch::<_, ShareFilesRequest, ()>(p, params).await,
            Method::Join => dispatch::<_, JoinRequest, JoinResponse>(p, params).await,
            Method::Leave => dispatch::<_, LeaveRequest, LeaveResponse>(p, params).await,
            Method::NodeInfo => {
                dispatch::<_, NodeInfoRequest, NodeInfoResponse>(p, params).await
            }
        }
    }
}

async fn dispatch<P, Req, Resp>(processor: &P, params: serde_json::Value) -> Result<serde_json::Value>
where
    P: HandleRpc<Req, Resp> + Sync,
    Req: DeserializeOwned + Send,
    Resp: Serialize,
{
    let req = serde_json::from_value::<Req>(params).map_err(|e| Error::invalid_params(e.to_string()))?;
    let resp = processor.handle_rpc(req).await?;
    serde_json::to_value(resp).map_err(|_| Error::new(ErrorCode::ParseError))
}
