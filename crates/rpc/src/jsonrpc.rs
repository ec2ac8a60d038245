//! chordfs-rpc client

use chordfs_core::dht::Peer;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::method::Method;
use crate::types::*;

/// Wrap json_client send request between nodes or from an operator to a node.
pub struct Client {
    client: HttpClient,
    endpoint_url: String,
}

/// The errors returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// An error returned by the server.
    #[error("Server returned rpc error {0}")]
    JsonClientError(jsonrpc_core::Error),
    /// Failure to parse server response.
    #[error("Failed to parse server response as {0}: {1}")]
    ParseError(String, Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("Request timed out")]
    Timeout,
    /// A general client error.
    #[error("Client error: {0}")]
    Client(String),
}

/// A wrap `Result` contains ClientError.
type Result<T> = std::result::Result<T, RpcError>;

impl From<RpcError> for chordfs_core::error::Error {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::JsonClientError(e) => Self::from_remote(e.code.code(), e.message),
            e => Self::Transport(e.to_string()),
        }
    }
}

impl Client {
    /// Creates a new Client instance with the specified endpoint URL
    pub fn new(endpoint_url: &str) -> Self {
        Self::new_with_http_client(endpoint_url, HttpClient::default())
    }

    /// Creates a new Client sharing the connection pool and settings of `client`.
    pub fn new_with_http_client(endpoint_url: &str, client: HttpClient) -> Self {
        Self {
            client,
            endpoint_url: endpoint_url.to_string(),
        }
    }

    /// Endpoint this client talks to.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub async fn call_method<T>(&self, method: Method, req: &impl Serialize) -> Result<T>
    where T: DeserializeOwned {
        use jsonrpc_core::*;

        let params = serde_json::to_value(req)
            .map_err(|e| RpcError::Client(e.to_string()))?
            .as_object()
            .ok_or(RpcError::Client("params should be an object".to_string()))?
            .clone();

        let jsonrpc_request = Request::Single(Call::MethodCall(MethodCall {
            jsonrpc: Some(Version::V2),
            method: method.to_string(),
            params: Params::Map(params),
            id: Id::Num(1),
        }));

        let result = self.do_jsonrpc_request(&jsonrpc_request).await?;
        serde_json::from_value(result).map_err(|e| RpcError::ParseError(e.to_string(), Box::new(e)))
    }

    async fn do_jsonrpc_request(&self, req: &jsonrpc_core::Request) -> Result<serde_json::Value> {
        let body = serde_json::to_string(req).map_err(|e| RpcError::Client(e.to_string()))?;

        let req = self
            .client
            .post(self.endpoint_url.as_str())
            .header("content-type", "application/json")
            .header("accept", "application/json")
            .body(body);

        let resp = req
            .send()
            .await
            .map_err(map_reqwest_error)?
            .error_for_status()
            .map_err(map_reqwest_error)?
            .bytes()
            .await
            .map_err(|e| RpcError::ParseError(e.to_string(), Box::new(e)))?;

        let jsonrpc_resp = jsonrpc_core::Response::from_json(&String::from_utf8_lossy(&resp))
            .map_err(|e| RpcError::ParseError(e.to_string(), Box::new(e)))?;

        match jsonrpc_resp {
            jsonrpc_core::Response::Single(resp) => match resp {
                jsonrpc_core::Output::Success(success) => Ok(success.result),
                jsonrpc_core::Output::Failure(failure) => {
                    Err(RpcError::JsonClientError(failure.error))
                }
            },
            jsonrpc_core::Response::Batch(_) => Err(RpcError::Client(
                "Batch response is not supported".to_string(),
            )),
        }
    }

    /// Asks the node for the owner of `did`, routed through its finger table.
    pub async fn lookup(&self, req: &LookupRequest) -> Result<Peer> {
        self.call_method(Method::Lookup, req).await
    }

    /// Asks the node for the owner of `did`, following successor pointers only.
    pub async fn lookup_basic(&self, req: &LookupBasicRequest) -> Result<Peer> {
        self.call_method(Method::LookupBasic, req).await
    }

    pub async fn get_pred(&self) -> Result<Peer> {
        self.call_method(Method::GetPred, &GetPredRequest {}).await
    }

    pub async fn get_succ(&self) -> Result<Peer> {
        self.call_method(Method::GetSucc, &GetSuccRequest {}).await
    }

    pub async fn set_pred(&self, req: &SetPredRequest) -> Result<Peer> {
        self.call_method(Method::SetPred, req).await
    }

    pub async fn set_succ(&self, req: &SetSuccRequest) -> Result<Peer> {
        self.call_method(Method::SetSucc, req).await
    }

    pub async fn calc_finger_table(&self) -> Result<()> {
        self.call_method(Method::CalcFingerTable, &CalcFingerTableRequest {})
            .await
    }

    /// Starts or continues a stabilize sweep. Returns once the node has rebuilt its
    /// fingers, before the sweep goes on.
    pub async fn stabilize(&self, req: &StabilizeRequest) -> Result<()> {
        self.call_method(Method::Stabilize, req).await
    }

    pub async fn upload_file(&self, req: &UploadFileRequest) -> Result<()> {
        self.call_method(Method::UploadFile, req).await
    }

    pub async fn retrieve_file(&self, req: &RetrieveFileRequest) -> Result<RetrieveFileResponse> {
        self.call_method(Method::RetrieveFile, req).await
    }

    pub async fn share_files(&self, req: &ShareFilesRequest) -> Result<()> {
        self.call_method(Method::ShareFiles, req).await
    }

    /// Makes the node join the ring of `introducer`.
    pub async fn join(&self, req: &JoinRequest) -> Result<JoinResponse> {
        self.call_method(Method::Join, req).await
    }

    /// Makes the node leave its ring.
    pub async fn leave(&self) -> Result<LeaveResponse> {
        self.call_method(Method::Leave, &LeaveRequest {}).await
    }

    /// Query for swarm inspect info.
    pub async fn node_info(&self) -> Result<NodeInfoResponse> {
        self.call_method(Method::NodeInfo, &NodeInfoRequest {}).await
    }
}

fn map_reqwest_error(e: reqwest::Error) -> RpcError {
    if e.is_timeout() {
        return RpcError::Timeout;
    }
    RpcError::Client(e.to_string())
}
