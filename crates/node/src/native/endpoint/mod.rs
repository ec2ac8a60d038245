//! chordfs-node JSON-RPC service: peer procedures and operator calls on `POST /`,
//! node info on `GET /status`.
#![warn(missing_docs)]
mod http_error;

use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use chordfs_rpc::types::NodeInfoResponse;
use jsonrpc_core::MetaIoHandler;
use tower_http::cors::CorsLayer;

use self::http_error::HttpError;
use crate::error::Error;
use crate::error::Result;
use crate::processor::Processor;

/// JSON-RPC state
#[derive(Clone)]
pub struct JsonRpcState<M>
where M: jsonrpc_core::Middleware<Arc<Processor>>
{
    processor: Arc<Processor>,
    io_handler: MetaIoHandler<Arc<Processor>, M>,
}

/// Status state
#[derive(Clone)]
pub struct StatusState {
    processor: Arc<Processor>,
}

struct RpcMiddleware;

/// Bind the listener of the JSON-RPC server. Port `0` picks a free port.
pub fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr).map_err(|e| Error::BindError(addr.to_string(), e))
}

/// Address other nodes reach the node on: `external_addr` when set, the bound
/// address otherwise.
pub fn advertised_address(listener: &TcpListener, external_addr: Option<&str>) -> Result<String> {
    if let Some(addr) = external_addr {
        return Ok(addr.to_string());
    }
    let local = listener
        .local_addr()
        .map_err(|e| Error::InvalidAddress(e.to_string()))?;
    if local.ip().is_unspecified() {
        tracing::warn!(
            "listening on {}, set external_addr so other nodes can reach this one",
            local
        );
    }
    Ok(local.to_string())
}

/// Routes of the node service.
pub fn router(processor: Arc<Processor>) -> Router {
    let jsonrpc_handler = MetaIoHandler::with_middleware(RpcMiddleware);
    let jsonrpc_state = Arc::new(JsonRpcState {
        processor: processor.clone(),
        io_handler: jsonrpc_handler,
    });

    let status_state = Arc::new(StatusState { processor });

    Router::new()
        .route("/", post(jsonrpc_io_handler).with_state(jsonrpc_state))
        .route("/status", get(status_handler).with_state(status_state))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(node_info_header))
}

/// Serve the node on `listener` until `shutdown` resolves.
/// Requests arriving while `shutdown` is pending are still served, so a leave
/// performed inside it can be answered by the rest of the ring.
pub async fn run_http_api<F>(
    listener: TcpListener,
    processor: Arc<Processor>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr().ok();
    let make_service = router(processor.clone()).into_make_service();

    tracing::info!(
        "JSON-RPC endpoint of {} on {:?}",
        processor.swarm.dht().peer,
        local
    );
    axum::Server::from_tcp(listener)?
        .serve(make_service)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn jsonrpc_io_handler<M>(
    State(state): State<Arc<JsonRpcState<M>>>,
    body: String,
) -> std::result::Result<JsonResponse, HttpError>
where
    M: jsonrpc_core::Middleware<Arc<Processor>>,
{
    let r = state
        .io_handler
        .handle_request(&body, state.processor.clone())
        .await
        .ok_or(HttpError::BadRequest)?;
    Ok(JsonResponse(r))
}

async fn node_info_header<B>(
    req: http::Request<B>,
    next: axum::middleware::Next<B>,
) -> axum::response::Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    if let Ok(version) = http::HeaderValue::from_str(crate::util::build_version().as_str()) {
        headers.insert("X-NODE-VERSION", version);
    }
    res
}

async fn status_handler(
    State(state): State<Arc<StatusState>>,
) -> std::result::Result<axum::Json<NodeInfoResponse>, HttpError> {
    let info = state.processor.get_node_info().await?;
    Ok(axum::Json(info))
}

/// JSON response struct
#[derive(Debug, Clone)]
pub struct JsonResponse(String);

impl IntoResponse for JsonResponse {
    fn into_response(self) -> axum::response::Response {
        ([("content-type", "application/json")], self.0).into_response()
    }
}

mod jsonrpc_middleware_impl {
    use std::future::Future;

    use chordfs_rpc::handler::RpcHandler;
    use jsonrpc_core::futures_util::future;
    use jsonrpc_core::futures_util::future::Either;
    use jsonrpc_core::futures_util::FutureExt;
    use jsonrpc_core::middleware::NoopCallFuture;
    use jsonrpc_core::middleware::NoopFuture;
    use jsonrpc_core::*;

    use super::*;

    impl Middleware<Arc<Processor>> for RpcMiddleware {
        type Future = NoopFuture;
        type CallFuture = NoopCallFuture;

        fn on_call<F, X>(
            &self,
            call: Call,
            meta: Arc<Processor>,
            next: F,
        ) -> Either<Self::CallFuture, X>
        where
            F: Fn(Call, Arc<Processor>) -> X + Send + Sync,
            X: Future<Output = Option<Output>> + Send + 'static,
        {
            match call {
                Call::MethodCall(req) => {
                    let fut = RpcHandler
                        .handle_request(meta, req.method, req.params.into())
                        .then(move |res| {
                            future::ready(Some(Output::from(res, req.id, req.jsonrpc)))
                        });
                    Either::Left(Box::pin(fut))
                }
                _ => Either::Left(Box::pin(next(call, meta))),
            }
        }
    }
}
