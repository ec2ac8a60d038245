#![doc = include_str!("../README.md")]
pub mod caller;
pub mod error;
pub mod handler;
pub mod jsonrpc;
pub mod method;
pub mod types;

pub use caller::HttpCaller;
pub use handler::HandleRpc;
pub use handler::RpcHandler;
pub use jsonrpc::Client;
pub use method::Method;
