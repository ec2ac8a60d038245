#![doc = include_str!("../README.md")]
pub mod error;
pub mod logging;
pub mod native;
pub mod prelude;
pub mod processor;
mod rpc_impl;
#[cfg(test)]
mod tests;
pub mod util;
