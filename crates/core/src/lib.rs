#![doc = include_str!("../README.md")]
pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod message;
pub mod prelude;
pub mod storage;
pub mod swarm;
#[cfg(test)]
mod tests;
pub mod transport;
