//! A [Caller] delivering messages to swarms living in the same process.
//! Used to run whole rings in tests without a network.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::DashSet;

use super::Caller;
use crate::error::Error;
use crate::error::Result;
use crate::message::HandleMsg;
use crate::message::Message;
use crate::message::Reply;
use crate::swarm::Swarm;

/// A call observed by the [DummyCaller].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRecord {
    /// Address the message was sent to.
    pub address: String,
    /// Procedure name.
    pub method: &'static str,
}

/// Routes a call to the registered swarm listening on the address.
/// Swarms are held weakly, dropping a swarm makes its address unreachable.
#[derive(Default)]
pub struct DummyCaller {
    swarms: DashMap<String, Weak<Swarm>>,
    unreachable: DashSet<String>,
    calls: Mutex<Vec<CallRecord>>,
}

impl DummyCaller {
    /// Create an empty hub.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `swarm` reachable on its own address.
    pub fn register(&self, swarm: &Arc<Swarm>) {
        self.swarms
            .insert(swarm.address().to_string(), Arc::downgrade(swarm));
    }

    /// Toggle whether calls to `address` fail with a transport error.
    pub fn set_reachable(&self, address: &str, reachable: bool) {
        if reachable {
            self.unreachable.remove(address);
        } else {
            self.unreachable.insert(address.to_string());
        }
    }

    /// Every call seen so far, in order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls of `method` seen so far.
    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

#[async_trait]
impl Caller for DummyCaller {
    async fn call(&self, address: &str, msg: Message) -> Result<Reply> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(CallRecord {
                address: address.to_string(),
                method: msg.name(),
            });
        }
        if self.unreachable.contains(address) {
            return Err(Error::Transport(format!("{address} is unreachable")));
        }
        let swarm = self
            .swarms
            .get(address)
            .and_then(|swarm| swarm.upgrade())
            .ok_or_else(|| Error::Transport(format!("connection refused by {address}")))?;
        swarm.handle(msg).await
    }
}
