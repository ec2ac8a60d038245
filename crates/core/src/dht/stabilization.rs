//! Stabilization forwards the `Stabilize` sweep around the ring.
//!
//! A node that receives `Stabilize(origin)` rebuilds its fingers and, unless the sweep
//! is complete, passes the same request on to its predecessor. The inbound call must
//! return without waiting for that forward, so forwards are queued here and sent by a
//! background worker, one at a time, in the order they were queued.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::error::Result;
use crate::transport::SharedCaller;

/// A queued forward of `Stabilize(origin)` to `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StabilizeTask {
    /// Address the request is sent to.
    pub target: String,
    /// Address of the node that started the sweep.
    pub origin: String,
}

/// Counters of the stabilization worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizerInfo {
    /// Forwards queued and not sent yet.
    pub pending: usize,
    /// Forwards answered by the target.
    pub forwarded: usize,
    /// Forwards that failed, they are not retried.
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    pending: AtomicUsize,
    forwarded: AtomicUsize,
    failed: AtomicUsize,
}

/// The stabilization runner.
pub struct Stabilizer {
    sender: Mutex<Option<mpsc::UnboundedSender<StabilizeTask>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    counters: Arc<Counters>,
    idle: Arc<Notify>,
}

impl Stabilizer {
    /// Create a new stabilization runner and spawn its worker.
    /// Must be called from within a tokio runtime.
    pub fn new(caller: SharedCaller) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        let idle = Arc::new(Notify::new());
        let worker = tokio::spawn(run(caller, receiver, counters.clone(), idle.clone()));
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            counters,
            idle,
        }
    }

    /// Queue a forward of `Stabilize(origin)` to `target`.
    pub fn forward(&self, target: String, origin: String) -> Result<()> {
        let sender = self.sender.lock().map_err(|_| Error::DHTSyncLockError)?;
        let sender = sender.as_ref().ok_or(Error::StabilizerClosed)?;
        self.counters.pending.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("queue stabilize forward to {} for origin {}", target, origin);
        sender
            .send(StabilizeTask { target, origin })
            .map_err(|_| {
                self.counters.pending.fetch_sub(1, Ordering::SeqCst);
                Error::StabilizerClosed
            })
    }

    /// Snapshot of the counters.
    pub fn info(&self) -> StabilizerInfo {
        StabilizerInfo {
            pending: self.counters.pending.load(Ordering::SeqCst),
            forwarded: self.counters.forwarded.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }

    /// Wait until every queued forward has been sent.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if self.counters.pending.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Stop accepting forwards, send the ones already queued and stop the worker.
    pub async fn shutdown(&self) {
        let sender = match self.sender.lock() {
            Ok(mut sender) => sender.take(),
            Err(_) => None,
        };
        drop(sender);
        let worker = match self.worker.lock() {
            Ok(mut worker) => worker.take(),
            Err(_) => None,
        };
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!("[stabilize] worker stopped abnormally: {:?}", e);
            }
        }
    }
}

async fn run(
    caller: SharedCaller,
    mut receiver: mpsc::UnboundedReceiver<StabilizeTask>,
    counters: Arc<Counters>,
    idle: Arc<Notify>,
) {
    while let Some(task) = receiver.recv().await {
        tracing::debug!("STABILIZATION forward to {} start", task.target);
        match caller.stabilize(&task.target, &task.origin).await {
            Ok(()) => {
                counters.forwarded.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!("[stabilize] Failed on forward to {}: {:?}", task.target, e);
            }
        }
        tracing::debug!("STABILIZATION forward to {} end", task.target);
        counters.pending.fetch_sub(1, Ordering::SeqCst);
        idle.notify_waiters();
    }
}
