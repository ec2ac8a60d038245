//! Join, leave and stabilize.
//!
//! Remote failures in these protocols are logged, recorded in the report and the
//! protocol goes on with the steps that do not depend on the failed one.

use crate::consts::FINGER_TABLE_SIZE;
use crate::dht::Peer;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::types::JoinReport;
use crate::swarm::types::JoinStep;
use crate::swarm::types::LeaveReport;
use crate::swarm::types::LeaveStep;
use crate::swarm::Swarm;

impl Swarm {
    /// Join the ring that the node on `introducer` is a member of.
    pub async fn join(&self, introducer: &str) -> Result<JoinReport> {
        if introducer == self.address() {
            return Err(Error::ShouldNotJoinSelf);
        }
        let _membership = self.membership.lock().await;
        tracing::info!("{} join ring through {}", self.dht.peer, introducer);
        let mut report = JoinReport::default();

        let successor = match self.caller.lookup(introducer, self.did()).await {
            Ok(successor) => successor,
            Err(e) => {
                report.failed(JoinStep::LookupSuccessor, &e);
                for step in [
                    JoinStep::QueryPredecessor,
                    JoinStep::NotifySuccessor,
                    JoinStep::NotifyPredecessor,
                    JoinStep::CalcFingerTable,
                    JoinStep::RefreshPredecessorFingers,
                    JoinStep::RefreshSuccessorFingers,
                    JoinStep::ShareFiles,
                    JoinStep::Stabilize,
                ] {
                    report.skipped(step);
                }
                return Ok(report);
            }
        };
        if successor.address == self.address() {
            return Err(Error::AlreadyJoined(introducer.to_string()));
        }
        self.dht.set_successor(successor.clone())?;
        report.done(JoinStep::LookupSuccessor);

        let predecessor = match self.caller.get_predecessor(&successor.address).await {
            Ok(predecessor) if predecessor.address == self.address() => {
                report.failed(
                    JoinStep::QueryPredecessor,
                    &Error::AlreadyJoined(successor.address.clone()),
                );
                None
            }
            Ok(predecessor) => {
                self.dht.set_predecessor(predecessor.clone())?;
                report.done(JoinStep::QueryPredecessor);
                Some(predecessor)
            }
            Err(e) => {
                report.failed(JoinStep::QueryPredecessor, &e);
                None
            }
        };

        report.record(
            JoinStep::NotifySuccessor,
            self.caller
                .set_predecessor(&successor.address, self.address())
                .await,
        );

        match &predecessor {
            Some(predecessor) => report.record(
                JoinStep::NotifyPredecessor,
                self.caller
                    .set_successor(&predecessor.address, self.address())
                    .await,
            ),
            None => report.skipped(JoinStep::NotifyPredecessor),
        }

        report.record(JoinStep::CalcFingerTable, self.calc_finger_table().await);

        match &predecessor {
            Some(predecessor) => report.record(
                JoinStep::RefreshPredecessorFingers,
                self.caller.calc_finger_table(&predecessor.address).await,
            ),
            None => report.skipped(JoinStep::RefreshPredecessorFingers),
        }
        report.record(
            JoinStep::RefreshSuccessorFingers,
            self.caller.calc_finger_table(&successor.address).await,
        );

        match &predecessor {
            Some(predecessor) => report.record(
                JoinStep::ShareFiles,
                self.caller
                    .share_files(
                        &successor.address,
                        predecessor.did,
                        self.did(),
                        self.address(),
                    )
                    .await,
            ),
            None => report.skipped(JoinStep::ShareFiles),
        }

        match &predecessor {
            Some(predecessor) => report.record(
                JoinStep::Stabilize,
                self.caller
                    .stabilize(&predecessor.address, self.address())
                    .await,
            ),
            None => report.skipped(JoinStep::Stabilize),
        }

        tracing::info!(
            "{} joined, successor {}, failed steps {:?}",
            self.dht.peer,
            successor,
            report.failed_steps()
        );
        Ok(report)
    }

    /// Leave the ring, handing every owned file over to the successor.
    /// The node is solitary afterwards.
    pub async fn leave(&self) -> Result<LeaveReport> {
        let _membership = self.membership.lock().await;
        let mut files = self.files.lock().await;
        let mut report = LeaveReport::default();

        let successor = self.dht.successor()?;
        let predecessor = self.dht.predecessor()?;
        if successor.address == self.address() || predecessor.address == self.address() {
            tracing::info!("{} is not in a ring, nothing to leave", self.dht.peer);
            report.skipped(LeaveStep::NotifyPredecessor);
            report.skipped(LeaveStep::NotifySuccessor);
            report.skipped(LeaveStep::RemoveStorage);
            report.skipped(LeaveStep::Stabilize);
            return Ok(report);
        }
        tracing::info!(
            "{} leave ring, predecessor {}, successor {}",
            self.dht.peer,
            predecessor,
            successor
        );

        report.record(
            LeaveStep::NotifyPredecessor,
            self.caller
                .set_successor(&predecessor.address, &successor.address)
                .await,
        );
        report.record(
            LeaveStep::NotifySuccessor,
            self.caller
                .set_predecessor(&successor.address, &predecessor.address)
                .await,
        );

        let owned: Vec<_> = files.iter().map(|(k, v)| (*k, v.clone())).collect();
        for (did, filename) in owned {
            let result = self.hand_over(&successor.address, did, &filename).await;
            if result.is_ok() {
                files.remove(&did);
            }
            report.record(LeaveStep::TransferFile(did), result);
        }

        if files.is_empty() {
            report.record(LeaveStep::RemoveStorage, self.storage.destroy().await);
        } else {
            tracing::warn!(
                "{} keeps {} files that could not be handed over",
                self.dht.peer,
                files.len()
            );
            report.skipped(LeaveStep::RemoveStorage);
        }

        report.record(
            LeaveStep::Stabilize,
            self.caller
                .stabilize(&predecessor.address, &predecessor.address)
                .await,
        );

        self.dht.reset()?;
        Ok(report)
    }

    /// Recompute fingers and pass the sweep started by `origin` on to the predecessor.
    /// The forward is queued, this returns before the predecessor is reached.
    pub async fn stabilize(&self, origin: &str) -> Result<()> {
        let _membership = self.membership.lock().await;
        if let Err(e) = self.calc_finger_table().await {
            tracing::error!("[stabilize] Failed on calc finger table {:?}", e);
        }
        let predecessor = self.dht.predecessor()?;
        if predecessor.address == origin {
            tracing::debug!("stabilize sweep of {} completed at {}", origin, self.address());
            return Ok(());
        }
        if predecessor.address == self.address() {
            tracing::debug!("{} has no predecessor to forward stabilize", self.address());
            return Ok(());
        }
        self.stabilizer.forward(predecessor.address, origin.to_string())
    }

    /// Rebuild the finger table with successor-only lookups.
    ///
    /// The new table is built aside and swapped in at once. An entry whose lookup
    /// failed keeps its previous value, and the first failure is returned after the
    /// swap.
    pub async fn calc_finger_table(&self) -> Result<()> {
        let mut table = self.dht.finger_table()?;
        let mut failure = None;
        for index in 0..FINGER_TABLE_SIZE {
            let start = table.start(index);
            match self.lookup_basic(start).await {
                Ok(peer) => table.set(index, peer),
                Err(e) => {
                    tracing::warn!("failed to fix finger {} ({}): {:?}", index, start, e);
                    failure.get_or_insert(e);
                }
            }
        }
        self.dht.replace_finger(table)?;
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Point the successor at `peer`, serialized with the other membership changes.
    pub async fn set_successor(&self, peer: Peer) -> Result<Peer> {
        let _membership = self.membership.lock().await;
        self.dht.set_successor(peer)
    }

    /// Point the predecessor at `peer`, serialized with the other membership changes.
    pub async fn set_predecessor(&self, peer: Peer) -> Result<Peer> {
        let _membership = self.membership.lock().await;
        self.dht.set_predecessor(peer)
    }
}
