use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;

/// Outcome of one step of join or leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The step succeeded.
    Done,
    /// The step failed, the protocol went on with the remaining steps.
    Failed(String),
    /// The step was not attempted, an earlier failure left it without input.
    Skipped,
}

/// Steps of joining a ring, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStep {
    /// `Lookup(self)` at the introducer.
    LookupSuccessor,
    /// `GetPred` at the new successor.
    QueryPredecessor,
    /// `SetPred(self)` at the successor.
    NotifySuccessor,
    /// `SetSucc(self)` at the predecessor.
    NotifyPredecessor,
    /// Recompute the own finger table.
    CalcFingerTable,
    /// `CalcFingerTable` at the predecessor.
    RefreshPredecessorFingers,
    /// `CalcFingerTable` at the successor.
    RefreshSuccessorFingers,
    /// `ShareFiles(pred, self, self)` at the successor.
    ShareFiles,
    /// `Stabilize(self)` at the predecessor.
    Stabilize,
}

/// Steps of leaving a ring, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStep {
    /// `SetSucc(successor)` at the predecessor.
    NotifyPredecessor,
    /// `SetPred(predecessor)` at the successor.
    NotifySuccessor,
    /// Hand one owned file over to the successor.
    TransferFile(Did),
    /// Remove the local storage area.
    RemoveStorage,
    /// `Stabilize(predecessor)` at the predecessor.
    Stabilize,
}

/// Record of each step of a membership protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolReport<S> {
    /// Steps in the order they were run.
    pub steps: Vec<(S, StepOutcome)>,
}

/// Report of [Swarm::join](crate::swarm::Swarm::join).
pub type JoinReport = ProtocolReport<JoinStep>;
/// Report of [Swarm::leave](crate::swarm::Swarm::leave).
pub type LeaveReport = ProtocolReport<LeaveStep>;

impl<S> Default for ProtocolReport<S> {
    fn default() -> Self {
        Self { steps: vec![] }
    }
}

impl<S> ProtocolReport<S>
where S: Clone + PartialEq + std::fmt::Debug
{
    pub(crate) fn done(&mut self, step: S) {
        self.steps.push((step, StepOutcome::Done));
    }

    pub(crate) fn failed(&mut self, step: S, err: &Error) {
        tracing::error!("[membership] step {:?} failed: {}", step, err);
        self.steps.push((step, StepOutcome::Failed(err.to_string())));
    }

    pub(crate) fn skipped(&mut self, step: S) {
        tracing::debug!("[membership] step {:?} skipped", step);
        self.steps.push((step, StepOutcome::Skipped));
    }

    /// Record the outcome of `result` for `step`.
    pub(crate) fn record<T>(&mut self, step: S, result: Result<T>) {
        match result {
            Ok(_) => self.done(step),
            Err(e) => self.failed(step, &e),
        }
    }

    /// Outcome of `step`, if it was reached.
    pub fn outcome(&self, step: &S) -> Option<&StepOutcome> {
        self.steps.iter().find(|(s, _)| s == step).map(|(_, o)| o)
    }

    /// Every step ran and succeeded.
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|(_, o)| *o == StepOutcome::Done)
    }

    /// Steps that failed.
    pub fn failed_steps(&self) -> Vec<S> {
        self.steps
            .iter()
            .filter(|(_, o)| matches!(o, StepOutcome::Failed(_)))
            .map(|(s, _)| s.clone())
            .collect()
    }
}
