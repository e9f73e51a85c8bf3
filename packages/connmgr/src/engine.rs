use statig::blocking::IntoStateMachineExt as _;

use super::backoff::ManagerConfig;
use super::events::ConnEvent;
use super::machine::{ConnMachine, DispatchContext};
use super::snapshot::{publish_link_status, ConnSnapshot};
use super::types::{ActionBuffer, ApplyStatus};

/// Result of dispatching one event into the manager.
#[derive(Clone, Copy, Debug)]
pub struct ConnApplyResult {
    pub before: ConnSnapshot,
    pub after: ConnSnapshot,
    pub status: ApplyStatus,
    pub actions: ActionBuffer,
}

impl ConnApplyResult {
    pub fn changed(&self) -> bool {
        matches!(self.status, ApplyStatus::Applied)
    }

    pub fn rejected(&self) -> bool {
        matches!(self.status, ApplyStatus::Rejected)
    }
}

/// Owns the connectivity state machine and turns events into snapshots plus
/// side-effect requests. Single-owner by construction: dispatch needs `&mut
/// self`, so an event is fully applied before the next one is looked at.
pub struct ConnEngine {
    machine: statig::blocking::StateMachine<ConnMachine>,
}

impl ConnEngine {
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            machine: ConnMachine::new(config.sanitized()).state_machine(),
        }
    }

    pub fn snapshot(&self) -> ConnSnapshot {
        self.machine.inner().snapshot()
    }

    /// Applies one event and publishes the resulting link status. The
    /// returned actions must be carried out by the caller; the engine itself
    /// never touches the radio.
    pub fn apply(&mut self, event: ConnEvent) -> ConnApplyResult {
        let before = self.snapshot();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.snapshot();
        publish_link_status(after.status);
        ConnApplyResult {
            before,
            after,
            status: context.status,
            actions: context.actions,
        }
    }
}

impl Default for ConnEngine {
    fn default() -> Self {
        Self::new(ManagerConfig::defaults())
    }
}
