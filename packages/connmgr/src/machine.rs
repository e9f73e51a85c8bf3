use statig::prelude::*;

use super::backoff::ManagerConfig;
use super::events::ConnEvent;
use super::snapshot::{ConnSnapshot, LinkStatus};
use super::types::{ActionBuffer, ApplyStatus, ConnAction, ConnStateId, StationCredentials};

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: ApplyStatus,
    pub(super) actions: ActionBuffer,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: ApplyStatus::Unchanged,
            actions: ActionBuffer::new(),
        }
    }
}

pub(super) struct ConnMachine {
    config: ManagerConfig,
    status: LinkStatus,
    state_id: ConnStateId,
    retry_attempts: u16,
    ap_clients: u16,
    suppress_retry: bool,
    reconnect_deadline_ms: Option<u64>,
    ap_drain_deadline_ms: Option<u64>,
    credentials: StationCredentials,
    // Whether the pending connect attempt was operator-requested. Deliberate
    // attempt failures do not advance the retry counter; unsolicited ones do.
    connect_deliberate: bool,
}

impl ConnMachine {
    pub(super) fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            status: LinkStatus::none(),
            state_id: ConnStateId::Idle,
            retry_attempts: 0,
            ap_clients: 0,
            suppress_retry: false,
            reconnect_deadline_ms: None,
            ap_drain_deadline_ms: None,
            credentials: StationCredentials::unset(),
            connect_deliberate: false,
        }
    }

    pub(super) fn snapshot(&self) -> ConnSnapshot {
        ConnSnapshot {
            state: self.state_id,
            status: self.status,
            retry_attempts: self.retry_attempts,
            ap_clients: self.ap_clients,
            suppress_retry: self.suppress_retry,
            reconnect_deadline_ms: self.reconnect_deadline_ms,
            ap_drain_deadline_ms: self.ap_drain_deadline_ms,
        }
    }

    fn arm_reconnect(&mut self, now_ms: u64) {
        self.reconnect_deadline_ms =
            Some(now_ms + self.config.backoff.delay_ms(self.retry_attempts));
    }

    // Shared `Enable` path. Clears the suppression latch and both timers,
    // then either starts a fresh station attempt or, with no target network
    // configured, goes straight to access-point activation.
    fn begin_enable(
        &mut self,
        context: &mut DispatchContext,
        credentials: &StationCredentials,
    ) -> Outcome<State> {
        let station_was_up = self.status.station_up;
        self.credentials = *credentials;
        self.suppress_retry = false;
        self.reconnect_deadline_ms = None;
        self.ap_drain_deadline_ms = None;
        self.status.station_up = false;
        context.status = ApplyStatus::Applied;

        if credentials.is_unset() {
            // A live station link has no place in access-point-only mode;
            // the radio must drop the association, not just the flag.
            if station_was_up {
                context.actions.push(ConnAction::DisconnectStation);
            }
            if !self.status.access_point_up {
                context.actions.push(ConnAction::StartAccessPoint);
            }
            self.state_id = ConnStateId::ApOnly;
            Transition(State::ap_only())
        } else {
            self.connect_deliberate = true;
            context.actions.push(ConnAction::ConnectStation {
                credentials: *credentials,
            });
            self.state_id = ConnStateId::Connecting;
            Transition(State::connecting())
        }
    }

    fn station_link_established(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
    ) -> Outcome<State> {
        self.retry_attempts = 0;
        self.reconnect_deadline_ms = None;
        self.status.station_up = true;
        context.status = ApplyStatus::Applied;

        if self.status.access_point_up {
            self.ap_drain_deadline_ms = Some(now_ms + self.config.ap_drain_grace_ms);
            self.state_id = ConnStateId::ApDraining;
            Transition(State::ap_draining())
        } else {
            context.actions.push(ConnAction::NotifyStationConnected);
            self.state_id = ConnStateId::StationUp;
            Transition(State::station_up())
        }
    }

    fn station_link_lost(
        &mut self,
        context: &mut DispatchContext,
        now_ms: u64,
    ) -> Outcome<State> {
        self.status.station_up = false;
        self.ap_drain_deadline_ms = None;
        self.arm_reconnect(now_ms);
        if self.status.access_point_up {
            context
                .actions
                .push(ConnAction::NotifyStationLostWhileApActive);
        }
        context.status = ApplyStatus::Applied;
        self.state_id = ConnStateId::ReconnectWaiting;
        Transition(State::reconnect_waiting())
    }

    fn schedule_ap_retry(&mut self, context: &mut DispatchContext, now_ms: u64) {
        self.arm_reconnect(now_ms);
        context.status = ApplyStatus::Applied;
    }

    fn shut_down(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        context.actions.push(ConnAction::RadioOff);
        if self.status.access_point_up {
            context.actions.push(ConnAction::NotifyAccessPointDeactivated);
        }
        self.status = LinkStatus::none();
        self.retry_attempts = 0;
        self.ap_clients = 0;
        self.suppress_retry = false;
        self.reconnect_deadline_ms = None;
        self.ap_drain_deadline_ms = None;
        self.connect_deliberate = false;
        context.status = ApplyStatus::Applied;
        self.state_id = ConnStateId::Idle;
        Transition(State::idle())
    }
}

#[state_machine(initial = "State::idle()")]
impl ConnMachine {
    /// Radio off. Only an explicit `Enable` leaves this state.
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &ConnEvent) -> Outcome<State> {
        match event {
            ConnEvent::Enable { credentials } => self.begin_enable(context, credentials),
            _ => Handled,
        }
    }

    /// A station connect attempt is in flight in the radio task. Not
    /// reentrant: a second `Enable` is rejected without touching the
    /// in-flight attempt.
    #[state(superstate = "enabled")]
    fn connecting(&mut self, context: &mut DispatchContext, event: &ConnEvent) -> Outcome<State> {
        match event {
            ConnEvent::Enable { .. } => {
                context.status = ApplyStatus::Rejected;
                Handled
            }
            ConnEvent::StationConnected { now_ms } => {
                self.station_link_established(context, *now_ms)
            }
            ConnEvent::StationConnectFailed { now_ms } => {
                if !self.connect_deliberate {
                    self.retry_attempts = self.retry_attempts.saturating_add(1);
                }
                self.arm_reconnect(*now_ms);
                if !self.status.access_point_up {
                    context.actions.push(ConnAction::StartAccessPoint);
                }
                context.status = ApplyStatus::Applied;
                self.state_id = ConnStateId::ReconnectWaiting;
                Transition(State::reconnect_waiting())
            }
            ConnEvent::Tick { .. } | ConnEvent::StationLost { .. } => Handled,
            _ => Super,
        }
    }

    #[state(superstate = "enabled")]
    fn station_up(&mut self, context: &mut DispatchContext, event: &ConnEvent) -> Outcome<State> {
        match event {
            ConnEvent::Enable { credentials } => self.begin_enable(context, credentials),
            ConnEvent::StationLost { now_ms } => self.station_link_lost(context, *now_ms),
            ConnEvent::Tick { .. } => Handled,
            _ => Super,
        }
    }

    /// Access point only, no station retry armed (no target network
    /// configured). Credentials submitted through the portal arrive as a
    /// fresh `Enable`.
    #[state(superstate = "enabled")]
    fn ap_only(&mut self, context: &mut DispatchContext, event: &ConnEvent) -> Outcome<State> {
        match event {
            ConnEvent::Enable { credentials } => self.begin_enable(context, credentials),
            ConnEvent::ApStartFailed { now_ms } => {
                self.schedule_ap_retry(context, *now_ms);
                self.state_id = ConnStateId::ReconnectWaiting;
                Transition(State::reconnect_waiting())
            }
            ConnEvent::Tick { .. } => Handled,
            _ => Super,
        }
    }

    /// Station reconnected while the access point is still up. The AP is
    /// torn down once the grace deadline has passed and no client is left
    /// associated; the station-connected hook fires only then.
    #[state(superstate = "enabled")]
    fn ap_draining(&mut self, context: &mut DispatchContext, event: &ConnEvent) -> Outcome<State> {
        match event {
            ConnEvent::Tick { now_ms } => {
                let Some(deadline) = self.ap_drain_deadline_ms else {
                    return Handled;
                };
                if *now_ms < deadline || self.ap_clients > 0 {
                    return Handled;
                }
                self.ap_drain_deadline_ms = None;
                self.status.access_point_up = false;
                context.actions.push(ConnAction::StopAccessPoint);
                context.actions.push(ConnAction::NotifyAccessPointDeactivated);
                context.actions.push(ConnAction::NotifyStationConnected);
                context.status = ApplyStatus::Applied;
                self.state_id = ConnStateId::StationUp;
                Transition(State::station_up())
            }
            ConnEvent::StationLost { now_ms } => self.station_link_lost(context, *now_ms),
            ConnEvent::Enable { credentials } => self.begin_enable(context, credentials),
            _ => Super,
        }
    }

    /// Waiting out the backoff period before the next unsolicited station
    /// attempt. The retry is gated on the suppression latch and on the AP
    /// client counter being zero.
    #[state(superstate = "enabled")]
    fn reconnect_waiting(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnEvent,
    ) -> Outcome<State> {
        match event {
            ConnEvent::Tick { now_ms } => {
                let Some(deadline) = self.reconnect_deadline_ms else {
                    return Handled;
                };
                if *now_ms < deadline {
                    return Handled;
                }
                if self.credentials.is_unset() {
                    self.reconnect_deadline_ms = None;
                    if !self.status.access_point_up {
                        context.actions.push(ConnAction::StartAccessPoint);
                    }
                    context.status = ApplyStatus::Applied;
                    self.state_id = ConnStateId::ApOnly;
                    return Transition(State::ap_only());
                }
                if self.suppress_retry || self.ap_clients > 0 {
                    return Handled;
                }
                self.reconnect_deadline_ms = None;
                self.connect_deliberate = false;
                context.actions.push(ConnAction::ConnectStation {
                    credentials: self.credentials,
                });
                context.status = ApplyStatus::Applied;
                self.state_id = ConnStateId::Connecting;
                Transition(State::connecting())
            }
            ConnEvent::Enable { credentials } => self.begin_enable(context, credentials),
            ConnEvent::ApStartFailed { now_ms } => {
                self.schedule_ap_retry(context, *now_ms);
                Handled
            }
            ConnEvent::StationLost { .. } => Handled,
            _ => Super,
        }
    }

    /// Shared handling for every powered state: radio-off requests, AP
    /// bring-up results, portal client edges, and the suppression latch.
    #[superstate]
    fn enabled(&mut self, context: &mut DispatchContext, event: &ConnEvent) -> Outcome<State> {
        match event {
            ConnEvent::Disable => self.shut_down(context),
            ConnEvent::ApStarted => {
                if !self.status.access_point_up {
                    self.status.access_point_up = true;
                    context.actions.push(ConnAction::NotifyAccessPointActivated);
                    context.status = ApplyStatus::Applied;
                }
                Handled
            }
            ConnEvent::ApClientJoined => {
                self.ap_clients = self.ap_clients.saturating_add(1);
                context.status = ApplyStatus::Applied;
                Handled
            }
            ConnEvent::ApClientLeft => {
                if self.ap_clients > 0 {
                    self.ap_clients -= 1;
                    context.status = ApplyStatus::Applied;
                }
                Handled
            }
            ConnEvent::PortalOpened => {
                if !self.suppress_retry {
                    self.suppress_retry = true;
                    context.status = ApplyStatus::Applied;
                }
                Handled
            }
            _ => Handled,
        }
    }
}
