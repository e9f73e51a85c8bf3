use super::types::StationCredentials;

/// Inputs to the connectivity state machine. Timestamps are absolute
/// milliseconds supplied by the caller (one clock per engine instance);
/// deadlines armed by the machine are compared against the `now_ms` of later
/// `Tick` events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnEvent {
    /// Operator or application request to (re)join the target network.
    Enable { credentials: StationCredentials },
    /// Turn both radios off and return to `Idle`.
    Disable,
    /// Periodic, non-blocking control-loop tick.
    Tick { now_ms: u64 },
    /// Radio task: the pending station connect attempt succeeded.
    StationConnected { now_ms: u64 },
    /// Radio task: the pending station connect attempt failed or timed out.
    StationConnectFailed { now_ms: u64 },
    /// Radio task: an established station link dropped.
    StationLost { now_ms: u64 },
    /// Radio task: the self-hosted access point is up.
    ApStarted,
    /// Radio task: access-point bring-up failed.
    ApStartFailed { now_ms: u64 },
    /// A client associated with the self-hosted access point.
    ApClientJoined,
    /// A client disassociated from the self-hosted access point.
    ApClientLeft,
    /// The captive portal page was loaded; latch retry suppression until the
    /// next explicit `Enable`.
    PortalOpened,
}
