pub const SSID_MAX: usize = 32;
pub const PASSWORD_MAX: usize = 64;

/// Target network credentials for station mode. An unset ssid means station
/// mode is skipped and the manager goes straight to access-point activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StationCredentials {
    pub ssid: [u8; SSID_MAX],
    pub ssid_len: u8,
    pub password: [u8; PASSWORD_MAX],
    pub password_len: u8,
}

impl StationCredentials {
    pub const fn unset() -> Self {
        Self {
            ssid: [0; SSID_MAX],
            ssid_len: 0,
            password: [0; PASSWORD_MAX],
            password_len: 0,
        }
    }

    pub fn from_parts(ssid: &[u8], password: &[u8]) -> Result<Self, &'static str> {
        if ssid.len() > SSID_MAX || password.len() > PASSWORD_MAX {
            return Err("credential length out of range");
        }
        let mut result = Self::unset();
        result.ssid[..ssid.len()].copy_from_slice(ssid);
        result.ssid_len = ssid.len() as u8;
        result.password[..password.len()].copy_from_slice(password);
        result.password_len = password.len() as u8;
        Ok(result)
    }

    pub fn is_unset(&self) -> bool {
        self.ssid_len == 0
    }

    pub fn ssid_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.ssid[..self.ssid_len as usize]).ok()
    }

    pub fn password_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.password[..self.password_len as usize]).ok()
    }
}

impl Default for StationCredentials {
    fn default() -> Self {
        Self::unset()
    }
}

/// Work emitted by the state machine for the runtime to execute. Radio
/// commands go to the radio task; `Notify*` hooks go to the dependent
/// subsystem signals. Order within one dispatch is significant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnAction {
    ConnectStation { credentials: StationCredentials },
    DisconnectStation,
    StartAccessPoint,
    StopAccessPoint,
    RadioOff,
    NotifyStationConnected,
    NotifyAccessPointActivated,
    NotifyAccessPointDeactivated,
    NotifyStationLostWhileApActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionBuffer {
    len: usize,
    slots: [Option<ConnAction>; Self::MAX],
}

impl ActionBuffer {
    pub const MAX: usize = 4;

    pub const fn new() -> Self {
        Self {
            len: 0,
            slots: [None; Self::MAX],
        }
    }

    pub fn push(&mut self, action: ConnAction) {
        if self.len >= Self::MAX {
            return;
        }
        self.slots[self.len] = Some(action);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnAction> {
        self.slots[..self.len].iter().filter_map(Option::as_ref)
    }

    pub fn contains(&self, action: ConnAction) -> bool {
        self.iter().any(|slot| *slot == action)
    }
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of applying one event to the engine. `Rejected` is reserved for
/// an `Enable` arriving while a previous enable is still in flight; the
/// in-flight attempt is unaffected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyStatus {
    Applied,
    Unchanged,
    Rejected,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnStateId {
    #[default]
    Idle = 0,
    Connecting = 1,
    StationUp = 2,
    ApOnly = 3,
    ApDraining = 4,
    ReconnectWaiting = 5,
}

impl ConnStateId {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
