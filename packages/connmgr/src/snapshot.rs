use core::sync::atomic::{AtomicU32, Ordering};

use super::types::ConnStateId;

/// Independent role flags. Both may be set during the drain window after a
/// station reconnect while the access point is still winding down. Readers
/// get single-word consistency only; no multi-read snapshot guarantee.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkStatus {
    pub station_up: bool,
    pub access_point_up: bool,
}

impl LinkStatus {
    const STATION_UP_BIT: u32 = 1 << 0;
    const ACCESS_POINT_UP_BIT: u32 = 1 << 1;

    pub const fn none() -> Self {
        Self {
            station_up: false,
            access_point_up: false,
        }
    }

    pub const fn is_offline(self) -> bool {
        !self.station_up && !self.access_point_up
    }

    pub const fn packed(self) -> u32 {
        (if self.station_up {
            Self::STATION_UP_BIT
        } else {
            0
        }) | (if self.access_point_up {
            Self::ACCESS_POINT_UP_BIT
        } else {
            0
        })
    }

    pub const fn from_packed(raw: u32) -> Self {
        Self {
            station_up: raw & Self::STATION_UP_BIT != 0,
            access_point_up: raw & Self::ACCESS_POINT_UP_BIT != 0,
        }
    }
}

/// Full manager state as observed after one event dispatch. Used by the
/// runtime for logging and by tests; dependent subsystems should read the
/// published [`LinkStatus`] word instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnSnapshot {
    pub state: ConnStateId,
    pub status: LinkStatus,
    pub retry_attempts: u16,
    pub ap_clients: u16,
    pub suppress_retry: bool,
    pub reconnect_deadline_ms: Option<u64>,
    pub ap_drain_deadline_ms: Option<u64>,
}

static LINK_STATUS: AtomicU32 = AtomicU32::new(LinkStatus::none().packed());

pub fn publish_link_status(status: LinkStatus) {
    LINK_STATUS.store(status.packed(), Ordering::Relaxed);
}

pub fn read_link_status() -> LinkStatus {
    LinkStatus::from_packed(LINK_STATUS.load(Ordering::Relaxed))
}
