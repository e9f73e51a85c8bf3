// Station-reconnect schedule.
//
// The reference cadence retries every 30 seconds for the first handful of
// attempts (covers a rebooting router or momentary signal loss), then every
// 6 minutes, then every 15 minutes indefinitely. The schedule is plain data:
// any replacement, including a constant interval, works without touching the
// state machine.

const BACKOFF_BASE_SECS_DEFAULT: u32 = 30;
const BACKOFF_MID_SECS_DEFAULT: u32 = 360;
const BACKOFF_LONG_SECS_DEFAULT: u32 = 900;
const BACKOFF_BASE_TRIES_DEFAULT: u16 = 6;
const BACKOFF_MID_TRIES_DEFAULT: u16 = 21;

// 10s: long enough for an in-flight captive-portal request to complete
// before the access point is torn down after a station reconnect.
const AP_DRAIN_GRACE_MS_DEFAULT: u64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_secs: u32,
    pub mid_secs: u32,
    pub long_secs: u32,
    pub base_tries: u16,
    pub mid_tries: u16,
}

impl BackoffPolicy {
    pub const fn defaults() -> Self {
        Self {
            base_secs: BACKOFF_BASE_SECS_DEFAULT,
            mid_secs: BACKOFF_MID_SECS_DEFAULT,
            long_secs: BACKOFF_LONG_SECS_DEFAULT,
            base_tries: BACKOFF_BASE_TRIES_DEFAULT,
            mid_tries: BACKOFF_MID_TRIES_DEFAULT,
        }
    }

    pub const fn constant(secs: u32) -> Self {
        Self {
            base_secs: secs,
            mid_secs: secs,
            long_secs: secs,
            base_tries: u16::MAX,
            mid_tries: u16::MAX,
        }
    }

    pub const fn sanitized(self) -> Self {
        let base_secs = clamp_u32(self.base_secs, 1, 86_400);
        let mid_secs = clamp_u32(self.mid_secs, base_secs, 86_400);
        let long_secs = clamp_u32(self.long_secs, mid_secs, 86_400);
        let base_tries = self.base_tries;
        let mid_tries = if self.mid_tries < base_tries {
            base_tries
        } else {
            self.mid_tries
        };
        Self {
            base_secs,
            mid_secs,
            long_secs,
            base_tries,
            mid_tries,
        }
    }

    /// Wait before the next attempt, given the count of consecutive failed
    /// unsolicited attempts so far.
    pub const fn delay_secs(&self, attempts: u16) -> u32 {
        if attempts > self.mid_tries {
            self.long_secs
        } else if attempts > self.base_tries {
            self.mid_secs
        } else {
            self.base_secs
        }
    }

    pub const fn delay_ms(&self, attempts: u16) -> u64 {
        self.delay_secs(attempts) as u64 * 1_000
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::defaults()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Delay between a station reconnect succeeding and access-point
    /// teardown, so an associated portal client is not severed mid-request.
    pub ap_drain_grace_ms: u64,
    pub backoff: BackoffPolicy,
}

impl ManagerConfig {
    pub const fn defaults() -> Self {
        Self {
            ap_drain_grace_ms: AP_DRAIN_GRACE_MS_DEFAULT,
            backoff: BackoffPolicy::defaults(),
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            ap_drain_grace_ms: clamp_u64(self.ap_drain_grace_ms, 0, 120_000),
            backoff: self.backoff.sanitized(),
        }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

const fn clamp_u64(value: u64, min: u64, max: u64) -> u64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_tiers() {
        let policy = BackoffPolicy::defaults();
        assert_eq!(policy.delay_secs(0), 30);
        assert_eq!(policy.delay_secs(6), 30);
        assert_eq!(policy.delay_secs(7), 360);
        assert_eq!(policy.delay_secs(21), 360);
        assert_eq!(policy.delay_secs(22), 900);
        assert_eq!(policy.delay_secs(u16::MAX), 900);
    }

    #[test]
    fn constant_schedule_never_escalates() {
        let policy = BackoffPolicy::constant(45);
        assert_eq!(policy.delay_secs(0), 45);
        assert_eq!(policy.delay_secs(100), 45);
    }

    #[test]
    fn sanitized_orders_tiers_and_thresholds() {
        let policy = BackoffPolicy {
            base_secs: 120,
            mid_secs: 10,
            long_secs: 0,
            base_tries: 9,
            mid_tries: 3,
        }
        .sanitized();
        assert!(policy.mid_secs >= policy.base_secs);
        assert!(policy.long_secs >= policy.mid_secs);
        assert!(policy.mid_tries >= policy.base_tries);
    }

    #[test]
    fn delay_ms_scales_seconds() {
        assert_eq!(BackoffPolicy::defaults().delay_ms(0), 30_000);
    }
}
