//! Expiry units
//!
//! Durations and epoch timestamps for the TTL-setting commands.

use std::time::Duration;

/// An amount of time in a given unit
///
/// Milliseconds are sent with the millisecond commands (`PEXPIRE`,
/// `PEXPIREAT`). Every other unit is normalized to whole seconds on the
/// client and sent with the second commands (`EXPIRE`, `EXPIREAT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Milliseconds(i64),
    Seconds(i64),
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Weeks(i64),
}

impl Expiry {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * Self::MINUTE;
    const DAY: i64 = 24 * Self::HOUR;
    const WEEK: i64 = 7 * Self::DAY;

    /// True when the amount is expressed in milliseconds
    pub fn is_millis(&self) -> bool {
        matches!(self, Expiry::Milliseconds(_))
    }

    /// The number sent on the wire: milliseconds for `Milliseconds`,
    /// seconds for everything else (saturating on overflow)
    pub fn wire_amount(&self) -> i64 {
        match *self {
            Expiry::Milliseconds(ms) => ms,
            Expiry::Seconds(s) => s,
            Expiry::Minutes(m) => m.saturating_mul(Self::MINUTE),
            Expiry::Hours(h) => h.saturating_mul(Self::HOUR),
            Expiry::Days(d) => d.saturating_mul(Self::DAY),
            Expiry::Weeks(w) => w.saturating_mul(Self::WEEK),
        }
    }

    /// Command that sets a TTL relative to now
    pub(crate) fn relative_command(&self) -> &'static str {
        if self.is_millis() {
            "PEXPIRE"
        } else {
            "EXPIRE"
        }
    }

    /// Command that sets an absolute Unix-epoch deadline
    pub(crate) fn absolute_command(&self) -> &'static str {
        if self.is_millis() {
            "PEXPIREAT"
        } else {
            "EXPIREAT"
        }
    }
}

impl From<Duration> for Expiry {
    fn from(duration: Duration) -> Self {
        Expiry::Milliseconds(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }
}
