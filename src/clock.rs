use std::fmt::Write;

use chrono::Timelike;

/// Wall clock time at the moment a frame is composed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub hours: u8,
    pub mins: u8,
    pub secs: u8,
}

impl ClockReading {
    pub fn new(hours: u8, mins: u8, secs: u8) -> Self {
        Self { hours, mins, secs }
    }

    pub fn now() -> Self {
        Self::from_time(&chrono::Local::now())
    }

    pub fn from_time<T: Timelike>(time: &T) -> Self {
        Self {
            hours: time.hour() as u8,
            mins: time.minute() as u8,
            // a leap second is shown as :59 rather than :60
            secs: time.second().min(59) as u8,
        }
    }

    /// `HH:MM:SS`
    pub fn format(&self) -> heapless::String<8> {
        let mut s = heapless::String::new();
        // 8 bytes always suffice for values below 100
        let _ = write!(s, "{:02}:{:02}:{:02}", self.hours, self.mins, self.secs);
        s
    }
}

/// Time left until the wall clock reaches the next full second.
pub fn until_next_second<T: Timelike>(now: &T) -> std::time::Duration {
    // chrono encodes a leap second as nanoseconds >= 1_000_000_000
    let nanos = now.nanosecond() % 1_000_000_000;
    std::time::Duration::from_nanos(u64::from(1_000_000_000 - nanos))
}
