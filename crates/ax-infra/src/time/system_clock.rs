use std::time::{SystemTime, UNIX_EPOCH};

use ax_core::ports::ClockPort;

/// The real wall clock. Tests substitute fixed clocks through the port.
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System time before UNIX EPOCH")
            .as_millis() as i64
    }
}
