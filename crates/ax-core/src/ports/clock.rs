/// Wall clock in unix milliseconds. Injected so OTP expiry is testable
/// against a fixed or advancing clock.
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;
}
