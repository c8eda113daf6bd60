mod fallback;
mod memory;

pub use fallback::FallbackOtpChallengeStore;
pub use memory::MemoryOtpChallengeStore;
