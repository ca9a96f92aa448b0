/// Delay before a stalled/waiting/paused stream produces a health warning.
pub const DEFAULT_WARNING_DELAY_MS: u32 = 15_000;

/// How often the device list is re-enumerated when polling for changes.
pub const DEVICE_POLL_INTERVAL_MS: u32 = 1_000;
