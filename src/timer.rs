/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

/// Cancellable handle for a scheduled callback.
///
/// The monitor holds at most one of these; re-arming always cancels the old
/// handle before scheduling a new one, within the same event-loop turn.
pub trait TimerHandle {
    fn cancel(self: Box<Self>);
}

/// One-shot delayed scheduling, the monitor's only suspension point.
///
/// On wasm this is `setTimeout` via
/// [`GlooTimerScheduler`](crate::platform::web::GlooTimerScheduler); native
/// tests use a manual fake so time is driven explicitly.
pub trait TimerScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle>;
}
