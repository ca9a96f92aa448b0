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

use crate::monitor::{MediaErrorInfo, PlaybackEvent};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Attaching a listener to the underlying element failed.
    #[error("failed to attach '{event}' listener: {reason}")]
    Subscribe {
        event: &'static str,
        reason: String,
    },
    /// The element the source should wrap is not in the document.
    #[error("media element '{id}' not found in document")]
    ElementNotFound { id: String },
}

/// A live registration of one callback for one playback event kind.
///
/// Dropping the subscription detaches the listener from the source; there is
/// no explicit detach call. A monitor holds one of these per tracked event
/// kind between `start()` and `destroy()`.
pub trait EventSubscription {}

/// The media-playback surface a [`PlaybackMonitor`](crate::PlaybackMonitor)
/// observes.
///
/// On wasm this is an `HtmlVideoElement`
/// ([`VideoElementSource`](crate::platform::web::VideoElementSource)); tests
/// drive the monitor with an in-memory fake. `ready_state` and
/// `network_state` are the raw element ordinals; the monitor maps them to
/// labels when it snapshots metadata.
pub trait PlaybackSource {
    fn subscribe(
        &self,
        event: PlaybackEvent,
        handler: Box<dyn Fn()>,
    ) -> Result<Box<dyn EventSubscription>, SourceError>;

    fn current_time(&self) -> f64;
    fn ready_state(&self) -> u16;
    fn network_state(&self) -> u16;
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    fn muted(&self) -> bool;
    fn volume(&self) -> f64;
    fn playback_error(&self) -> Option<MediaErrorInfo>;
}
