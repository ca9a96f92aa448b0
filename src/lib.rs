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

//! Browser-resident monitoring and control layer for a two-party video call
//! page: one locally-captured "customer" stream and one remotely-received
//! "agent" stream.
//!
//! The heart of the crate is the playback health monitor: a per-stream
//! watchdog that subscribes to a video element's playback events, records the
//! latest one, and logs a delayed warning when playback has sat in a
//! non-playing state for too long. A registry guarantees one monitor per
//! stream role. Around it sit the page's control affordances: device
//! enumeration with change polling, permission handling, picture-in-picture
//! on page-hide and autoplay recovery (all behind the `wasm` feature).
//!
//! This crate makes no assumptions about the UI or the HTML of the client
//! app. The only DOM data it needs is the `HtmlVideoElement` (or its ID) for
//! each stream; log lines go to a [`LogSink`] the page provides, or to the
//! `log` facade by default.
//!
//! The core is platform-agnostic and fully testable on a native target: the
//! playback source, the delayed-warning scheduler and the log sink are
//! traits, and the browser bindings in [`platform::web`] implement them.
//!
//! # Outline of usage
//!
//! ## Monitoring both streams of a call page:
//! ```text
//! let mut registry = MonitorRegistry::new(MonitorOptions::browser_defaults());
//!
//! let customer = VideoElementSource::from_element_id("customerVideo")?;
//! registry.get(StreamRole::Local, Rc::new(customer)).start();
//!
//! let agent = VideoElementSource::from_element_id("agentVideo")?;
//! registry.get(StreamRole::Remote, Rc::new(agent)).start();
//!
//! // ... page teardown:
//! registry.destroy_all();
//! ```
//!
//! ## Device lists and permissions:
//! ```text
//! let media_device_access = MediaDeviceAccess::new();
//! media_device_access.on_granted = ...; // callback
//! media_device_access.request();
//!
//! let media_device_list = MediaDeviceList::new();
//! media_device_list.audio_inputs.on_selected = ...; // callback
//! media_device_list.load();
//! media_device_list.poll_device_changes(DEVICE_POLL_INTERVAL_MS);
//! ```

pub mod constants;
pub mod monitor;
pub mod platform;
pub mod sink;
pub mod source;
pub mod timer;

#[cfg(feature = "wasm")]
pub mod autoplay;
#[cfg(feature = "wasm")]
pub mod media_devices;
#[cfg(feature = "wasm")]
pub mod pip;

pub use monitor::{
    MediaErrorInfo, MetadataSnapshot, MonitorOptions, MonitorRegistry, NetworkState,
    PageVisibility, PlaybackEvent, PlaybackMonitor, ReadyState, StreamRole,
};
pub use sink::{CapturedLogSink, LogEntry, LogFacadeSink, LogSink, Severity};
pub use source::{EventSubscription, PlaybackSource, SourceError};
pub use timer::{TimerHandle, TimerScheduler};

#[cfg(feature = "wasm")]
pub use autoplay::AutoplayUnlocker;
#[cfg(feature = "wasm")]
pub use media_devices::{MediaDeviceAccess, MediaDeviceList, SelectableDevices};
#[cfg(feature = "wasm")]
pub use pip::PictureInPictureHandler;
#[cfg(feature = "wasm")]
pub use platform::web::{GlooTimerScheduler, VideoElementSource};

#[cfg(test)]
mod tests;
