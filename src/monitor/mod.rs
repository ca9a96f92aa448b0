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

//! The playback health core: event classification, the per-stream watchdog
//! state machine, metadata snapshotting and the one-monitor-per-role
//! registry.

mod event;
mod metadata;
mod playback_monitor;
mod registry;

pub use event::PlaybackEvent;
pub use metadata::{MediaErrorInfo, MetadataSnapshot, NetworkState, ReadyState};
pub use playback_monitor::{MonitorOptions, PageVisibility, PlaybackMonitor};
pub use registry::{MonitorRegistry, StreamRole};
