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

use std::fmt;

/// Playback events a [`PlaybackMonitor`](super::PlaybackMonitor) reacts to.
///
/// The variants mirror the subset of `HTMLMediaElement` events that matter
/// for call health: `ended`, `pause`, `playing`, `stalled` and `waiting`.
/// Everything else the element fires (`canplay`, `seeking`, `ratechange`,
/// ...) is deliberately not tracked. `None` is the initial "nothing recorded
/// yet" state and is never delivered by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackEvent {
    #[default]
    None,
    Ended,
    Paused,
    Playing,
    Stalled,
    Waiting,
}

impl PlaybackEvent {
    /// The five event kinds a monitor subscribes to, in subscription order.
    pub const TRACKED: [PlaybackEvent; 5] = [
        PlaybackEvent::Ended,
        PlaybackEvent::Stalled,
        PlaybackEvent::Playing,
        PlaybackEvent::Waiting,
        PlaybackEvent::Paused,
    ];

    /// DOM event name the browser fires for this variant.
    pub fn dom_name(self) -> &'static str {
        match self {
            PlaybackEvent::None => "None",
            PlaybackEvent::Ended => "ended",
            PlaybackEvent::Paused => "pause",
            PlaybackEvent::Playing => "playing",
            PlaybackEvent::Stalled => "stalled",
            PlaybackEvent::Waiting => "waiting",
        }
    }

    /// Label used in "playback is now ..." log lines. Identical to
    /// [`dom_name`](Self::dom_name) except that `pause` reads as "paused".
    pub fn label(self) -> &'static str {
        match self {
            PlaybackEvent::Paused => "paused",
            other => other.dom_name(),
        }
    }

    pub fn is_tracked(self) -> bool {
        !matches!(self, PlaybackEvent::None)
    }
}

impl fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_label_reads_as_paused() {
        assert_eq!(PlaybackEvent::Paused.dom_name(), "pause");
        assert_eq!(PlaybackEvent::Paused.label(), "paused");
    }

    #[test]
    fn tracked_set_excludes_initial_state() {
        assert!(!PlaybackEvent::None.is_tracked());
        for event in PlaybackEvent::TRACKED {
            assert!(event.is_tracked());
        }
    }
}
