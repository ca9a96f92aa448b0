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

use crate::monitor::{MetadataSnapshot, PlaybackEvent, StreamRole};
use crate::sink::LogSink;
use crate::source::{EventSubscription, PlaybackSource};
use crate::timer::{TimerHandle, TimerScheduler};
use log::debug;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Hosting page visibility, sampled fresh on every log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVisibility {
    Visible,
    Hidden,
    Unknown,
}

impl PageVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            PageVisibility::Visible => "visible",
            PageVisibility::Hidden => "hidden",
            PageVisibility::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PageVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wiring a monitor needs from its environment: where log lines go, how the
/// delayed warning is scheduled, how page visibility is sampled, and how long
/// playback may sit in a non-playing state before the warning fires.
///
/// [`MonitorOptions::browser_defaults`](crate::platform::web) wires all of
/// this to the browser; tests substitute fakes field by field.
#[derive(Clone)]
pub struct MonitorOptions {
    pub sink: Rc<dyn LogSink>,
    pub scheduler: Rc<dyn TimerScheduler>,
    pub visibility: Rc<dyn Fn() -> PageVisibility>,
    pub warning_delay_ms: u32,
}

struct MonitorInner {
    role: StreamRole,
    source: Rc<dyn PlaybackSource>,
    sink: Rc<dyn LogSink>,
    scheduler: Rc<dyn TimerScheduler>,
    visibility: Rc<dyn Fn() -> PageVisibility>,
    warning_delay_ms: u32,
    latest_event: PlaybackEvent,
    ever_started_playing: bool,
    setup_failed: bool,
    active: bool,
    pending_warning: Option<Box<dyn TimerHandle>>,
    subscriptions: Vec<Box<dyn EventSubscription>>,
}

/// Per-stream playback watchdog.
///
/// Observes one media source's tracked playback events, records the latest
/// one, and keeps a single delayed warning armed while the stream is in a
/// non-playing state:
///
/// * `playing` cancels the pending warning and marks the stream as having
///   played at least once.
/// * `stalled`, `waiting` and `pause` each log the event with a metadata
///   snapshot and re-arm the warning.
/// * `ended` is recorded and logged without touching the timer.
///
/// If no tracked event arrives before the warning delay elapses, a single
/// warning is logged; its wording depends on whether the stream ever played.
///
/// Cheap to clone; clones share state. Create through
/// [`MonitorRegistry`](crate::MonitorRegistry) to keep one monitor per role.
#[derive(Clone)]
pub struct PlaybackMonitor {
    inner: Rc<RefCell<MonitorInner>>,
}

impl PlaybackMonitor {
    pub fn new(role: StreamRole, source: Rc<dyn PlaybackSource>, options: MonitorOptions) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MonitorInner {
                role,
                source,
                sink: options.sink,
                scheduler: options.scheduler,
                visibility: options.visibility,
                warning_delay_ms: options.warning_delay_ms,
                latest_event: PlaybackEvent::None,
                ever_started_playing: false,
                setup_failed: false,
                active: false,
                pending_warning: None,
                subscriptions: Vec::new(),
            })),
        }
    }

    pub fn role(&self) -> StreamRole {
        self.inner.borrow().role
    }

    /// The last tracked event delivered, or `PlaybackEvent::None` before any.
    pub fn latest_event(&self) -> PlaybackEvent {
        self.inner.borrow().latest_event
    }

    /// True once a `playing` event has ever been observed. Never resets.
    pub fn ever_started_playing(&self) -> bool {
        self.inner.borrow().ever_started_playing
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().active
    }

    /// True when `start()` could not attach all listeners. The monitor stays
    /// inert until destroyed and recreated.
    pub fn setup_failed(&self) -> bool {
        self.inner.borrow().setup_failed
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    pub fn has_pending_warning(&self) -> bool {
        self.inner.borrow().pending_warning.is_some()
    }

    /// Snapshot the source's playback status right now.
    pub fn metadata(&self) -> MetadataSnapshot {
        let source = self.inner.borrow().source.clone();
        MetadataSnapshot::sample(source.as_ref())
    }

    /// Arm the initial warning timer and attach one listener per tracked
    /// event kind.
    ///
    /// No-op when already active, so listeners can never double-register. A
    /// listener attach failure is logged and recorded but never propagated:
    /// the caller keeps a valid (inert) monitor and `destroy()` still cleans
    /// up whatever was attached.
    pub fn start(&self) {
        {
            let inner = self.inner.borrow();
            if inner.active {
                debug!(
                    "[{}-video-player] start() ignored, monitor already active",
                    inner.role.as_str()
                );
                return;
            }
        }

        Self::arm_warning(&self.inner);

        let (role, source, sink) = {
            let inner = self.inner.borrow();
            (inner.role, inner.source.clone(), inner.sink.clone())
        };

        let mut attach_error = None;
        for event in PlaybackEvent::TRACKED {
            let weak = Rc::downgrade(&self.inner);
            let handler: Box<dyn Fn()> = Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self::dispatch(&inner, event);
                }
            });
            match source.subscribe(event, handler) {
                Ok(subscription) => self.inner.borrow_mut().subscriptions.push(subscription),
                Err(err) => {
                    attach_error = Some(err);
                    break;
                }
            }
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.active = true;
            inner.setup_failed = attach_error.is_some();
        }

        match attach_error {
            Some(err) => sink.error(&format!(
                "[{role}-video-player] Faced an issue with {user}'s {role} video player while adding listeners: {err}",
                role = role.as_str(),
                user = role.user_label(),
            )),
            None => sink.info(&format!(
                "[{role}-video-player] Event listeners have been added for {user}'s {role} video element",
                role = role.as_str(),
                user = role.user_label(),
            )),
        }
    }

    /// Tagged-variant dispatch entry point. Listener callbacks land here; it
    /// is public so the state machine can be driven without a live source.
    pub fn handle_event(&self, event: PlaybackEvent) {
        Self::dispatch(&self.inner, event);
    }

    /// Cancel the pending warning and detach every listener. Idempotent.
    pub fn destroy(&self) {
        Self::cancel_warning(&self.inner);
        let (role, subscriptions) = {
            let mut inner = self.inner.borrow_mut();
            inner.active = false;
            (inner.role, std::mem::take(&mut inner.subscriptions))
        };
        if !subscriptions.is_empty() {
            debug!(
                "[{}-video-player] detached {} event listeners",
                role.as_str(),
                subscriptions.len()
            );
        }
        drop(subscriptions);
    }

    fn dispatch(inner: &Rc<RefCell<MonitorInner>>, event: PlaybackEvent) {
        if !event.is_tracked() {
            return;
        }

        let (role, sink, source, visibility) = {
            let mut state = inner.borrow_mut();
            state.latest_event = event;
            if event == PlaybackEvent::Playing {
                state.ever_started_playing = true;
            }
            (
                state.role,
                state.sink.clone(),
                state.source.clone(),
                state.visibility.clone(),
            )
        };
        let prefix = log_prefix(role, &visibility);

        match event {
            PlaybackEvent::Playing => {
                sink.info(&format!(
                    "{prefix} video playback is now {}",
                    event.label()
                ));
                Self::cancel_warning(inner);
            }
            PlaybackEvent::Ended => {
                sink.info(&format!(
                    "{prefix} video playback is now {}",
                    event.label()
                ));
            }
            PlaybackEvent::Stalled | PlaybackEvent::Waiting | PlaybackEvent::Paused => {
                let metadata = MetadataSnapshot::sample(source.as_ref()).to_pretty_json();
                sink.info(&format!(
                    "{prefix} video playback is now {} | {metadata}",
                    event.label()
                ));
                Self::arm_warning(inner);
            }
            PlaybackEvent::None => {}
        }
    }

    /// Cancel-then-schedule; at most one warning is ever outstanding.
    fn arm_warning(inner: &Rc<RefCell<MonitorInner>>) {
        Self::cancel_warning(inner);
        let (scheduler, delay_ms) = {
            let state = inner.borrow();
            (state.scheduler.clone(), state.warning_delay_ms)
        };
        let weak = Rc::downgrade(inner);
        let handle = scheduler.schedule(
            delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self::emit_delayed_warning(&inner);
                }
            }),
        );
        inner.borrow_mut().pending_warning = Some(handle);
    }

    fn cancel_warning(inner: &Rc<RefCell<MonitorInner>>) {
        let handle = inner.borrow_mut().pending_warning.take();
        if let Some(handle) = handle {
            debug!(
                "[{}-video-player] Stopping any pending status logging timers.",
                inner.borrow().role.as_str()
            );
            handle.cancel();
        }
    }

    fn emit_delayed_warning(inner: &Rc<RefCell<MonitorInner>>) {
        let (role, sink, source, visibility, delay_ms, latest_event, ever_played) = {
            let mut state = inner.borrow_mut();
            // The handle that just fired is spent.
            state.pending_warning = None;
            (
                state.role,
                state.sink.clone(),
                state.source.clone(),
                state.visibility.clone(),
                state.warning_delay_ms,
                state.latest_event,
                state.ever_started_playing,
            )
        };

        let prefix = log_prefix(role, &visibility);
        let seconds = f64::from(delay_ms) / 1000.0;
        let metadata = MetadataSnapshot::sample(source.as_ref()).to_pretty_json();

        if ever_played {
            sink.warn(&format!(
                "{prefix} video played once but not played again after {seconds} seconds of {latest_event} event | {metadata}"
            ));
        } else {
            sink.warn(&format!(
                "{prefix} video never played and has not started playing yet even after {seconds} seconds of load | {metadata}"
            ));
        }
    }
}

/// Two monitors are the same monitor when they share state.
impl PartialEq for PlaybackMonitor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for PlaybackMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PlaybackMonitor")
            .field("role", &inner.role)
            .field("latest_event", &inner.latest_event)
            .field("ever_started_playing", &inner.ever_started_playing)
            .field("active", &inner.active)
            .field("setup_failed", &inner.setup_failed)
            .field("pending_warning", &inner.pending_warning.is_some())
            .field("subscriptions", &inner.subscriptions.len())
            .finish()
    }
}

fn log_prefix(role: StreamRole, visibility: &Rc<dyn Fn() -> PageVisibility>) -> String {
    format!(
        "[{role}-video-player] | [visibility:{vis}] | {user} {role}",
        role = role.as_str(),
        vis = visibility(),
        user = role.user_label(),
    )
}
