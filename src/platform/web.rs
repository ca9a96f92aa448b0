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

//! Browser implementations of the monitor's seams: an `HtmlVideoElement`
//! playback source, a `setTimeout` scheduler and the document visibility
//! probe.

use crate::constants::DEFAULT_WARNING_DELAY_MS;
use crate::monitor::{MediaErrorInfo, MonitorOptions, PageVisibility, PlaybackEvent};
use crate::sink::LogFacadeSink;
use crate::source::{EventSubscription, PlaybackSource, SourceError};
use crate::timer::{TimerHandle, TimerScheduler};
use gloo_timers::callback::Timeout;
use gloo_utils::window;
use std::rc::Rc;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlVideoElement, VisibilityState};

/// A DOM event listener that detaches itself when dropped.
pub(crate) struct DomListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    pub(crate) fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: Box<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }

    /// `{ once: true }` registration; the guard still removes the listener on
    /// drop in case it never fired.
    pub(crate) fn attach_once(
        target: &EventTarget,
        event: &'static str,
        handler: Box<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(handler);
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

impl EventSubscription for DomListener {}

/// [`PlaybackSource`] backed by an `HtmlVideoElement`.
pub struct VideoElementSource {
    element: HtmlVideoElement,
}

impl VideoElementSource {
    pub fn new(element: HtmlVideoElement) -> Self {
        Self { element }
    }

    pub fn from_element_id(id: &str) -> Result<Self, SourceError> {
        window()
            .document()
            .and_then(|document| document.get_element_by_id(id))
            .and_then(|element| element.dyn_into::<HtmlVideoElement>().ok())
            .map(Self::new)
            .ok_or_else(|| SourceError::ElementNotFound { id: id.to_string() })
    }

    pub fn element(&self) -> &HtmlVideoElement {
        &self.element
    }
}

impl PlaybackSource for VideoElementSource {
    fn subscribe(
        &self,
        event: PlaybackEvent,
        handler: Box<dyn Fn()>,
    ) -> Result<Box<dyn EventSubscription>, SourceError> {
        let listener = DomListener::attach(
            self.element.as_ref(),
            event.dom_name(),
            Box::new(move |_: Event| handler()),
        )
        .map_err(|err| SourceError::Subscribe {
            event: event.dom_name(),
            reason: format!("{err:?}"),
        })?;
        Ok(Box::new(listener))
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn ready_state(&self) -> u16 {
        self.element.ready_state()
    }

    fn network_state(&self) -> u16 {
        self.element.network_state()
    }

    fn paused(&self) -> bool {
        self.element.paused()
    }

    fn ended(&self) -> bool {
        self.element.ended()
    }

    fn muted(&self) -> bool {
        self.element.muted()
    }

    fn volume(&self) -> f64 {
        self.element.volume()
    }

    fn playback_error(&self) -> Option<MediaErrorInfo> {
        self.element.error().map(|error| MediaErrorInfo {
            code: error.code(),
            message: error.message(),
        })
    }
}

/// [`TimerScheduler`] backed by `setTimeout`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTimerScheduler;

struct GlooTimerHandle {
    timeout: Option<Timeout>,
}

impl TimerHandle for GlooTimerHandle {
    fn cancel(mut self: Box<Self>) {
        if let Some(timeout) = self.timeout.take() {
            timeout.cancel();
        }
    }
}

impl TimerScheduler for GlooTimerScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        Box::new(GlooTimerHandle {
            timeout: Some(Timeout::new(delay_ms, callback)),
        })
    }
}

/// Current document visibility, `Unknown` when there is no document or the
/// browser reports something unexpected.
pub fn page_visibility() -> PageVisibility {
    match window().document().map(|document| document.visibility_state()) {
        Some(VisibilityState::Visible) => PageVisibility::Visible,
        Some(VisibilityState::Hidden) => PageVisibility::Hidden,
        _ => PageVisibility::Unknown,
    }
}

impl MonitorOptions {
    /// Monitor wiring for a real page: `log`-facade sink, `setTimeout`
    /// scheduler, document visibility and the 15 second warning delay.
    pub fn browser_defaults() -> Self {
        Self {
            sink: Rc::new(LogFacadeSink),
            scheduler: Rc::new(GlooTimerScheduler),
            visibility: Rc::new(page_visibility),
            warning_delay_ms: DEFAULT_WARNING_DELAY_MS,
        }
    }
}
