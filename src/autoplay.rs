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

//! Autoplay recovery. Browsers block `play()` until a real user gesture has
//! happened; this module retries playback on the first gesture and when the
//! page becomes visible or focused again.

use crate::platform::web::DomListener;
use gloo_utils::window;
use log::{error, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Event, HtmlMediaElement};

const GESTURE_EVENTS: [&str; 3] = ["click", "touchstart", "keydown"];

/// One-shot autoplay unlock plus resume-on-visible wiring.
///
/// Register the media elements that should be playing, then [`arm`](Self::arm)
/// the gesture listeners. The first real `click`/`touchstart`/`keydown`
/// marks the page interactive and calls `play()` on every registered
/// element. [`resume_on_visible`](Self::resume_on_visible) additionally
/// retries a single element whenever the document becomes visible or the
/// window regains focus, the usual cure for a remote stream that was paused
/// in a background tab.
#[derive(Default)]
pub struct AutoplayUnlocker {
    elements: Rc<RefCell<Vec<HtmlMediaElement>>>,
    unlocked: Rc<Cell<bool>>,
    listeners: RefCell<Vec<DomListener>>,
}

impl AutoplayUnlocker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a real user gesture has been observed.
    pub fn is_unlocked(&self) -> bool {
        self.unlocked.get()
    }

    pub fn register(&self, element: HtmlMediaElement) {
        self.elements.borrow_mut().push(element);
    }

    /// Attach the once-only gesture listeners. No-op when already armed.
    pub fn arm(&self) {
        if !self.listeners.borrow().is_empty() {
            return;
        }
        let document = match window().document() {
            Some(document) => document,
            None => {
                warn!("No document available, autoplay unlock disabled");
                return;
            }
        };

        let mut listeners = Vec::new();
        for event in GESTURE_EVENTS {
            let unlocked = Rc::clone(&self.unlocked);
            let elements = Rc::clone(&self.elements);
            let attached = DomListener::attach_once(
                document.as_ref(),
                event,
                Box::new(move |_: Event| {
                    if unlocked.get() {
                        return;
                    }
                    unlocked.set(true);
                    info!("Real user interaction detected, enabling autoplay");
                    let elements: Vec<HtmlMediaElement> = elements.borrow().clone();
                    for element in elements {
                        try_play(element, "interaction");
                    }
                }),
            );
            match attached {
                Ok(listener) => listeners.push(listener),
                Err(err) => warn!("Failed to attach '{event}' gesture listener: {err:?}"),
            }
        }
        self.listeners.borrow_mut().extend(listeners);
    }

    /// Retry `play()` on `element` whenever the document becomes visible or
    /// the window regains focus.
    pub fn resume_on_visible(&self, element: HtmlMediaElement) {
        let document = match window().document() {
            Some(document) => document,
            None => {
                warn!("No document available, resume-on-visible disabled");
                return;
            }
        };

        let resume_element = element.clone();
        let visibility = DomListener::attach(
            document.as_ref(),
            "visibilitychange",
            Box::new(move |_: Event| {
                let visible = window()
                    .document()
                    .map(|document| !document.hidden())
                    .unwrap_or(false);
                if visible {
                    try_play(resume_element.clone(), "visibility");
                }
            }),
        );

        let focus = DomListener::attach(
            window().as_ref(),
            "focus",
            Box::new(move |_: Event| {
                try_play(element.clone(), "focus");
            }),
        );

        for attached in [visibility, focus] {
            match attached {
                Ok(listener) => self.listeners.borrow_mut().push(listener),
                Err(err) => warn!("Failed to attach resume listener: {err:?}"),
            }
        }
    }

    /// Detach every listener. Idempotent.
    pub fn destroy(&self) {
        self.listeners.borrow_mut().clear();
    }
}

fn try_play(element: HtmlMediaElement, reason: &'static str) {
    match element.play() {
        Ok(promise) => spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => info!("[{reason}] media element resumed playing"),
                Err(err) => error!("[{reason}] error resuming playback: {err:?}"),
            }
        }),
        Err(err) => error!("[{reason}] play() call failed: {err:?}"),
    }
}
