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

//! Picture-in-Picture lifecycle for the customer video: enter PiP when the
//! page is hidden so the local preview stays on screen, and track the
//! browser's enter/leave events.

use crate::platform::web::DomListener;
use gloo_utils::window;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Event, EventTarget, HtmlVideoElement};

/// Enters Picture-in-Picture for one video element when the hosting page is
/// hidden, and tracks the active state via the element's PiP events.
///
/// All failures (unsupported browser, rejected request, detached element) are
/// logged and swallowed; PiP is an affordance, never a requirement.
pub struct PictureInPictureHandler {
    element: HtmlVideoElement,
    active: Rc<Cell<bool>>,
    listeners: RefCell<Vec<DomListener>>,
    supported: bool,
}

impl PictureInPictureHandler {
    pub fn new(element: HtmlVideoElement) -> Self {
        let supported = window()
            .document()
            .map(|document| document.picture_in_picture_enabled())
            .unwrap_or(false);
        Self {
            element,
            active: Rc::new(Cell::new(false)),
            listeners: RefCell::new(Vec::new()),
            supported,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Attach the visibility and PiP event listeners. No-op when already
    /// enabled or when the browser does not support PiP.
    pub fn enable(&self) {
        if !self.supported {
            warn!("Picture-in-Picture is not supported in this browser");
            return;
        }
        if !self.listeners.borrow().is_empty() {
            return;
        }
        let document = match window().document() {
            Some(document) => document,
            None => {
                warn!("No document available, Picture-in-Picture disabled");
                return;
            }
        };

        let mut listeners = Vec::new();

        let element = self.element.clone();
        let active = Rc::clone(&self.active);
        let visibility = DomListener::attach(
            document.as_ref(),
            "visibilitychange",
            Box::new(move |_: Event| {
                let hidden = window()
                    .document()
                    .map(|document| document.hidden())
                    .unwrap_or(false);
                if hidden {
                    info!("Page became hidden, attempting to enable Picture-in-Picture");
                    Self::request_enter(element.clone(), Rc::clone(&active));
                } else {
                    info!("Page became visible");
                }
            }),
        );

        let active = Rc::clone(&self.active);
        let target: &EventTarget = self.element.as_ref();
        let enter = DomListener::attach(
            target,
            "enterpictureinpicture",
            Box::new(move |_: Event| {
                active.set(true);
                info!("Entered Picture-in-Picture mode");
            }),
        );

        let active = Rc::clone(&self.active);
        let leave = DomListener::attach(
            target,
            "leavepictureinpicture",
            Box::new(move |_: Event| {
                active.set(false);
                info!("Exited Picture-in-Picture mode");
            }),
        );

        for attached in [visibility, enter, leave] {
            match attached {
                Ok(listener) => listeners.push(listener),
                Err(err) => warn!("Failed to attach Picture-in-Picture listener: {err:?}"),
            }
        }

        info!("Picture-in-Picture visibility listeners configured");
        *self.listeners.borrow_mut() = listeners;
    }

    /// Request PiP for the element right now.
    pub fn enter(&self) {
        if !self.supported {
            warn!("Picture-in-Picture is not supported in this browser");
            return;
        }
        Self::request_enter(self.element.clone(), Rc::clone(&self.active));
    }

    /// Leave PiP if this element currently owns the PiP window.
    pub fn exit(&self) {
        let document = match window().document() {
            Some(document) => document,
            None => return,
        };
        if document.picture_in_picture_element().is_none() {
            return;
        }
        let promise = document.exit_picture_in_picture();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => info!("Left Picture-in-Picture mode"),
                Err(err) => warn!("Failed to exit Picture-in-Picture: {err:?}"),
            }
        });
    }

    /// Detach all listeners. Idempotent.
    pub fn disable(&self) {
        self.listeners.borrow_mut().clear();
    }

    fn request_enter(element: HtmlVideoElement, active: Rc<Cell<bool>>) {
        if active.get() {
            debug!("Already in Picture-in-Picture mode");
            return;
        }
        let promise = element.request_picture_in_picture();
        spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => info!("Picture-in-Picture request accepted"),
                Err(err) => warn!("Failed to enter Picture-in-Picture: {err:?}"),
            }
        });
    }
}
