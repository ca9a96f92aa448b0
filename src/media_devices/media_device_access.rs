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

use gloo_utils::window;
use log::error;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};

/// [MediaDeviceAccess] requests the user's permission to access the
/// microphone and camera.
///
/// The probe stream acquired for the prompt is stopped immediately: this
/// utility only unlocks device labels and permission state, actual capture is
/// the caller's business.
pub struct MediaDeviceAccess {
    granted: Arc<AtomicBool>,

    /// Called when the user grants access permission.
    pub on_granted: Rc<dyn Fn()>,

    /// Called when the user fails to grant access permission.
    pub on_denied: Rc<dyn Fn(JsValue)>,
}

#[allow(clippy::new_without_default)]
impl MediaDeviceAccess {
    /// After construction, optionally set the callbacks, then call
    /// [`request()`](Self::request).
    pub fn new() -> Self {
        Self {
            granted: Arc::new(AtomicBool::new(false)),
            on_granted: Rc::new(|| {}),
            on_denied: Rc::new(|_| {}),
        }
    }

    /// Returns true if permission has been granted.
    pub fn is_granted(&self) -> bool {
        self.granted.load(Ordering::Acquire)
    }

    /// Causes the browser to request the user's permission to access the
    /// microphone and camera. Returns immediately; the outcome arrives via
    /// the callbacks.
    pub fn request(&self) {
        let on_granted = self.on_granted.clone();
        let on_denied = self.on_denied.clone();
        let granted = Arc::clone(&self.granted);
        wasm_bindgen_futures::spawn_local(async move {
            match Self::request_permissions().await {
                Ok(stream) => {
                    Self::stop_tracks(&stream);
                    granted.store(true, Ordering::Release);
                    on_granted();
                }
                Err(err) => {
                    error!("getUserMedia permission request failed: {err:?}");
                    on_denied(err);
                }
            }
        });
    }

    async fn request_permissions() -> Result<MediaStream, JsValue> {
        let navigator = window().navigator();
        let media_devices = navigator.media_devices()?;

        let constraints = MediaStreamConstraints::new();

        // Request access to the microphone
        constraints.set_audio(&JsValue::from_bool(true));

        // Request access to the camera
        constraints.set_video(&JsValue::from_bool(true));

        let promise = media_devices.get_user_media_with_constraints(&constraints)?;

        let stream = JsFuture::from(promise).await?;
        Ok(stream.unchecked_into::<MediaStream>())
    }

    fn stop_tracks(stream: &MediaStream) {
        for track in stream.get_tracks().iter() {
            track.unchecked_into::<MediaStreamTrack>().stop();
        }
    }
}
