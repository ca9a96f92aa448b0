use gloo_timers::callback::Interval;
use gloo_utils::window;
use js_sys::Array;
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{MediaDeviceInfo, MediaDeviceKind};

/// A "smart" list of [web_sys::MediaDeviceInfo] items for one device kind,
/// used by [MediaDeviceList].
///
/// The list keeps track of a currently selected device, supporting selection
/// and a callback that is triggered when a selection is made. Unlike a
/// one-shot enumeration it is reloadable: when the device set changes the
/// list is replaced in place, the selection survives if its device still
/// exists, and otherwise falls back to the first device (triggering
/// `on_selected`).
#[derive(Clone)]
pub struct SelectableDevices {
    kind: MediaDeviceKind,
    devices: Rc<RefCell<Vec<MediaDeviceInfo>>>,
    selected: Rc<RefCell<Option<String>>>,

    /// Called as `callback(device_id)` whenever a selection is made, either
    /// via [`select`](Self::select) or by the fallback after a reload.
    pub on_selected: Rc<dyn Fn(String)>,
}

impl SelectableDevices {
    fn new(kind: MediaDeviceKind) -> Self {
        Self {
            kind,
            devices: Rc::new(RefCell::new(Vec::new())),
            selected: Rc::new(RefCell::new(None)),
            on_selected: Rc::new(|_| {}),
        }
    }

    pub fn kind(&self) -> MediaDeviceKind {
        self.kind
    }

    /// Select a device:
    ///
    /// * `device_id` - The `device_id` field of an entry in
    ///   [`devices()`](Self::devices)
    ///
    /// Triggers the [`on_selected(device_id)`](Self::on_selected) callback.
    /// Does nothing if the device_id is not in [`devices()`](Self::devices).
    pub fn select(&self, device_id: &str) {
        let known = self
            .devices
            .borrow()
            .iter()
            .any(|device| device.device_id() == device_id);
        if known {
            *self.selected.borrow_mut() = Some(device_id.to_string());
            (self.on_selected)(device_id.to_string());
        }
    }

    /// The available devices of this kind, as of the last (re)load.
    pub fn devices(&self) -> Vec<MediaDeviceInfo> {
        self.devices.borrow().clone()
    }

    /// The `device_id` of the currently selected device, or "" if there are
    /// no devices.
    pub fn selected(&self) -> String {
        if let Some(selected) = self.selected.borrow().as_ref() {
            return selected.clone();
        }
        // device 0 is the default selection
        match self.devices.borrow().first() {
            Some(device) => device.device_id(),
            None => String::new(),
        }
    }

    fn replace(&self, devices: Vec<MediaDeviceInfo>) {
        let previous = self.selected.borrow().clone();
        let still_present = previous
            .as_ref()
            .map(|id| devices.iter().any(|device| &device.device_id() == id))
            .unwrap_or(false);
        *self.devices.borrow_mut() = devices;
        if !still_present {
            *self.selected.borrow_mut() = None;
            let fallback = self.devices.borrow().first().map(|device| device.device_id());
            if let Some(device_id) = fallback {
                (self.on_selected)(device_id);
            }
        }
    }
}

#[derive(Clone)]
struct DeviceListState {
    audio_inputs: SelectableDevices,
    audio_outputs: SelectableDevices,
    video_inputs: SelectableDevices,
    on_loaded: Rc<dyn Fn()>,
    on_devices_changed: Rc<dyn Fn()>,
    fingerprint: Rc<RefCell<Vec<String>>>,
}

impl DeviceListState {
    fn apply(&self, devices: Vec<MediaDeviceInfo>) {
        *self.fingerprint.borrow_mut() = fingerprints(&devices);
        self.audio_inputs.replace(filter_kind(&devices, MediaDeviceKind::Audioinput));
        self.audio_outputs.replace(filter_kind(&devices, MediaDeviceKind::Audiooutput));
        self.video_inputs.replace(filter_kind(&devices, MediaDeviceKind::Videoinput));
    }
}

/// Queries the user's system for the available audio input, audio output and
/// video input devices, maintains a current selection for each kind, and can
/// poll for device changes (hot-plug, bluetooth connect/disconnect).
///
/// It has no explicit connection to whatever consumes the devices -- the
/// calling app is responsible for passing the selection info on, typically
/// from the `on_selected` callbacks into its `<select>` elements and capture
/// pipeline.
///
/// Outline of usage:
///
/// ```text
/// let mut media_device_list = MediaDeviceList::new();
/// media_device_list.audio_inputs.on_selected = ...; // callback
/// media_device_list.video_inputs.on_selected = ...; // callback
///
/// media_device_list.load();
/// media_device_list.poll_device_changes(DEVICE_POLL_INTERVAL_MS);
///
/// let microphones = media_device_list.audio_inputs.devices();
/// media_device_list.audio_inputs.select(&microphones[i].device_id());
/// ```
pub struct MediaDeviceList {
    /// The list of audio input devices. `pub` for access, treat as read-only.
    pub audio_inputs: SelectableDevices,

    /// The list of audio output devices. `pub` for access, treat as
    /// read-only. Enumerated so the page can populate its speaker selector;
    /// actually routing output (sink id) is up to the caller.
    pub audio_outputs: SelectableDevices,

    /// The list of video input devices. `pub` for access, treat as read-only.
    pub video_inputs: SelectableDevices,

    /// Called as `callback(())` after [`load()`](Self::load) completes.
    pub on_loaded: Rc<dyn Fn()>,

    /// Called after a polled re-enumeration found a different device set and
    /// the lists were reloaded.
    pub on_devices_changed: Rc<dyn Fn()>,

    fingerprint: Rc<RefCell<Vec<String>>>,
    poll: RefCell<Option<Interval>>,
}

#[allow(clippy::new_without_default)]
impl MediaDeviceList {
    /// After constructing, set the [`on_selected`](SelectableDevices::on_selected)
    /// callbacks, then call [`load()`](Self::load) to populate the lists.
    pub fn new() -> Self {
        Self {
            audio_inputs: SelectableDevices::new(MediaDeviceKind::Audioinput),
            audio_outputs: SelectableDevices::new(MediaDeviceKind::Audiooutput),
            video_inputs: SelectableDevices::new(MediaDeviceKind::Videoinput),
            on_loaded: Rc::new(|| {}),
            on_devices_changed: Rc::new(|| {}),
            fingerprint: Rc::new(RefCell::new(Vec::new())),
            poll: RefCell::new(None),
        }
    }

    fn state(&self) -> DeviceListState {
        DeviceListState {
            audio_inputs: self.audio_inputs.clone(),
            audio_outputs: self.audio_outputs.clone(),
            video_inputs: self.video_inputs.clone(),
            on_loaded: self.on_loaded.clone(),
            on_devices_changed: self.on_devices_changed.clone(),
            fingerprint: self.fingerprint.clone(),
        }
    }

    /// Queries the user's system to find the available devices.
    ///
    /// Asynchronous; when it completes the [`on_loaded`](Self::on_loaded)
    /// callback is triggered, and the first device of each kind becomes the
    /// default selection (triggering the corresponding
    /// [`on_selected`](SelectableDevices::on_selected) callbacks).
    pub fn load(&self) {
        let state = self.state();
        spawn_local(async move {
            match enumerate_devices().await {
                Ok(devices) => {
                    state.apply(devices);
                    (state.on_loaded)();
                }
                Err(err) => error!("enumerateDevices failed: {err:?}"),
            }
        });
    }

    /// Re-enumerate every `interval_ms` and reload the lists when the set of
    /// (kind, id, label, group) tuples differs from the last enumeration.
    /// No-op when polling is already running.
    pub fn poll_device_changes(&self, interval_ms: u32) {
        if self.poll.borrow().is_some() {
            return;
        }
        let state = self.state();
        let interval = Interval::new(interval_ms, move || {
            let state = state.clone();
            spawn_local(async move {
                let devices = match enumerate_devices().await {
                    Ok(devices) => devices,
                    Err(err) => {
                        error!("enumerateDevices failed while polling: {err:?}");
                        return;
                    }
                };
                let fresh = fingerprints(&devices);
                let first_fill = state.fingerprint.borrow().is_empty();
                if first_fill {
                    *state.fingerprint.borrow_mut() = fresh;
                    return;
                }
                let changed = *state.fingerprint.borrow() != fresh;
                if changed {
                    info!("Device changes detected");
                    state.apply(devices);
                    (state.on_devices_changed)();
                }
            });
        });
        *self.poll.borrow_mut() = Some(interval);
    }

    pub fn stop_polling(&self) {
        if let Some(interval) = self.poll.borrow_mut().take() {
            interval.cancel();
        }
    }
}

fn filter_kind(devices: &[MediaDeviceInfo], kind: MediaDeviceKind) -> Vec<MediaDeviceInfo> {
    devices
        .iter()
        .filter(|device| device.kind() == kind)
        .cloned()
        .collect()
}

fn fingerprints(devices: &[MediaDeviceInfo]) -> Vec<String> {
    devices
        .iter()
        .map(|device| {
            format!(
                "{:?}|{}|{}|{}",
                device.kind(),
                device.device_id(),
                device.label(),
                device.group_id()
            )
        })
        .collect()
}

async fn enumerate_devices() -> Result<Vec<MediaDeviceInfo>, JsValue> {
    let media_devices = window().navigator().media_devices()?;
    let promise = media_devices.enumerate_devices()?;
    let devices = JsFuture::from(promise).await?.unchecked_into::<Array>();
    Ok(devices
        .to_vec()
        .into_iter()
        .map(|device| device.unchecked_into::<MediaDeviceInfo>())
        .collect())
}
