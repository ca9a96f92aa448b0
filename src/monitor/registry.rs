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

use crate::monitor::{MonitorOptions, PlaybackMonitor};
use crate::source::PlaybackSource;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Logical identity of a stream on the call page.
///
/// `Local` is the participant's own capture ("Customer"), `Remote` the far
/// end ("Agent"). The role keys the registry and labels log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    Local,
    Remote,
}

impl StreamRole {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamRole::Local => "local",
            StreamRole::Remote => "remote",
        }
    }

    /// Human label used in log lines only.
    pub fn user_label(self) -> &'static str {
        match self {
            StreamRole::Local => "Customer",
            StreamRole::Remote => "Agent",
        }
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// At most one live [`PlaybackMonitor`] per [`StreamRole`].
///
/// Owned by the page-lifecycle controller; construct it at page setup and
/// call [`destroy_all`](Self::destroy_all) at page unload. It never expires
/// an entry on its own.
pub struct MonitorRegistry {
    options: MonitorOptions,
    monitors: HashMap<StreamRole, PlaybackMonitor>,
}

impl MonitorRegistry {
    pub fn new(options: MonitorOptions) -> Self {
        Self {
            options,
            monitors: HashMap::new(),
        }
    }

    /// Return the monitor for `role`, creating one bound to `source` if none
    /// exists.
    ///
    /// An existing monitor is returned as-is even when `source` differs: one
    /// monitor per role is a guarantee, and rebinding requires an explicit
    /// [`destroy`](Self::destroy) first.
    pub fn get(&mut self, role: StreamRole, source: Rc<dyn PlaybackSource>) -> PlaybackMonitor {
        self.monitors
            .entry(role)
            .or_insert_with(|| PlaybackMonitor::new(role, source, self.options.clone()))
            .clone()
    }

    pub fn lookup(&self, role: StreamRole) -> Option<PlaybackMonitor> {
        self.monitors.get(&role).cloned()
    }

    pub fn contains(&self, role: StreamRole) -> bool {
        self.monitors.contains_key(&role)
    }

    /// Destroy and remove the monitor for `role`. No-op when absent.
    pub fn destroy(&mut self, role: StreamRole) {
        if let Some(monitor) = self.monitors.remove(&role) {
            monitor.destroy();
        }
    }

    /// Destroy and remove every monitor; used for full page teardown.
    pub fn destroy_all(&mut self) {
        for (_, monitor) in self.monitors.drain() {
            monitor.destroy();
        }
    }
}
