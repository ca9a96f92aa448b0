use crate::monitor::{
    MediaErrorInfo, MonitorOptions, PageVisibility, PlaybackEvent, PlaybackMonitor, StreamRole,
};
use crate::sink::CapturedLogSink;
use crate::source::{EventSubscription, PlaybackSource, SourceError};
use crate::timer::{TimerHandle, TimerScheduler};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub struct FakeSourceState {
    next_id: u64,
    handlers: Vec<(u64, PlaybackEvent, Rc<dyn Fn()>)>,
    fail_subscribe: bool,
    pub current_time: f64,
    pub ready_state: u16,
    pub network_state: u16,
    pub paused: bool,
    pub ended: bool,
    pub muted: bool,
    pub volume: f64,
    pub error: Option<MediaErrorInfo>,
}

/// In-memory playback source. Tests deliver events with [`emit`](Self::emit)
/// and adjust the metadata fields with [`set_status`](Self::set_status).
#[derive(Clone)]
pub struct FakeSource {
    state: Rc<RefCell<FakeSourceState>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeSourceState {
                next_id: 0,
                handlers: Vec::new(),
                fail_subscribe: false,
                current_time: 0.0,
                ready_state: 4,
                network_state: 1,
                paused: false,
                ended: false,
                muted: false,
                volume: 1.0,
                error: None,
            })),
        }
    }

    /// A source whose listener registration always fails.
    pub fn failing() -> Self {
        let source = Self::new();
        source.state.borrow_mut().fail_subscribe = true;
        source
    }

    /// Fire every handler registered for `event`, in registration order.
    pub fn emit(&self, event: PlaybackEvent) {
        let handlers: Vec<Rc<dyn Fn()>> = self
            .state
            .borrow()
            .handlers
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .map(|(_, _, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().handlers.len()
    }

    pub fn listener_count_for(&self, event: PlaybackEvent) -> usize {
        self.state
            .borrow()
            .handlers
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .count()
    }

    pub fn set_status(&self, update: impl FnOnce(&mut FakeSourceState)) {
        update(&mut self.state.borrow_mut());
    }
}

struct FakeSubscription {
    state: Weak<RefCell<FakeSourceState>>,
    id: u64,
}

impl EventSubscription for FakeSubscription {}

impl Drop for FakeSubscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state
                .borrow_mut()
                .handlers
                .retain(|(id, _, _)| *id != self.id);
        }
    }
}

impl PlaybackSource for FakeSource {
    fn subscribe(
        &self,
        event: PlaybackEvent,
        handler: Box<dyn Fn()>,
    ) -> Result<Box<dyn EventSubscription>, SourceError> {
        let mut state = self.state.borrow_mut();
        if state.fail_subscribe {
            return Err(SourceError::Subscribe {
                event: event.dom_name(),
                reason: "listener rejected".to_string(),
            });
        }
        let id = state.next_id;
        state.next_id += 1;
        state.handlers.push((id, event, Rc::from(handler)));
        Ok(Box::new(FakeSubscription {
            state: Rc::downgrade(&self.state),
            id,
        }))
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn ready_state(&self) -> u16 {
        self.state.borrow().ready_state
    }

    fn network_state(&self) -> u16 {
        self.state.borrow().network_state
    }

    fn paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn ended(&self) -> bool {
        self.state.borrow().ended
    }

    fn muted(&self) -> bool {
        self.state.borrow().muted
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn playback_error(&self) -> Option<MediaErrorInfo> {
        self.state.borrow().error.clone()
    }
}

struct ScheduledTimer {
    delay_ms: u32,
    callback: Option<Box<dyn FnOnce()>>,
    cancelled: Rc<Cell<bool>>,
}

/// Manual scheduler: timers queue up until the test fires them.
#[derive(Clone, Default)]
pub struct FakeScheduler {
    timers: Rc<RefCell<Vec<ScheduledTimer>>>,
}

struct FakeTimerHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle for FakeTimerHandle {
    fn cancel(self: Box<Self>) {
        self.cancelled.set(true);
    }
}

impl TimerScheduler for FakeScheduler {
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Box<dyn TimerHandle> {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(ScheduledTimer {
            delay_ms,
            callback: Some(callback),
            cancelled: Rc::clone(&cancelled),
        });
        Box::new(FakeTimerHandle { cancelled })
    }
}

impl FakeScheduler {
    /// Run every non-cancelled queued timer, in scheduling order. Returns how
    /// many actually fired. Timers scheduled by the fired callbacks queue up
    /// for the next call.
    pub fn fire_all(&self) -> usize {
        let timers: Vec<ScheduledTimer> = self.timers.borrow_mut().drain(..).collect();
        let mut fired = 0;
        for mut timer in timers {
            if timer.cancelled.get() {
                continue;
            }
            if let Some(callback) = timer.callback.take() {
                callback();
                fired += 1;
            }
        }
        fired
    }

    /// Queued timers that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }

    pub fn last_delay_ms(&self) -> Option<u32> {
        self.timers.borrow().last().map(|timer| timer.delay_ms)
    }
}

/// A monitor wired to fakes, plus the fakes themselves for driving it.
pub fn test_monitor(
    role: StreamRole,
    delay_ms: u32,
) -> (PlaybackMonitor, FakeSource, FakeScheduler, CapturedLogSink) {
    let source = FakeSource::new();
    let scheduler = FakeScheduler::default();
    let sink = CapturedLogSink::new();
    let monitor = PlaybackMonitor::new(
        role,
        Rc::new(source.clone()),
        MonitorOptions {
            sink: Rc::new(sink.clone()),
            scheduler: Rc::new(scheduler.clone()),
            visibility: Rc::new(|| PageVisibility::Visible),
            warning_delay_ms: delay_ms,
        },
    );
    (monitor, source, scheduler, sink)
}
