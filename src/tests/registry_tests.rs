use super::fakes::{FakeScheduler, FakeSource};
use crate::monitor::{MonitorOptions, MonitorRegistry, PageVisibility, PlaybackEvent, StreamRole};
use crate::sink::CapturedLogSink;
use std::rc::Rc;

fn test_registry() -> (MonitorRegistry, FakeScheduler, CapturedLogSink) {
    let scheduler = FakeScheduler::default();
    let sink = CapturedLogSink::new();
    let registry = MonitorRegistry::new(MonitorOptions {
        sink: Rc::new(sink.clone()),
        scheduler: Rc::new(scheduler.clone()),
        visibility: Rc::new(|| PageVisibility::Unknown),
        warning_delay_ms: 15_000,
    });
    (registry, scheduler, sink)
}

#[test]
fn get_creates_one_monitor_per_role() {
    let (mut registry, _scheduler, _sink) = test_registry();
    let source = FakeSource::new();

    assert!(!registry.contains(StreamRole::Local));
    let first = registry.get(StreamRole::Local, Rc::new(source.clone()));
    let second = registry.get(StreamRole::Local, Rc::new(source));
    assert!(first == second);
    assert!(registry.contains(StreamRole::Local));
    assert_eq!(registry.lookup(StreamRole::Local), Some(first));
    assert!(registry.lookup(StreamRole::Remote).is_none());
}

#[test]
fn get_keeps_the_original_source_binding() {
    let (mut registry, _scheduler, _sink) = test_registry();
    let source_a = FakeSource::new();
    let source_b = FakeSource::new();

    let first = registry.get(StreamRole::Remote, Rc::new(source_a.clone()));
    let second = registry.get(StreamRole::Remote, Rc::new(source_b.clone()));
    assert!(first == second);

    second.start();
    // listeners went on the first source, the second was ignored
    assert_eq!(source_a.listener_count(), 5);
    assert_eq!(source_b.listener_count(), 0);

    source_a.emit(PlaybackEvent::Playing);
    assert_eq!(first.latest_event(), PlaybackEvent::Playing);
}

#[test]
fn local_and_remote_are_independent_monitors() {
    let (mut registry, _scheduler, _sink) = test_registry();
    let local_source = FakeSource::new();
    let remote_source = FakeSource::new();

    let local = registry.get(StreamRole::Local, Rc::new(local_source.clone()));
    let remote = registry.get(StreamRole::Remote, Rc::new(remote_source));
    assert!(local != remote);

    local.start();
    local_source.emit(PlaybackEvent::Stalled);
    assert_eq!(local.latest_event(), PlaybackEvent::Stalled);
    assert_eq!(remote.latest_event(), PlaybackEvent::None);
}

#[test]
fn destroy_tears_down_and_allows_rebinding() {
    let (mut registry, scheduler, _sink) = test_registry();
    let source_a = FakeSource::new();
    let source_b = FakeSource::new();

    let first = registry.get(StreamRole::Local, Rc::new(source_a.clone()));
    first.start();
    assert_eq!(source_a.listener_count(), 5);

    registry.destroy(StreamRole::Local);
    assert!(!registry.contains(StreamRole::Local));
    assert_eq!(source_a.listener_count(), 0);
    assert_eq!(scheduler.pending(), 0);

    // a new get after destroy binds the new source
    let second = registry.get(StreamRole::Local, Rc::new(source_b.clone()));
    assert!(first != second);
    second.start();
    assert_eq!(source_b.listener_count(), 5);
}

#[test]
fn destroy_of_absent_role_is_a_no_op() {
    let (mut registry, _scheduler, _sink) = test_registry();
    registry.destroy(StreamRole::Remote);
    assert!(!registry.contains(StreamRole::Remote));
}

#[test]
fn destroy_all_empties_the_registry() {
    let (mut registry, scheduler, _sink) = test_registry();
    let local_source = FakeSource::new();
    let remote_source = FakeSource::new();

    registry
        .get(StreamRole::Local, Rc::new(local_source.clone()))
        .start();
    registry
        .get(StreamRole::Remote, Rc::new(remote_source.clone()))
        .start();
    assert_eq!(scheduler.pending(), 2);

    registry.destroy_all();

    assert!(!registry.contains(StreamRole::Local));
    assert!(!registry.contains(StreamRole::Remote));
    assert_eq!(local_source.listener_count(), 0);
    assert_eq!(remote_source.listener_count(), 0);
    assert_eq!(scheduler.pending(), 0);
}
