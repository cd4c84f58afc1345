mod common;

use border_agent::Reactor;
use border_agent::reactor::{TimerHandle, TimerQueue};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[test]
fn test_timers_fire_in_deadline_order() {
    let mut queue = TimerQueue::new();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let base = Instant::now();

    let log = fired.clone();
    queue.schedule(base + Duration::from_millis(20), move || {
        log.borrow_mut().push("t2")
    });
    let log = fired.clone();
    queue.schedule(base + Duration::from_millis(10), move || {
        log.borrow_mut().push("t1")
    });

    assert_eq!(queue.next_deadline(), Some(base + Duration::from_millis(10)));
    assert_eq!(queue.fire_due(base + Duration::from_millis(30)), 2);
    assert_eq!(*fired.borrow(), vec!["t1", "t2"]);
    assert!(queue.is_empty());
}

#[test]
fn test_equal_deadlines_fire_in_insertion_order() {
    let mut queue = TimerQueue::new();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let deadline = Instant::now();

    for i in 0..5 {
        let log = fired.clone();
        queue.schedule(deadline, move || log.borrow_mut().push(i));
    }

    queue.fire_due(deadline);
    assert_eq!(*fired.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_future_timers_are_kept() {
    let mut queue = TimerQueue::new();
    let base = Instant::now();

    queue.schedule(base + Duration::from_millis(5), || {});
    queue.schedule(base + Duration::from_secs(60), || {});

    assert_eq!(queue.fire_due(base + Duration::from_millis(5)), 1);
    assert_eq!(queue.len(), 1, "The late timer should still be pending");
    assert_eq!(queue.fire_due(base), 0);
}

#[test]
fn test_timer_scheduled_while_firing_waits_for_next_pass() {
    let timers = TimerHandle::new();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let deadline = Instant::now();

    let inner = timers.clone();
    let log = fired.clone();
    timers.schedule_at(deadline, move || {
        log.borrow_mut().push("outer");

        let log = log.clone();
        inner.schedule_at(deadline, move || log.borrow_mut().push("inner"));
    });

    assert_eq!(timers.fire_due(deadline), 1);
    assert_eq!(*fired.borrow(), vec!["outer"]);
    assert_eq!(timers.len(), 1, "The new timer should be queued");

    assert_eq!(timers.fire_due(deadline), 1);
    assert_eq!(*fired.borrow(), vec!["outer", "inner"]);
    assert!(timers.is_empty());
}

#[test]
fn test_reactor_fires_timer_before_poll_timeout() {
    common::init_logging();

    let mut reactor = Reactor::new(Duration::from_secs(5)).unwrap();
    let fired = Rc::new(RefCell::new(false));

    let flag = fired.clone();
    let start = Instant::now();
    reactor
        .timers()
        .schedule_after(Duration::from_millis(20), move || *flag.borrow_mut() = true);

    while !*fired.borrow() && start.elapsed() < Duration::from_secs(3) {
        reactor.run_once().unwrap();
    }

    assert!(*fired.borrow(), "Timer should have fired");
    assert!(
        start.elapsed() >= Duration::from_millis(20),
        "Timer fired early"
    );
    assert!(
        start.elapsed() < Duration::from_secs(3),
        "The wait should be bounded by the timer deadline"
    );
}
