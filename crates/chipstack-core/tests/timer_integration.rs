//! Integration tests for the countdown worker.
//!
//! Most tests run on a paused tokio clock, so "skipped" ticks can be produced
//! deterministically with `tokio::time::advance`.

use std::time::Duration;

use chipstack_core::{TimerEngine, TimerEvent, TimerMode, TimerSnapshot, TimerStatus};

const TICK: Duration = Duration::from_millis(100);

fn tick(remaining_seconds: u64, remaining_ms: u64) -> TimerEvent {
    TimerEvent::Tick {
        remaining_seconds,
        remaining_ms,
        is_complete: remaining_ms == 0,
    }
}

#[tokio::test(start_paused = true)]
async fn start_emits_immediate_tick() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(5);

    assert_eq!(events.recv().await, Some(tick(5, 5_000)));
    assert_eq!(timer.snapshot().status, TimerStatus::Running);
    assert_eq!(timer.snapshot().total_seconds, 5);
}

#[tokio::test(start_paused = true)]
async fn countdown_runs_to_single_completion() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(3);

    let mut seconds = Vec::new();
    let mut completions = 0;
    while let Some(event) = events.recv().await {
        match event {
            TimerEvent::Tick {
                remaining_seconds, ..
            } => seconds.push(remaining_seconds),
            TimerEvent::Complete { mode } => {
                assert_eq!(mode, TimerMode::Work);
                completions += 1;
                break;
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(seconds.first(), Some(&3));
    assert_eq!(seconds.last(), Some(&0));
    assert!(seconds.windows(2).all(|w| w[0] >= w[1]), "{seconds:?}");

    // Nothing more once completed, however long we wait.
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(events.try_recv(), None);
    assert_eq!(timer.snapshot().status, TimerStatus::Completed);
    assert_eq!(timer.snapshot().remaining_seconds, 0);
    assert_eq!(timer.snapshot().elapsed_seconds, 3);
}

#[tokio::test(start_paused = true)]
async fn skipped_ticks_report_true_remaining_time() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(10);
    assert_eq!(events.recv().await, Some(tick(10, 10_000)));

    // Thirty-four ticks are missed in one jump.
    tokio::time::advance(Duration::from_millis(3_450)).await;
    assert_eq!(events.recv().await, Some(tick(7, 6_550)));

    // No burst of catch-up ticks follows.
    match events.recv().await {
        Some(TimerEvent::Tick {
            remaining_seconds,
            remaining_ms,
            ..
        }) => {
            assert_eq!(remaining_seconds, 7);
            assert!(remaining_ms < 6_550, "{remaining_ms}");
            assert!(remaining_ms >= 6_400, "{remaining_ms}");
        }
        other => panic!("expected tick, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn jump_past_deadline_completes_once() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(2);
    events.recv().await;

    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(events.recv().await, Some(tick(0, 0)));
    assert_eq!(
        events.recv().await,
        Some(TimerEvent::Complete {
            mode: TimerMode::Work
        })
    );
    tokio::time::advance(Duration::from_secs(30)).await;
    assert_eq!(events.try_recv(), None);
}

#[tokio::test(start_paused = true)]
async fn pause_then_resume_keeps_remaining_time() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(10);
    events.recv().await;

    tokio::time::advance(Duration::from_millis(2_000)).await;
    timer.pause();
    let paused = loop {
        match events.recv().await {
            Some(TimerEvent::Paused { remaining_seconds }) => break remaining_seconds,
            Some(TimerEvent::Tick { .. }) => continue,
            other => panic!("unexpected event {other:?}"),
        }
    };
    assert_eq!(paused, 8);

    // A long pause produces no events and costs no countdown time.
    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(events.try_recv(), None);
    let snap = timer.query_status().await;
    assert_eq!(snap.status, TimerStatus::Paused);
    assert_eq!(snap.remaining_seconds, 8);

    timer.resume();
    assert_eq!(events.recv().await, Some(tick(8, 8_000)));
    assert_eq!(timer.snapshot().status, TimerStatus::Running);
}

#[tokio::test(start_paused = true)]
async fn pause_while_idle_has_no_effect() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.pause();
    timer.resume();

    assert_eq!(timer.query_status().await, TimerSnapshot::IDLE);
    assert_eq!(events.try_recv(), None);
}

#[tokio::test(start_paused = true)]
async fn resume_while_running_has_no_effect() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(10);
    events.recv().await;

    timer.resume();
    let snap = timer.query_status().await;
    assert_eq!(snap.status, TimerStatus::Running);
    assert_eq!(snap.remaining_seconds, 10);
    assert_eq!(events.try_recv(), None);
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_run() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(5);
    timer.stop();

    let finished = events.until_complete(|_| {}).await;
    assert_eq!(finished, None);
    assert_eq!(timer.snapshot(), TimerSnapshot::IDLE);

    // Stopping an idle timer is harmless and still acknowledged.
    timer.stop();
    assert_eq!(events.recv().await, Some(TimerEvent::Stopped));
}

#[tokio::test(start_paused = true)]
async fn break_completes_and_resets_to_idle() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start_break(2);

    let mut seen = 0;
    let finished = events.until_complete(|_| seen += 1).await;
    assert_eq!(finished, Some(TimerMode::Break));
    assert!(seen > 2);
    assert_eq!(timer.snapshot().status, TimerStatus::BreakCompleted);

    timer.reset();
    assert_eq!(events.recv().await, Some(TimerEvent::Stopped));
    assert_eq!(timer.query_status().await, TimerSnapshot::IDLE);
}

#[tokio::test(start_paused = true)]
async fn zero_duration_start_is_ignored() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(0);
    assert_eq!(timer.query_status().await.status, TimerStatus::Idle);
    assert_eq!(events.try_recv(), None);
}

#[tokio::test(start_paused = true)]
async fn worker_exits_when_handles_dropped() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    let clone = timer.clone();
    drop(timer);
    clone.start(60);
    assert!(events.recv().await.is_some());
    drop(clone);

    // Remaining queued events drain, then the channel closes.
    while events.recv().await.is_some() {}
}

#[tokio::test(start_paused = true)]
async fn snapshots_are_observable_via_watch() {
    let (timer, _events) = TimerEngine::spawn(TICK).unwrap();
    let mut watcher = timer.subscribe();
    timer.start(4);

    watcher.changed().await.unwrap();
    assert_eq!(watcher.borrow().status, TimerStatus::Running);
    assert_eq!(watcher.borrow().total_seconds, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocked_caller_does_not_slow_the_countdown() {
    let (timer, mut events) = TimerEngine::spawn(TICK).unwrap();
    timer.start(2);
    events.recv().await;

    // Block this thread outright; the worker keeps counting on another.
    std::thread::sleep(Duration::from_millis(1_200));

    let snap = timer.query_status().await;
    assert_eq!(snap.status, TimerStatus::Running);
    assert_eq!(snap.remaining_seconds, 1);
    assert!(snap.elapsed_seconds >= 1);
}
