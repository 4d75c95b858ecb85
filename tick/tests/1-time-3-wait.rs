use std::time::Duration;

use rstest::rstest;

use tick::{
    TaskStatus,
    Timer,
    Uniprocessor,
    log::debug,
};

use platform::{
    Platform,
    RecordingScheduler,
};

mod log;
mod platform;

const TICKS_PER_SECOND: u32 = 100;

#[rstest]
#[case(TaskStatus::Idle)]
#[case(TaskStatus::Running)]
#[timeout(Duration::from_secs(1))]
fn past_deadline_returns_immediately(#[case] status: TaskStatus) {
    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    let scheduler = RecordingScheduler::new(status);

    timer.clock().advance_by(10);

    for deadline in [0, 7, 10] {
        timer.wait_until(deadline, &platform, &scheduler);
    }
    timer.wait(0, &platform, &scheduler);

    assert_eq!(platform.halts(), 0);
    assert_eq!(scheduler.drains(), 0);
    assert_eq!(scheduler.reschedules(), 0);
    assert!(scheduler.alarms().is_empty());
    assert_eq!(timer.clock_tick(), 10);
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(100)]
#[timeout(Duration::from_secs(1))]
fn idle_task_halts_until_deadline(#[case] ticks: u32) {
    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    // The clock moves only when deferred work runs.
    let scheduler =
        RecordingScheduler::with_drain_hook(TaskStatus::Idle, || timer.clock().increment());

    timer.wait(ticks, &platform, &scheduler);

    let drains = scheduler.drains();
    let halts = platform.halts();
    debug!(ticks, drains, halts);

    assert_eq!(timer.clock_tick(), u64::from(ticks));
    assert_eq!(drains, usize::try_from(ticks).unwrap());
    assert_eq!(drains, halts + 1);
    assert_eq!(scheduler.reschedules(), 0);
    assert!(scheduler.alarms().is_empty());
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn idle_task_wakes_up_on_interrupts() {
    const TICKS: u32 = 3;

    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    let scheduler = RecordingScheduler::new(TaskStatus::Idle);

    // A tickless clock driven by cycles that elapse while the processor is halted.
    platform.advance_on_halt(10_000);
    timer.start_tickless(&platform);

    timer.wait(TICKS, &platform, &scheduler);

    assert_eq!(timer.clock_tick(), u64::from(TICKS));
    assert_eq!(platform.halts(), 3);
    assert_eq!(scheduler.drains(), 3);
}

#[rstest]
#[case(TaskStatus::Running)]
#[case(TaskStatus::Ready)]
#[case(TaskStatus::Blocked)]
#[timeout(Duration::from_secs(1))]
fn regular_task_suspends_once(#[case] status: TaskStatus) {
    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    let scheduler = RecordingScheduler::new(status);

    timer.clock().advance_by(40);
    timer.wait(2, &platform, &scheduler);

    assert_eq!(scheduler.drains(), 1);
    assert_eq!(scheduler.alarms(), [42]);
    assert_eq!(scheduler.reschedules(), 1);
    assert_eq!(platform.halts(), 0);
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn regular_task_does_not_suspend_after_deferred_work() {
    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    let scheduler =
        RecordingScheduler::with_drain_hook(TaskStatus::Running, || timer.clock().advance_by(5));

    timer.wait(5, &platform, &scheduler);

    assert_eq!(scheduler.drains(), 1);
    assert!(scheduler.alarms().is_empty());
    assert_eq!(scheduler.reschedules(), 0);
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn tickless_wait_pulls_fresh_ticks() {
    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    let scheduler = RecordingScheduler::new(TaskStatus::Running);

    timer.start_tickless(&platform);
    timer.clock().advance_by(1);

    // 3 ticks elapsed, but nobody has reconciled them yet.
    platform.advance(30_000);
    assert_eq!(timer.clock_tick(), 1);

    timer.wait_until(4, &platform, &scheduler);

    assert_eq!(timer.clock_tick(), 4);
    assert_eq!(scheduler.drains(), 0);
    assert_eq!(scheduler.reschedules(), 0);
}

#[rstest]
#[timeout(Duration::from_secs(1))]
fn deadline_counts_from_reconciled_clock() {
    let timer = Timer::new(TICKS_PER_SECOND, Uniprocessor);
    let platform = Platform::new(1);
    let scheduler = RecordingScheduler::new(TaskStatus::Running);

    timer.start_tickless(&platform);
    platform.advance(70_000);

    timer.wait(3, &platform, &scheduler);

    assert_eq!(scheduler.alarms(), [10]);
}

#[ctor::ctor]
fn init() {
    log::init();
}
