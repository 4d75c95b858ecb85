use crate::{
    log::trace,
    sync::ExclusiveAccess,
};

use super::{
    CycleCounter,
    Processor,
    Timer,
};

/// Состояние задачи с точки зрения планировщика.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TaskStatus {
    /// Слот задачи не занят.
    Invalid,

    /// Задача готова к исполнению и ждёт процессора.
    Ready,

    /// Задача исполняется.
    Running,

    /// Задача ждёт события.
    Blocked,

    /// Задача завершилась.
    Finished,

    /// Задача простоя своего процессора.
    Idle,
}

/// Внешний планировщик, с которым взаимодействует ожидание [`Timer::wait()`].
pub trait Scheduler: Sync {
    /// Состояние задачи, исполняющейся на текущем процессоре.
    fn current_status(&self) -> TaskStatus;

    /// Даёт выполниться отложенной работе из очередей.
    fn check_workqueues(&self);

    /// Просит разбудить текущую задачу, когда часы дойдут до тика `deadline`.
    fn set_alarm(
        &self,
        deadline: u64,
    );

    /// Добровольно уступает процессор другим задачам.
    fn reschedule(&self);
}

impl<L: ExclusiveAccess> Timer<L> {
    /// Ждёт `ticks` тиков, отсчитывая их от текущего показания часов.
    /// Ошибкой не завершается.
    pub fn wait<P, S>(
        &self,
        ticks: u32,
        platform: &P,
        scheduler: &S,
    ) where
        P: CycleCounter + Processor + ?Sized,
        S: Scheduler + ?Sized,
    {
        self.check_ticks(platform);
        let deadline = self.clock().get().saturating_add(u64::from(ticks));

        self.wait_until(deadline, platform, scheduler);
    }

    // ANCHOR: wait_until
    /// Ждёт, пока часы не дойдут до тика `deadline`.
    /// Если он уже наступил, сразу возвращается,
    /// не вызывая ни [`Processor::halt()`], ни [`Scheduler::reschedule()`].
    ///
    /// Способ ожидания зависит от состояния текущей задачи:
    ///   - Задача простоя ждёт в цикле:
    ///     даёт выполниться отложенной работе, проверяет часы и,
    ///     если срок ещё не наступил, останавливает процессор до следующего прерывания.
    ///   - Обычная задача один раз даёт выполниться отложенной работе и,
    ///     если срок ещё не наступил, заводит будильник на `deadline` и
    ///     уступает процессор. Второй раз она не засыпает ---
    ///     будить её вовремя обязан планировщик.
    ///
    /// Каждая проверка часов в режиме без тиков
    /// сначала пересчитывает в тики прошедшие такты процессора.
    pub fn wait_until<P, S>(
        &self,
        deadline: u64,
        platform: &P,
        scheduler: &S,
    ) where
        P: CycleCounter + Processor + ?Sized,
        S: Scheduler + ?Sized,
    {
        if self.has_reached(deadline, platform) {
            return;
        }

        if scheduler.current_status() == TaskStatus::Idle {
            loop {
                scheduler.check_workqueues();
                if self.has_reached(deadline, platform) {
                    break;
                }

                platform.halt();
                if self.has_reached(deadline, platform) {
                    break;
                }
            }
        } else {
            scheduler.check_workqueues();

            if !self.has_reached(deadline, platform) {
                trace!(deadline, now = self.clock().get(), "suspending until deadline");
                scheduler.set_alarm(deadline);
                scheduler.reschedule();
            }
        }
    }
    // ANCHOR_END: wait_until

    /// Возвращает `true`, если часы дошли до тика `deadline`.
    fn has_reached<P>(
        &self,
        deadline: u64,
        platform: &P,
    ) -> bool
    where
        P: CycleCounter + Processor + ?Sized,
    {
        self.check_ticks(platform);
        self.clock().get() >= deadline
    }
}
