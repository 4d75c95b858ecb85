use core::sync::atomic::{
    AtomicU64,
    Ordering,
};

/// Монотонный счётчик тиков, общий для всех процессоров.
///
/// Значение только растёт: единственная операция записи --- [`TickClock::advance_by()`]
/// с неотрицательным приращением.
/// Пишут в него обработчик периодического прерывания на загрузочном процессоре и
/// пересчёт тактов в тики в режиме без тиков, см. [`Tickless::reconcile()`].
/// Так как приращение делается атомарной операцией чтения--модификации--записи,
/// одновременные писатели не теряют обновлений друг друга.
///
/// [`Tickless::reconcile()`]: super::Tickless::reconcile
#[derive(Debug, Default)]
pub struct TickClock {
    /// Количество тиков с момента запуска системы.
    ticks: AtomicU64,
}

impl TickClock {
    /// Возвращает счётчик с нулевым значением.
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
        }
    }

    /// Возвращает текущее значение счётчика.
    #[inline]
    pub fn get(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Прибавляет к счётчику `delta` тиков.
    ///
    /// При `delta == 0` не делает ничего, в том числе не публикует запись ---
    /// опрос часов в цикле не должен порождать лишний трафик между кэшами процессоров.
    #[inline]
    pub fn advance_by(
        &self,
        delta: u64,
    ) {
        if delta == 0 {
            return;
        }

        self.ticks.fetch_add(delta, Ordering::Release);
    }

    /// Отсчитывает один тик периодического прерывания.
    #[inline]
    pub fn increment(&self) {
        self.advance_by(1);
    }
}
