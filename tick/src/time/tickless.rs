use core::sync::atomic::{
    AtomicBool,
    AtomicU64,
    Ordering,
};

use crate::{
    log::{
        debug,
        trace,
    },
    sync::ExclusiveAccess,
};

use super::{
    CycleCounter,
    TickClock,
    USECS_PER_SEC,
};

/// Режим без периодических тиков
/// ([tickless](https://en.wikipedia.org/wiki/Tickless_kernel)).
///
/// Позволяет процессору подолгу простаивать, не получая тысяч ненужных прерываний.
/// Вместо этого прошедшие тики вычисляются по запросу из счётчика тактов процессора,
/// см. [`Tickless::reconcile()`].
///
/// Хранит контрольную точку --- показание счётчика тактов на момент последнего
/// успешного пересчёта --- и остаток этого пересчёта, меньший одного тика.
/// Обе величины меняются только внутри критической секции стратегии `L`.
#[derive(Debug, Default)]
pub struct Tickless<L> {
    /// Включён ли режим без тиков.
    enabled: AtomicBool,

    /// Значение счётчика тактов процессора при последнем успешном пересчёте.
    /// Равно нулю, пока режим выключен.
    checkpoint: AtomicU64,

    /// Остаток последнего пересчёта в единицах `такты * тики_в_секунду`.
    /// Всегда меньше количества тактов процессора в секунду.
    residue: AtomicU64,

    /// Стратегия взаимного исключения пересчётов на разных процессорах.
    lock: L,
}

impl<L> Tickless<L> {
    /// Возвращает выключенный режим без тиков,
    /// пересчёты в котором будут упорядочены с помощью `lock`.
    pub const fn new(lock: L) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            checkpoint: AtomicU64::new(0),
            residue: AtomicU64::new(0),
            lock,
        }
    }

    /// Возвращает `true`, если режим без тиков включён.
    ///
    /// Читает флаг без блокировки.
    /// Потребители флага перепроверяют его после входа в критическую секцию.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Значение счётчика тактов процессора при последнем успешном пересчёте.
    pub fn checkpoint(&self) -> u64 {
        self.checkpoint.load(Ordering::Acquire)
    }
}

impl<L: ExclusiveAccess> Tickless<L> {
    /// Включает режим без тиков.
    /// Контрольной точкой становится текущее показание `counter`.
    pub fn enter<C: CycleCounter + ?Sized>(
        &self,
        counter: &C,
    ) {
        let _guard = self.lock.enter();

        let now = counter.now();

        // The checkpoint goes first: a reconciliation on another core
        // must never see the mode enabled with a stale zero checkpoint.
        self.residue.store(0, Ordering::Relaxed);
        self.checkpoint.store(now, Ordering::Release);
        self.enabled.store(true, Ordering::Release);

        debug!(checkpoint = now, "entered tickless mode");
    }

    /// Выключает режим без тиков и сбрасывает контрольную точку.
    pub fn exit(&self) {
        let _guard = self.lock.enter();

        self.enabled.store(false, Ordering::Release);
        self.checkpoint.store(0, Ordering::Release);
        self.residue.store(0, Ordering::Relaxed);

        debug!("left tickless mode");
    }

    // ANCHOR: reconcile
    /// Переводит прошедшие с контрольной точки такты процессора в тики и
    /// прибавляет их к `clock`.
    /// Возвращает количество прибавленных тиков.
    ///
    /// Если режим без тиков выключен или частота процессора `cpu_mhz` ещё не известна,
    /// ничего не делает.
    ///
    /// Контрольная точка сдвигается только когда набежал хотя бы один тик.
    /// Иначе такты, не составившие целого тика, потерялись бы,
    /// и при частом опросе медленно тикающих часов время бы стояло.
    /// Остаток от успешного пересчёта тоже сохраняется, см. [`cycles_to_ticks()`],
    /// поэтому сумма всех прибавленных тиков в точности равна
    /// `floor(прошедшие_такты * ticks_per_second / (1_000_000 * cpu_mhz))`.
    pub fn reconcile<C: CycleCounter + ?Sized>(
        &self,
        clock: &TickClock,
        counter: &C,
        ticks_per_second: u32,
        cpu_mhz: u32,
    ) -> u64 {
        if !self.is_enabled() {
            return 0;
        }

        let _guard = self.lock.enter();

        if !self.enabled.load(Ordering::Acquire) {
            return 0;
        }

        let now = counter.now();
        let checkpoint = self.checkpoint.load(Ordering::Acquire);

        // Cycle counters of different cores may lag behind each other slightly.
        let cycles = now.saturating_sub(checkpoint);

        let Conversion { ticks, residue } = cycles_to_ticks(
            cycles,
            self.residue.load(Ordering::Relaxed),
            ticks_per_second,
            cpu_mhz,
        );

        if ticks > 0 {
            clock.advance_by(ticks);
            self.residue.store(residue, Ordering::Relaxed);
            self.checkpoint.store(now, Ordering::Release);

            trace!(ticks, cycles, checkpoint = now, "reconciled");
        }

        ticks
    }
    // ANCHOR_END: reconcile

    /// Остаток последнего пересчёта в единицах `такты * тики_в_секунду`.
    fn residue(&self) -> u64 {
        let _guard = self.lock.enter();
        self.residue.load(Ordering::Relaxed)
    }
}

/// Результат пересчёта тактов процессора в тики.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Conversion {
    /// Целое количество тиков.
    pub ticks: u64,

    /// Остаток, не составивший целого тика,
    /// в единицах `такты * тики_в_секунду`.
    pub residue: u64,
}

/// Переводит `cycles` тактов процессора частоты `cpu_mhz` мегагерц,
/// вместе с остатком `residue` предыдущего пересчёта,
/// в тики частоты `ticks_per_second`:
///
/// `ticks = (cycles * ticks_per_second + residue) / (1_000_000 * cpu_mhz)`.
///
/// Промежуточные значения вычисляются в 128 битах и не переполняются.
/// При неизвестной частоте процессора `cpu_mhz == 0` тиков нет, а остаток не меняется.
pub fn cycles_to_ticks(
    cycles: u64,
    residue: u64,
    ticks_per_second: u32,
    cpu_mhz: u32,
) -> Conversion {
    let cycles_per_second = u128::from(cpu_mhz) * u128::from(USECS_PER_SEC);
    if cycles_per_second == 0 {
        return Conversion { ticks: 0, residue };
    }

    let scaled = u128::from(cycles) * u128::from(ticks_per_second) + u128::from(residue);

    // The residue is less than `cycles_per_second` which is less than `2^52`.
    Conversion {
        ticks: u64::try_from(scaled / cycles_per_second).unwrap_or(u64::MAX),
        residue: (scaled % cycles_per_second) as u64,
    }
}

#[doc(hidden)]
pub(super) mod test_scaffolding {
    use crate::sync::ExclusiveAccess;

    use super::Tickless;

    pub fn residue<L: ExclusiveAccess>(tickless: &Tickless<L>) -> u64 {
        tickless.residue()
    }
}

#[cfg(test)]
mod test {
    use super::{
        Conversion,
        cycles_to_ticks,
    };

    #[test]
    fn formula() {
        assert_eq!(cycles_to_ticks(50_000, 0, 100, 1).ticks, 5);
        assert_eq!(cycles_to_ticks(50_000, 0, 100, 1_000).ticks, 0);
        assert_eq!(cycles_to_ticks(30_000_000, 0, 100, 3_000).ticks, 1);
        assert_eq!(cycles_to_ticks(29_999_999, 0, 100, 3_000).ticks, 0);
    }

    #[test]
    fn residue() {
        let Conversion { ticks, residue } = cycles_to_ticks(15_000, 0, 100, 1);
        assert_eq!(ticks, 1);
        assert_eq!(residue, 500_000);

        let Conversion { ticks, residue } = cycles_to_ticks(5_000, residue, 100, 1);
        assert_eq!(ticks, 1);
        assert_eq!(residue, 0);
    }

    #[test]
    fn unknown_frequency() {
        assert_eq!(
            cycles_to_ticks(u64::MAX, 7, 100, 0),
            Conversion {
                ticks: 0,
                residue: 7,
            },
        );
    }

    #[test]
    fn no_overflow() {
        // `u64::MAX * 100` does not fit into 64 bits.
        let Conversion { ticks, .. } = cycles_to_ticks(u64::MAX, 0, 100, 1);
        assert_eq!(ticks, u64::MAX / 10_000);
    }
}
