/// Счётчик тиков [`TickClock`].
mod clock;

/// Типаж [`CycleCounter`] для чтения счётчика тактов процессора.
mod cycles;

/// Вспомогательная структура [`Hz`] для форматирования
/// [частоты](https://en.wikipedia.org/wiki/Hertz) при журналировании.
mod hz;

/// Устаревший
/// [программируемый таймер](https://en.wikipedia.org/wiki/Programmable_interval_timer)
/// [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253),
/// который служит источником периодических прерываний.
pub mod pit8254;

/// Типаж [`Processor`] --- то, что подсистеме времени нужно от процессора.
mod processor;

/// Режим без периодических тиков [`Tickless`].
pub mod tickless;

/// Часы системы [`Timer`] и их начальная настройка.
mod timer;

/// Ожидание до заданного тика, [`Timer::wait()`] и [`Timer::wait_until()`].
mod wait;

pub use clock::TickClock;
pub use cycles::CycleCounter;
pub use hz::Hz;
pub use pit8254::{
    Pit,
    PortIo,
};
pub use processor::Processor;
pub use tickless::{
    Conversion,
    Tickless,
    cycles_to_ticks,
};
pub use timer::{
    APIC_TIMER_VECTOR,
    InterruptRegistry,
    PIT_VECTOR,
    TIMER_VECTORS,
    Timer,
};
pub use wait::{
    Scheduler,
    TaskStatus,
};

/// Количество микросекунд в одной секунде.
const USECS_PER_SEC: u64 = 1_000_000;

#[doc(hidden)]
pub mod test_scaffolding {
    pub use super::tickless::test_scaffolding::*;
}
