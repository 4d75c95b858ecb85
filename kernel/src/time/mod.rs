use static_assertions::const_assert;

#[cfg(not(feature = "uniprocessor"))]
use tick::IrqSpinlock;
#[cfg(feature = "uniprocessor")]
use tick::Uniprocessor;
use tick::{
    CycleCounter,
    InterruptRegistry,
    OnceLock,
    Processor,
    Result,
    Scheduler,
    TaskStatus,
    Timer,
    time::pit8254::BASE_FREQUENCY,
};

use crate::smp::CPU;

use pit8254::Ports;

pub use tsc::Tsc;

/// Порты таймера [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253).
mod pit8254;

/// [Счётчик тактов процессора](https://en.wikipedia.org/wiki/Time_Stamp_Counter).
mod tsc;

/// Логическая частота тиков часов системы.
pub const TICKS_PER_SECOND: u32 = 100;

const_assert!(TICKS_PER_SECOND > 0);
const_assert!((BASE_FREQUENCY + TICKS_PER_SECOND / 2) / TICKS_PER_SECOND <= u16::MAX as u32);

/// Часы системы.
#[cfg(not(feature = "uniprocessor"))]
static TIMER: Timer<IrqSpinlock<()>> = Timer::new(TICKS_PER_SECOND, IrqSpinlock::new(()));

/// Часы системы.
#[cfg(feature = "uniprocessor")]
static TIMER: Timer<Uniprocessor> = Timer::new(TICKS_PER_SECOND, Uniprocessor);

/// Оборудование, от которого зависят часы.
static PLATFORM: Platform = Platform::new();

/// Планировщик, с которым взаимодействует [`timer_wait()`].
static SCHEDULER: OnceLock<&'static dyn Scheduler> = OnceLock::new();

// ANCHOR: timer_init
/// Однократная настройка часов системы.
/// Вызывается на загрузочном процессоре.
///
/// Устанавливает обработчик прерываний таймера в `registry`.
/// Если частота процессора ещё не задана через [`set_cpu_frequency()`],
/// настраивает [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253)
/// на частоту [`TICKS_PER_SECOND`].
pub fn timer_init(registry: &mut dyn InterruptRegistry) -> Result<()> {
    CPU.set_boot_id(CPU.id());
    TIMER.init(registry, interrupt, &mut Ports, &PLATFORM)
}
// ANCHOR_END: timer_init

/// Задаёт частоту процессора в мегагерцах, нужную для пересчёта тактов в тики.
pub fn set_cpu_frequency(mhz: u32) {
    CPU.set_frequency(mhz);
}

/// Регистрирует планировщик, которым пользуется [`timer_wait()`].
///
/// Возвращает [`tick::Error::InvalidArgument`], если планировщик уже зарегистрирован.
pub fn set_scheduler(scheduler: &'static dyn Scheduler) -> Result<()> {
    SCHEDULER.set(scheduler)
}

/// Включает режим без тиков:
/// часы перестают зависеть от периодического прерывания и
/// пересчитываются по счётчику тактов при обращении.
pub fn start_tickless() {
    TIMER.start_tickless(&PLATFORM);
}

/// Выключает режим без тиков.
pub fn end_tickless() {
    TIMER.end_tickless();
}

/// В режиме без тиков добавляет к часам тики, накопившиеся с прошлого пересчёта.
pub fn check_ticks() {
    TIMER.check_ticks(&PLATFORM);
}

/// Текущее показание часов в тиках.
pub fn get_clock_tick() -> u64 {
    TIMER.clock_tick()
}

/// Ждёт `ticks` тиков.
///
/// Задача простоя останавливает процессор до прерываний,
/// обычная задача уступает процессор планировщику.
/// До регистрации планировщика через [`set_scheduler()`]
/// ожидание ведётся как в задаче простоя.
pub fn timer_wait(ticks: u32) -> Result<()> {
    match SCHEDULER.get() {
        Some(scheduler) => TIMER.wait(ticks, &PLATFORM, *scheduler),
        None => TIMER.wait(ticks, &PLATFORM, &BootScheduler),
    }

    Ok(())
}

/// Обработчик прерываний таймера.
pub(crate) fn interrupt() {
    TIMER.interrupt(&PLATFORM);
}

/// Счётчик тактов вместе со сведениями о процессорах [`CPU`].
#[derive(Debug)]
struct Platform {
    /// Счётчик тактов.
    tsc: Tsc,
}

impl Platform {
    /// Создаёт [`Platform`] с ещё не проверенным наличием `rdtscp`.
    const fn new() -> Self {
        Self { tsc: Tsc::new() }
    }
}

impl CycleCounter for Platform {
    #[inline(always)]
    fn read(&self) -> u64 {
        self.tsc.read()
    }

    #[inline(always)]
    fn read_serializing(&self) -> u64 {
        self.tsc.read_serializing()
    }

    fn has_serializing_read(&self) -> bool {
        self.tsc.has_serializing_read()
    }
}

impl Processor for Platform {
    fn id(&self) -> usize {
        CPU.id()
    }

    fn boot_id(&self) -> usize {
        CPU.boot_id()
    }

    fn frequency(&self) -> u32 {
        CPU.frequency()
    }

    fn halt(&self) {
        CPU.halt();
    }
}

/// Планировщик на время загрузки, пока настоящий не зарегистрирован.
/// Единственная задача --- задача простоя, отложенной работы нет.
struct BootScheduler;

impl Scheduler for BootScheduler {
    fn current_status(&self) -> TaskStatus {
        TaskStatus::Idle
    }

    fn check_workqueues(&self) {
    }

    fn set_alarm(
        &self,
        _deadline: u64,
    ) {
    }

    fn reschedule(&self) {
    }
}
