use crate::{
    error::Result,
    log::info,
    sync::ExclusiveAccess,
};

use super::{
    CycleCounter,
    Hz,
    Processor,
    TickClock,
    Tickless,
    pit8254::{
        PortIo,
        Pit,
    },
};

/// Вектор прерывания PIT при перенастроенном контроллере прерываний
/// [Intel 8259](https://en.wikipedia.org/wiki/Intel_8259).
pub const PIT_VECTOR: u8 = 32;

/// Вектор прерывания таймера в
/// [Local APIC](https://en.wikipedia.org/wiki/Advanced_Programmable_Interrupt_Controller#APIC_timer).
pub const APIC_TIMER_VECTOR: u8 = 123;

/// Векторы, на которые устанавливается обработчик прерываний таймера.
/// Срабатывает только один из них, в зависимости от режима контроллера прерываний.
pub const TIMER_VECTORS: [u8; 2] = [PIT_VECTOR, APIC_TIMER_VECTOR];

/// Внешняя подсистема прерываний, в которой таймер регистрирует свой обработчик.
pub trait InterruptRegistry {
    /// Устанавливает `handler` обработчиком прерывания номер `vector`.
    fn install(
        &mut self,
        vector: u8,
        handler: fn(),
    );
}

/// Монотонное время системы в тиках частоты `ticks_per_second`.
///
/// Объединяет счётчик тиков [`TickClock`] и режим без тиков [`Tickless`].
/// Пересчёты в режиме без тиков на разных процессорах упорядочивает
/// стратегия взаимного исключения `L`, см. [`ExclusiveAccess`].
///
/// Ядро держит один экземпляр [`Timer`] на всю систему.
#[derive(Debug)]
pub struct Timer<L> {
    /// Счётчик тиков.
    clock: TickClock,

    /// Режим без тиков.
    tickless: Tickless<L>,

    /// Логическая частота тиков.
    ticks_per_second: u32,
}

impl<L> Timer<L> {
    /// Создаёт часы с нулевым показанием и выключенным режимом без тиков.
    pub const fn new(
        ticks_per_second: u32,
        lock: L,
    ) -> Self {
        Self {
            clock: TickClock::new(),
            tickless: Tickless::new(lock),
            ticks_per_second,
        }
    }

    /// Счётчик тиков.
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }
}

impl<L: ExclusiveAccess> Timer<L> {
    // ANCHOR: init
    /// Однократная настройка источника тиков.
    ///
    /// Устанавливает `handler` на оба вектора [`TIMER_VECTORS`].
    /// Если частота процессора уже известна из другого источника,
    /// периодический таймер не нужен и не настраивается.
    /// Иначе программирует PIT на частоту тиков через `port`,
    /// выдерживая паузы по счётчику тактов `platform`.
    ///
    /// Ошибку возвращает только при недопустимой частоте тиков, см. [`Pit::divisor()`].
    pub fn init<R, P, C>(
        &self,
        registry: &mut R,
        handler: fn(),
        port: &mut P,
        platform: &C,
    ) -> Result<()>
    where
        R: InterruptRegistry + ?Sized,
        P: PortIo + ?Sized,
        C: CycleCounter + Processor + ?Sized,
    {
        for vector in TIMER_VECTORS {
            registry.install(vector, handler);
        }

        if let Some(cpu_frequency) = Hz::from_mhz(platform.frequency()) {
            info!(%cpu_frequency, "cpu frequency is known, skipping the periodic timer setup");
            return Ok(());
        }

        let divisor = Pit::program(port, platform, self.ticks_per_second)?;

        info!(
            divisor,
            ticks_per_second = self.ticks_per_second,
            serializing = platform.has_serializing_read(),
            "timer init"
        );

        Ok(())
    }
    // ANCHOR_END: init

    /// Обработчик периодического прерывания таймера.
    /// Отсчитывает тик, только если прерывание пришло на загрузочный процессор.
    #[inline]
    pub fn interrupt<P: Processor + ?Sized>(
        &self,
        processor: &P,
    ) {
        if processor.id() == processor.boot_id() {
            self.clock.increment();
        }
    }

    /// Включает режим без тиков, см. [`Tickless::enter()`].
    pub fn start_tickless<C: CycleCounter + ?Sized>(
        &self,
        counter: &C,
    ) {
        self.tickless.enter(counter);
    }

    /// Выключает режим без тиков, см. [`Tickless::exit()`].
    pub fn end_tickless(&self) {
        self.tickless.exit();
    }

    /// В режиме без тиков пересчитывает в тики прошедшие такты процессора,
    /// см. [`Tickless::reconcile()`].
    /// Вне этого режима ничего не делает.
    ///
    /// Возвращает количество прибавленных к часам тиков.
    #[inline]
    pub fn check_ticks<P>(
        &self,
        platform: &P,
    ) -> u64
    where
        P: CycleCounter + Processor + ?Sized,
    {
        if !self.tickless.is_enabled() {
            return 0;
        }

        self.tickless.reconcile(
            &self.clock,
            platform,
            self.ticks_per_second,
            platform.frequency(),
        )
    }

    /// Текущее показание часов в тиках.
    ///
    /// В режиме без тиков может отставать, пока кто-нибудь не вызовет
    /// [`Timer::check_ticks()`].
    #[inline]
    pub fn clock_tick(&self) -> u64 {
        self.clock.get()
    }
}
