use core::ops::{
    Deref,
    DerefMut,
};

use x86_64::instructions::interrupts;

use super::{
    Spinlock,
    SpinlockGuard,
};

/// Спин-блокировка, которая позволяет синхронизировать доступ
/// к защищаемым ею данным как из обычного кода, так и из обработчика прерываний.
/// В остальном аналогична [`Spinlock`].
///
/// На время владения блокировкой запрещает прерывания на текущем процессоре,
/// а при освобождении возвращает флаг разрешения прерываний в исходное состояние.
/// Поэтому её можно захватывать и там, где прерывания уже запрещены.
///
/// # Note
///
/// Запрет прерываний --- привилегированная операция,
/// вне ядра [`IrqSpinlock`] использовать нельзя.
pub struct IrqSpinlock<T>(Spinlock<T>);

impl<T> IrqSpinlock<T> {
    /// Создаёт новую спин-блокировку для защиты `data`.
    pub const fn new(data: T) -> Self {
        Self(Spinlock::new(data))
    }

    /// Захватывает спин-блокировку.
    /// При этом ожидает в активном цикле освобождения блокировки, если она уже захвачена.
    ///
    /// Возвращает [`IrqSpinlockGuard`], который:
    ///   - Позволяет читать и писать в защищаемые [`IrqSpinlock`] данные
    ///     с помощью типажей [`Deref`] и [`DerefMut`] соответственно.
    ///   - Автоматически освобождает блокировку в реализации типажа [`Drop`].
    pub fn lock(&self) -> IrqSpinlockGuard<'_, T> {
        let irq_guard = IrqGuard::new();

        IrqSpinlockGuard {
            spinlock_guard: self.0.lock(),
            irq_guard,
        }
    }
}

/// Вспомогательная структура для [`IrqSpinlock`].
///
/// - Запоминает состояние флага разрешения прерываний в момент создания.
/// - После чего запрещает прерывания.
/// - Автоматически возвращает флаг разрешения прерываний
///   в исходное состояние в реализации типажа [`Drop`].
struct IrqGuard {
    /// Были ли разрешены прерывания в момент создания [`IrqGuard`].
    were_enabled: bool,
}

impl IrqGuard {
    /// Запоминает состояние флага разрешения прерываний и запрещает прерывания.
    fn new() -> Self {
        let were_enabled = interrupts::are_enabled();
        interrupts::disable();
        Self { were_enabled }
    }
}

impl Drop for IrqGuard {
    fn drop(&mut self) {
        if self.were_enabled {
            interrupts::enable();
        }
    }
}

#[allow(rustdoc::private_intra_doc_links)]
/// Захваченный на запись [`IrqSpinlock`].
///
/// При разрушении сначала освобождает блокировку,
/// а уже потом возвращает флаг разрешения прерываний в исходное состояние.
pub struct IrqSpinlockGuard<'a, T> {
    /// Захваченный на запись [`Spinlock`].
    spinlock_guard: SpinlockGuard<'a, T>,

    /// Должен быть после [`IrqSpinlockGuard::spinlock_guard`],
    /// так как поля разрушаются в порядке объявления.
    // Only `IrqGuard::drop()` is used, implicitly.
    #[allow(dead_code)]
    irq_guard: IrqGuard,
}

impl<T> Deref for IrqSpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.spinlock_guard.deref()
    }
}

impl<T> DerefMut for IrqSpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.spinlock_guard.deref_mut()
    }
}
