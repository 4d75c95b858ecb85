use super::{
    IrqSpinlock,
    IrqSpinlockGuard,
    Spinlock,
    SpinlockGuard,
};

/// Стратегия взаимного исключения для критической секции,
/// которая не защищает собственных данных,
/// а лишь упорядочивает последовательность чтений и записей атомарных переменных.
///
/// Конфигурация ядра выбирает стратегию один раз, на этапе сборки:
///   - [`IrqSpinlock`] --- для многопроцессорной системы;
///   - [`Uniprocessor`] --- для однопроцессорной, где блокировка не нужна;
///   - [`Spinlock`] --- вне ядра, например в тестах,
///     где запрещать прерывания нельзя.
pub trait ExclusiveAccess {
    /// Объект, удерживающий критическую секцию до своего разрушения.
    type Guard<'a>
    where
        Self: 'a;

    /// Входит в критическую секцию.
    fn enter(&self) -> Self::Guard<'_>;
}

impl ExclusiveAccess for Spinlock<()> {
    type Guard<'a> = SpinlockGuard<'a, ()>;

    fn enter(&self) -> Self::Guard<'_> {
        self.lock()
    }
}

impl ExclusiveAccess for IrqSpinlock<()> {
    type Guard<'a> = IrqSpinlockGuard<'a, ()>;

    fn enter(&self) -> Self::Guard<'_> {
        self.lock()
    }
}

/// Стратегия для однопроцессорной конфигурации:
/// вход в критическую секцию ничего не делает.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uniprocessor;

impl ExclusiveAccess for Uniprocessor {
    type Guard<'a> = ();

    fn enter(&self) -> Self::Guard<'_> {}
}
