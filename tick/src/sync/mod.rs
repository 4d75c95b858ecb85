/// Стратегии взаимного исключения [`ExclusiveAccess`] для критической секции
/// пересчёта тактов процессора в тики.
pub mod exclusive;

/// Примитив синхронизации [`IrqSpinlock`].
pub mod irq_spinlock;

/// Примитив синхронизации [`OnceLock`] для данных,
/// которые один раз записываются, а потом только читаются.
pub mod once_lock;

/// Примитив синхронизации [`Spinlock`].
pub mod spinlock;

pub use exclusive::{
    ExclusiveAccess,
    Uniprocessor,
};
pub use irq_spinlock::{
    IrqSpinlock,
    IrqSpinlockGuard,
};
pub use once_lock::OnceLock;
pub use spinlock::{
    Spinlock,
    SpinlockGuard,
};
