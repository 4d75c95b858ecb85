//! Монотонное время ядра, измеряемое в тиках.
//!
//! Счётчик тиков продвигается либо периодическим прерыванием таймера,
//! либо, в режиме без тиков
//! ([tickless](https://en.wikipedia.org/wiki/Tickless_kernel)),
//! по запросу --- пересчётом прошедших
//! [тактов процессора](https://en.wikipedia.org/wiki/Time_Stamp_Counter) в тики.
//!
//! Библиотека не обращается к оборудованию напрямую.
//! Всё, что ей нужно от процессора, планировщика и контроллера прерываний,
//! она получает через типажи
//! [`CycleCounter`], [`Processor`], [`Scheduler`], [`InterruptRegistry`] и [`PortIo`].
//! Поэтому её можно целиком тестировать вне ядра.

#![no_std]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(missing_docs)]

#[cfg(test)]
extern crate alloc;

/// Перечисление для возможных ошибок [`Error`] и соответствующий [`Result`].
pub mod error;

/// Поддержка журналирования макросами библиотеки [`tracing`].
pub mod log;

/// Примитивы синхронизации [`Spinlock`], [`IrqSpinlock`] и [`OnceLock`],
/// а также стратегии взаимного исключения [`ExclusiveAccess`].
pub mod sync;

/// Счётчик тиков, режим без тиков, ожидание до заданного тика
/// и начальная настройка источника периодических прерываний.
pub mod time;

pub use error::{
    Error,
    Result,
};
pub use sync::{
    ExclusiveAccess,
    IrqSpinlock,
    OnceLock,
    Spinlock,
    Uniprocessor,
};
pub use time::{
    CycleCounter,
    Hz,
    InterruptRegistry,
    PortIo,
    Processor,
    Scheduler,
    TaskStatus,
    TickClock,
    Tickless,
    Timer,
};
