//! Привязка монотонного времени [`tick`] к оборудованию
//! [x86-64](https://wiki.osdev.org/X86-64):
//! счётчику тактов процессора, инструкции `hlt`,
//! портам таймера [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253).
//!
//! Содержит единственные на всю систему часы и их внешний интерфейс ---
//! [`time::timer_init()`], [`time::timer_wait()`] и остальные функции модуля [`time`].

#![no_std]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(missing_docs)]

/// Поддержка симметричной многопроцессорности
/// ([Symmetric multiprocessing](https://en.wikipedia.org/wiki/Symmetric_multiprocessing), SMP)
/// в той мере, в какой она нужна часам.
pub mod smp;

/// Часы системы.
pub mod time;
