#![allow(clippy::unusual_byte_groupings)]

use bitflags::bitflags;

use crate::error::{
    Error::InvalidArgument,
    Result,
};

use super::CycleCounter;

// Used in docs.
#[allow(unused)]
use crate::error::Error;

/// Базовая частота PIT в герцах, из документации.
pub const BASE_FREQUENCY: u32 = 1_193_182;

/// Регистр команды.
pub const COMMAND_WORD_REGISTER: u16 = 0x43;

/// Регистр счётчика номер `0` таймера.
pub const COUNTER_NUMBER_0_REGISTER: u16 = 0x40;

/// Сколько тактов процессора выжидать между обращениями к портам PIT.
pub const SETTLING_CYCLES: u64 = 1_000_000;

/// Запись байтов в
/// [порты ввода--вывода](https://en.wikipedia.org/wiki/Memory-mapped_I/O_and_port-mapped_I/O).
pub trait PortIo {
    /// Записывает байт `value` в порт `port`.
    fn write_u8(
        &mut self,
        port: u16,
        value: u8,
    );
}

/// Устаревший
/// [программируемый таймер](https://en.wikipedia.org/wiki/Programmable_interval_timer)
/// [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253).
pub struct Pit;

impl Pit {
    // ANCHOR: divisor
    /// Делитель базовой частоты [`BASE_FREQUENCY`],
    /// дающий ближайшую к `ticks_per_second` частоту прерываний.
    ///
    /// Возвращает ошибку:
    ///   - [`Error::InvalidArgument`], если `ticks_per_second` равна нулю;
    ///   - [`Error::Int`], если делитель не помещается в 16-битный счётчик таймера.
    pub fn divisor(ticks_per_second: u32) -> Result<u16> {
        if ticks_per_second == 0 {
            return Err(InvalidArgument);
        }

        let divisor = (BASE_FREQUENCY + ticks_per_second / 2) / ticks_per_second;

        Ok(u16::try_from(divisor)?)
    }
    // ANCHOR_END: divisor

    /// Настраивает счётчик номер `0` таймера на периодические прерывания
    /// с частотой `ticks_per_second`.
    /// Между обращениями к портам выжидает [`SETTLING_CYCLES`] тактов `counter`.
    ///
    /// Возвращает записанный делитель.
    pub fn program<P, C>(
        port: &mut P,
        counter: &C,
        ticks_per_second: u32,
    ) -> Result<u16>
    where
        P: PortIo + ?Sized,
        C: CycleCounter + ?Sized,
    {
        let divisor = Self::divisor(ticks_per_second)?;
        let [low, high] = divisor.to_le_bytes();

        port.write_u8(COMMAND_WORD_REGISTER, Self::command_word().bits());
        counter.settle(SETTLING_CYCLES);

        port.write_u8(COUNTER_NUMBER_0_REGISTER, low);
        counter.settle(SETTLING_CYCLES);

        port.write_u8(COUNTER_NUMBER_0_REGISTER, high);

        Ok(divisor)
    }

    /// Команда: счётчик `0`, сначала младший байт делителя, затем старший,
    /// режим делителя частоты, двоичный счёт.
    fn command_word() -> CommandWord {
        !CommandWord::BINARY_CODED_DECIMAL &
            (CommandWord::COUNTER_NUMBER_0 |
                CommandWord::LSB_THAN_MSB |
                CommandWord::RATE_GENERATOR)
    }
}

bitflags! {
    /// Параметры настроек таймера
    /// [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct CommandWord: u8 {
        /// Выбрать счётчик номер `0` таймера.
        const COUNTER_NUMBER_0 = 0b_00 << 6;

        /// Первым передаётся младший байт делителя, затем старший.
        const LSB_THAN_MSB = 0b_11 << 4;

        /// Режим номер `2` --- делитель частоты.
        const RATE_GENERATOR = 0b_010 << 1;

        /// Использовать
        /// [двоично--десятичный](https://en.wikipedia.org/wiki/Binary-coded_decimal)
        /// формат.
        const BINARY_CODED_DECIMAL = 0b_1 << 0;
    }
}
