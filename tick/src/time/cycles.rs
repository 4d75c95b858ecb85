use core::{
    hint,
    sync::atomic::{
        self,
        Ordering,
    },
};

/// [Счётчик тактов процессора](https://en.wikipedia.org/wiki/Time_Stamp_Counter).
///
/// Монотонно возрастает на каждом процессоре,
/// но показания разных процессоров не обязаны совпадать с точностью до микросекунды.
pub trait CycleCounter {
    /// Читает счётчик тактов.
    /// Процессор может переупорядочить чтение относительно соседних инструкций.
    fn read(&self) -> u64;

    /// Читает счётчик тактов так, что ни одна последующая инструкция
    /// не начнёт выполняться раньше чтения.
    ///
    /// Вызывается только если [`CycleCounter::has_serializing_read()`] вернул `true`.
    fn read_serializing(&self) -> u64;

    /// Возвращает `true`, если процессор умеет сериализующее чтение счётчика тактов.
    fn has_serializing_read(&self) -> bool;

    // ANCHOR: now
    /// Возвращает номер текущего такта процессора.
    ///
    /// Предпочитает сериализующее чтение.
    /// Если процессор его не поддерживает, молча переходит на обычное ---
    /// это не ошибка, а отсутствующая возможность оборудования.
    #[inline]
    fn now(&self) -> u64 {
        if self.has_serializing_read() {
            self.read_serializing()
        } else {
            self.read()
        }
    }
    // ANCHOR_END: now

    /// Задержка для соблюдения временны́х требований оборудования:
    /// активно ждёт, пока счётчик тактов не продвинется на `cycles`.
    ///
    /// Не уступает процессор планировщику --- на этапе инициализации
    /// планировать ещё нечего.
    fn settle(
        &self,
        cycles: u64,
    ) {
        let start = self.read();
        atomic::fence(Ordering::SeqCst);

        while self.read().wrapping_sub(start) < cycles {
            hint::spin_loop();
        }
    }
}

impl<T: CycleCounter + ?Sized> CycleCounter for &T {
    fn read(&self) -> u64 {
        (**self).read()
    }

    fn read_serializing(&self) -> u64 {
        (**self).read_serializing()
    }

    fn has_serializing_read(&self) -> bool {
        (**self).has_serializing_read()
    }
}
