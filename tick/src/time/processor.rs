/// То, что подсистеме времени нужно знать о процессоре, на котором она исполняется.
pub trait Processor {
    /// Номер текущего процессора.
    fn id(&self) -> usize;

    /// Номер загрузочного процессора
    /// ([Bootstrap Processor, BSP](https://wiki.osdev.org/Symmetric_Multiprocessing)).
    /// Только его периодические прерывания продвигают часы.
    fn boot_id(&self) -> usize;

    /// Частота процессора в мегагерцах, то есть в тактах за микросекунду.
    /// Ноль означает, что частота ещё не известна.
    fn frequency(&self) -> u32;

    /// Останавливает процессор до следующего прерывания.
    ///
    /// Не должна запрещать прерывания --- иначе простаивающий процессор не проснётся.
    fn halt(&self);
}

impl<T: Processor + ?Sized> Processor for &T {
    fn id(&self) -> usize {
        (**self).id()
    }

    fn boot_id(&self) -> usize {
        (**self).boot_id()
    }

    fn frequency(&self) -> u32 {
        (**self).frequency()
    }

    fn halt(&self) {
        (**self).halt()
    }
}
