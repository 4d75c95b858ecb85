use x86_64::VirtAddr;

/// Структура [`Cpu`], через которую часы узнают о текущем процессоре.
mod cpu;

pub use cpu::{
    Cpu,
    ID_REGISTER,
};

/// Сведения о процессорах системы.
pub(crate) static CPU: Cpu = Cpu::new();

/// Сообщает часам адрес `local_apic`, по которому отображены регистры local APIC.
/// Вызывается на загрузочном процессоре до [`crate::time::timer_init()`]
/// и до запуска остальных процессоров.
///
/// # Safety
///
/// См. [`Cpu::set_local_apic()`].
pub unsafe fn set_local_apic(local_apic: VirtAddr) {
    unsafe {
        CPU.set_local_apic(local_apic);
    }
}
