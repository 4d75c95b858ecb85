use core::{
    ptr,
    sync::atomic::{
        AtomicU32,
        AtomicU64,
        AtomicUsize,
        Ordering,
    },
};

use x86_64::{
    VirtAddr,
    instructions,
};

use tick::Processor;

/// Сведения о процессорах системы, нужные часам.
///
/// Номер процессора --- идентификатор его
/// [local APIC](https://wiki.osdev.org/APIC).
/// Пока регистры local APIC не отображены в память,
/// остальные процессоры ещё не запущены,
/// и текущим считается загрузочный процессор.
#[derive(Debug, Default)]
pub struct Cpu {
    /// Номер загрузочного процессора.
    boot_id: AtomicUsize,

    /// Частота процессора в мегагерцах, ноль --- пока не известна.
    frequency: AtomicU32,

    /// Виртуальный адрес регистров local APIC, ноль --- пока не отображены.
    local_apic: AtomicU64,
}

impl Cpu {
    /// Создаёт [`Cpu`] с загрузочным процессором номер `0`, неизвестной частотой и
    /// ещё не отображёнными регистрами local APIC.
    pub const fn new() -> Self {
        Self {
            boot_id: AtomicUsize::new(0),
            frequency: AtomicU32::new(0),
            local_apic: AtomicU64::new(0),
        }
    }

    /// Запоминает номер загрузочного процессора.
    pub fn set_boot_id(
        &self,
        boot_id: usize,
    ) {
        self.boot_id.store(boot_id, Ordering::Relaxed);
    }

    /// Запоминает частоту процессора `mhz` в мегагерцах,
    /// определённую внешним источником, например калибровкой.
    pub fn set_frequency(
        &self,
        mhz: u32,
    ) {
        self.frequency.store(mhz, Ordering::Relaxed);
    }

    /// Запоминает адрес `local_apic`, по которому отображены регистры local APIC.
    ///
    /// # Safety
    ///
    /// По адресу `local_apic` на всё время работы системы должны быть доступны
    /// на чтение регистры local APIC текущего процессора, в том числе регистр
    /// [`ID_REGISTER`].
    pub unsafe fn set_local_apic(
        &self,
        local_apic: VirtAddr,
    ) {
        self.local_apic.store(local_apic.as_u64(), Ordering::Release);
    }
}

impl Processor for Cpu {
    /// Читает идентификатор из регистра local APIC,
    /// <https://www.intel.com/content/dam/www/public/us/en/documents/manuals/64-ia-32-architectures-software-developer-vol-3a-part-1-manual.pdf>,
    /// Chapter 10.4.6 "Local APIC ID".
    #[inline]
    fn id(&self) -> usize {
        let local_apic = self.local_apic.load(Ordering::Acquire);
        if local_apic == 0 {
            return self.boot_id();
        }

        let id_register = VirtAddr::new_truncate(local_apic) + ID_REGISTER;
        let id = unsafe { ptr::read_volatile(id_register.as_ptr::<u32>()) };

        (id >> ID_SHIFT) as usize
    }

    fn boot_id(&self) -> usize {
        self.boot_id.load(Ordering::Relaxed)
    }

    fn frequency(&self) -> u32 {
        self.frequency.load(Ordering::Relaxed)
    }

    fn halt(&self) {
        instructions::hlt();
    }
}

/// Смещение регистра идентификатора относительно начала регистров local APIC.
pub const ID_REGISTER: u64 = 0x20;

/// Идентификатор занимает старшие биты регистра [`ID_REGISTER`].
const ID_SHIFT: u32 = 24;
