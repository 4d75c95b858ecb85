use core::{
    arch::x86_64,
    sync::atomic::{
        AtomicU8,
        Ordering,
    },
};

use x86::cpuid::CpuId;

use tick::{
    CycleCounter,
    log::debug,
};

/// [Счётчик тактов процессора](https://en.wikipedia.org/wiki/Time_Stamp_Counter)
/// архитектуры x86-64.
///
/// Наличие сериализующей инструкции
/// [`rdtscp`](https://www.felixcloutier.com/x86/rdtscp)
/// проверяется через `cpuid` один раз, при первом обращении.
#[derive(Debug, Default)]
pub struct Tsc {
    /// Закешированный результат проверки наличия `rdtscp`:
    /// [`UNKNOWN`], [`ABSENT`] или [`PRESENT`].
    rdtscp: AtomicU8,
}

impl Tsc {
    /// Создаёт [`Tsc`] с ещё не выполненной проверкой наличия `rdtscp`.
    pub const fn new() -> Self {
        Self {
            rdtscp: AtomicU8::new(UNKNOWN),
        }
    }

    /// Спрашивает у `cpuid`, есть ли у процессора инструкция `rdtscp`.
    fn probe() -> bool {
        let has_rdtscp = CpuId::new()
            .get_extended_processor_and_feature_identifiers()
            .is_some_and(|features| features.has_rdtscp());

        if !has_rdtscp {
            debug!("rdtscp is not supported, falling back to rdtsc");
        }

        has_rdtscp
    }
}

impl CycleCounter for Tsc {
    #[inline(always)]
    fn read(&self) -> u64 {
        unsafe { x86_64::_rdtsc() }
    }

    #[inline(always)]
    fn read_serializing(&self) -> u64 {
        let mut processor_id = 0;
        unsafe { x86_64::__rdtscp(&mut processor_id) }
    }

    fn has_serializing_read(&self) -> bool {
        match self.rdtscp.load(Ordering::Relaxed) {
            ABSENT => false,
            PRESENT => true,
            _ => {
                // Concurrent probes store the same answer.
                let has_rdtscp = Self::probe();
                let state = if has_rdtscp { PRESENT } else { ABSENT };
                self.rdtscp.store(state, Ordering::Relaxed);
                has_rdtscp
            },
        }
    }
}

/// Наличие `rdtscp` ещё не проверялось.
const UNKNOWN: u8 = 0;

/// Процессор не поддерживает `rdtscp`.
const ABSENT: u8 = 1;

/// Процессор поддерживает `rdtscp`.
const PRESENT: u8 = 2;
