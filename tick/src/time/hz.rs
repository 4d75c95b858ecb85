use core::{
    fmt::{
        Display,
        Formatter,
        Result,
    },
    num::NonZeroU64,
};

use number_prefix::NumberPrefix;

use super::USECS_PER_SEC;

/// Вспомогательная структура для форматирования
/// [частоты](https://en.wikipedia.org/wiki/Hertz)
/// при журналировании.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub struct Hz(NonZeroU64);

impl Hz {
    /// Возвращает [`Some`] для ненулевой частоты
    /// `hz` [Герц](https://en.wikipedia.org/wiki/Hertz).
    pub fn new(hz: u64) -> Option<Self> {
        NonZeroU64::new(hz).map(Hz)
    }

    /// Возвращает [`Some`] для ненулевой частоты `mhz`, заданной в мегагерцах ---
    /// то есть в тактах за микросекунду.
    pub fn from_mhz(mhz: u32) -> Option<Self> {
        Self::new(u64::from(mhz) * USECS_PER_SEC)
    }

    /// Возвращает содержащееся значение частоты в
    /// [Герцах](https://en.wikipedia.org/wiki/Hertz).
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl Display for Hz {
    fn fmt(
        &self,
        formatter: &mut Formatter,
    ) -> Result {
        let hz = self.get();
        match NumberPrefix::decimal(hz as f64) {
            NumberPrefix::Standalone(_) => {
                write!(formatter, "{hz} Hz")
            },
            NumberPrefix::Prefixed(prefix, value) => {
                write!(formatter, "{value:.3} {}Hz", prefix.symbol())
            },
        }
    }
}

#[cfg(test)]
mod test {
    use alloc::string::ToString;

    use super::Hz;

    #[test]
    fn display() {
        assert_eq!(Hz::new(0), None);
        assert_eq!(Hz::new(100).unwrap().to_string(), "100 Hz");
        assert_eq!(Hz::new(1_193_182).unwrap().to_string(), "1.193 MHz");
        assert_eq!(Hz::from_mhz(2_400).unwrap().to_string(), "2.400 GHz");
    }
}
