use core::{
    fmt,
    ops::{
        Deref,
        DerefMut,
    },
};

/// Спин-блокировка, которая позволяет синхронизировать доступ
/// к защищаемым ею данным из разных потоков исполнения.
///
/// <https://en.wikipedia.org/wiki/Spinlock>
///
/// Для избежания
/// [ложного совместного использования](https://en.wikipedia.org/wiki/False_sharing)
/// выровнена на размер линии кэша.
/// Точнее, на её
/// [удвоенный размер](https://docs.rs/crossbeam/latest/crossbeam/utils/struct.CachePadded.html#size-and-alignment).
///
/// # Examples
///
/// ```rust
/// # use tick::sync::Spinlock;
/// #
/// let spinlock: Spinlock<u64> = Spinlock::new(42);
///
/// {
///     let mut lock = spinlock.lock();
///     *lock += 1;
///
///     // Повторная попытка захвата спин-блокировки обречена на провал.
///     assert!(spinlock.try_lock().is_none());
/// }
///
/// assert_eq!(*spinlock.lock(), 43);
/// ```
#[repr(align(128))]
pub struct Spinlock<T> {
    /// Данные, защищаемые спин-блокировкой.
    data: spin::Mutex<T>,
}

impl<T> Spinlock<T> {
    /// Создаёт новую спин-блокировку для защиты `data`.
    pub const fn new(data: T) -> Self {
        Self {
            data: spin::Mutex::new(data),
        }
    }

    /// Захватывает спин-блокировку.
    /// При этом ожидает в активном цикле освобождения блокировки, если она уже захвачена.
    ///
    /// Возвращает [`SpinlockGuard`], который:
    ///   - Позволяет читать и писать в защищаемые [`Spinlock`] данные
    ///     с помощью типажей [`Deref`] и [`DerefMut`] соответственно.
    ///   - Автоматически освобождает блокировку в реализации типажа [`Drop`].
    pub fn lock(&self) -> SpinlockGuard<'_, T> {
        SpinlockGuard {
            spinlock: self.data.lock(),
        }
    }

    /// Пытается захватить спин-блокировку.
    /// Если она уже захвачена, возвращает [`None`].
    pub fn try_lock(&self) -> Option<SpinlockGuard<'_, T>> {
        Some(SpinlockGuard {
            spinlock: self.data.try_lock()?,
        })
    }

    /// Позволяет читать и писать в защищаемые [`Spinlock`] данные без блокирования в случае,
    /// если вызывающий код эксклюзивно владеет [`Spinlock`] --- `&mut self`.
    pub fn get_mut(&mut self) -> &mut T {
        self.data.get_mut()
    }

    /// Возвращает `true`, если спин-блокировка сейчас захвачена.
    /// Годится только для диагностики --- ответ может устареть сразу же.
    pub fn is_locked(&self) -> bool {
        self.data.is_locked()
    }
}

impl<T: fmt::Debug> fmt::Debug for Spinlock<T> {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(formatter, "{:?}", self.data)
    }
}

impl<T: Default> Default for Spinlock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Spinlock<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Захваченный на запись [`Spinlock`].
///
/// - Позволяет читать и писать в защищаемые [`Spinlock`] данные
///   с помощью типажей [`Deref`] и [`DerefMut`] соответственно.
/// - Автоматически освобождает блокировку в реализации типажа [`Drop`].
pub struct SpinlockGuard<'a, T> {
    /// Захваченный на запись [`spin::Mutex`].
    spinlock: spin::MutexGuard<'a, T>,
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.spinlock.deref()
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.spinlock.deref_mut()
    }
}

impl<T: fmt::Debug> fmt::Debug for SpinlockGuard<'_, T> {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        write!(formatter, "{:?}", self.deref())
    }
}
