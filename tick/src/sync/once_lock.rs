use core::{
    cell::UnsafeCell,
    mem::MaybeUninit,
    sync::atomic::{
        AtomicU8,
        Ordering,
    },
};

use crate::error::{
    Error::InvalidArgument,
    Result,
};

// Used in docs.
#[allow(unused)]
use crate::error::Error;

/// Аналогично [std::sync::OnceLock](https://doc.rust-lang.org/std/sync/struct.OnceLock.html)
/// реализует примитив синхронизации для данных, которые один раз записываются, а потом только читаются.
///
/// Используется, например, для регистрации внешних обработчиков,
/// которые становятся известны только во время загрузки системы.
pub struct OnceLock<T> {
    /// Защищаемые данные.
    data: UnsafeCell<MaybeUninit<T>>,

    /// Состояние данных: [`EMPTY`], [`WRITING`] или [`INITIALIZED`].
    state: AtomicU8,
}

impl<T> OnceLock<T> {
    /// Создаёт неинициализированный [`OnceLock`].
    pub const fn new() -> Self {
        Self {
            data: UnsafeCell::new(MaybeUninit::uninit()),
            state: AtomicU8::new(EMPTY),
        }
    }

    /// Возвращает ссылку на сохранённые данные или [`None`],
    /// если запись ещё не завершилась.
    pub fn get(&self) -> Option<&T> {
        if self.is_initialized() {
            Some(unsafe { (*self.data.get()).assume_init_ref() })
        } else {
            None
        }
    }

    /// Записывает данные и возвращает [`Ok`], если это первая попытка записи.
    ///
    /// Возвращает [`Error::InvalidArgument`] и не трогает данные,
    /// если попытка записи не первая.
    /// В этом случае [`OnceLock::set()`] может вернуться до того,
    /// как данные будут инициализированы конкурирующей записью.
    pub fn set(
        &self,
        value: T,
    ) -> Result<()> {
        if self
            .state
            .compare_exchange(EMPTY, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(InvalidArgument);
        }

        unsafe {
            (*self.data.get()).write(value);
        }

        self.state.store(INITIALIZED, Ordering::Release);

        Ok(())
    }

    /// Возвращает `true`, если значение уже инициализировано.
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == INITIALIZED
    }
}

impl<T> Default for OnceLock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for OnceLock<T> {
    fn drop(&mut self) {
        if *self.state.get_mut() == INITIALIZED {
            unsafe {
                self.data.get_mut().assume_init_drop();
            }
        }
    }
}

/// См. [The Rustonomicon, "Send and Sync"](https://doc.rust-lang.org/nomicon/send-and-sync.html).
unsafe impl<T: Send> Send for OnceLock<T> {
}

/// См. [The Rustonomicon, "Send and Sync"](https://doc.rust-lang.org/nomicon/send-and-sync.html).
unsafe impl<T: Send + Sync> Sync for OnceLock<T> {
}

/// Данные ещё не записывались.
const EMPTY: u8 = 0;

/// Данные записываются.
const WRITING: u8 = 1;

/// Данные записаны и доступны на чтение.
const INITIALIZED: u8 = 2;
