use core::{
    fmt,
    num::TryFromIntError,
    result,
};

/// Перечисление для возможных ошибок.
///
/// Сами операции со временем не завершаются ошибкой.
/// Ошибки возникают только при неверной конфигурации ---
/// например, при недопустимой частоте тиков.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// Заданное целое значение не помещается в указанный тип.
    Int(TryFromIntError),

    /// Задано недопустимое значение аргумента.
    InvalidArgument,
}

impl fmt::Display for Error {
    fn fmt(
        &self,
        formatter: &mut fmt::Formatter,
    ) -> fmt::Result {
        match self {
            Error::Int(e) => write!(formatter, "integer conversion failed: {e}"),
            Error::InvalidArgument => write!(formatter, "invalid argument"),
        }
    }
}

impl From<TryFromIntError> for Error {
    fn from(e: TryFromIntError) -> Self {
        Error::Int(e)
    }
}

/// Тип возвращаемого результата `T` или ошибки [`Error`] ---
/// мономорфизация [`result::Result`] по типу ошибки.
pub type Result<T> = result::Result<T, Error>;
