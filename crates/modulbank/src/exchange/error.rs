//! Ошибки кодирования документа обмена.

use std::{fmt, io};

use serde::ser;
use thiserror::Error;

/// Ошибка формирования документа `1CClientBankExchange`.
#[derive(Debug, Error)]
pub enum Error {
    /// Значение поля нельзя записать строкой `Имя=Значение`.
    #[error("field '{field}' cannot be formatted: {reason}")]
    Format {
        /// Имя поля в формате обмена.
        field: &'static str,
        /// Причина отказа.
        reason: String,
    },

    /// Тип значения не поддерживается форматом обмена.
    ///
    /// Означает дефект в описании секции, а не плохие входные данные.
    #[error("unsupported value type: {0}")]
    UnsupportedType(&'static str),

    /// Секцию можно сериализовать только из структуры.
    #[error("section must be a struct")]
    ExpectedStruct,

    /// Произвольное сообщение от serde.
    #[error("{0}")]
    Message(String),

    /// Ошибка записи в приёмник.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Имя поля для [`Error::Format`].
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Format { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

/// Result для операций кодирования.
pub type Result<T> = std::result::Result<T, Error>;
