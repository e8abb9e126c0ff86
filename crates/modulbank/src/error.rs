//! Ошибки клиента API.

use thiserror::Error;

use crate::exchange;

/// Ошибки обращения к API МодульБанка.
#[derive(Debug, Error)]
pub enum ModulbankError {
    /// Сервер ответил 401: токен неверен или отозван.
    #[error("not authorized")]
    NotAuthorized,

    /// Статус ответа отличается от ожидаемого 200.
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(u16),

    /// Тело ответа не удалось разобрать.
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),

    /// Не удалось преобразовать полученное значение.
    #[error("unexpected value: {0}")]
    UnexpectedValue(String),

    /// Документ обмена не удалось напечатать.
    #[error("exchange document error: {0}")]
    Exchange(#[from] exchange::Error),

    /// Ошибка транспорта (сеть, TLS, тайм-аут).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Результат операций клиента.
pub type Result<T> = std::result::Result<T, ModulbankError>;
