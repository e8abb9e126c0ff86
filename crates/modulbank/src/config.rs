//! Настройки клиента.

use std::env;

use thiserror::Error;

use crate::search::MAX_PAGE_SIZE;

/// Адрес API по умолчанию.
pub const DEFAULT_API_URL: &str = "https://api.modulbank.ru/v1/";

/// Переменная окружения с токеном.
pub const ENV_TOKEN: &str = "MODULBANK_TOKEN";
/// Переменная окружения, включающая режим песочницы.
pub const ENV_SANDBOX: &str = "MODULBANK_SANDBOX";
/// Переменная окружения с размером страницы операций.
pub const ENV_PAGE_SIZE: &str = "MODULBANK_PAGE_SIZE";
/// Переменная окружения с адресом API.
pub const ENV_API_URL: &str = "MODULBANK_API_URL";

/// Ошибки настройки клиента.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MODULBANK_TOKEN is not set")]
    MissingToken,

    #[error("page size exceeds the limit of 50: {0}")]
    PageSizeTooLarge(u32),

    #[error("invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Параметры подключения к API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    token: String,
    sandbox: bool,
    page_size: u32,
    base_url: String,
}

impl ClientConfig {
    /// Боевой режим, страница из 50 операций, адрес по умолчанию.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            sandbox: false,
            page_size: MAX_PAGE_SIZE,
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Задаёт размер страницы операций.
    ///
    /// # Ошибки
    ///
    /// [`ConfigError::PageSizeTooLarge`], если `page_size > 50`.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self, ConfigError> {
        if page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSizeTooLarge(page_size));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Задаёт адрес API. Завершающий `/` добавляется при необходимости.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Читает настройки из переменных окружения `MODULBANK_*`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(ENV_TOKEN)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let mut config = Self::new(token);

        if let Some(value) = lookup(ENV_SANDBOX) {
            config.sandbox = parse_flag(&value).ok_or(invalid(ENV_SANDBOX, value))?;
        }
        if let Some(value) = lookup(ENV_PAGE_SIZE) {
            let page_size = value.parse().map_err(|_| invalid(ENV_PAGE_SIZE, value))?;
            config = config.with_page_size(page_size)?;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        Ok(config)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Токен не попадает в отладочный вывод и логи
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"…")
            .field("sandbox", &self.sandbox)
            .field("page_size", &self.page_size)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn invalid(var: &'static str, value: String) -> ConfigError {
    ConfigError::InvalidValue { var, value }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
