//! # e2e-tests - End-to-end тесты CLI `modulbank`
//!
//! Тесты не ходят в сеть: проверяются офлайн-команды (`draft --dry-run`,
//! `verify-notify`) и обработка ошибок настройки и соединения.
//!
//! ## Фикстуры
//!
//! Тестовые файлы расположены в `fixtures/`:
//! - `order.json`: платёжное поручение
//! - `order_multiline.json`: поручение с переводом строки в назначении
//! - `notify.json`: уведомление о новой операции с подписью

use std::path::PathBuf;

/// Получить путь к директории фикстур.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Получить путь к фикстуре по имени файла.
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}
