//! Документ обмена `1CClientBankExchange`.
//!
//! Упрощённый диалект формата обмена 1С с клиент-банком:
//! текст из строк `Имя=Значение`, в котором ровно один платёжный документ.
//!
//! # Формат
//!
//! ```text
//! 1CClientBankExchange
//! ВерсияФормата=1.02
//! Кодировка=Windows
//! Отправитель=modulbank_rust
//! ДатаСоздания=01.04.2016
//! ВремяСоздания=09:03:07
//! ДатаНачала=01.04.2016
//! ДатаКонца=01.04.2016
//! РасчСчет=40802810670010011008
//! СекцияДокумент=Платежное поручение
//! Номер=994720
//! ...
//! КонецДокумента
//! КонецФайла
//! ```
//!
//! Кодировщик работает только на запись; разбор формата не поддерживается.

mod error;
mod ser;
pub mod section;
pub mod value;

use std::fmt;
use std::io::Write;

use chrono::{Local, NaiveDateTime};
pub use error::{Error, Result};
pub use section::{BalancesSection, FilterSection, GeneralSection, PaymentSection, Section};
pub use value::{FieldValue, format_amount};

/// Первая строка файла обмена.
pub const HEADER: &str = "1CClientBankExchange";
/// Строка, открывающая секцию платёжного документа.
pub const DOCUMENT_START: &str = "СекцияДокумент=Платежное поручение";
/// Строка, закрывающая секцию платёжного документа.
pub const DOCUMENT_END: &str = "КонецДокумента";
/// Завершающий маркер файла (без перевода строки после него).
pub const FOOTER: &str = "КонецФайла";

/// Файл обмена с одним платёжным поручением.
///
/// Создаётся заново для каждой отправки, заполняется, печатается и
/// выбрасывается. Внутренней синхронизации нет: экземпляр не предназначен
/// для изменения из нескольких потоков.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientBankExchange {
    /// Общие сведения.
    pub general: GeneralSection,
    /// Условия отбора.
    pub filter: FilterSection,
    /// Остатки по счёту.
    pub balances: BalancesSection,
    /// Платёжное поручение.
    pub payment: PaymentSection,
}

impl ClientBankExchange {
    /// Создаёт документ, датированный текущим локальным временем.
    pub fn new() -> Self {
        Self::created_at(Local::now().naive_local())
    }

    /// Создаёт документ с заданным моментом создания.
    ///
    /// Интервал отбора по умолчанию: один день `created.date()`.
    pub fn created_at(created: NaiveDateTime) -> Self {
        Self {
            general: GeneralSection::new(created),
            filter: FilterSection::new(created.date()),
            balances: BalancesSection::default(),
            payment: PaymentSection::default(),
        }
    }

    /// Печатает документ целиком.
    ///
    /// # Ошибки
    ///
    /// Возвращает [`Error::Format`], если значение какого-либо поля нельзя
    /// записать в формате обмена.
    ///
    /// # Пример
    ///
    /// ```
    /// use modulbank::exchange::ClientBankExchange;
    ///
    /// let text = ClientBankExchange::new().render().unwrap();
    /// assert!(text.starts_with("1CClientBankExchange\n"));
    /// assert!(text.ends_with("КонецДокумента\nКонецФайла"));
    /// ```
    pub fn render(&self) -> Result<String> {
        let mut text = String::new();
        text.push_str(HEADER);
        text.push('\n');
        text.push_str(&self.general.render()?);
        text.push_str(&self.filter.render()?);
        text.push_str(&self.balances.render()?);
        text.push_str(DOCUMENT_START);
        text.push('\n');
        text.push_str(&self.payment.render()?);
        text.push_str(DOCUMENT_END);
        text.push('\n');
        text.push_str(FOOTER);
        Ok(text)
    }

    /// Записывает документ в любой приёмник, реализующий [`Write`].
    ///
    /// Документ сначала печатается целиком, поэтому при ошибке формата в
    /// приёмник ничего не попадает.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let text = self.render()?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }
}

impl Default for ClientBankExchange {
    fn default() -> Self {
        Self::new()
    }
}

/// Отладочный вывод: каждая секция под своим названием, все объявленные
/// поля, включая пустые.
impl fmt::Display for ClientBankExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, &self.general)?;
        write_section(f, &self.filter)?;
        write_section(f, &self.balances)?;
        write_section(f, &self.payment)
    }
}

fn write_section<S: Section>(f: &mut fmt::Formatter<'_>, section: &S) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}: ", S::TITLE)?;
    match section.fields() {
        Ok(fields) => {
            for (name, value) in fields {
                writeln!(f, "\t{name}: {}", value.as_deref().unwrap_or("None"))?;
            }
            Ok(())
        }
        Err(err) => writeln!(f, "\t<{err}>"),
    }
}
