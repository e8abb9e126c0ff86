//! Текстовое представление значений полей формата обмена.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer, ser};

/// Типизированное значение поля секции.
///
/// Отсутствующее значение моделируется через `Option::None` на уровне секции
/// и записывается пустой строкой.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Дата, `DD.MM.YYYY`.
    Date(NaiveDate),
    /// Время, `HH:MM:SS`.
    Time(NaiveTime),
    /// Денежная сумма, два знака после точки.
    Amount(Decimal),
    /// Строка без преобразований.
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Возвращает каноническое текстовое представление значения.
    ///
    /// `None` только для суммы, которую нельзя записать с двумя знаками
    /// после точки (см. [`format_amount`]).
    ///
    /// # Пример
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use modulbank::exchange::FieldValue;
    /// use rust_decimal::Decimal;
    ///
    /// let date = NaiveDate::from_ymd_opt(2016, 4, 1).unwrap();
    /// assert_eq!(FieldValue::Date(date).format().as_deref(), Some("01.04.2016"));
    ///
    /// let amount: Decimal = "630170.005".parse().unwrap();
    /// assert_eq!(FieldValue::Amount(amount).format().as_deref(), Some("630170.00"));
    /// ```
    #[must_use]
    pub fn format(&self) -> Option<String> {
        match self {
            Self::Date(date) => Some(date.format("%d.%m.%Y").to_string()),
            Self::Time(time) => Some(time.format("%H:%M:%S").to_string()),
            Self::Amount(amount) => format_amount(*amount),
            Self::Text(text) => Some((*text).to_string()),
        }
    }
}

/// Округляет сумму до копеек по правилу round-half-down и дополняет нулями.
///
/// Середина (`…,xx5`) округляется к нулю: `0.015 → 0.01`, `-1.005 → -1.00`.
/// Всё, что выше середины, округляется как обычно: `0.0151 → 0.02`.
/// Знак отрицательной суммы, округлённой до нуля, сохраняется: `-0.005 → -0.00`.
///
/// Возвращает `None`, если для двух знаков после точки не хватает
/// 28 значащих цифр `Decimal`.
#[must_use]
pub fn format_amount(amount: Decimal) -> Option<String> {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointTowardZero);
    rounded.rescale(2);
    if rounded.scale() != 2 {
        return None;
    }

    let mut text = rounded.to_string();
    if amount.is_sign_negative() && rounded.is_zero() && !text.starts_with('-') {
        text.insert(0, '-');
    }
    Some(text)
}

impl Serialize for FieldValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.format() {
            Some(text) => serializer.serialize_str(&text),
            None => Err(ser::Error::custom("amount out of range")),
        }
    }
}

// Хелперы для `#[serde(serialize_with = ...)]` в секциях.

pub(crate) fn date<S: Serializer>(
    value: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.map(FieldValue::Date).serialize(serializer)
}

pub(crate) fn time<S: Serializer>(
    value: &Option<NaiveTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.map(FieldValue::Time).serialize(serializer)
}

pub(crate) fn amount<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.map(FieldValue::Amount).serialize(serializer)
}
