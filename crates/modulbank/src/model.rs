//! Сущности API МодульБанка: компании, счета, операции.
//!
//! Все типы разбираются из JSON-ответов сервера через `serde`. Неизвестные
//! значения перечислений приводят к ошибке разбора.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModulbankError;
use crate::payment::{BankShort, Contractor, kpp_or_placeholder};

/// Формат отметок времени в ответах API.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

mod datetime {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, de};

    use super::DATETIME_FORMAT;

    pub fn parse<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
            .map(Some)
            .map_err(de::Error::custom)
    }

    pub fn parse_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Ok(parse(deserializer)?.map(|moment| moment.date()))
    }
}

/// Отображение `Option` как в отладочном выводе сервера: `None` для пустого.
struct Opt<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Opt<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("None"),
        }
    }
}

fn unexpected_value(value: &str, type_name: &str) -> ModulbankError {
    ModulbankError::UnexpectedValue(format!("{value} as {type_name}"))
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Возвращает значение в том виде, в каком его передаёт API.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ModulbankError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    _ => Err(unexpected_value(s, stringify!($name))),
                }
            }
        }
    };
}

string_enum! {
    /// Тип счёта.
    AccountCategory {
        /// Расчётный счёт.
        CheckingAccount,
        /// Депозитный счёт.
        DepositAccount,
        /// Карточный счёт.
        CardAccount,
        /// Депозит с процентной ставкой.
        DepositRateAccount,
        /// Резервирование.
        ReservationAccounting,
    }
}

string_enum! {
    /// Валюта счёта.
    Currency {
        RUR,
        USD,
        EUR,
        CNY,
    }
}

string_enum! {
    /// Состояние счёта.
    AccountStatus {
        /// Открыт.
        New,
        /// Удалён.
        Deleted,
        /// Закрыт.
        Closed,
        /// Заморожен.
        Freezed,
        /// В процессе закрытия.
        ToClosed,
        /// В процессе открытия.
        ToOpen,
    }
}

string_enum! {
    /// Состояние операции.
    OperationStatus {
        /// Отправлена в банк.
        SendToBank,
        /// Исполнена.
        Executed,
        /// Отклонена банком.
        RejectByBank,
        /// Отменена.
        Canceled,
        /// Входящая операция получена.
        Received,
    }
}

string_enum! {
    /// Направление платежа.
    OperationCategory {
        /// Входящий.
        Debet,
        /// Исходящий.
        Credit,
    }
}

/// Компания, в которой состоит пользователь.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub company_id: String,
    #[serde(rename = "companyName", default)]
    pub name: String,
    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Company name={} id={}>", self.name, self.company_id)
    }
}

/// Банк, в котором открыт счёт.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Bank {
    #[serde(rename = "bankBic")]
    pub bic: Option<String>,
    #[serde(rename = "bankInn")]
    pub inn: Option<String>,
    #[serde(rename = "bankKpp")]
    pub kpp: Option<String>,
    #[serde(rename = "bankCorrespondentAccount")]
    pub corr_account: Option<String>,
    #[serde(rename = "bankName")]
    pub name: Option<String>,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Bank БИК={} ИНН={} КПП={} name={} к/сч={}>",
            Opt(&self.bic),
            Opt(&self.inn),
            Opt(&self.kpp),
            Opt(&self.name),
            Opt(&self.corr_account),
        )
    }
}

/// Счёт компании.
///
/// Реквизиты банка приходят плоскими ключами `bank*` в объекте счёта.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(rename = "id", default)]
    pub account_id: String,
    #[serde(rename = "accountName", default)]
    pub name: String,
    pub balance: Option<Decimal>,
    #[serde(default, deserialize_with = "datetime::parse_date")]
    pub begin_date: Option<NaiveDate>,
    pub category: Option<AccountCategory>,
    pub currency: Option<Currency>,
    #[serde(default)]
    pub number: String,
    pub status: Option<AccountStatus>,
    #[serde(flatten)]
    pub bank: Bank,
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<BankAccount name={} id={} balance={} beginDate={} category={} currency={} \
             number={} status={} bank={}>",
            self.name,
            self.account_id,
            Opt(&self.balance),
            Opt(&self.begin_date),
            Opt(&self.category),
            Opt(&self.currency),
            self.number,
            Opt(&self.status),
            self.bank,
        )
    }
}

/// Бюджетные и налоговые реквизиты операции.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetaryAndTax {
    pub kbk: Option<String>,
    pub oktmo: Option<String>,
    pub payment_basis: Option<String>,
    pub tax_code: Option<String>,
    pub tax_doc_num: Option<String>,
    pub tax_doc_date: Option<String>,
    pub payer_status: Option<String>,
    pub uin: Option<String>,
}

impl BudgetaryAndTax {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for BudgetaryAndTax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<BudgetaryAndTax")?;
        let fields = [
            ("kbk", &self.kbk),
            ("oktmo", &self.oktmo),
            ("payment_basis", &self.payment_basis),
            ("tax_code", &self.tax_code),
            ("tax_doc_num", &self.tax_doc_num),
            ("tax_doc_date", &self.tax_doc_date),
            ("payer_status", &self.payer_status),
            ("uin", &self.uin),
        ];
        for (name, value) in fields {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                write!(f, " {name}={value}")?;
            }
        }
        f.write_str(">")
    }
}

/// Операция по счёту.
///
/// Контрагент собирается из плоских ключей `contragent*`, налоговый блок из
/// ключей `kbk`, `oktmo`, `paymentBasis` и т.д. Каждый из них присутствует,
/// только если в ответе есть хотя бы один соответствующий ключ.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "OperationRecord")]
pub struct Operation {
    pub operation_id: String,
    pub company_id: String,
    pub status: Option<OperationStatus>,
    pub category: Option<OperationCategory>,
    pub currency: Option<Currency>,
    pub amount: Option<Decimal>,
    pub amount_with_commission: Option<Decimal>,
    pub account_number: String,
    pub purpose: String,
    pub executed: Option<NaiveDateTime>,
    pub created: Option<NaiveDateTime>,
    pub doc_number: String,
    pub contractor: Option<Contractor>,
    pub budgetary_and_tax: Option<BudgetaryAndTax>,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Operation operation_id={} company_id={} status={} category={} currency={} amount={} \
             amount_with_commission={} account_number={} purpose={} executed={} created={} \
             doc_number={} contractor:{}",
            self.operation_id,
            self.company_id,
            Opt(&self.status),
            Opt(&self.category),
            Opt(&self.currency),
            Opt(&self.amount),
            Opt(&self.amount_with_commission),
            self.account_number,
            self.purpose,
            Opt(&self.executed),
            Opt(&self.created),
            self.doc_number,
            Opt(&self.contractor),
        )?;
        if let Some(tax) = &self.budgetary_and_tax {
            write!(f, " budgetary_and_tax:{tax}")?;
        }
        f.write_str(">")
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContractorRecord {
    contragent_name: Option<String>,
    contragent_inn: Option<String>,
    contragent_kpp: Option<String>,
    contragent_bank_account_number: Option<String>,
    contragent_bank_name: Option<String>,
    contragent_bank_bic: Option<String>,
}

impl ContractorRecord {
    fn into_contractor(self) -> Option<Contractor> {
        let has_bank = self.contragent_bank_account_number.is_some()
            || self.contragent_bank_name.is_some()
            || self.contragent_bank_bic.is_some();
        let has_any = has_bank
            || self.contragent_name.is_some()
            || self.contragent_inn.is_some()
            || self.contragent_kpp.is_some();
        if !has_any {
            return None;
        }

        // Пустые строки в банковских реквизитах означают отсутствие значения
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        let bank = BankShort {
            account: non_empty(self.contragent_bank_account_number),
            name: non_empty(self.contragent_bank_name),
            bic: non_empty(self.contragent_bank_bic),
            corr_acc: None,
        };
        Some(Contractor {
            name: self.contragent_name.unwrap_or_default(),
            inn: self.contragent_inn.unwrap_or_default(),
            kpp: kpp_or_placeholder(self.contragent_kpp),
            bank,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    company_id: String,
    status: Option<OperationStatus>,
    category: Option<OperationCategory>,
    currency: Option<Currency>,
    amount: Option<Decimal>,
    amount_with_commission: Option<Decimal>,
    #[serde(default)]
    bank_account_number: String,
    #[serde(default)]
    payment_purpose: String,
    #[serde(default, deserialize_with = "datetime::parse")]
    executed: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "datetime::parse")]
    created: Option<NaiveDateTime>,
    #[serde(default)]
    doc_number: String,
    #[serde(flatten)]
    contractor: ContractorRecord,
    #[serde(flatten)]
    tax: BudgetaryAndTax,
}

impl From<OperationRecord> for Operation {
    fn from(record: OperationRecord) -> Self {
        Self {
            operation_id: record.id,
            company_id: record.company_id,
            status: record.status,
            category: record.category,
            currency: record.currency,
            amount: record.amount,
            amount_with_commission: record.amount_with_commission,
            account_number: record.bank_account_number,
            purpose: record.payment_purpose,
            executed: record.executed,
            created: record.created,
            doc_number: record.doc_number,
            contractor: record.contractor.into_contractor(),
            budgetary_and_tax: (!record.tax.is_empty()).then_some(record.tax),
        }
    }
}
