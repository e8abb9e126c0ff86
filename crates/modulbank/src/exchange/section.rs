//! Секции документа обмена.
//!
//! Каждая секция описывается обычной структурой с типизированными необязательными полями.
//! Порядок объявления полей совпадает с порядком полей в формате, а список
//! [`Section::MANDATORY`] задаёт поля, которые печатаются всегда.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::Result;
use super::ser::{self, Fields};
use super::value;

/// Версия формата обмена.
pub const FORMAT_VERSION: &str = "1.02";
/// Метка кодировки.
pub const ENCODING: &str = "Windows";
/// Программа-отправитель.
pub const SENDER: &str = "modulbank_rust";

/// Общее поведение секций документа обмена.
pub trait Section: Serialize {
    /// Название секции для отладочного вывода документа.
    const TITLE: &'static str;

    /// Обязательные поля в порядке печати.
    const MANDATORY: &'static [&'static str];

    /// Печатает секцию строками `Имя=Значение\n`.
    fn render(&self) -> Result<String> {
        ser::to_string(self, Self::MANDATORY)
    }

    /// Все объявленные поля секции, `None` для незаполненных.
    fn fields(&self) -> Result<Fields> {
        ser::to_fields(self)
    }
}

/// Секция «Общие сведения».
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralSection {
    #[serde(rename = "ВерсияФормата")]
    pub format_version: Option<String>,
    #[serde(rename = "Кодировка")]
    pub encoding: Option<String>,
    #[serde(rename = "Отправитель")]
    pub sender: Option<String>,
    #[serde(rename = "Получатель")]
    pub recipient: Option<String>,
    #[serde(rename = "ДатаСоздания", serialize_with = "value::date")]
    pub created_date: Option<NaiveDate>,
    #[serde(rename = "ВремяСоздания", serialize_with = "value::time")]
    pub created_time: Option<NaiveTime>,
}

impl GeneralSection {
    /// Создаёт секцию с версией формата, кодировкой, отправителем и моментом создания.
    ///
    /// Момент создания записывается как есть, без перевода в другой часовой пояс.
    pub fn new(created: NaiveDateTime) -> Self {
        Self {
            format_version: Some(FORMAT_VERSION.to_string()),
            encoding: Some(ENCODING.to_string()),
            sender: Some(SENDER.to_string()),
            recipient: None,
            created_date: Some(created.date()),
            created_time: Some(created.time()),
        }
    }
}

impl Section for GeneralSection {
    const TITLE: &'static str = "ОбщиеСведения";
    const MANDATORY: &'static [&'static str] = &["ВерсияФормата", "Кодировка", "Отправитель"];
}

/// Секция «Условия отбора».
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSection {
    #[serde(rename = "ДатаНачала", serialize_with = "value::date")]
    pub date_from: Option<NaiveDate>,
    #[serde(rename = "ДатаКонца", serialize_with = "value::date")]
    pub date_till: Option<NaiveDate>,
    #[serde(rename = "РасчСчет")]
    pub account: Option<String>,
    #[serde(rename = "Документ")]
    pub document: Option<String>,
}

impl FilterSection {
    /// Создаёт секцию с интервалом отбора в один день.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date_from: Some(today),
            date_till: Some(today),
            ..Self::default()
        }
    }
}

impl Section for FilterSection {
    const TITLE: &'static str = "УсловияОтбора";
    const MANDATORY: &'static [&'static str] = &["ДатаНачала", "ДатаКонца", "РасчСчет"];
}

/// Секция остатков по расчётному счёту.
///
/// Используется при сверке выписок; черновик платёжки её не заполняет.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalancesSection {
    #[serde(rename = "ДатаНачала", serialize_with = "value::date")]
    pub date_from: Option<NaiveDate>,
    #[serde(rename = "ДатаКонца", serialize_with = "value::date")]
    pub date_till: Option<NaiveDate>,
    #[serde(rename = "РасчСчет")]
    pub account: Option<String>,
    #[serde(rename = "НачальныйОстаток", serialize_with = "value::amount")]
    pub opening_balance: Option<Decimal>,
    #[serde(rename = "ВсегоПоступило", serialize_with = "value::amount")]
    pub total_credited: Option<Decimal>,
    #[serde(rename = "ВсегоСписано", serialize_with = "value::amount")]
    pub total_debited: Option<Decimal>,
    #[serde(rename = "КонечныйОстаток", serialize_with = "value::amount")]
    pub closing_balance: Option<Decimal>,
}

impl Section for BalancesSection {
    const TITLE: &'static str = "СекцияОстатков";
    const MANDATORY: &'static [&'static str] = &[];
}

/// Секция платёжного документа (платёжное поручение).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentSection {
    #[serde(rename = "Номер")]
    pub number: Option<String>,
    #[serde(rename = "Дата", serialize_with = "value::date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "Сумма", serialize_with = "value::amount")]
    pub amount: Option<Decimal>,
    #[serde(rename = "КвитанцияДата", serialize_with = "value::date")]
    pub receipt_date: Option<NaiveDate>,
    #[serde(rename = "КвитанцияВремя", serialize_with = "value::time")]
    pub receipt_time: Option<NaiveTime>,
    #[serde(rename = "КвитанцияСодержание")]
    pub receipt_content: Option<String>,
    #[serde(rename = "ПлательщикСчет")]
    pub payer_account: Option<String>,
    #[serde(rename = "ДатаСписано", serialize_with = "value::date")]
    pub debited_date: Option<NaiveDate>,
    #[serde(rename = "Плательщик")]
    pub payer: Option<String>,
    #[serde(rename = "ПлательщикИНН")]
    pub payer_inn: Option<String>,
    #[serde(rename = "Плательщик1")]
    pub payer1: Option<String>,
    #[serde(rename = "Плательщик2")]
    pub payer2: Option<String>,
    #[serde(rename = "Плательщик3")]
    pub payer3: Option<String>,
    #[serde(rename = "Плательщик4")]
    pub payer4: Option<String>,
    #[serde(rename = "ПлательщикРасчСчет")]
    pub payer_settlement_account: Option<String>,
    #[serde(rename = "ПлательщикБанк1")]
    pub payer_bank1: Option<String>,
    #[serde(rename = "ПлательщикБанк2")]
    pub payer_bank2: Option<String>,
    #[serde(rename = "ПлательщикБИК")]
    pub payer_bic: Option<String>,
    #[serde(rename = "ПлательщикКорсчет")]
    pub payer_corr_account: Option<String>,
    #[serde(rename = "ПолучательСчет")]
    pub recipient_account: Option<String>,
    #[serde(rename = "ДатаПоступило", serialize_with = "value::date")]
    pub credited_date: Option<NaiveDate>,
    #[serde(rename = "Получатель")]
    pub recipient: Option<String>,
    #[serde(rename = "ПолучательИНН")]
    pub recipient_inn: Option<String>,
    #[serde(rename = "Получатель1")]
    pub recipient1: Option<String>,
    #[serde(rename = "Получатель2")]
    pub recipient2: Option<String>,
    #[serde(rename = "Получатель3")]
    pub recipient3: Option<String>,
    #[serde(rename = "Получатель4")]
    pub recipient4: Option<String>,
    #[serde(rename = "ПолучательРасчСчет")]
    pub recipient_settlement_account: Option<String>,
    #[serde(rename = "ПолучательБанк1")]
    pub recipient_bank1: Option<String>,
    #[serde(rename = "ПолучательБанк2")]
    pub recipient_bank2: Option<String>,
    #[serde(rename = "ПолучательБИК")]
    pub recipient_bic: Option<String>,
    #[serde(rename = "ПолучательКорсчет")]
    pub recipient_corr_account: Option<String>,
    #[serde(rename = "ВидПлатежа")]
    pub payment_kind: Option<String>,
    #[serde(rename = "ВидОплаты")]
    pub operation_type: Option<String>,
    #[serde(rename = "Код")]
    pub code: Option<String>,
    #[serde(rename = "НазначениеПлатежа")]
    pub purpose: Option<String>,
    #[serde(rename = "НазначениеПлатежа1")]
    pub purpose1: Option<String>,
    #[serde(rename = "НазначениеПлатежа2")]
    pub purpose2: Option<String>,
    #[serde(rename = "НазначениеПлатежа3")]
    pub purpose3: Option<String>,
    #[serde(rename = "НазначениеПлатежа4")]
    pub purpose4: Option<String>,
    #[serde(rename = "НазначениеПлатежа5")]
    pub purpose5: Option<String>,
    #[serde(rename = "НазначениеПлатежа6")]
    pub purpose6: Option<String>,
    #[serde(rename = "СтатусСоставителя")]
    pub compiler_status: Option<String>,
    #[serde(rename = "ПлательщикКПП")]
    pub payer_kpp: Option<String>,
    #[serde(rename = "ПолучательКПП")]
    pub recipient_kpp: Option<String>,
    #[serde(rename = "ПоказательКБК")]
    pub kbk: Option<String>,
    #[serde(rename = "ОКАТО")]
    pub okato: Option<String>,
    #[serde(rename = "ПоказательОснования")]
    pub basis_indicator: Option<String>,
    #[serde(rename = "ПоказательПериода")]
    pub period_indicator: Option<String>,
    #[serde(rename = "ПоказательНомера")]
    pub number_indicator: Option<String>,
    #[serde(rename = "ПоказательДаты")]
    pub date_indicator: Option<String>,
    #[serde(rename = "ПоказательТипа")]
    pub type_indicator: Option<String>,
    #[serde(rename = "Очередность")]
    pub priority: Option<String>,
    #[serde(rename = "СрокАкцепта")]
    pub acceptance_term: Option<String>,
    #[serde(rename = "ВидАккредитива")]
    pub letter_of_credit_kind: Option<String>,
    #[serde(rename = "СрокПлатежа", serialize_with = "value::date")]
    pub payment_term: Option<NaiveDate>,
    #[serde(rename = "УсловиеОплаты1")]
    pub payment_condition1: Option<String>,
    #[serde(rename = "УсловиеОплаты2")]
    pub payment_condition2: Option<String>,
    #[serde(rename = "УсловиеОплаты3")]
    pub payment_condition3: Option<String>,
    #[serde(rename = "ПлатежПоПредст")]
    pub payment_on_presentation: Option<String>,
    #[serde(rename = "ДополнУсловия")]
    pub extra_conditions: Option<String>,
    #[serde(rename = "НомерСчетаПоставщика")]
    pub supplier_account_number: Option<String>,
    #[serde(rename = "ДатаОтсылкиДок", serialize_with = "value::date")]
    pub documents_sent_date: Option<NaiveDate>,
}

impl Section for PaymentSection {
    const TITLE: &'static str = "СекцияПлатежногоДокумента";
    const MANDATORY: &'static [&'static str] = &[
        "Номер",
        "Дата",
        "Сумма",
        "ПлательщикСчет",
        "Плательщик",
        "ПлательщикИНН",
        "Плательщик1",
        "ПлательщикРасчСчет",
        "ПлательщикБанк1",
        "ПлательщикБИК",
        "ПлательщикКорсчет",
        "ПолучательСчет",
        "Получатель",
        "ПолучательИНН",
        "Получатель1",
        "ПолучательРасчСчет",
        "ПолучательБанк1",
        "ПолучательБИК",
        "ПолучательКорсчет",
        "ВидОплаты",
        "ВидПлатежа",
        "СтатусСоставителя",
        "ПлательщикКПП",
        "ПолучательКПП",
        "ПоказательКБК",
        "ОКАТО",
        "ПоказательОснования",
        "ПоказательПериода",
        "ПоказательНомера",
        "ПоказательДаты",
    ];
}
