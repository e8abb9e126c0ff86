//! Платёжное поручение и его перенос в документ обмена.

use std::fmt;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::exchange::ClientBankExchange;

/// Вид оплаты по умолчанию: для платёжных поручений всегда `01`.
pub const DEFAULT_PAYMENT_TYPE: &str = "01";
/// Очерёдность платежа по умолчанию: для обычных операций `5`.
pub const DEFAULT_PRIORITY: &str = "5";
/// КПП, подставляемый при его отсутствии (например, у ИП).
pub const KPP_PLACEHOLDER: &str = "0";

fn default_payment_type() -> String {
    DEFAULT_PAYMENT_TYPE.to_string()
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

fn default_kpp() -> String {
    KPP_PLACEHOLDER.to_string()
}

/// КПП или [`KPP_PLACEHOLDER`], если он пуст или не указан.
pub(crate) fn kpp_or_placeholder(kpp: Option<String>) -> String {
    match kpp {
        Some(kpp) if !kpp.is_empty() => kpp,
        _ => default_kpp(),
    }
}

fn deserialize_kpp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(kpp_or_placeholder)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Краткие банковские реквизиты контрагента.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankShort {
    /// Расчётный счёт.
    pub account: Option<String>,
    /// Наименование банка.
    pub name: Option<String>,
    /// БИК банка.
    pub bic: Option<String>,
    /// Корреспондентский счёт банка.
    pub corr_acc: Option<String>,
}

impl fmt::Display for BankShort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<BankShort account={} name={} bic={}",
            self.account.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default(),
            self.bic.as_deref().unwrap_or_default(),
        )?;
        if let Some(corr_acc) = self.corr_acc.as_deref().filter(|acc| !acc.is_empty()) {
            write!(f, " к/сч={corr_acc}")?;
        }
        write!(f, ">")
    }
}

/// Плательщик или получатель платежа.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contractor {
    /// Наименование.
    #[serde(default)]
    pub name: String,
    /// ИНН.
    #[serde(default)]
    pub inn: String,
    /// КПП. Пустой или `null` при разборе заменяется на [`KPP_PLACEHOLDER`].
    #[serde(default = "default_kpp", deserialize_with = "deserialize_kpp")]
    pub kpp: String,
    /// Банковские реквизиты.
    #[serde(default)]
    pub bank: BankShort,
}

impl Contractor {
    /// Создаёт контрагента без КПП.
    pub fn new(name: impl Into<String>, inn: impl Into<String>, bank: BankShort) -> Self {
        Self {
            name: name.into(),
            inn: inn.into(),
            kpp: default_kpp(),
            bank,
        }
    }

    /// Задаёт КПП; пустая строка означает его отсутствие.
    #[must_use]
    pub fn with_kpp(mut self, kpp: impl Into<String>) -> Self {
        self.kpp = kpp_or_placeholder(Some(kpp.into()));
        self
    }

    /// КПП для документа: [`KPP_PLACEHOLDER`], если поле очищено.
    pub fn kpp(&self) -> &str {
        if self.kpp.is_empty() {
            KPP_PLACEHOLDER
        } else {
            &self.kpp
        }
    }
}

impl fmt::Display for Contractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Contractor name={} inn={}", self.name, self.inn)?;
        write!(f, " kpp={} bank:{}>", self.kpp(), self.bank)
    }
}

/// Платёжное поручение.
///
/// После создания не изменяется; необязательные реквизиты задаются
/// методами `with_*` до первого использования.
///
/// # Пример
///
/// ```
/// use modulbank::{BankShort, Contractor, PaymentOrder};
/// use rust_decimal::Decimal;
///
/// let bank = BankShort {
///     account: Some("40802810670010011008".into()),
///     name: Some("МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"".into()),
///     bic: Some("044525092".into()),
///     corr_acc: Some("30101810645250000092".into()),
/// };
/// let payer = Contractor::new("ИП Александров", "770400372208", bank.clone());
/// let recipient = Contractor::new("ООО Ромашка", "2204000595", bank).with_kpp("771543001");
///
/// let order = PaymentOrder::new(
///     "994720",
///     "40802810670010011008",
///     Decimal::new(10000, 2),
///     "Для теста",
///     payer,
///     recipient,
/// );
/// assert_eq!(order.payment_type(), "01");
/// assert_eq!(order.priority(), "5");
///
/// let text = order.to_exchange().render().unwrap();
/// assert!(text.contains("Сумма=100.00\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    doc_num: String,
    account_num: String,
    amount: Decimal,
    purpose: String,
    payer: Contractor,
    recipient: Contractor,
    #[serde(default = "default_payment_type")]
    payment_type: String,
    #[serde(default = "default_priority")]
    priority: String,
    #[serde(default = "today")]
    date: NaiveDate,
}

impl PaymentOrder {
    /// Создаёт поручение с видом оплаты `01`, очерёдностью `5` и сегодняшней датой.
    pub fn new(
        doc_num: impl Into<String>,
        account_num: impl Into<String>,
        amount: Decimal,
        purpose: impl Into<String>,
        payer: Contractor,
        recipient: Contractor,
    ) -> Self {
        Self {
            doc_num: doc_num.into(),
            account_num: account_num.into(),
            amount,
            purpose: purpose.into(),
            payer,
            recipient,
            payment_type: default_payment_type(),
            priority: default_priority(),
            date: today(),
        }
    }

    /// Задаёт вид оплаты (вид операции).
    #[must_use]
    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = payment_type.into();
        self
    }

    /// Задаёт очерёдность платежа.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Задаёт дату списания средств.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Номер документа.
    pub fn doc_num(&self) -> &str {
        &self.doc_num
    }

    /// Расчётный счёт организации.
    pub fn account_num(&self) -> &str {
        &self.account_num
    }

    /// Сумма платежа.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Назначение платежа одной строкой.
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Плательщик.
    pub fn payer(&self) -> &Contractor {
        &self.payer
    }

    /// Получатель.
    pub fn recipient(&self) -> &Contractor {
        &self.recipient
    }

    /// Вид оплаты.
    pub fn payment_type(&self) -> &str {
        &self.payment_type
    }

    /// Очерёдность платежа.
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Дата списания.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Переносит реквизиты поручения в документ обмена.
    ///
    /// Заполняет секцию платёжного документа и расчётный счёт в условиях
    /// отбора. Значения не проверяются: ошибки формата проявятся при печати
    /// документа.
    pub fn fill(&self, exchange: &mut ClientBankExchange) {
        exchange.filter.account = Some(self.account_num.clone());

        let doc = &mut exchange.payment;
        doc.number = Some(self.doc_num.clone());
        doc.date = Some(self.date);
        doc.amount = Some(self.amount);
        doc.purpose = Some(self.purpose.clone());
        doc.purpose1 = Some(self.purpose.clone());

        let payer = &self.payer;
        doc.payer = Some(format!("{} {}", payer.inn, payer.name));
        doc.payer_inn = Some(payer.inn.clone());
        doc.payer_kpp = Some(payer.kpp().to_string());
        doc.payer_account = payer.bank.account.clone();
        doc.payer_settlement_account = payer.bank.account.clone();
        doc.payer_bank1 = payer.bank.name.clone();
        doc.payer_bic = payer.bank.bic.clone();
        doc.payer_corr_account = payer.bank.corr_acc.clone();

        let recipient = &self.recipient;
        doc.recipient = Some(recipient.name.clone());
        doc.recipient_inn = Some(recipient.inn.clone());
        doc.recipient_kpp = Some(recipient.kpp().to_string());
        doc.recipient_account = recipient.bank.account.clone();
        doc.recipient_settlement_account = recipient.bank.account.clone();
        doc.recipient_bank1 = recipient.bank.name.clone();
        doc.recipient_bic = recipient.bank.bic.clone();
        doc.recipient_corr_account = recipient.bank.corr_acc.clone();

        doc.operation_type = Some(self.payment_type.clone());
        doc.priority = Some(self.priority.clone());
        doc.debited_date = Some(self.date);
    }

    /// Создаёт новый документ обмена и заполняет его этим поручением.
    pub fn to_exchange(&self) -> ClientBankExchange {
        let mut exchange = ClientBankExchange::new();
        self.fill(&mut exchange);
        exchange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYER_ACCOUNT: &str = "40802810670010011008";

    fn payer() -> Contractor {
        Contractor::new(
            "Индивидуальный предприниматель Александров Александр Александрович",
            "770400372208",
            BankShort {
                account: Some(PAYER_ACCOUNT.into()),
                name: Some("МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"".into()),
                bic: Some("044525092".into()),
                corr_acc: Some("30101810645250000092".into()),
            },
        )
    }

    fn recipient() -> Contractor {
        Contractor::new(
            "МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"",
            "2204000595",
            BankShort {
                account: Some("30102810675250000092".into()),
                name: Some("МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"".into()),
                bic: Some("044525092".into()),
                corr_acc: Some("30102810675250000092".into()),
            },
        )
        .with_kpp("771543001")
    }

    fn order() -> PaymentOrder {
        PaymentOrder::new(
            "994720",
            PAYER_ACCOUNT,
            Decimal::new(10000, 2),
            "Для теста",
            payer(),
            recipient(),
        )
        .with_date(NaiveDate::from_ymd_opt(2016, 4, 1).unwrap())
    }

    fn filled() -> ClientBankExchange {
        let mut exchange = ClientBankExchange::new();
        order().fill(&mut exchange);
        exchange
    }

    #[test]
    fn defaults() {
        let order = PaymentOrder::new("1", "2", Decimal::ONE, "p", payer(), recipient());
        assert_eq!(order.payment_type(), DEFAULT_PAYMENT_TYPE);
        assert_eq!(order.priority(), DEFAULT_PRIORITY);
        let today = Local::now().date_naive();
        let date = order.date();
        assert!(date == today || date == today.pred_opt().unwrap());
    }

    #[test]
    fn contractor_without_kpp_gets_placeholder() {
        assert_eq!(payer().kpp, KPP_PLACEHOLDER);
        assert_eq!(recipient().kpp, "771543001");
    }

    #[test]
    fn empty_kpp_gets_placeholder() {
        assert_eq!(payer().with_kpp("").kpp, KPP_PLACEHOLDER);

        let mut contractor = recipient();
        contractor.kpp.clear();
        assert_eq!(contractor.kpp(), KPP_PLACEHOLDER);

        let order = PaymentOrder::new("1", PAYER_ACCOUNT, Decimal::ONE, "p", payer(), contractor);
        let doc = order.to_exchange().payment;
        assert_eq!(doc.recipient_kpp.as_deref(), Some(KPP_PLACEHOLDER));
        let text = order.to_exchange().render().unwrap();
        assert!(text.contains("\nПолучательКПП=0\n"));
    }

    #[test]
    fn empty_or_null_kpp_in_json_gets_placeholder() {
        for kpp in [r#""""#, "null"] {
            let json = format!(r#"{{"name": "ИП Иванов", "kpp": {kpp}}}"#);
            let contractor: Contractor = serde_json::from_str(&json).unwrap();
            assert_eq!(contractor.kpp, KPP_PLACEHOLDER);
        }

        let contractor: Contractor = serde_json::from_str(r#"{"kpp": "771543001"}"#).unwrap();
        assert_eq!(contractor.kpp, "771543001");
    }

    #[test]
    fn fill_sets_filter_account() {
        assert_eq!(filled().filter.account.as_deref(), Some(PAYER_ACCOUNT));
    }

    #[test]
    fn fill_maps_document_fields() {
        let doc = filled().payment;
        let date = NaiveDate::from_ymd_opt(2016, 4, 1).unwrap();
        assert_eq!(doc.number.as_deref(), Some("994720"));
        assert_eq!(doc.date, Some(date));
        assert_eq!(doc.debited_date, Some(date));
        assert_eq!(doc.amount, Some(Decimal::new(10000, 2)));
        assert_eq!(doc.purpose.as_deref(), Some("Для теста"));
        assert_eq!(doc.purpose1.as_deref(), Some("Для теста"));
        assert_eq!(doc.operation_type.as_deref(), Some("01"));
        assert_eq!(doc.priority.as_deref(), Some("5"));
        assert_eq!(doc.payment_kind, None);
    }

    #[test]
    fn fill_maps_payer() {
        let doc = filled().payment;
        assert_eq!(
            doc.payer.as_deref(),
            Some("770400372208 Индивидуальный предприниматель Александров Александр Александрович")
        );
        assert_eq!(doc.payer_inn.as_deref(), Some("770400372208"));
        assert_eq!(doc.payer_kpp.as_deref(), Some("0"));
        assert_eq!(doc.payer_account.as_deref(), Some(PAYER_ACCOUNT));
        assert_eq!(
            doc.payer_settlement_account.as_deref(),
            Some(PAYER_ACCOUNT)
        );
        assert_eq!(doc.payer_bic.as_deref(), Some("044525092"));
        assert_eq!(
            doc.payer_corr_account.as_deref(),
            Some("30101810645250000092")
        );
    }

    #[test]
    fn fill_maps_recipient() {
        let doc = filled().payment;
        let bank_name = Some("МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"");
        let account = Some("30102810675250000092");
        assert_eq!(doc.recipient.as_deref(), bank_name);
        assert_eq!(doc.recipient_inn.as_deref(), Some("2204000595"));
        assert_eq!(doc.recipient_kpp.as_deref(), Some("771543001"));
        assert_eq!(doc.recipient_account.as_deref(), account);
        assert_eq!(doc.recipient_settlement_account.as_deref(), account);
        assert_eq!(doc.recipient_bank1.as_deref(), bank_name);
    }

    #[test]
    fn rendered_order_contains_payer_account() {
        let text = filled().render().unwrap();
        assert!(text.chars().count() > 100);
        assert!(text.contains(PAYER_ACCOUNT));
        assert!(text.contains("РасчСчет=40802810670010011008\n"));
        assert!(text.contains("Сумма=100.00\n"));
        assert!(text.contains("Дата=01.04.2016\n"));
        assert!(text.ends_with("Очередность=5\nКонецДокумента\nКонецФайла"));
    }

    #[test]
    fn missing_bank_details_render_blank_mandatory_lines() {
        let bare = Contractor::new("Получатель", "123", BankShort::default());
        let order = PaymentOrder::new("1", PAYER_ACCOUNT, Decimal::ONE, "p", payer(), bare);
        let text = order.to_exchange().render().unwrap();
        assert!(text.contains("\nПолучательБИК=\n"));
        assert!(text.contains("\nПолучательСчет=\n"));
    }

    #[test]
    fn multiline_purpose_fails_at_render_not_at_fill() {
        let (payer, recipient) = (payer(), recipient());
        let order = PaymentOrder::new("1", PAYER_ACCOUNT, Decimal::ONE, "a\nb", payer, recipient);
        let exchange = order.to_exchange();
        let err = exchange.render().unwrap_err();
        assert_eq!(err.field(), Some("НазначениеПлатежа"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "doc_num": "15",
            "account_num": "40802810670010011008",
            "amount": "1500.5",
            "purpose": "Оплата по счёту 15",
            "payer": {"name": "ИП Иванов", "inn": "770400372208", "bank": {"bic": "044525092"}},
            "recipient": {"name": "ООО Ромашка", "inn": "2204000595", "kpp": "771543001"}
        }"#;
        let order: PaymentOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.amount(), Decimal::new(15005, 1));
        assert_eq!(order.payment_type(), "01");
        assert_eq!(order.priority(), "5");
        assert_eq!(order.payer().kpp, KPP_PLACEHOLDER);
        assert_eq!(order.payer().bank.bic.as_deref(), Some("044525092"));
        assert_eq!(order.recipient().bank, BankShort::default());
    }

    #[test]
    fn display_contractor() {
        assert!(payer().to_string().starts_with("<Contractor "));
        assert!(payer().to_string().contains(" kpp=0 "));
    }

    #[test]
    fn display_bank_short_shows_corr_account_only_when_set() {
        let mut bank = BankShort {
            account: Some("1".into()),
            name: Some("Банк".into()),
            bic: Some("044525092".into()),
            corr_acc: Some("301".into()),
        };
        assert_eq!(
            bank.to_string(),
            "<BankShort account=1 name=Банк bic=044525092 к/сч=301>"
        );

        bank.corr_acc = None;
        assert_eq!(
            bank.to_string(),
            "<BankShort account=1 name=Банк bic=044525092>"
        );
    }
}
