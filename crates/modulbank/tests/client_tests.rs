//! Интеграционные тесты клиента на заготовленных ответах API.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use modulbank::{
    AccountCategory, AccountStatus, BankShort, ClientConfig, Contractor, Currency, MockTransport,
    ModulbankClient, ModulbankError, NotifyRequest, OperationCategory, OperationStatus,
    PaymentOrder, RawResponse, SearchOptions,
};
use rust_decimal::Decimal;
use serde_json::json;

const TOKEN: &str = "0123456789-sandbox-token";
const ACCOUNT_ID: &str = "58c20343-5d3b-422c-b98b-a5ec037df782";

/// Получить содержимое фикстуры из `tests/data`.
fn data(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn client(mock: &MockTransport) -> ModulbankClient {
    let config = ClientConfig::new(TOKEN).with_sandbox(true);
    ModulbankClient::with_transport(config, mock.clone())
}

fn history_path() -> String {
    format!("operation-history/{ACCOUNT_ID}")
}

// ============================================================================
// Счета и остатки
// ============================================================================

#[tokio::test]
async fn test_accounts() {
    let mock = MockTransport::new();
    mock.set_response("account-info", RawResponse::ok(data("accounts.json")));

    let companies = client(&mock).accounts().await.unwrap();
    assert_eq!(companies.len(), 1);

    let company = &companies[0];
    assert_eq!(company.name, "ООО \"Ромашка\"");
    assert_eq!(company.company_id, "70ca00f6-1f10-4964-aca6-a5ec032efe37");
    assert_eq!(company.bank_accounts.len(), 2);

    let account = &company.bank_accounts[0];
    assert_eq!(account.name, "Основной счет");
    assert_eq!(account.account_id, "edb10116-5a93-4963-a53b-a5ec037177f0");
    assert_eq!(account.balance, Some(Decimal::from(900000)));
    assert_eq!(account.begin_date, NaiveDate::from_ymd_opt(2015, 10, 7));
    assert_eq!(account.category, Some(AccountCategory::CheckingAccount));
    assert_eq!(account.currency, Some(Currency::RUR));
    assert_eq!(account.number, "40802810070000000001");
    assert_eq!(account.status, Some(AccountStatus::New));
    assert_eq!(account.bank.bic.as_deref(), Some("044525092"));
    assert_eq!(account.bank.inn.as_deref(), Some("2204000595"));
    assert_eq!(account.bank.kpp.as_deref(), Some("770443001"));
    assert_eq!(
        account.bank.corr_account.as_deref(),
        Some("30101810000000000001")
    );

    let deposit = &company.bank_accounts[1];
    assert_eq!(deposit.status, Some(AccountStatus::ToClosed));
    assert_eq!(deposit.bank.kpp, None);

    let expected = vec![("account-info".to_string(), json!({}))];
    assert_eq!(mock.requests(), expected);
}

#[tokio::test]
async fn test_balance() {
    let mock = MockTransport::new();
    let path = format!("account-info/balance/{ACCOUNT_ID}");
    mock.set_response(&path, RawResponse::ok("630170.0"));

    let balance = client(&mock).balance(ACCOUNT_ID).await.unwrap();
    assert_eq!(balance, Decimal::new(6301700, 1));
}

#[tokio::test]
async fn test_unauthorized() {
    let mock = MockTransport::new();
    mock.set_response(&history_path(), RawResponse::new(401, ""));

    let result = client(&mock)
        .operations(ACCOUNT_ID, SearchOptions::default())
        .await;
    assert!(matches!(result, Err(ModulbankError::NotAuthorized)));
}

// ============================================================================
// История операций
// ============================================================================

#[tokio::test]
async fn test_operations() {
    let mock = MockTransport::new();
    mock.set_response(&history_path(), RawResponse::ok(data("operations.json")));

    let operations = client(&mock)
        .operations(ACCOUNT_ID, SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(operations.len(), 2);

    let incoming = &operations[0];
    assert_eq!(incoming.status, Some(OperationStatus::Received));
    assert_eq!(incoming.category, Some(OperationCategory::Debet));
    assert_eq!(incoming.currency, Some(Currency::RUR));
    assert_eq!(incoming.amount, Some(Decimal::from(100000)));
    assert_eq!(incoming.amount_with_commission, Some(Decimal::from(100000)));
    assert_eq!(incoming.account_number, "30101810000000000001");
    let created = NaiveDate::from_ymd_opt(2016, 4, 1)
        .unwrap()
        .and_hms_opt(9, 3, 7);
    assert_eq!(incoming.created, created);
    assert!(incoming.executed.is_some());
    assert!(incoming.budgetary_and_tax.is_none());

    let contractor = incoming.contractor.as_ref().unwrap();
    assert_eq!(contractor.inn, "770400372208");
    assert_eq!(contractor.kpp, "0");
    assert_eq!(contractor.bank.bic.as_deref(), Some("044525092"));

    let tax_payment = &operations[1];
    assert_eq!(tax_payment.amount, Some(Decimal::new(212550, 2)));
    let tax = tax_payment.budgetary_and_tax.as_ref().unwrap();
    assert_eq!(tax.kbk.as_deref(), Some("18210501011011000110"));
    assert_eq!(tax.payer_status.as_deref(), Some("09"));
    assert!(tax_payment.to_string().starts_with("<Operation "));
}

#[tokio::test]
async fn test_operations_search_criteria() {
    let mock = MockTransport::new();
    mock.set_response(&history_path(), RawResponse::ok("[]"));
    let client = client(&mock);

    let search = SearchOptions::default()
        .with_category(OperationCategory::Debet)
        .with_from(NaiveDate::from_ymd_opt(2016, 4, 1).unwrap())
        .with_till(NaiveDate::from_ymd_opt(2016, 4, 30).unwrap())
        .with_page(Some(1));
    let operations = client.operations(ACCOUNT_ID, search).await.unwrap();
    assert!(operations.is_empty());

    let search = SearchOptions::default().with_page(None);
    client.operations(ACCOUNT_ID, search).await.unwrap();

    let requests = mock.requests();
    let expected = json!({
        "category": "Debet",
        "from": "2016-04-01",
        "till": "2016-04-30",
        "skip": 50,
        "records": 50
    });
    assert_eq!(requests[0].1, expected);
    assert_eq!(requests[1].1, json!({}));
}

#[tokio::test]
async fn test_operations_unknown_status() {
    let mock = MockTransport::new();
    let body = r#"[{"id": "1", "status": "Lost"}]"#;
    mock.set_response(&history_path(), RawResponse::ok(body));

    let result = client(&mock)
        .operations(ACCOUNT_ID, SearchOptions::default())
        .await;
    assert!(matches!(result, Err(ModulbankError::UnexpectedBody(_))));
}

// ============================================================================
// Черновик платёжки
// ============================================================================

fn order() -> PaymentOrder {
    let payer = Contractor::new(
        "Индивидуальный предприниматель Александров Александр Александрович",
        "770400372208",
        BankShort {
            account: Some("40802810670010011008".into()),
            name: Some("МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"".into()),
            bic: Some("044525092".into()),
            corr_acc: Some("30101810645250000092".into()),
        },
    );
    let recipient = Contractor::new(
        "МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"",
        "2204000595",
        BankShort {
            account: Some("30102810675250000092".into()),
            name: Some("МОСКОВСКИЙ ФИЛИАЛ АО КБ \"МОДУЛЬБАНК\"".into()),
            bic: Some("044525092".into()),
            corr_acc: Some("30102810675250000092".into()),
        },
    )
    .with_kpp("771543001");

    PaymentOrder::new(
        "994720",
        "40802810670010011008",
        Decimal::new(10000, 2),
        "Для теста",
        payer,
        recipient,
    )
}

#[tokio::test]
async fn test_create_payment_draft() {
    let mock = MockTransport::new();
    let body = data("operation_upload.json");
    mock.set_response("operation-upload/1c", RawResponse::ok(body));

    let response = client(&mock).create_payment_draft(&order()).await.unwrap();
    assert!(response.errors.is_empty());
    assert_eq!(response.total_loaded, 1);
    assert!(response.document.chars().count() > 100);
    assert!(response.document.contains("40802810670010011008"));
    assert!(response.document.contains("Номер=994720\n"));

    let (path, body) = mock.requests().remove(0);
    assert_eq!(path, "operation-upload/1c");
    assert_eq!(body, json!({ "document": response.document }));
}

#[tokio::test]
async fn test_create_payment_draft_rejects_multiline_purpose() {
    let mock = MockTransport::new();
    let payer = order().payer().clone();
    let recipient = order().recipient().clone();
    let bad = PaymentOrder::new(
        "1",
        "40802810670010011008",
        Decimal::ONE,
        "две\nстроки",
        payer,
        recipient,
    );

    let result = client(&mock).create_payment_draft(&bad).await;
    assert!(matches!(result, Err(ModulbankError::Exchange(_))));
    assert!(mock.requests().is_empty());
}

// ============================================================================
// Уведомления
// ============================================================================

#[test]
fn test_notify_request() {
    let request: NotifyRequest = serde_json::from_str(&data("new_operations.json")).unwrap();
    assert_eq!(request.inn, "1111111111");
    assert_eq!(request.kpp, "");
    assert!(request.check_signature(TOKEN));
    assert!(!request.check_signature("9999999999"));
    assert!(request.to_string().starts_with("<NotifyRequest "));
}
