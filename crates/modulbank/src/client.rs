//! Клиент API МодульБанка.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ModulbankError, Result};
use crate::model::{Company, Operation};
use crate::payment::PaymentOrder;
use crate::search::SearchOptions;
use crate::transport::{RawResponse, Transport};

/// Ответ на загрузку платёжных поручений.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    /// Количество загруженных поручений.
    #[serde(default)]
    pub total_loaded: u32,
    /// Ошибки по незагруженным поручениям.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Документ `1CClientBankExchange`, отправленный в банк.
    #[serde(skip)]
    pub document: String,
}

/// Клиент API МодульБанка.
///
/// Не хранит состояния между вызовами, поэтому один экземпляр можно
/// использовать из нескольких задач одновременно.
///
/// С HTTPS-транспортом клиент создаётся через `ModulbankClient::new`
/// (фича `http`), с любым другим через [`ModulbankClient::with_transport`]:
///
/// ```no_run
/// # async fn run() -> modulbank::Result<()> {
/// use modulbank::{ClientConfig, MockTransport, ModulbankClient, RawResponse};
///
/// let transport = MockTransport::new();
/// transport.set_response("account-info", RawResponse::ok("[]"));
///
/// let config = ClientConfig::new("token").with_sandbox(true);
/// let client = ModulbankClient::with_transport(config, transport);
/// for company in client.accounts().await? {
///     println!("{company}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ModulbankClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl ModulbankClient {
    /// Создаёт клиент с HTTPS-транспортом.
    #[cfg(feature = "http")]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = crate::transport::HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Создаёт клиент поверх произвольного транспорта.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Токен API.
    pub fn token(&self) -> &str {
        self.config.token()
    }

    /// Компании пользователя вместе со счетами.
    ///
    /// Метод API: `account-info`.
    pub async fn accounts(&self) -> Result<Vec<Company>> {
        let body = self.call("account-info", json!({})).await?;
        decode(&body)
    }

    /// Остаток денежных средств на счёте.
    ///
    /// Метод API: `account-info/balance/{account_id}`. Ответ: число
    /// текстом; если его не удалось разобрать, возвращается
    /// [`ModulbankError::UnexpectedValue`].
    pub async fn balance(&self, account_id: &str) -> Result<Decimal> {
        let path = format!("account-info/balance/{account_id}");
        let body = self.call(&path, json!({})).await?;
        body.trim()
            .parse::<Decimal>()
            .map_err(|_| ModulbankError::UnexpectedValue(format!("Balance {body} as Decimal")))
    }

    /// История операций по счёту.
    ///
    /// Метод API: `operation-history/{account_id}`. Размер страницы берётся
    /// из настроек клиента.
    pub async fn operations(
        &self,
        account_id: &str,
        search: SearchOptions,
    ) -> Result<Vec<Operation>> {
        let path = format!("operation-history/{account_id}");
        let criteria = search.criteria(self.config.page_size());
        let body = self.call(&path, criteria).await?;
        decode(&body)
    }

    /// Создаёт черновик платёжного поручения.
    ///
    /// Метод API: `operation-upload/1c`. Подписать черновик можно только в
    /// личном кабинете.
    pub async fn create_payment_draft(&self, order: &PaymentOrder) -> Result<PaymentResponse> {
        let document = order.to_exchange().render()?;
        let request = json!({ "document": document });
        let body = self.call("operation-upload/1c", request).await?;
        let response = PaymentResponse {
            document,
            ..decode::<PaymentResponse>(&body)?
        };
        info!(
            doc_num = order.doc_num(),
            loaded = response.total_loaded,
            errors = response.errors.len(),
            "payment draft uploaded"
        );
        Ok(response)
    }

    async fn call(&self, path: &str, body: Value) -> Result<String> {
        debug!(path, "POST");
        let RawResponse { status, body } = self.transport.post(path, body).await?;
        match status {
            200 => Ok(body),
            401 => {
                warn!(path, "not authorized");
                Err(ModulbankError::NotAuthorized)
            }
            status => {
                warn!(path, status, "unexpected response status");
                Err(ModulbankError::UnexpectedStatus(status))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "cannot decode response body");
        ModulbankError::UnexpectedBody(body.to_string())
    })
}

impl fmt::Display for ModulbankClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ModulbankClient token='…' sandbox_mode='{}' page_size={}>",
            self.config.sandbox(),
            self.config.page_size()
        )
    }
}

impl fmt::Debug for ModulbankClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModulbankClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn client(mock: &MockTransport) -> ModulbankClient {
        ModulbankClient::with_transport(ClientConfig::new("secret-token"), mock.clone())
    }

    #[test]
    fn display_hides_token() {
        let client = client(&MockTransport::new());
        assert_eq!(
            client.to_string(),
            "<ModulbankClient token='…' sandbox_mode='false' page_size=50>"
        );
        assert!(!format!("{client:?}").contains("secret-token"));
    }

    #[tokio::test]
    async fn status_401_is_not_authorized() {
        let mock = MockTransport::new();
        mock.set_response("account-info", RawResponse::new(401, "Unauthorized"));
        let result = client(&mock).accounts().await;
        assert!(matches!(result, Err(ModulbankError::NotAuthorized)));
    }

    #[tokio::test]
    async fn other_status_is_unexpected() {
        let mock = MockTransport::new();
        mock.set_response("account-info/balance/1", RawResponse::new(500, ""));
        let result = client(&mock).balance("1").await;
        assert!(matches!(result, Err(ModulbankError::UnexpectedStatus(500))));
    }

    #[tokio::test]
    async fn bad_json_is_unexpected_body() {
        let mock = MockTransport::new();
        mock.set_response("account-info", RawResponse::ok("<html>"));
        match client(&mock).accounts().await {
            Err(ModulbankError::UnexpectedBody(body)) => assert_eq!(body, "<html>"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn bad_balance_is_unexpected_value() {
        let mock = MockTransport::new();
        mock.set_response("account-info/balance/1", RawResponse::ok("n/a"));
        let result = client(&mock).balance("1").await;
        assert!(matches!(result, Err(ModulbankError::UnexpectedValue(_))));
    }

    #[tokio::test]
    async fn operations_use_configured_page_size() {
        let mock = MockTransport::new();
        mock.set_response("operation-history/acc", RawResponse::ok("[]"));
        let client = ModulbankClient::with_transport(
            ClientConfig::new("t").with_page_size(10).unwrap(),
            mock.clone(),
        );
        let search = SearchOptions::default().with_page(Some(3));
        client.operations("acc", search).await.unwrap();
        let (path, body) = mock.requests().remove(0);
        assert_eq!(path, "operation-history/acc");
        assert_eq!(body, json!({"skip": 30, "records": 10}));
    }
}
