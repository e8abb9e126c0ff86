//! Транспорт запросов к API.
//!
//! Все методы API МодульБанка вызываются через `POST` с JSON-телом, поэтому транспорт
//! сводится к одной операции [`Transport::post`]. Разбор статуса и тела
//! остаётся за клиентом.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ModulbankError, Result};

/// Ответ сервера без разбора.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP-статус.
    pub status: u16,
    /// Тело ответа как текст.
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Ответ `200 OK` с телом `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Транспорт запросов (object-safe).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Отправляет `POST` на `path` относительно адреса API.
    async fn post(&self, path: &str, body: Value) -> Result<RawResponse>;
}

/// Транспорт для тестов: отдаёт заготовленные ответы и запоминает запросы.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, RawResponse>>>,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Задаёт ответ для пути `path`.
    ///
    /// # Panics
    ///
    /// Паникует, если мьютекс отравлен.
    pub fn set_response(&self, path: &str, response: RawResponse) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(path.to_string(), response);
    }

    /// Запросы, отправленные через транспорт, в порядке отправки.
    ///
    /// # Panics
    ///
    /// Паникует, если мьютекс отравлен.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, path: &str, body: Value) -> Result<RawResponse> {
        self.requests
            .lock()
            .map_err(|_| ModulbankError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((path.to_string(), body));

        self.responses
            .lock()
            .map_err(|_| ModulbankError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(path)
            .cloned()
            .ok_or_else(|| ModulbankError::Transport(format!("no response for {path}")))
    }
}

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;
    use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
    use serde_json::Value;

    use super::{RawResponse, Transport};
    use crate::config::ClientConfig;
    use crate::error::{ModulbankError, Result};

    /// HTTPS-транспорт поверх `reqwest`.
    ///
    /// Каждый запрос несёт `Authorization: Bearer <token>`, а в режиме
    /// песочницы ещё и заголовок `sandbox: on`.
    pub struct HttpTransport {
        client: reqwest::Client,
        base_url: String,
    }

    impl HttpTransport {
        pub fn new(config: &ClientConfig) -> Result<Self> {
            let mut headers = HeaderMap::new();
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token()))
                .map_err(|_| ModulbankError::Transport("malformed token".to_string()))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);
            if config.sandbox() {
                headers.insert("sandbox", HeaderValue::from_static("on"));
            }

            let client = reqwest::Client::builder()
                .default_headers(headers)
                .build()
                .map_err(|e| ModulbankError::Transport(e.to_string()))?;

            Ok(Self {
                client,
                base_url: config.base_url().to_string(),
            })
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn post(&self, path: &str, body: Value) -> Result<RawResponse> {
            let response = self
                .client
                .post(format!("{}{path}", self.base_url))
                .json(&body)
                .send()
                .await
                .map_err(|e| ModulbankError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ModulbankError::Transport(e.to_string()))?;
            Ok(RawResponse { status, body })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn builds_for_sandbox() {
            let config = ClientConfig::new("token").with_sandbox(true);
            let transport = HttpTransport::new(&config).unwrap();
            assert_eq!(transport.base_url, "https://api.modulbank.ru/v1/");
        }

        #[test]
        fn rejects_token_with_line_break() {
            let config = ClientConfig::new("bad\ntoken");
            let result = HttpTransport::new(&config);
            assert!(matches!(result, Err(ModulbankError::Transport(_))));
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn mock_replays_and_records() {
        let transport = MockTransport::new();
        transport.set_response("account-info", RawResponse::ok("[]"));

        let response = transport.post("account-info", json!({})).await.unwrap();
        assert_eq!(response, RawResponse::new(200, "[]"));
        let expected = vec![("account-info".to_string(), json!({}))];
        assert_eq!(transport.requests(), expected);
    }

    #[tokio::test]
    async fn mock_unknown_path() {
        let transport = MockTransport::new();
        let result = transport.post("operation-history/1", json!({})).await;
        assert!(matches!(result, Err(ModulbankError::Transport(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let mock = MockTransport::new();
        mock.set_response("x", RawResponse::new(401, ""));
        let transport: Box<dyn Transport> = Box::new(mock.clone());
        assert_eq!(transport.post("x", Value::Null).await.unwrap().status, 401);
        assert_eq!(mock.requests().len(), 1);
    }
}
