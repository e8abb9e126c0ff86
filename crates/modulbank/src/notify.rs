//! Уведомления о новых операциях (webhook).
//!
//! Банк присылает JSON с операцией и подписью `SHA1Hash`. Подпись считается
//! как SHA-1 от строки `"{первые 10 символов токена}&{id операции}"`.

use std::fmt;

use serde::{Deserialize, Deserializer};
use sha1::{Digest, Sha1};

use crate::model::Operation;

/// Количество символов токена, участвующих в подписи.
const TOKEN_PREFIX_LEN: usize = 10;

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Уведомление о новой операции.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotifyRequest {
    /// ИНН компании.
    #[serde(rename = "companyInn", default, deserialize_with = "null_as_empty")]
    pub inn: String,
    /// КПП контрагента.
    #[serde(rename = "contragentKpp", default, deserialize_with = "null_as_empty")]
    pub kpp: String,
    /// Операция, о которой сообщает банк.
    pub operation: Option<Operation>,
    /// Подпись уведомления, hex.
    #[serde(rename = "SHA1Hash", default, deserialize_with = "null_as_empty")]
    pub signature: String,
}

/// Вычисляет подпись уведомления: hex SHA-1 в нижнем регистре.
///
/// ```
/// let digest = modulbank::notify::signature("0123456789abcdef", "42");
/// assert_eq!(digest.len(), 40);
/// ```
pub fn signature(token: &str, operation_id: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    let digest = Sha1::digest(format!("{prefix}&{operation_id}").as_bytes());
    hex::encode(digest)
}

impl NotifyRequest {
    /// Проверяет подпись уведомления токеном из личного кабинета.
    ///
    /// Регистр hex-строки не учитывается. Уведомление без операции не
    /// проходит проверку.
    pub fn check_signature(&self, token: &str) -> bool {
        let Some(operation) = &self.operation else {
            return false;
        };
        let expected = signature(token, &operation.operation_id);
        expected.eq_ignore_ascii_case(&self.signature)
    }
}

impl fmt::Display for NotifyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<NotifyRequest inn={} kpp={}", self.inn, self.kpp)?;
        f.write_str(" operation:")?;
        match &self.operation {
            Some(operation) => write!(f, "{operation}")?,
            None => f.write_str("None")?,
        }
        write!(f, " signature={}>", self.signature)
    }
}
