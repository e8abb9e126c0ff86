//! Клиент API МодульБанка и кодировщик формата обмена 1С с клиент-банком.
//!
//! Крейт состоит из двух частей:
//!
//! - **exchange**: документ `1CClientBankExchange` с одним платёжным
//!   поручением: секции, форматирование полей, печать
//! - **client**: асинхронный клиент REST API банка: счета, остатки,
//!   история операций, загрузка черновиков платёжек
//!
//! # Быстрый старт
//!
//! ```
//! use modulbank::{BankShort, Contractor, PaymentOrder};
//! use rust_decimal::Decimal;
//!
//! let payer = Contractor::new("ИП Иванов", "770400372208", BankShort {
//!     account: Some("40802810670010011008".into()),
//!     ..BankShort::default()
//! });
//! let recipient = Contractor::new("ООО Ромашка", "2204000595", BankShort::default());
//! let amount = Decimal::new(150050, 2);
//! let order = PaymentOrder::new("1", "40802810670010011008", amount, "Оплата", payer, recipient);
//!
//! let document = order.to_exchange().render().unwrap();
//! assert!(document.starts_with("1CClientBankExchange\n"));
//! assert!(document.contains("Сумма=1500.50\n"));
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod model;
pub mod notify;
pub mod payment;
pub mod search;
pub mod transport;

pub use client::{ModulbankClient, PaymentResponse};
pub use config::{ClientConfig, ConfigError};
pub use error::{ModulbankError, Result};
pub use exchange::ClientBankExchange;
pub use model::{
    AccountCategory, AccountStatus, Bank, BankAccount, BudgetaryAndTax, Company, Currency,
    Operation, OperationCategory, OperationStatus,
};
pub use notify::NotifyRequest;
pub use payment::{BankShort, Contractor, PaymentOrder};
pub use search::SearchOptions;
pub use transport::{MockTransport, RawResponse, Transport};
