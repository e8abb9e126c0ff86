//! Критерии отбора операций.

use chrono::NaiveDate;
use serde_json::{Map, Value, json};

use crate::model::OperationCategory;

/// Размер страницы по умолчанию и его верхняя граница в API.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Параметры поиска операций по счёту.
///
/// Создаётся заново для каждого запроса. По умолчанию запрашивается первая
/// страница без ограничений по дате и направлению.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Направление платежа.
    pub category: Option<OperationCategory>,
    /// Операции, проведённые не раньше этой даты.
    pub date_from: Option<NaiveDate>,
    /// Операции, проведённые не позже этой даты.
    pub date_till: Option<NaiveDate>,
    /// Номер страницы, начиная с 0. `None` отключает постраничный вывод.
    pub page: Option<u32>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            category: None,
            date_from: None,
            date_till: None,
            page: Some(0),
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn with_category(mut self, category: OperationCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    #[must_use]
    pub fn with_till(mut self, date: NaiveDate) -> Self {
        self.date_till = Some(date);
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    /// Тело запроса `operation-history` для страницы размером `page_size`.
    ///
    /// ```
    /// use modulbank::{OperationCategory, SearchOptions};
    /// use serde_json::json;
    ///
    /// let criteria = SearchOptions::default()
    ///     .with_category(OperationCategory::Debet)
    ///     .with_page(Some(2))
    ///     .criteria(10);
    /// assert_eq!(criteria, json!({"category": "Debet", "skip": 20, "records": 10}));
    /// ```
    pub fn criteria(&self, page_size: u32) -> Value {
        let mut criteria = Map::new();
        if let Some(category) = self.category {
            criteria.insert("category".into(), json!(category.as_str()));
        }
        if let Some(date) = self.date_from {
            criteria.insert("from".into(), json!(date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.date_till {
            criteria.insert("till".into(), json!(date.format("%Y-%m-%d").to_string()));
        }
        if let Some(page) = self.page {
            criteria.insert("skip".into(), json!(u64::from(page) * u64::from(page_size)));
            criteria.insert("records".into(), json!(page_size));
        }
        Value::Object(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requests_first_page() {
        let options = SearchOptions::default();
        assert_eq!(options.page, Some(0));
        assert_eq!(options.criteria(50), json!({"skip": 0, "records": 50}));
    }

    #[test]
    fn no_paging_keys_without_page() {
        let criteria = SearchOptions::default().with_page(None).criteria(50);
        assert_eq!(criteria, json!({}));
    }

    #[test]
    fn second_page_skips_first() {
        let criteria = SearchOptions::default().with_page(Some(1)).criteria(10);
        assert_eq!(criteria, json!({"skip": 10, "records": 10}));
    }

    #[test]
    fn dates_and_category() {
        let criteria = SearchOptions::default()
            .with_category(OperationCategory::Credit)
            .with_from(NaiveDate::from_ymd_opt(2016, 4, 1).unwrap())
            .with_till(NaiveDate::from_ymd_opt(2016, 4, 30).unwrap())
            .with_page(None)
            .criteria(50);
        assert_eq!(
            criteria,
            json!({"category": "Credit", "from": "2016-04-01", "till": "2016-04-30"})
        );
    }
}
