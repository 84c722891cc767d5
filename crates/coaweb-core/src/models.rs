//! Core data models for the accounts view

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Filter value meaning "every account type"
pub const ALL_TYPES: &str = "all";

/// Account record as returned by the banking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    #[serde(alias = "account_id", deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name
    #[serde(alias = "account_name")]
    pub name: String,
    /// Category, e.g. "Bank", "Fixed Asset", "Accounts Payable"
    #[serde(rename = "type", alias = "account_type")]
    pub account_type: String,
    /// Account number
    #[serde(default, alias = "account_number", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Signed balance
    #[serde(default, deserialize_with = "nullable_decimal")]
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active", deserialize_with = "nullable_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn nullable_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

impl Account {
    /// Search predicate: case-insensitive on the name, case-sensitive on the number
    pub fn matches_search(&self, search_term: &str) -> bool {
        if search_term.is_empty() {
            return true;
        }
        if self.name.to_lowercase().contains(&search_term.to_lowercase()) {
            return true;
        }
        self.number
            .as_deref()
            .map_or(false, |number| number.contains(search_term))
    }

    /// Type predicate: `"all"` or case-insensitive equality
    pub fn matches_type(&self, filter_type: &str) -> bool {
        filter_type == ALL_TYPES || filter_type.to_lowercase() == self.account_type.to_lowercase()
    }

    /// Type check used by the statistics (exact match)
    pub fn is_type(&self, account_type: &str) -> bool {
        self.account_type == account_type
    }
}

/// One page of accounts from the service.
///
/// The service wrapper answers with `data`; the backend itself with
/// `items` + `total`. Both shapes are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPage {
    #[serde(default, alias = "items", deserialize_with = "nullable_accounts")]
    pub data: Vec<Account>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

fn nullable_accounts<'de, D>(deserializer: D) -> Result<Vec<Account>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Account>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<Vec<Account>> for AccountPage {
    fn from(data: Vec<Account>) -> Self {
        Self { data, total: None }
    }
}

/// Options sent with an accounts request; `None` options are omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountQuery {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

impl AccountQuery {
    /// Request with only a row cap
    pub fn unfiltered(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Query-string pairs in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        if let Some(is_active) = self.is_active {
            pairs.push(("is_active", is_active.to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref account_type) = self.account_type {
            pairs.push(("account_type", account_type.clone()));
        }
        pairs
    }
}

/// User-controlled filters of the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFilters {
    pub search_term: String,
    pub filter_type: String,
    pub show_inactive: bool,
}

impl Default for AccountFilters {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            filter_type: ALL_TYPES.to_string(),
            show_inactive: false,
        }
    }
}

impl AccountFilters {
    /// Server-side options for these filters
    pub fn to_query(&self, limit: u32) -> AccountQuery {
        AccountQuery {
            limit,
            is_active: if self.show_inactive { None } else { Some(true) },
            search: if self.search_term.is_empty() {
                None
            } else {
                Some(self.search_term.clone())
            },
            account_type: if self.filter_type == ALL_TYPES {
                None
            } else {
                Some(self.filter_type.clone())
            },
        }
    }

    /// All three predicates, conjunctively
    pub fn matches(&self, account: &Account) -> bool {
        account.matches_search(&self.search_term)
            && account.matches_type(&self.filter_type)
            && (self.show_inactive || account.is_active)
    }
}

/// Company the view is showing, passed in explicitly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyContext {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CompanyContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, number: Option<&str>) -> Account {
        Account {
            id: name.to_string(),
            name: name.to_string(),
            account_type: "Bank".to_string(),
            number: number.map(String::from),
            balance: Decimal::ZERO,
            description: None,
            is_active: true,
        }
    }

    #[test]
    fn test_deserialize_backend_shape() {
        let page: AccountPage = serde_json::from_str(
            r#"{"items": [{"account_id": "a-1", "account_name": "Operating", "account_type": "Bank",
                "account_number": "1000", "balance": "1250.50", "is_active": true}], "total": 1}"#,
        )
        .unwrap();
        assert_eq!(page.total, Some(1));
        let acc = &page.data[0];
        assert_eq!(acc.id, "a-1");
        assert_eq!(acc.name, "Operating");
        assert_eq!(acc.account_type, "Bank");
        assert_eq!(acc.number.as_deref(), Some("1000"));
        assert_eq!(acc.balance, Decimal::new(125050, 2));
    }

    #[test]
    fn test_deserialize_wrapper_shape() {
        let page: AccountPage = serde_json::from_str(
            r#"{"data": [{"id": 42, "name": "Equipment", "type": "Fixed Asset", "balance": -12.5,
                "description": null, "is_active": null}]}"#,
        )
        .unwrap();
        let acc = &page.data[0];
        assert_eq!(acc.id, "42");
        assert_eq!(acc.balance, Decimal::new(-125, 1));
        assert!(acc.is_active);
        assert!(acc.description.is_none());
    }

    #[test]
    fn test_deserialize_missing_data() {
        let page: AccountPage = serde_json::from_str("{}").unwrap();
        assert!(page.data.is_empty());
        let page: AccountPage = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_search_name_case_insensitive() {
        let acc = account("Petty Cash", None);
        assert!(acc.matches_search("petty"));
        assert!(acc.matches_search("CASH"));
        assert!(!acc.matches_search("bank"));
    }

    #[test]
    fn test_search_number_case_sensitive() {
        let acc = account("Loan", Some("LN-100"));
        assert!(acc.matches_search("LN-1"));
        assert!(acc.matches_search("N-10"));
        assert!(!acc.matches_search("n-10"));
        assert!(!account("Loan", None).matches_search("N-10"));
    }

    #[test]
    fn test_type_match() {
        let acc = account("Operating", None);
        assert!(acc.matches_type("all"));
        assert!(acc.matches_type("bank"));
        assert!(acc.matches_type("BANK"));
        assert!(!acc.matches_type("Equity"));
        assert!(acc.is_type("Bank"));
        assert!(!acc.is_type("bank"));
    }

    #[test]
    fn test_filters_to_query() {
        let filters = AccountFilters::default();
        assert_eq!(
            filters.to_query(1000),
            AccountQuery { limit: 1000, is_active: Some(true), search: None, account_type: None }
        );

        let filters = AccountFilters {
            search_term: "cash".to_string(),
            filter_type: "Bank".to_string(),
            show_inactive: true,
        };
        let query = filters.to_query(1000);
        assert_eq!(query.is_active, None);
        assert_eq!(query.search.as_deref(), Some("cash"));
        assert_eq!(query.account_type.as_deref(), Some("Bank"));
        assert_eq!(
            query.to_pairs(),
            vec![
                ("limit", "1000".to_string()),
                ("search", "cash".to_string()),
                ("account_type", "Bank".to_string()),
            ]
        );
    }

    #[test]
    fn test_company_display_name() {
        assert_eq!(CompanyContext::new("c-1").display_name(), "c-1");
        assert_eq!(CompanyContext::new("c-1").with_name("Acme").display_name(), "Acme");
    }
}
