//! Derived views over the loaded accounts: filtering and summary statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Account, AccountFilters};

pub const BANK: &str = "Bank";
pub const FIXED_ASSET: &str = "Fixed Asset";
pub const ACCOUNTS_PAYABLE: &str = "Accounts Payable";

/// Accounts passing every filter predicate, in their original order
pub fn filter_accounts(accounts: &[Account], filters: &AccountFilters) -> Vec<Account> {
    accounts
        .iter()
        .filter(|account| filters.matches(account))
        .cloned()
        .collect()
}

/// Summary statistics over the full loaded list, independent of the filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountStats {
    pub bank_accounts: usize,
    pub total_bank_balance: Decimal,
    pub total_assets: Decimal,
    /// Not rendered as a summary card; exposed through the JSON API
    pub total_liabilities: Decimal,
    pub total_accounts: usize,
}

impl AccountStats {
    /// Sums saturate at the `Decimal` bounds; balances come from the service unchecked
    pub fn compute(accounts: &[Account]) -> Self {
        let mut stats = AccountStats {
            total_accounts: accounts.len(),
            ..Default::default()
        };

        for account in accounts {
            if account.is_type(BANK) {
                stats.bank_accounts += 1;
                stats.total_bank_balance = stats.total_bank_balance.saturating_add(account.balance);
            } else if account.is_type(FIXED_ASSET) {
                stats.total_assets = stats.total_assets.saturating_add(account.balance);
            } else if account.is_type(ACCOUNTS_PAYABLE) {
                stats.total_liabilities = stats.total_liabilities.saturating_add(account.balance);
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, account_type: &str, balance: i64, is_active: bool) -> Account {
        Account {
            id: id.to_string(),
            name: format!("{} {}", account_type, id),
            account_type: account_type.to_string(),
            number: Some(format!("{}00", id)),
            balance: Decimal::from(balance),
            description: None,
            is_active,
        }
    }

    fn sample() -> Vec<Account> {
        vec![
            account("1", "Bank", 100, true),
            account("2", "Fixed Asset", 500, false),
            account("3", "Bank", -40, true),
            account("4", "Accounts Payable", 75, true),
            account("5", "Equity", 1000, false),
            account("6", "bank", 9, true),
        ]
    }

    #[test]
    fn test_scenario_active_bank_only() {
        let accounts = vec![account("1", "Bank", 100, true), account("2", "Fixed Asset", 500, false)];
        let filtered = filter_accounts(&accounts, &AccountFilters::default());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "1");

        let stats = AccountStats::compute(&accounts);
        assert_eq!(stats.total_assets, Decimal::from(500));
        assert_eq!(stats.total_accounts, 2);
    }

    #[test]
    fn test_filter_is_conjunction_of_predicates() {
        let accounts = sample();
        let searches = ["", "bank", "BANK", "100", "Fixed", "nothing"];
        let types = ["all", "Bank", "bank", "Fixed Asset", "Equity"];

        for search in searches {
            for filter_type in types {
                for show_inactive in [false, true] {
                    let filters = AccountFilters {
                        search_term: search.to_string(),
                        filter_type: filter_type.to_string(),
                        show_inactive,
                    };
                    let filtered = filter_accounts(&accounts, &filters);
                    let expected: Vec<&Account> = accounts
                        .iter()
                        .filter(|a| {
                            a.matches_search(search)
                                && a.matches_type(filter_type)
                                && (show_inactive || a.is_active)
                        })
                        .collect();
                    assert_eq!(filtered.iter().collect::<Vec<_>>(), expected);
                }
            }
        }
    }

    #[test]
    fn test_show_inactive_only_grows() {
        let accounts = sample();
        for filter_type in ["all", "Bank", "Fixed Asset", "Equity"] {
            let hidden = AccountFilters {
                filter_type: filter_type.to_string(),
                ..Default::default()
            };
            let shown = AccountFilters { show_inactive: true, ..hidden.clone() };
            let hidden = filter_accounts(&accounts, &hidden);
            let shown = filter_accounts(&accounts, &shown);
            assert!(shown.len() >= hidden.len());
            assert!(hidden.iter().all(|a| shown.contains(a)));
        }
    }

    #[test]
    fn test_type_filter_is_case_insensitive() {
        let filters = AccountFilters {
            filter_type: "BANK".to_string(),
            show_inactive: true,
            ..Default::default()
        };
        let ids: Vec<String> = filter_accounts(&sample(), &filters)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["1", "3", "6"]);
    }

    #[test]
    fn test_stats_exact_type_match() {
        let stats = AccountStats::compute(&sample());
        // "bank" (lowercase) is not counted
        assert_eq!(stats.bank_accounts, 2);
        assert_eq!(stats.total_bank_balance, Decimal::from(60));
        assert_eq!(stats.total_assets, Decimal::from(500));
        assert_eq!(stats.total_liabilities, Decimal::from(75));
        assert_eq!(stats.total_accounts, 6);
    }

    #[test]
    fn test_stats_saturate_on_huge_balances() {
        let page: crate::models::AccountPage = serde_json::from_str(
            r#"{"data": [
                {"id": 1, "name": "A", "type": "Bank", "balance": "50000000000000000000000000000"},
                {"id": 2, "name": "B", "type": "Bank", "balance": "50000000000000000000000000000"},
                {"id": 3, "name": "C", "type": "Accounts Payable", "balance": "-50000000000000000000000000000"},
                {"id": 4, "name": "D", "type": "Accounts Payable", "balance": "-50000000000000000000000000000"}
            ]}"#,
        )
        .unwrap();
        let stats = AccountStats::compute(&page.data);
        assert_eq!(stats.bank_accounts, 2);
        assert_eq!(stats.total_bank_balance, Decimal::MAX);
        assert_eq!(stats.total_liabilities, Decimal::MIN);
        assert_eq!(stats.total_accounts, 4);
    }

    #[test]
    fn test_stats_empty() {
        let stats = AccountStats::compute(&[]);
        assert_eq!(stats, AccountStats::default());
    }
}
