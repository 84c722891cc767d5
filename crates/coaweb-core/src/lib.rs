//! Core logic of the Chart of Accounts view
//!
//! - models: account records, filters, service query options
//! - reports: local filtering and summary statistics
//! - service: the banking service trait and its HTTP client
//! - view: the view-model owning state and fetch timing
//! - format: currency formatting for balances

pub mod error;
pub mod format;
pub mod models;
pub mod reports;
pub mod service;
pub mod view;

pub use error::{CoreError, CoreResult, ErrorSeverity, DEFAULT_FETCH_ERROR};
pub use format::{balance_class, format_currency};
pub use models::{Account, AccountFilters, AccountPage, AccountQuery, CompanyContext, ALL_TYPES};
pub use reports::{filter_accounts, AccountStats};
pub use service::{AccountsService, HttpAccountsService};
pub use view::{AccountsView, AccountsViewModel, ViewOptions, ViewPhase, ViewState};
