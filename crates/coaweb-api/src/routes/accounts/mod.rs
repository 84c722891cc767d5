//! Account routes - Chart of Accounts view
//!
//! Features:
//! - Company selection with a prompt when none is selected
//! - Summary cards: total accounts, bank accounts, bank balance, assets
//! - Search (debounced), type filter, show-inactive toggle
//! - Refresh and retry
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    api_account_stats,
    api_accounts,
    api_refresh,
    api_select_company,
    htmx_accounts_list,
    htmx_accounts_refresh,
};
pub use page::{
    page_accounts,
    render_accounts_table,
    render_summary,
    render_view_body,
};
