//! Accounts page rendering - Full page endpoints

use crate::AppState;
use axum::extract::Query;
use coaweb_config::CurrencyConfig;
use coaweb_core::{balance_class, format_currency, AccountFilters, AccountsView, CompanyContext, ViewPhase, ALL_TYPES};
use coaweb_utils::{account_type_color, escape_html, ACCOUNT_TYPES};
use std::collections::HashMap;
use std::time::Duration;

/// Query string for the table partial with the given filters
pub(crate) fn list_url(filters: &AccountFilters) -> String {
    let mut url = format!(
        "/accounts/list?search={}&type={}",
        urlencoding::encode(&filters.search_term),
        urlencoding::encode(&filters.filter_type)
    );
    if filters.show_inactive {
        url.push_str("&show_inactive=true");
    }
    url
}

fn render_company_prompt() -> String {
    String::from(r#"<div class="max-w-md mx-auto mt-16 bg-white rounded-xl shadow-sm border border-gray-200 p-8 text-center">
            <h3 class="text-lg font-semibold mb-2">Select a company</h3>
            <p class="text-gray-500 mb-6">Select a company to view its chart of accounts.</p>
            <form action="/accounts" method="get" class="flex gap-2">
                <input type="text" name="company" placeholder="Company ID" required class="flex-1 px-3 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500">
                <button type="submit" class="px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700">Open</button>
            </form>
        </div>"#)
}

fn render_loading() -> String {
    String::from(r#"<div class="flex items-center justify-center py-24">
            <svg class="animate-spin h-8 w-8 text-indigo-600" fill="none" viewBox="0 0 24 24">
                <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4"></circle>
                <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8v4a4 4 0 00-4 4H4z"></path>
            </svg>
        </div>"#)
}

fn render_error(message: &str) -> String {
    format!(r##"<div class="bg-red-50 border border-red-200 rounded-xl p-6 text-center">
            <p class="text-red-700 font-medium mb-4">{}</p>
            <button hx-post="/accounts/refresh" hx-target="#accounts-view" hx-swap="innerHTML" class="px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700">Retry</button>
        </div>"##, escape_html(message))
}

/// Summary cards; `oob` marks them for an out-of-band swap from the table partial
pub fn render_summary(view: &AccountsView, currency: &CurrencyConfig, oob: bool) -> String {
    let stats = &view.stats;
    let oob_attr = if oob { r#" hx-swap-oob="true""# } else { "" };
    let cards = [
        ("Total Accounts", stats.total_accounts.to_string(), "indigo"),
        ("Bank Accounts", stats.bank_accounts.to_string(), "blue"),
        ("Bank Balance", format_currency(stats.total_bank_balance, currency), "green"),
        ("Total Assets", format_currency(stats.total_assets, currency), "purple"),
    ];

    let mut html = format!(r#"<div id="accounts-summary"{} class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6">"#, oob_attr);
    for (label, value, color) in cards {
        html.push_str(&format!(
            r#"<div class="bg-{c}-50 p-4 rounded-xl border border-{c}-200"><p class="text-sm text-{c}-700 font-medium mb-2">{}</p><p class="text-2xl font-bold text-{c}-800">{}</p></div>"#,
            label,
            escape_html(&value),
            c = color
        ));
    }
    html.push_str("</div>");
    html
}

fn render_filter_bar(filters: &AccountFilters) -> String {
    let mut type_options = String::new();
    let mut known = false;
    let all_selected = if filters.filter_type == ALL_TYPES { " selected" } else { "" };
    type_options.push_str(&format!(r#"<option value="all"{}>All types</option>"#, all_selected));
    for account_type in ACCOUNT_TYPES {
        let selected = if filters.filter_type == *account_type {
            known = true;
            " selected"
        } else {
            ""
        };
        type_options.push_str(&format!(r#"<option value="{t}"{}>{t}</option>"#, selected, t = account_type));
    }
    if !known && filters.filter_type != ALL_TYPES {
        let custom = escape_html(&filters.filter_type);
        type_options.push_str(&format!(r#"<option value="{t}" selected>{t}</option>"#, t = custom));
    }

    let inactive_attr = if filters.show_inactive { " checked" } else { "" };
    let hx_common = r##"hx-get="/accounts/list" hx-target="#accounts-table" hx-include="#account-filters" hx-indicator="#filter-indicator""##;

    format!(r#"<div class="p-4 border-b border-gray-200 bg-gray-50">
                <form id="account-filters" class="flex flex-col sm:flex-row sm:items-center gap-4" onsubmit="return false">
                    <input type="text" name="search" placeholder="Search by name or number..." value="{}"
                        {} hx-trigger="keyup changed, delay:500ms"
                        class="flex-1 px-3 py-2.5 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500">
                    <select name="type" {} hx-trigger="change" class="px-3 py-2.5 border border-gray-300 rounded-lg bg-white">{}</select>
                    <label class="flex items-center gap-2 cursor-pointer select-none">
                        <input type="checkbox" name="show_inactive" value="true"{} {} hx-trigger="change" class="w-4 h-4 text-indigo-600 rounded border-gray-300">
                        <span class="text-sm text-gray-600">Show inactive</span>
                    </label>
                    <span id="filter-indicator" class="htmx-indicator text-sm text-gray-400">Filtering...</span>
                </form>
            </div>"#,
        escape_html(&filters.search_term),
        hx_common,
        hx_common,
        type_options,
        inactive_attr,
        hx_common)
}

fn render_account_row(account: &coaweb_core::Account, currency: &CurrencyConfig) -> String {
    let number = account.number.as_deref().map(escape_html).unwrap_or_else(|| "-".to_string());
    let description = account
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| format!(r#"<div class="text-xs text-gray-500">{}</div>"#, escape_html(d)))
        .unwrap_or_default();
    let status = if account.is_active {
        r#"<span class="px-2 py-0.5 text-xs rounded bg-green-100 text-green-800">Active</span>"#
    } else {
        r#"<span class="px-2 py-0.5 text-xs rounded bg-gray-100 text-gray-500">Inactive</span>"#
    };

    format!(r#"<tr class="hover:bg-gray-50" data-id="{}"><td class="px-4 py-3 text-sm font-mono text-gray-600">{}</td><td class="px-4 py-3"><div class="font-medium">{}</div>{}</td><td class="px-4 py-3"><span class="px-2 py-0.5 text-xs rounded {}">{}</span></td><td class="px-4 py-3 text-right font-medium {}">{}</td><td class="px-4 py-3">{}</td></tr>"#,
        escape_html(&account.id),
        number,
        escape_html(&account.name),
        description,
        account_type_color(&account.account_type),
        escape_html(&account.account_type),
        balance_class(account.balance),
        format_currency(account.balance, currency),
        status)
}

/// Table of the filtered accounts.
///
/// While a fetch is pending the fragment polls itself once after `poll_after`.
pub fn render_accounts_table(view: &AccountsView, currency: &CurrencyConfig, poll_after: Duration) -> String {
    let mut html = String::new();

    if view.reload_pending || view.loading {
        html.push_str(&format!(
            r##"<div hx-get="{}" hx-trigger="load delay:{}ms" hx-target="#accounts-table" hx-swap="innerHTML" class="px-4 py-2 text-sm text-gray-400">Updating...</div>"##,
            escape_html(&list_url(&view.filters)),
            poll_after.as_millis()
        ));
    }

    if let Some(ref error) = view.error {
        html.push_str(&format!(r#"<div class="px-4 py-2 text-sm text-red-600">{}</div>"#, escape_html(error)));
    }

    if view.accounts.is_empty() {
        html.push_str(r#"<div class="text-center py-12 text-gray-500"><p>No accounts found</p></div>"#);
        return html;
    }

    html.push_str(r#"<table class="min-w-full divide-y divide-gray-200">
                <thead class="bg-gray-50"><tr>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">Number</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">Name</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">Type</th>
                    <th class="px-4 py-2 text-right text-xs font-medium text-gray-500 uppercase">Balance</th>
                    <th class="px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase">Status</th>
                </tr></thead>
                <tbody class="divide-y divide-gray-100">"#);
    for account in &view.accounts {
        html.push_str(&render_account_row(account, currency));
    }
    html.push_str("</tbody></table>");

    let shown = view.accounts.len();
    let loaded = view.stats.total_accounts;
    let footer = match view.total {
        Some(total) if total as usize > loaded => format!("Showing {} of {} loaded ({} on server)", shown, loaded, total),
        _ => format!("Showing {} of {} accounts", shown, loaded),
    };
    html.push_str(&format!(r#"<div class="px-4 py-3 text-sm text-gray-500 border-t">{}</div>"#, footer));
    html
}

fn render_header(company: &CompanyContext, refreshing: bool) -> String {
    let refresh_label = if refreshing { "Refreshing..." } else { "Refresh" };
    format!(r##"<div class="mb-6 flex items-center justify-between">
            <div>
                <h2 class="text-2xl font-bold">Chart of Accounts</h2>
                <p class="text-gray-500 mt-1">{}</p>
            </div>
            <button hx-post="/accounts/refresh" hx-target="#accounts-view" hx-swap="innerHTML" hx-indicator="#refresh-indicator"
                class="px-4 py-2 border border-gray-300 rounded-lg hover:bg-gray-50 text-gray-700 flex items-center gap-2">
                <span id="refresh-indicator" class="htmx-indicator">⟳</span>{}
            </button>
        </div>"##,
        escape_html(company.display_name()),
        refresh_label)
}

/// Body of `#accounts-view` for the current phase
pub fn render_view_body(view: &AccountsView, currency: &CurrencyConfig, poll_after: Duration) -> String {
    let company = match view.company {
        Some(ref company) => company,
        None => return render_company_prompt(),
    };

    let header = render_header(company, view.refreshing);
    match view.phase {
        ViewPhase::NoCompany => render_company_prompt(),
        ViewPhase::Loading => format!("{}{}", header, render_loading()),
        ViewPhase::Error => format!("{}{}", header, render_error(view.error.as_deref().unwrap_or_default())),
        ViewPhase::Idle | ViewPhase::Ready => format!(
            r#"{}{}<div class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden">{}<div id="accounts-table">{}</div></div>"#,
            header,
            render_summary(view, currency, false),
            render_filter_bar(&view.filters),
            render_accounts_table(view, currency, poll_after)
        ),
    }
}

pub async fn page_accounts(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    query: Option<Query<HashMap<String, String>>>,
) -> axum::response::Html<String> {
    let requested = query.as_ref().and_then(|q| q.0.get("company")).map(|s| s.trim().to_string());

    if let Some(company_id) = requested {
        let current = state.view.company().map(|c| c.id);
        if company_id.is_empty() {
            if current.is_some() {
                // failures are stored in the view state
                let _ = state.view.select_company(None).await;
            }
        } else if current.as_deref() != Some(company_id.as_str()) {
            let _ = state.view.select_company(Some(CompanyContext::new(company_id))).await;
        }
    }

    let view = state.view.snapshot();
    let body = render_view_body(&view, &state.config.currency, poll_interval(&state));
    let inner_content = format!(r#"<div id="accounts-view">{}</div>"#, body);
    axum::response::Html(crate::page_response(&headers, "Chart of Accounts", "/accounts", &inner_content))
}

/// Delay before a pending table re-polls: just past the debounce
pub(crate) fn poll_interval(state: &AppState) -> Duration {
    state.view.options().debounce + Duration::from_millis(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coaweb_core::{Account, AccountStats};
    use rust_decimal::Decimal;

    fn view_with(phase: ViewPhase, accounts: Vec<Account>) -> AccountsView {
        AccountsView {
            company: Some(CompanyContext::new("acme").with_name("Acme & Co")),
            filters: AccountFilters::default(),
            phase,
            loading: phase == ViewPhase::Loading,
            refreshing: false,
            error: None,
            stats: AccountStats::compute(&accounts),
            accounts,
            total: None,
            last_loaded_at: None,
            reload_pending: false,
        }
    }

    fn bank() -> Account {
        Account {
            id: "a1".to_string(),
            name: "Operating <main>".to_string(),
            account_type: "Bank".to_string(),
            number: Some("1000".to_string()),
            balance: Decimal::new(123450, 2),
            description: Some("Primary checking".to_string()),
            is_active: true,
        }
    }

    #[test]
    fn test_no_company_renders_prompt_only() {
        let mut view = view_with(ViewPhase::NoCompany, vec![]);
        view.company = None;
        let html = render_view_body(&view, &CurrencyConfig::default(), Duration::from_millis(600));
        assert!(html.contains("Select a company"));
        assert!(!html.contains("accounts-table"));
        assert!(!html.contains("accounts-summary"));
    }

    #[test]
    fn test_loading_replaces_view() {
        let html = render_view_body(&view_with(ViewPhase::Loading, vec![bank()]), &CurrencyConfig::default(), Duration::from_millis(600));
        assert!(html.contains("animate-spin"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_error_has_retry() {
        let mut view = view_with(ViewPhase::Error, vec![]);
        view.error = Some("timeout".to_string());
        let html = render_view_body(&view, &CurrencyConfig::default(), Duration::from_millis(600));
        assert!(html.contains("timeout"));
        assert!(html.contains("Retry"));
        assert!(html.contains(r#"hx-post="/accounts/refresh""#));
        assert!(html.contains(r##"hx-target="#accounts-view""##));
    }

    #[test]
    fn test_ready_renders_table_and_summary() {
        let html = render_view_body(&view_with(ViewPhase::Ready, vec![bank()]), &CurrencyConfig::default(), Duration::from_millis(600));
        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains("Operating &lt;main&gt;"));
        assert!(html.contains("$1,234.50"));
        assert!(html.contains("bg-blue-100 text-blue-800"));
        assert!(html.contains("Primary checking"));
        assert!(html.contains("Showing 1 of 1 accounts"));
        assert!(html.contains(r#"hx-trigger="keyup changed, delay:500ms""#));
        assert!(html.contains(r##"hx-indicator="#refresh-indicator""##));
        assert!(html.contains(r#"<span id="refresh-indicator" class="htmx-indicator">"#));
    }

    #[test]
    fn test_pending_table_polls() {
        let mut view = view_with(ViewPhase::Ready, vec![bank()]);
        view.reload_pending = true;
        view.filters.search_term = "op er".to_string();
        let html = render_accounts_table(&view, &CurrencyConfig::default(), Duration::from_millis(600));
        assert!(html.contains("load delay:600ms"));
        assert!(html.contains("/accounts/list?search=op%20er&amp;type=all"));
    }

    #[test]
    fn test_empty_table() {
        let html = render_accounts_table(&view_with(ViewPhase::Ready, vec![]), &CurrencyConfig::default(), Duration::from_millis(600));
        assert!(html.contains("No accounts found"));
    }

    #[test]
    fn test_filter_bar_keeps_unknown_type() {
        let filters = AccountFilters {
            filter_type: "Suspense".to_string(),
            show_inactive: true,
            ..Default::default()
        };
        let html = render_filter_bar(&filters);
        assert!(html.contains(r#"<option value="Suspense" selected>Suspense</option>"#));
        assert!(html.contains(r#"value="true" checked"#));
    }

    #[test]
    fn test_list_url() {
        let filters = AccountFilters {
            search_term: "cash".to_string(),
            filter_type: "Fixed Asset".to_string(),
            show_inactive: true,
        };
        assert_eq!(list_url(&filters), "/accounts/list?search=cash&type=Fixed%20Asset&show_inactive=true");
    }
}
