//! Accounts API endpoints - JSON API and HTMX partial responses

use super::page::{poll_interval, render_accounts_table, render_summary, render_view_body};
use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use coaweb_core::{AccountFilters, AccountStats, AccountsView, CompanyContext, CoreError, ALL_TYPES};
use std::collections::HashMap;

/// Body of `PUT /api/company`; an empty or missing id deselects
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SelectCompanyRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Read the filter controls from a query string. Unchecked checkboxes are
/// simply absent.
fn filters_from_query(params: &HashMap<String, String>) -> AccountFilters {
    let filter_type = params
        .get("type")
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .unwrap_or(ALL_TYPES);
    let show_inactive = params
        .get("show_inactive")
        .map(|v| matches!(v.as_str(), "true" | "on" | "1"))
        .unwrap_or(false);

    AccountFilters {
        search_term: params.get("search").cloned().unwrap_or_default(),
        filter_type: filter_type.to_string(),
        show_inactive,
    }
}

pub async fn api_accounts(state: State<AppState>) -> Json<AccountsView> {
    Json(state.view.snapshot())
}

pub async fn api_account_stats(state: State<AppState>) -> Json<AccountStats> {
    Json(state.view.account_stats())
}

pub async fn api_refresh(state: State<AppState>) -> Result<Json<AccountsView>, ApiError> {
    if state.view.company().is_none() {
        return Err(CoreError::NoCompany.into());
    }
    state.view.refresh().await?;
    Ok(Json(state.view.snapshot()))
}

pub async fn api_select_company(
    state: State<AppState>,
    Json(request): Json<SelectCompanyRequest>,
) -> Result<Json<AccountsView>, ApiError> {
    let company = request
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .map(|id| match request.name {
            Some(name) => CompanyContext::new(id).with_name(name),
            None => CompanyContext::new(id),
        });

    state.view.select_company(company).await?;
    Ok(Json(state.view.snapshot()))
}

/// Table partial for the filter controls; summary cards ride along out-of-band
pub async fn htmx_accounts_list(
    state: State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    state.view.set_filters(filters_from_query(&params));

    let view = state.view.snapshot();
    let currency = &state.config.currency;
    let mut html = render_accounts_table(&view, currency, poll_interval(&state));
    if view.company.is_some() {
        html.push_str(&render_summary(&view, currency, true));
    }
    Html(html)
}

pub async fn htmx_accounts_refresh(state: State<AppState>) -> Html<String> {
    // the error is rendered from the view state
    if let Err(e) = state.view.refresh().await {
        log::debug!("Refresh failed: {}", e);
    }
    let view = state.view.snapshot();
    Html(render_view_body(&view, &state.config.currency, poll_interval(&state)))
}
