//! Accounts view-model
//!
//! Owns the state of the Chart of Accounts view and decides when accounts
//! are fetched:
//! - company change: fetch immediately
//! - filter change: fetch after a quiet period (debounce); a newer change
//!   cancels the pending fetch and restarts the timer
//! - refresh: fetch now, with a separate `refreshing` flag
//!
//! Every fetch is tagged with a request id. Only the response of the latest
//! issued request is applied; older responses are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use coaweb_config::ViewConfig;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::{CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{Account, AccountFilters, AccountQuery, CompanyContext};
use crate::reports::{filter_accounts, AccountStats};
use crate::service::AccountsService;

/// Timing and request settings of the view
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub debounce: Duration,
    pub fetch_limit: u32,
    pub server_filtering: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self::from(&ViewConfig::default())
    }
}

impl From<&ViewConfig> for ViewOptions {
    fn from(config: &ViewConfig) -> Self {
        Self {
            debounce: config.debounce(),
            fetch_limit: config.fetch_limit,
            server_filtering: config.server_filtering,
        }
    }
}

/// Mutable state of the view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub company: Option<CompanyContext>,
    pub filters: AccountFilters,
    /// Result of the last applied fetch
    pub accounts: Vec<Account>,
    /// Row count reported by the service, when it reports one
    pub total: Option<u64>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub last_loaded_at: Option<DateTime<Utc>>,
}

impl ViewState {
    pub fn phase(&self) -> ViewPhase {
        if self.company.is_none() {
            ViewPhase::NoCompany
        } else if self.loading {
            ViewPhase::Loading
        } else if self.error.is_some() {
            ViewPhase::Error
        } else if self.last_loaded_at.is_some() {
            ViewPhase::Ready
        } else {
            ViewPhase::Idle
        }
    }
}

/// Coarse state of the view, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    NoCompany,
    Idle,
    Loading,
    Ready,
    Error,
}

/// Everything the renderer needs, computed from one consistent state read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsView {
    pub company: Option<CompanyContext>,
    pub filters: AccountFilters,
    pub phase: ViewPhase,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    /// Loaded accounts narrowed by the current filters
    pub accounts: Vec<Account>,
    /// Computed over all loaded accounts
    pub stats: AccountStats,
    pub total: Option<u64>,
    pub last_loaded_at: Option<DateTime<Utc>>,
    /// A debounced fetch is scheduled or running
    pub reload_pending: bool,
}

struct Inner {
    service: Arc<dyn AccountsService>,
    options: ViewOptions,
    state: RwLock<ViewState>,
    latest_request: AtomicU64,
    latest_refresh: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
    logger: DefaultErrorLogger,
}

impl Inner {
    fn write_state(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn is_latest(&self, request_id: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == request_id
    }

    fn cancel_pending(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

/// Clears `loading` when a fetch ends, including when its future is dropped
struct LoadingGuard<'a> {
    inner: &'a Inner,
    request_id: u64,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.inner.is_latest(self.request_id) {
            self.inner.write_state().loading = false;
        }
    }
}

/// Clears `refreshing` when the most recent refresh ends
struct RefreshGuard<'a> {
    inner: &'a Inner,
    refresh_id: u64,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if self.inner.latest_refresh.load(Ordering::SeqCst) == self.refresh_id {
            self.inner.write_state().refreshing = false;
        }
    }
}

/// View-model of the Chart of Accounts view. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct AccountsViewModel {
    inner: Arc<Inner>,
}

impl AccountsViewModel {
    pub fn new(service: Arc<dyn AccountsService>, options: ViewOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                options,
                state: RwLock::new(ViewState::default()),
                latest_request: AtomicU64::new(0),
                latest_refresh: AtomicU64::new(0),
                pending: Mutex::new(None),
                logger: DefaultErrorLogger,
            }),
        }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.inner.options
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ViewState> {
        self.inner.state.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current state
    pub fn state(&self) -> ViewState {
        self.read_state().clone()
    }

    pub fn company(&self) -> Option<CompanyContext> {
        self.read_state().company.clone()
    }

    pub fn filters(&self) -> AccountFilters {
        self.read_state().filters.clone()
    }

    // ==================== Fetching ====================

    fn query_for(&self, filters: &AccountFilters) -> AccountQuery {
        if self.inner.options.server_filtering {
            filters.to_query(self.inner.options.fetch_limit)
        } else {
            AccountQuery::unfiltered(self.inner.options.fetch_limit)
        }
    }

    /// Fetch the accounts of the current company with the current filters.
    ///
    /// Does nothing without a company. On failure the error message is stored
    /// in the state, previously loaded accounts are kept, and the error is
    /// also returned.
    pub async fn load_accounts(&self) -> CoreResult<()> {
        let inner = &*self.inner;

        let (company_id, query, request_id) = {
            let mut state = inner.write_state();
            let company_id = match state.company {
                Some(ref company) => company.id.clone(),
                None => return Ok(()),
            };
            let request_id = inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
            (company_id, self.query_for(&state.filters), request_id)
        };

        let _guard = LoadingGuard { inner, request_id };
        let context = ErrorContext::new("load_accounts")
            .with_request_id(request_id)
            .with_company(&company_id);
        log::debug!("Fetching accounts for {} (request {}): {:?}", company_id, request_id, query);

        let result = inner.service.get_accounts(&company_id, &query).await;

        let mut state = inner.write_state();
        if !inner.is_latest(request_id) {
            inner.logger.log_debug("Discarding stale accounts response", &context);
            return Ok(());
        }

        match result {
            Ok(page) => {
                log::debug!(
                    "Loaded {} accounts for {} (request {})",
                    page.data.len(),
                    company_id,
                    request_id
                );
                state.accounts = page.data;
                state.total = page.total;
                state.last_loaded_at = Some(Utc::now());
                Ok(())
            }
            Err(error) => {
                inner.logger.log_error(&error, &context);
                state.error = Some(error.user_message());
                Err(error)
            }
        }
    }

    /// Reload with the `refreshing` flag raised until the newest refresh ends
    pub async fn refresh(&self) -> CoreResult<()> {
        let refresh_id = self.inner.latest_refresh.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.write_state().refreshing = true;
        let _guard = RefreshGuard { inner: &*self.inner, refresh_id };
        self.load_accounts().await
    }

    // ==================== Company ====================

    /// Switch company. A company loads immediately; `None` clears the view
    /// and never fetches.
    pub async fn select_company(&self, company: Option<CompanyContext>) -> CoreResult<()> {
        self.inner.cancel_pending();
        {
            let mut state = self.inner.write_state();
            let same_company = match (&state.company, &company) {
                (Some(current), Some(next)) => current.id == next.id,
                _ => false,
            };
            // outstanding responses belong to the previous selection
            self.inner.latest_request.fetch_add(1, Ordering::SeqCst);
            if !same_company {
                state.accounts.clear();
                state.total = None;
                state.last_loaded_at = None;
            }
            state.loading = false;
            state.error = None;
            state.company = company;
        }

        match self.company() {
            Some(company) => {
                log::info!("Selected company {}", company.id);
                self.load_accounts().await
            }
            None => Ok(()),
        }
    }

    // ==================== Filters ====================

    pub fn set_search_term(&self, search_term: impl Into<String>) {
        let mut filters = self.filters();
        filters.search_term = search_term.into();
        self.set_filters(filters);
    }

    pub fn set_filter_type(&self, filter_type: impl Into<String>) {
        let mut filters = self.filters();
        filters.filter_type = filter_type.into();
        self.set_filters(filters);
    }

    pub fn set_show_inactive(&self, show_inactive: bool) {
        let mut filters = self.filters();
        filters.show_inactive = show_inactive;
        self.set_filters(filters);
    }

    /// Replace the filters; schedules a debounced fetch if anything changed
    pub fn set_filters(&self, filters: AccountFilters) {
        let has_company = {
            let mut state = self.inner.write_state();
            if state.filters == filters {
                return;
            }
            state.filters = filters;
            state.company.is_some()
        };

        if has_company && self.inner.options.server_filtering {
            self.schedule_reload();
        }
    }

    /// Start (or restart) the debounce timer for a fetch
    fn schedule_reload(&self) {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                log::warn!("No async runtime available; skipping debounced reload");
                return;
            }
        };

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let delay = self.inner.options.debounce;

        let mut pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                let view = AccountsViewModel { inner };
                // failures are already recorded in the state
                let _ = view.load_accounts().await;
            }
        }));
    }

    /// A debounced fetch is waiting or running
    pub fn has_pending_reload(&self) -> bool {
        let pending = self.inner.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().map_or(false, |handle| !handle.is_finished())
    }

    /// Cancel the pending debounced fetch and ignore any in-flight response
    pub fn shutdown(&self) {
        self.inner.cancel_pending();
        self.inner.latest_request.fetch_add(1, Ordering::SeqCst);
        self.inner.write_state().loading = false;
    }

    // ==================== Derived data ====================

    /// Loaded accounts narrowed by the current filters
    pub fn filtered_accounts(&self) -> Vec<Account> {
        let state = self.read_state();
        filter_accounts(&state.accounts, &state.filters)
    }

    /// Statistics over every loaded account
    pub fn account_stats(&self) -> AccountStats {
        AccountStats::compute(&self.read_state().accounts)
    }

    pub fn snapshot(&self) -> AccountsView {
        let reload_pending = self.has_pending_reload();
        let state = self.read_state();
        AccountsView {
            company: state.company.clone(),
            filters: state.filters.clone(),
            phase: state.phase(),
            loading: state.loading,
            refreshing: state.refreshing,
            error: state.error.clone(),
            accounts: filter_accounts(&state.accounts, &state.filters),
            stats: AccountStats::compute(&state.accounts),
            total: state.total,
            last_loaded_at: state.last_loaded_at,
            reload_pending,
        }
    }
}

// ==================== Tests ====================
