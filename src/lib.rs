use std::sync::Arc;

// --- Module Structure ---

// Navigation: route table, guard and history.
pub mod guard;
pub mod navigation;
pub mod navigator;
pub mod routes;

// Session, password prompt and user-facing alerts.
pub mod auth;
pub mod notify;

// Backend access and deployment polling.
pub mod api;
pub mod config;
pub mod models;
pub mod version;

// --- Public Re-exports ---

pub use api::{ApiClient, ApiError};
pub use auth::{AuthContext, MemorySessionStore, PasswordGate, PromptState, SessionState};
pub use config::AppConfig;
pub use guard::{GuardDecision, NavigationGuard};
pub use navigation::{Location, NavigationTarget};
pub use navigator::{NavigationError, NavigationOutcome, Navigator};
pub use notify::NotifierState;
pub use routes::{RouteError, RouteTable};

/// AppState
///
/// Long-lived services shared by every navigator instance. A reload rebuilds the
/// navigator from this state, so the session (and its admin flag) survives it.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: SessionState,
    pub prompt: PromptState,
    pub notifier: NotifierState,
}

/// create_guard
///
/// Wires the default rule chain to the session, prompt and notifier.
pub fn create_guard(state: &AppState) -> NavigationGuard {
    let gate = PasswordGate::new(
        state.prompt.clone(),
        state.config.admin_secret.clone(),
        state.config.prompt_timeout,
    );
    NavigationGuard::new(
        AuthContext::new(state.session.clone()),
        gate,
        state.notifier.clone(),
    )
}

/// create_navigator
///
/// Builds the route table and a navigator with an empty history.
pub fn create_navigator(state: &AppState) -> Result<Navigator, RouteError> {
    let table = Arc::new(routes::route_table()?);
    tracing::debug!(routes = table.names().len(), "route table built");
    Ok(Navigator::new(table, create_guard(state)))
}

pub fn create_api_client(state: &AppState) -> Result<ApiClient, ApiError> {
    ApiClient::new(&state.config, state.notifier.clone())
}
