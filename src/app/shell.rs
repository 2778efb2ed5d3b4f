//! Session-gated access to the dashboard
//!
//! The dashboard only exists while the session is logged in. Logging in
//! creates a fresh dashboard with the configured defaults and its first
//! load request; logging out drops it together with its view state.

use crate::app::dashboard::{Dashboard, Generation, LoadRequest};
use crate::app::session::{SessionGate, SessionState};
use crate::app::table::{ExportOrder, PageSize, ViewState};
use crate::errors::{AuthError, AuthResult};

/// Defaults for a freshly opened dashboard
#[derive(Debug, Clone)]
pub struct DashboardDefaults {
    pub query: String,
    pub page_size: PageSize,
    pub export_order: ExportOrder,
}

impl Default for DashboardDefaults {
    fn default() -> Self {
        let view = ViewState::default();
        Self {
            query: view.query,
            page_size: view.page_size,
            export_order: ExportOrder::default(),
        }
    }
}

/// Session gate plus the dashboard it guards
#[derive(Debug, Default)]
pub struct Shell {
    gate: SessionGate,
    dashboard: Option<Dashboard>,
    defaults: DashboardDefaults,
    /// Last generation issued by any dashboard of this shell
    last_generation: Generation,
}

impl Shell {
    /// Creates a logged-out shell
    pub fn new(defaults: DashboardDefaults) -> Self {
        Self {
            gate: SessionGate::new(),
            dashboard: None,
            defaults,
            last_generation: 0,
        }
    }

    /// Try to log in; on success returns the dashboard's first load
    ///
    /// On failure the gate queues a notice, see [`Shell::take_notice`].
    pub fn login(&mut self, username: &str, password: &str) -> Option<LoadRequest> {
        self.close_dashboard();
        if !self.gate.attempt_login(username, password) {
            return None;
        }

        let view = ViewState::with_defaults(self.defaults.query.clone(), self.defaults.page_size);
        let mut dashboard = Dashboard::new(view, self.defaults.export_order)
            .with_generation(self.last_generation);
        let request = dashboard.reload();
        self.dashboard = Some(dashboard);
        Some(request)
    }

    /// Log out and discard the dashboard
    pub fn logout(&mut self) {
        self.gate.logout();
        self.close_dashboard();
    }

    fn close_dashboard(&mut self) {
        if let Some(dashboard) = self.dashboard.take() {
            self.last_generation = dashboard.generation();
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.gate.state()
    }

    /// Pop the oldest pending notice
    pub fn take_notice(&mut self) -> Option<String> {
        self.gate.take_notice()
    }

    /// Whether a notice is waiting to be shown
    pub fn has_notice(&self) -> bool {
        self.gate.has_notice()
    }

    /// The dashboard, if logged in
    pub fn dashboard(&self) -> AuthResult<&Dashboard> {
        self.gate.require_login()?;
        self.dashboard.as_ref().ok_or(AuthError::NotLoggedIn)
    }

    /// Mutable dashboard, if logged in
    pub fn dashboard_mut(&mut self) -> AuthResult<&mut Dashboard> {
        self.gate.require_login()?;
        self.dashboard.as_mut().ok_or(AuthError::NotLoggedIn)
    }
}
