//! Client configuration

use crate::sync::Viewer;
use std::time::Duration;

/// Client configuration for connecting to the restaurant backend
///
/// Poll intervals default to what the dashboards use in production:
/// kitchen and staff screens refresh every 5 seconds, the admin overview
/// every 50 seconds, and elapsed-time displays tick once per second.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Poll interval for the kitchen status board
    pub kitchen_poll_interval: Duration,

    /// Poll interval for the staff order-taking screen
    pub staff_poll_interval: Duration,

    /// Poll interval for the admin dashboard
    pub admin_poll_interval: Duration,

    /// Elapsed-time recomputation cadence
    pub elapsed_tick: Duration,

    /// How many polling cycles an unconfirmed optimistic transition
    /// survives before yielding to the server snapshot
    pub max_pending_polls: u32,
}

impl ClientConfig {
    /// Create a new configuration with default intervals
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            kitchen_poll_interval: Duration::from_secs(5),
            staff_poll_interval: Duration::from_secs(5),
            admin_poll_interval: Duration::from_secs(50),
            elapsed_tick: Duration::from_secs(1),
            max_pending_polls: 3,
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Override the poll interval for one viewer
    pub fn with_poll_interval(mut self, viewer: Viewer, interval: Duration) -> Self {
        match viewer {
            Viewer::Kitchen => self.kitchen_poll_interval = interval,
            Viewer::Staff => self.staff_poll_interval = interval,
            Viewer::Admin => self.admin_poll_interval = interval,
        }
        self
    }

    /// Override the elapsed-time tick
    pub fn with_elapsed_tick(mut self, tick: Duration) -> Self {
        self.elapsed_tick = tick;
        self
    }

    /// Override the optimistic-retention window
    pub fn with_max_pending_polls(mut self, polls: u32) -> Self {
        self.max_pending_polls = polls;
        self
    }

    /// Poll interval for a viewer
    pub fn poll_interval(&self, viewer: Viewer) -> Duration {
        match viewer {
            Viewer::Kitchen => self.kitchen_poll_interval,
            Viewer::Staff => self.staff_poll_interval,
            Viewer::Admin => self.admin_poll_interval,
        }
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::HttpClient> {
        crate::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
