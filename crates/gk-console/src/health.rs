//! Server uptime badge.

use gk_api::GatekeeperClient;
use gk_core::format_uptime;
use gk_telemetry::Metrics;
use parking_lot::RwLock;
use tracing::{debug, warn};

const LOADING: &str = "Loading...";
const ERROR: &str = "Error";

pub struct HealthBadge {
    client: GatekeeperClient,
    text: RwLock<String>,
}

impl HealthBadge {
    pub fn new(client: GatekeeperClient) -> Self {
        Self {
            client,
            text: RwLock::new(LOADING.to_string()),
        }
    }

    /// Poll `/health`. Skipped without a session token.
    pub async fn refresh(&self) {
        if !self.client.session().is_authenticated() {
            debug!("No session token, skipping health check");
            return;
        }

        let result = self.client.server_health().await;
        Metrics::api_request("health", result.is_ok());

        let text = match result {
            Ok(health) => format_uptime(health.uptime_secs()),
            Err(e) => {
                warn!(error = %e, "Health check failed");
                ERROR.to_string()
            }
        };
        *self.text.write() = text;
    }

    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    pub fn render(&self) -> String {
        format!("Server Uptime: {}", self.text.read())
    }
}
