//! Dashboard shell.
//!
//! Owns the controllers and the background tasks that feed them:
//!
//! ```text
//! mount()
//!   ├─ LogStreamClient::connect()  ──mpsc──▶  LogView::run()
//!   ├─ roster poller  (every roster_interval)  ─▶ PlayerRoster::refresh()
//!   └─ health poller  (every health_interval)  ─▶ HealthBadge::refresh()
//! unmount() / logout()
//!   └─ cancel all of the above
//! ```

use crate::ansi::AnsiMode;
use crate::command::CommandConsole;
use crate::error::{ShellError, ShellResult};
use crate::health::HealthBadge;
use crate::log_buffer::DEFAULT_LOG_CAPACITY;
use crate::log_view::LogView;
use crate::poller::spawn_poller;
use crate::roster::PlayerRoster;
use gk_api::GatekeeperClient;
use gk_session::SessionManager;
use gk_ws::{LogStreamClient, LogStreamConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const LOG_EVENT_BUFFER: usize = 1024;

/// Shell configuration.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub log_stream: LogStreamConfig,
    pub log_capacity: usize,
    pub ansi: AnsiMode,
    pub roster_interval: Duration,
    pub health_interval: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_stream: LogStreamConfig::default(),
            log_capacity: DEFAULT_LOG_CAPACITY,
            ansi: AnsiMode::default(),
            roster_interval: Duration::from_secs(5),
            health_interval: Duration::from_secs(60),
        }
    }
}

struct Mounted {
    cancel: CancellationToken,
    stream: Arc<LogStreamClient>,
    stream_task: JoinHandle<()>,
    view_task: JoinHandle<()>,
    pollers: Vec<JoinHandle<()>>,
}

pub struct DashboardShell {
    manager: Arc<SessionManager>,
    config: ShellConfig,
    console: Arc<CommandConsole>,
    roster: Arc<PlayerRoster>,
    health: Arc<HealthBadge>,
    log_view: Arc<LogView>,
    mounted: Mutex<Option<Mounted>>,
}

impl DashboardShell {
    /// `client` must share `manager`'s session.
    pub fn new(manager: Arc<SessionManager>, client: GatekeeperClient, config: ShellConfig) -> Self {
        Self {
            console: Arc::new(CommandConsole::new(client.clone())),
            roster: Arc::new(PlayerRoster::new(client.clone())),
            health: Arc::new(HealthBadge::new(client)),
            log_view: Arc::new(LogView::new(config.log_capacity, config.ansi)),
            manager,
            config,
            mounted: Mutex::new(None),
        }
    }

    pub fn console(&self) -> &Arc<CommandConsole> {
        &self.console
    }

    pub fn roster(&self) -> &Arc<PlayerRoster> {
        &self.roster
    }

    pub fn health(&self) -> &Arc<HealthBadge> {
        &self.health
    }

    pub fn log_view(&self) -> &Arc<LogView> {
        &self.log_view
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.lock().is_some()
    }

    /// Start the log stream and pollers.
    pub fn mount(&self) -> ShellResult<()> {
        self.mount_with(|_| {})
    }

    /// Like [`mount`](Self::mount), calling `on_line` for every log line
    /// appended to the view.
    ///
    /// Fails with [`ShellError::NotAuthenticated`] when logged out. Mounting
    /// twice is a no-op.
    pub fn mount_with<F>(&self, on_line: F) -> ShellResult<()>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let session = self.manager.handle();
        if !session.is_authenticated() {
            warn!("Dashboard requires login");
            return Err(ShellError::NotAuthenticated);
        }

        let mut mounted = self.mounted.lock();
        if mounted.is_some() {
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let (event_tx, event_rx) = mpsc::channel(LOG_EVENT_BUFFER);

        let stream = Arc::new(LogStreamClient::new(
            self.config.log_stream.clone(),
            session,
            event_tx,
        ));
        let runner = stream.clone();
        let stream_task = tokio::spawn(async move {
            if let Err(e) = runner.connect().await {
                error!(error = %e, "Log stream stopped");
            }
        });

        let view = self.log_view.clone();
        let view_cancel = cancel.clone();
        let view_task = tokio::spawn(async move {
            view.run(event_rx, view_cancel, on_line).await;
        });

        let roster = self.roster.clone();
        let roster_poller = spawn_poller(
            "roster",
            self.config.roster_interval,
            cancel.clone(),
            move || {
                let roster = roster.clone();
                async move {
                    roster.refresh().await;
                }
            },
        );

        let health = self.health.clone();
        let health_poller = spawn_poller(
            "health",
            self.config.health_interval,
            cancel.clone(),
            move || {
                let health = health.clone();
                async move {
                    health.refresh().await;
                }
            },
        );

        *mounted = Some(Mounted {
            cancel,
            stream,
            stream_task,
            view_task,
            pollers: vec![roster_poller, health_poller],
        });
        info!("Dashboard mounted");
        Ok(())
    }

    /// Stop every background task. Waits for the log socket to close.
    ///
    /// Poll requests already in flight finish in the background.
    pub async fn unmount(&self) {
        let Some(mounted) = self.mounted.lock().take() else {
            return;
        };

        mounted.cancel.cancel();
        mounted.stream.shutdown();

        if let Err(e) = mounted.stream_task.await {
            warn!(error = %e, "Log stream task failed");
        }
        if let Err(e) = mounted.view_task.await {
            warn!(error = %e, "Log view task failed");
        }
        drop(mounted.pollers);
        info!("Dashboard unmounted");
    }

    /// Tear down and end the session.
    pub async fn logout(&self) -> ShellResult<()> {
        self.unmount().await;
        self.roster.close_detail();
        self.log_view.clear();
        self.manager.run_blocking(|m| m.end()).await?;
        info!("Logged out");
        Ok(())
    }
}
