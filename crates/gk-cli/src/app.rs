//! Application orchestration.
//!
//! One `Application` per process. It owns the session manager and the REST
//! client; every subcommand is a method here.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use gk_api::GatekeeperClient;
use gk_console::{
    render_entry, CommandConsole, DashboardShell, HealthBadge, LogView, PlayerDetailPanel,
    PlayerRoster, RosterView,
};
use gk_core::{CommandHistoryEntry, PlayerId};
use gk_session::{AuthToken, FileSessionStore, SessionManager};
use gk_ws::LogStreamClient;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub struct Application {
    config: AppConfig,
    manager: Arc<SessionManager>,
    client: GatekeeperClient,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = FileSessionStore::new(&config.session_path);
        let manager = Arc::new(SessionManager::open(Arc::new(store))?);
        let client = GatekeeperClient::new(manager.handle(), config.api.clone())?;

        Ok(Self {
            config,
            manager,
            client,
        })
    }

    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    fn parse_player(id: &str) -> AppResult<PlayerId> {
        PlayerId::new(id).map_err(|e| AppError::InvalidInput(e.to_string()))
    }

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Log in and persist the token. `server` replaces the stored address first.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        server: Option<&str>,
    ) -> AppResult<()> {
        if let Some(server) = server {
            self.set_server_address(server).await?;
        }

        let token = AuthToken::new(self.client.login(username, password).await?)?;
        self.manager.run_blocking(move |m| m.begin(token)).await?;
        info!(username, server = %self.manager.handle().server_address(), "Logged in");
        Ok(())
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.manager.run_blocking(|m| m.end()).await?;
        Ok(())
    }

    pub fn server_address(&self) -> String {
        self.manager.handle().server_address()
    }

    pub async fn set_server_address(&self, address: &str) -> AppResult<()> {
        let address = address.to_string();
        self.manager
            .run_blocking(move |m| m.set_server_address(&address))
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // One-shot commands
    // ------------------------------------------------------------------------

    pub async fn exec(&self, command: &str) -> AppResult<CommandHistoryEntry> {
        CommandConsole::new(self.client.clone())
            .submit(command)
            .await
            .ok_or_else(|| AppError::InvalidInput("empty command".to_string()))
    }

    pub async fn players(&self) -> AppResult<RosterView> {
        self.manager.handle().require_token()?;
        Ok(PlayerRoster::new(self.client.clone()).refresh().await)
    }

    pub async fn player(&self, id: &str) -> AppResult<Arc<PlayerDetailPanel>> {
        self.manager.handle().require_token()?;
        let id = Self::parse_player(id)?;
        PlayerRoster::new(self.client.clone())
            .select(&id)
            .await
            .ok_or_else(|| AppError::PlayerNotFound(id.to_string()))
    }

    pub async fn kick(&self, id: &str, reason: &str) -> AppResult<()> {
        let panel = self.player(id).await?;
        if !panel.kick(reason).await? {
            return Err(AppError::InvalidInput("kick reason is empty".to_string()));
        }
        Ok(())
    }

    pub async fn message(&self, id: &str, message: &str) -> AppResult<()> {
        let panel = self.player(id).await?;
        if !panel.send_message(message).await? {
            return Err(AppError::InvalidInput("message is empty".to_string()));
        }
        Ok(())
    }

    pub async fn health(&self) -> AppResult<String> {
        self.manager.handle().require_token()?;
        let badge = HealthBadge::new(self.client.clone());
        badge.refresh().await;
        Ok(badge.render())
    }

    // ------------------------------------------------------------------------
    // Long-running views
    // ------------------------------------------------------------------------

    /// Follow the live log until Ctrl-C.
    pub async fn follow_logs(&self) -> AppResult<()> {
        let session = self.manager.handle();
        session.require_token()?;

        let (event_tx, event_rx) = mpsc::channel(1024);
        let stream = Arc::new(LogStreamClient::new(
            self.config.log_stream.clone(),
            session,
            event_tx,
        ));
        let view = LogView::new(self.config.log.capacity, self.config.log.ansi);
        let cancel = CancellationToken::new();

        let runner = stream.clone();
        let stream_task = tokio::spawn(async move { runner.connect().await });

        tokio::select! {
            () = view.run(event_rx, cancel.clone(), |line| println!("{line}")) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, closing log stream");
            }
        }
        info!(status = %view.status_text(), lines = view.len(), "Log stream stopped");

        cancel.cancel();
        stream.shutdown();
        match stream_task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(e) => {
                error!(error = %e, "Log stream task failed");
                Ok(())
            }
        }
    }

    /// Dashboard shell wired to this application's session and config.
    pub fn dashboard_shell(&self) -> DashboardShell {
        DashboardShell::new(
            self.manager.clone(),
            self.client.clone(),
            self.config.shell_config(),
        )
    }

    /// Interactive dashboard.
    ///
    /// Log lines stream to stdout. Each stdin line is submitted as a command;
    /// lines starting with `:` (`:players`, `:health`, `:status`, `:history`,
    /// `:logout`, `:quit`) are handled locally.
    pub async fn dashboard(&self) -> AppResult<()> {
        let shell = self.dashboard_shell();

        shell.mount_with(|line| println!("{line}"))?;
        println!("Connected to {}. Type :quit to exit.", self.server_address());

        self.run_dashboard(&shell, BufReader::new(tokio::io::stdin()))
            .await
    }

    /// Drive a mounted shell from `input` until EOF, `:quit`, `:logout`,
    /// Ctrl-C or a read error. The shell is unmounted on every exit.
    pub async fn run_dashboard<R>(&self, shell: &DashboardShell, input: R) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let outcome = loop {
            let line = tokio::select! {
                line = lines.next_line() => line,
                _ = tokio::signal::ctrl_c() => Ok(None),
            };
            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => break Ok(()),
                Err(e) => {
                    error!(error = %e, "Failed to read dashboard input");
                    break Err(AppError::Io(e));
                }
            };

            match line.trim() {
                ":quit" => break Ok(()),
                ":logout" => {
                    shell.logout().await?;
                    println!("Logged out.");
                    return Ok(());
                }
                ":players" => println!("{}", shell.roster().view().render()),
                ":health" => println!("{}", shell.health().render()),
                ":status" => println!("{}", shell.log_view().status_text()),
                ":history" => {
                    for entry in shell.console().history() {
                        println!("{}", render_entry(&entry));
                    }
                }
                _ => {
                    if let Some(entry) = shell.console().submit(&line).await {
                        println!("{}", render_entry(&entry));
                    }
                }
            }
        };

        shell.unmount().await;
        if !self.manager.handle().is_authenticated() {
            warn!("Session ended while the dashboard was open");
        }
        outcome
    }
}
