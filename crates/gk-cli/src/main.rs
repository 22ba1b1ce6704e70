//! Gatekeeper admin client - Entry Point

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use gk_cli::{AppConfig, Application};
use gk_console::{render_details, render_entry};
use tracing::info;

/// Remote administration for Gatekeeper game servers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via GATEKEEPER_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "GATEKEEPER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Server address (host:port)
        #[arg(short, long)]
        server: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show or set the server address (host:port)
    Server { address: Option<String> },
    /// Execute a server command
    Exec {
        #[arg(required = true, trailing_var_arg = true)]
        command: Vec<String>,
    },
    /// List online players
    Players,
    /// Show player details
    Player { id: String },
    /// Kick a player
    Kick {
        id: String,
        #[arg(required = true, trailing_var_arg = true)]
        reason: Vec<String>,
    },
    /// Send a private message to a player
    Msg {
        id: String,
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Show server uptime
    Health,
    /// Follow the live server log
    Logs,
    /// Interactive dashboard: live log, command prompt, roster and uptime
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any connection)
    gk_ws::init_crypto();

    let args = Args::parse();

    gk_telemetry::init_logging()?;

    info!("Starting gatekeeper v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > GATEKEEPER_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("GATEKEEPER_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = AppConfig::load(&config_path)?;
    info!(config_path = %config_path, session = %config.session_path.display(), "Configuration loaded");

    let app = Application::new(config)?;

    match args.command {
        Command::Login {
            username,
            password,
            server,
        } => {
            let Some(password) = password else {
                bail!("Password required: pass --password or set GATEKEEPER_PASSWORD");
            };
            app.login(&username, &password, server.as_deref()).await?;
            println!("Logged in to {}", app.server_address());
        }
        Command::Logout => {
            app.logout().await?;
            println!("Logged out");
        }
        Command::Server { address } => {
            if let Some(address) = address {
                app.set_server_address(&address).await?;
            }
            println!("{}", app.server_address());
        }
        Command::Exec { command } => {
            let entry = app.exec(&command.join(" ")).await?;
            println!("{}", render_entry(&entry));
            if !entry.success {
                std::process::exit(1);
            }
        }
        Command::Players => {
            println!("{}", app.players().await?.render());
        }
        Command::Player { id } => {
            let panel = app.player(&id).await?;
            println!("{}", render_details(panel.details()));
        }
        Command::Kick { id, reason } => {
            app.kick(&id, &reason.join(" ")).await?;
            println!("Kicked {id}");
        }
        Command::Msg { id, message } => {
            app.message(&id, &message.join(" ")).await?;
            println!("Message sent to {id}");
        }
        Command::Health => {
            println!("{}", app.health().await?);
        }
        Command::Logs => app.follow_logs().await?,
        Command::Dashboard => app.dashboard().await?,
    }

    Ok(())
}
