use anyhow::Result;
use clap::{Parser, Subcommand};

use infractl::api::{DomainCommand, UserCommand};
use infractl::cli;

#[derive(Debug, Parser)]
#[command(name = "infractl")]
#[command(about = "Client for the InfraControl infrastructure dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the dashboard locally and poll the backend in the background
    Serve {
        /// Address to listen on (default: dashboard.listen)
        #[arg(long)]
        listen: Option<String>,
        /// Do not open a browser window
        #[arg(long)]
        no_browser: bool,
    },
    /// Poll the backend once and print the status
    Status {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Poll continuously and redraw the status in the terminal
    Watch,
    /// Manage monitored domains
    Domain {
        #[command(subcommand)]
        action: DomainAction,
    },
    /// Manage dashboard users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Show recent poll and command events
    Events {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show or change the dashboard theme: dark, light, toggle
    Theme { choice: Option<String> },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum DomainAction {
    /// Add a domain
    Add { domain: String },
    /// Rename a domain
    Rename { old_name: String, new_name: String },
    /// Delete a domain
    Delete { domain: String },
}

#[derive(Debug, Subcommand)]
enum UserAction {
    /// Add a user
    Add {
        username: String,
        /// Role to grant
        #[arg(long, default_value = "Viewer")]
        role: String,
    },
    /// Delete a user
    Delete { username: String },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.infractl/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `backend.url http://10.0.0.5:5000`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
    /// Print config, preference and event log locations
    Path,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { listen, no_browser } => cli::run_serve(listen, no_browser),
        Commands::Status { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_status(fmt)
        }
        Commands::Watch => cli::run_watch(),
        Commands::Domain { action } => cli::run_domain(match action {
            DomainAction::Add { domain } => DomainCommand::Create { domain },
            DomainAction::Rename { old_name, new_name } => {
                DomainCommand::Rename { old_name, new_name }
            }
            DomainAction::Delete { domain } => DomainCommand::Delete { domain },
        }),
        Commands::User { action } => cli::run_user(match action {
            UserAction::Add { username, role } => UserCommand::Create { username, role },
            UserAction::Delete { username } => UserCommand::Delete { username },
        }),
        Commands::Events { limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_events(limit, fmt)
        }
        Commands::Theme { choice } => cli::run_theme(choice.as_deref()),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
            ConfigAction::Path => cli::run_config_path(),
        },
    }
}
