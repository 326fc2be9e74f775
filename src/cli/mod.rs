//! CLI command implementations for infractl.
//!
//! Provides subcommand handlers for:
//! - `infractl serve`: run the embedded dashboard shell
//! - `infractl status` / `infractl watch`: terminal report of the backend status
//! - `infractl domain add|rename|delete` and `infractl user add|delete`
//! - `infractl events`: read back the JSONL event log
//! - `infractl theme`: show or change the dashboard theme
//! - `infractl config show|init|set|reset|path`: configuration management

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use crate::api::{CommandOutcome, DomainCommand, UserCommand};
use crate::config;
use crate::events::{EventEntry, EventLog};
use crate::model::{Cluster, Server, User, Website};
use crate::poller::{Connection, PollOutcome, relative_time};
use crate::prefs::{Prefs, PrefsStore, Theme};
use crate::render::websites::format_latency;
use crate::render::{UsageClass, usage_class};
use crate::state::{AppState, Dashboard};

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// infractl serve
// ---------------------------------------------------------------------------

/// Run the dashboard shell until interrupted.
pub fn run_serve(listen: Option<String>, no_browser: bool) -> Result<()> {
    let cfg = config::load();
    let addr = listen.unwrap_or_else(|| cfg.dashboard.listen.clone());
    let open = cfg.dashboard.open_browser && !no_browser;

    println!(
        "  {} {}",
        "Backend:".bold(),
        cfg.backend.url.as_str().dimmed()
    );
    let dashboard = Arc::new(Dashboard::from_config(&cfg));
    crate::web::serve(dashboard, &addr, open)
}

// ---------------------------------------------------------------------------
// infractl status | watch
// ---------------------------------------------------------------------------

/// Poll once and print the result.
pub fn run_status(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let dashboard = Dashboard::from_config(&cfg);

    if let PollOutcome::Failed { error, .. } = dashboard.poll_now() {
        anyhow::bail!("could not reach {}: {}", cfg.backend.url, error);
    }

    match format {
        OutputFormat::Json => dashboard.with_state(|state| -> Result<()> {
            let snapshot = state.snapshot.clone().unwrap_or_default();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        })?,
        OutputFormat::Table => dashboard.with_state(print_report),
    }

    Ok(())
}

/// Keep polling on the fixed interval, reprinting the report after each poll.
pub fn run_watch() -> Result<()> {
    let cfg = config::load();
    let dashboard = Dashboard::from_config(&cfg);
    let stop = AtomicBool::new(false);

    dashboard.run(&stop, |outcome| {
        if matches!(outcome, PollOutcome::Skipped) {
            return;
        }
        // Clear screen, cursor home.
        print!("\x1B[2J\x1B[H");
        dashboard.with_state(print_report);
        println!();
        println!("{}", "Press Ctrl+C to stop.".dimmed());
    });

    Ok(())
}

fn print_report(state: &AppState) {
    let now = chrono::Utc::now();
    println!("{}", "InfraControl Status".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {} {}   {} {}",
        "Connection:".bold(),
        colorize_connection(state.connection),
        "Updated:".bold(),
        relative_time(state.last_success, now),
    );
    if let Some(err) = &state.last_error {
        println!("  {} {}", "Last error:".bold(), err.red());
    }
    println!();

    let Some(snapshot) = &state.snapshot else {
        println!("{}", "No status received yet.".yellow());
        return;
    };

    if let Some(servers) = &snapshot.servers {
        print_servers(servers);
    }
    if let Some(cluster) = &snapshot.cluster {
        print_cluster(cluster);
    }
    if let Some(websites) = &snapshot.websites {
        print_websites(websites);
    }
    if snapshot.alerts.is_some() {
        let active = state.active_alerts();
        println!("{}", "Alerts".bold().cyan());
        if active.is_empty() {
            println!("  {}", "No active alerts".dimmed());
        }
        for alert in active {
            println!("  {} {}", "!".red().bold(), alert.msg);
        }
        println!();
    }
    if let Some(users) = &snapshot.users {
        print_users(users);
    }
}

fn print_servers(servers: &[Server]) {
    println!("{}", "Servers".bold().cyan());
    println!(
        "  {:<18} {:<16} {:<8} {:>6} {:>6} {:>6}  Uptime",
        "Host", "IP", "Status", "CPU", "RAM", "Disk"
    );
    println!("  {}", "-".repeat(72));
    for s in servers {
        let status = if s.status.is_online() {
            "online".green()
        } else {
            "offline".red()
        };
        println!(
            "  {:<18} {:<16} {:<8} {} {} {}  {}",
            truncate(&s.hostname, 18),
            s.ip,
            status,
            colorize_usage(&s.cpu, 6),
            colorize_usage(&s.ram, 6),
            colorize_usage(&s.disk, 6),
            s.uptime.dimmed(),
        );
    }
    println!();
}

fn print_cluster(cluster: &Cluster) {
    println!("{}", "Cluster".bold().cyan());
    let health = if cluster.quorum {
        cluster.health_status.green()
    } else {
        cluster.health_status.red()
    };
    println!("  {} {}", "Health:     ".bold(), health);
    println!("  {} {}", "Cluster IP: ".bold(), cluster.cluster_ip);
    println!("  {} {}", "Shared load:".bold(), cluster.shared_load);
    println!("  {} {}", "Primary:    ".bold(), cluster.primary_node);
    println!(
        "  {} corosync={} pacemaker={} pcsd={}",
        "Services:   ".bold(),
        cluster.services.corosync,
        cluster.services.pacemaker,
        cluster.services.pcsd,
    );
    println!();
}

fn print_websites(websites: &[Website]) {
    println!("{}", "Websites".bold().cyan());
    println!(
        "  {:<28} {:<8} {:>10} {:>8} {:>8}",
        "Domain", "Status", "Latency", "Users", "RPM"
    );
    println!("  {}", "-".repeat(66));
    for (i, w) in websites.iter().enumerate() {
        let line = format!(
            "  {:<28} {:<8} {:>10} {:>8} {:>8}",
            truncate(&w.domain, 28),
            if w.status.is_online() { "online" } else { "offline" },
            format_latency(w.latency),
            w.connections,
            w.rpm,
        );
        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();
}

fn print_users(users: &[User]) {
    println!("{}", "Users".bold().cyan());
    for u in users {
        println!("  {:<20} {}", u.username, u.role.dimmed());
    }
    println!();
}

// ---------------------------------------------------------------------------
// infractl domain | user
// ---------------------------------------------------------------------------

/// Send a domain mutation and report the outcome.
pub fn run_domain(command: DomainCommand) -> Result<()> {
    let dashboard = admin_dashboard("domains")?;
    let outcome = dashboard.run_domain(&command);
    report_outcome(&command.describe(), &outcome)
}

/// Send a user mutation and report the outcome.
pub fn run_user(command: UserCommand) -> Result<()> {
    let dashboard = admin_dashboard("users")?;
    let outcome = dashboard.run_user(&command);
    report_outcome(&command.describe(), &outcome)
}

fn admin_dashboard(resource: &str) -> Result<Dashboard> {
    let cfg = config::load();
    if !cfg.session.role.is_admin() {
        anyhow::bail!(
            "session role is {}; viewer sessions cannot manage {resource}",
            cfg.session.role
        );
    }
    Ok(Dashboard::from_config(&cfg))
}

fn report_outcome(what: &str, outcome: &CommandOutcome) -> Result<()> {
    if outcome.success {
        println!("{} {}", "✓".green().bold(), what);
        return Ok(());
    }
    let message = outcome.message.as_deref().unwrap_or("request failed");
    println!("{} {}", "✗".red().bold(), what);
    anyhow::bail!("{message}")
}

// ---------------------------------------------------------------------------
// infractl events
// ---------------------------------------------------------------------------

/// Print the most recent entries of the event log.
pub fn run_events(limit: usize, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let log = EventLog::from_config(&cfg.logging);
    let entries = log.read_recent(limit);

    if entries.is_empty() {
        println!(
            "{}",
            "No events yet. Run `infractl status` or `infractl serve` to record some.".yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Table => print_events_table(&entries),
    }
    Ok(())
}

fn print_events_table(entries: &[EventEntry]) {
    println!("{}", "infractl Events".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {:<20} {:<8} {:>3} {:>8}  Detail",
        "Time", "Kind", "OK", "Latency"
    );
    println!("  {}", "-".repeat(58));
    for e in entries {
        let ok = if e.success { "✓".green() } else { "✗".red() };
        let latency = e.latency_ms.map(|ms| format!("{ms}ms")).unwrap_or_default();
        println!(
            "  {:<20} {:<8} {:>3} {:>8}  {}",
            truncate(&e.timestamp, 19),
            e.kind.to_string(),
            ok,
            latency,
            e.detail,
        );
    }
}

// ---------------------------------------------------------------------------
// infractl theme
// ---------------------------------------------------------------------------

/// Show the theme, set it, or `toggle` it.
pub fn run_theme(choice: Option<&str>) -> Result<()> {
    let store = PrefsStore::default_location();
    let current = store.load().theme;

    let theme = match choice {
        None => {
            println!("{} {}", "Theme:".bold(), current);
            return Ok(());
        }
        Some("toggle") => current.toggled(),
        Some(name) => Theme::parse(name)
            .with_context(|| format!("unknown theme `{name}` (expected dark, light or toggle)"))?,
    };

    store.save(&Prefs { theme })?;
    println!("{} Theme set to {}", "✓".green().bold(), theme.as_str().bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// infractl config show | init | set | reset | path
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective infractl Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.infractl/config.toml", global_exists);
    print_source(".infractl.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "INFRACTL_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.infractl/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit [backend] url to point at your server.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Print where configuration, preferences and events live.
pub fn run_config_path() -> Result<()> {
    let cfg = config::load();
    let show = |label: &str, path: Option<std::path::PathBuf>| match path {
        Some(p) => println!("  {} {}", label.bold(), p.display()),
        None => println!("  {} {}", label.bold(), "(unavailable)".dimmed()),
    };
    show("Global config: ", config::global_config_file());
    show("Project config:", config::project_config_file());
    show("Preferences:   ", PrefsStore::default_location().path().cloned());
    show(
        "Event log:     ",
        EventLog::from_config(&cfg.logging).path().map(|p| p.to_path_buf()),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Right-align a usage value and color it by its class.
fn colorize_usage(value: &str, width: usize) -> ColoredString {
    let padded = format!("{value:>width$}");
    match usage_class(value) {
        UsageClass::High => padded.red().bold(),
        UsageClass::Med => padded.yellow(),
        UsageClass::Low => padded.green(),
    }
}

fn colorize_connection(connection: Connection) -> ColoredString {
    match connection {
        Connection::Healthy => connection.label().green(),
        Connection::Unhealthy => connection.label().red(),
        Connection::Connecting => connection.label().yellow(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("ünïcödé", 4), "ünï…");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn usage_color_keeps_value_text() {
        colored::control::set_override(false);
        assert_eq!(colorize_usage("95%", 5).to_string(), "  95%");
        assert_eq!(colorize_usage("n/a", 3).to_string(), "n/a");
    }
}
