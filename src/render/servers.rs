//! Server cards and console links.

use crate::model::Server;

use super::Patch;
use super::markup::{escape, safe_href, status_dot, usage_class};

pub const SERVERS_GRID: &str = "grid-servers";
pub const CONSOLE_GRID: &str = "cockpit-grid";

/// `grid-servers`: one telemetry card per server.
pub fn render_servers(servers: Option<&[Server]>) -> Vec<Patch> {
    let Some(servers) = servers else {
        return Vec::new();
    };
    let html: String = servers.iter().map(server_card).collect();
    vec![Patch::html(SERVERS_GRID, html)]
}

fn server_card(s: &Server) -> String {
    format!(
        r#"<div class="card"><div class="card-title"><span><i class="fa-solid fa-server"></i> {hostname}</span><span class="status-dot {dot}"></span></div>{ip}{uptime}{cpu}{ram}{disk}</div>"#,
        hostname = escape(&s.hostname),
        dot = status_dot(s.status),
        ip = metric("fa-network-wired", "IP", &s.ip, None),
        uptime = metric("fa-clock-rotate-left", "Uptime", &s.uptime, None),
        cpu = metric("fa-microchip", "CPU", &s.cpu, Some(usage_class(&s.cpu).css())),
        ram = metric("fa-memory", "RAM", &s.ram, Some(usage_class(&s.ram).css())),
        disk = metric("fa-hard-drive", "Disk", &s.disk, Some(usage_class(&s.disk).css())),
    )
}

/// One labelled value row, shared with the cluster mirror cards.
pub(super) fn metric(icon: &str, label: &str, value: &str, class: Option<&str>) -> String {
    let value_class = match class {
        Some(c) => format!("usage-value {c}"),
        None => "usage-value".to_string(),
    };
    format!(
        r#"<div class="metric-item"><i class="fa-solid {icon}"></i> <span class="text-muted">{label}</span> <span class="{value_class}">{value}</span></div>"#,
        value = escape(value),
    )
}

/// `cockpit-grid`: console entry points, one per server.
pub fn render_console_links(servers: Option<&[Server]>) -> Vec<Patch> {
    let Some(servers) = servers else {
        return Vec::new();
    };
    let html: String = servers.iter().map(console_card).collect();
    vec![Patch::html(CONSOLE_GRID, html)]
}

fn console_card(s: &Server) -> String {
    let link = match safe_href(&s.url) {
        Some(href) => format!(
            r#"<a href="{href}" target="_blank" rel="noopener" class="btn">Open Console</a>"#
        ),
        None => r#"<span class="btn btn-disabled">No console URL</span>"#.to_string(),
    };
    format!(
        r#"<div class="monitoring-card"><i class="fa-solid fa-terminal"></i><div class="card-title">{hostname}</div><p>Console access for server management at {ip}</p>{link}</div>"#,
        hostname = escape(&s.hostname),
        ip = escape(&s.ip),
    )
}
