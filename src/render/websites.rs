//! Website / domain cards.

use crate::model::Website;

use super::markup::{escape, status_dot};
use super::{Patch, ViewContext};

pub const WEBSITES_GRID: &str = "grid-websites";

/// `grid-websites`: one card per monitored domain, with rename/delete
/// actions for admin sessions.
pub fn render_websites(sites: Option<&[Website]>, ctx: &ViewContext) -> Vec<Patch> {
    let Some(sites) = sites else {
        return Vec::new();
    };
    let html: String = sites
        .iter()
        .map(|site| website_card(site, ctx.role.is_admin()))
        .collect();
    vec![Patch::html(WEBSITES_GRID, html)]
}

/// `"12.5ms"`, or `N/A` when the site did not answer.
pub fn format_latency(latency: Option<f64>) -> String {
    match latency {
        Some(ms) if ms != 0.0 && ms.is_finite() => format!("{ms}ms"),
        _ => "N/A".to_string(),
    }
}

fn website_card(site: &Website, admin: bool) -> String {
    let domain = escape(&site.domain);
    let actions = if admin {
        format!(
            r#"<div class="domain-actions"><button class="btn btn-icon btn-rename" data-domain="{domain}" title="Rename"><i class="fa-solid fa-pen"></i></button><button class="btn btn-icon btn-delete" data-domain="{domain}" title="Delete"><i class="fa-solid fa-trash"></i></button></div>"#
        )
    } else {
        String::new()
    };
    format!(
        r#"<div class="domain-card"><div class="card-title"><span><i class="fa-solid fa-globe"></i> {domain}</span><span class="status-dot {dot}"></span></div><div class="metric-item"><i class="fa-solid fa-bolt"></i> <span>Latency</span> <span class="usage-value">{latency}</span></div><div class="metric-item"><i class="fa-solid fa-users"></i> <span>Users</span> <span class="usage-value">{connections}</span></div><div class="metric-item"><i class="fa-solid fa-gauge"></i> <span>Traffic</span> <span class="usage-value">{rpm} RPM</span></div>{actions}</div>"#,
        dot = status_dot(site.status),
        latency = format_latency(site.latency),
        connections = site.connections,
        rpm = site.rpm,
    )
}
