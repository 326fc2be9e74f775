//! Cluster header, service badges and member mirror cards.

use crate::model::{Cluster, Server};

use super::Patch;
use super::markup::{escape, status_dot, usage_class};
use super::servers::metric;

pub const CLUSTER_GRID: &str = "grid-cluster";

const HEALTHY_COLOR: &str = "var(--accent-green)";
const DEGRADED_COLOR: &str = "var(--accent-red)";
const STANDBY_COLOR: &str = "var(--accent-blue)";

/// Render the cluster view.
///
/// Without a cluster object nothing is rendered. Without a server list the
/// header and badges still update but the mirror grid is left alone.
pub fn render_cluster(
    cluster: Option<&Cluster>,
    servers: Option<&[Server]>,
    members: &[String],
) -> Vec<Patch> {
    let Some(cluster) = cluster else {
        return Vec::new();
    };

    let health_color = if cluster.quorum {
        HEALTHY_COLOR
    } else {
        DEGRADED_COLOR
    };

    let mut patches = vec![
        Patch::text("cluster-health-text", cluster.health_status.as_str()),
        Patch::color("cluster-health-text", health_color),
        Patch::text("cluster-ip-text", cluster.cluster_ip.as_str()),
        Patch::text("cluster-load-text", cluster.shared_load.as_str()),
        Patch::text("status-corosync-badge", cluster.services.corosync.as_str()),
        Patch::text("status-pacemaker-badge", cluster.services.pacemaker.as_str()),
        Patch::text("status-pcsd-badge", cluster.services.pcsd.as_str()),
    ];

    if let Some(servers) = servers {
        let html: String = servers
            .iter()
            .filter(|s| members.iter().any(|m| *m == s.id))
            .map(|s| mirror_card(s, &cluster.primary_node))
            .collect();
        patches.push(Patch::html(CLUSTER_GRID, html));
    }

    patches
}

fn mirror_card(s: &Server, primary_node: &str) -> String {
    let is_primary = s.id == primary_node;
    let (border, role) = if is_primary {
        (
            HEALTHY_COLOR,
            r#"<i class="fa-solid fa-crown"></i> Active Primary"#,
        )
    } else {
        (STANDBY_COLOR, "Hot Standby")
    };
    format!(
        r#"<div class="card" style="border-top: 3px solid {border};"><div class="card-title"><span><i class="fa-solid fa-server"></i> {hostname}</span><span class="status-dot {dot}"></span></div>{cpu}{ram}{uptime}<div class="cluster-role">{role}</div></div>"#,
        hostname = escape(&s.hostname),
        dot = status_dot(s.status),
        cpu = metric("fa-microchip", "CPU", &s.cpu, Some(usage_class(&s.cpu).css())),
        ram = metric("fa-memory", "RAM", &s.ram, Some(usage_class(&s.ram).css())),
        uptime = metric("fa-clock", "Uptime", &s.uptime, None),
    )
}
