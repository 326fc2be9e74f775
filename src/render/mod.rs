//! Pure snapshot → view renderers.
//!
//! Every renderer maps a slice of a [`StatusSnapshot`] to a list of
//! [`Patch`]es, each addressing one element of the dashboard shell by id.
//! Renderers never perform I/O and never look at anything but their
//! arguments, so the same input always yields the same patches. Applying the
//! patches to a real UI (the embedded web shell, the terminal) is left to
//! thin adapters.
//!
//! A missing collection (`None`) renders nothing at all; an empty one renders
//! empty markup, except for the alert list which shows an explicit
//! placeholder.

pub mod cluster;
pub mod markup;
pub mod notifications;
pub mod servers;
pub mod users;
pub mod websites;

use serde::Serialize;

use crate::alerts::DismissalSet;
use crate::model::{Role, StatusSnapshot};

pub use markup::{UsageClass, usage_class};

// ---------------------------------------------------------------------------
// Patches
// ---------------------------------------------------------------------------

/// What to do with a target element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    /// Replace the element's children with trusted markup.
    Html { html: String },
    /// Replace the element's text content.
    Text { text: String },
    /// Replace the element's `class` attribute.
    Class { class: String },
    /// Set `style.display` (`"flex"`, `"none"`).
    Display { value: String },
    /// Set `style.color` (a CSS value such as `var(--accent-green)`).
    Color { value: String },
    /// Hide the element after the given delay, restarting any pending timer.
    HideAfter { ms: u64 },
}

/// One update to one element of the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub target: &'static str,
    #[serde(flatten)]
    pub op: PatchOp,
}

impl Patch {
    pub fn html(target: &'static str, html: impl Into<String>) -> Self {
        Self {
            target,
            op: PatchOp::Html { html: html.into() },
        }
    }

    pub fn text(target: &'static str, text: impl Into<String>) -> Self {
        Self {
            target,
            op: PatchOp::Text { text: text.into() },
        }
    }

    pub fn class(target: &'static str, class: impl Into<String>) -> Self {
        Self {
            target,
            op: PatchOp::Class {
                class: class.into(),
            },
        }
    }

    pub fn display(target: &'static str, visible: bool, shown_as: &str) -> Self {
        let value = if visible { shown_as } else { "none" };
        Self {
            target,
            op: PatchOp::Display {
                value: value.to_string(),
            },
        }
    }

    pub fn color(target: &'static str, value: impl Into<String>) -> Self {
        Self {
            target,
            op: PatchOp::Color {
                value: value.into(),
            },
        }
    }

    pub fn hide_after(target: &'static str, ms: u64) -> Self {
        Self {
            target,
            op: PatchOp::HideAfter { ms },
        }
    }
}

// ---------------------------------------------------------------------------
// View context
// ---------------------------------------------------------------------------

/// Session facts the renderers need besides the snapshot itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewContext {
    pub role: Role,
    /// Server ids shown as mirror cards in the cluster view.
    pub cluster_members: Vec<String>,
}

impl Default for ViewContext {
    fn default() -> Self {
        Self {
            role: Role::Admin,
            cluster_members: vec!["server1".to_string(), "server2".to_string()],
        }
    }
}

/// Element ids of controls only admins may use.
const ADMIN_CONTROLS: &[&str] = &["btn-add-domain", "btn-add-user", "user-add-section"];

/// Show or hide the static admin-only controls of the shell.
pub fn render_session(ctx: &ViewContext) -> Vec<Patch> {
    ADMIN_CONTROLS
        .iter()
        .map(|&id| Patch::display(id, ctx.role.is_admin(), ""))
        .collect()
}

// ---------------------------------------------------------------------------
// Whole snapshot
// ---------------------------------------------------------------------------

/// Render every region of the dashboard for one snapshot.
pub fn render_snapshot(
    snapshot: &StatusSnapshot,
    dismissed: &DismissalSet,
    ctx: &ViewContext,
) -> Vec<Patch> {
    let servers = snapshot.servers.as_deref();

    let mut patches = Vec::new();
    patches.extend(servers::render_servers(servers));
    patches.extend(cluster::render_cluster(
        snapshot.cluster.as_ref(),
        servers,
        &ctx.cluster_members,
    ));
    patches.extend(websites::render_websites(snapshot.websites.as_deref(), ctx));
    patches.extend(notifications::render_alerts(
        snapshot.alerts.as_deref(),
        dismissed,
    ));
    patches.extend(servers::render_console_links(servers));
    patches.extend(users::render_users(snapshot.users.as_deref(), ctx));
    patches.extend(render_session(ctx));
    patches
}
