//! Alert badge, banner, status light and notification list.

use crate::alerts::{DismissalSet, filter_active};
use crate::model::Alert;

use super::Patch;
use super::markup::escape;

pub const BADGE: &str = "notification-count";
pub const BANNER: &str = "alert-banner";
pub const BANNER_MSG: &str = "alert-msg";
pub const LIST: &str = "notification-list";
pub const STATUS_LIGHT: &str = "system-status-light";

/// How long the banner stays up after a poll with active alerts.
pub const BANNER_TIMEOUT_MS: u64 = 5000;

/// Placeholder shown when there is nothing to notify about.
pub const EMPTY_PLACEHOLDER: &str = r#"<div class="notification-empty">No active alerts</div>"#;

/// Render the notification area from the active (non-dismissed) alerts.
pub fn render_alerts(alerts: Option<&[Alert]>, dismissed: &DismissalSet) -> Vec<Patch> {
    let Some(alerts) = alerts else {
        return Vec::new();
    };
    let active = filter_active(alerts, dismissed);
    let count = active.len();

    let mut patches = vec![
        Patch::text(BADGE, count.to_string()),
        Patch::display(BADGE, count > 0, "flex"),
    ];

    match active.first() {
        Some(first) => {
            patches.push(Patch::display(BANNER, true, "flex"));
            patches.push(Patch::text(BANNER_MSG, first.msg.as_str()));
            patches.push(Patch::hide_after(BANNER, BANNER_TIMEOUT_MS));
        }
        None => patches.push(Patch::display(BANNER, false, "flex")),
    }

    let list = if active.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        active.iter().map(|a| notification_item(a)).collect()
    };
    patches.push(Patch::html(LIST, list));

    let light = if active.is_empty() {
        "status-light status-light-green"
    } else {
        "status-light status-light-red"
    };
    patches.push(Patch::class(STATUS_LIGHT, light));

    patches
}

fn notification_item(alert: &Alert) -> String {
    let msg = escape(&alert.msg);
    format!(r#"<div class="notification-item" data-msg="{msg}"><b>Alert</b><br>{msg}</div>"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PatchOp;

    fn find<'a>(patches: &'a [Patch], target: &str, op: &str) -> Option<&'a PatchOp> {
        patches.iter().map(|p| (p, serde_json::to_value(p).unwrap())).find_map(|(p, v)| {
            (p.target == target && v["op"] == op).then_some(&p.op)
        })
    }

    #[test]
    fn missing_alerts_render_nothing() {
        assert!(render_alerts(None, &DismissalSet::new()).is_empty());
    }

    #[test]
    fn empty_alerts_show_placeholder_and_hide_badge() {
        let patches = render_alerts(Some(&[]), &DismissalSet::new());
        assert!(patches.contains(&Patch::html(LIST, EMPTY_PLACEHOLDER)));
        assert!(patches.contains(&Patch::display(BADGE, false, "flex")));
        assert!(patches.contains(&Patch::text(BADGE, "0")));
        assert!(patches.contains(&Patch::display(BANNER, false, "flex")));
        assert!(patches.contains(&Patch::class(STATUS_LIGHT, "status-light status-light-green")));
    }

    #[test]
    fn active_alerts_show_banner_and_badge() {
        let alerts = [Alert::new("Cluster Quorum Lost!"), Alert::new("Server server2 is offline!")];
        let patches = render_alerts(Some(&alerts), &DismissalSet::new());

        assert!(patches.contains(&Patch::text(BADGE, "2")));
        assert!(patches.contains(&Patch::display(BADGE, true, "flex")));
        assert!(patches.contains(&Patch::text(BANNER_MSG, "Cluster Quorum Lost!")));
        assert!(patches.contains(&Patch::hide_after(BANNER, BANNER_TIMEOUT_MS)));
        assert!(patches.contains(&Patch::class(STATUS_LIGHT, "status-light status-light-red")));

        match find(&patches, LIST, "html") {
            Some(PatchOp::Html { html }) => {
                assert_eq!(html.matches("notification-item").count(), 2);
                assert!(html.contains(r#"data-msg="Cluster Quorum Lost!""#));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn all_dismissed_behaves_like_empty() {
        let alerts = [Alert::new("Website a.com is down!")];
        let mut dismissed = DismissalSet::new();
        dismissed.clear(&alerts);

        let patches = render_alerts(Some(&alerts), &dismissed);
        assert_eq!(patches, render_alerts(Some(&[]), &DismissalSet::new()));
    }
}
