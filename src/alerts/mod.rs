//! Client-side alert dismissal.
//!
//! Alerts have no stable id on the wire, so the message text is the
//! identity: dismissing one occurrence hides every alert with the same text,
//! now and on later polls. The set only grows, and only through
//! [`DismissalSet::clear`]; it lives for the process and is never sent to
//! the backend.

use std::collections::BTreeSet;

use crate::model::Alert;

/// Messages the user has cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DismissalSet {
    messages: BTreeSet<String>,
}

impl DismissalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, msg: &str) -> bool {
        self.messages.contains(msg)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether `alert` should still be shown.
    pub fn is_active(&self, alert: &Alert) -> bool {
        !self.contains(&alert.msg)
    }

    /// Dismiss every alert currently on display. Returns how many messages
    /// were new to the set.
    pub fn clear<'a, I>(&mut self, displayed: I) -> usize
    where
        I: IntoIterator<Item = &'a Alert>,
    {
        displayed
            .into_iter()
            .filter(|alert| self.messages.insert(alert.msg.clone()))
            .count()
    }
}

/// Alerts whose message has not been dismissed, in backend order.
pub fn filter_active<'a>(alerts: &'a [Alert], dismissed: &DismissalSet) -> Vec<&'a Alert> {
    alerts.iter().filter(|a| dismissed.is_active(a)).collect()
}
