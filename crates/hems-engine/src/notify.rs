//! ---
//! hems_section: "08-energy-metrics"
//! hems_subsection: "module"
//! hems_type: "source"
//! hems_scope: "code"
//! hems_description: "Device metrics and classification routines for the dashboard."
//! hems_version: "v0.0.0-prealpha"
//! hems_owner: "tbd"
//! ---
//! Bounded notification store with explicit subscribers.
//!
//! The center is an ordinary value owned by the caller. Time never advances on
//! its own: callers pass `now` and prune with [`NotificationCenter::dismiss_expired`].

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hems_common::config::NotificationConfig;
use serde::Serialize;
use strum::Display;

pub type NotificationId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

type Listener = Box<dyn FnMut(&[Notification])>;

pub struct NotificationCenter {
    visible: Vec<Notification>,
    capacity: usize,
    ttl: chrono::Duration,
    next_id: NotificationId,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("visible", &self.visible)
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl NotificationCenter {
    /// `capacity` is raised to at least one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            visible: Vec::new(),
            capacity: capacity.max(1),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(1)),
            next_id: 1,
            next_subscription: 1,
            listeners: Vec::new(),
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.capacity, config.ttl)
    }

    /// Visible notifications, newest first.
    pub fn visible(&self) -> &[Notification] {
        &self.visible
    }

    /// Push a notification; the oldest one is dropped once capacity is exceeded.
    pub fn notify(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> NotificationId {
        let id = self.next_id;
        self.next_id += 1;
        let notification = Notification {
            id,
            kind,
            title: title.into(),
            description,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };
        self.visible.insert(0, notification);
        self.visible.truncate(self.capacity);
        self.publish();
        id
    }

    /// Returns `false` when `id` is not visible.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.visible.len();
        self.visible.retain(|n| n.id != id);
        let removed = self.visible.len() != before;
        if removed {
            self.publish();
        }
        removed
    }

    pub fn dismiss_all(&mut self) {
        if !self.visible.is_empty() {
            self.visible.clear();
            self.publish();
        }
    }

    /// Drop every notification whose lifetime ended at or before `now`.
    pub fn dismiss_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.visible.len();
        self.visible.retain(|n| !n.is_expired(now));
        let removed = before - self.visible.len();
        if removed > 0 {
            self.publish();
        }
        removed
    }

    /// Register a listener called with the visible list after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&[Notification]) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn publish(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.visible);
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn queue_is_bounded_newest_first() {
        let mut center = NotificationCenter::default();
        for i in 0..7 {
            center.notify(NotificationKind::Info, format!("n{i}"), None, at(0));
        }
        let titles: Vec<_> = center.visible().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["n6", "n5", "n4", "n3", "n2"]);
    }

    #[test]
    fn each_notification_expires_independently() {
        let mut center = NotificationCenter::new(5, Duration::from_secs(5));
        let first = center.notify(NotificationKind::Success, "added", None, at(0));
        let second = center.notify(NotificationKind::Warning, "phantom", None, at(3));
        assert_eq!(center.dismiss_expired(at(4)), 0);
        assert_eq!(center.dismiss_expired(at(5)), 1);
        assert_eq!(center.visible()[0].id, second);
        assert!(!center.dismiss(first));
        assert_eq!(center.dismiss_expired(at(8)), 1);
        assert!(center.visible().is_empty());
    }

    #[test]
    fn listeners_see_changes_until_unsubscribed() {
        let mut center = NotificationCenter::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = center.subscribe(move |visible| sink.borrow_mut().push(visible.len()));

        let id = center.notify(NotificationKind::Error, "validation", None, at(0));
        center.notify(NotificationKind::Info, "refresh", None, at(1));
        assert!(center.dismiss(id));
        assert!(center.unsubscribe(sub));
        center.dismiss_all();

        assert_eq!(*seen.borrow(), vec![1, 2, 1]);
        assert!(!center.unsubscribe(sub));
    }

    #[test]
    fn dismiss_all_on_empty_center_is_silent() {
        let mut center = NotificationCenter::default();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        center.subscribe(move |_| *counter.borrow_mut() += 1);
        center.dismiss_all();
        assert_eq!(*calls.borrow(), 0);
    }
}
