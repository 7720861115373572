// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashMap;
use std::sync::Arc;

use common::Reminder;
use parking_lot::RwLock;
use tracing::debug;

/// In-memory reminder store, keyed by reminder ID.
///
/// Cloning the store hands out another handle to the same map, so one
/// instance is built at startup and passed to the router as state.
/// Nothing survives a restart.
#[derive(Clone, Default)]
pub struct ReminderStore {
    reminders: Arc<RwLock<HashMap<String, Reminder>>>,
}

impl ReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `reminder` under `id`, replacing any existing entry.
    pub fn set(&self, id: &str, reminder: Reminder) {
        let replaced = self
            .reminders
            .write()
            .insert(id.to_string(), reminder)
            .is_some();
        debug!("Stored reminder {} (replaced existing: {})", id, replaced);
    }

    pub fn get(&self, id: &str) -> Option<Reminder> {
        self.reminders.read().get(id).cloned()
    }

    pub fn has(&self, id: &str) -> bool {
        self.reminders.read().contains_key(id)
    }

    /// Removes the reminder. Returns true if one was there.
    pub fn delete(&self, id: &str) -> bool {
        self.reminders.write().remove(id).is_some()
    }

    /// Snapshot of every reminder, in map order.
    pub fn values(&self) -> Vec<Reminder> {
        self.reminders.read().values().cloned().collect()
    }

    /// Snapshot of the reminders matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Vec<Reminder>
    where
        P: Fn(&Reminder) -> bool,
    {
        self.reminders
            .read()
            .values()
            .filter(|reminder| predicate(reminder))
            .cloned()
            .collect()
    }

    /// Runs a read-modify-write on one reminder while holding the write lock,
    /// so concurrent updates to the store cannot interleave.
    ///
    /// Returns `None` without calling `f` if `id` is not stored. The closure
    /// decides what to keep: `Ok(next)` replaces the stored reminder, `Err`
    /// leaves it untouched and is handed back to the caller.
    pub fn update<F, E>(&self, id: &str, f: F) -> Option<Result<(), E>>
    where
        F: FnOnce(&Reminder) -> Result<Reminder, E>,
    {
        let mut reminders = self.reminders.write();
        let current = reminders.get_mut(id)?;
        Some(f(current).map(|next| *current = next))
    }

    pub fn len(&self) -> usize {
        self.reminders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn reminder(id: &str, title: &str) -> Reminder {
        Reminder {
            id: id.to_string(),
            title: title.to_string(),
            due_date: "2024-01-01".to_string(),
            is_completed: false,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_set_get_has() {
        let store = ReminderStore::new();
        assert!(store.is_empty());
        assert!(!store.has("r1"));
        assert_eq!(store.get("r1"), None);

        store.set("r1", reminder("r1", "Pay rent"));

        assert!(store.has("r1"));
        assert_eq!(store.get("r1"), Some(reminder("r1", "Pay rent")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_overwrites_existing_key() {
        let store = ReminderStore::new();
        store.set("r1", reminder("r1", "First"));
        store.set("r1", reminder("r1", "Second"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("r1").unwrap().title, "Second");
    }

    #[test]
    fn test_delete_reports_whether_removed() {
        let store = ReminderStore::new();
        store.set("r1", reminder("r1", "Pay rent"));

        assert!(store.delete("r1"));
        assert!(!store.delete("r1"));
        assert!(store.values().is_empty());
    }

    #[test]
    fn test_clones_share_the_same_map() {
        let store = ReminderStore::new();
        let handle = store.clone();
        handle.set("r1", reminder("r1", "Pay rent"));

        assert!(store.has("r1"));
    }

    #[test]
    fn test_filter_scans_all_values() {
        let store = ReminderStore::new();
        store.set("r1", reminder("r1", "Pay rent"));
        store.set("r2", reminder("r2", "Call mum"));

        let matching = store.filter(|r| r.title.starts_with("Call"));
        assert_eq!(matching, vec![reminder("r2", "Call mum")]);
        assert_eq!(store.values().len(), 2);
    }

    #[test]
    fn test_update_replaces_on_ok() {
        let store = ReminderStore::new();
        store.set("r1", reminder("r1", "Pay rent"));

        let outcome = store.update("r1", |current| {
            Ok::<_, ()>(Reminder {
                is_completed: true,
                ..current.clone()
            })
        });

        assert_eq!(outcome, Some(Ok(())));
        assert!(store.get("r1").unwrap().is_completed);
    }

    #[test]
    fn test_update_keeps_record_on_err() {
        let store = ReminderStore::new();
        store.set("r1", reminder("r1", "Pay rent"));

        let outcome = store.update("r1", |_| Err("nope"));

        assert_eq!(outcome, Some(Err("nope")));
        assert_eq!(store.get("r1"), Some(reminder("r1", "Pay rent")));
    }

    #[test]
    fn test_update_missing_id_does_not_create() {
        let store = ReminderStore::new();
        let mut called = false;

        let outcome = store.update("ghost", |current| {
            called = true;
            Ok::<_, ()>(current.clone())
        });

        assert_eq!(outcome, None);
        assert!(!called);
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let store = ReminderStore::new();
        let mut seed = reminder("r1", "Counter");
        seed.extra.insert("count".to_string(), 0.into());
        store.set("r1", seed);

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.update("r1", |current| {
                            let mut next = current.clone();
                            let count = next.extra["count"].as_u64().unwrap_or(0);
                            next.extra.insert("count".to_string(), (count + 1).into());
                            Ok::<_, ()>(next)
                        });
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(store.get("r1").unwrap().extra["count"], 800);
    }
}
