//! Content sync planning service
//!
//! Pure domain logic for mirroring a local content tree into a bucket.
//! Compares local objects against the remote listing without any I/O.

use std::collections::BTreeMap;

use crate::domain::ports::{LocalObject, RemoteObject};

/// The action to take for one bucket key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAction {
    /// Key is new in the source folder
    Upload,
    /// Key exists remotely with different content
    Update,
    /// Key no longer exists in the source folder
    Delete,
    /// Remote content already matches
    Unchanged,
}

/// A planned action for a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedObject {
    pub key: String,
    pub action: ObjectAction,
    /// Local object backing an upload or update
    pub local: Option<LocalObject>,
}

impl PlannedObject {
    /// Needs a write to the bucket
    pub fn is_write(&self) -> bool {
        matches!(self.action, ObjectAction::Upload | ObjectAction::Update)
    }
}

/// Result of planning a content sync
///
/// Writes come before deletions so a partially applied plan never
/// removes an object the new content still links to.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub objects: Vec<PlannedObject>,
}

impl SyncPlan {
    pub fn writes(&self) -> impl Iterator<Item = &PlannedObject> {
        self.objects.iter().filter(|o| o.is_write())
    }

    pub fn deletions(&self) -> impl Iterator<Item = &PlannedObject> {
        self.objects
            .iter()
            .filter(|o| o.action == ObjectAction::Delete)
    }

    pub fn write_count(&self) -> usize {
        self.writes().count()
    }

    pub fn delete_count(&self) -> usize {
        self.deletions().count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| o.action == ObjectAction::Unchanged)
            .count()
    }

    /// Number of mutating operations
    pub fn change_count(&self) -> usize {
        self.write_count() + self.delete_count()
    }

    pub fn is_noop(&self) -> bool {
        self.change_count() == 0
    }
}

/// Pure planning service
pub struct Planner;

impl Planner {
    /// Diff the local tree against the bucket listing
    ///
    /// Output order: uploads and updates sorted by key, unchanged keys,
    /// then deletions sorted by key.
    pub fn plan(local: &[LocalObject], remote: &[RemoteObject]) -> SyncPlan {
        let remote_by_key: BTreeMap<&str, &RemoteObject> =
            remote.iter().map(|r| (r.key.as_str(), r)).collect();
        let local_by_key: BTreeMap<&str, &LocalObject> =
            local.iter().map(|l| (l.key.as_str(), l)).collect();

        let mut writes = Vec::new();
        let mut unchanged = Vec::new();
        for (key, object) in &local_by_key {
            let action = match remote_by_key.get(key) {
                None => ObjectAction::Upload,
                Some(existing) if existing.hash == object.hash => ObjectAction::Unchanged,
                Some(_) => ObjectAction::Update,
            };
            let planned = PlannedObject {
                key: key.to_string(),
                action,
                local: Some((*object).clone()),
            };
            if action == ObjectAction::Unchanged {
                unchanged.push(planned);
            } else {
                writes.push(planned);
            }
        }

        let deletions = remote_by_key
            .keys()
            .filter(|key| !local_by_key.contains_key(*key))
            .map(|key| PlannedObject {
                key: key.to_string(),
                action: ObjectAction::Delete,
                local: None,
            });

        let mut objects = writes;
        objects.extend(unchanged);
        objects.extend(deletions);
        SyncPlan { objects }
    }
}
