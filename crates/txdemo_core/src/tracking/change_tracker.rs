use super::Entity;

/// Lifecycle state of a tracked entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Staged for insert; has no key yet.
    Added,
    /// Matches what was last read from or written to the store.
    Unchanged,
    /// Differs from its original snapshot.
    Modified,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    state: EntryState,
    key: Option<i64>,
    original: Option<T>,
    current: T,
}

/// A write the tracker wants persisted on the next save.
#[derive(Debug)]
pub struct PendingChange<'a, T> {
    pub slot: usize,
    pub state: EntryState,
    pub key: Option<i64>,
    pub value: &'a T,
}

/// Identity map plus snapshot diffing for one record type.
#[derive(Debug, Clone)]
pub struct ChangeTracker<T: Entity> {
    entries: Vec<Entry<T>>,
}

impl<T: Entity> Default for ChangeTracker<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Entity> ChangeTracker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages an unsaved value for insert.
    pub fn add(&mut self, value: T) {
        self.entries.push(Entry {
            state: EntryState::Added,
            key: None,
            original: None,
            current: value,
        });
    }

    /// Registers a value read from the store and returns the tracked copy.
    ///
    /// When the key is already tracked the existing copy is returned as-is and
    /// `value` is discarded.
    pub fn attach(&mut self, value: T) -> T {
        let Some(key) = value.key() else {
            // Store reads always carry a key; treat a keyless value as new.
            self.add(value.clone());
            return value;
        };

        if let Some(entry) = self.entry(key) {
            return entry.current.clone();
        }

        self.entries.push(Entry {
            state: EntryState::Unchanged,
            key: Some(key),
            original: Some(value.clone()),
            current: value.clone(),
        });
        value
    }

    pub fn get(&self, key: i64) -> Option<&T> {
        self.entry(key).map(|entry| &entry.current)
    }

    /// Mutable access to a tracked copy. Changes are picked up by
    /// `detect_changes`.
    pub fn get_mut(&mut self, key: i64) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|entry| entry.key == Some(key))
            .map(|entry| &mut entry.current)
    }

    pub fn state(&self, key: i64) -> Option<EntryState> {
        self.entry(key).map(|entry| entry.state)
    }

    /// Number of `Added` entries still waiting for a key.
    pub fn added_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state == EntryState::Added)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-evaluates keyed entries against their original snapshots.
    pub fn detect_changes(&mut self) {
        for entry in &mut self.entries {
            if entry.state == EntryState::Added {
                continue;
            }
            entry.state = match &entry.original {
                Some(original) if *original == entry.current => EntryState::Unchanged,
                _ => EntryState::Modified,
            };
        }
    }

    /// Lists `Added` and `Modified` entries in tracking order.
    pub fn pending_changes(&self) -> Vec<PendingChange<'_, T>> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.state != EntryState::Unchanged)
            .map(|(slot, entry)| PendingChange {
                slot,
                state: entry.state,
                key: entry.key,
                value: &entry.current,
            })
            .collect()
    }

    /// Marks everything as persisted, assigning store keys to inserted slots.
    pub fn accept_changes(&mut self, assigned_keys: &[(usize, i64)]) {
        for &(slot, key) in assigned_keys {
            if let Some(entry) = self.entries.get_mut(slot) {
                entry.current.assign_key(key);
                entry.key = Some(key);
            }
        }
        for entry in &mut self.entries {
            if entry.key.is_some() {
                entry.state = EntryState::Unchanged;
                entry.original = Some(entry.current.clone());
            }
        }
    }

    /// Forgets every tracked entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn entry(&self, key: i64) -> Option<&Entry<T>> {
        self.entries.iter().find(|entry| entry.key == Some(key))
    }
}
