//! In-memory store state
//!
//! Tables shared by the repository implementations. Each table sits behind its
//! own `RwLock`; name-indexed tables keep a lower-cased unique index so that
//! find-or-insert runs under a single write guard.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tokio::sync::RwLock;

use shared::PetId;
use crate::types::{GroupRecord, PetRecord, TraitRecord, name_key};

/// Table whose rows carry a case-insensitively unique name
#[derive(Debug)]
pub struct NameIndexedTable<R> {
    rows: BTreeMap<u64, R>,
    by_name: HashMap<String, u64>,
    next_id: u64,
}

impl<R: Clone> NameIndexedTable<R> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            by_name: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn find(&self, name: &str) -> Option<&R> {
        self.by_name.get(&name_key(name)).and_then(|id| self.rows.get(id))
    }

    pub fn get(&self, id: u64) -> Option<&R> {
        self.rows.get(&id)
    }

    /// Returns the row matching `name`, or builds one from the next id.
    /// The flag is true when a row was inserted.
    pub fn get_or_insert_with<F>(&mut self, name: &str, make: F) -> (R, bool)
    where
        F: FnOnce(u64) -> R,
    {
        let key = name_key(name);
        if let Some(row) = self.by_name.get(&key).and_then(|id| self.rows.get(id)) {
            return (row.clone(), false);
        }

        let id = self.next_id;
        self.next_id += 1;
        let row = make(id);
        self.rows.insert(id, row.clone());
        self.by_name.insert(key, id);
        (row, true)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<R: Clone> Default for NameIndexedTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pet rows ordered by id
#[derive(Debug)]
pub struct PetTable {
    pub rows: BTreeMap<PetId, PetRecord>,
    next_id: u64,
}

impl PetTable {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Ids are never reused, even after deletes
    pub fn allocate_id(&mut self) -> PetId {
        let id = PetId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for PetTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Core store state shared by all repositories
#[derive(Debug)]
pub struct StoreState {
    pub groups: RwLock<NameIndexedTable<GroupRecord>>,
    pub traits: RwLock<NameIndexedTable<TraitRecord>>,
    pub pets: RwLock<PetTable>,
    pub started_at: Instant,
}

impl StoreState {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(NameIndexedTable::new()),
            traits: RwLock::new(NameIndexedTable::new()),
            pets: RwLock::new(PetTable::new()),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}
