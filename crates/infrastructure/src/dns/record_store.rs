use arc_swap::ArcSwap;
use dps_application::ports::StaticRecordRegistry;
use dps_domain::{normalize_domain, RecordOrigin, RecordType, StaticRecord};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};

type RecordSet = SmallVec<[StaticRecord; 2]>;
type RecordTable = FxHashMap<Arc<str>, RecordSet>;

/// Static name→record table for local overrides and container names.
///
/// Readers load an immutable snapshot and never wait on writers. Every
/// mutation copies the table, edits the copy and swaps it in, so a lookup
/// that already ran keeps the record it saw even if it is removed right after.
pub struct RecordStore {
    table: ArcSwap<RecordTable>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(RecordTable::default()),
        }
    }

    pub fn with_records(records: Vec<StaticRecord>) -> Self {
        let store = Self::new();
        store.replace_configured(records);
        store
    }

    /// Exact-name match only; returns a copy.
    pub fn lookup(&self, name: &str, record_type: RecordType) -> Option<StaticRecord> {
        let name = canonical(name);
        let table = self.table.load();
        table
            .get(name.as_ref())?
            .iter()
            .find(|record| record.record_type == record_type)
            .cloned()
    }

    /// Like [`RecordStore::lookup`], but when the name holds no record of
    /// `record_type` a CNAME held for it answers instead.
    pub fn lookup_or_alias(&self, name: &str, record_type: RecordType) -> Option<StaticRecord> {
        let name = canonical(name);
        let table = self.table.load();
        let set = table.get(name.as_ref())?;
        set.iter()
            .find(|record| record.record_type == record_type)
            .or_else(|| {
                set.iter()
                    .find(|record| record.record_type == RecordType::CNAME)
            })
            .cloned()
    }

    /// Inserts or overwrites the record for its (name, type). A DYNAMIC
    /// record never replaces a CONFIG one; returns whether it was stored.
    pub fn register(&self, record: StaticRecord) -> bool {
        let mut stored = false;
        self.table.rcu(|table| {
            let mut next = RecordTable::clone(table);
            let set = next.entry(Arc::clone(&record.name)).or_default();
            stored = match set.iter_mut().find(|r| r.record_type == record.record_type) {
                Some(existing) if shadows(existing, &record) => false,
                Some(existing) => {
                    *existing = record.clone();
                    true
                }
                None => {
                    set.push(record.clone());
                    true
                }
            };
            next
        });

        if stored {
            debug!(
                name = %record.name,
                record_type = %record.record_type,
                origin = ?record.origin,
                "Static record registered"
            );
        } else {
            debug!(
                name = %record.name,
                record_type = %record.record_type,
                "Configured record shadows dynamic registration"
            );
        }
        stored
    }

    pub fn unregister(&self, name: &str, record_type: RecordType) -> bool {
        let name = canonical(name);
        if self.lookup(&name, record_type).is_none() {
            return false;
        }

        let mut removed = false;
        self.table.rcu(|table| {
            let mut next = RecordTable::clone(table);
            removed = false;
            if let Some(set) = next.get_mut(name.as_ref()) {
                let before = set.len();
                set.retain(|r| r.record_type != record_type);
                removed = set.len() != before;
                if set.is_empty() {
                    next.remove(name.as_ref());
                }
            }
            next
        });

        if removed {
            debug!(name = %name, record_type = %record_type, "Static record unregistered");
        }
        removed
    }

    /// Drops every record held for `name` that has the given origin.
    /// Records of the other origin stay in place.
    pub fn unregister_name(&self, name: &str, origin: RecordOrigin) -> usize {
        let name = canonical(name);
        let owned = self
            .table
            .load()
            .get(name.as_ref())
            .is_some_and(|set| set.iter().any(|r| r.origin == origin));
        if !owned {
            return 0;
        }

        let mut removed = 0;
        self.table.rcu(|table| {
            let mut next = RecordTable::clone(table);
            removed = 0;
            if let Some(set) = next.get_mut(name.as_ref()) {
                let before = set.len();
                set.retain(|r| r.origin != origin);
                removed = before - set.len();
                if set.is_empty() {
                    next.remove(name.as_ref());
                }
            }
            next
        });
        removed
    }

    /// Replaces all CONFIG-origin records with `records`, keeping DYNAMIC ones.
    /// A configured record wins over a dynamic one for the same key.
    pub fn replace_configured(&self, records: Vec<StaticRecord>) {
        let count = records.len();
        self.table.rcu(|table| {
            let mut next = RecordTable::default();
            for (name, set) in table.iter() {
                let dynamic: RecordSet = set
                    .iter()
                    .filter(|r| r.origin == RecordOrigin::Dynamic)
                    .cloned()
                    .collect();
                if !dynamic.is_empty() {
                    next.insert(Arc::clone(name), dynamic);
                }
            }
            for record in &records {
                let set = next.entry(Arc::clone(&record.name)).or_default();
                set.retain(|r| r.record_type != record.record_type);
                set.push(StaticRecord {
                    origin: RecordOrigin::Config,
                    ..record.clone()
                });
            }
            next
        });

        info!(records = count, "Configured static records loaded");
    }

    /// Number of (name, type) records held.
    pub fn len(&self) -> usize {
        self.table.load().values().map(|set| set.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    pub fn snapshot(&self) -> Vec<StaticRecord> {
        self.table
            .load()
            .values()
            .flat_map(|set| set.iter().cloned())
            .collect()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticRecordRegistry for RecordStore {
    fn lookup(&self, name: &str, record_type: RecordType) -> Option<StaticRecord> {
        RecordStore::lookup(self, name, record_type)
    }

    fn register(&self, record: StaticRecord) -> bool {
        RecordStore::register(self, record)
    }

    fn unregister(&self, name: &str, record_type: RecordType) -> bool {
        RecordStore::unregister(self, name, record_type)
    }

    fn unregister_name(&self, name: &str, origin: RecordOrigin) -> usize {
        RecordStore::unregister_name(self, name, origin)
    }

    fn replace_configured(&self, records: Vec<StaticRecord>) {
        RecordStore::replace_configured(self, records)
    }
}

/// A configured record is only replaced by configuration.
fn shadows(existing: &StaticRecord, incoming: &StaticRecord) -> bool {
    existing.origin == RecordOrigin::Config && incoming.origin == RecordOrigin::Dynamic
}

fn canonical(name: &str) -> Cow<'_, str> {
    let needs_work = name.ends_with('.')
        || name.bytes().any(|b| b.is_ascii_uppercase() || b.is_ascii_whitespace());
    if needs_work {
        Cow::Owned(normalize_domain(name))
    } else {
        Cow::Borrowed(name)
    }
}
