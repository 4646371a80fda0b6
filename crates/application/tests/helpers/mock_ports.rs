use async_trait::async_trait;
use dps_application::ports::{ConfigReloadPort, DnsSolver, StaticRecordRegistry};
use dps_domain::{
    Answer, Config, DnsQuery, DomainError, RecordOrigin, RecordType, StaticRecord,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::Instant;

/// Solver returning canned answers keyed by domain.
pub struct MockDnsSolver {
    answers: Mutex<HashMap<String, Answer>>,
    calls: AtomicUsize,
    last_deadline: Mutex<Option<Instant>>,
}

impl MockDnsSolver {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            last_deadline: Mutex::new(None),
        }
    }

    pub fn set_answer(&self, domain: &str, answer: Answer) {
        self.answers
            .lock()
            .unwrap()
            .insert(domain.to_string(), answer);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_deadline(&self) -> Option<Instant> {
        *self.last_deadline.lock().unwrap()
    }
}

#[async_trait]
impl DnsSolver for MockDnsSolver {
    async fn solve(&self, query: &DnsQuery) -> Answer {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .get(query.domain())
            .cloned()
            .unwrap_or_else(|| {
                Answer::failed(query.clone(), dps_domain::ResolutionErrorKind::AllUpstreamFailed)
            })
    }

    async fn solve_until(&self, query: &DnsQuery, deadline: Instant) -> Answer {
        *self.last_deadline.lock().unwrap() = Some(deadline);
        self.solve(query).await
    }
}

/// In-memory registry recording every call.
#[derive(Default)]
pub struct MockRecordRegistry {
    records: Mutex<HashMap<(String, RecordType), StaticRecord>>,
    replaced: Mutex<Vec<StaticRecord>>,
}

impl MockRecordRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn get(&self, name: &str, record_type: RecordType) -> Option<StaticRecord> {
        self.lookup(name, record_type)
    }

    pub fn dynamic_count(&self) -> usize {
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.origin == RecordOrigin::Dynamic)
            .count()
    }
}

impl StaticRecordRegistry for MockRecordRegistry {
    fn lookup(&self, name: &str, record_type: RecordType) -> Option<StaticRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(name.to_string(), record_type))
            .cloned()
    }

    fn register(&self, record: StaticRecord) -> bool {
        let mut records = self.records.lock().unwrap();
        let key = (record.name.to_string(), record.record_type);
        let shadowed = records.get(&key).is_some_and(|existing| {
            existing.origin == RecordOrigin::Config && record.origin == RecordOrigin::Dynamic
        });
        if shadowed {
            return false;
        }
        records.insert(key, record);
        true
    }

    fn unregister(&self, name: &str, record_type: RecordType) -> bool {
        self.records
            .lock()
            .unwrap()
            .remove(&(name.to_string(), record_type))
            .is_some()
    }

    fn unregister_name(&self, name: &str, origin: RecordOrigin) -> usize {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|(n, _), record| n != name || record.origin != origin);
        before - records.len()
    }

    fn replace_configured(&self, records: Vec<StaticRecord>) {
        *self.replaced.lock().unwrap() = records;
    }
}

pub struct MockConfigReload {
    applied: AtomicUsize,
    fail: AtomicBool,
    last_upstreams: Mutex<Vec<String>>,
}

impl MockConfigReload {
    pub fn new() -> Self {
        Self {
            applied: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            last_upstreams: Mutex::new(Vec::new()),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn applied(&self) -> usize {
        self.applied.load(Ordering::SeqCst)
    }

    pub fn last_upstreams(&self) -> Vec<String> {
        self.last_upstreams.lock().unwrap().clone()
    }
}

impl ConfigReloadPort for MockConfigReload {
    fn apply(&self, config: &Config) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::ConfigError("engine rejected config".to_string()));
        }
        self.applied.fetch_add(1, Ordering::SeqCst);
        *self.last_upstreams.lock().unwrap() = config.dns.upstream_servers.clone();
        Ok(())
    }
}
