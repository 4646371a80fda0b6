use dps_domain::{RecordOrigin, RecordType, StaticRecord};

/// Port for the local record table. All operations are idempotent.
pub trait StaticRecordRegistry: Send + Sync {
    fn lookup(&self, name: &str, record_type: RecordType) -> Option<StaticRecord>;

    /// Returns false when a configured record already owns the key and
    /// `record` is dynamic.
    fn register(&self, record: StaticRecord) -> bool;

    fn unregister(&self, name: &str, record_type: RecordType) -> bool;

    /// Removes every record of `origin` held for `name`. Returns how many
    /// were dropped.
    fn unregister_name(&self, name: &str, origin: RecordOrigin) -> usize;

    /// Swaps the configuration-owned records for `records`, keeping dynamic ones.
    fn replace_configured(&self, records: Vec<StaticRecord>);
}
