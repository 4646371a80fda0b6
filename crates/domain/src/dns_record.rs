mod record_type;
mod static_record;

pub use record_type::RecordType;
pub use static_record::{RecordData, RecordOrigin, StaticRecord};
