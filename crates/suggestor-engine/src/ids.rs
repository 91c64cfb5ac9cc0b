use uuid::Uuid;

/// Produces suggestion ids. Injected into the manager so tests can pin
/// ids deterministically.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: `sug_<unix millis>_<8 hex chars>`.
///
/// The millisecond prefix keeps ids roughly sortable by creation time;
/// the random suffix separates same-millisecond inserts.
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn generate(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        format!("sug_{millis}_{}", &suffix[..8])
    }
}
