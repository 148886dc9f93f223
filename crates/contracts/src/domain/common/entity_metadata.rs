use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row bookkeeping shared by aggregates.
///
/// `version` counts writes after the insert; deleted rows keep their
/// metadata and are only filtered out of listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub version: i32,
}

impl EntityMetadata {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    fn starting_at(at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            updated_at: at,
            is_deleted: false,
            version: 0,
        }
    }

    /// Stamp an update
    pub fn record_write(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
        self.version += 1;
    }
}

impl Default for EntityMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_record_write_bumps_version_and_time() {
        let start = Utc::now() - Duration::minutes(5);
        let mut meta = EntityMetadata::starting_at(start);
        assert_eq!(meta.updated_at, meta.created_at);

        meta.record_write();
        meta.record_write();
        assert_eq!(meta.version, 2);
        assert!(meta.updated_at > start);
        assert_eq!(meta.created_at, start);
        assert!(!meta.is_deleted);
    }
}
