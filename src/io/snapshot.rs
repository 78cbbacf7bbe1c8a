//! Read/write dashboard snapshot JSON files.
//!
//! A snapshot is the portable form of one dashboard load: the three datasets
//! with their origin and freshness, plus when the snapshot was taken. The
//! schema is `domain::Dashboard`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::Dashboard;
use crate::error::AppError;

/// Write a snapshot as pretty-printed JSON.
pub fn write_snapshot_json(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create snapshot JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, dashboard)
        .map_err(|e| AppError::new(2, format!("Failed to write snapshot JSON: {e}")))?;

    Ok(())
}

pub fn read_snapshot_json(path: &Path) -> Result<Dashboard, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open snapshot JSON '{}': {e}", path.display())))?;
    let dashboard: Dashboard = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid snapshot JSON: {e}")))?;
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fallback;
    use crate::domain::{DataOrigin, LastUpdated, Loaded};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn dashboard() -> Dashboard {
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        Dashboard {
            tool: "pulse".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap(),
            companies: Loaded {
                records: fallback::companies(),
                origin: DataOrigin::Live,
                last_updated: LastUpdated::At(Utc.with_ymd_and_hms(2024, 7, 30, 9, 15, 0).unwrap()),
            },
            trends: Loaded::fallback(fallback::market_trends(), "offline mode"),
            quarterly: Loaded::fallback(fallback::synthesize_quarterly(today, 7), "server returned status 503"),
        }
    }

    #[test]
    fn snapshot_survives_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let original = dashboard();

        write_snapshot_json(&path, &original).unwrap();
        let loaded = read_snapshot_json(&path).unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded.trends.origin, DataOrigin::Fallback("offline mode".to_string()));
    }

    #[test]
    fn snapshot_uses_wire_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        write_snapshot_json(&path, &dashboard()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"fundingTotal\""));
        assert!(text.contains("\"growthRate\""));
        assert!(text.contains("\"Series D\""));
    }

    #[test]
    fn garbage_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"tool\": 1}").unwrap();
        assert_eq!(read_snapshot_json(&path).unwrap_err().exit_code(), 2);
        assert_eq!(read_snapshot_json(&dir.path().join("nope.json")).unwrap_err().exit_code(), 2);
    }
}
