//! Odds snapshot loading and saving
//!
//! A snapshot is the raw feed body for one sport, saved as
//! `{sport_key}_{YYYYMMDDTHHMMSS}.json`.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::feed::{parse_events, to_listings, FeedEvent};
use crate::models::GameListing;

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid odds JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A saved snapshot found on disk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotFile {
    pub sport_key: String,
    pub taken_at: NaiveDateTime,
    pub path: PathBuf,
}

/// Load raw feed events from a JSON file
pub fn load_events<P: AsRef<Path>>(path: P) -> Result<Vec<FeedEvent>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_events(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate game listings from a JSON file
pub fn load_listings<P: AsRef<Path>>(path: P) -> Result<Vec<GameListing>, LoadError> {
    Ok(to_listings(load_events(path)?))
}

/// Snapshot filename for a sport at a point in time
pub fn snapshot_filename(sport_key: &str, taken_at: DateTime<Utc>) -> String {
    format!("{}_{}.json", sport_key, taken_at.format(TIMESTAMP_FORMAT))
}

/// Write raw feed events as a snapshot file
pub fn save_snapshot<P: AsRef<Path>>(
    odds_dir: P,
    sport_key: &str,
    events: &[FeedEvent],
    taken_at: DateTime<Utc>,
) -> Result<PathBuf, LoadError> {
    let odds_dir = odds_dir.as_ref();
    fs::create_dir_all(odds_dir).map_err(|source| LoadError::Io {
        path: odds_dir.to_path_buf(),
        source,
    })?;

    let path = odds_dir.join(snapshot_filename(sport_key, taken_at));
    let json = serde_json::to_string_pretty(events).map_err(|source| LoadError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// List all snapshot files in a directory, oldest first
pub fn list_snapshots<P: AsRef<Path>>(odds_dir: P) -> Vec<SnapshotFile> {
    let mut results = Vec::new();

    if let Ok(entries) = fs::read_dir(odds_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(base) = path
                .file_name()
                .and_then(|f| f.to_str())
                .and_then(|f| f.strip_suffix(".json"))
            else {
                continue;
            };

            if let Some((sport_key, taken_at)) = parse_filename(base) {
                results.push(SnapshotFile {
                    sport_key,
                    taken_at,
                    path,
                });
            }
        }
    }

    results.sort_by(|a, b| a.taken_at.cmp(&b.taken_at).then(a.sport_key.cmp(&b.sport_key)));
    results
}

/// Most recent snapshot for a sport
pub fn latest_snapshot<P: AsRef<Path>>(odds_dir: P, sport_key: &str) -> Option<SnapshotFile> {
    list_snapshots(odds_dir)
        .into_iter()
        .filter(|s| s.sport_key == sport_key)
        .max_by(|a, b| a.taken_at.cmp(&b.taken_at))
}

/// Parse "basketball_nba_20240115T190000" to (sport key, timestamp)
fn parse_filename(base: &str) -> Option<(String, NaiveDateTime)> {
    let (sport_key, stamp) = base.rsplit_once('_')?;
    if sport_key.is_empty() {
        return None;
    }
    let taken_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    Some((sport_key.to_string(), taken_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event(id: &str) -> FeedEvent {
        FeedEvent {
            id: id.to_string(),
            sport_key: "basketball_nba".to_string(),
            home_team: "Boston Celtics".to_string(),
            away_team: "Miami Heat".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_filename() {
        let (sport, at) = parse_filename("basketball_nba_20240115T190000").unwrap();
        assert_eq!(sport, "basketball_nba");
        assert_eq!(at.format(TIMESTAMP_FORMAT).to_string(), "20240115T190000");
        assert_eq!(parse_filename("invalid"), None);
        assert_eq!(parse_filename("basketball_nba_tonight"), None);
        assert_eq!(parse_filename("_20240115T190000"), None);
    }

    #[test]
    fn test_snapshot_filename() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap();
        assert_eq!(
            snapshot_filename("icehockey_nhl", at),
            "icehockey_nhl_20240115T190000.json"
        );
    }

    #[test]
    fn test_save_list_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let early = Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap();

        save_snapshot(dir.path(), "basketball_nba", &[sample_event("a")], early).unwrap();
        let latest_path = save_snapshot(
            dir.path(),
            "basketball_nba",
            &[sample_event("b"), sample_event("c")],
            late,
        )
        .unwrap();
        save_snapshot(dir.path(), "baseball_mlb", &[], late).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let snapshots = list_snapshots(dir.path());
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].sport_key, "basketball_nba");

        let latest = latest_snapshot(dir.path(), "basketball_nba").unwrap();
        assert_eq!(latest.path, latest_path);

        let listings = load_listings(&latest.path).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].id, "b");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_listings("/nonexistent/odds.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_listings(&path).unwrap_err(),
            LoadError::Json { .. }
        ));
    }
}
