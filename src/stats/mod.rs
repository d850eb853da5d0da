pub mod delta;
pub mod version;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use delta::compute;
pub use version::VersionId;

/// Rolling window kept in the history file.
pub const DEFAULT_HISTORY_LIMIT: usize = 90;

/// One plugin entry of the upstream stats file.
///
/// The upstream object mixes two reserved keys (`downloads`, `updated`) with
/// one key per released version; everything that is not reserved lands in
/// `versions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(flatten)]
    pub versions: BTreeMap<String, u64>,
}

impl StatsSnapshot {
    /// Download count for `version`, zero when the version is unknown.
    pub fn version_downloads(&self, version: &str) -> u64 {
        self.versions.get(version).copied().unwrap_or(0)
    }
}

/// Last persisted rollup, the baseline for the next run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default)]
    pub versions: BTreeMap<String, u64>,
    #[serde(default)]
    pub daily_change: i64,
    #[serde(default)]
    pub growth_percentage: f64,
}

impl Summary {
    pub fn from_run(current: &StatsSnapshot, changes: &ChangeSet, now: DateTime<Utc>) -> Self {
        Self {
            last_updated: timestamp(now),
            total_downloads: current.downloads,
            versions: current.versions.clone(),
            daily_change: changes.net_new_downloads,
            growth_percentage: changes.growth_percentage,
        }
    }

    pub fn version_downloads(&self, version: &str) -> u64 {
        self.versions.get(version).copied().unwrap_or(0)
    }
}

/// Difference between a fresh snapshot and the previous summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    #[serde(rename = "new_downloads", default)]
    pub net_new_downloads: i64,
    #[serde(default)]
    pub growth_percentage: f64,
    /// Only versions that gained downloads.
    #[serde(default)]
    pub version_changes: BTreeMap<String, u64>,
    #[serde(default)]
    pub new_versions: Vec<String>,
}

impl ChangeSet {
    pub fn version_change(&self, version: &str) -> u64 {
        self.version_changes.get(version).copied().unwrap_or(0)
    }

    pub fn is_new(&self, version: &str) -> bool {
        self.new_versions.iter().any(|v| v == version)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: String,
    pub stats: StatsSnapshot,
    pub changes: ChangeSet,
}

impl DailyEntry {
    pub fn new(stats: StatsSnapshot, changes: ChangeSet, now: DateTime<Utc>) -> Self {
        Self {
            date: timestamp(now),
            stats,
            changes,
        }
    }
}

/// Append-only daily history bounded to the most recent `limit` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<DailyEntry>,
    limit: usize,
}

impl History {
    pub fn new(entries: Vec<DailyEntry>, limit: usize) -> Self {
        let mut history = Self {
            entries,
            limit: limit.max(1),
        };
        history.truncate();
        history
    }

    pub fn push(&mut self, entry: DailyEntry) {
        self.entries.push(entry);
        self.truncate();
    }

    pub fn entries(&self) -> &[DailyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&DailyEntry> {
        self.entries.last()
    }

    fn truncate(&mut self) {
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u64) -> DailyEntry {
        let stats = StatsSnapshot {
            downloads: n,
            ..Default::default()
        };
        DailyEntry::new(stats, ChangeSet::default(), Utc::now())
    }

    #[test]
    fn test_snapshot_splits_reserved_keys() {
        let json = r#"{"downloads": 150, "updated": 1718000000000, "1.0.0": 120, "1.1.0": 30}"#;
        let snapshot: StatsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.downloads, 150);
        assert_eq!(snapshot.updated, Some(1718000000000));
        assert_eq!(snapshot.versions.len(), 2);
        assert_eq!(snapshot.version_downloads("1.1.0"), 30);
        assert_eq!(snapshot.version_downloads("9.9.9"), 0);
    }

    #[test]
    fn test_snapshot_missing_total_defaults_to_zero() {
        let snapshot: StatsSnapshot = serde_json::from_str(r#"{"1.0.0": 3}"#).unwrap();
        assert_eq!(snapshot.downloads, 0);
        assert_eq!(snapshot.updated, None);
    }

    #[test]
    fn test_summary_partial_fields() {
        let summary: Summary = serde_json::from_str(r#"{"total_downloads": 100}"#).unwrap();
        assert_eq!(summary.total_downloads, 100);
        assert!(summary.versions.is_empty());
        assert_eq!(summary.growth_percentage, 0.0);
    }

    #[test]
    fn test_changeset_uses_stored_field_names() {
        let changes = ChangeSet {
            net_new_downloads: -3,
            ..Default::default()
        };
        let value = serde_json::to_value(&changes).unwrap();
        assert_eq!(value["new_downloads"], -3);
        assert!(value.get("version_changes").is_some());
        assert!(value.get("new_versions").is_some());
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = History::new(Vec::new(), 3);
        for n in 0..5 {
            history.push(entry(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[0].stats.downloads, 2);
        assert_eq!(history.last().unwrap().stats.downloads, 4);
    }

    #[test]
    fn test_history_truncates_oversized_input() {
        let entries = (0..100).map(entry).collect();
        let history = History::new(entries, DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(history.entries()[0].stats.downloads, 10);
    }
}
