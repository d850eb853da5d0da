use super::{ChangeSet, StatsSnapshot, Summary, VersionId};

/// Compares a fresh snapshot against the previous summary.
///
/// Without a previous summary (first run) the result is all zeros. Versions
/// whose count did not grow are left out of `version_changes`; a version is
/// listed in `new_versions` whenever the previous summary has never seen it.
pub fn compute(current: &StatsSnapshot, previous: Option<&Summary>) -> ChangeSet {
    let Some(previous) = previous else {
        return ChangeSet::default();
    };

    let net_new_downloads = current.downloads as i64 - previous.total_downloads as i64;
    let growth_percentage = if previous.total_downloads > 0 {
        net_new_downloads as f64 / previous.total_downloads as f64 * 100.0
    } else {
        0.0
    };

    let mut changes = ChangeSet {
        net_new_downloads,
        growth_percentage,
        ..Default::default()
    };

    for (version, &downloads) in &current.versions {
        let delta = downloads as i64 - previous.version_downloads(version) as i64;
        if delta > 0 {
            changes.version_changes.insert(version.clone(), delta as u64);
        }
        if !previous.versions.contains_key(version) {
            changes.new_versions.push(version.clone());
        }
    }
    changes
        .new_versions
        .sort_by_cached_key(|version| VersionId::parse(version));

    changes
}
