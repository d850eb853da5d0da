pub mod clock;
pub mod tier;

use crate::format::{thousands, thousands_signed};
use crate::stats::{version, ChangeSet, StatsSnapshot, VersionId};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use tier::{Celebration, VersionTier};

/// Builds the daily Markdown report sent to the notifier.
#[derive(Debug, Clone)]
pub struct Renderer {
    display_name: String,
    milestones: Vec<u64>,
}

/// One line of the version breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionLine {
    pub version: String,
    pub downloads: u64,
    pub change: u64,
    pub share: f64,
    pub tier: VersionTier,
}

impl Renderer {
    pub fn new(display_name: impl Into<String>, milestones: Vec<u64>) -> Self {
        Self {
            display_name: display_name.into(),
            milestones,
        }
    }

    pub fn render(&self, current: &StatsSnapshot, changes: &ChangeSet) -> String {
        self.render_at(current, changes, Utc::now())
    }

    pub fn render_at(&self, current: &StatsSnapshot, changes: &ChangeSet, now: DateTime<Utc>) -> String {
        let total = current.downloads;
        let net_new = changes.net_new_downloads;
        let mut message = String::new();

        let _ = writeln!(message, "🔌 *{}*", self.display_name);
        message.push_str("📊 *Daily Download Report*\n\n");

        message.push_str("📈 *OVERVIEW*\n");
        let _ = writeln!(
            message,
            "📱 {} total downloads ({}{})",
            thousands(total),
            if net_new >= 0 { "+" } else { "" },
            thousands_signed(net_new)
        );
        if changes.growth_percentage > 0.0 {
            let _ = writeln!(message, "🚀 Growth: +{:.2}%", changes.growth_percentage);
        }
        message.push('\n');

        let lines = breakdown(current, changes);
        if !lines.is_empty() {
            message.push_str("📋 *VERSION BREAKDOWN*\n");
            for line in &lines {
                let change = if line.change > 0 {
                    format!(" (+{})", thousands(line.change))
                } else {
                    String::new()
                };
                let _ = writeln!(
                    message,
                    "{} v{}: {}{} ({:.1}%)",
                    line.tier.emoji(),
                    line.version,
                    thousands(line.downloads),
                    change,
                    line.share
                );
            }
        }

        if let Some(celebration) = Celebration::for_net_new(net_new) {
            let _ = writeln!(message, "\n{}", celebration.line(net_new));
        }

        if !changes.new_versions.is_empty() {
            let _ = writeln!(
                message,
                "\n🆕 *NEW VERSION!* v{}",
                changes.new_versions.join(", v")
            );
        }

        if let Some(milestone) = tier::crossed_milestone(&self.milestones, total, net_new) {
            let _ = writeln!(
                message,
                "\n🏆 *MILESTONE!* {} downloads reached! 🎉",
                milestone_label(milestone)
            );
        }

        let _ = write!(message, "\n📅 {}", clock::footer_stamp(now));
        message
    }
}

/// Versions sorted by descending downloads, ties broken by newest version first.
pub fn breakdown(current: &StatsSnapshot, changes: &ChangeSet) -> Vec<VersionLine> {
    let total = current.downloads;
    let latest = version::latest(current.versions.keys().map(String::as_str));

    let mut versions: Vec<(VersionId, u64)> = current
        .versions
        .iter()
        .map(|(name, &downloads)| (VersionId::parse(name), downloads))
        .collect();
    versions.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    versions
        .into_iter()
        .map(|(id, downloads)| {
            let change = changes.version_change(id.as_str());
            let share = if total > 0 {
                downloads as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            let tier = VersionTier::classify(
                latest.as_ref() == Some(&id),
                changes.is_new(id.as_str()),
                change,
                downloads,
            );
            VersionLine {
                version: id.as_str().to_string(),
                downloads,
                change,
                share,
                tier,
            }
        })
        .collect()
}

fn milestone_label(threshold: u64) -> String {
    if threshold >= 1000 && threshold % 1000 == 0 {
        format!("{}K", threshold / 1000)
    } else {
        thousands(threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tier::DEFAULT_MILESTONES;

    fn renderer() -> Renderer {
        Renderer::new("Nexus AI Chat Importer", DEFAULT_MILESTONES.to_vec())
    }

    fn snapshot(total: u64, versions: &[(&str, u64)]) -> StatsSnapshot {
        StatsSnapshot {
            downloads: total,
            updated: None,
            versions: versions.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_full_report_sections() {
        let current = snapshot(1500, &[("1.0.0", 1200), ("1.1.0", 300)]);
        let changes = ChangeSet {
            net_new_downloads: 120,
            growth_percentage: 8.69565,
            version_changes: [("1.1.0".to_string(), 120)].into(),
            new_versions: vec!["1.1.0".to_string()],
        };
        let text = renderer().render_at(&current, &changes, now());

        assert!(text.starts_with("🔌 *Nexus AI Chat Importer*\n📊 *Daily Download Report*"));
        assert!(text.contains("📱 1,500 total downloads (+120)"));
        assert!(text.contains("🚀 Growth: +8.70%"));
        assert!(text.contains("🏆 v1.0.0: 1,200 (80.0%)"));
        assert!(text.contains("🌟 v1.1.0: 300 (+120) (20.0%)"));
        assert!(text.contains("🎉 *EXCELLENT!* +120 downloads today!"));
        assert!(text.contains("🆕 *NEW VERSION!* v1.1.0"));
        assert!(!text.contains("MILESTONE"));
        assert!(text.ends_with("📅 15.01.2024 09:30 CET"));
    }

    #[test]
    fn test_quiet_day() {
        let current = snapshot(100, &[("1.0.0", 100)]);
        let text = renderer().render_at(&current, &ChangeSet::default(), now());

        assert!(text.contains("(+0)"));
        assert!(!text.contains("Growth"));
        assert!(text.contains("😴 No new downloads today"));
        assert!(!text.contains("NEW VERSION"));
    }

    #[test]
    fn test_negative_net_new_is_signed_once() {
        let current = snapshot(95, &[("1.0.0", 95)]);
        let changes = ChangeSet {
            net_new_downloads: -5,
            growth_percentage: -5.0,
            ..Default::default()
        };
        let text = renderer().render_at(&current, &changes, now());
        assert!(text.contains("95 total downloads (-5)"));
        assert!(!text.contains("Growth"));
        assert!(!text.contains("No new downloads"));
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let current = snapshot(0, &[("1.0.0", 0), ("0.9.0", 0)]);
        let lines = breakdown(&current, &ChangeSet::default());
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.share == 0.0));
    }

    #[test]
    fn test_breakdown_order_and_tiers() {
        let current = snapshot(
            2000,
            &[("1.9.0", 600), ("1.10.0", 100), ("1.2.0", 600), ("1.0.0", 250), ("0.1.0", 50), ("1.5.0", 400)],
        );
        let changes = ChangeSet {
            version_changes: [("1.5.0".to_string(), 60), ("0.1.0".to_string(), 12)].into(),
            ..Default::default()
        };
        let lines = breakdown(&current, &changes);
        let order: Vec<&str> = lines.iter().map(|l| l.version.as_str()).collect();
        assert_eq!(order, vec!["1.9.0", "1.2.0", "1.5.0", "1.0.0", "1.10.0", "0.1.0"]);

        let tiers: Vec<VersionTier> = lines.iter().map(|l| l.tier).collect();
        assert_eq!(
            tiers,
            vec![
                VersionTier::PopularLegacy,
                VersionTier::PopularLegacy,
                VersionTier::Hot,
                VersionTier::StableLegacy,
                VersionTier::Latest,
                VersionTier::Active,
            ]
        );
    }

    #[test]
    fn test_milestone_callout() {
        let current = snapshot(3005, &[("1.0.0", 3005)]);
        let changes = ChangeSet {
            net_new_downloads: 15,
            ..Default::default()
        };
        let text = renderer().render_at(&current, &changes, now());
        assert_eq!(text.matches("MILESTONE").count(), 1);
        assert!(text.contains("3K downloads reached!"));

        let next = snapshot(3010, &[("1.0.0", 3010)]);
        let changes = ChangeSet {
            net_new_downloads: 5,
            ..Default::default()
        };
        assert!(!renderer().render_at(&next, &changes, now()).contains("MILESTONE"));
    }

    #[test]
    fn test_no_versions_omits_breakdown() {
        let current = snapshot(10, &[]);
        let text = renderer().render_at(&current, &ChangeSet::default(), now());
        assert!(!text.contains("VERSION BREAKDOWN"));
    }

    #[test]
    fn test_milestone_label() {
        assert_eq!(milestone_label(10_000), "10K");
        assert_eq!(milestone_label(2_500), "2,500");
    }
}
