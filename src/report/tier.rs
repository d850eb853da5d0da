/// Per-version daily gain above which a version counts as hot.
pub const HOT_DELTA: u64 = 50;
pub const ACTIVE_DELTA: u64 = 10;
/// Lifetime downloads above which an older version still counts as popular.
pub const POPULAR_DOWNLOADS: u64 = 500;
pub const STABLE_DOWNLOADS: u64 = 200;

pub const DEFAULT_MILESTONES: [u64; 3] = [3_000, 5_000, 10_000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTier {
    Latest,
    New,
    Hot,
    Active,
    PopularLegacy,
    StableLegacy,
    Old,
}

impl VersionTier {
    /// First matching rule wins, in declaration order.
    pub fn classify(is_latest: bool, is_new: bool, delta: u64, downloads: u64) -> Self {
        if is_latest {
            VersionTier::Latest
        } else if is_new {
            VersionTier::New
        } else if delta > HOT_DELTA {
            VersionTier::Hot
        } else if delta > ACTIVE_DELTA {
            VersionTier::Active
        } else if downloads > POPULAR_DOWNLOADS {
            VersionTier::PopularLegacy
        } else if downloads > STABLE_DOWNLOADS {
            VersionTier::StableLegacy
        } else {
            VersionTier::Old
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            VersionTier::Latest => "🌟",
            VersionTier::New => "🆕",
            VersionTier::Hot => "🔥",
            VersionTier::Active => "⚡",
            VersionTier::PopularLegacy => "🏆",
            VersionTier::StableLegacy => "💎",
            VersionTier::Old => "📜",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Celebration {
    Excellent,
    Great,
    Moderate,
    Quiet,
}

impl Celebration {
    pub fn for_net_new(net_new: i64) -> Option<Self> {
        if net_new > 100 {
            Some(Celebration::Excellent)
        } else if net_new > 50 {
            Some(Celebration::Great)
        } else if net_new > 10 {
            Some(Celebration::Moderate)
        } else if net_new == 0 {
            Some(Celebration::Quiet)
        } else {
            None
        }
    }

    pub fn line(self, net_new: i64) -> String {
        match self {
            Celebration::Excellent => format!("🎉 *EXCELLENT!* +{} downloads today!", net_new),
            Celebration::Great => format!("🎊 *GREAT!* +{} new downloads!", net_new),
            Celebration::Moderate => format!("👍 +{} new downloads", net_new),
            Celebration::Quiet => "😴 No new downloads today".to_string(),
        }
    }
}

/// Highest threshold the total crossed upwards during this run.
pub fn crossed_milestone(milestones: &[u64], total: u64, net_new: i64) -> Option<u64> {
    let before = total as i64 - net_new;
    milestones
        .iter()
        .copied()
        .filter(|&threshold| total >= threshold && before < threshold as i64)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_precedence() {
        assert_eq!(VersionTier::classify(true, true, 100, 1000), VersionTier::Latest);
        assert_eq!(VersionTier::classify(false, true, 100, 1000), VersionTier::New);
        assert_eq!(VersionTier::classify(false, false, 51, 1000), VersionTier::Hot);
        assert_eq!(VersionTier::classify(false, false, 50, 1000), VersionTier::Active);
        assert_eq!(VersionTier::classify(false, false, 11, 0), VersionTier::Active);
        assert_eq!(VersionTier::classify(false, false, 10, 501), VersionTier::PopularLegacy);
        assert_eq!(VersionTier::classify(false, false, 0, 500), VersionTier::StableLegacy);
        assert_eq!(VersionTier::classify(false, false, 0, 200), VersionTier::Old);
    }

    #[test]
    fn test_celebration_thresholds() {
        assert_eq!(Celebration::for_net_new(101), Some(Celebration::Excellent));
        assert_eq!(Celebration::for_net_new(100), Some(Celebration::Great));
        assert_eq!(Celebration::for_net_new(50), Some(Celebration::Moderate));
        assert_eq!(Celebration::for_net_new(10), None);
        assert_eq!(Celebration::for_net_new(0), Some(Celebration::Quiet));
        assert_eq!(Celebration::for_net_new(-4), None);
    }

    #[test]
    fn test_milestone_fires_once() {
        assert_eq!(crossed_milestone(&DEFAULT_MILESTONES, 3005, 15), Some(3000));
        assert_eq!(crossed_milestone(&DEFAULT_MILESTONES, 3010, 5), None);
    }

    #[test]
    fn test_milestone_picks_highest_crossed() {
        assert_eq!(crossed_milestone(&DEFAULT_MILESTONES, 5200, 2500), Some(5000));
        assert_eq!(crossed_milestone(&DEFAULT_MILESTONES, 10_000, 10_000), Some(10_000));
    }

    #[test]
    fn test_milestone_ignores_regression() {
        assert_eq!(crossed_milestone(&DEFAULT_MILESTONES, 2990, -20), None);
    }
}
