use crate::format::thousands;
use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use std::fmt;

pub const BADGE_SERVICE: &str = "https://img.shields.io/badge/";

lazy_static! {
    static ref TOTAL_BADGE: Regex =
        Regex::new(r"!\[[^\]]*\]\(https://img\.shields\.io/badge/Total%20Downloads[^)]*\)")
            .expect("total downloads badge pattern");
    static ref GROWTH_BADGE: Regex =
        Regex::new(r"!\[[^\]]*\]\(https://img\.shields\.io/badge/Daily%20Growth[^)]*\)")
            .expect("daily growth badge pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    TotalDownloads,
    DailyGrowth,
}

impl BadgeKind {
    pub fn key(self) -> &'static str {
        match self {
            BadgeKind::TotalDownloads => "Total%20Downloads",
            BadgeKind::DailyGrowth => "Daily%20Growth",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            BadgeKind::TotalDownloads => &*TOTAL_BADGE,
            BadgeKind::DailyGrowth => &*GROWTH_BADGE,
        }
    }
}

impl fmt::Display for BadgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Result of patching a document: the new text and the badges that were not found.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeUpdate {
    pub document: String,
    pub missing: Vec<BadgeKind>,
}

pub fn total_badge(total_downloads: u64) -> String {
    format!(
        "![Downloads]({}{}-{}-blue)",
        BADGE_SERVICE,
        BadgeKind::TotalDownloads.key(),
        thousands(total_downloads)
    )
}

pub fn growth_badge(net_new_downloads: i64) -> String {
    // A bare `-` is the shields.io field separator, so negatives use U+2212.
    let (value, color) = match net_new_downloads {
        n if n > 0 => (format!("+{}", n), "brightgreen"),
        0 => ("0".to_string(), "yellow"),
        n => (format!("%E2%88%92{}", n.unsigned_abs()), "red"),
    };
    format!(
        "![Daily Growth]({}{}-{}-{})",
        BADGE_SERVICE,
        BadgeKind::DailyGrowth.key(),
        value,
        color
    )
}

/// Rewrites the total and daily-growth badges in `document`.
///
/// Only the matched badge constructs change; everything else is kept byte for
/// byte. A badge that cannot be found is reported in `missing` and the
/// document is left as it was for that badge.
pub fn update_badges(document: &str, total_downloads: u64, net_new_downloads: i64) -> BadgeUpdate {
    let mut text = document.to_string();
    let mut missing = Vec::new();

    let replacements = [
        (BadgeKind::TotalDownloads, total_badge(total_downloads)),
        (BadgeKind::DailyGrowth, growth_badge(net_new_downloads)),
    ];
    for (kind, badge) in replacements {
        match replace_badge(&text, kind, &badge) {
            Some(updated) => text = updated,
            None => {
                tracing::warn!(badge = %kind, "could not find badge to update");
                missing.push(kind);
            }
        }
    }

    BadgeUpdate {
        document: text,
        missing,
    }
}

fn replace_badge(content: &str, kind: BadgeKind, badge: &str) -> Option<String> {
    let pattern = kind.pattern();
    if pattern.is_match(content) {
        Some(pattern.replace_all(content, NoExpand(badge)).into_owned())
    } else {
        None
    }
}
