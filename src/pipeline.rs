//! One collection run: fetch, compare, persist, patch badges, report.
//!
//! Fetch happens before any write, so a failed fetch leaves every artifact
//! untouched. Badge and notification problems are logged and carried in the
//! outcome; they never undo the persisted data.

use crate::badges::{self, BadgeKind};
use crate::error::PipelineError;
use crate::fetch::StatsSource;
use crate::notify::Notifier;
use crate::report::Renderer;
use crate::stats::{self, ChangeSet, DailyEntry, History, Summary};
use crate::store::{DocumentStore, SnapshotStore};
use chrono::Utc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum BadgeStatus {
    Updated { missing: Vec<BadgeKind> },
    DocumentMissing,
    Disabled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotifyStatus {
    Sent,
    /// No credentials configured.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub changes: ChangeSet,
    pub history_len: usize,
    pub message: String,
    pub badges: BadgeStatus,
    pub notification: NotifyStatus,
}

pub struct Pipeline<F, S, D, N> {
    source: F,
    store: S,
    document: Option<D>,
    notifier: Option<N>,
    renderer: Renderer,
    history_limit: usize,
}

impl<F, S, D, N> Pipeline<F, S, D, N> {
    pub fn into_parts(self) -> (F, S, Option<D>, Option<N>) {
        (self.source, self.store, self.document, self.notifier)
    }
}

impl<F, S, D, N> Pipeline<F, S, D, N>
where
    F: StatsSource,
    S: SnapshotStore,
    D: DocumentStore,
    N: Notifier,
{
    pub fn new(
        source: F,
        store: S,
        document: Option<D>,
        notifier: Option<N>,
        renderer: Renderer,
    ) -> Self {
        Self {
            source,
            store,
            document,
            notifier,
            renderer,
            history_limit: stats::DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub async fn run(&self) -> Result<RunOutcome, PipelineError> {
        info!("starting stats collection");

        let current = self.source.fetch().await?;
        info!(total = current.downloads, versions = current.versions.len(), "fetched stats");

        let previous = self.store.load_summary();
        let mut history = History::new(self.store.load_history(), self.history_limit);

        let changes = stats::compute(&current, previous.as_ref());
        info!(
            net_new = changes.net_new_downloads,
            growth = changes.growth_percentage,
            new_versions = changes.new_versions.len(),
            "computed changes"
        );

        let now = Utc::now();
        history.push(DailyEntry::new(current.clone(), changes.clone(), now));
        let summary = Summary::from_run(&current, &changes, now);
        self.store.save(&history, &summary)?;
        info!(history = history.len(), "data saved");

        let badges = self.update_badges(current.downloads, changes.net_new_downloads);

        let message = self.renderer.render(&current, &changes);
        let notification = self.notify(&message).await;

        Ok(RunOutcome {
            changes,
            history_len: history.len(),
            message,
            badges,
            notification,
        })
    }

    fn update_badges(&self, total: u64, net_new: i64) -> BadgeStatus {
        let Some(document) = &self.document else {
            return BadgeStatus::Disabled;
        };

        let text = match document.read() {
            Ok(Some(text)) => text,
            Ok(None) => {
                warn!("document not found, skipping badge update");
                return BadgeStatus::DocumentMissing;
            }
            Err(e) => {
                warn!(error = %e, "failed to read document");
                return BadgeStatus::Failed(e.to_string());
            }
        };

        let update = badges::update_badges(&text, total, net_new);
        if update.document != text {
            if let Err(e) = document.write(&update.document) {
                warn!(error = %e, "failed to write document");
                return BadgeStatus::Failed(e.to_string());
            }
        }
        info!(missing = update.missing.len(), "badges updated");
        BadgeStatus::Updated {
            missing: update.missing,
        }
    }

    async fn notify(&self, message: &str) -> NotifyStatus {
        let Some(notifier) = &self.notifier else {
            info!("notifier credentials not configured, skipping");
            return NotifyStatus::Skipped;
        };
        match notifier.send(message).await {
            Ok(()) => {
                info!("notification sent");
                NotifyStatus::Sent
            }
            Err(e) => {
                warn!(error = %e, "failed to send notification");
                NotifyStatus::Failed(e.to_string())
            }
        }
    }
}
