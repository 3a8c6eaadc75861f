use crate::config::SiteProfile;
use crate::crawlers::{self, PageFetcher};
use crate::error::SnapshotError;
use crate::notify::Notifier;
use crate::snapshot::{self, SnapshotFormat, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordering of the snapshot write relative to the email send
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Write the snapshot, then send. A failed send leaves a pending marker
    /// that later runs keep re-sending until delivery succeeds.
    #[default]
    BeforeSend,
    /// Send first and write only after a successful send, so a failed send
    /// is detected as a change again on the next run.
    AfterSend,
}

/// Terminal state of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every site failed or listed nothing
    NoData,
    /// Same snapshot as last time
    Unchanged,
    ChangedNotified,
    ChangedNotifyFailed,
    /// The new snapshot could not be written
    PersistFailed,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::NoData => "no-data",
            RunOutcome::Unchanged => "unchanged",
            RunOutcome::ChangedNotified => "changed-notified",
            RunOutcome::ChangedNotifyFailed => "changed-notify-failed",
            RunOutcome::PersistFailed => "persist-failed",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scrape, compare against the stored snapshot, and notify on change
pub struct Pipeline {
    sites: Vec<SiteProfile>,
    fetcher: Box<dyn PageFetcher>,
    notifier: Box<dyn Notifier>,
    store: SnapshotStore,
    format: SnapshotFormat,
    persist: PersistPolicy,
}

impl Pipeline {
    pub fn new(
        sites: Vec<SiteProfile>,
        fetcher: Box<dyn PageFetcher>,
        notifier: Box<dyn Notifier>,
        store: SnapshotStore,
    ) -> Self {
        Self {
            sites,
            fetcher,
            notifier,
            store,
            format: SnapshotFormat::default(),
            persist: PersistPolicy::default(),
        }
    }

    /// Set the snapshot serialization format
    pub fn with_format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the write/send ordering
    pub fn with_persist_policy(mut self, persist: PersistPolicy) -> Self {
        self.persist = persist;
        self
    }

    /// Execute one full run. Never fails; every error ends in a logged
    /// terminal state.
    pub async fn run(&self) -> RunOutcome {
        let outcome = self.run_inner().await;
        ::log::info!("Run finished: {}", outcome);
        outcome
    }

    async fn run_inner(&self) -> RunOutcome {
        let reports = crawlers::collect(&self.sites, self.fetcher.as_ref()).await;
        let records = crawlers::flatten(reports);

        if records.is_empty() {
            ::log::info!("No vehicles found on any site, nothing to report");
            return RunOutcome::NoData;
        }

        let new_snapshot = self.format.serialize(&records);
        let changed = match self.store.read() {
            Ok(stored) => snapshot::has_changed(&new_snapshot, &stored),
            Err(SnapshotError::NotFound(path)) => {
                ::log::info!("No previous snapshot at {}, treating as changed", path.display());
                true
            }
            Err(e) => {
                ::log::warn!("{}, treating as changed", e);
                true
            }
        };

        if !changed {
            ::log::info!("Inventory unchanged ({} vehicles)", records.len());
            return self.resend_pending().await.unwrap_or(RunOutcome::Unchanged);
        }

        ::log::info!("Inventory changed ({} vehicles)", records.len());
        match self.persist {
            PersistPolicy::BeforeSend => self.persist_then_send(&new_snapshot).await,
            PersistPolicy::AfterSend => self.send_then_persist(&new_snapshot).await,
        }
    }

    async fn persist_then_send(&self, new_snapshot: &str) -> RunOutcome {
        if let Err(e) = self.store.write(new_snapshot) {
            ::log::error!("{}, not sending notification", e);
            return RunOutcome::PersistFailed;
        }

        self.send_tracking_pending(new_snapshot).await
    }

    async fn send_then_persist(&self, new_snapshot: &str) -> RunOutcome {
        // Stage first so an unwritable snapshot never leads to an email
        let staged = match self.store.stage(new_snapshot) {
            Ok(staged) => staged,
            Err(e) => {
                ::log::error!("{}, not sending notification", e);
                return RunOutcome::PersistFailed;
            }
        };

        if let Err(e) = self.notifier.notify(new_snapshot).await {
            ::log::error!("Notification failed, snapshot left as is: {}", e);
            staged.discard();
            return RunOutcome::ChangedNotifyFailed;
        }

        if let Err(e) = staged.commit() {
            ::log::error!("{}", e);
            return RunOutcome::PersistFailed;
        }

        RunOutcome::ChangedNotified
    }

    /// Sends `snapshot`, leaving a pending marker behind if delivery fails
    async fn send_tracking_pending(&self, snapshot: &str) -> RunOutcome {
        match self.notifier.notify(snapshot).await {
            Ok(()) => {
                if let Err(e) = self.store.clear_pending() {
                    ::log::warn!("Failed to clear pending notification: {}", e);
                }
                RunOutcome::ChangedNotified
            }
            Err(e) => {
                ::log::error!("Notification failed: {}", e);
                if let Err(e) = self.store.mark_pending(snapshot) {
                    ::log::error!("Failed to record pending notification: {}", e);
                }
                RunOutcome::ChangedNotifyFailed
            }
        }
    }

    /// Re-sends a snapshot whose earlier notification failed
    async fn resend_pending(&self) -> Option<RunOutcome> {
        let pending = match self.store.pending() {
            Ok(pending) => pending?,
            Err(e) => {
                ::log::warn!("Failed to read pending notification: {}", e);
                return None;
            }
        };

        ::log::info!("Retrying notification that failed on an earlier run");
        Some(self.send_tracking_pending(&pending).await)
    }
}
