//! Listing driver
//!
//! Resolves the queried root once, then pulls items from a listing source one
//! at a time: failed items are classified and reported, listed entries are
//! trimmed, formatted and emitted. A single bad entry never ends the listing;
//! only end of stream or cancellation does.

use futures::StreamExt;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::ListingOutcome;
use crate::error::{Error, Result};
use crate::record::{DisplayRecord, RecordFormatter};
use crate::traits::{ListItem, ListOptions, ListingSource, RootResolver, Sink};
use crate::trim::Trimmer;

/// Totals of a finished (or cancelled) listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    /// Records emitted
    pub records: usize,
    pub folders: usize,
    pub files: usize,
    /// Sum of file sizes in bytes
    pub total_size: u64,
    /// Entries that failed to list
    pub errors: usize,
    /// The listing stopped early because it was cancelled
    pub cancelled: bool,
}

impl ListingSummary {
    fn add(&mut self, record: &DisplayRecord) {
        self.records += 1;
        if record.is_folder() {
            self.folders += 1;
        } else {
            self.files += 1;
            self.total_size += record.size;
        }
    }
}

/// Drives one listing from a source into a sink
#[derive(Debug, Clone)]
pub struct ListingDriver {
    formatter: RecordFormatter,
    cancel: CancellationToken,
}

impl ListingDriver {
    pub fn new(formatter: RecordFormatter) -> Self {
        Self {
            formatter,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop pulling items once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn formatter(&self) -> &RecordFormatter {
        &self.formatter
    }

    /// Process a single listed item against a prepared trimmer
    pub fn process(&self, trimmer: &Trimmer, item: ListItem) -> ListingOutcome {
        match item {
            Ok(entry) => {
                let trimmed = trimmer.trim_entry(&entry);
                ListingOutcome::Record(self.formatter.format(&trimmed))
            }
            Err(error) => ListingOutcome::failed(error),
        }
    }

    /// List `location` into `sink`.
    ///
    /// Fails only if the root cannot be resolved. Per-entry failures are
    /// reported to the sink and counted in the summary.
    pub async fn run<R, S, K>(
        &self,
        location: &str,
        resolver: &R,
        source: &S,
        options: ListOptions,
        sink: &mut K,
    ) -> Result<ListingSummary>
    where
        R: RootResolver + ?Sized,
        S: ListingSource + ?Sized,
        K: Sink + ?Sized,
    {
        let root = resolver.resolve(location).await.map_err(|e| match e {
            Error::RootResolution { .. } => e,
            other => Error::root_resolution(location, other),
        })?;
        let trimmer = Trimmer::new(&root);
        debug!(location, root = %root.path, is_dir = root.is_dir, "resolved listing root");

        let mut summary = ListingSummary::default();
        let mut items = source.list(options);

        loop {
            let item = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(location, "listing cancelled");
                    summary.cancelled = true;
                    break;
                }
                item = items.next() => item,
            };

            let Some(item) = item else {
                break;
            };

            match self.process(&trimmer, item) {
                ListingOutcome::Record(record) => {
                    summary.add(&record);
                    sink.record(&record);
                }
                ListingOutcome::Failed { category, error } => {
                    warn!(%category, error = %error, "{}", category.message());
                    summary.errors += 1;
                    sink.entry_error(category, &error);
                }
            }
        }

        debug!(
            location,
            records = summary.records,
            errors = summary.errors,
            "listing done"
        );
        Ok(summary)
    }
}

impl Default for ListingDriver {
    fn default() -> Self {
        Self::new(RecordFormatter::default())
    }
}
