//! Collaborator interfaces
//!
//! The listing driver is decoupled from storage backends and printers through
//! these traits. Backends implement [`RootResolver`] and [`ListingSource`];
//! printers implement [`Sink`].

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::classify::{EntryError, ErrorCategory};
use crate::entry::{Entry, QueriedRoot};
use crate::error::Result;
use crate::record::DisplayRecord;

/// One item of a listing: an entry, or the reason it could not be listed
pub type ListItem = std::result::Result<Entry, EntryError>;

/// Options passed through to the listing source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Descend into nested directories/prefixes
    pub recursive: bool,

    /// Include partially uploaded objects (backend specific)
    pub include_incomplete: bool,
}

/// Resolves a location identifier into the root the listing is relative to
///
/// This is the only step whose failure aborts a listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RootResolver: Send + Sync {
    async fn resolve(&self, location: &str) -> Result<QueriedRoot>;
}

/// Produces the entries under a location, lazily
///
/// Failures for single entries are yielded as `Err` items; the stream only
/// ends when the listing is exhausted.
pub trait ListingSource: Send + Sync {
    fn list(&self, options: ListOptions) -> BoxStream<'_, ListItem>;
}

/// Receives the normalized output of a listing
#[cfg_attr(test, mockall::automock)]
pub trait Sink {
    /// An entry that was listed successfully
    fn record(&mut self, record: &DisplayRecord);

    /// An entry that could not be listed
    fn entry_error(&mut self, category: ErrorCategory, error: &EntryError);
}
