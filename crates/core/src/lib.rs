//! stls-core: Core library for the stls storage lister
//!
//! Turns the raw entries of a storage listing into printable records:
//! - Path separator normalization
//! - Trimming entry paths relative to the queried location
//! - Classification of per-entry listing failures
//! - Display records with structured and human renderings
//! - The listing driver tying these together
//!
//! Storage backends plug in through the [`ListingSource`] and [`RootResolver`]
//! traits. A local filesystem backend lives in [`local`]; configuration and
//! alias management for remote backends live here as well.

pub mod alias;
pub mod classify;
pub mod config;
pub mod driver;
pub mod entry;
pub mod error;
pub mod local;
pub mod normalize;
pub mod path;
pub mod record;
pub mod traits;
pub mod trim;

pub use alias::{Alias, AliasManager, RetryConfig, TimeoutConfig};
pub use classify::{EntryError, ErrorCategory, ListingOutcome, classify};
pub use config::{Config, ConfigManager, Defaults};
pub use driver::{ListingDriver, ListingSummary};
pub use entry::{Entry, QueriedRoot};
pub use error::{Error, Result};
pub use local::LocalFs;
pub use normalize::{SeparatorStyle, normalize};
pub use path::{ParsedPath, RemotePath, parse_path};
pub use record::{DisplayRecord, EntryKind, RecordFormatter, Segment, SegmentTag};
pub use traits::{ListItem, ListOptions, ListingSource, RootResolver, Sink};
pub use trim::{Trimmer, trim};
