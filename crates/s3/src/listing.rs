//! Paginated S3 listings
//!
//! [`S3Listing`] turns ListBuckets, ListObjectsV2 and ListMultipartUploads
//! pages into a lazy stream of entries. Entry paths have the form
//! `/bucket/key` with `/` as separator; buckets are listed as `/bucket/`.
//! A failed page request is yielded as a single error item and ends the
//! stream, since there is no continuation token to resume from.

use std::collections::VecDeque;

use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::types::{CommonPrefix, MultipartUpload, Object};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use jiff::Timestamp;
use tracing::debug;

use stls_core::{Entry, EntryError, ListItem, ListOptions, ListingSource, RemotePath};

use crate::client::{describe, is_not_found};

/// Keys requested per page unless overridden
const PAGE_SIZE: i32 = 1000;

/// Listing source for one remote location
#[derive(Clone)]
pub struct S3Listing {
    client: aws_sdk_s3::Client,
    target: RemotePath,
    page_size: i32,
}

impl S3Listing {
    pub fn new(client: aws_sdk_s3::Client, target: RemotePath) -> Self {
        Self {
            client,
            target,
            page_size: PAGE_SIZE,
        }
    }

    /// Request at most `page_size` keys per page (clamped to at least one)
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn target(&self) -> &RemotePath {
        &self.target
    }
}

impl ListingSource for S3Listing {
    fn list(&self, options: ListOptions) -> BoxStream<'_, ListItem> {
        let mut pager = Pager::new(self.client.clone(), self.target.clone(), options);
        pager.page_size = self.page_size;
        stream::unfold(pager, |mut pager| async move {
            let item = pager.next_item().await?;
            Some((item, pager))
        })
        .boxed()
    }
}

enum Phase {
    Start,
    Objects {
        token: Option<String>,
    },
    Uploads {
        key_marker: Option<String>,
        upload_id_marker: Option<String>,
    },
    Done,
}

struct Pager {
    client: aws_sdk_s3::Client,
    target: RemotePath,
    options: ListOptions,
    prefix: String,
    page_size: i32,
    phase: Phase,
    buffer: VecDeque<ListItem>,
}

impl Pager {
    fn new(client: aws_sdk_s3::Client, target: RemotePath, options: ListOptions) -> Self {
        let prefix = target.key.clone();
        Self {
            client,
            target,
            options,
            prefix,
            page_size: PAGE_SIZE,
            phase: Phase::Start,
            buffer: VecDeque::new(),
        }
    }

    fn delimiter(&self) -> Option<&'static str> {
        (!self.options.recursive).then_some("/")
    }

    async fn next_item(&mut self) -> Option<ListItem> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(item);
            }
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Done => return None,
                Phase::Start => self.start().await,
                Phase::Objects { token } => self.fetch_objects(token).await,
                Phase::Uploads {
                    key_marker,
                    upload_id_marker,
                } => self.fetch_uploads(key_marker, upload_id_marker).await,
            }
        }
    }

    async fn start(&mut self) {
        if self.target.is_alias_root() {
            self.fetch_buckets().await;
            return;
        }

        if !self.target.is_dir() {
            let head = self
                .client
                .head_object()
                .bucket(&self.target.bucket)
                .key(&self.target.key)
                .send()
                .await;
            match head {
                Ok(head) => {
                    let size = head.content_length().unwrap_or_default();
                    let modified = head.last_modified().and_then(to_timestamp);
                    self.buffer.push_back(Ok(object_entry(
                        &self.target.bucket,
                        &self.target.key,
                        size,
                        modified,
                    )));
                    return;
                }
                Err(e) if is_not_found(&e) => self.prefix.push('/'),
                Err(e) => {
                    self.buffer
                        .push_back(Err(EntryError::backend(e.code(), describe(&e))));
                    return;
                }
            }
        }

        self.phase = if self.options.include_incomplete {
            Phase::Uploads {
                key_marker: None,
                upload_id_marker: None,
            }
        } else {
            Phase::Objects { token: None }
        };
    }

    async fn fetch_buckets(&mut self) {
        match self.client.list_buckets().send().await {
            Ok(response) => {
                for bucket in response.buckets() {
                    let name = bucket.name().unwrap_or_default();
                    let mut entry = Entry::dir(format!("/{name}/"));
                    if let Some(created) = bucket.creation_date().and_then(to_timestamp) {
                        entry = entry.with_modified(created);
                    }
                    self.buffer.push_back(Ok(entry));
                }
            }
            Err(e) => self
                .buffer
                .push_back(Err(EntryError::backend(e.code(), describe(&e)))),
        }
    }

    async fn fetch_objects(&mut self, token: Option<String>) {
        debug!(bucket = %self.target.bucket, prefix = %self.prefix, "listing objects page");
        let response = self
            .client
            .list_objects_v2()
            .bucket(&self.target.bucket)
            .prefix(&self.prefix)
            .set_delimiter(self.delimiter().map(str::to_string))
            .set_continuation_token(token)
            .max_keys(self.page_size)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.buffer
                    .push_back(Err(EntryError::backend(e.code(), describe(&e))));
                return;
            }
        };

        let page = object_page(
            &self.target.bucket,
            &self.prefix,
            response.common_prefixes(),
            response.contents(),
        );
        self.push_page(page);

        if response.is_truncated().unwrap_or(false) {
            if let Some(next) = response.next_continuation_token() {
                self.phase = Phase::Objects {
                    token: Some(next.to_string()),
                };
            }
        }
    }

    async fn fetch_uploads(&mut self, key_marker: Option<String>, upload_id_marker: Option<String>) {
        debug!(bucket = %self.target.bucket, prefix = %self.prefix, "listing incomplete uploads page");
        let response = self
            .client
            .list_multipart_uploads()
            .bucket(&self.target.bucket)
            .prefix(&self.prefix)
            .set_delimiter(self.delimiter().map(str::to_string))
            .set_key_marker(key_marker)
            .set_upload_id_marker(upload_id_marker)
            .max_uploads(self.page_size)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.buffer
                    .push_back(Err(EntryError::backend(e.code(), describe(&e))));
                return;
            }
        };

        let page = upload_page(
            &self.target.bucket,
            response.common_prefixes(),
            response.uploads(),
        );
        self.push_page(page);

        if response.is_truncated().unwrap_or(false) {
            self.phase = Phase::Uploads {
                key_marker: response.next_key_marker().map(str::to_string),
                upload_id_marker: response.next_upload_id_marker().map(str::to_string),
            };
        }
    }

    fn push_page(&mut self, page: Vec<Entry>) {
        self.buffer.extend(page.into_iter().map(Ok));
    }
}

/// Entries of one ListObjectsV2 page, sorted by path.
///
/// Zero-byte objects whose key ends in `/` are folder markers: the marker of
/// the listed prefix itself is skipped, any other marker is a folder.
fn object_page(
    bucket: &str,
    prefix: &str,
    prefixes: &[CommonPrefix],
    objects: &[Object],
) -> Vec<Entry> {
    let mut page = prefix_entries(bucket, prefixes);
    for object in objects {
        let key = object.key().unwrap_or_default();
        if key.is_empty() || key == prefix {
            continue;
        }
        let modified = object.last_modified().and_then(to_timestamp);
        if key.ends_with('/') {
            let mut entry = Entry::dir(object_path(bucket, key));
            if let Some(modified) = modified {
                entry = entry.with_modified(modified);
            }
            page.push(entry);
        } else {
            let size = object.size().unwrap_or_default();
            page.push(object_entry(bucket, key, size, modified));
        }
    }
    sort_page(page)
}

/// Entries of one ListMultipartUploads page, sorted by path
fn upload_page(bucket: &str, prefixes: &[CommonPrefix], uploads: &[MultipartUpload]) -> Vec<Entry> {
    let mut page = prefix_entries(bucket, prefixes);
    for upload in uploads {
        let key = upload.key().unwrap_or_default();
        let modified = upload.initiated().and_then(to_timestamp);
        page.push(object_entry(bucket, key, 0, modified));
    }
    sort_page(page)
}

// Folders and objects come back in separate lists; interleave them by path.
fn sort_page(mut page: Vec<Entry>) -> Vec<Entry> {
    page.sort_by(|a, b| a.path.cmp(&b.path));
    // A marker and a common prefix can name the same folder.
    page.dedup_by(|a, b| a.path == b.path);
    page
}

fn prefix_entries(bucket: &str, prefixes: &[CommonPrefix]) -> Vec<Entry> {
    prefixes
        .iter()
        .filter_map(|p| p.prefix())
        .map(|p| Entry::dir(object_path(bucket, p)))
        .collect()
}

fn object_path(bucket: &str, key: &str) -> String {
    format!("/{bucket}/{key}")
}

/// Entry for an object (or upload) at `bucket/key`
pub(crate) fn object_entry(
    bucket: &str,
    key: &str,
    size: i64,
    modified: Option<Timestamp>,
) -> Entry {
    let entry = Entry::file(object_path(bucket, key), u64::try_from(size).unwrap_or(0));
    match modified {
        Some(modified) => entry.with_modified(modified),
        None => entry,
    }
}

pub(crate) fn to_timestamp(time: &aws_smithy_types::DateTime) -> Option<Timestamp> {
    Timestamp::new(time.secs(), i32::try_from(time.subsec_nanos()).ok()?).ok()
}
