//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and resolves remote locations into listing roots.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;
use tracing::debug;

use stls_core::{Alias, Entry, Error, QueriedRoot, RemotePath, Result, RootResolver, parse_path};

use crate::listing::{S3Listing, object_entry, to_timestamp};

/// S3 client wrapper bound to one alias
#[derive(Clone)]
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    alias: Alias,
}

impl S3Client {
    /// Create a new S3 client from an alias configuration
    pub async fn new(alias: Alias) -> Result<Self> {
        let credentials = aws_credential_types::Credentials::new(
            alias.access_key.clone(),
            alias.secret_key.clone(),
            None, // session token
            None, // expiry
            "stls-static-credentials",
        );

        let retry = alias.retry_config();
        let retry_config = aws_config::retry::RetryConfig::standard()
            .with_max_attempts(retry.max_attempts)
            .with_initial_backoff(Duration::from_millis(retry.initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(retry.max_backoff_ms));

        let timeout = alias.timeout_config();
        let timeout_config = aws_config::timeout::TimeoutConfig::builder()
            .connect_timeout(Duration::from_millis(timeout.connect_ms))
            .read_timeout(Duration::from_millis(timeout.read_ms))
            .build();

        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(alias.region.clone()))
            .endpoint_url(&alias.endpoint)
            .retry_config(retry_config)
            .timeout_config(timeout_config)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(alias.path_style())
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            alias,
        })
    }

    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Parse a location that must start with this client's alias
    pub fn remote_path(&self, location: &str) -> Result<RemotePath> {
        parse_path(location, |name| name == self.alias.name)?
            .as_remote()
            .cloned()
            .ok_or_else(|| {
                Error::InvalidPath(format!(
                    "'{location}' is not a location under alias '{}'",
                    self.alias.name
                ))
            })
    }

    /// Listing source for `target`
    pub fn listing(&self, target: RemotePath) -> S3Listing {
        S3Listing::new(self.inner.clone(), target)
    }
}

#[async_trait]
impl RootResolver for S3Client {
    async fn resolve(&self, location: &str) -> Result<QueriedRoot> {
        let target = self.remote_path(location)?;
        if target.is_alias_root() {
            return Ok(Entry::dir("/"));
        }

        if target.is_dir() {
            self.inner
                .head_bucket()
                .bucket(&target.bucket)
                .send()
                .await
                .map_err(|e| root_error(location, &e))?;
            return Ok(Entry::dir(target.object_path()));
        }

        match self
            .inner
            .head_object()
            .bucket(&target.bucket)
            .key(&target.key)
            .send()
            .await
        {
            Ok(head) => {
                let size = head.content_length().unwrap_or_default();
                let modified = head.last_modified().and_then(to_timestamp);
                Ok(object_entry(&target.bucket, &target.key, size, modified))
            }
            Err(e) if is_not_found(&e) => {
                // Not an object: list it as a prefix
                debug!(location, "no object at key, treating as prefix");
                Ok(Entry::dir(format!("{}/", target.object_path())))
            }
            Err(e) => Err(root_error(location, &e)),
        }
    }
}

pub(crate) fn is_not_found<E>(err: &SdkError<E, HttpResponse>) -> bool
where
    E: ProvideErrorMetadata,
{
    match err {
        SdkError::ServiceError(service) => {
            service.raw().status().as_u16() == 404
                || matches!(service.err().code(), Some("NotFound" | "NoSuchKey"))
        }
        _ => false,
    }
}

/// Error message with the full source chain of an SDK error
pub(crate) fn describe<E, R>(err: &SdkError<E, R>) -> String
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    DisplayErrorContext(err).to_string()
}

fn root_error<E>(location: &str, err: &SdkError<E, HttpResponse>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let status = match err {
        SdkError::ServiceError(service) => Some(service.raw().status().as_u16()),
        _ => None,
    };
    let source = map_code(err.code(), status, describe(err), location);
    Error::root_resolution(location, source)
}

/// Map an S3 error code (or HTTP status) to a core error
pub(crate) fn map_code(
    code: Option<&str>,
    status: Option<u16>,
    message: String,
    location: &str,
) -> Error {
    match (code, status) {
        (Some("NoSuchBucket" | "NoSuchKey" | "NotFound"), _) | (_, Some(404)) => {
            Error::NotFound(location.to_string())
        }
        (Some("AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch"), _)
        | (_, Some(401 | 403)) => Error::Auth(message),
        _ => Error::Network(message),
    }
}
