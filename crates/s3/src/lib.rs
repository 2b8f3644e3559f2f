//! stls-s3: S3 listing backend for stls
//!
//! Resolves remote locations into listing roots and streams bucket,
//! object and incomplete upload listings through the core listing traits.
//! This is the only crate that depends on the AWS SDK.

pub mod client;
pub mod listing;

pub use client::S3Client;
pub use listing::S3Listing;
