//! Object store access - the physical source of cost and flow records

mod in_memory;
mod s3;

pub use in_memory::InMemoryObjectStore;
pub use s3::S3ObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::domain::AnalysisError;

/// A bucket plus key prefix identifying one record source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLocation {
    pub bucket: String,
    pub prefix: String,
}

impl StoreLocation {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.prefix)
    }
}

/// Raw object access behind the record readers (for mocking).
///
/// An empty listing is a valid outcome; only unreachable or forbidden
/// storage is an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// List object keys under a prefix, in listing order.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, AnalysisError>;

    /// Fetch one object's full contents.
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, AnalysisError>;
}
