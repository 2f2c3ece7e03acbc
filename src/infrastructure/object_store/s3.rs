//! S3-backed object store

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use super::ObjectStore;
use crate::domain::AnalysisError;

/// Object store reading from S3 with the ambient AWS credentials.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Build a store from the default credential/region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(S3Client::new(&config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, AnalysisError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                AnalysisError::source_unavailable(format!(
                    "failed to list s3://{bucket}/{prefix}: {e}"
                ))
            })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes, AnalysisError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AnalysisError::source_unavailable(format!("failed to get s3://{bucket}/{key}: {e}"))
            })?;

        let data = response.body.collect().await.map_err(|e| {
            AnalysisError::source_unavailable(format!("failed to read s3://{bucket}/{key}: {e}"))
        })?;

        Ok(data.into_bytes())
    }
}
