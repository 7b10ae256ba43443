//! S3-compatible object storage for raw CSV uploads.
//!
//! Every upload is written verbatim to the bucket before ingestion starts;
//! if ingestion fails the object is removed again (best effort).

use anyhow::{Context, Result};
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

pub mod config;

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    pub async fn new(config: config::StorageConfig) -> Result<Self> {
        debug!("Initializing storage for bucket {}", config.bucket);

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "polizas-storage",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("Storage client initialized for bucket: {}", config.bucket);

        Ok(Self {
            client,
            bucket: config.bucket,
        })
    }

    #[instrument(skip(self, data))]
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<UploadResult> {
        let checksum = calculate_sha256(&data);
        let size = data.len() as i64;

        debug!("Uploading {} bytes to s3://{}/{}", size, self.bucket, key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.context("Failed to upload to S3")?;

        info!("Successfully uploaded to s3://{}/{}", self.bucket, key);

        Ok(UploadResult {
            key: key.to_string(),
            checksum,
            size,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("Deleting s3://{}/{}", self.bucket, key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context(format!("Failed to delete from S3: {}", key))?;

        info!("Successfully deleted s3://{}/{}", self.bucket, key);

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, prefix: &str, max_keys: Option<i32>) -> Result<Vec<String>> {
        debug!(
            "Listing objects in s3://{}/{} (max: {:?})",
            self.bucket, prefix, max_keys
        );

        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix);

        if let Some(max) = max_keys {
            request = request.max_keys(max);
        }

        let response = request.send().await.context("Failed to list S3 objects")?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(|k| k.to_string()))
            .collect();

        Ok(keys)
    }
}

/// Build the object key for an uploaded CSV.
///
/// Format: `<tablePrefix>_<emailLocalPart>_<timestamp>_<originalFilename>`
/// where the timestamp is ISO 8601 with `:` and `.` replaced by `-` so the
/// key stays URL- and filesystem-safe.
pub fn build_object_key(
    table_prefix: &str,
    user_email: &str,
    filename: &str,
    at: DateTime<Utc>,
) -> String {
    let timestamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    let user_identifier = user_email.split('@').next().unwrap_or(user_email);
    format!("{}_{}_{}_{}", table_prefix, user_identifier, timestamp, filename)
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub key: String,
    pub checksum: String,
    pub size: i64,
}

fn calculate_sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_build_object_key() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 45).unwrap();
        let key = build_object_key("renovaciones", "ana.lopez@example.com", "enero.csv", at);
        // Only the timestamp is sanitized; the email local part is kept as-is.
        assert_eq!(key, "renovaciones_ana.lopez_2026-01-15T10-30-45-000Z_enero.csv");
    }

    #[test]
    fn test_build_object_key_without_at_sign() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 45).unwrap();
        let key = build_object_key("validaciones", "sinarroba", "v.csv", at);
        assert!(key.starts_with("validaciones_sinarroba_"));
    }

    #[test]
    fn test_calculate_sha256() {
        let checksum = calculate_sha256(b"Hello, World!");
        assert_eq!(
            checksum,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }
}
