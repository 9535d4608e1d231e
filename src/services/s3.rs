use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use url::Url;

use crate::config::StorageConfig;
use crate::services::storage::{object_key, ObjectStorage, StorageError, StorageResult, StoredObject};

#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket_name: String,
    region: String,
    endpoint: Option<Url>,
}

impl S3Storage {
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "manual_config",
        );

        let region = aws_sdk_s3::config::Region::new(config.aws_region.clone());

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials);

        let endpoint = match &config.s3_endpoint {
            Some(raw) => {
                let parsed = Url::parse(raw)
                    .map_err(|e| StorageError::ConfigError(format!("S3_ENDPOINT: {e}")))?;
                s3_config_builder = s3_config_builder
                    .endpoint_url(raw)
                    .force_path_style(true);
                Some(parsed)
            }
            None => None,
        };

        Ok(Self {
            client: Client::from_conf(s3_config_builder.build()),
            bucket_name: config.bucket_name.clone(),
            region: config.aws_region.clone(),
            endpoint,
        })
    }

    /// Makes sure the bucket exists and is publicly readable. Call once before
    /// serving uploads.
    pub async fn connect(&self) -> StorageResult<()> {
        let resp = self.client.head_bucket().bucket(&self.bucket_name).send().await;

        if resp.is_err() {
            tracing::info!(bucket = %self.bucket_name, "bucket missing, creating it");
            self.client
                .create_bucket()
                .bucket(&self.bucket_name)
                .send()
                .await
                .map_err(|e| {
                    StorageError::BackendError(format!("Failed to create S3 bucket: {e}"))
                })?;
        }

        // Some S3-compatible providers reject bucket policies; uploads still
        // work there through the object ACL.
        if let Err(e) = self.set_public_policy().await {
            tracing::warn!(bucket = %self.bucket_name, error = %e, "could not set bucket policy");
        }

        Ok(())
    }

    async fn set_public_policy(&self) -> StorageResult<()> {
        let policy = format!(
            r#"{{
                "Version": "2012-10-17",
                "Statement": [
                    {{
                        "Sid": "PublicReadGetObject",
                        "Effect": "Allow",
                        "Principal": "*",
                        "Action": "s3:GetObject",
                        "Resource": "arn:aws:s3:::{}/*"
                    }}
                ]
            }}"#,
            self.bucket_name
        );

        self.client
            .put_bucket_policy()
            .bucket(&self.bucket_name)
            .policy(policy)
            .send()
            .await
            .map_err(|e| StorageError::BackendError(format!("Failed to set bucket policy: {e}")))?;

        Ok(())
    }

    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .acl(aws_sdk_s3::types::ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to upload {key} to S3: {e}")))?;

        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(self.endpoint.as_ref(), &self.bucket_name, &self.region, key)
    }
}

fn public_url(endpoint: Option<&Url>, bucket: &str, region: &str, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!(
            "{}/{}/{}",
            endpoint.as_str().trim_end_matches('/'),
            bucket,
            key
        ),
        None => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        let key = object_key(file_name);
        self.put_object(&key, data, content_type).await?;
        tracing::debug!(%key, file_name, "stored object");

        Ok(StoredObject {
            url: self.public_url(&key),
            key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_url_uses_virtual_host_style() {
        assert_eq!(
            public_url(None, "cases", "eu-west-1", "uploads/x.pdf"),
            "https://cases.s3.eu-west-1.amazonaws.com/uploads/x.pdf"
        );
    }

    #[test]
    fn custom_endpoint_uses_path_style() {
        let endpoint = Url::parse("http://localhost:9000/").unwrap();
        assert_eq!(
            public_url(Some(&endpoint), "cases", "us-east-1", "uploads/x.pdf"),
            "http://localhost:9000/cases/uploads/x.pdf"
        );
    }
}
