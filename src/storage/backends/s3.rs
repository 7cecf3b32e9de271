//! S3 store
//!
//! `HeadObject` / `GetObject` / `PutObject` against one bucket. No
//! conditional writes: `put_if` uses the trait's plain-overwrite fallback.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, error, info};

use super::validate_key;
use crate::errors::{Result, ShortledgerError};
use crate::storage::{RecordStore, StoredObject};

pub struct S3Store {
    bucket: String,
    client: Client,
}

impl S3Store {
    /// Build a client from the default AWS credential chain
    ///
    /// A custom `endpoint` (MinIO, LocalStack) switches to path-style addressing.
    pub async fn connect(bucket: &str, region: &str, endpoint: Option<&str>) -> Result<Self> {
        let loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        let sdk_config = match endpoint {
            Some(endpoint) => loader.endpoint_url(endpoint).load().await,
            None => loader.load().await,
        };

        let client = if endpoint.is_some() {
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&sdk_config)
        };

        info!("S3 store connected: bucket={} region={}", bucket, region);
        Ok(Self {
            bucket: bucket.to_string(),
            client,
        })
    }
}

#[async_trait]
impl RecordStore for S3Store {
    async fn exists(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    error!("HeadObject {}/{} failed: {}", self.bucket, key, service_err);
                    Err(ShortledgerError::store_failure(
                        DisplayErrorContext(&service_err).to_string(),
                    ))
                }
            }
        }
    }

    async fn get(&self, key: &str) -> Result<StoredObject> {
        validate_key(key)?;
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Err(ShortledgerError::not_found(format!(
                        "object not found: {}/{}",
                        self.bucket, key
                    )));
                }
                error!("GetObject {}/{} failed: {}", self.bucket, key, service_err);
                return Err(ShortledgerError::store_failure(
                    DisplayErrorContext(&service_err).to_string(),
                ));
            }
        };

        let version = output.e_tag().map(str::to_string);
        let body = output.body.collect().await.map_err(|e| {
            error!("Reading {}/{} failed: {}", self.bucket, key, e);
            ShortledgerError::store_failure(e.to_string())
        })?;

        Ok(StoredObject {
            body: body.into_bytes(),
            version,
        })
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<()> {
        validate_key(key)?;
        let len = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| {
                error!("PutObject {}/{} failed: {}", self.bucket, key, err);
                ShortledgerError::store_failure(DisplayErrorContext(&err).to_string())
            })?;
        debug!("PutObject {}/{} ({} bytes)", self.bucket, key, len);
        Ok(())
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
