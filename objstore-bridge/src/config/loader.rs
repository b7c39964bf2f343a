/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::time::Duration;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};

use crate::config::Builder;
use crate::error::{self, Error};
use crate::store::S3Store;
use crate::types::{ConcurrencySetting, PartSize};
use crate::Config;

/// Endpoint used when none is given
pub const DEFAULT_ENDPOINT: &str = "https://objects.liquidweb.services";

/// Region used to sign requests when none is given
pub const DEFAULT_REGION: &str = "us-east-1";

/// Environment variable holding the secret key
pub const SECRET_KEY_ENV: &str = "PASSWORD";

const CREDENTIALS_PROVIDER_NAME: &str = "objstore-bridge";

/// Load bridge [`Config`] for a bucket on an S3-compatible endpoint.
///
/// Requests use path-style addressing (`https://endpoint/bucket/key`) and static
/// credentials: the access key given to [`access_key`](Self::access_key) and the secret
/// key from [`secret_key`](Self::secret_key) or, when unset, the `PASSWORD` environment
/// variable.
#[derive(Default)]
pub struct ConfigLoader {
    builder: Builder,
    endpoint: Option<String>,
    region: Option<String>,
    bucket: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("ConfigLoader");
        formatter.field("builder", &self.builder);
        formatter.field("endpoint", &self.endpoint);
        formatter.field("region", &self.region);
        formatter.field("bucket", &self.bucket);
        formatter.field("access_key", &self.access_key);
        formatter.field("secret_key", &self.secret_key.as_ref().map(|_| "** redacted **"));
        formatter.finish()
    }
}

impl ConfigLoader {
    /// Endpoint URL of the object store. Default is [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Region used for request signing. Default is [`DEFAULT_REGION`].
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Bucket every operation is made against.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Access key ID.
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// Secret access key. Overrides the `PASSWORD` environment variable.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Minimum file size that should trigger a multipart upload.
    pub fn multipart_threshold(mut self, threshold: PartSize) -> Self {
        self.builder = self.builder.multipart_threshold(threshold);
        self
    }

    /// The size of each part when using a multipart upload.
    pub fn part_size(mut self, part_size: PartSize) -> Self {
        self.builder = self.builder.part_size(part_size);
        self
    }

    /// Set the number of workers used to upload the parts of a single file.
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.builder = self.builder.concurrency(concurrency);
        self
    }

    /// Number of additional attempts made for a part the store rejected.
    pub fn part_retry_attempts(mut self, attempts: usize) -> Self {
        self.builder = self.builder.part_retry_attempts(attempts);
        self
    }

    /// Delay before the first part retry.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.builder = self.builder.retry_backoff(backoff);
        self
    }

    /// Build the S3 client and the bridge configuration.
    ///
    /// Fails with [`InputInvalid`](crate::error::ErrorKind::InputInvalid) when the bucket,
    /// access key or secret key is missing.
    pub async fn load(self) -> Result<Config, Error> {
        let bucket = non_empty(self.bucket, "bucket")?;
        let access_key = non_empty(self.access_key, "access key")?;
        let secret_key = match self.secret_key {
            Some(secret_key) => Some(secret_key),
            None => std::env::var(SECRET_KEY_ENV).ok(),
        };
        let secret_key = non_empty(secret_key, SECRET_KEY_ENV)?;
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        let region = self.region.unwrap_or_else(|| DEFAULT_REGION.to_owned());

        tracing::debug!("using endpoint {endpoint} ({region}) for bucket {bucket}");
        let credentials = Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            .load()
            .await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(true)
            .build();
        let client = aws_sdk_s3::Client::from_conf(s3_config);

        self.builder.store(S3Store::new(client, bucket)).build()
    }
}

fn non_empty(value: Option<String>, name: &str) -> Result<String, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(error::invalid_input(format!("{name} must be set"))),
    }
}
