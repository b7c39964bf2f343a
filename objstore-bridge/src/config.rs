/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::time::Duration;

use crate::error::{self, Error};
use crate::store::ObjectStore;
use crate::types::{ConcurrencySetting, PartSize};

/// Load bridge [`Config`] for an S3-compatible endpoint.
pub mod loader;

/// Default number of additional attempts made for a failed part upload
const DEFAULT_PART_RETRY_ATTEMPTS: usize = 2;

/// Default delay before the first retry of a failed part upload
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    multipart_threshold: PartSize,
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    part_retry_attempts: usize,
    retry_backoff: Duration,
    store: Arc<dyn ObjectStore>,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns a reference to the multipart upload threshold
    pub fn multipart_threshold(&self) -> &PartSize {
        &self.multipart_threshold
    }

    /// Returns a reference to the part size to use for multipart uploads
    pub fn part_size(&self) -> &PartSize {
        &self.target_part_size
    }

    /// Returns the number of workers used for a single multipart upload.
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// Number of additional attempts made for a part upload the store rejected
    pub fn part_retry_attempts(&self) -> usize {
        self.part_retry_attempts
    }

    /// Delay before the first part retry; each following retry doubles it
    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    /// The object store all operations are sent to.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    multipart_threshold: PartSize,
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    part_retry_attempts: Option<usize>,
    retry_backoff: Option<Duration>,
    store: Option<Arc<dyn ObjectStore>>,
}

impl Builder {
    /// Minimum file size that should trigger a multipart upload.
    ///
    /// Files strictly smaller than this are sent with a single put.
    /// Default is [PartSize::Auto] (1,000,000,000 bytes)
    pub fn multipart_threshold(mut self, threshold: PartSize) -> Self {
        self.multipart_threshold = threshold;
        self
    }

    /// The size of each part when using a multipart upload.
    ///
    /// The last part of a file may be smaller.
    /// Default is [PartSize::Auto] (100,000,000 bytes)
    pub fn part_size(mut self, part_size: PartSize) -> Self {
        self.target_part_size = part_size;
        self
    }

    /// Set the number of workers used to upload the parts of a single file.
    ///
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Number of additional attempts made for a part the store rejected. `0` disables retries.
    pub fn part_retry_attempts(mut self, attempts: usize) -> Self {
        self.part_retry_attempts = Some(attempts);
        self
    }

    /// Delay before the first part retry.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    /// Set the object store to send requests to.
    pub fn store(mut self, store: impl ObjectStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    ///
    /// Fails if no store was set or if any size or concurrency setting is zero.
    pub fn build(self) -> Result<Config, Error> {
        let store = self
            .store
            .ok_or_else(|| error::invalid_input("an object store must be set"))?;
        if let PartSize::Target(0) = self.target_part_size {
            return Err(error::invalid_input("part size must be greater than zero"));
        }
        if let PartSize::Target(0) = self.multipart_threshold {
            return Err(error::invalid_input(
                "multipart threshold must be greater than zero",
            ));
        }
        if let ConcurrencySetting::Explicit(0) = self.concurrency {
            return Err(error::invalid_input("concurrency must be at least 1"));
        }

        Ok(Config {
            multipart_threshold: self.multipart_threshold,
            target_part_size: self.target_part_size,
            concurrency: self.concurrency,
            part_retry_attempts: self
                .part_retry_attempts
                .unwrap_or(DEFAULT_PART_RETRY_ATTEMPTS),
            retry_backoff: self.retry_backoff.unwrap_or(DEFAULT_RETRY_BACKOFF),
            store,
        })
    }
}
