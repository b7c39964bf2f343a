/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::store::ObjectStore;
use crate::types::{ConcurrencySetting, PartSize};
use crate::{Config, DEFAULT_CONCURRENCY, DEFAULT_MULTIPART_THRESHOLD, DEFAULT_PART_SIZE};

/// Bridge client for a single object store bucket.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, store, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Explicit(concurrency) => *concurrency,
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
        }
    }

    /// Get the concrete minimum upload size in bytes to use to determine whether multipart uploads
    /// are enabled for a given request.
    pub(crate) fn mpu_threshold_bytes(&self) -> u64 {
        match self.config.multipart_threshold() {
            PartSize::Auto => DEFAULT_MULTIPART_THRESHOLD,
            PartSize::Target(explicit) => *explicit,
        }
    }

    /// Get the concrete part size to use for uploads
    pub(crate) fn upload_part_size_bytes(&self) -> u64 {
        match self.config.part_size() {
            PartSize::Auto => DEFAULT_PART_SIZE,
            PartSize::Target(explicit) => *explicit,
        }
    }

    /// The object store to send requests to
    pub(crate) fn store(&self) -> &Arc<dyn ObjectStore> {
        self.config.store()
    }
}

impl Client {
    /// Creates a new client from a bridge config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Upload a local file as a single object.
    ///
    /// Constructs a fluent builder for the
    /// [`Upload`](crate::operation::upload::builders::UploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::error::Error;
    /// use std::path::Path;
    ///
    /// async fn upload_file(
    ///     client: &objstore_bridge::Client,
    ///     path: impl AsRef<Path>
    /// ) -> Result<(), Box<dyn Error>> {
    ///     let output = client.upload()
    ///         .path(path.as_ref())
    ///         .key("backups/weekly.tar")
    ///         .send()
    ///         .await?;
    ///     println!("uploaded {} bytes", output.content_length());
    ///     Ok(())
    /// }
    /// ```
    pub fn upload(&self) -> crate::operation::upload::builders::UploadFluentBuilder {
        crate::operation::upload::builders::UploadFluentBuilder::new(self.handle.clone())
    }

    /// Download a single object to a local file.
    ///
    /// Constructs a fluent builder for the
    /// [`Download`](crate::operation::download::DownloadFluentBuilder) operation.
    pub fn download(&self) -> crate::operation::download::DownloadFluentBuilder {
        crate::operation::download::DownloadFluentBuilder::new(self.handle.clone())
    }

    /// List the immediate children of a directory path.
    ///
    /// Constructs a fluent builder for the
    /// [`ListDirectory`](crate::operation::list_directory::ListDirectoryFluentBuilder) operation.
    pub fn list_directory(&self) -> crate::operation::list_directory::ListDirectoryFluentBuilder {
        crate::operation::list_directory::ListDirectoryFluentBuilder::new(self.handle.clone())
    }

    /// Delete a single object.
    ///
    /// Constructs a fluent builder for the
    /// [`Delete`](crate::operation::delete::DeleteFluentBuilder) operation.
    pub fn delete(&self) -> crate::operation::delete::DeleteFluentBuilder {
        crate::operation::delete::DeleteFluentBuilder::new(self.handle.clone())
    }

    /// Delete every object under a directory path.
    ///
    /// Constructs a fluent builder for the
    /// [`RemoveDirectory`](crate::operation::delete::RemoveDirectoryFluentBuilder) operation.
    pub fn remove_directory(&self) -> crate::operation::delete::RemoveDirectoryFluentBuilder {
        crate::operation::delete::RemoveDirectoryFluentBuilder::new(self.handle.clone())
    }
}
