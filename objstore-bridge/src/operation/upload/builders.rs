/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;

use super::{UploadInputBuilder, UploadOutput};

/// Fluent builder for constructing a single file upload
#[derive(Debug)]
pub struct UploadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadInputBuilder,
}

impl UploadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: std::default::Default::default(),
        }
    }

    /// Upload the file and wait for the object to be committed.
    ///
    /// Files smaller than the configured multipart threshold are sent with a single put.
    /// Larger files are split into parts uploaded concurrently; the object is only
    /// committed when every part succeeded.
    #[tracing::instrument(skip_all, level = "debug", name = "upload", fields(
        key = self.inner.key.as_deref().unwrap_or_default(),
    ))]
    pub async fn send(self) -> Result<UploadOutput, Error> {
        let input = self.inner.build()?;
        crate::operation::upload::Upload::orchestrate(self.handle, input).await
    }

    /// The local file to upload.
    /// Required.
    pub fn path(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.path(input);
        self
    }

    /// Object key the file is stored under.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }
}
