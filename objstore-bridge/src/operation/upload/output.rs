/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::UploadStrategy;

/// Response type for a single file upload
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct UploadOutput {
    pub(crate) key: String,
    pub(crate) strategy: UploadStrategy,
    pub(crate) content_length: u64,
    pub(crate) upload_id: Option<String>,
    pub(crate) e_tag: Option<String>,
    pub(crate) part_count: u64,
}

impl UploadOutput {
    /// Object key the file was stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the file was sent whole or in parts.
    pub fn strategy(&self) -> UploadStrategy {
        self.strategy
    }

    /// Number of bytes uploaded.
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// ID of the multipart upload that was completed. `None` for a whole-object put.
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    /// Entity tag of the stored object, if the store returned one.
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Number of parts uploaded. `1` for a whole-object put.
    pub fn part_count(&self) -> u64 {
        self.part_count
    }
}
