/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::time::SystemTime;

/// Server-side handle for an in-progress multipart upload.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MultipartSession {
    key: String,
    upload_id: String,
}

impl MultipartSession {
    /// Create a session handle for `upload_id` bound to `key`
    pub fn new(key: impl Into<String>, upload_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            upload_id: upload_id.into(),
        }
    }

    /// The key the completed object will be stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The opaque upload ID assigned by the store
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }
}

/// A part the store has accepted for a multipart upload.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CompletedPart {
    // 1-indexed
    part_number: u64,
    e_tag: Option<String>,
}

impl CompletedPart {
    /// Create a new completed part
    pub fn new(part_number: u64, e_tag: Option<String>) -> Self {
        Self { part_number, e_tag }
    }

    /// The part number
    pub fn part_number(&self) -> u64 {
        self.part_number
    }

    /// The ETag the store returned for the part
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }
}

/// One key in the bucket as returned by a listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RemoteEntry {
    key: String,
    size: u64,
    last_modified: SystemTime,
}

impl RemoteEntry {
    /// Create a new listing entry
    pub fn new(key: impl Into<String>, size: u64, last_modified: SystemTime) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }

    /// The full object key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Object size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// When the object was last modified
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }
}
