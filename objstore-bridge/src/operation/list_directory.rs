/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

mod format;

use std::sync::Arc;

use chrono::TimeZone;
pub use format::{
    format_listing, render_listing, EntryKind, ListingRow, DIRECTORY_SIZE, PLACEHOLDER_OWNER,
};

use crate::error::Error;
use crate::operation::directory_prefix;
use crate::store::RemoteEntry;

/// Fluent builder for listing a directory view of the bucket
#[derive(Debug)]
pub struct ListDirectoryFluentBuilder {
    handle: Arc<crate::client::Handle>,
    path: Option<String>,
}

impl ListDirectoryFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self { handle, path: None }
    }

    /// Directory path to list, e.g. `/backups`. Defaults to the bucket root.
    pub fn path(mut self, input: impl Into<String>) -> Self {
        self.path = Some(input.into());
        self
    }

    /// Fetch every key under the directory.
    #[tracing::instrument(skip_all, level = "debug", name = "list-directory", fields(
        path = self.path.as_deref().unwrap_or_default(),
    ))]
    pub async fn send(self) -> Result<ListDirectoryOutput, Error> {
        let root = self.path.unwrap_or_default();
        let prefix = directory_prefix(&root);
        let entries = self.handle.store().list_objects(&prefix).await?;
        tracing::debug!("listed {} keys under '{prefix}'", entries.len());
        Ok(ListDirectoryOutput { root, entries })
    }
}

/// Raw keys under a directory along with the directory path they were listed for
#[derive(Debug, Clone)]
pub struct ListDirectoryOutput {
    root: String,
    entries: Vec<RemoteEntry>,
}

impl ListDirectoryOutput {
    /// The directory path as requested
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Every key found under the directory, at any depth
    pub fn entries(&self) -> &[RemoteEntry] {
        &self.entries
    }

    /// Immediate children of the directory with timestamps in `tz`
    pub fn rows<Tz: TimeZone>(&self, tz: &Tz) -> Vec<ListingRow> {
        format_listing(&self.root, &self.entries, tz)
    }
}
