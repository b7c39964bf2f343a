/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{self, Error};

/// Fluent builder for downloading a single object to a local file
#[derive(Debug)]
pub struct DownloadFluentBuilder {
    handle: Arc<crate::client::Handle>,
    key: Option<String>,
    destination: Option<PathBuf>,
}

impl DownloadFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            key: None,
            destination: None,
        }
    }

    /// Object key to download.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Local file to write the object to. Created or truncated.
    /// Required.
    pub fn destination(mut self, input: impl Into<PathBuf>) -> Self {
        self.destination = Some(input.into());
        self
    }

    /// Download the object.
    #[tracing::instrument(skip_all, level = "debug", name = "download", fields(
        key = self.key.as_deref().unwrap_or_default(),
    ))]
    pub async fn send(self) -> Result<DownloadOutput, Error> {
        let key = self
            .key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| error::invalid_input("download requires an object key"))?;
        let destination = self
            .destination
            .ok_or_else(|| error::invalid_input("download requires a destination path"))?;

        tracing::info!("downloading {key} to {}", destination.display());
        let content_length = self.handle.store().get_object(&key, &destination).await?;
        tracing::info!("downloaded {content_length} bytes of {key}");

        Ok(DownloadOutput {
            key,
            destination,
            content_length,
        })
    }
}

/// Response type for a single object download
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadOutput {
    key: String,
    destination: PathBuf,
    content_length: u64,
}

impl DownloadOutput {
    /// Object key that was downloaded
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Local file the object was written to
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Number of bytes written
    pub fn content_length(&self) -> u64 {
        self.content_length
    }
}

#[cfg(test)]
mod test {
    use std::time::SystemTime;

    use bytes::Bytes;

    use crate::error::ErrorKind;
    use crate::store::InMemoryStore;
    use crate::{Client, Config};

    #[tokio::test]
    async fn test_download_writes_file() {
        let store = InMemoryStore::new();
        store
            .insert_object("conf/app.toml", Bytes::from_static(b"debug = true"), SystemTime::now())
            .await;
        let client = Client::new(Config::builder().store(store).build().unwrap());
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("app.toml");

        let output = client
            .download()
            .key("conf/app.toml")
            .destination(&dest)
            .send()
            .await
            .unwrap();
        assert_eq!(12, output.content_length());
        assert_eq!(b"debug = true".to_vec(), std::fs::read(&dest).unwrap());
    }

    #[tokio::test]
    async fn test_download_missing_key() {
        let client = Client::new(Config::builder().store(InMemoryStore::new()).build().unwrap());
        let dir = tempfile::tempdir().unwrap();
        let err = client
            .download()
            .key("nope")
            .destination(dir.path().join("nope"))
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::NotFound, err.kind());
    }
}
