/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_smithy_types::error::display::DisplayErrorContext;

use crate::error::{self, Error};
use crate::operation::directory_prefix;

/// Fluent builder for deleting a single object
#[derive(Debug)]
pub struct DeleteFluentBuilder {
    handle: Arc<crate::client::Handle>,
    key: Option<String>,
}

impl DeleteFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self { handle, key: None }
    }

    /// Object key to delete, used verbatim.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Delete the object. Deleting a key that does not exist succeeds.
    #[tracing::instrument(skip_all, level = "debug", name = "delete")]
    pub async fn send(self) -> Result<(), Error> {
        let key = self
            .key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| error::invalid_input("delete requires an object key"))?;
        self.handle.store().delete_object(&key).await?;
        tracing::info!("deleted {key}");
        Ok(())
    }
}

/// Fluent builder for deleting every object under a directory path
#[derive(Debug)]
pub struct RemoveDirectoryFluentBuilder {
    handle: Arc<crate::client::Handle>,
    path: Option<String>,
}

impl RemoveDirectoryFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self { handle, path: None }
    }

    /// Directory path, e.g. `/backups/2024`.
    /// Required.
    pub fn path(mut self, input: impl Into<String>) -> Self {
        self.path = Some(input.into());
        self
    }

    /// Delete every key under the directory and return how many were removed.
    ///
    /// All deletes are attempted even if some fail; the first failure is returned.
    /// The bucket root cannot be removed this way.
    #[tracing::instrument(skip_all, level = "debug", name = "remove-directory")]
    pub async fn send(self) -> Result<usize, Error> {
        let path = self.path.unwrap_or_default();
        let prefix = directory_prefix(&path);
        if prefix.is_empty() {
            return Err(error::invalid_input("refusing to remove the bucket root"));
        }

        let store = self.handle.store();
        let entries = store.list_objects(&prefix).await?;
        let mut removed = 0;
        let mut first_err = None;
        for entry in &entries {
            match store.delete_object(entry.key()).await {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::error!("failed to delete {}: {}", entry.key(), DisplayErrorContext(&err));
                    first_err.get_or_insert(err);
                }
            }
        }
        tracing::info!("removed {removed} of {} keys under {prefix}", entries.len());
        first_err.map_or(Ok(removed), Err)
    }
}

#[cfg(test)]
mod test {
    use std::time::SystemTime;

    use bytes::Bytes;

    use crate::error::ErrorKind;
    use crate::store::InMemoryStore;
    use crate::{Client, Config};

    async fn store_with(keys: &[&str]) -> std::sync::Arc<InMemoryStore> {
        let store = std::sync::Arc::new(InMemoryStore::new());
        for key in keys {
            store
                .insert_object(*key, Bytes::from_static(b"x"), SystemTime::now())
                .await;
        }
        store
    }

    #[tokio::test]
    async fn test_delete_single_key() {
        let store = store_with(&["a.txt", "b.txt"]).await;
        let client = Client::new(Config::builder().store(store.clone()).build().unwrap());
        client.delete().key("a.txt").send().await.unwrap();
        assert!(store.object("a.txt").await.is_none());
        assert!(store.object("b.txt").await.is_some());
    }

    #[tokio::test]
    async fn test_remove_directory() {
        let store = store_with(&["old/a", "old/deep/b", "older/c", "keep"]).await;
        let client = Client::new(Config::builder().store(store.clone()).build().unwrap());
        let removed = client.remove_directory().path("/old").send().await.unwrap();
        assert_eq!(2, removed);
        assert!(store.object("older/c").await.is_some());
        assert!(store.object("keep").await.is_some());
    }

    #[tokio::test]
    async fn test_remove_root_rejected() {
        let store = store_with(&["keep"]).await;
        let client = Client::new(Config::builder().store(store.clone()).build().unwrap());
        let err = client.remove_directory().path("/").send().await.unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
        assert!(store.object("keep").await.is_some());
    }
}
