/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
//! Object store backends.
//!
//! The [`ObjectStore`] trait is the only seam between the bridge operations and the remote
//! bucket. Operations never reach for a global connection; the store is injected through
//! [`Config`](crate::Config) so the upload pipeline can be driven against
//! [`InMemoryStore`] in tests exactly as it is against [`S3Store`] in production.
//!
//! # Multipart Upload Contract
//!
//! - [`create_multipart_upload`](ObjectStore::create_multipart_upload) returns a session bound
//!   to the final key.
//! - [`upload_part`](ObjectStore::upload_part) may be called concurrently for distinct part
//!   numbers of the same session.
//! - [`complete_multipart_upload`](ObjectStore::complete_multipart_upload) receives the
//!   completed parts sorted by part number and atomically makes the object visible.
//! - [`abort_multipart_upload`](ObjectStore::abort_multipart_upload) discards every uploaded
//!   part; no object becomes visible at the key.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Error;

mod in_memory;
mod models;
mod s3;

pub use in_memory::InMemoryStore;
pub use models::{CompletedPart, MultipartSession, RemoteEntry};
pub use s3::S3Store;

/// Capability interface over a single remote bucket.
#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    /// Upload the whole contents of the file at `path` as the object `key`.
    ///
    /// Returns the ETag of the stored object if the store provides one.
    async fn put_object(&self, key: &str, path: &Path) -> Result<Option<String>, Error>;

    /// Download the object `key` into a file at `dest`, returning the number of bytes written.
    async fn get_object(&self, key: &str, dest: &Path) -> Result<u64, Error>;

    /// Start a new multipart upload for `key`.
    async fn create_multipart_upload(&self, key: &str) -> Result<MultipartSession, Error>;

    /// Upload one part of a multipart upload.
    async fn upload_part(
        &self,
        session: &MultipartSession,
        part_number: u64,
        content: Bytes,
    ) -> Result<CompletedPart, Error>;

    /// Commit a multipart upload from `parts`, which must be sorted by part number.
    ///
    /// Returns the ETag of the final object if the store provides one.
    async fn complete_multipart_upload(
        &self,
        session: &MultipartSession,
        parts: Vec<CompletedPart>,
    ) -> Result<Option<String>, Error>;

    /// Discard a multipart upload and every part uploaded for it.
    async fn abort_multipart_upload(&self, session: &MultipartSession) -> Result<(), Error>;

    /// List every key that starts with `prefix`.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<RemoteEntry>, Error>;

    /// Delete the object `key`.
    async fn delete_object(&self, key: &str) -> Result<(), Error>;
}

// Forward through `Arc` so a shared store can be handed to the config as-is
#[async_trait]
impl<T> ObjectStore for Arc<T>
where
    T: ObjectStore + ?Sized,
{
    async fn put_object(&self, key: &str, path: &Path) -> Result<Option<String>, Error> {
        (**self).put_object(key, path).await
    }

    async fn get_object(&self, key: &str, dest: &Path) -> Result<u64, Error> {
        (**self).get_object(key, dest).await
    }

    async fn create_multipart_upload(&self, key: &str) -> Result<MultipartSession, Error> {
        (**self).create_multipart_upload(key).await
    }

    async fn upload_part(
        &self,
        session: &MultipartSession,
        part_number: u64,
        content: Bytes,
    ) -> Result<CompletedPart, Error> {
        (**self).upload_part(session, part_number, content).await
    }

    async fn complete_multipart_upload(
        &self,
        session: &MultipartSession,
        parts: Vec<CompletedPart>,
    ) -> Result<Option<String>, Error> {
        (**self).complete_multipart_upload(session, parts).await
    }

    async fn abort_multipart_upload(&self, session: &MultipartSession) -> Result<(), Error> {
        (**self).abort_multipart_upload(session).await
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<RemoteEntry>, Error> {
        (**self).list_objects(prefix).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), Error> {
        (**self).delete_object(key).await
    }
}
