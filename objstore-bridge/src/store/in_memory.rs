/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! In-memory implementation of the ObjectStore trait.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tokio::sync::RwLock;

use crate::error::{remote_failure, Error, ErrorKind, RemoteOperation};
use crate::store::{CompletedPart, MultipartSession, ObjectStore, RemoteEntry};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Bytes,
    last_modified: SystemTime,
}

#[derive(Debug)]
struct PendingUpload {
    key: String,
    // part# -> content
    parts: HashMap<u64, Bytes>,
}

/// An in-memory implementation of the [`ObjectStore`] trait.
///
/// Objects and multipart uploads live in memory with the same visibility rules as a real
/// bucket: parts accumulate per upload ID, completion concatenates them in part-number order
/// and abort discards them. Every request is recorded in a journal that can be inspected
/// with [`InMemoryStore::requests`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    // key -> object
    objects: RwLock<HashMap<String, StoredObject>>,
    // upload-id -> pending upload
    uploads: RwLock<HashMap<String, PendingUpload>>,
    next_upload_id: AtomicU64,
    journal: Mutex<Vec<(RemoteOperation, Option<u64>)>>, // std Mutex
}

impl InMemoryStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly, bypassing the journal.
    pub async fn insert_object(
        &self,
        key: impl Into<String>,
        content: impl Into<Bytes>,
        last_modified: SystemTime,
    ) {
        self.objects.write().await.insert(
            key.into(),
            StoredObject {
                content: content.into(),
                last_modified,
            },
        );
    }

    /// The contents of the object stored at `key`, if any.
    pub async fn object(&self, key: &str) -> Option<Bytes> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|obj| obj.content.clone())
    }

    /// Number of multipart uploads that have been started but neither completed nor aborted.
    pub async fn pending_uploads(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Every request made against this store, in order, with the part number for part uploads.
    pub fn requests(&self) -> Vec<(RemoteOperation, Option<u64>)> {
        self.journal.lock().expect("lock valid").clone()
    }

    fn record(&self, operation: RemoteOperation, part_number: Option<u64>) {
        self.journal
            .lock()
            .expect("lock valid")
            .push((operation, part_number));
    }
}

fn checksum(content: &[u8]) -> u32 {
    content
        .iter()
        .fold(0u32, |acc, b| acc.rotate_left(5) ^ u32::from(*b))
}

fn e_tag_for(content: &Bytes) -> String {
    format!("\"{:08x}\"", checksum(content))
}

fn no_such_upload(upload_id: &str) -> Error {
    Error::new(
        ErrorKind::NotFound,
        format!("no such upload: {upload_id}"),
    )
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_object(&self, key: &str, path: &Path) -> Result<Option<String>, Error> {
        self.record(RemoteOperation::PutObject, None);
        let content = Bytes::from(tokio::fs::read(path).await?);
        let e_tag = e_tag_for(&content);
        self.objects.write().await.insert(
            key.to_owned(),
            StoredObject {
                content,
                last_modified: SystemTime::now(),
            },
        );
        Ok(Some(e_tag))
    }

    async fn get_object(&self, key: &str, dest: &Path) -> Result<u64, Error> {
        self.record(RemoteOperation::GetObject, None);
        let content = self
            .object(key)
            .await
            .ok_or_else(|| Error::new(ErrorKind::NotFound, format!("no such key: {key}")))?;
        tokio::fs::write(dest, &content).await?;
        Ok(content.len() as u64)
    }

    async fn create_multipart_upload(&self, key: &str) -> Result<MultipartSession, Error> {
        self.record(RemoteOperation::CreateMultipartUpload, None);
        let upload_id = format!(
            "upload-{}",
            self.next_upload_id.fetch_add(1, Ordering::SeqCst) + 1
        );
        self.uploads.write().await.insert(
            upload_id.clone(),
            PendingUpload {
                key: key.to_owned(),
                parts: HashMap::new(),
            },
        );
        Ok(MultipartSession::new(key, upload_id))
    }

    async fn upload_part(
        &self,
        session: &MultipartSession,
        part_number: u64,
        content: Bytes,
    ) -> Result<CompletedPart, Error> {
        self.record(RemoteOperation::UploadPart, Some(part_number));
        let e_tag = e_tag_for(&content);
        let mut uploads = self.uploads.write().await;
        let upload = uploads
            .get_mut(session.upload_id())
            .ok_or_else(|| no_such_upload(session.upload_id()))?;
        upload.parts.insert(part_number, content);
        Ok(CompletedPart::new(part_number, Some(e_tag)))
    }

    async fn complete_multipart_upload(
        &self,
        session: &MultipartSession,
        parts: Vec<CompletedPart>,
    ) -> Result<Option<String>, Error> {
        self.record(RemoteOperation::CompleteMultipartUpload, None);
        let mut uploads = self.uploads.write().await;
        let upload = uploads
            .get(session.upload_id())
            .ok_or_else(|| no_such_upload(session.upload_id()))?;

        // parts must be strictly ascending and every one of them must have been uploaded
        let in_order = parts
            .windows(2)
            .all(|w| w[0].part_number() < w[1].part_number());
        if !in_order {
            return Err(remote_failure(
                RemoteOperation::CompleteMultipartUpload,
                None,
                "invalid part order",
            ));
        }
        let mut combined = BytesMut::new();
        for part in &parts {
            let data = upload.parts.get(&part.part_number()).ok_or_else(|| {
                remote_failure(
                    RemoteOperation::CompleteMultipartUpload,
                    Some(part.part_number()),
                    "invalid part",
                )
            })?;
            combined.extend_from_slice(data);
        }

        let upload = uploads
            .remove(session.upload_id())
            .ok_or_else(|| no_such_upload(session.upload_id()))?;
        let content = combined.freeze();
        // multipart etags carry the part count
        let e_tag = format!("\"{:08x}-{}\"", checksum(&content), parts.len());
        self.objects.write().await.insert(
            upload.key,
            StoredObject {
                content,
                last_modified: SystemTime::now(),
            },
        );
        Ok(Some(e_tag))
    }

    async fn abort_multipart_upload(&self, session: &MultipartSession) -> Result<(), Error> {
        self.record(RemoteOperation::AbortMultipartUpload, None);
        let mut uploads = self.uploads.write().await;
        if uploads.remove(session.upload_id()).is_none() {
            return Err(no_such_upload(session.upload_id()));
        }
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<RemoteEntry>, Error> {
        self.record(RemoteOperation::ListObjects, None);
        let objects = self.objects.read().await;
        let mut entries = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, obj)| RemoteEntry::new(key, obj.content.len() as u64, obj.last_modified))
            .collect::<Vec<_>>();
        // stores list in lexicographic key order
        entries.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(entries)
    }

    async fn delete_object(&self, key: &str) -> Result<(), Error> {
        self.record(RemoteOperation::DeleteObject, None);
        // deleting a missing key succeeds, like S3
        self.objects.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_put_and_get_object() {
        let store = InMemoryStore::new();
        let mut src = NamedTempFile::new().unwrap();
        src.write_all(b"test content").unwrap();

        let e_tag = store.put_object("test-key", src.path()).await.unwrap();
        assert!(e_tag.is_some());

        let dest = NamedTempFile::new().unwrap();
        let written = store.get_object("test-key", dest.path()).await.unwrap();
        assert_eq!(12, written);
        assert_eq!(b"test content".to_vec(), std::fs::read(dest.path()).unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let store = InMemoryStore::new();
        let dest = NamedTempFile::new().unwrap();
        let err = store.get_object("missing", dest.path()).await.unwrap_err();
        assert_eq!(&ErrorKind::NotFound, err.kind());
    }

    #[tokio::test]
    async fn test_multipart_upload_combines_in_part_order() {
        let store = InMemoryStore::new();
        let session = store.create_multipart_upload("test-key").await.unwrap();

        // upload out of order, completion order is irrelevant
        let p2 = store
            .upload_part(&session, 2, Bytes::from("part2"))
            .await
            .unwrap();
        let p1 = store
            .upload_part(&session, 1, Bytes::from("part1"))
            .await
            .unwrap();

        store
            .complete_multipart_upload(&session, vec![p1, p2])
            .await
            .unwrap();

        assert_eq!(Some(Bytes::from("part1part2")), store.object("test-key").await);
        assert_eq!(0, store.pending_uploads().await);
    }

    #[tokio::test]
    async fn test_complete_with_missing_part_fails() {
        let store = InMemoryStore::new();
        let session = store.create_multipart_upload("test-key").await.unwrap();
        let p1 = store
            .upload_part(&session, 1, Bytes::from("part1"))
            .await
            .unwrap();

        let result = store
            .complete_multipart_upload(&session, vec![p1, CompletedPart::new(2, None)])
            .await;
        assert!(result.is_err());
        assert_eq!(None, store.object("test-key").await);
        assert_eq!(1, store.pending_uploads().await);
    }

    #[tokio::test]
    async fn test_abort_discards_parts() {
        let store = InMemoryStore::new();
        let session = store.create_multipart_upload("test-key").await.unwrap();
        store
            .upload_part(&session, 1, Bytes::from("part1"))
            .await
            .unwrap();

        store.abort_multipart_upload(&session).await.unwrap();

        assert_eq!(0, store.pending_uploads().await);
        assert_eq!(None, store.object("test-key").await);
        let err = store
            .upload_part(&session, 2, Bytes::from("part2"))
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::NotFound, err.kind());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = InMemoryStore::new();
        let now = SystemTime::now();
        store.insert_object("a/b.txt", "0123456789", now).await;
        store.insert_object("a/c.txt", "x", now).await;
        store.insert_object("d.txt", "hello", now).await;

        let keys = store
            .list_objects("a/")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.key().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(vec!["a/b.txt", "a/c.txt"], keys);

        store.delete_object("a/b.txt").await.unwrap();
        assert_eq!(None, store.object("a/b.txt").await);
        assert_eq!(2, store.list_objects("").await.unwrap().len());
    }
}
