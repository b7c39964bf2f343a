/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::CompletedMultipartUpload;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::Instrument;

use crate::error::{self, from_sdk, Error, RemoteOperation};
use crate::store::{CompletedPart, MultipartSession, ObjectStore, RemoteEntry};

/// [`ObjectStore`] backed by an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Create a store for `bucket` that sends requests with `client`.
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// The bucket all requests are made against
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn to_i32(part_number: u64) -> Result<i32, Error> {
    part_number.try_into().map_err(|_| {
        error::invalid_input(format!("part_number:{} is invalid.", part_number))
    })
}

/// Sibling of `dest` that receives the body until it is complete
fn partial_path(dest: &Path) -> Result<PathBuf, Error> {
    let name = dest.file_name().ok_or_else(|| {
        error::invalid_input(format!("download destination {dest:?} is not a file path"))
    })?;
    let mut partial = name.to_os_string();
    partial.push(".part");
    Ok(dest.with_file_name(partial))
}

/// Stream `body` into `dest`.
///
/// Bytes land in a `.part` sibling that replaces `dest` only once the whole body has been
/// written, so a failed download never leaves a truncated file at `dest`.
async fn write_body(mut body: ByteStream, dest: &Path) -> Result<u64, Error> {
    let partial = partial_path(dest)?;
    let result = match stream_to_file(&mut body, &partial).await {
        Ok(written) => tokio::fs::rename(&partial, dest)
            .await
            .map(|_| written)
            .map_err(Error::from),
        Err(err) => Err(err),
    };
    if result.is_err() {
        if let Err(err) = tokio::fs::remove_file(&partial).await {
            tracing::debug!("could not remove partial download {partial:?}: {err}");
        }
    }
    result
}

async fn stream_to_file(body: &mut ByteStream, path: &Path) -> Result<u64, Error> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = body
        .try_next()
        .await
        .map_err(|err| error::remote_failure(RemoteOperation::GetObject, None, err))?
    {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, path: &Path) -> Result<Option<String>, Error> {
        let body = ByteStream::from_path(path).await?;
        let resp = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .instrument(tracing::debug_span!("send-put-object"))
            .await
            .map_err(from_sdk(RemoteOperation::PutObject, None))?;
        Ok(resp.e_tag)
    }

    async fn get_object(&self, key: &str, dest: &Path) -> Result<u64, Error> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .instrument(tracing::debug_span!("send-get-object"))
            .await
            .map_err(from_sdk(RemoteOperation::GetObject, None))?;

        write_body(resp.body, dest).await
    }

    async fn create_multipart_upload(&self, key: &str) -> Result<MultipartSession, Error> {
        let resp = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .instrument(tracing::debug_span!("send-create-multipart-upload"))
            .await
            .map_err(from_sdk(RemoteOperation::CreateMultipartUpload, None))?;

        let upload_id = resp.upload_id.ok_or_else(|| {
            error::remote_failure(
                RemoteOperation::CreateMultipartUpload,
                None,
                "response did not include an upload ID",
            )
        })?;
        Ok(MultipartSession::new(key, upload_id))
    }

    async fn upload_part(
        &self,
        session: &MultipartSession,
        part_number: u64,
        content: Bytes,
    ) -> Result<CompletedPart, Error> {
        let content_length = content.len() as i64;
        let resp = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(session.key())
            .upload_id(session.upload_id())
            .part_number(to_i32(part_number)?)
            .content_length(content_length)
            .body(ByteStream::from(content))
            .send()
            .instrument(tracing::debug_span!("send-upload-part", part_number))
            .await
            .map_err(from_sdk(RemoteOperation::UploadPart, Some(part_number)))?;

        Ok(CompletedPart::new(part_number, resp.e_tag))
    }

    async fn complete_multipart_upload(
        &self,
        session: &MultipartSession,
        parts: Vec<CompletedPart>,
    ) -> Result<Option<String>, Error> {
        let parts = parts
            .into_iter()
            .map(|part| {
                Ok(aws_sdk_s3::types::CompletedPart::builder()
                    .part_number(to_i32(part.part_number())?)
                    .set_e_tag(part.e_tag().map(str::to_owned))
                    .build())
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let resp = self
            .client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(session.key())
            .upload_id(session.upload_id())
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .instrument(tracing::debug_span!("send-complete-multipart-upload"))
            .await
            .map_err(from_sdk(RemoteOperation::CompleteMultipartUpload, None))?;

        Ok(resp.e_tag)
    }

    async fn abort_multipart_upload(&self, session: &MultipartSession) -> Result<(), Error> {
        self.client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(session.key())
            .upload_id(session.upload_id())
            .send()
            .instrument(tracing::debug_span!("send-abort-multipart-upload"))
            .await
            .map_err(from_sdk(RemoteOperation::AbortMultipartUpload, None))?;
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<RemoteEntry>, Error> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut entries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(from_sdk(RemoteOperation::ListObjects, None))?;
            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let size = object.size().unwrap_or_default().max(0) as u64;
                let last_modified = object
                    .last_modified()
                    .and_then(|dt| SystemTime::try_from(*dt).ok())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                entries.push(RemoteEntry::new(key, size, last_modified));
            }
        }
        tracing::trace!("listed {} keys under prefix {:?}", entries.len(), prefix);
        Ok(entries)
    }

    async fn delete_object(&self, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .instrument(tracing::debug_span!("send-delete-object"))
            .await
            .map_err(from_sdk(RemoteOperation::DeleteObject, None))?;
        Ok(())
    }
}
