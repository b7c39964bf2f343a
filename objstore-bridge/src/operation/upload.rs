/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;
mod output;

mod context;
mod ledger;
mod planner;
mod service;

use std::sync::Arc;

use aws_smithy_types::error::display::DisplayErrorContext;
use context::UploadContext;
/// Request type for single file uploads
pub use input::{UploadInput, UploadInputBuilder};
use ledger::{LedgerOutcome, PartLedger};
/// Upload state of a single part
pub use ledger::PartState;
/// Response type for single file uploads
pub use output::UploadOutput;
/// Split a file into parts
pub use planner::{plan, PartDescriptor};
use service::distribute_work;

use crate::error::{self, Error, ErrorKind};
use crate::store::MultipartSession;
use crate::types::UploadStrategy;

/// Operation struct for single file upload
#[derive(Clone, Default, Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Execute a single `Upload` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadInput,
    ) -> Result<UploadOutput, Error> {
        let metadata = tokio::fs::metadata(input.path()).await?;
        if !metadata.is_file() {
            return Err(Error::new(
                ErrorKind::LocalIo,
                format!("{} is not a regular file", input.path().display()),
            ));
        }

        // size is read once, parts are planned against this value
        let content_length = metadata.len();
        let min_mpu_threshold = handle.mpu_threshold_bytes();
        let ctx = UploadContext::new(handle, input);

        if content_length < min_mpu_threshold {
            tracing::debug!("file size ({content_length}) less than multipart threshold ({min_mpu_threshold}); sending as single put");
            put_object(ctx, content_length).await
        } else {
            upload_multipart(ctx, content_length).await
        }
    }
}

async fn put_object(ctx: UploadContext, content_length: u64) -> Result<UploadOutput, Error> {
    let req = ctx.request();
    tracing::info!("uploading {} ({content_length} bytes) to {}", req.path().display(), req.key());
    let e_tag = ctx.store().put_object(req.key(), req.path()).await?;
    tracing::info!("uploaded {}", req.key());

    Ok(UploadOutput {
        key: req.key().to_owned(),
        strategy: UploadStrategy::PutObject,
        content_length,
        upload_id: None,
        e_tag,
        part_count: 1,
    })
}

/// Upload a file as a multipart upload.
///
/// The session is committed only when every part succeeded; otherwise it is aborted.
async fn upload_multipart(ctx: UploadContext, content_length: u64) -> Result<UploadOutput, Error> {
    let part_size = ctx.handle.upload_part_size_bytes();
    let parts = plan(content_length, part_size)?;
    let part_count = parts.len() as u64;
    let key = ctx.request().key();

    let session = Arc::new(ctx.store().create_multipart_upload(key).await?);
    tracing::info!(
        "initiated multipart upload {} for {key}: {part_count} parts of up to {part_size} bytes",
        session.upload_id()
    );

    let ledger = Arc::new(PartLedger::new(&parts));
    let join_result = distribute_work(&ctx, session.clone(), ledger.clone(), parts).await;

    let completed = match (ledger.outcome(), join_result) {
        (LedgerOutcome::Complete(completed), Ok(())) => completed,
        (LedgerOutcome::Complete(_), Err(err)) => {
            return Err(abort_upload(&ctx, &session, Vec::new(), err).await);
        }
        (
            LedgerOutcome::Incomplete {
                failed_parts,
                first_error,
            },
            join_result,
        ) => {
            let err = first_error.or(join_result.err()).unwrap_or_else(|| {
                Error::new(ErrorKind::RuntimeError, "part upload did not finish")
            });
            return Err(abort_upload(&ctx, &session, failed_parts, err).await);
        }
    };

    tracing::info!("combining {part_count} parts of {key}");
    let e_tag = match ctx
        .store()
        .complete_multipart_upload(&session, completed)
        .await
    {
        Ok(e_tag) => e_tag,
        Err(err) => {
            // leave nothing half-finished behind
            discard_session(&ctx, &session).await;
            return Err(err);
        }
    };
    tracing::info!("completed multipart upload {} for {key}", session.upload_id());

    Ok(UploadOutput {
        key: key.to_owned(),
        strategy: UploadStrategy::Multipart,
        content_length,
        upload_id: Some(session.upload_id().to_owned()),
        e_tag,
        part_count,
    })
}

/// Abort the session after a part failure and build the error describing it.
async fn abort_upload(
    ctx: &UploadContext,
    session: &MultipartSession,
    failed_parts: Vec<u64>,
    first_error: Error,
) -> Error {
    tracing::error!(
        "aborting multipart upload {} for {}: parts {:?} failed",
        session.upload_id(),
        session.key(),
        failed_parts
    );
    discard_session(ctx, session).await;
    error::partial_multipart_failure(session.upload_id(), failed_parts, first_error)
}

async fn discard_session(ctx: &UploadContext, session: &MultipartSession) {
    if let Err(err) = ctx.store().abort_multipart_upload(session).await {
        tracing::warn!(
            "failed to abort multipart upload {}: {}",
            session.upload_id(),
            DisplayErrorContext(&err)
        );
    }
}
