/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_smithy_types::error::display::DisplayErrorContext;
use tokio::task::JoinSet;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};
use tracing::Instrument;

use crate::error::{Error, ErrorKind};
use crate::middleware::retry::RetryPolicy;
use crate::operation::upload::context::UploadContext;
use crate::operation::upload::ledger::PartLedger;
use crate::operation::upload::PartDescriptor;
use crate::store::{CompletedPart, MultipartSession};

/// Request/input type for our "upload_part" service.
#[derive(Debug, Clone)]
pub(super) struct UploadPartRequest {
    pub(super) ctx: UploadContext,
    pub(super) session: Arc<MultipartSession>,
    pub(super) part: PartDescriptor,
}

/// handler (service fn) for a single part
async fn upload_part_handler(request: UploadPartRequest) -> Result<CompletedPart, Error> {
    let ctx = request.ctx;
    let part_data = ctx.reader.read_part(&request.part).await?;
    tracing::trace!(
        "read {} bytes of part {} from {}",
        part_data.data.len(),
        part_data.part_number,
        ctx.reader.path().display()
    );

    ctx.store()
        .upload_part(&request.session, part_data.part_number, part_data.data)
        .await
}

/// Create a new tower::Service for uploading individual parts of a file
pub(super) fn upload_part_service(
    ctx: &UploadContext,
) -> impl Service<UploadPartRequest, Response = CompletedPart, Error = Error, Future: Send>
       + Clone
       + Send {
    let config = &ctx.handle.config;
    let svc = service_fn(upload_part_handler);
    ServiceBuilder::new()
        .concurrency_limit(ctx.handle.num_workers())
        .retry(RetryPolicy::new(
            config.part_retry_attempts(),
            config.retry_backoff(),
        ))
        .service(svc)
}

/// Upload every part with a fixed pool of workers and wait for all of them to finish.
///
/// All parts are queued up front and the queue is closed before any worker starts, so a
/// worker exits as soon as it finds the queue empty. A failed part is recorded in the
/// ledger and never stops its siblings. Returns the first worker failure (e.g. a panic)
/// once every worker has been joined.
pub(super) async fn distribute_work(
    ctx: &UploadContext,
    session: Arc<MultipartSession>,
    ledger: Arc<PartLedger>,
    parts: Vec<PartDescriptor>,
) -> Result<(), Error> {
    let (tx, rx) = async_channel::unbounded();
    for part in parts {
        tx.try_send(part)
            .map_err(|err| Error::new(ErrorKind::RuntimeError, err))?;
    }
    tx.close();

    let svc = upload_part_service(ctx);
    let n_workers = ctx.handle.num_workers();
    let mut tasks = JoinSet::new();
    for worker_id in 0..n_workers {
        let worker = upload_parts(
            rx.clone(),
            ctx.clone(),
            session.clone(),
            ledger.clone(),
            svc.clone(),
        )
        .instrument(tracing::debug_span!("upload-parts", worker_id));
        tasks.spawn(worker);
    }
    tracing::trace!("work distributed to {n_workers} workers");

    let mut first_err = None;
    while let Some(join_result) = tasks.join_next().await {
        if let Err(err) = join_result {
            tracing::error!("part upload worker did not finish: {err}");
            first_err.get_or_insert(Error::from(err));
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Worker loop: take parts off the queue until it is empty.
async fn upload_parts(
    rx: async_channel::Receiver<PartDescriptor>,
    ctx: UploadContext,
    session: Arc<MultipartSession>,
    ledger: Arc<PartLedger>,
    svc: impl Service<UploadPartRequest, Response = CompletedPart, Error = Error, Future: Send>
        + Clone
        + Send
        + 'static,
) {
    let total = ledger.total();
    while let Ok(part) = rx.try_recv() {
        let part_number = part.part_number();
        ledger.mark_in_flight(part_number);
        let req = UploadPartRequest {
            ctx: ctx.clone(),
            session: session.clone(),
            part,
        };
        match svc.clone().oneshot(req).await {
            Ok(completed) => {
                let done = ledger.mark_succeeded(completed);
                tracing::info!(
                    "sent part {part_number} of {} ({} bytes), {done}/{total} parts done",
                    session.key(),
                    part.length()
                );
            }
            Err(err) => {
                tracing::error!(
                    part_number,
                    "part {part_number} of {} failed: {}",
                    session.key(),
                    DisplayErrorContext(&err)
                );
                ledger.mark_failed(part_number, err);
            }
        }
    }
}
