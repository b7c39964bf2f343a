/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::ops::Deref;
use std::sync::Arc;

use crate::io::part_reader::PartReader;
use crate::operation::upload::UploadInput;
use crate::store::ObjectStore;

/// Internal context used to drive a single Upload operation
#[derive(Debug, Clone)]
pub(crate) struct UploadContext {
    /// reference to client handle used to do actual work
    pub(crate) handle: Arc<crate::client::Handle>,
    /// the original request
    pub(crate) request: Arc<UploadInput>,
    /// reads part ranges from the request's file
    pub(crate) reader: PartReader,
}

impl UploadContext {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, request: UploadInput) -> Self {
        let reader = PartReader::new(request.path());
        Self {
            handle,
            request: Arc::new(request),
            reader,
        }
    }

    /// The object store to use for requests
    pub(crate) fn store(&self) -> &dyn ObjectStore {
        self.handle.store().deref()
    }

    /// The original request
    pub(crate) fn request(&self) -> &UploadInput {
        self.request.deref()
    }
}
