/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// A size setting for upload requests (multipart threshold or part size).
#[derive(Debug, Clone, Default)]
pub enum PartSize {
    /// Use the built-in default for the setting.
    #[default]
    Auto,

    /// Size explicitly given, in bytes.
    Target(u64),
}

/// The number of workers used to upload the parts of a single multipart upload.
#[derive(Debug, Clone, Default)]
pub enum ConcurrencySetting {
    /// Use the built-in default (4 workers).
    #[default]
    Auto,

    /// Explicitly configured number of workers.
    Explicit(usize),
}

/// How a single file is transferred to the object store.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum UploadStrategy {
    /// The file is sent with one whole-object put.
    PutObject,

    /// The file is split into parts and sent as a multipart upload.
    Multipart,
}
