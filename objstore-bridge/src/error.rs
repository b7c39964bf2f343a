/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of bridge errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input or configuration validation issues
    InputInvalid,

    /// The local file is missing, unreadable, or changed size underneath us
    LocalIo,

    /// The object store rejected or failed a request
    RemoteStore(RemoteFailure),

    /// Resource not found (e.g. bucket, key, multipart upload ID not found)
    NotFound,

    /// One or more parts of a multipart upload failed; the upload was not committed
    PartialMultipartFailure(PartialFailure),

    /// Some kind of internal runtime issue (e.g. task failure, panic)
    RuntimeError,
}

/// The object store call that was being made when a failure occurred.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RemoteOperation {
    /// Whole object upload
    PutObject,
    /// Whole object download
    GetObject,
    /// Start of a multipart upload
    CreateMultipartUpload,
    /// Upload of one part
    UploadPart,
    /// Commit of a multipart upload
    CompleteMultipartUpload,
    /// Discard of a multipart upload
    AbortMultipartUpload,
    /// Key listing
    ListObjects,
    /// Key deletion
    DeleteObject,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteOperation::PutObject => "PutObject",
            RemoteOperation::GetObject => "GetObject",
            RemoteOperation::CreateMultipartUpload => "CreateMultipartUpload",
            RemoteOperation::UploadPart => "UploadPart",
            RemoteOperation::CompleteMultipartUpload => "CompleteMultipartUpload",
            RemoteOperation::AbortMultipartUpload => "AbortMultipartUpload",
            RemoteOperation::ListObjects => "ListObjects",
            RemoteOperation::DeleteObject => "DeleteObject",
        };
        f.write_str(name)
    }
}

/// Details of a failed object store request
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteFailure {
    operation: RemoteOperation,
    part_number: Option<u64>,
}

impl RemoteFailure {
    /// Describe a failed request, e.g. for errors raised by an [`ObjectStore`](crate::store::ObjectStore)
    /// implementation outside this crate.
    pub fn new(operation: RemoteOperation, part_number: Option<u64>) -> Self {
        Self {
            operation,
            part_number,
        }
    }

    /// The store operation that failed
    pub fn operation(&self) -> RemoteOperation {
        self.operation
    }

    /// The part number, if the failure happened while uploading a part
    pub fn part_number(&self) -> Option<u64> {
        self.part_number
    }
}

/// Details of a multipart upload that could not be committed
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PartialFailure {
    upload_id: String,
    failed_parts: Vec<u64>,
}

impl PartialFailure {
    /// The multipart upload ID that was aborted
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    /// Part numbers that did not succeed, in ascending order
    pub fn failed_parts(&self) -> &[u64] {
        &self.failed_parts
    }
}

impl Error {
    /// Creates a new bridge [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Whether a failed request is worth repeating.
    pub(crate) fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::RemoteStore(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::LocalIo => write!(f, "local I/O error"),
            ErrorKind::RemoteStore(failure) => match failure.part_number {
                Some(part_number) => write!(
                    f,
                    "object store {} failed for part {}",
                    failure.operation, part_number
                ),
                None => write!(f, "object store {} failed", failure.operation),
            },
            ErrorKind::NotFound => write!(f, "resource not found"),
            ErrorKind::PartialMultipartFailure(partial) => write!(
                f,
                "multipart upload {} aborted, parts {:?} failed",
                partial.upload_id, partial.failed_parts
            ),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::LocalIo, value)
    }
}

impl From<aws_smithy_types::byte_stream::error::Error> for Error {
    fn from(value: aws_smithy_types::byte_stream::error::Error) -> Self {
        Self::new(ErrorKind::LocalIo, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn remote_failure<E>(operation: RemoteOperation, part_number: Option<u64>, err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(
        ErrorKind::RemoteStore(RemoteFailure::new(operation, part_number)),
        err,
    )
}

pub(crate) fn partial_multipart_failure(
    upload_id: impl Into<String>,
    failed_parts: Vec<u64>,
    first_error: Error,
) -> Error {
    Error::new(
        ErrorKind::PartialMultipartFailure(PartialFailure {
            upload_id: upload_id.into(),
            failed_parts,
        }),
        first_error,
    )
}

/// Map an SDK error for the given operation into a bridge [`Error`].
///
/// Missing key/upload/bucket responses become [`ErrorKind::NotFound`], everything else is a
/// [`ErrorKind::RemoteStore`] failure tagged with the operation.
pub(crate) fn from_sdk<E, R>(
    operation: RemoteOperation,
    part_number: Option<u64>,
) -> impl FnOnce(aws_sdk_s3::error::SdkError<E, R>) -> Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    move |value| match value.code() {
        Some("NotFound" | "NoSuchKey" | "NoSuchUpload" | "NoSuchBucket") => {
            Error::new(ErrorKind::NotFound, value)
        }
        _ => remote_failure(operation, part_number, value),
    }
}
