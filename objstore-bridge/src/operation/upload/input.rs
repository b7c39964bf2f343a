/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use crate::error::{self, Error};

/// Request type for uploading a single local file
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct UploadInput {
    /// The local file to upload.
    pub path: PathBuf,

    /// Object key the file is stored under, used verbatim.
    pub key: String,
}

impl UploadInput {
    /// Create a new builder for `UploadInput`
    pub fn builder() -> UploadInputBuilder {
        UploadInputBuilder::default()
    }

    /// The local file to upload.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Object key the file is stored under.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }
}

/// A builder for [`UploadInput`]
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct UploadInputBuilder {
    pub(crate) path: Option<PathBuf>,
    pub(crate) key: Option<String>,
}

impl UploadInputBuilder {
    /// The local file to upload.
    /// Required.
    pub fn path(mut self, input: impl Into<PathBuf>) -> Self {
        self.path = Some(input.into());
        self
    }

    /// Object key the file is stored under.
    /// Required.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Consumes the builder and constructs an [`UploadInput`]
    pub fn build(self) -> Result<UploadInput, Error> {
        let path = match self.path {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Err(error::invalid_input("upload requires a local path")),
        };
        let key = match self.key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(error::invalid_input("upload requires an object key")),
        };
        Ok(UploadInput { path, key })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_key_is_kept_verbatim() {
        let input = UploadInput::builder()
            .path("/tmp/db.dump")
            .key("/nightly//db.dump")
            .build()
            .unwrap();
        assert_eq!("/nightly//db.dump", input.key());
        assert_eq!(Path::new("/tmp/db.dump"), input.path());
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        let err = UploadInput::builder().key("a").build().unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());

        let err = UploadInput::builder().path("a").key("").build().unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
    }
}
