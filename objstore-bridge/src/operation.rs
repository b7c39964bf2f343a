/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Types for single file upload operation
pub mod upload;

/// Types for single object download operation
pub mod download;

/// Types for listing a directory view of the bucket
pub mod list_directory;

/// Types for object and directory removal
pub mod delete;

/// Normalise a remote directory path into a key prefix.
///
/// A leading `/` is stripped; a non-empty prefix without a trailing `/` gets one so that
/// `logs` never matches `logs-archive/...`.
pub(crate) fn directory_prefix(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    }
}

#[cfg(test)]
mod test {
    use super::directory_prefix;

    #[test]
    fn test_directory_prefix() {
        assert_eq!("", directory_prefix(""));
        assert_eq!("", directory_prefix("/"));
        assert_eq!("backups/", directory_prefix("/backups"));
        assert_eq!("backups/", directory_prefix("backups/"));
        assert_eq!("a/b/", directory_prefix("//a/b"));
    }
}
