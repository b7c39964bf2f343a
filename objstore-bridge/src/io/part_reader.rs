/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::error::Error;
use crate::operation::upload::PartDescriptor;

/// Contents of a single part of a multipart upload.
#[derive(Debug, Clone)]
pub(crate) struct PartData {
    // 1-indexed
    pub(crate) part_number: u64,
    pub(crate) data: Bytes,
}

/// Reads the byte range of a part from a local file.
///
/// Every read opens its own file handle so concurrent workers never contend on a shared
/// cursor.
#[derive(Debug, Clone)]
pub(crate) struct PartReader {
    path: Arc<PathBuf>,
}

impl PartReader {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Read exactly the bytes `[offset, offset + length)` described by `part`.
    ///
    /// A file that shrank underneath us surfaces as a `LocalIo` error.
    pub(crate) async fn read_part(&self, part: &PartDescriptor) -> Result<PartData, Error> {
        let path = self.path.clone();
        let offset = part.offset();
        let length = part.length();
        let part_number = part.part_number();
        let handle = tokio::task::spawn_blocking(move || {
            // TODO - replace allocation with a buffer pool shared across workers
            let mut dst = BytesMut::zeroed(length as usize);
            file_util::read_file_chunk_sync(&mut dst, path.as_path(), offset)?;
            Ok::<PartData, Error>(PartData {
                part_number,
                data: dst.freeze(),
            })
        });

        handle.await?
    }

    pub(crate) fn path(&self) -> &Path {
        self.path.as_path()
    }
}

mod file_util {
    use std::fs::File;
    use std::io;
    use std::io::{Read, Seek, SeekFrom};
    use std::path::Path;

    pub(crate) fn read_file_chunk_sync(
        dst: &mut [u8],
        path: impl AsRef<Path>,
        offset: u64,
    ) -> Result<(), io::Error> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(dst)
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::PartReader;
    use crate::error::ErrorKind;
    use crate::operation::upload::plan;

    const CONTENT: &[u8] = b"a lep is a ball, a tay is a hammer, a flix is a comb";

    #[tokio::test]
    async fn test_reads_every_planned_range() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(CONTENT).unwrap();

        let reader = PartReader::new(tmp.path());
        let parts = plan(CONTENT.len() as u64, 5).unwrap();
        let expected = CONTENT.chunks(5).collect::<Vec<_>>();

        let mut actual = Vec::new();
        for part in &parts {
            let data = reader.read_part(part).await.unwrap();
            assert_eq!(part.part_number(), data.part_number);
            actual.push(data.data);
        }
        let actual = actual.iter().map(|b| b.as_ref()).collect::<Vec<_>>();
        assert_eq!(expected, actual);
    }

    #[tokio::test]
    async fn test_truncated_file_is_local_io_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(CONTENT).unwrap();
        let parts = plan(CONTENT.len() as u64, 20).unwrap();

        // shrink the file after planning
        tmp.as_file().set_len(10).unwrap();

        let reader = PartReader::new(tmp.path());
        let err = reader.read_part(&parts[1]).await.unwrap_err();
        assert_eq!(&ErrorKind::LocalIo, err.kind());
    }

    #[tokio::test]
    async fn test_missing_file_is_local_io_error() {
        let reader = PartReader::new("/definitely/not/here.bin");
        let parts = plan(10, 5).unwrap();
        let err = reader.read_part(&parts[0]).await.unwrap_err();
        assert_eq!(&ErrorKind::LocalIo, err.kind());
    }
}
