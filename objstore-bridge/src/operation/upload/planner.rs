/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::{self, Error};

/// One contiguous byte range of a file, uploaded as a single part of a multipart upload.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PartDescriptor {
    // 1-indexed
    part_number: u64,
    offset: u64,
    length: u64,
}

impl PartDescriptor {
    /// The part number (starting at 1)
    pub fn part_number(&self) -> u64 {
        self.part_number
    }

    /// Byte offset of the part within the file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of bytes in the part
    pub fn length(&self) -> u64 {
        self.length
    }
}

/// Split `size` bytes into parts of `chunk_size` bytes.
///
/// Produces `ceil(size / chunk_size)` contiguous, non-overlapping parts numbered from 1.
/// Every part is `chunk_size` bytes except possibly the last, which holds the remainder.
/// An empty file yields no parts.
pub fn plan(size: u64, chunk_size: u64) -> Result<Vec<PartDescriptor>, Error> {
    if chunk_size == 0 {
        return Err(error::invalid_input("chunk size must be greater than zero"));
    }

    let part_count = size.div_ceil(chunk_size);
    let parts = (0..part_count)
        .map(|i| {
            let offset = i * chunk_size;
            PartDescriptor {
                part_number: i + 1,
                offset,
                length: chunk_size.min(size - offset),
            }
        })
        .collect();
    Ok(parts)
}
