/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::Write;

use tempfile::NamedTempFile;

/// Deterministic content of `size` bytes.
///
/// The pattern repeats every 251 bytes, so a part placed at the wrong offset never
/// lines up with its neighbours.
pub fn patterned_bytes(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Create a temporary file filled with [`patterned_bytes`] of the given size.
///
/// The file is removed when the returned handle is dropped.
pub fn create_test_file(size: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&patterned_bytes(size)).unwrap();
    file.flush().unwrap();
    file
}
