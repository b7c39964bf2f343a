/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */

//! Object storage bridge
//!
//! Lets a backup pipeline treat a single S3-compatible bucket as a pseudo-filesystem.
//! Files are uploaded either as a single object or, above a size threshold, as a
//! concurrent multipart upload that is only committed once every part has succeeded.
//! Directories are emulated over the flat key namespace when listing.

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

/// Default size (in bytes) at or above which uploads switch to multipart.
pub(crate) const DEFAULT_MULTIPART_THRESHOLD: u64 = 1_000_000_000;

/// Default size (in bytes) of each multipart upload part.
pub(crate) const DEFAULT_PART_SIZE: u64 = 100_000_000;

pub(crate) const DEFAULT_CONCURRENCY: usize = 4;

/// Error types emitted by `objstore-bridge`
pub mod error;

/// Common types used by `objstore-bridge`
pub mod types;

/// Object store abstraction and implementations
pub mod store;

/// Types and helpers for I/O
pub(crate) mod io;

pub(crate) mod middleware;

/// Bridge client
pub mod client;

/// Bridge client configuration
pub mod config;

/// Bridge operations
pub mod operation;

pub use self::client::Client;
pub use self::config::Config;
