/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;
use std::time::Duration;

use tower::retry::budget::{Budget, TpsBudget};

use crate::error::Error;

/// A `tower::retry::Policy` implementation for retrying part uploads
///
/// Only failures reported by the object store are retried; local read errors are terminal
/// for the part. Each retry waits twice as long as the previous one.
#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    budget: Arc<TpsBudget>,
    remaining_attempts: usize,
    backoff: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(max_attempts: usize, initial_backoff: Duration) -> Self {
        Self {
            budget: Arc::new(TpsBudget::default()),
            remaining_attempts: max_attempts,
            backoff: initial_backoff,
        }
    }
}

impl<Req, Res> tower::retry::Policy<Req, Res, Error> for RetryPolicy
where
    Req: Clone,
{
    type Future = tokio::time::Sleep;

    fn retry(&mut self, _req: &mut Req, result: &mut Result<Res, Error>) -> Option<Self::Future> {
        match result {
            Ok(_) => {
                self.budget.deposit();
                None
            }
            Err(err) => {
                if !err.is_retryable() {
                    return None;
                }
                if self.remaining_attempts == 0 || !self.budget.withdraw() {
                    return None;
                }
                self.remaining_attempts -= 1;
                let delay = self.backoff;
                self.backoff = self.backoff.saturating_mul(2);
                tracing::debug!("retrying after {:?}: {}", delay, err);
                Some(tokio::time::sleep(delay))
            }
        }
    }

    fn clone_request(&mut self, req: &Req) -> Option<Req> {
        Some(req.clone())
    }
}
