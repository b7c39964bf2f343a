/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Mutex;

use crate::error::Error;
use crate::operation::upload::PartDescriptor;
use crate::store::CompletedPart;

/// Upload state of a single part.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PartState {
    /// Queued, not yet picked up by a worker
    Pending,
    /// A worker is reading or sending the part
    InFlight,
    /// The store accepted the part
    Succeeded,
    /// The part could not be uploaded
    Failed,
}

#[derive(Debug)]
struct Slot {
    state: PartState,
    completed: Option<CompletedPart>,
    error: Option<Error>,
}

/// Terminal state of every part of a multipart upload.
#[derive(Debug)]
pub(super) enum LedgerOutcome {
    /// Every part succeeded; completed parts are sorted by part number.
    Complete(Vec<CompletedPart>),
    /// At least one part did not succeed.
    Incomplete {
        /// part numbers that did not succeed, ascending
        failed_parts: Vec<u64>,
        /// error of the lowest-numbered failed part that recorded one
        first_error: Option<Error>,
    },
}

/// Tracks the state of every part of a multipart upload.
///
/// Each slot is only ever written by the worker that dequeued the matching part, so a
/// failure of one part never disturbs the state of another.
#[derive(Debug)]
pub(super) struct PartLedger {
    // indexed by part_number - 1
    slots: Mutex<Vec<Slot>>, // std Mutex
}

impl PartLedger {
    pub(super) fn new(parts: &[PartDescriptor]) -> Self {
        let slots = parts
            .iter()
            .map(|_| Slot {
                state: PartState::Pending,
                completed: None,
                error: None,
            })
            .collect();
        Self {
            slots: Mutex::new(slots),
        }
    }

    pub(super) fn mark_in_flight(&self, part_number: u64) {
        self.update(part_number, |slot| slot.state = PartState::InFlight);
    }

    /// Record a successful part and return the number of parts that have succeeded so far.
    pub(super) fn mark_succeeded(&self, completed: CompletedPart) -> usize {
        let part_number = completed.part_number();
        self.update(part_number, |slot| {
            slot.state = PartState::Succeeded;
            slot.completed = Some(completed);
        });
        self.count(PartState::Succeeded)
    }

    pub(super) fn mark_failed(&self, part_number: u64, err: Error) {
        self.update(part_number, |slot| {
            slot.state = PartState::Failed;
            slot.error = Some(err);
        });
    }

    /// Number of parts being tracked.
    pub(super) fn total(&self) -> usize {
        self.slots.lock().expect("lock valid").len()
    }

    #[cfg(test)]
    pub(super) fn state(&self, part_number: u64) -> Option<PartState> {
        let slots = self.slots.lock().expect("lock valid");
        index(part_number).and_then(|i| slots.get(i)).map(|slot| slot.state)
    }

    pub(super) fn count(&self, state: PartState) -> usize {
        let slots = self.slots.lock().expect("lock valid");
        slots.iter().filter(|slot| slot.state == state).count()
    }

    /// Inspect the terminal state of every part once all workers have exited.
    ///
    /// Parts still pending or in flight (e.g. their worker panicked) count as failed.
    pub(super) fn outcome(&self) -> LedgerOutcome {
        let mut slots = self.slots.lock().expect("lock valid");
        let failed_parts = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state != PartState::Succeeded)
            .map(|(i, _)| i as u64 + 1)
            .collect::<Vec<_>>();

        if failed_parts.is_empty() {
            let completed = slots
                .iter_mut()
                .filter_map(|slot| slot.completed.take())
                .collect();
            return LedgerOutcome::Complete(completed);
        }

        let first_error = slots.iter_mut().find_map(|slot| slot.error.take());
        LedgerOutcome::Incomplete {
            failed_parts,
            first_error,
        }
    }

    fn update(&self, part_number: u64, f: impl FnOnce(&mut Slot)) {
        let mut slots = self.slots.lock().expect("lock valid");
        match index(part_number).and_then(|i| slots.get_mut(i)) {
            Some(slot) => f(slot),
            None => tracing::warn!("ignoring update for unknown part number {part_number}"),
        }
    }
}

fn index(part_number: u64) -> Option<usize> {
    part_number.checked_sub(1).map(|i| i as usize)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{self, RemoteOperation};
    use crate::operation::upload::plan;

    #[test]
    fn test_all_succeeded_yields_sorted_parts() {
        let parts = plan(30, 10).unwrap();
        let ledger = PartLedger::new(&parts);
        for n in [3, 1, 2] {
            ledger.mark_in_flight(n);
            ledger.mark_succeeded(CompletedPart::new(n, Some(format!("etag-{n}"))));
        }

        match ledger.outcome() {
            LedgerOutcome::Complete(completed) => {
                let numbers = completed.iter().map(|p| p.part_number()).collect::<Vec<_>>();
                assert_eq!(vec![1, 2, 3], numbers);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_failed_and_unfinished_parts_are_reported() {
        let parts = plan(40, 10).unwrap();
        let ledger = PartLedger::new(&parts);
        ledger.mark_succeeded(CompletedPart::new(1, None));
        ledger.mark_failed(
            2,
            error::remote_failure(RemoteOperation::UploadPart, Some(2), "boom"),
        );
        ledger.mark_succeeded(CompletedPart::new(3, None));
        // part 4 never left flight
        ledger.mark_in_flight(4);

        assert_eq!(4, ledger.total());
        assert_eq!(Some(PartState::Failed), ledger.state(2));
        assert_eq!(2, ledger.count(PartState::Succeeded));

        match ledger.outcome() {
            LedgerOutcome::Incomplete {
                failed_parts,
                first_error,
            } => {
                assert_eq!(vec![2, 4], failed_parts);
                assert_eq!(
                    "object store UploadPart failed for part 2",
                    first_error.unwrap().to_string()
                );
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_unknown_part_number_is_ignored() {
        let parts = plan(10, 10).unwrap();
        let ledger = PartLedger::new(&parts);
        ledger.mark_in_flight(0);
        ledger.mark_in_flight(5);
        assert_eq!(Some(PartState::Pending), ledger.state(1));
        assert_eq!(None, ledger.state(5));
    }
}
