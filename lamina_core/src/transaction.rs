// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transaction signaling between requester threads and the composition pass.
//!
//! Every layer owns one [`TransactionFlags`] word. Requesters set bits with
//! an atomic OR; the composition pass drains the bits it handles with an
//! atomic AND-NOT. Both are single read-modify-write operations, so
//!
//! - concurrent requests coalesce instead of being lost, and
//! - clearing one bit never drops a different bit set at the same time.
//!
//! The same [`TransactionBits`] type carries the input and output flags of
//! [`Layer::do_transaction`](crate::layer::Layer::do_transaction).
//!
//! # Bits
//!
//! - [`TRANSACTION_NEEDED`](TransactionBits::TRANSACTION_NEEDED) — the layer
//!   has uncommitted `current` state.
//! - [`VISIBLE_REGION`](TransactionBits::VISIBLE_REGION) — visible regions
//!   must be recomputed by the occlusion pass.
//! - [`DONT_UPDATE_GEOMETRY`](TransactionBits::DONT_UPDATE_GEOMETRY) — input
//!   only: keep the active size, leaving a requested resize pending.
//!
//! Bits above `0x8000` are free for the owning compositor.

use core::sync::atomic::{AtomicU32, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Transaction signal bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TransactionBits: u32 {
        /// Uncommitted state is pending.
        const TRANSACTION_NEEDED = 0x01;
        /// Visible regions must be recomputed.
        const VISIBLE_REGION = 0x02;
        /// Do not apply the requested size during this transaction.
        const DONT_UPDATE_GEOMETRY = 0x8000;

        // Extension bits belong to the owning compositor.
        const _ = !0;
    }
}

/// An atomically updated [`TransactionBits`] word.
#[derive(Debug, Default)]
pub struct TransactionFlags(AtomicU32);

impl TransactionFlags {
    /// Creates a word with no bits set.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Sets `bits` and returns the value before the update.
    pub fn set(&self, bits: TransactionBits) -> TransactionBits {
        TransactionBits::from_bits_retain(self.0.fetch_or(bits.bits(), Ordering::AcqRel))
    }

    /// Clears `bits` and returns the subset of them that was set.
    pub fn get_clear(&self, bits: TransactionBits) -> TransactionBits {
        let prior = self.0.fetch_and(!bits.bits(), Ordering::AcqRel);
        TransactionBits::from_bits_retain(prior) & bits
    }

    /// Returns the current bits without modifying them.
    ///
    /// The value may be stale by the time it is inspected; use it for
    /// diagnostics, not for deciding whether to drain.
    #[must_use]
    pub fn peek(&self) -> TransactionBits {
        TransactionBits::from_bits_retain(self.0.load(Ordering::Acquire))
    }

    /// Sets [`TRANSACTION_NEEDED`](TransactionBits::TRANSACTION_NEEDED).
    ///
    /// Returns `true` if this call set the bit, i.e. the caller should wake
    /// the composition pass.
    pub fn request(&self) -> bool {
        !self
            .set(TransactionBits::TRANSACTION_NEEDED)
            .contains(TransactionBits::TRANSACTION_NEEDED)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn set_returns_prior_value() {
        let flags = TransactionFlags::new();
        assert_eq!(flags.set(TransactionBits::VISIBLE_REGION), TransactionBits::empty());
        assert_eq!(
            flags.set(TransactionBits::TRANSACTION_NEEDED),
            TransactionBits::VISIBLE_REGION
        );
        assert_eq!(
            flags.peek(),
            TransactionBits::VISIBLE_REGION | TransactionBits::TRANSACTION_NEEDED
        );
    }

    #[test]
    fn request_reports_transition_once() {
        let flags = TransactionFlags::new();
        assert!(flags.request(), "first request sets the bit");
        assert!(!flags.request(), "second request observes the bit");
        flags.get_clear(TransactionBits::TRANSACTION_NEEDED);
        assert!(flags.request(), "request after drain sets the bit again");
    }

    #[test]
    fn get_clear_drains_exactly_once() {
        let flags = TransactionFlags::new();
        let both = TransactionBits::TRANSACTION_NEEDED | TransactionBits::VISIBLE_REGION;
        flags.set(both);
        assert_eq!(flags.get_clear(both), both);
        assert_eq!(flags.get_clear(both), TransactionBits::empty());
    }

    #[test]
    fn get_clear_leaves_other_bits() {
        let flags = TransactionFlags::new();
        flags.set(TransactionBits::TRANSACTION_NEEDED | TransactionBits::VISIBLE_REGION);
        assert_eq!(
            flags.get_clear(TransactionBits::TRANSACTION_NEEDED),
            TransactionBits::TRANSACTION_NEEDED
        );
        assert_eq!(flags.peek(), TransactionBits::VISIBLE_REGION);
    }

    #[test]
    fn get_clear_masks_unrequested_bits() {
        let flags = TransactionFlags::new();
        flags.set(TransactionBits::VISIBLE_REGION);
        assert_eq!(
            flags.get_clear(TransactionBits::TRANSACTION_NEEDED),
            TransactionBits::empty()
        );
    }

    #[test]
    fn extension_bits_are_retained() {
        let flags = TransactionFlags::new();
        let custom = TransactionBits::from_bits_retain(0x0001_0000);
        flags.set(custom);
        assert_eq!(flags.get_clear(custom), custom);
    }

    #[test]
    fn concurrent_set_and_clear_lose_nothing() {
        const ROUNDS: u32 = 10_000;
        let flags = Arc::new(TransactionFlags::new());

        // One producer repeatedly raises VISIBLE_REGION while the consumer
        // keeps draining TRANSACTION_NEEDED. Every raise must survive.
        let producer = {
            let flags = Arc::clone(&flags);
            thread::spawn(move || {
                let mut observed = 0_u32;
                for _ in 0..ROUNDS {
                    flags.set(TransactionBits::VISIBLE_REGION);
                    flags.set(TransactionBits::TRANSACTION_NEEDED);
                    if flags.peek().contains(TransactionBits::VISIBLE_REGION) {
                        observed += 1;
                    }
                }
                observed
            })
        };
        for _ in 0..ROUNDS {
            flags.get_clear(TransactionBits::TRANSACTION_NEEDED);
        }
        let observed = producer.join().expect("producer thread panicked");
        assert_eq!(observed, ROUNDS, "VISIBLE_REGION was dropped by a clear");
        assert!(flags.peek().contains(TransactionBits::VISIBLE_REGION));
    }
}
