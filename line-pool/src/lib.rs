// SPDX-License-Identifier: MPL-2.0

//! A fixed-size pool of shared interrupt lines.
//!
//! Some SoCs route their interrupt-capable GPIO pins through a multiplexer
//! that owns only a handful of lines toward the upstream interrupt
//! controller. [`LinePool`] is the bookkeeping half of such a multiplexer:
//! a table of slots, each either free or bound to the hardware interrupt
//! number (`hwirq`) of the pin currently routed through it.
//!
//! The pool performs no locking and touches no hardware. The caller is
//! expected to serialize access (typically under the driver's spin lock)
//! and to program the routing registers itself.
//!
//! All lookups are linear scans. The pool is sized once at creation from
//! the hardware description and is small (single-digit to low tens of
//! slots), so a secondary index would cost more than it saves.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::{boxed::Box, vec};

/// A table of shared-line slots, each either free or bound to a pin.
///
/// Slot indices are stable: the index of a slot is also the index used to
/// address that line's fields in the multiplexer's routing registers, and
/// the index of the upstream hardware line the slot drives.
#[derive(Debug)]
pub struct LinePool {
    slots: Box<[Option<u32>]>,
}

impl LinePool {
    /// Creates a pool with `len` slots, all free.
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![None; len].into_boxed_slice(),
        }
    }

    /// Returns the total number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the number of currently free slots.
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Finds the first free slot.
    ///
    /// Returns `None` when every line in the pool is in use.
    pub fn find_free(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Finds the slot currently bound to `hwirq`.
    ///
    /// Returns `None` when the pin has no active binding.
    pub fn find_by_pin(&self, hwirq: u32) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(hwirq))
    }

    /// Binds `slot` to `hwirq`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already bound. Callers obtain free slots from
    /// [`find_free`] under the same critical section, so a double bind is a
    /// logic error.
    ///
    /// [`find_free`]: Self::find_free
    pub fn bind(&mut self, slot: usize, hwirq: u32) {
        assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(hwirq);
    }

    /// Unbinds `slot`, returning the pin it was bound to, if any.
    ///
    /// Unbinding a free slot is a no-op.
    pub fn unbind(&mut self, slot: usize) -> Option<u32> {
        self.slots[slot].take()
    }

    /// Returns the pin bound to `slot`, if any.
    pub fn pin_at(&self, slot: usize) -> Option<u32> {
        self.slots[slot]
    }
}
