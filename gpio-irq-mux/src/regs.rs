// SPDX-License-Identifier: MPL-2.0

use core::ptr::NonNull;

use volatile::VolatilePtr;

/// Atomic access to a block of named 32-bit registers.
///
/// This is the seam toward the platform's register-map service. Register
/// offsets are in bytes from the start of the block. A single `read` or
/// `write` must be atomic with respect to concurrent users of the same
/// block elsewhere in the system; the compound read-modify-write of
/// [`update_bits`] is not, and callers serialize it under their own lock.
///
/// [`update_bits`]: Self::update_bits
pub trait RegisterMap: Send + Sync {
    /// Reads the register at byte offset `reg`.
    fn read(&self, reg: usize) -> u32;

    /// Writes the register at byte offset `reg`.
    fn write(&self, reg: usize, value: u32);

    /// Reads the field selected by `mask`, shifted down to bit 0.
    ///
    /// `mask` must select at least one bit.
    fn read_field(&self, reg: usize, mask: u32) -> u32 {
        debug_assert!(mask != 0);
        (self.read(reg) & mask) >> mask.trailing_zeros()
    }

    /// Replaces the bits selected by `mask` with the matching bits of
    /// `value`, leaving all other bits of the register untouched.
    fn update_bits(&self, reg: usize, mask: u32, value: u32) {
        let old = self.read(reg);
        self.write(reg, (old & !mask) | (value & mask));
    }
}

/// A [`RegisterMap`] over a memory-mapped register block.
pub struct MmioRegisterMap {
    base: NonNull<u32>,
    nr_regs: usize,
}

// SAFETY: The struct is an address plus a length; the hardware registers it
// points at are shared state by nature, and every access goes through
// volatile reads and writes.
unsafe impl Send for MmioRegisterMap {}
unsafe impl Sync for MmioRegisterMap {}

impl MmioRegisterMap {
    /// Creates a register map over `nr_regs` 32-bit registers at `base`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `base` is the virtual address of a
    /// device register block at least `nr_regs * 4` bytes long, mapped
    /// uncached, and that this map has exclusive ownership of the block
    /// for its lifetime.
    pub unsafe fn new(base: NonNull<u32>, nr_regs: usize) -> Self {
        Self { base, nr_regs }
    }

    fn reg_ptr(&self, reg: usize) -> VolatilePtr<'_, u32> {
        assert_eq!(reg % 4, 0);
        let index = reg / 4;
        assert!(index < self.nr_regs);
        // SAFETY: The constructor's contract guarantees that the first
        // `nr_regs` registers at `base` are valid, exclusively owned
        // device memory, and `index` was checked against that bound.
        unsafe { VolatilePtr::new(self.base.add(index)) }
    }
}

impl RegisterMap for MmioRegisterMap {
    fn read(&self, reg: usize) -> u32 {
        self.reg_ptr(reg).read()
    }

    fn write(&self, reg: usize, value: u32) {
        self.reg_ptr(reg).write(value);
    }
}
