// SPDX-License-Identifier: MPL-2.0

use crate::error::Result;

/// Arbitration between interrupt use and general-purpose I/O use of a pin.
///
/// Before a pin may be routed through the multiplexer, it must be claimed
/// for exclusive interrupt use; a pin driven as a plain output must not
/// also fire interrupts.
pub trait GpioOwnership: Send + Sync {
    /// Marks the pin as exclusively owned for interrupt use.
    ///
    /// Fails with an ownership conflict if the pin is currently claimed
    /// for general-purpose I/O.
    fn claim_for_irq(&self, hwirq: u32) -> Result<()>;

    /// Releases an interrupt-use claim taken by [`claim_for_irq`].
    ///
    /// [`claim_for_irq`]: Self::claim_for_irq
    fn release_from_irq(&self, hwirq: u32);
}
