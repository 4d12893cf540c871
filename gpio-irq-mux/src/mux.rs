// SPDX-License-Identifier: MPL-2.0

//! The mux protocol engine: encodes pin-to-line bindings and trigger
//! configuration into the multiplexer's register block.
//!
//! Register layout, one 32-bit register each:
//!
//! - `EDGE_POL`: bit `i` selects edge (1) vs. level (0) for line `i`, bit
//!   `16 + i` selects the inverted polarity (falling edge / active low).
//! - `GPIO_SEL0`/`GPIO_SEL1`: one selection byte per line, four lines per
//!   register. The byte holds the bank-relative pin encoding.
//! - `FILTER`: one glitch-filter nibble per line.
//!
//! Every write here is a masked read-modify-write on a register shared by
//! all lines, so the caller holds the controller lock across each call.

use alloc::sync::Arc;

use bit_field::BitField;
use log::debug;

use crate::{bank::PinBank, regs::RegisterMap, trigger::TriggerType};

const REG_EDGE_POL: usize = 0x00;
const REG_GPIO_SEL0: usize = 0x04;
const REG_GPIO_SEL1: usize = 0x08;
const REG_FILTER: usize = 0x0c;

/// The default, undocumented hardware value of a line's filter nibble.
const FILTER_DEFAULT: u32 = 7;

const SLOTS_PER_SEL_REG: usize = 4;

/// The number of shared lines the register protocol has room for: two
/// selection registers of four bytes each, and eight filter nibbles.
pub(crate) const MAX_SHARED_LINES: usize = 8;

pub(crate) struct MuxRegs {
    regs: Arc<dyn RegisterMap>,
}

impl MuxRegs {
    pub(crate) fn new(regs: Arc<dyn RegisterMap>) -> Self {
        Self { regs }
    }

    /// Routes `hwirq` of `bank` through shared line `slot` and programs the
    /// line's filter to the default value.
    pub(crate) fn program_binding(&self, bank: &PinBank, slot: usize, hwirq: u32) {
        let reg = if slot < SLOTS_PER_SEL_REG {
            REG_GPIO_SEL0
        } else {
            REG_GPIO_SEL1
        };
        let shift = (slot % SLOTS_PER_SEL_REG) * 8;
        let sel = bank.sel_value(hwirq);
        debug!("routing hwirq {} (sel {}) through line {}", hwirq, sel, slot);
        self.regs.update_bits(reg, 0xff << shift, sel << shift);

        self.regs
            .update_bits(REG_FILTER, 0xf << (slot * 4), FILTER_DEFAULT << (slot * 4));
    }

    /// Programs the edge/polarity bit pair of shared line `slot`.
    ///
    /// Touches exactly the two bits belonging to the slot.
    pub(crate) fn program_trigger(&self, slot: usize, trigger: TriggerType) {
        let mut value = 0u32;
        value.set_bit(slot, trigger.is_edge());
        value.set_bit(16 + slot, trigger.is_inverted());

        let mut mask = 0u32;
        mask.set_bit(slot, true);
        mask.set_bit(16 + slot, true);

        self.regs.update_bits(REG_EDGE_POL, mask, value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::regs::test_util::FakeRegs;

    const GPIOH: PinBank = PinBank {
        name: "gpioh",
        first: 96,
        count: 14,
        sel_base: 14,
    };

    fn mux() -> (Arc<FakeRegs>, MuxRegs) {
        let regs = Arc::new(FakeRegs::new());
        let mux = MuxRegs::new(regs.clone());
        (regs, mux)
    }

    #[test]
    fn low_slots_use_the_first_selection_register() {
        let (regs, mux) = mux();
        mux.program_binding(&GPIOH, 2, 105);
        // GPIOH_9 encodes as 14 + 105 - 96 = 23, in byte 2 of SEL0.
        assert_eq!(regs.get(REG_GPIO_SEL0), 23 << 16);
        assert_eq!(regs.get(REG_GPIO_SEL1), 0);
    }

    #[test]
    fn high_slots_use_the_second_selection_register() {
        let (regs, mux) = mux();
        mux.program_binding(&GPIOH, 5, 96);
        // Slot 5 lands in byte 1 of SEL1.
        assert_eq!(regs.get(REG_GPIO_SEL1), 14 << 8);
        assert_eq!(regs.get(REG_GPIO_SEL0), 0);
    }

    #[test]
    fn binding_preserves_the_other_selection_bytes() {
        let (regs, mux) = mux();
        regs.set(REG_GPIO_SEL0, 0x11223344);
        mux.program_binding(&GPIOH, 1, 97);
        assert_eq!(regs.get(REG_GPIO_SEL0), 0x1122_0f44);
    }

    #[test]
    fn binding_sets_the_default_filter_nibble() {
        let (regs, mux) = mux();
        mux.program_binding(&GPIOH, 3, 100);
        assert_eq!(regs.get(REG_FILTER), 7 << 12);
        mux.program_binding(&GPIOH, 0, 101);
        assert_eq!(regs.get(REG_FILTER), (7 << 12) | 7);
    }

    #[test]
    fn the_last_routable_slot_has_its_own_fields() {
        let (regs, mux) = mux();
        mux.program_binding(&GPIOH, 4, 96);
        mux.program_binding(&GPIOH, MAX_SHARED_LINES - 1, 105);
        // Slot 7 occupies byte 3 of SEL1 and filter nibble 7; slot 4's
        // selection byte is untouched.
        assert_eq!(regs.get(REG_GPIO_SEL1), (23 << 24) | 14);
        assert_eq!(regs.get(REG_FILTER), (7 << 28) | (7 << 16));
    }

    #[test]
    fn trigger_bit_pair_encoding() {
        let (regs, mux) = mux();

        mux.program_trigger(5, TriggerType::EdgeFalling);
        assert_eq!(regs.get(REG_EDGE_POL), (1 << 5) | (1 << 21));

        mux.program_trigger(5, TriggerType::LevelHigh);
        assert_eq!(regs.get(REG_EDGE_POL), 0);

        mux.program_trigger(5, TriggerType::LevelLow);
        assert_eq!(regs.get(REG_EDGE_POL), 1 << 21);

        mux.program_trigger(5, TriggerType::EdgeRising);
        assert_eq!(regs.get(REG_EDGE_POL), 1 << 5);
    }

    #[test]
    fn trigger_update_leaves_other_slots_alone() {
        let (regs, mux) = mux();
        regs.set(REG_EDGE_POL, (1 << 0) | (1 << 16) | (1 << 7));
        mux.program_trigger(1, TriggerType::EdgeFalling);
        assert_eq!(
            regs.get(REG_EDGE_POL),
            (1 << 0) | (1 << 16) | (1 << 7) | (1 << 1) | (1 << 17)
        );
    }
}
