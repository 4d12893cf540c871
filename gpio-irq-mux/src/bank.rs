// SPDX-License-Identifier: MPL-2.0

use alloc::boxed::Box;

/// A contiguous range of pins sharing a register-offset convention.
///
/// Banks are immutable description records, built once from the hardware
/// description and looked up by index thereafter.
#[derive(Clone, Copy, Debug)]
pub struct PinBank {
    /// The bank name, e.g. `"gpioh"`.
    pub name: &'static str,
    /// The hardware interrupt number of the bank's first pin.
    pub first: u32,
    /// The number of pins in the bank.
    pub count: u32,
    /// The selection-register value of the bank's first pin. A pin of this
    /// bank encodes as `sel_base + (hwirq - first)`.
    pub sel_base: u32,
}

impl PinBank {
    /// Returns `true` if `hwirq` falls inside this bank.
    pub fn contains(&self, hwirq: u32) -> bool {
        hwirq >= self.first && hwirq - self.first < self.count
    }

    /// Returns the selection-register encoding of `hwirq`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the pin is not part of this bank.
    pub fn sel_value(&self, hwirq: u32) -> u32 {
        debug_assert!(self.contains(hwirq));
        self.sel_base + (hwirq - self.first)
    }
}

/// The pin domain table: all banks of the device.
#[derive(Debug)]
pub struct BankTable {
    banks: Box<[PinBank]>,
}

impl BankTable {
    /// Builds the table from the device's bank description records.
    pub fn new(banks: Box<[PinBank]>) -> Self {
        Self { banks }
    }

    /// Resolves the bank a pin belongs to.
    pub fn find(&self, hwirq: u32) -> Option<&PinBank> {
        self.banks.iter().find(|bank| bank.contains(hwirq))
    }

    /// Returns the highest hardware interrupt number covered by any bank.
    ///
    /// Banks with no pins are ignored.
    pub fn last_pin(&self) -> u32 {
        self.banks
            .iter()
            .filter(|bank| bank.count > 0)
            .map(|bank| bank.first + bank.count - 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table() -> BankTable {
        BankTable::new(Box::new([
            PinBank {
                name: "gpiox",
                first: 0,
                count: 22,
                sel_base: 97,
            },
            PinBank {
                name: "gpioh",
                first: 96,
                count: 14,
                sel_base: 14,
            },
        ]))
    }

    #[test]
    fn pins_resolve_to_their_bank() {
        let table = table();
        assert_eq!(table.find(0).unwrap().name, "gpiox");
        assert_eq!(table.find(21).unwrap().name, "gpiox");
        assert!(table.find(22).is_none());
        assert_eq!(table.find(96).unwrap().name, "gpioh");
        assert_eq!(table.find(109).unwrap().name, "gpioh");
        assert!(table.find(110).is_none());
    }

    #[test]
    fn selection_encoding_is_bank_relative() {
        let table = table();
        // GPIOH_9 -> 23 in the selection register.
        assert_eq!(table.find(105).unwrap().sel_value(105), 23);
        // GPIOX_21 -> 118.
        assert_eq!(table.find(21).unwrap().sel_value(21), 118);
    }

    #[test]
    fn last_pin_spans_all_banks() {
        assert_eq!(table().last_pin(), 109);
    }

    #[test]
    fn last_pin_ignores_empty_banks() {
        let table = BankTable::new(Box::new([
            PinBank {
                name: "gpiox",
                first: 0,
                count: 22,
                sel_base: 97,
            },
            PinBank {
                name: "gpioz",
                first: 128,
                count: 0,
                sel_base: 0,
            },
        ]));
        assert_eq!(table.last_pin(), 21);
    }
}
