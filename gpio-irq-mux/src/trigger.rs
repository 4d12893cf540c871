// SPDX-License-Identifier: MPL-2.0

use crate::error::{Errno, Error};

/// The trigger type of an interrupt line.
///
/// The discriminants match the interrupt-specifier cells of the device-tree
/// binding, so a raw specifier converts with [`TryFrom<u32>`]. The hardware
/// has no both-edges mode; the encoding `3` is rejected at this boundary
/// rather than silently mis-programmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TriggerType {
    /// Rising-edge triggered.
    EdgeRising = 1,
    /// Falling-edge triggered.
    EdgeFalling = 2,
    /// Level triggered, active high.
    LevelHigh = 4,
    /// Level triggered, active low.
    LevelLow = 8,
}

impl TriggerType {
    /// Returns `true` for the edge-triggered types.
    pub fn is_edge(self) -> bool {
        matches!(self, TriggerType::EdgeRising | TriggerType::EdgeFalling)
    }

    /// Returns `true` for the inverted-polarity types (falling edge or
    /// active-low level).
    pub fn is_inverted(self) -> bool {
        matches!(self, TriggerType::EdgeFalling | TriggerType::LevelLow)
    }

    /// Returns the trigger type the parent controller must be configured
    /// with when this type is programmed into the multiplexer.
    ///
    /// The mux inverts the polarity of falling-edge and active-low signals
    /// before they reach the parent, so the parent must always be given the
    /// non-inverted sense.
    pub fn normalized_for_parent(self) -> Self {
        match self {
            TriggerType::EdgeFalling => TriggerType::EdgeRising,
            TriggerType::LevelLow => TriggerType::LevelHigh,
            other => other,
        }
    }
}

impl TryFrom<u32> for TriggerType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        match value {
            1 => Ok(TriggerType::EdgeRising),
            2 => Ok(TriggerType::EdgeFalling),
            4 => Ok(TriggerType::LevelHigh),
            8 => Ok(TriggerType::LevelLow),
            _ => Err(Error::with_msg(
                Errno::InvalidArgs,
                "unsupported trigger type",
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn specifier_conversion() {
        assert_eq!(TriggerType::try_from(1), Ok(TriggerType::EdgeRising));
        assert_eq!(TriggerType::try_from(2), Ok(TriggerType::EdgeFalling));
        assert_eq!(TriggerType::try_from(4), Ok(TriggerType::LevelHigh));
        assert_eq!(TriggerType::try_from(8), Ok(TriggerType::LevelLow));
        // Both-edges and garbage encodings are rejected.
        assert_eq!(TriggerType::try_from(3).unwrap_err().errno(), Errno::InvalidArgs);
        assert_eq!(TriggerType::try_from(0).unwrap_err().errno(), Errno::InvalidArgs);
    }

    #[test]
    fn normalization_strips_the_inverted_sense() {
        assert_eq!(
            TriggerType::LevelLow.normalized_for_parent(),
            TriggerType::LevelHigh
        );
        assert_eq!(
            TriggerType::EdgeFalling.normalized_for_parent(),
            TriggerType::EdgeRising
        );
        assert_eq!(
            TriggerType::EdgeRising.normalized_for_parent(),
            TriggerType::EdgeRising
        );
        assert_eq!(
            TriggerType::LevelHigh.normalized_for_parent(),
            TriggerType::LevelHigh
        );
    }
}
