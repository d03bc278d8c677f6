//! Arena identifiers for flowsheet streams and units.

use core::fmt;
use core::num::NonZeroU32;

/// Slot identifier into a flowsheet arena.
///
/// Wraps `NonZeroU32` so `Option<Id>` is the same size as `Id`; the
/// producer column of the stream table stays at four bytes per entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(NonZeroU32);

impl Id {
    /// Id for the 0-based arena slot `index`.
    pub fn from_index(index: u32) -> Self {
        // Stored off by one so slot 0 stays representable in the niche.
        Self(NonZeroU32::new(index + 1).expect("id index overflow"))
    }

    /// 0-based arena slot.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Identifies a stream (flowsheet edge).
pub type StreamId = Id;
/// Identifies a unit operation (flowsheet node).
pub type UnitId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_survives_the_round_trip() {
        for i in [0_u32, 1, 7, 4096] {
            assert_eq!(Id::from_index(i).index(), i);
        }
    }

    #[test]
    fn option_uses_the_niche() {
        assert_eq!(
            core::mem::size_of::<Option<Id>>(),
            core::mem::size_of::<Id>()
        );
    }

    #[test]
    fn ids_order_by_index() {
        assert!(Id::from_index(1) < Id::from_index(2));
    }
}
