//! Feeder and phase direction flag sets.
//!
//! Both types are two-element sets. [`FeederDirection`] is {UPSTREAM,
//! DOWNSTREAM} and [`PhaseDirection`] is {IN, OUT}. `BOTH` is the full set.
//! `+` is set union and `-` is set difference.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Direction of a terminal relative to its feeder head.
///
/// # Examples
///
/// ```
/// use gridwalk_core::FeederDirection;
///
/// assert_eq!(FeederDirection::UPSTREAM + FeederDirection::DOWNSTREAM, FeederDirection::BOTH);
/// assert_eq!(FeederDirection::BOTH - FeederDirection::UPSTREAM, FeederDirection::DOWNSTREAM);
/// assert!(FeederDirection::BOTH.has(FeederDirection::UPSTREAM));
/// assert!(!FeederDirection::BOTH.has(FeederDirection::NONE));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FeederDirection {
    /// Not on a traced feeder path.
    #[default]
    None,
    /// Towards the feeder head.
    Upstream,
    /// Away from the feeder head.
    Downstream,
    /// Both ways, e.g. on a loop.
    Both,
}

impl FeederDirection {
    /// The empty set.
    pub const NONE: Self = FeederDirection::None;
    /// Towards the source.
    pub const UPSTREAM: Self = FeederDirection::Upstream;
    /// Away from the source.
    pub const DOWNSTREAM: Self = FeederDirection::Downstream;
    /// Both directions.
    pub const BOTH: Self = FeederDirection::Both;

    /// Two-bit representation: UPSTREAM = 1, DOWNSTREAM = 2.
    pub fn bits(self) -> u8 {
        match self {
            FeederDirection::None => 0,
            FeederDirection::Upstream => 1,
            FeederDirection::Downstream => 2,
            FeederDirection::Both => 3,
        }
    }

    /// Inverse of [`bits`](Self::bits). Only the low two bits are read.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            1 => FeederDirection::Upstream,
            2 => FeederDirection::Downstream,
            3 => FeederDirection::Both,
            _ => FeederDirection::None,
        }
    }

    /// Set union.
    pub fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    /// Set difference: the directions in `self` that are not in `other`.
    pub fn difference(self, other: Self) -> Self {
        Self::from_bits(self.bits() & !other.bits())
    }

    /// Containment test. `BOTH` contains every non-empty direction; any
    /// other value only contains itself. Nothing contains `NONE` except
    /// `NONE` itself.
    pub fn has(self, other: Self) -> bool {
        if self == FeederDirection::Both {
            other != FeederDirection::None
        } else {
            self == other
        }
    }

    /// Returns `true` for the empty set.
    pub fn is_none(self) -> bool {
        self == FeederDirection::None
    }
}

impl Add for FeederDirection {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl AddAssign for FeederDirection {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl Sub for FeederDirection {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl SubAssign for FeederDirection {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.difference(rhs);
    }
}

impl fmt::Display for FeederDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeederDirection::None => "NONE",
            FeederDirection::Upstream => "UPSTREAM",
            FeederDirection::Downstream => "DOWNSTREAM",
            FeederDirection::Both => "BOTH",
        };
        f.write_str(name)
    }
}

/// Direction of energy flow through a nominal phase slot of a terminal.
///
/// `In` means the phase is fed into the terminal from the connectivity node;
/// `Out` means it is fed out of the terminal into the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PhaseDirection {
    /// Not energised.
    #[default]
    None,
    /// Fed into the terminal.
    In,
    /// Fed out of the terminal.
    Out,
    /// Fed both ways.
    Both,
}

impl PhaseDirection {
    /// The empty set.
    pub const NONE: Self = PhaseDirection::None;
    /// Flowing in.
    pub const IN: Self = PhaseDirection::In;
    /// Flowing out.
    pub const OUT: Self = PhaseDirection::Out;
    /// Flowing both ways.
    pub const BOTH: Self = PhaseDirection::Both;

    /// Two-bit representation: IN = 1, OUT = 2.
    pub fn bits(self) -> u8 {
        match self {
            PhaseDirection::None => 0,
            PhaseDirection::In => 1,
            PhaseDirection::Out => 2,
            PhaseDirection::Both => 3,
        }
    }

    /// Inverse of [`bits`](Self::bits). Only the low two bits are read.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            1 => PhaseDirection::In,
            2 => PhaseDirection::Out,
            3 => PhaseDirection::Both,
            _ => PhaseDirection::None,
        }
    }

    /// Set union.
    pub fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits() | other.bits())
    }

    /// Set difference.
    pub fn difference(self, other: Self) -> Self {
        Self::from_bits(self.bits() & !other.bits())
    }

    /// Containment test with the same rules as [`FeederDirection::has`].
    pub fn has(self, other: Self) -> bool {
        if self == PhaseDirection::Both {
            other != PhaseDirection::None
        } else {
            self == other
        }
    }

    /// Returns `true` for the empty set.
    pub fn is_none(self) -> bool {
        self == PhaseDirection::None
    }
}

impl Add for PhaseDirection {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl AddAssign for PhaseDirection {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl Sub for PhaseDirection {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(rhs)
    }
}

impl SubAssign for PhaseDirection {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.difference(rhs);
    }
}

impl fmt::Display for PhaseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhaseDirection::None => "NONE",
            PhaseDirection::In => "IN",
            PhaseDirection::Out => "OUT",
            PhaseDirection::Both => "BOTH",
        };
        f.write_str(name)
    }
}
