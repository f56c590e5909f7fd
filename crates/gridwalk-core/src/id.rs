//! Strongly-typed arena identifiers.
//!
//! The network model stores terminals, equipment, connectivity nodes and
//! feeders in flat arenas. These IDs are the arena indices, so holding one
//! never keeps any part of the network alive.

use std::fmt;

/// Identifies a terminal within a network arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalId(pub u32);

impl TerminalId {
    /// Arena slot for this ID.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TerminalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TerminalId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a piece of conducting equipment within a network arena.
///
/// Equipment identity is by ID: two `EquipmentId`s are the same equipment
/// exactly when they compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EquipmentId(pub u32);

impl EquipmentId {
    /// Arena slot for this ID.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EquipmentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a connectivity node (a zero-impedance junction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Arena slot for this ID.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a feeder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeederId(pub u32);

impl FeederId {
    /// Arena slot for this ID.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FeederId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FeederId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
