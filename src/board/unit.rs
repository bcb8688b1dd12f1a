//! Unit types, facing, status, and the static unit catalog.
//!
//! The catalog is the single source of movement allowances, attack
//! capability, and the immunity matrix. The matrix is asymmetric: shock
//! troops shrug off commander blows, commanders do not shrug off shock.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a unit on the board or in a roster stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Infantry,
    Shock,
    Archer,
    Commander,
    Cavalry,
    Chariot,
}

/// All unit types, in catalog order.
pub const ALL_UNIT_TYPES: [UnitType; 6] = [
    UnitType::Infantry,
    UnitType::Shock,
    UnitType::Archer,
    UnitType::Commander,
    UnitType::Cavalry,
    UnitType::Chariot,
];

impl UnitType {
    /// Returns the lowercase canonical name used in messages and snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            UnitType::Infantry => "infantry",
            UnitType::Shock => "shock",
            UnitType::Archer => "archer",
            UnitType::Commander => "commander",
            UnitType::Cavalry => "cavalry",
            UnitType::Chariot => "chariot",
        }
    }

    /// Parses a canonical lowercase name. The command layer normalizes user
    /// text through this before anything reaches the core.
    pub fn from_name(s: &str) -> Option<UnitType> {
        match s {
            "infantry" => Some(UnitType::Infantry),
            "shock" => Some(UnitType::Shock),
            "archer" => Some(UnitType::Archer),
            "commander" => Some(UnitType::Commander),
            "cavalry" => Some(UnitType::Cavalry),
            "chariot" => Some(UnitType::Chariot),
            _ => None,
        }
    }

    /// Looks up the static combat properties for this unit type.
    pub const fn properties(self) -> UnitProperties {
        match self {
            UnitType::Infantry => UnitProperties {
                movement: 1,
                can_attack: true,
                cardinal_only: false,
                immune_to: &[],
                range: 0,
            },
            UnitType::Shock => UnitProperties {
                movement: 1,
                can_attack: true,
                cardinal_only: false,
                immune_to: &[UnitType::Infantry, UnitType::Cavalry, UnitType::Commander],
                range: 0,
            },
            // Archers declare a range of 3 but no resolution path uses it.
            // The forward-cell sweep is the only attack mechanism, and
            // archers cannot attack.
            UnitType::Archer => UnitProperties {
                movement: 1,
                can_attack: false,
                cardinal_only: true,
                immune_to: &[],
                range: 3,
            },
            UnitType::Commander => UnitProperties {
                movement: 1,
                can_attack: true,
                cardinal_only: false,
                immune_to: &[UnitType::Infantry, UnitType::Cavalry],
                range: 0,
            },
            UnitType::Cavalry => UnitProperties {
                movement: 3,
                can_attack: true,
                cardinal_only: false,
                immune_to: &[],
                range: 0,
            },
            UnitType::Chariot => UnitProperties {
                movement: 3,
                can_attack: true,
                cardinal_only: false,
                immune_to: &[],
                range: 0,
            },
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static per-type combat rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProperties {
    /// Maximum Manhattan distance per move action.
    pub movement: u8,
    /// Whether the unit participates in the forward-cell attack sweep.
    pub can_attack: bool,
    /// Whether moves with both dx != 0 and dy != 0 are rejected.
    pub cardinal_only: bool,
    /// Attacker types whose first hit only damages this unit.
    pub immune_to: &'static [UnitType],
    /// Declared ranged reach; unused by resolution (see module docs).
    pub range: u8,
}

impl UnitProperties {
    /// Returns true if attacks from `attacker` only damage on the first hit.
    pub fn is_immune_to(&self, attacker: UnitType) -> bool {
        self.immune_to.contains(&attacker)
    }
}

/// The direction a placed unit is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    /// Returns the cell offset of the tile directly ahead.
    ///
    /// North decreases y, so the defender's zone (rows 0-1) is "up".
    pub const fn forward(self) -> (i8, i8) {
        match self {
            Orientation::North => (0, -1),
            Orientation::East => (1, 0),
            Orientation::South => (0, 1),
            Orientation::West => (-1, 0),
        }
    }

    /// Parses a canonical lowercase name.
    pub fn from_name(s: &str) -> Option<Orientation> {
        match s {
            "north" => Some(Orientation::North),
            "east" => Some(Orientation::East),
            "south" => Some(Orientation::South),
            "west" => Some(Orientation::West),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Orientation::North => "north",
            Orientation::East => "east",
            Orientation::South => "south",
            Orientation::West => "west",
        };
        f.write_str(s)
    }
}

/// A placed unit's condition. Destroyed units leave the board immediately,
/// so there is no dead status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    Healthy,
    Damaged,
}
