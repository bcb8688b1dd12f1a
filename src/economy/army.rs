//! Armies, unit stacks, and the recruitment table.
//!
//! An army is an ordered list of (unit type, count) stacks owned by one
//! player. Battles drain stacks in place during deployment; the roster
//! object and the battle see the same counts.

use serde::{Deserialize, Serialize};

use crate::board::UnitType;
use crate::economy::ResourceKind;
use crate::ids::{ArmyId, PlayerId};

/// Recruitment quantity is clamped to this range per modification.
pub const RECRUIT_QUANTITY_RANGE: (u32, u32) = (1, 50);

/// A roster entry pairing one unit type with a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStack {
    pub unit_type: UnitType,
    pub count: u32,
}

/// A player-owned roster of unit stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Army {
    pub id: ArmyId,
    pub owner: PlayerId,
    stacks: Vec<UnitStack>,
}

impl Army {
    /// The composition every new army starts with.
    pub fn starter(id: ArmyId, owner: PlayerId) -> Self {
        Army {
            id,
            owner,
            stacks: vec![
                UnitStack { unit_type: UnitType::Infantry, count: 5 },
                UnitStack { unit_type: UnitType::Commander, count: 1 },
            ],
        }
    }

    /// The stacks in roster order.
    pub fn stacks(&self) -> &[UnitStack] {
        &self.stacks
    }

    /// Total units across all stacks.
    pub fn unit_total(&self) -> u32 {
        self.stacks.iter().map(|s| s.count).sum()
    }

    /// Units of one type across all stacks.
    pub fn count_of(&self, unit_type: UnitType) -> u32 {
        self.stacks
            .iter()
            .filter(|s| s.unit_type == unit_type)
            .map(|s| s.count)
            .sum()
    }

    /// Removes one unit of `unit_type` from the first stack holding any.
    /// Returns false if no stack has units of that type left.
    pub fn take_unit(&mut self, unit_type: UnitType) -> bool {
        for stack in &mut self.stacks {
            if stack.unit_type == unit_type && stack.count > 0 {
                stack.count -= 1;
                return true;
            }
        }
        false
    }

    /// Merges units into an existing stack of the type, or appends a new
    /// stack at the end of the roster.
    pub fn add_units(&mut self, unit_type: UnitType, count: u32) {
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.unit_type == unit_type) {
            stack.count += count;
        } else {
            self.stacks.push(UnitStack { unit_type, count });
        }
    }
}

/// One line of the recruitment table: what a modification costs and how
/// many units it adds, before quantity scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recruitment {
    pub cost: &'static [(ResourceKind, u32)],
    pub unit_count: u32,
}

/// Returns the recruitment line for a unit type, or None for types that
/// cannot be recruited (infantry and commanders only arrive with new
/// armies).
pub const fn recruitment(unit_type: UnitType) -> Option<Recruitment> {
    match unit_type {
        UnitType::Shock => Some(Recruitment {
            cost: &[(ResourceKind::Bronze, 1)],
            unit_count: 3,
        }),
        UnitType::Archer => Some(Recruitment {
            cost: &[(ResourceKind::Timber, 1)],
            unit_count: 3,
        }),
        UnitType::Cavalry => Some(Recruitment {
            cost: &[(ResourceKind::Mounts, 1)],
            unit_count: 4,
        }),
        UnitType::Chariot => Some(Recruitment {
            cost: &[(ResourceKind::Mounts, 1)],
            unit_count: 2,
        }),
        UnitType::Infantry | UnitType::Commander => None,
    }
}
