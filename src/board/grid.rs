//! The 9x9 battle grid.
//!
//! Uses a flat fixed-size array indexed by `y * 9 + x` for O(1) lookup.
//! This avoids heap allocation and makes the board trivially copyable,
//! which the attack sweep exploits to work against a pre-resolution
//! snapshot.

use serde::{Deserialize, Serialize};

use super::unit::{Orientation, UnitStatus, UnitType};
use crate::ids::PlayerId;

/// Board edge length.
pub const BOARD_SIZE: u8 = 9;

/// Total number of cells.
pub const CELL_COUNT: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Aggressor deployment rows (inclusive), the bottom of the board.
pub const AGGRESSOR_ROWS: (u8, u8) = (7, 8);

/// Defender deployment rows (inclusive), the top of the board.
pub const DEFENDER_ROWS: (u8, u8) = (0, 1);

/// A unit standing on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedUnit {
    pub unit_type: UnitType,
    pub owner: PlayerId,
    pub orientation: Orientation,
    pub has_acted: bool,
    pub status: UnitStatus,
}

impl PlacedUnit {
    /// A freshly deployed unit: healthy, not yet acted.
    pub fn deployed(unit_type: UnitType, owner: PlayerId, orientation: Orientation) -> Self {
        PlacedUnit {
            unit_type,
            owner,
            orientation,
            has_acted: false,
            status: UnitStatus::Healthy,
        }
    }
}

/// The battle grid. Cells are addressed by (x, y) with y = 0 at the top
/// (the defender's edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Option<PlacedUnit>; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn empty() -> Self {
        Board {
            cells: [None; CELL_COUNT],
        }
    }

    /// Returns true if (x, y) lies on the board.
    pub const fn contains(x: u8, y: u8) -> bool {
        x < BOARD_SIZE && y < BOARD_SIZE
    }

    const fn index(x: u8, y: u8) -> usize {
        (y as usize) * (BOARD_SIZE as usize) + (x as usize)
    }

    /// Returns the unit at (x, y), if any. Out-of-bounds reads yield None.
    pub fn get(&self, x: u8, y: u8) -> Option<PlacedUnit> {
        if !Self::contains(x, y) {
            return None;
        }
        self.cells[Self::index(x, y)]
    }

    /// Mutable access to the unit at (x, y).
    pub fn get_mut(&mut self, x: u8, y: u8) -> Option<&mut PlacedUnit> {
        if !Self::contains(x, y) {
            return None;
        }
        self.cells[Self::index(x, y)].as_mut()
    }

    /// Writes a unit into (x, y), replacing whatever was there.
    pub fn put(&mut self, x: u8, y: u8, unit: PlacedUnit) {
        self.cells[Self::index(x, y)] = Some(unit);
    }

    /// Empties the cell at (x, y).
    pub fn clear(&mut self, x: u8, y: u8) {
        self.cells[Self::index(x, y)] = None;
    }

    /// Returns the cell directly ahead of (x, y) for a given facing, or
    /// None if it falls off the board edge.
    pub fn forward_of(x: u8, y: u8, orientation: Orientation) -> Option<(u8, u8)> {
        let (dx, dy) = orientation.forward();
        let tx = x as i16 + dx as i16;
        let ty = y as i16 + dy as i16;
        if tx < 0 || ty < 0 || tx >= BOARD_SIZE as i16 || ty >= BOARD_SIZE as i16 {
            return None;
        }
        Some((tx as u8, ty as u8))
    }

    /// Iterates occupied cells in row-major order, the order the attack
    /// sweep walks the board in.
    pub fn units(&self) -> impl Iterator<Item = (u8, u8, PlacedUnit)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|unit| {
                let x = (i % BOARD_SIZE as usize) as u8;
                let y = (i / BOARD_SIZE as usize) as u8;
                (x, y, unit)
            })
        })
    }

    /// Mutable row-major iteration over occupied cells.
    pub fn units_mut(&mut self) -> impl Iterator<Item = &mut PlacedUnit> + '_ {
        self.cells.iter_mut().filter_map(|cell| cell.as_mut())
    }

    /// The grid as rows of optional cells, for the visualizer and the
    /// persistence mirror.
    pub fn rows(&self) -> Vec<Vec<Option<PlacedUnit>>> {
        (0..BOARD_SIZE)
            .map(|y| (0..BOARD_SIZE).map(|x| self.get(x, y)).collect())
            .collect()
    }
}

/// Manhattan distance between two cells.
pub fn manhattan(from_x: u8, from_y: u8, to_x: u8, to_y: u8) -> u8 {
    from_x.abs_diff(to_x) + from_y.abs_diff(to_y)
}
