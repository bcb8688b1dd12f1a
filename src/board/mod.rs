//! Board representation and unit rules.
//!
//! Contains the static unit catalog (movement, attack capability, the
//! immunity matrix) and the 9x9 grid the battle is fought on.

pub mod grid;
pub mod unit;

pub use grid::{
    manhattan, Board, PlacedUnit, AGGRESSOR_ROWS, BOARD_SIZE, CELL_COUNT, DEFENDER_ROWS,
};
pub use unit::{Orientation, UnitProperties, UnitStatus, UnitType, ALL_UNIT_TYPES};
