//! The error taxonomy for all core operations.
//!
//! Every rule violation (wrong phase, wrong turn, illegal placement or
//! movement, missing entities, short resources) surfaces as an ordinary
//! `Err(GameError)` whose Display string is the user-facing message. Nothing
//! in the core panics across its boundary; collaborator (mirror) failures are
//! handled at the call site and never appear here.

use crate::battle::Phase;
use crate::board::UnitType;
use crate::economy::ResourceKind;
use crate::ids::{ArmyId, PlayerId, SessionId};

/// Result alias used by every fallible core operation.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while running a game session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("it is not the {expected} phase (current phase: {actual})")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("you can only place units in your deployment zone (rows {zone_lo}-{zone_hi})")]
    OutsideDeploymentZone { zone_lo: u8, zone_hi: u8 },

    #[error("coordinates ({x},{y}) are off the board")]
    OffBoard { x: u8, y: u8 },

    #[error("the tile at ({x},{y}) is already occupied")]
    TileOccupied { x: u8, y: u8 },

    #[error("there is no unit at ({x},{y})")]
    EmptyTile { x: u8, y: u8 },

    #[error("you do not own that unit")]
    NotYourUnit,

    #[error("that unit has already acted this turn")]
    AlreadyActed,

    #[error("{0} can only move in cardinal directions (not diagonally)")]
    CardinalOnly(UnitType),

    #[error("{unit_type} can only move {movement} tile(s), you tried to move {distance}")]
    MoveTooFar {
        unit_type: UnitType,
        movement: u8,
        distance: u8,
    },

    #[error("you do not have any available {0} units to place")]
    NoUnitsToPlace(UnitType),

    #[error("you are not a participant in this battle")]
    NotAParticipant,

    #[error("the battle has already ended")]
    BattleAlreadyEnded,

    #[error("the battle is not finished yet")]
    BattleNotFinished,

    #[error("a battle is already in progress in this war")]
    BattleInProgress,

    #[error("no active battle found")]
    NoActiveBattle,

    #[error("army #{0} not found")]
    ArmyNotFound(ArmyId),

    #[error("player {0} is not part of this game")]
    PlayerNotFound(PlayerId),

    #[error("no game found for session {0}")]
    SessionNotFound(SessionId),

    #[error("a game already exists for session {0}")]
    SessionExists(SessionId),

    #[error("{0} units cannot be recruited")]
    NotRecruitable(UnitType),

    #[error("not enough {resource}: required {required}, you have {available}")]
    InsufficientResource {
        resource: ResourceKind,
        required: u32,
        available: u32,
    },

    #[error("{0} cannot be spawned from tiles")]
    NotSpawnable(ResourceKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = GameError::MoveTooFar {
            unit_type: UnitType::Infantry,
            movement: 1,
            distance: 3,
        };
        assert_eq!(
            err.to_string(),
            "infantry can only move 1 tile(s), you tried to move 3"
        );

        let err = GameError::InsufficientResource {
            resource: ResourceKind::Bronze,
            required: 4,
            available: 1,
        };
        assert_eq!(err.to_string(), "not enough bronze: required 4, you have 1");
    }

    #[test]
    fn wrong_phase_names_both_phases() {
        let err = GameError::WrongPhase {
            expected: Phase::Battle,
            actual: Phase::Placement,
        };
        assert_eq!(
            err.to_string(),
            "it is not the battle phase (current phase: placement)"
        );
    }
}
