//! The battle state machine.
//!
//! One `Battle` runs a single fight between two armies: the placement
//! phase (alternating deployment into each side's zone), the battle phase
//! (move/turn actions followed by an end-of-turn attack sweep), and the
//! ended state with a recorded winner. Attack resolution and win-condition
//! evaluation live in [`resolve`].

pub mod resolve;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{manhattan, Board, Orientation, PlacedUnit, UnitType, AGGRESSOR_ROWS, DEFENDER_ROWS};
use crate::economy::Army;
use crate::error::{GameError, GameResult};
use crate::ids::{ArmyId, PlayerId};

pub use resolve::{BattleEnd, VictoryReason};

/// The battle's lifecycle phase.
///
/// `Rally` is declared by the rules but no transition reaches it; it is
/// reserved for a future recovery phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Placement,
    Battle,
    Rally,
    Ended,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Placement => "placement",
            Phase::Battle => "battle",
            Phase::Rally => "rally",
            Phase::Ended => "ended",
        };
        f.write_str(s)
    }
}

/// Which of the two combatants a player is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Aggressor,
    Defender,
}

/// Result of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOutcome {
    /// Phase after the placement (flips to Battle on the final unit).
    pub phase: Phase,
    /// Whose turn it is next.
    pub next_player: PlayerId,
}

/// Result of a successful end-of-turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Attacks resolved, play passes to the other side.
    TurnPassed { next_player: PlayerId },
    /// Attacks resolved and a win condition fired.
    BattleEnded(BattleEnd),
}

/// A single fight between two armies on the 9x9 grid.
///
/// The battle records the participating armies by id only; the armies stay
/// in their owners' rosters and are drained in place as units deploy.
/// Placement is a permanent transfer, not a copy: units that leave a stack
/// never return to it, whatever the battle's outcome.
#[derive(Debug, Clone)]
pub struct Battle {
    aggressor: PlayerId,
    defender: PlayerId,
    aggressor_army: ArmyId,
    defender_army: ArmyId,
    board: Board,
    phase: Phase,
    current_player: PlayerId,
    placed: u32,
    total_unit_count: u32,
    winner: Option<PlayerId>,
}

impl Battle {
    /// Opens a battle in the placement phase with the aggressor to act.
    ///
    /// `total_unit_count` is the combined unit count of both armies at the
    /// moment the battle starts; once that many placements have happened
    /// the battle phase begins.
    pub fn new(
        aggressor: PlayerId,
        defender: PlayerId,
        aggressor_army: ArmyId,
        defender_army: ArmyId,
        total_unit_count: u32,
    ) -> Self {
        Battle {
            aggressor,
            defender,
            aggressor_army,
            defender_army,
            board: Board::empty(),
            phase: Phase::Placement,
            current_player: aggressor,
            placed: 0,
            total_unit_count,
            winner: None,
        }
    }

    pub fn aggressor(&self) -> PlayerId {
        self.aggressor
    }

    pub fn defender(&self) -> PlayerId {
        self.defender
    }

    /// The participating army ids as (aggressor's, defender's).
    pub fn participants(&self) -> (ArmyId, ArmyId) {
        (self.aggressor_army, self.defender_army)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn total_unit_count(&self) -> u32 {
        self.total_unit_count
    }

    /// The recorded winner once the battle has ended.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Read-only view of the grid for the visualizer and snapshots.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns which side a player fights on, or None for outsiders.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if player == self.aggressor {
            Some(Side::Aggressor)
        } else if player == self.defender {
            Some(Side::Defender)
        } else {
            None
        }
    }

    /// The participating army id belonging to `player`.
    pub fn army_of(&self, player: PlayerId) -> Option<ArmyId> {
        match self.side_of(player)? {
            Side::Aggressor => Some(self.aggressor_army),
            Side::Defender => Some(self.defender_army),
        }
    }

    fn require_phase(&self, expected: Phase) -> GameResult<()> {
        if self.phase != expected {
            return Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    fn require_turn(&self, player: PlayerId) -> GameResult<()> {
        if self.current_player != player {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Phase and turn checks in the order every action applies them, for
    /// callers that must validate before fetching collaborators.
    pub(crate) fn guard(&self, expected: Phase, player: PlayerId) -> GameResult<()> {
        self.require_phase(expected)?;
        self.require_turn(player)
    }

    fn other_player(&self, player: PlayerId) -> PlayerId {
        if player == self.aggressor {
            self.defender
        } else {
            self.aggressor
        }
    }

    /// Deploys one unit from `army` onto (x, y).
    ///
    /// `army` must be the current player's participating army; the unit is
    /// drawn from its first stack of `unit_type` with units remaining. When
    /// the last outstanding unit is placed the phase flips to Battle and
    /// the aggressor acts first; otherwise the turn alternates.
    pub fn place_unit(
        &mut self,
        player: PlayerId,
        army: &mut Army,
        unit_type: UnitType,
        x: u8,
        y: u8,
        orientation: Option<Orientation>,
    ) -> GameResult<PlaceOutcome> {
        self.require_phase(Phase::Placement)?;
        self.require_turn(player)?;

        let (zone_lo, zone_hi) = if player == self.aggressor {
            AGGRESSOR_ROWS
        } else {
            DEFENDER_ROWS
        };
        if y < zone_lo || y > zone_hi || x >= crate::board::BOARD_SIZE {
            return Err(GameError::OutsideDeploymentZone { zone_lo, zone_hi });
        }

        if self.board.get(x, y).is_some() {
            return Err(GameError::TileOccupied { x, y });
        }

        if !army.take_unit(unit_type) {
            return Err(GameError::NoUnitsToPlace(unit_type));
        }

        let orientation = orientation.unwrap_or(Orientation::North);
        self.board
            .put(x, y, PlacedUnit::deployed(unit_type, player, orientation));
        self.placed += 1;

        if self.placed >= self.total_unit_count {
            self.phase = Phase::Battle;
            self.current_player = self.aggressor;
        } else {
            self.current_player = self.other_player(self.current_player);
        }

        Ok(PlaceOutcome {
            phase: self.phase,
            next_player: self.current_player,
        })
    }

    /// Relocates one of the current player's units.
    ///
    /// Movement is a teleport within the unit's Manhattan allowance: no
    /// blocking by intervening units and no terrain cost. Cardinal-only
    /// units reject any move that changes both axes.
    pub fn move_unit(
        &mut self,
        player: PlayerId,
        from_x: u8,
        from_y: u8,
        to_x: u8,
        to_y: u8,
    ) -> GameResult<()> {
        self.require_phase(Phase::Battle)?;
        self.require_turn(player)?;

        if !Board::contains(to_x, to_y) {
            return Err(GameError::OffBoard { x: to_x, y: to_y });
        }

        let unit = self
            .board
            .get(from_x, from_y)
            .ok_or(GameError::EmptyTile { x: from_x, y: from_y })?;
        if unit.owner != player {
            return Err(GameError::NotYourUnit);
        }
        if unit.has_acted {
            return Err(GameError::AlreadyActed);
        }

        let props = unit.unit_type.properties();
        let distance = manhattan(from_x, from_y, to_x, to_y);
        if props.cardinal_only && from_x != to_x && from_y != to_y {
            return Err(GameError::CardinalOnly(unit.unit_type));
        }
        if distance > props.movement {
            return Err(GameError::MoveTooFar {
                unit_type: unit.unit_type,
                movement: props.movement,
                distance,
            });
        }

        let mut moved = unit;
        moved.has_acted = true;
        self.board.clear(from_x, from_y);
        self.board.put(to_x, to_y, moved);
        Ok(())
    }

    /// Rotates one of the current player's units in place.
    pub fn turn_unit(
        &mut self,
        player: PlayerId,
        x: u8,
        y: u8,
        orientation: Orientation,
    ) -> GameResult<()> {
        self.require_phase(Phase::Battle)?;
        self.require_turn(player)?;

        let unit = self
            .board
            .get_mut(x, y)
            .ok_or(GameError::EmptyTile { x, y })?;
        if unit.owner != player {
            return Err(GameError::NotYourUnit);
        }
        if unit.has_acted {
            return Err(GameError::AlreadyActed);
        }

        unit.orientation = orientation;
        unit.has_acted = true;
        Ok(())
    }

    /// Ends the current player's turn: resolves the attack sweep, applies
    /// removals, evaluates win conditions, and either ends the battle or
    /// passes play to the other side (clearing only that side's acted
    /// flags).
    pub fn end_turn(&mut self, player: PlayerId) -> GameResult<TurnOutcome> {
        self.require_phase(Phase::Battle)?;
        self.require_turn(player)?;

        resolve::resolve_attacks(&mut self.board);

        if let Some(end) = resolve::check_battle_end(self) {
            self.phase = Phase::Ended;
            self.winner = Some(end.winner);
            return Ok(TurnOutcome::BattleEnded(end));
        }

        self.current_player = self.other_player(self.current_player);
        let next = self.current_player;
        for unit in self.board.units_mut() {
            if unit.owner == next {
                unit.has_acted = false;
            }
        }
        Ok(TurnOutcome::TurnPassed { next_player: next })
    }

    /// Concedes the battle. Legal in any phase before Ended; the other
    /// participant wins immediately.
    pub fn forfeit(&mut self, player: PlayerId) -> GameResult<BattleEnd> {
        if self.phase == Phase::Ended {
            return Err(GameError::BattleAlreadyEnded);
        }
        let winner = match self.side_of(player) {
            Some(Side::Aggressor) => self.defender,
            Some(Side::Defender) => self.aggressor,
            None => return Err(GameError::NotAParticipant),
        };
        self.phase = Phase::Ended;
        self.winner = Some(winner);
        Ok(BattleEnd {
            winner,
            reason: VictoryReason::Forfeit,
        })
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}
