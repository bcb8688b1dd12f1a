//! End-of-turn attack resolution and win-condition evaluation.
//!
//! Attacks are simultaneous: every qualifying hit in a sweep is computed
//! before any removal is applied, so two units facing each other both land
//! their blows and both die in the same sweep. Status changes (healthy to
//! damaged) do land during the sweep, which means two attackers striking
//! the same immune defender in one sweep will damage and then destroy it.

use serde::{Deserialize, Serialize};

use super::Battle;
use crate::board::{Board, UnitStatus, UnitType};
use crate::ids::PlayerId;

/// Why a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryReason {
    /// The losing side's commander left the board.
    CommanderFallen,
    /// The losing side has no units left.
    Annihilation,
    /// Both sides are down to a lone commander; the defender prevails.
    Stalemate,
    /// The losing side conceded.
    Forfeit,
}

/// A decided battle: who won and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEnd {
    pub winner: PlayerId,
    pub reason: VictoryReason,
}

/// Runs one attack sweep over the board and applies the removals.
///
/// The sweep walks the board row-major. Every unit whose type can attack
/// strikes the single cell directly ahead of its facing; if that cell holds
/// an enemy, the enemy is destroyed, unless the defender is immune to the
/// attacker's type, in which case the first hit flips it to damaged and
/// only a hit on an already-damaged unit destroys it. Removals are
/// collected against the pre-sweep occupancy and applied at the end.
pub fn resolve_attacks(board: &mut Board) {
    let snapshot = *board;
    let mut destroyed: Vec<(u8, u8)> = Vec::new();

    for (x, y, attacker) in snapshot.units() {
        if !attacker.unit_type.properties().can_attack {
            continue;
        }
        let Some((tx, ty)) = Board::forward_of(x, y, attacker.orientation) else {
            continue;
        };
        let Some(target) = board.get(tx, ty) else {
            continue;
        };
        if target.owner == attacker.owner {
            continue;
        }

        if target.unit_type.properties().is_immune_to(attacker.unit_type) {
            if target.status == UnitStatus::Damaged {
                destroyed.push((tx, ty));
            } else if let Some(t) = board.get_mut(tx, ty) {
                t.status = UnitStatus::Damaged;
            }
        } else {
            destroyed.push((tx, ty));
        }
    }

    for (x, y) in destroyed {
        board.clear(x, y);
    }
}

/// Evaluates the win conditions, in priority order:
///
/// 1. Aggressor's commander absent: defender wins.
/// 2. Defender's commander absent: aggressor wins.
/// 3. Aggressor has no units: defender wins.
/// 4. Defender has no units: aggressor wins.
/// 5. One unit each and both are commanders: the defender wins the
///    stalemate. This tie-break is intentionally one-sided.
///
/// Returns None while the battle is still live.
pub fn check_battle_end(battle: &Battle) -> Option<BattleEnd> {
    let mut aggressor_units = 0u32;
    let mut defender_units = 0u32;
    let mut aggressor_commander = false;
    let mut defender_commander = false;

    for (_, _, unit) in battle.board.units() {
        if unit.owner == battle.aggressor {
            aggressor_units += 1;
            if unit.unit_type == UnitType::Commander {
                aggressor_commander = true;
            }
        } else if unit.owner == battle.defender {
            defender_units += 1;
            if unit.unit_type == UnitType::Commander {
                defender_commander = true;
            }
        }
    }

    if !aggressor_commander {
        return Some(BattleEnd {
            winner: battle.defender,
            reason: VictoryReason::CommanderFallen,
        });
    }
    if !defender_commander {
        return Some(BattleEnd {
            winner: battle.aggressor,
            reason: VictoryReason::CommanderFallen,
        });
    }
    if aggressor_units == 0 {
        return Some(BattleEnd {
            winner: battle.defender,
            reason: VictoryReason::Annihilation,
        });
    }
    if defender_units == 0 {
        return Some(BattleEnd {
            winner: battle.aggressor,
            reason: VictoryReason::Annihilation,
        });
    }
    if aggressor_units == 1 && defender_units == 1 {
        // Both lone survivors are necessarily the commanders here.
        return Some(BattleEnd {
            winner: battle.defender,
            reason: VictoryReason::Stalemate,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Phase, TurnOutcome};
    use crate::board::{Orientation, PlacedUnit};
    use crate::ids::ArmyId;

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn unit(t: UnitType, owner: PlayerId, facing: Orientation) -> PlacedUnit {
        PlacedUnit::deployed(t, owner, facing)
    }

    #[test]
    fn attacker_destroys_enemy_directly_ahead() {
        let mut board = Board::empty();
        board.put(4, 4, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Infantry, P2, Orientation::East));

        resolve_attacks(&mut board);
        assert_eq!(board.get(4, 3), None);
        assert!(board.get(4, 4).is_some());
    }

    #[test]
    fn no_attack_on_friendly_or_empty_forward_cell() {
        let mut board = Board::empty();
        board.put(4, 4, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(0, 0, unit(UnitType::Infantry, P2, Orientation::North));

        resolve_attacks(&mut board);
        // Friendly ahead, nothing ahead, and the edge-facing unit all survive.
        assert_eq!(board.units().count(), 3);
    }

    #[test]
    fn archers_never_attack() {
        let mut board = Board::empty();
        board.put(4, 4, unit(UnitType::Archer, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Infantry, P2, Orientation::East));

        resolve_attacks(&mut board);
        assert!(board.get(4, 3).is_some());
    }

    #[test]
    fn mutual_attacks_destroy_both_sides() {
        let mut board = Board::empty();
        board.put(4, 4, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Infantry, P2, Orientation::South));

        resolve_attacks(&mut board);
        assert_eq!(board.units().count(), 0);
    }

    #[test]
    fn immune_defender_is_damaged_first_then_destroyed() {
        let mut board = Board::empty();
        // Shock is immune to infantry.
        board.put(4, 4, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Shock, P2, Orientation::East));

        resolve_attacks(&mut board);
        let shock = board.get(4, 3).expect("shock survives the first hit");
        assert_eq!(shock.status, UnitStatus::Damaged);

        resolve_attacks(&mut board);
        assert_eq!(board.get(4, 3), None);
    }

    #[test]
    fn non_immune_attacker_bypasses_immunity() {
        let mut board = Board::empty();
        // Shock is not immune to shock.
        board.put(4, 4, unit(UnitType::Shock, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Shock, P2, Orientation::East));

        resolve_attacks(&mut board);
        assert_eq!(board.get(4, 3), None);
    }

    #[test]
    fn two_attackers_finish_an_immune_defender_in_one_sweep() {
        let mut board = Board::empty();
        // Two infantry both strike the shock: the first hit damages it,
        // the second sees it damaged and destroys it.
        board.put(4, 4, unit(UnitType::Shock, P2, Orientation::North));
        board.put(4, 5, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(3, 4, unit(UnitType::Infantry, P1, Orientation::East));

        resolve_attacks(&mut board);
        assert_eq!(board.get(4, 4), None);
    }

    fn battle_with_board(board: Board) -> Battle {
        let mut battle = Battle::new(P1, P2, ArmyId(1), ArmyId(1), 0);
        *battle.board_mut() = board;
        battle
    }

    #[test]
    fn commander_loss_beats_unit_counts() {
        let mut board = Board::empty();
        // Aggressor still has more units, but no commander.
        board.put(0, 8, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(1, 8, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(0, 0, unit(UnitType::Commander, P2, Orientation::South));

        let end = check_battle_end(&battle_with_board(board)).unwrap();
        assert_eq!(end.winner, P2);
        assert_eq!(end.reason, VictoryReason::CommanderFallen);
    }

    #[test]
    fn defender_commander_loss_gives_aggressor_the_win() {
        let mut board = Board::empty();
        board.put(0, 8, unit(UnitType::Commander, P1, Orientation::North));
        board.put(0, 0, unit(UnitType::Infantry, P2, Orientation::South));

        let end = check_battle_end(&battle_with_board(board)).unwrap();
        assert_eq!(end.winner, P1);
        assert_eq!(end.reason, VictoryReason::CommanderFallen);
    }

    #[test]
    fn lone_commanders_stalemate_favors_the_defender() {
        let mut board = Board::empty();
        board.put(0, 8, unit(UnitType::Commander, P1, Orientation::North));
        board.put(0, 0, unit(UnitType::Commander, P2, Orientation::South));

        let end = check_battle_end(&battle_with_board(board)).unwrap();
        assert_eq!(end.winner, P2);
        assert_eq!(end.reason, VictoryReason::Stalemate);
    }

    #[test]
    fn battle_continues_while_both_sides_have_escorts() {
        let mut board = Board::empty();
        board.put(0, 8, unit(UnitType::Commander, P1, Orientation::North));
        board.put(1, 8, unit(UnitType::Infantry, P1, Orientation::North));
        board.put(0, 0, unit(UnitType::Commander, P2, Orientation::South));
        board.put(1, 0, unit(UnitType::Infantry, P2, Orientation::South));

        assert_eq!(check_battle_end(&battle_with_board(board)), None);
    }

    #[test]
    fn end_turn_reports_battle_end_and_freezes_the_state() {
        let mut board = Board::empty();
        // P1's shock faces P2's commander (no immunity there); P2 keeps a
        // second unit so the kill is decided by commander loss, not
        // annihilation.
        board.put(4, 4, unit(UnitType::Shock, P1, Orientation::North));
        board.put(0, 8, unit(UnitType::Commander, P1, Orientation::North));
        board.put(4, 3, unit(UnitType::Commander, P2, Orientation::East));
        board.put(0, 0, unit(UnitType::Infantry, P2, Orientation::South));

        let mut battle = battle_with_board(board);
        // Force the battle phase; placement is bypassed in this setup.
        battle.phase = Phase::Battle;

        match battle.end_turn(P1).unwrap() {
            TurnOutcome::BattleEnded(end) => {
                assert_eq!(end.winner, P1);
                assert_eq!(end.reason, VictoryReason::CommanderFallen);
            }
            other => panic!("expected a decided battle, got {:?}", other),
        }
        assert_eq!(battle.phase(), Phase::Ended);
        assert_eq!(battle.winner(), Some(P1));
    }
}
