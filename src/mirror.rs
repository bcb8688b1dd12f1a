//! Best-effort persistence mirroring.
//!
//! The core pushes army and battle snapshots to an external mirror (a
//! spreadsheet, a database, anything) after mutations. Mirroring never
//! affects game state: failures are logged at the call site and swallowed,
//! and no core operation waits on or rolls back for a mirror.

use serde::{Deserialize, Serialize};

use crate::battle::{Battle, Phase};
use crate::board::PlacedUnit;
use crate::economy::Army;
use crate::ids::{ArmyId, PlayerId};

/// Point-in-time view of a battle for the mirror.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub aggressor: PlayerId,
    pub defender: PlayerId,
    pub aggressor_army: ArmyId,
    pub defender_army: ArmyId,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub winner: Option<PlayerId>,
    /// The 9x9 grid as rows of optional cells.
    pub board: Vec<Vec<Option<PlacedUnit>>>,
}

impl BattleSnapshot {
    /// Captures the battle's current state.
    pub fn of(battle: &Battle) -> Self {
        let (aggressor_army, defender_army) = battle.participants();
        BattleSnapshot {
            aggressor: battle.aggressor(),
            defender: battle.defender(),
            aggressor_army,
            defender_army,
            phase: battle.phase(),
            current_player: battle.current_player(),
            winner: battle.winner(),
            board: battle.board().rows(),
        }
    }
}

/// External persistence mirror. Implementations live outside the core and
/// may fail for any reason; the core treats every failure as ignorable.
pub trait StateMirror: Send + Sync {
    fn sync_army(&self, army: &Army) -> anyhow::Result<()>;
    fn sync_battle(&self, snapshot: &BattleSnapshot) -> anyhow::Result<()>;
}

/// A mirror that records nothing. Used when no persistence is configured
/// and throughout the test suites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMirror;

impl StateMirror for NullMirror {
    fn sync_army(&self, _army: &Army) -> anyhow::Result<()> {
        Ok(())
    }

    fn sync_battle(&self, _snapshot: &BattleSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::UnitType;

    #[test]
    fn snapshot_captures_board_and_phase() {
        let battle = Battle::new(PlayerId(1), PlayerId(2), ArmyId(1), ArmyId(1), 12);
        let snapshot = BattleSnapshot::of(&battle);
        assert_eq!(snapshot.phase, Phase::Placement);
        assert_eq!(snapshot.current_player, PlayerId(1));
        assert_eq!(snapshot.winner, None);
        assert_eq!(snapshot.board.len(), 9);
        assert!(snapshot.board.iter().all(|row| row.len() == 9));
    }

    #[test]
    fn snapshot_serializes_with_stable_field_names() {
        let battle = Battle::new(PlayerId(1), PlayerId(2), ArmyId(3), ArmyId(1), 12);
        let json = serde_json::to_value(BattleSnapshot::of(&battle)).unwrap();
        assert_eq!(json["phase"], "placement");
        assert_eq!(json["aggressor_army"], 3);
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["board"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn null_mirror_accepts_everything() {
        let mirror = NullMirror;
        let army = Army::starter(ArmyId(1), PlayerId(1));
        assert!(mirror.sync_army(&army).is_ok());

        let battle = Battle::new(PlayerId(1), PlayerId(2), ArmyId(1), ArmyId(1), 12);
        assert!(mirror.sync_battle(&BattleSnapshot::of(&battle)).is_ok());
        assert_eq!(army.count_of(UnitType::Infantry), 5);
    }
}
