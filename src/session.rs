//! One war between two players.
//!
//! A `GameSession` owns both players' rosters and ledgers and at most one
//! active battle. Battle operations route through the session so the
//! roster army backing a placement can be drained in place and so
//! mutations can be mirrored to persistence. A session is not internally
//! synchronized; the registry wraps each one in a mutex.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::battle::{Battle, BattleEnd, Phase, PlaceOutcome, TurnOutcome};
use crate::board::{Orientation, UnitType};
use crate::economy::{recruitment, Army, FoodProjection, ResourceKind, ResourceLedger, RECRUIT_QUANTITY_RANGE};
use crate::error::{GameError, GameResult};
use crate::ids::{ArmyId, PlayerId};
use crate::mirror::{BattleSnapshot, NullMirror, StateMirror};

/// A persistent war between an aggressor and a defender.
pub struct GameSession {
    aggressor: PlayerId,
    defender: PlayerId,
    armies: HashMap<PlayerId, Vec<Army>>,
    resources: HashMap<PlayerId, ResourceLedger>,
    battle: Option<Battle>,
    mirror: Arc<dyn StateMirror>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("aggressor", &self.aggressor)
            .field("defender", &self.defender)
            .field("armies", &self.armies)
            .field("resources", &self.resources)
            .field("battle", &self.battle)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Opens a war: empty rosters, starting resource allocations, no
    /// battle.
    pub fn new(aggressor: PlayerId, defender: PlayerId, mirror: Arc<dyn StateMirror>) -> Self {
        let armies = HashMap::from([(aggressor, Vec::new()), (defender, Vec::new())]);
        let resources = HashMap::from([
            (aggressor, ResourceLedger::new()),
            (defender, ResourceLedger::new()),
        ]);
        GameSession {
            aggressor,
            defender,
            armies,
            resources,
            battle: None,
            mirror,
        }
    }

    /// A session with no persistence configured.
    pub fn unmirrored(aggressor: PlayerId, defender: PlayerId) -> Self {
        Self::new(aggressor, defender, Arc::new(NullMirror))
    }

    pub fn aggressor(&self) -> PlayerId {
        self.aggressor
    }

    pub fn defender(&self) -> PlayerId {
        self.defender
    }

    /// The active battle, if one is running.
    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    fn roster(&self, player: PlayerId) -> GameResult<&Vec<Army>> {
        self.armies
            .get(&player)
            .ok_or(GameError::PlayerNotFound(player))
    }

    fn roster_mut(&mut self, player: PlayerId) -> GameResult<&mut Vec<Army>> {
        self.armies
            .get_mut(&player)
            .ok_or(GameError::PlayerNotFound(player))
    }

    fn ledger_mut(&mut self, player: PlayerId) -> GameResult<&mut ResourceLedger> {
        self.resources
            .get_mut(&player)
            .ok_or(GameError::PlayerNotFound(player))
    }

    /// Fire-and-forget army sync; failures are logged and ignored.
    fn mirror_army(&self, army: &Army) {
        if let Err(err) = self.mirror.sync_army(army) {
            warn!(army = %army.id, owner = %army.owner, error = %err, "army mirror sync failed");
        }
    }

    /// Fire-and-forget battle sync; failures are logged and ignored.
    fn mirror_battle(&self, snapshot: &BattleSnapshot) {
        if let Err(err) = self.mirror.sync_battle(snapshot) {
            warn!(error = %err, "battle mirror sync failed");
        }
    }

    // ------------------------------------------------------------------
    // Rosters
    // ------------------------------------------------------------------

    /// A player's armies, in creation order.
    pub fn armies(&self, player: PlayerId) -> GameResult<&[Army]> {
        Ok(self.roster(player)?.as_slice())
    }

    /// Raises a fresh starter army (5 infantry, 1 commander). The id is
    /// the roster length plus one, so ids can repeat after a disband.
    pub fn add_army(&mut self, player: PlayerId) -> GameResult<Army> {
        let roster = self.roster_mut(player)?;
        let id = ArmyId(roster.len() as u32 + 1);
        let army = Army::starter(id, player);
        roster.push(army.clone());
        self.mirror_army(&army);
        Ok(army)
    }

    /// Removes an army from the roster by id.
    pub fn disband_army(&mut self, player: PlayerId, army_id: ArmyId) -> GameResult<()> {
        let roster = self.roster_mut(player)?;
        let index = roster
            .iter()
            .position(|a| a.id == army_id)
            .ok_or(GameError::ArmyNotFound(army_id))?;
        roster.remove(index);

        let remaining = self.roster(player)?.clone();
        for army in &remaining {
            self.mirror_army(army);
        }
        Ok(())
    }

    /// Recruits units into an army. `quantity` multiplies both the cost
    /// and the units gained and is clamped to the allowed range. The debit
    /// is atomic: a short ledger leaves both the ledger and the army
    /// untouched.
    pub fn modify_army(
        &mut self,
        player: PlayerId,
        army_id: ArmyId,
        unit_type: UnitType,
        quantity: u32,
    ) -> GameResult<Army> {
        let index = self
            .roster(player)?
            .iter()
            .position(|a| a.id == army_id)
            .ok_or(GameError::ArmyNotFound(army_id))?;

        let line = recruitment(unit_type).ok_or(GameError::NotRecruitable(unit_type))?;
        let (lo, hi) = RECRUIT_QUANTITY_RANGE;
        let quantity = quantity.clamp(lo, hi);

        let cost: Vec<(ResourceKind, u32)> = line
            .cost
            .iter()
            .map(|&(kind, amount)| (kind, amount * quantity))
            .collect();
        self.ledger_mut(player)?.debit(&cost)?;

        let roster = self.roster_mut(player)?;
        roster[index].add_units(unit_type, line.unit_count * quantity);
        let snapshot = roster[index].clone();
        self.mirror_army(&snapshot);
        Ok(snapshot)
    }

    // ------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------

    /// A player's current holdings.
    pub fn resources(&self, player: PlayerId) -> GameResult<&ResourceLedger> {
        self.resources
            .get(&player)
            .ok_or(GameError::PlayerNotFound(player))
    }

    /// Overwrites one counter.
    pub fn set_resource(
        &mut self,
        player: PlayerId,
        kind: ResourceKind,
        value: u32,
    ) -> GameResult<&ResourceLedger> {
        let ledger = self.ledger_mut(player)?;
        ledger.set(kind, value);
        Ok(&*ledger)
    }

    /// Replaces the unique-resource map wholesale.
    pub fn set_unique_resources(
        &mut self,
        player: PlayerId,
        map: BTreeMap<String, String>,
    ) -> GameResult<&ResourceLedger> {
        let ledger = self.ledger_mut(player)?;
        ledger.set_unique_resources(map);
        Ok(&*ledger)
    }

    /// Adjusts one counter by a signed delta, flooring at zero.
    pub fn add_resource(
        &mut self,
        player: PlayerId,
        kind: ResourceKind,
        delta: i64,
    ) -> GameResult<&ResourceLedger> {
        let ledger = self.ledger_mut(player)?;
        ledger.add(kind, delta);
        Ok(&*ledger)
    }

    /// Works source tiles with labor to produce a spawnable resource.
    pub fn spawn_resource(
        &mut self,
        player: PlayerId,
        kind: ResourceKind,
        tiles: u32,
    ) -> GameResult<&ResourceLedger> {
        let ledger = self.ledger_mut(player)?;
        ledger.spawn(kind, tiles)?;
        Ok(&*ledger)
    }

    /// Smelts copper and tin into bronze.
    pub fn craft_bronze(&mut self, player: PlayerId, amount: u32) -> GameResult<&ResourceLedger> {
        let ledger = self.ledger_mut(player)?;
        ledger.craft_bronze(amount)?;
        Ok(&*ledger)
    }

    /// Adds or overwrites a unique resource.
    pub fn add_unique_resource(
        &mut self,
        player: PlayerId,
        name: &str,
        description: &str,
    ) -> GameResult<&ResourceLedger> {
        let ledger = self.ledger_mut(player)?;
        ledger.add_unique(name, description);
        Ok(&*ledger)
    }

    /// Next-cycle food income for a player.
    pub fn food_projection(&self, player: PlayerId) -> GameResult<FoodProjection> {
        Ok(self.resources(player)?.food_projection())
    }

    // ------------------------------------------------------------------
    // Battle lifecycle
    // ------------------------------------------------------------------

    /// Opens a battle between the aggressor's and defender's named armies.
    ///
    /// The armies stay in their rosters; deployment drains them in place,
    /// and that drain is permanent whatever the battle's outcome.
    pub fn start_battle(
        &mut self,
        aggressor_army: ArmyId,
        defender_army: ArmyId,
    ) -> GameResult<&Battle> {
        let agg_units = self
            .roster(self.aggressor)?
            .iter()
            .find(|a| a.id == aggressor_army)
            .ok_or(GameError::ArmyNotFound(aggressor_army))?
            .unit_total();
        let def_units = self
            .roster(self.defender)?
            .iter()
            .find(|a| a.id == defender_army)
            .ok_or(GameError::ArmyNotFound(defender_army))?
            .unit_total();
        if self.battle.is_some() {
            return Err(GameError::BattleInProgress);
        }

        let battle = Battle::new(
            self.aggressor,
            self.defender,
            aggressor_army,
            defender_army,
            agg_units + def_units,
        );
        let snapshot = BattleSnapshot::of(&battle);
        self.battle = Some(battle);
        self.mirror_battle(&snapshot);

        self.battle.as_ref().ok_or(GameError::NoActiveBattle)
    }

    /// Settles a finished battle: the loser's participating army leaves
    /// their roster, the winner's army and every non-participant are
    /// untouched, and the battle slot is cleared. Returns the winner.
    pub fn end_battle(&mut self) -> GameResult<PlayerId> {
        let battle = self.battle.as_ref().ok_or(GameError::NoActiveBattle)?;
        if battle.phase() != Phase::Ended {
            return Err(GameError::BattleNotFinished);
        }
        let winner = battle.winner().ok_or(GameError::BattleNotFinished)?;
        let loser = if winner == self.aggressor {
            self.defender
        } else {
            self.aggressor
        };
        let lost_army = battle.army_of(loser);
        let snapshot = BattleSnapshot::of(battle);

        if let Some(lost_army) = lost_army {
            self.roster_mut(loser)?.retain(|a| a.id != lost_army);
        }
        self.battle = None;
        self.mirror_battle(&snapshot);
        Ok(winner)
    }

    // ------------------------------------------------------------------
    // Battle actions
    // ------------------------------------------------------------------

    fn battle_mut(&mut self) -> GameResult<&mut Battle> {
        self.battle.as_mut().ok_or(GameError::NoActiveBattle)
    }

    /// Deploys a unit from the acting player's participating army.
    pub fn place_unit(
        &mut self,
        player: PlayerId,
        unit_type: UnitType,
        x: u8,
        y: u8,
        orientation: Option<Orientation>,
    ) -> GameResult<PlaceOutcome> {
        let battle = self.battle.as_mut().ok_or(GameError::NoActiveBattle)?;
        battle.guard(Phase::Placement, player)?;
        // After the guard the player is the current player, hence a
        // participant with a recorded army.
        let army_id = battle.army_of(player).ok_or(GameError::NotAParticipant)?;
        let army = self
            .armies
            .get_mut(&player)
            .and_then(|roster| roster.iter_mut().find(|a| a.id == army_id))
            .ok_or(GameError::ArmyNotFound(army_id))?;
        battle.place_unit(player, army, unit_type, x, y, orientation)
    }

    /// Relocates a unit within its movement allowance.
    pub fn move_unit(
        &mut self,
        player: PlayerId,
        from_x: u8,
        from_y: u8,
        to_x: u8,
        to_y: u8,
    ) -> GameResult<()> {
        self.battle_mut()?.move_unit(player, from_x, from_y, to_x, to_y)
    }

    /// Rotates a unit in place.
    pub fn turn_unit(
        &mut self,
        player: PlayerId,
        x: u8,
        y: u8,
        orientation: Orientation,
    ) -> GameResult<()> {
        self.battle_mut()?.turn_unit(player, x, y, orientation)
    }

    /// Ends the acting player's turn and resolves attacks.
    pub fn end_turn(&mut self, player: PlayerId) -> GameResult<TurnOutcome> {
        self.battle_mut()?.end_turn(player)
    }

    /// Concedes the active battle.
    pub fn forfeit_battle(&mut self, player: PlayerId) -> GameResult<BattleEnd> {
        self.battle_mut()?.forfeit(player)
    }
}
