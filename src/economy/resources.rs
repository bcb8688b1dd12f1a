//! Per-player resource ledger.
//!
//! Tracks the named non-negative counters (raw goods, crafted bronze,
//! population and land tiles) plus the freeform unique-resource map. All
//! counter arithmetic saturates at zero; multi-resource debits are atomic,
//! so a failed recruitment never leaves a partial charge.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// A named numeric counter in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Food,
    Timber,
    Copper,
    Tin,
    Mounts,
    Books,
    Bronze,
    Population,
    Labor,
    Coins,
    TotalTiles,
    FarmlandTiles,
    ForestTiles,
    CopperTiles,
    TinTiles,
    MountTiles,
    MetropolisTiles,
}

/// All ledger counters, in snapshot order.
pub const ALL_RESOURCE_KINDS: [ResourceKind; 17] = [
    ResourceKind::Food,
    ResourceKind::Timber,
    ResourceKind::Copper,
    ResourceKind::Tin,
    ResourceKind::Mounts,
    ResourceKind::Books,
    ResourceKind::Bronze,
    ResourceKind::Population,
    ResourceKind::Labor,
    ResourceKind::Coins,
    ResourceKind::TotalTiles,
    ResourceKind::FarmlandTiles,
    ResourceKind::ForestTiles,
    ResourceKind::CopperTiles,
    ResourceKind::TinTiles,
    ResourceKind::MountTiles,
    ResourceKind::MetropolisTiles,
];

impl ResourceKind {
    /// Returns the snake_case canonical name used in messages and snapshots.
    pub const fn name(self) -> &'static str {
        match self {
            ResourceKind::Food => "food",
            ResourceKind::Timber => "timber",
            ResourceKind::Copper => "copper",
            ResourceKind::Tin => "tin",
            ResourceKind::Mounts => "mounts",
            ResourceKind::Books => "books",
            ResourceKind::Bronze => "bronze",
            ResourceKind::Population => "population",
            ResourceKind::Labor => "labor",
            ResourceKind::Coins => "coins",
            ResourceKind::TotalTiles => "total_tiles",
            ResourceKind::FarmlandTiles => "farmland_tiles",
            ResourceKind::ForestTiles => "forest_tiles",
            ResourceKind::CopperTiles => "copper_tiles",
            ResourceKind::TinTiles => "tin_tiles",
            ResourceKind::MountTiles => "mount_tiles",
            ResourceKind::MetropolisTiles => "metropolis_tiles",
        }
    }

    /// Parses a canonical name; the command layer normalizes user text
    /// through this before anything reaches the core.
    pub fn from_name(s: &str) -> Option<ResourceKind> {
        ALL_RESOURCE_KINDS.into_iter().find(|k| k.name() == s)
    }

    /// The tile counter that yields this resource, for spawnable kinds.
    pub const fn tile_source(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Food => Some(ResourceKind::FarmlandTiles),
            ResourceKind::Timber => Some(ResourceKind::ForestTiles),
            ResourceKind::Copper => Some(ResourceKind::CopperTiles),
            ResourceKind::Tin => Some(ResourceKind::TinTiles),
            ResourceKind::Mounts => Some(ResourceKind::MountTiles),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Food income for the next cycle, derived from farmland and population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodProjection {
    pub produced: u32,
    pub consumed: u32,
    pub net: i64,
}

/// One player's resource holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    food: u32,
    timber: u32,
    copper: u32,
    tin: u32,
    mounts: u32,
    books: u32,
    bronze: u32,
    population: u32,
    labor: u32,
    coins: u32,
    total_tiles: u32,
    farmland_tiles: u32,
    forest_tiles: u32,
    copper_tiles: u32,
    tin_tiles: u32,
    mount_tiles: u32,
    metropolis_tiles: u32,
    unique_resources: BTreeMap<String, String>,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLedger {
    /// The starting allocation every player begins a war with.
    pub fn new() -> Self {
        ResourceLedger {
            food: 10,
            timber: 5,
            copper: 2,
            tin: 2,
            mounts: 3,
            books: 0,
            bronze: 5,
            population: 5,
            labor: 5,
            coins: 10,
            total_tiles: 10,
            farmland_tiles: 3,
            forest_tiles: 2,
            copper_tiles: 1,
            tin_tiles: 1,
            mount_tiles: 2,
            metropolis_tiles: 1,
            unique_resources: BTreeMap::new(),
        }
    }

    /// Current value of a counter.
    pub fn get(&self, kind: ResourceKind) -> u32 {
        *self.slot_ref(kind)
    }

    fn slot_ref(&self, kind: ResourceKind) -> &u32 {
        match kind {
            ResourceKind::Food => &self.food,
            ResourceKind::Timber => &self.timber,
            ResourceKind::Copper => &self.copper,
            ResourceKind::Tin => &self.tin,
            ResourceKind::Mounts => &self.mounts,
            ResourceKind::Books => &self.books,
            ResourceKind::Bronze => &self.bronze,
            ResourceKind::Population => &self.population,
            ResourceKind::Labor => &self.labor,
            ResourceKind::Coins => &self.coins,
            ResourceKind::TotalTiles => &self.total_tiles,
            ResourceKind::FarmlandTiles => &self.farmland_tiles,
            ResourceKind::ForestTiles => &self.forest_tiles,
            ResourceKind::CopperTiles => &self.copper_tiles,
            ResourceKind::TinTiles => &self.tin_tiles,
            ResourceKind::MountTiles => &self.mount_tiles,
            ResourceKind::MetropolisTiles => &self.metropolis_tiles,
        }
    }

    fn slot(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Food => &mut self.food,
            ResourceKind::Timber => &mut self.timber,
            ResourceKind::Copper => &mut self.copper,
            ResourceKind::Tin => &mut self.tin,
            ResourceKind::Mounts => &mut self.mounts,
            ResourceKind::Books => &mut self.books,
            ResourceKind::Bronze => &mut self.bronze,
            ResourceKind::Population => &mut self.population,
            ResourceKind::Labor => &mut self.labor,
            ResourceKind::Coins => &mut self.coins,
            ResourceKind::TotalTiles => &mut self.total_tiles,
            ResourceKind::FarmlandTiles => &mut self.farmland_tiles,
            ResourceKind::ForestTiles => &mut self.forest_tiles,
            ResourceKind::CopperTiles => &mut self.copper_tiles,
            ResourceKind::TinTiles => &mut self.tin_tiles,
            ResourceKind::MountTiles => &mut self.mount_tiles,
            ResourceKind::MetropolisTiles => &mut self.metropolis_tiles,
        }
    }

    /// Overwrites a counter. Values are unsigned, so the floor-at-zero rule
    /// is enforced by the type.
    pub fn set(&mut self, kind: ResourceKind, value: u32) {
        *self.slot(kind) = value;
    }

    /// Adjusts a counter by a signed delta, saturating at zero.
    pub fn add(&mut self, kind: ResourceKind, delta: i64) {
        let slot = self.slot(kind);
        let next = (*slot as i64).saturating_add(delta).max(0);
        *slot = next.min(u32::MAX as i64) as u32;
    }

    /// The freeform unique-resource map (name to description).
    pub fn unique_resources(&self) -> &BTreeMap<String, String> {
        &self.unique_resources
    }

    /// Replaces the unique-resource map wholesale.
    pub fn set_unique_resources(&mut self, map: BTreeMap<String, String>) {
        self.unique_resources = map;
    }

    /// Adds or overwrites one unique resource.
    pub fn add_unique(&mut self, name: impl Into<String>, description: impl Into<String>) {
        self.unique_resources.insert(name.into(), description.into());
    }

    fn require(&self, kind: ResourceKind, required: u32) -> GameResult<()> {
        let available = self.get(kind);
        if available < required {
            return Err(GameError::InsufficientResource {
                resource: kind,
                required,
                available,
            });
        }
        Ok(())
    }

    /// Charges a multi-resource cost atomically: every line is checked
    /// before any counter is touched.
    pub fn debit(&mut self, cost: &[(ResourceKind, u32)]) -> GameResult<()> {
        for &(kind, amount) in cost {
            self.require(kind, amount)?;
        }
        for &(kind, amount) in cost {
            *self.slot(kind) -= amount;
        }
        Ok(())
    }

    /// Works `tiles` of the kind's source tiles: spends one labor per tile
    /// and yields one unit of the resource per tile. Tiles are land and are
    /// not consumed.
    pub fn spawn(&mut self, kind: ResourceKind, tiles: u32) -> GameResult<()> {
        let tile_kind = kind.tile_source().ok_or(GameError::NotSpawnable(kind))?;
        self.require(ResourceKind::Labor, tiles)?;
        self.require(tile_kind, tiles)?;

        self.labor -= tiles;
        self.add(kind, tiles as i64);
        Ok(())
    }

    /// Smelts bronze: each unit of copper and tin yields two bronze.
    pub fn craft_bronze(&mut self, amount: u32) -> GameResult<()> {
        self.debit(&[(ResourceKind::Copper, amount), (ResourceKind::Tin, amount)])?;
        self.add(ResourceKind::Bronze, (amount as i64) * 2);
        Ok(())
    }

    /// Projects next-cycle food: farmland yields two each, population
    /// produces one and eats one.
    pub fn food_projection(&self) -> FoodProjection {
        let produced = self.farmland_tiles * 2 + self.population;
        let consumed = self.population;
        FoodProjection {
            produced,
            consumed,
            net: produced as i64 - consumed as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_allocation() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.get(ResourceKind::Food), 10);
        assert_eq!(ledger.get(ResourceKind::Timber), 5);
        assert_eq!(ledger.get(ResourceKind::Copper), 2);
        assert_eq!(ledger.get(ResourceKind::Tin), 2);
        assert_eq!(ledger.get(ResourceKind::Mounts), 3);
        assert_eq!(ledger.get(ResourceKind::Books), 0);
        assert_eq!(ledger.get(ResourceKind::Bronze), 5);
        assert_eq!(ledger.get(ResourceKind::Labor), 5);
        assert_eq!(ledger.get(ResourceKind::FarmlandTiles), 3);
        assert!(ledger.unique_resources().is_empty());
    }

    #[test]
    fn kind_name_roundtrip() {
        for kind in ALL_RESOURCE_KINDS {
            assert_eq!(ResourceKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ResourceKind::from_name("obsidian"), None);
    }

    #[test]
    fn add_saturates_at_zero() {
        let mut ledger = ResourceLedger::new();
        ledger.add(ResourceKind::Coins, -25);
        assert_eq!(ledger.get(ResourceKind::Coins), 0);
        ledger.add(ResourceKind::Coins, 7);
        assert_eq!(ledger.get(ResourceKind::Coins), 7);
    }

    #[test]
    fn debit_is_atomic() {
        let mut ledger = ResourceLedger::new();
        // Second line is short: the first line must not be charged.
        let err = ledger
            .debit(&[(ResourceKind::Copper, 1), (ResourceKind::Books, 1)])
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientResource {
                resource: ResourceKind::Books,
                required: 1,
                available: 0,
            }
        );
        assert_eq!(ledger.get(ResourceKind::Copper), 2);
    }

    #[test]
    fn spawn_spends_labor_but_not_tiles() {
        let mut ledger = ResourceLedger::new();
        ledger.spawn(ResourceKind::Timber, 2).unwrap();
        assert_eq!(ledger.get(ResourceKind::Timber), 7);
        assert_eq!(ledger.get(ResourceKind::Labor), 3);
        assert_eq!(ledger.get(ResourceKind::ForestTiles), 2);
    }

    #[test]
    fn spawn_requires_labor_and_tiles() {
        let mut ledger = ResourceLedger::new();
        let err = ledger.spawn(ResourceKind::Copper, 2).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientResource {
                resource: ResourceKind::CopperTiles,
                required: 2,
                available: 1,
            }
        );

        let err = ledger.spawn(ResourceKind::Food, 9).unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientResource {
                resource: ResourceKind::Labor,
                required: 9,
                available: 5,
            }
        );

        let err = ledger.spawn(ResourceKind::Bronze, 1).unwrap_err();
        assert_eq!(err, GameError::NotSpawnable(ResourceKind::Bronze));
    }

    #[test]
    fn craft_bronze_converts_one_and_one_into_two() {
        let mut ledger = ResourceLedger::new();
        ledger.craft_bronze(2).unwrap();
        assert_eq!(ledger.get(ResourceKind::Copper), 0);
        assert_eq!(ledger.get(ResourceKind::Tin), 0);
        assert_eq!(ledger.get(ResourceKind::Bronze), 9);

        let err = ledger.craft_bronze(1).unwrap_err();
        assert!(matches!(err, GameError::InsufficientResource { .. }));
        // Nothing changed on the failed craft.
        assert_eq!(ledger.get(ResourceKind::Bronze), 9);
    }

    #[test]
    fn unique_resources_upsert() {
        let mut ledger = ResourceLedger::new();
        ledger.add_unique("oracle_bones", "divination records from the river delta");
        ledger.add_unique("oracle_bones", "recarved after the flood");
        assert_eq!(
            ledger.unique_resources().get("oracle_bones").map(String::as_str),
            Some("recarved after the flood")
        );
    }

    #[test]
    fn food_projection_formula() {
        let ledger = ResourceLedger::new();
        // 3 farmland * 2 + 5 population = 11 produced, 5 consumed.
        let projection = ledger.food_projection();
        assert_eq!(projection.produced, 11);
        assert_eq!(projection.consumed, 5);
        assert_eq!(projection.net, 6);
    }
}
