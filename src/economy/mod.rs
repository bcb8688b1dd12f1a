//! The persistent economy: armies and resource ledgers.
//!
//! Everything here outlives individual battles. Armies are recruited and
//! disbanded between fights; the ledger gates what an army can contain.

pub mod army;
pub mod resources;

pub use army::{recruitment, Army, Recruitment, UnitStack, RECRUIT_QUANTITY_RANGE};
pub use resources::{FoodProjection, ResourceKind, ResourceLedger, ALL_RESOURCE_KINDS};
