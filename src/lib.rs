//! Core engine for a bronze-age strategy game: persistent wars between an
//! aggressor and a defender, army rosters backed by a resource economy,
//! and turn-based battles fought on a 9x9 grid with facing-based combat.
//!
//! The crate is transport-agnostic. A frontend (chat bot, web service,
//! CLI) resolves its own identities to [`ids::PlayerId`] and
//! [`ids::SessionId`], drives a shared [`registry::GameRegistry`], and
//! renders the returned snapshots and [`error::GameError`] messages
//! however it likes.

pub mod battle;
pub mod board;
pub mod economy;
pub mod error;
pub mod ids;
pub mod mirror;
pub mod registry;
pub mod session;

pub use battle::{Battle, BattleEnd, Phase, Side, TurnOutcome, VictoryReason};
pub use board::{Board, Orientation, UnitType};
pub use economy::{Army, ResourceKind, ResourceLedger};
pub use error::{GameError, GameResult};
pub use ids::{ArmyId, PlayerId, SessionId};
pub use registry::{GameRegistry, SessionHandle};
pub use session::GameSession;
