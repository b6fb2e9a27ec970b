//! Simulation core of a chain-merge tile puzzle: a grid of power-of-two tiles,
//! drag paths over equal neighbours, merges into the last dragged tile, and
//! gravity with refill from the opposite edge.

pub mod board;
pub mod config;
pub mod error;
pub mod score;
pub mod selection;
pub mod tile;

pub use board::{Board, BoardEvent, MergeResult, Phase, SettleReport};
pub use config::{GameConfig, Gravity, SpawnValues};
pub use error::{GameError, Result, SelectionFault};
pub use score::{ScoreMapping, ScoreTable};
pub use selection::{ExtendResult, ResolutionIntent, SelectionPath};
pub use tile::{Move, Pos, TileId, TileView};
