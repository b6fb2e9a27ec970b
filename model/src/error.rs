use crate::tile::TileId;

/// Why a finished path cannot be merged.
#[derive(thiserror::Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum SelectionFault {
    #[error("path has {0} tile(s), at least 2 required")]
    TooShort(usize),
    #[error("tile {0} is no longer on the board")]
    Stale(TileId),
    #[error("tile {0} appears more than once")]
    Repeated(TileId),
    #[error("tile {id} has value {found}, path value is {expected}")]
    ValueMismatch { id: TileId, expected: u32, found: u32 },
    #[error("tile {0} is not adjacent to the previous tile")]
    NotAdjacent(TileId),
    #[error("doubling {0} overflows")]
    Overflow(u32),
}

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionFault),
    #[error("stale tile handle {0}")]
    StaleHandle(TileId),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
