use std::fmt;

/// Stable identity of a tile. Survives moves and merges, never reused once the tile is destroyed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TileId(pub(crate) u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Board coordinate. Row 0 is the spawn edge under the default gravity.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Pos {
    pub col: usize,
    pub row: usize,
}

impl Pos {
    pub fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
    pub(crate) fn index(self) -> (usize, usize) {
        (self.row, self.col)
    }
    pub(crate) fn from_index(index: (usize, usize)) -> Self {
        Self::new(index.1, index.0)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Cell content. Position is implied by the cell holding it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Tile {
    pub(crate) id: TileId,
    pub(crate) value: u32,
}

impl Tile {
    pub(crate) fn view(self, pos: Pos) -> TileView {
        TileView {
            id: self.id,
            value: self.value,
            pos,
        }
    }
}

/// Read-only snapshot of a tile at the moment it was taken.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TileView {
    pub id: TileId,
    pub value: u32,
    pub pos: Pos,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Move {
    pub id: TileId,
    pub from: Pos,
    pub to: Pos,
}
