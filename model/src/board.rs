use std::collections::HashSet;
use std::iter::once;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{check_dimensions, is_tile_value, GameConfig, Gravity, SpawnValues};
use crate::error::{GameError, Result, SelectionFault};
use crate::score::ScoreTable;
use crate::tile::{Move, Pos, Tile, TileId, TileView};

/// Steps of the merge-to-settle cycle, in execution order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Phase {
    Merge,
    Collapse,
    Spawn,
    Resettle,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BoardEvent {
    Removed(TileView),
    Merged(TileView),
    Moved(Move),
    Spawned(TileView),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MergeResult {
    pub value: u32,
    pub score: u64,
    /// The surviving tile, already holding `value`.
    pub target: TileView,
    pub removed: Vec<TileView>,
}

/// Everything one `resolve_merge_and_settle` call did to the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettleReport {
    pub merge: MergeResult,
    pub collapsed: Vec<Move>,
    pub spawned: Vec<TileView>,
    pub resettled: Vec<Move>,
}

impl SettleReport {
    pub fn score(&self) -> u64 {
        self.merge.score
    }

    pub fn events(&self) -> Vec<(Phase, BoardEvent)> {
        let merge = &self.merge;
        merge
            .removed
            .iter()
            .map(|t| (Phase::Merge, BoardEvent::Removed(*t)))
            .chain(once((Phase::Merge, BoardEvent::Merged(merge.target))))
            .chain(
                self.collapsed
                    .iter()
                    .map(|m| (Phase::Collapse, BoardEvent::Moved(*m))),
            )
            .chain(
                self.spawned
                    .iter()
                    .map(|t| (Phase::Spawn, BoardEvent::Spawned(*t))),
            )
            .chain(
                self.resettled
                    .iter()
                    .map(|m| (Phase::Resettle, BoardEvent::Moved(*m))),
            )
            .collect()
    }
}

#[derive(Debug)]
pub struct Board<R = StdRng> {
    cells: Array2<Option<Tile>>,
    scores: ScoreTable,
    gravity: Gravity,
    rng: R,
    next_id: u64,
}

impl<R: Rng> Board<R> {
    /// Fills every cell with a spawned tile. No merge or gravity runs.
    pub fn initialize(
        rows: usize,
        columns: usize,
        spawn: &SpawnValues,
        scores: ScoreTable,
        gravity: Gravity,
        rng: R,
    ) -> Result<Self> {
        check_dimensions(rows, columns)?;
        let mut board = Self::empty(rows, columns, scores, gravity, rng);
        board.reset(spawn);
        log::info!("initialized {}x{} board", columns, rows);
        Ok(board)
    }

    pub fn from_config(config: &GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Self::initialize(
            config.rows,
            config.columns,
            &config.spawn_values()?,
            config.score_table(),
            config.gravity,
            rng,
        )
    }

    /// Replaces every tile with a fresh spawn, row by row. Old handles go stale.
    pub fn reset(&mut self, spawn: &SpawnValues) {
        let (rows, columns) = self.cells.dim();
        for row in 0..rows {
            for col in 0..columns {
                let tile = self.spawn_tile(spawn);
                self.cells[(row, col)] = Some(tile);
            }
        }
    }

    fn spawn_tile(&mut self, spawn: &SpawnValues) -> Tile {
        let value = spawn.pick(&mut self.rng);
        self.make_tile(value)
    }

    /// Fills every empty cell, starting from the spawn edge of each column.
    pub fn spawn_into_empties(&mut self, spawn: &SpawnValues) -> Vec<TileView> {
        let rows = self.rows();
        let mut spawned = Vec::new();
        for col in 0..self.columns() {
            for depth in (0..rows).rev() {
                let pos = Pos::new(col, self.gravity.row_at(rows, depth));
                if self.cells[pos.index()].is_none() {
                    let tile = self.spawn_tile(spawn);
                    self.cells[pos.index()] = Some(tile);
                    log::trace!("spawned {} with {} at {}", tile.id, tile.value, pos);
                    spawned.push(tile.view(pos));
                }
            }
        }
        spawned
    }

    /// Collapse, spawn, collapse. Returns every move in order.
    pub fn settle(&mut self, spawn: &SpawnValues) -> Vec<Move> {
        let mut moves = self.collapse_columns();
        self.spawn_into_empties(spawn);
        moves.extend(self.resettle());
        moves
    }

    pub fn resolve_merge_and_settle(
        &mut self,
        path: &[TileId],
        spawn: &SpawnValues,
    ) -> Result<SettleReport> {
        let merge = self.resolve_merge(path)?;
        let collapsed = self.collapse_columns();
        let spawned = self.spawn_into_empties(spawn);
        let resettled = self.resettle();
        log::debug!(
            "settled after merge: {} collapsed, {} spawned, {} resettled",
            collapsed.len(),
            spawned.len(),
            resettled.len()
        );
        Ok(SettleReport {
            merge,
            collapsed,
            spawned,
            resettled,
        })
    }
}

impl<R> Board<R> {
    fn empty(rows: usize, columns: usize, scores: ScoreTable, gravity: Gravity, rng: R) -> Self {
        Self {
            cells: Array2::default((rows, columns)),
            scores,
            gravity,
            rng,
            next_id: 0,
        }
    }

    fn make_tile(&mut self, value: u32) -> Tile {
        let id = TileId(self.next_id);
        self.next_id += 1;
        Tile { id, value }
    }

    /// Builds a board from a value grid indexed `(row, column)`, 0 meaning empty.
    pub fn from_array(
        array: Array2<u32>,
        scores: ScoreTable,
        gravity: Gravity,
        rng: R,
    ) -> Result<Self> {
        let (rows, columns) = array.dim();
        check_dimensions(rows, columns)?;
        let mut board = Self::empty(rows, columns, scores, gravity, rng);
        for (index, &v) in array.indexed_iter() {
            let cell = match v {
                0 => None,
                v if is_tile_value(v) => Some(board.make_tile(v)),
                v => {
                    return Err(GameError::Configuration(format!(
                        "cell {} holds {}, expected 0 or a power of two >= 2",
                        Pos::from_index(index),
                        v
                    )))
                }
            };
            board.cells[index] = cell;
        }
        Ok(board)
    }

    pub fn to_array(&self) -> Array2<u32> {
        self.cells.map(|cell| cell.map_or(0, |tile| tile.value))
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn columns(&self) -> usize {
        self.cells.ncols()
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// None for empty cells and for positions off the board.
    pub fn tile_at(&self, pos: Pos) -> Option<TileView> {
        self.cells
            .get(pos.index())
            .copied()
            .flatten()
            .map(|tile| tile.view(pos))
    }

    pub fn locate(&self, id: TileId) -> Option<Pos> {
        self.cells
            .indexed_iter()
            .find(|(_, cell)| matches!(cell, Some(tile) if tile.id == id))
            .map(|(index, _)| Pos::from_index(index))
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.locate(id).is_some()
    }

    pub fn tile(&self, id: TileId) -> Result<TileView> {
        self.locate(id)
            .and_then(|pos| self.tile_at(pos))
            .ok_or(GameError::StaleHandle(id))
    }

    /// Live tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = TileView> + '_ {
        self.cells
            .indexed_iter()
            .filter_map(|(index, cell)| cell.map(|tile| tile.view(Pos::from_index(index))))
    }

    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// A full board never has a pending move.
    pub fn is_settled(&self) -> bool {
        self.empty_cells() == 0
    }

    pub fn are_orthogonally_adjacent(a: Pos, b: Pos) -> bool {
        matches!(
            (a.col.abs_diff(b.col), a.row.abs_diff(b.row)),
            (1, 0) | (0, 1)
        )
    }

    /// Merges `path` into its last tile. The board is untouched on error.
    pub fn resolve_merge(&mut self, path: &[TileId]) -> Result<MergeResult> {
        if path.len() < 2 {
            return Err(SelectionFault::TooShort(path.len()).into());
        }
        let mut seen = HashSet::with_capacity(path.len());
        let mut views = Vec::with_capacity(path.len());
        for &id in path {
            let view = self.tile(id).map_err(|_| SelectionFault::Stale(id))?;
            if !seen.insert(id) {
                return Err(SelectionFault::Repeated(id).into());
            }
            views.push(view);
        }
        let value = views[0].value;
        for pair in views.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.value != value {
                return Err(SelectionFault::ValueMismatch {
                    id: next.id,
                    expected: value,
                    found: next.value,
                }
                .into());
            }
            if !Self::are_orthogonally_adjacent(prev.pos, next.pos) {
                return Err(SelectionFault::NotAdjacent(next.id).into());
            }
        }
        let merged = value
            .checked_mul(2)
            .ok_or(SelectionFault::Overflow(value))?;
        let score = self.scores.score(value, path.len());

        let target = views[views.len() - 1];
        let removed = views[..views.len() - 1].to_vec();
        for tile in &removed {
            self.cells[tile.pos.index()] = None;
            log::trace!("removed {} at {}", tile.id, tile.pos);
        }
        if let Some(tile) = self.cells[target.pos.index()].as_mut() {
            tile.value = merged;
        }
        let target = TileView {
            value: merged,
            ..target
        };
        log::debug!(
            "merged {} tiles of {} into {} at {}, score {}",
            path.len(),
            value,
            merged,
            target.pos,
            score
        );
        Ok(MergeResult {
            value: merged,
            score,
            target,
            removed,
        })
    }

    /// Compacts every column toward the gravity edge, keeping tile order.
    pub fn collapse_columns(&mut self) -> Vec<Move> {
        let rows = self.rows();
        let gravity = self.gravity;
        let mut moves = Vec::new();
        for col in 0..self.columns() {
            let mut landed = 0;
            for depth in 0..rows {
                let from = Pos::new(col, gravity.row_at(rows, depth));
                if let Some(tile) = self.cells[from.index()].take() {
                    let to = Pos::new(col, gravity.row_at(rows, landed));
                    self.cells[to.index()] = Some(tile);
                    if to != from {
                        log::trace!("{} falls {} -> {}", tile.id, from, to);
                        moves.push(Move {
                            id: tile.id,
                            from,
                            to,
                        });
                    }
                    landed += 1;
                }
            }
        }
        moves
    }

    fn resettle(&mut self) -> Vec<Move> {
        let mut moves = Vec::new();
        loop {
            let pass = self.collapse_columns();
            if pass.is_empty() {
                return moves;
            }
            moves.extend(pass);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Board;
    use crate::config::{Gravity, SpawnValues};
    use crate::score::ScoreTable;
    use crate::tile::{Pos, TileId};
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    pub fn board(array: Array2<u32>) -> Board {
        board_with(array, ScoreTable::new(), Gravity::TowardLastRow)
    }

    pub fn board_with(array: Array2<u32>, scores: ScoreTable, gravity: Gravity) -> Board {
        Board::from_array(array, scores, gravity, StdRng::seed_from_u64(7)).unwrap()
    }

    pub fn twos() -> SpawnValues {
        SpawnValues::new(vec![2]).unwrap()
    }

    pub fn ids(board: &Board, cells: &[(usize, usize)]) -> Vec<TileId> {
        cells
            .iter()
            .map(|&(col, row)| board.tile_at(Pos::new(col, row)).unwrap().id)
            .collect()
    }
}

#[test]
fn initialize_fills_every_cell() {
    use rand::SeedableRng;
    let spawn = SpawnValues::default();
    let mut board = Board::initialize(
        5,
        4,
        &spawn,
        ScoreTable::new(),
        Gravity::TowardLastRow,
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    assert_eq!(board.rows(), 5);
    assert_eq!(board.columns(), 4);
    assert!(board.is_settled());
    let tiles: Vec<_> = board.tiles().collect();
    assert_eq!(tiles.len(), 20);
    assert!(tiles.iter().all(|t| spawn.values().contains(&t.value)));
    let unique: HashSet<_> = tiles.iter().map(|t| t.id).collect();
    assert_eq!(unique.len(), 20);
    assert!(board.collapse_columns().is_empty());
}

#[test]
fn initialize_rejects_empty_or_oversized_board() {
    use rand::SeedableRng;
    for &(rows, columns) in &[(0, 3), (3, 0), (0, 0), (usize::MAX, 2), (1 << 40, 1 << 40)] {
        let result = Board::initialize(
            rows,
            columns,
            &SpawnValues::default(),
            ScoreTable::new(),
            Gravity::TowardLastRow,
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(GameError::Configuration(_))));
    }
}

#[test]
fn reset_replaces_every_tile() {
    use crate::board::tests::{board, twos};
    #[rustfmt::skip]
    let mut board = board(Array2::from_shape_vec((2, 2), vec![
        0, 8,
        4, 8,
    ]).unwrap());
    let old: Vec<_> = board.tiles().map(|t| t.id).collect();
    board.reset(&twos());
    assert_eq!(board.to_array(), Array2::from_elem((2, 2), 2));
    assert!(old.iter().all(|id| !board.contains(*id)));
}

#[test]
fn board_from_array() {
    use crate::board::tests::board;
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((3, 4), vec![
        2, 4, 0, 8,
        0, 2, 2, 16,
        4, 0, 0, 2,
    ]).unwrap();
    let board = board(array.clone());
    assert_eq!(board.to_array(), array);
    assert_eq!(board.tile_at(Pos::new(3, 1)).unwrap().value, 16);
    assert_eq!(board.tile_at(Pos::new(0, 2)).unwrap().value, 4);
    assert_eq!(board.tile_at(Pos::new(2, 0)), None);
    assert_eq!(board.tile_at(Pos::new(4, 0)), None);
    assert_eq!(board.tile_at(Pos::new(0, 3)), None);
    assert_eq!(board.empty_cells(), 4);
    assert!(!board.is_settled());
}

#[test]
fn board_from_array_rejects_non_tile_values() {
    use rand::SeedableRng;
    for &bad in &[1, 3, 6, 12] {
        let array = Array2::from_shape_vec((1, 2), vec![2, bad]).unwrap();
        let result = Board::from_array(
            array,
            ScoreTable::new(),
            Gravity::TowardLastRow,
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(GameError::Configuration(_))));
    }
}

#[test]
fn adjacency_is_orthogonal_only() {
    let c = Pos::new(2, 2);
    for &(col, row) in &[(1, 2), (3, 2), (2, 1), (2, 3)] {
        let n = Pos::new(col, row);
        assert!(Board::<StdRng>::are_orthogonally_adjacent(c, n));
        assert!(Board::<StdRng>::are_orthogonally_adjacent(n, c));
    }
    for &(col, row) in &[(1, 1), (3, 3), (1, 3), (3, 1), (2, 2), (2, 4), (0, 2)] {
        let n = Pos::new(col, row);
        assert!(!Board::<StdRng>::are_orthogonally_adjacent(c, n));
        assert!(!Board::<StdRng>::are_orthogonally_adjacent(n, c));
    }
}

#[test]
fn merge_column_of_three() {
    use crate::board::tests::{board, ids, twos};
    let mut board = board(Array2::from_elem((3, 3), 2));
    let path = ids(&board, &[(0, 0), (0, 1), (0, 2)]);
    let report = board.resolve_merge_and_settle(&path, &twos()).unwrap();

    assert_eq!(report.merge.value, 4);
    assert_eq!(report.score(), 2 * 3);
    assert_eq!(report.merge.target.pos, Pos::new(0, 2));
    assert_eq!(report.merge.target.id, path[2]);
    assert_eq!(report.merge.removed.len(), 2);
    assert!(report.collapsed.is_empty());
    let spawned: Vec<_> = report.spawned.iter().map(|t| t.pos).collect();
    assert_eq!(spawned, vec![Pos::new(0, 0), Pos::new(0, 1)]);
    assert!(report.resettled.is_empty());

    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((3, 3), vec![
        2, 2, 2,
        2, 2, 2,
        4, 2, 2,
    ]).unwrap();
    assert_eq!(board.to_array(), expected);
    assert_eq!(board.tile(path[2]).unwrap().pos, Pos::new(0, 2));
    assert!(!board.contains(path[0]));
    assert!(!board.contains(path[1]));
}

#[test]
fn merged_tile_lands_where_drag_ended() {
    use crate::board::tests::{board, ids, twos};
    let mut board = board(Array2::from_elem((3, 3), 2));
    let path = ids(&board, &[(1, 2), (1, 1), (1, 0)]);
    let report = board.resolve_merge_and_settle(&path, &twos()).unwrap();
    assert_eq!(report.merge.target.pos, Pos::new(1, 0));
    assert_eq!(
        report.collapsed,
        vec![Move {
            id: path[2],
            from: Pos::new(1, 0),
            to: Pos::new(1, 2),
        }]
    );
    assert_eq!(board.tile_at(Pos::new(1, 2)).unwrap().value, 4);
}

#[test]
fn merge_across_columns() {
    use crate::board::tests::{board, ids, twos};
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((3, 2), vec![
        8, 16,
        4, 8,
        2, 2,
    ]).unwrap();
    let mut board = board(array);
    let path = ids(&board, &[(0, 2), (1, 2)]);
    let above = ids(&board, &[(0, 0), (0, 1)]);
    let report = board.resolve_merge_and_settle(&path, &twos()).unwrap();
    assert_eq!(
        report.collapsed,
        vec![
            Move {
                id: above[1],
                from: Pos::new(0, 1),
                to: Pos::new(0, 2),
            },
            Move {
                id: above[0],
                from: Pos::new(0, 0),
                to: Pos::new(0, 1),
            },
        ]
    );
    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((3, 2), vec![
        2, 16,
        8, 8,
        4, 4,
    ]).unwrap();
    assert_eq!(board.to_array(), expected);
}

#[test]
fn merge_doubles_once_for_long_chains() {
    use crate::board::tests::{board, ids};
    let mut board = board(Array2::from_elem((1, 5), 2));
    let path = ids(&board, &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]);
    let result = board.resolve_merge(&path).unwrap();
    assert_eq!(result.value, 4);
    assert_eq!(result.score, 10);
    assert_eq!(result.removed.len(), 4);
    assert_eq!(board.empty_cells(), 4);
}

#[test]
fn merge_uses_score_table() {
    use crate::board::tests::{board_with, ids};
    let scores: ScoreTable = vec![(4u32, 100u32)].into_iter().collect();
    let mut board = board_with(
        Array2::from_elem((2, 2), 4),
        scores,
        Gravity::TowardLastRow,
    );
    let path = ids(&board, &[(0, 0), (1, 0), (1, 1)]);
    let result = board.resolve_merge(&path).unwrap();
    assert_eq!(result.value, 8);
    assert_eq!(result.score, 300);
}

#[test]
fn invalid_paths_leave_board_untouched() {
    use crate::board::tests::{board, ids};
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((3, 3), vec![
        2, 2, 4,
        2, 4, 4,
        2, 2, 4,
    ]).unwrap();
    let mut board = board(array.clone());
    let fault = |board: &mut Board, path: &[TileId]| match board.resolve_merge(path) {
        Err(GameError::InvalidSelection(fault)) => fault,
        other => panic!("expected invalid selection, got {:?}", other),
    };

    let single = ids(&board, &[(0, 0)]);
    assert_eq!(fault(&mut board, &single), SelectionFault::TooShort(1));
    assert_eq!(fault(&mut board, &[]), SelectionFault::TooShort(0));

    let mixed = ids(&board, &[(0, 0), (1, 0), (1, 1)]);
    assert!(matches!(
        fault(&mut board, &mixed),
        SelectionFault::ValueMismatch {
            expected: 2,
            found: 4,
            ..
        }
    ));

    let diagonal = ids(&board, &[(0, 1), (1, 2)]);
    assert_eq!(
        fault(&mut board, &diagonal),
        SelectionFault::NotAdjacent(diagonal[1])
    );

    let gap = ids(&board, &[(0, 0), (0, 2)]);
    assert_eq!(fault(&mut board, &gap), SelectionFault::NotAdjacent(gap[1]));

    let repeated = ids(&board, &[(0, 0), (0, 1), (0, 0)]);
    assert_eq!(
        fault(&mut board, &repeated),
        SelectionFault::Repeated(repeated[0])
    );

    assert_eq!(board.to_array(), array);
}

#[test]
fn removed_handles_go_stale() {
    use crate::board::tests::{board, ids};
    let mut board = board(Array2::from_elem((2, 2), 2));
    let path = ids(&board, &[(0, 0), (0, 1)]);
    board.resolve_merge(&path).unwrap();
    assert!(matches!(board.tile(path[0]), Err(GameError::StaleHandle(id)) if id == path[0]));

    let again = vec![path[0], ids(&board, &[(1, 0)])[0]];
    assert!(matches!(
        board.resolve_merge(&again),
        Err(GameError::InvalidSelection(SelectionFault::Stale(id))) if id == path[0]
    ));
}

#[test]
fn merge_overflow_is_rejected() {
    use crate::board::tests::{board, ids};
    let mut board = board(Array2::from_elem((1, 2), 1 << 31));
    let path = ids(&board, &[(0, 0), (1, 0)]);
    assert!(matches!(
        board.resolve_merge(&path),
        Err(GameError::InvalidSelection(SelectionFault::Overflow(_)))
    ));
}

#[test]
fn collapse_toward_last_row() {
    use crate::board::tests::board;
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((4, 3), vec![
        2, 0, 4,
        0, 4, 0,
        8, 0, 0,
        0, 2, 0,
    ]).unwrap();
    let mut board = board(array);
    let moves = board.collapse_columns();
    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((4, 3), vec![
        0, 0, 0,
        0, 0, 0,
        2, 4, 0,
        8, 2, 4,
    ]).unwrap();
    assert_eq!(board.to_array(), expected);
    let moved: Vec<_> = moves.iter().map(|m| (m.from, m.to)).collect();
    assert_eq!(
        moved,
        vec![
            (Pos::new(0, 2), Pos::new(0, 3)),
            (Pos::new(0, 0), Pos::new(0, 2)),
            (Pos::new(1, 1), Pos::new(1, 2)),
            (Pos::new(2, 0), Pos::new(2, 3)),
        ]
    );
    for m in &moves {
        assert_eq!(board.tile(m.id).unwrap().pos, m.to);
    }
    assert!(board.collapse_columns().is_empty());
}

#[test]
fn collapse_toward_first_row() {
    use crate::board::tests::board_with;
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((4, 3), vec![
        2, 0, 4,
        0, 4, 0,
        8, 0, 0,
        0, 2, 0,
    ]).unwrap();
    let mut board = board_with(array, ScoreTable::new(), Gravity::TowardFirstRow);
    board.collapse_columns();
    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((4, 3), vec![
        2, 4, 4,
        8, 2, 0,
        0, 0, 0,
        0, 0, 0,
    ]).unwrap();
    assert_eq!(board.to_array(), expected);
    assert!(board.collapse_columns().is_empty());
}

#[test]
fn spawn_fills_from_spawn_edge() {
    use crate::board::tests::{board, twos};
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((3, 2), vec![
        0, 0,
        0, 4,
        8, 4,
    ]).unwrap();
    let mut board = board(array);
    let spawned = board.spawn_into_empties(&twos());
    let cells: Vec<_> = spawned.iter().map(|t| (t.pos, t.value)).collect();
    assert_eq!(
        cells,
        vec![
            (Pos::new(0, 0), 2),
            (Pos::new(0, 1), 2),
            (Pos::new(1, 0), 2),
        ]
    );
    assert!(board.is_settled());
    assert!(board.spawn_into_empties(&twos()).is_empty());
}

#[test]
fn spawn_toward_first_row_fills_last_rows() {
    use crate::board::tests::{board_with, twos};
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((3, 1), vec![
        8,
        0,
        0,
    ]).unwrap();
    let mut board = board_with(array, ScoreTable::new(), Gravity::TowardFirstRow);
    let rows: Vec<_> = board
        .spawn_into_empties(&twos())
        .iter()
        .map(|t| t.pos.row)
        .collect();
    assert_eq!(rows, vec![2, 1]);
}

#[test]
fn settle_is_idempotent() {
    use crate::board::tests::{board, twos};
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((4, 3), vec![
        2, 0, 4,
        0, 4, 0,
        8, 0, 0,
        0, 2, 0,
    ]).unwrap();
    let mut board = board(array);
    let moves = board.settle(&twos());
    assert_eq!(moves.len(), 4);
    assert!(board.is_settled());
    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((4, 3), vec![
        2, 2, 2,
        2, 2, 2,
        2, 4, 2,
        8, 2, 4,
    ]).unwrap();
    assert_eq!(board.to_array(), expected);
    assert!(board.settle(&twos()).is_empty());
}

#[test]
fn report_events_follow_phase_order() {
    use crate::board::tests::{board, ids, twos};
    #[rustfmt::skip]
    let array = Array2::from_shape_vec((3, 2), vec![
        4, 8,
        2, 2,
        8, 4,
    ]).unwrap();
    let mut board = board(array);
    let path = ids(&board, &[(0, 1), (1, 1)]);
    let report = board.resolve_merge_and_settle(&path, &twos()).unwrap();
    let events = report.events();
    let phases: Vec<_> = events.iter().map(|(phase, _)| *phase).collect();
    let mut sorted = phases.clone();
    sorted.sort();
    assert_eq!(phases, sorted);
    assert_eq!(events[0].1, BoardEvent::Removed(report.merge.removed[0]));
    assert_eq!(events[1].1, BoardEvent::Merged(report.merge.target));
    assert_eq!(
        events.len(),
        2 + report.collapsed.len() + report.spawned.len() + report.resettled.len()
    );
    assert_eq!(report.spawned.len(), 1);
    assert!(board.is_settled());
}
