//! Property tests for the board and selection invariants.
//!
//! Invariants covered:
//! - A freshly initialized board is full, settled, and only holds spawn values.
//! - Collapsing keeps each column's tile order, leaves no gap under a tile,
//!   and a second collapse is a no-op.
//! - Any drag that resolves merges into one doubled tile, removes exactly
//!   `len - 1` tiles, refills them, and leaves every handle in one cell.
//! - Adjacency is symmetric.

use std::collections::HashSet;

use model::{
    Board, ExtendResult, Gravity, Pos, ResolutionIntent, ScoreTable, SelectionPath, SpawnValues,
};
use ndarray::Array2;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn values_array(rows: usize, columns: usize, exponents: &[u32]) -> Array2<u32> {
    Array2::from_shape_fn((rows, columns), |(row, col)| {
        match exponents[row * columns + col] {
            0 => 0,
            e => 1 << e,
        }
    })
}

fn column(board: &Board, col: usize) -> Vec<u32> {
    (0..board.rows())
        .filter_map(|row| board.tile_at(Pos::new(col, row)))
        .map(|t| t.value)
        .collect()
}

fn assert_compact(board: &Board) {
    let rows = board.rows();
    for col in 0..board.columns() {
        let mut seen_tile = false;
        for depth in (0..rows).rev() {
            let occupied = board
                .tile_at(Pos::new(col, board.gravity().row_at(rows, depth)))
                .is_some();
            assert!(!(seen_tile && !occupied), "gap under a tile in column {}", col);
            seen_tile |= occupied;
        }
    }
}

fn assert_consistent(board: &Board) {
    let mut ids = HashSet::new();
    for tile in board.tiles() {
        assert!(ids.insert(tile.id), "{} held twice", tile.id);
        assert_eq!(board.locate(tile.id), Some(tile.pos));
    }
}

fn drag(board: &Board, start: Pos, turns: &[u8]) -> SelectionPath {
    let mut path = SelectionPath::new();
    assert!(path.begin(board, start));
    let mut at = start;
    for &turn in turns {
        let next = match turn % 4 {
            0 => Pos::new(at.col + 1, at.row),
            1 => Pos::new(at.col, at.row + 1),
            2 if at.col > 0 => Pos::new(at.col - 1, at.row),
            3 if at.row > 0 => Pos::new(at.col, at.row - 1),
            _ => continue,
        };
        match path.extend(board, next) {
            ExtendResult::Extended => at = next,
            ExtendResult::Rejected => {}
            ExtendResult::Broken => break,
        }
        let highlighted = path.highlighted().len();
        assert!(highlighted == 0 || highlighted >= 2);
    }
    path
}

proptest! {
    #[test]
    fn initialized_board_is_settled(
        seed in any::<u64>(),
        rows in 1usize..9,
        columns in 1usize..9,
    ) {
        let spawn = SpawnValues::default();
        let mut board = Board::initialize(
            rows,
            columns,
            &spawn,
            ScoreTable::new(),
            Gravity::TowardLastRow,
            StdRng::seed_from_u64(seed),
        ).unwrap();
        prop_assert!(board.is_settled());
        prop_assert!(board.tiles().all(|t| spawn.values().contains(&t.value)));
        assert_consistent(&board);
        prop_assert!(board.collapse_columns().is_empty());
        prop_assert!(board.settle(&spawn).is_empty());
    }

    #[test]
    fn collapse_compacts_and_keeps_order(
        rows in 1usize..7,
        columns in 1usize..7,
        exponents in prop::collection::vec(0u32..6, 36),
        first_row in any::<bool>(),
    ) {
        let gravity = if first_row { Gravity::TowardFirstRow } else { Gravity::TowardLastRow };
        let mut board = Board::from_array(
            values_array(rows, columns, &exponents),
            ScoreTable::new(),
            gravity,
            StdRng::seed_from_u64(0),
        ).unwrap();
        let before: Vec<_> = (0..columns).map(|c| column(&board, c)).collect();
        let moves = board.collapse_columns();
        let after: Vec<_> = (0..columns).map(|c| column(&board, c)).collect();
        prop_assert_eq!(before, after);
        assert_compact(&board);
        assert_consistent(&board);
        for m in &moves {
            prop_assert_eq!(m.from.col, m.to.col);
            prop_assert_ne!(m.from.row, m.to.row);
            prop_assert_eq!(board.locate(m.id), Some(m.to));
        }
        prop_assert!(board.collapse_columns().is_empty());
    }

    #[test]
    fn drags_merge_and_settle(
        seed in any::<u64>(),
        rows in 1usize..7,
        columns in 1usize..7,
        drags in prop::collection::vec((0usize..36, prop::collection::vec(any::<u8>(), 0..12)), 1..10),
        first_row in any::<bool>(),
    ) {
        let gravity = if first_row { Gravity::TowardFirstRow } else { Gravity::TowardLastRow };
        let spawn = SpawnValues::new(vec![2, 4]).unwrap();
        let mut board = Board::initialize(
            rows,
            columns,
            &spawn,
            ScoreTable::new(),
            gravity,
            StdRng::seed_from_u64(seed),
        ).unwrap();
        for (start, turns) in drags {
            let start = Pos::new(start % columns, (start / columns) % rows);
            let value = board.tile_at(start).unwrap().value;
            let mut path = drag(&board, start, &turns);
            let ids = match path.finish() {
                ResolutionIntent::Resolve(ids) => ids,
                ResolutionIntent::Cancel => continue,
            };
            prop_assert!(path.is_empty());
            let report = board.resolve_merge_and_settle(&ids, &spawn).unwrap();
            prop_assert_eq!(report.merge.value, value * 2);
            prop_assert_eq!(report.score(), value as u64 * ids.len() as u64);
            prop_assert_eq!(report.merge.removed.len(), ids.len() - 1);
            prop_assert_eq!(report.spawned.len(), ids.len() - 1);
            prop_assert!(ids[..ids.len() - 1].iter().all(|id| !board.contains(*id)));
            prop_assert_eq!(board.tile(ids[ids.len() - 1]).unwrap().value, value * 2);
            prop_assert!(board.is_settled());
            assert_consistent(&board);
            prop_assert!(board.settle(&spawn).is_empty());
        }
    }

    #[test]
    fn adjacency_is_symmetric(
        a in (0usize..10, 0usize..10),
        b in (0usize..10, 0usize..10),
    ) {
        let (a, b) = (Pos::new(a.0, a.1), Pos::new(b.0, b.1));
        let ab = Board::<StdRng>::are_orthogonally_adjacent(a, b);
        prop_assert_eq!(ab, Board::<StdRng>::are_orthogonally_adjacent(b, a));
        if a == b || (a.col != b.col && a.row != b.row) {
            prop_assert!(!ab);
        }
    }
}
