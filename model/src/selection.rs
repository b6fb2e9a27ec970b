use crate::board::Board;
use crate::tile::{Pos, TileId, TileView};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExtendResult {
    Extended,
    /// Ignored: nothing selectable there. The path is unchanged.
    Rejected,
    /// Adjacent tile with another value. The selection has been dropped.
    Broken,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolutionIntent {
    Resolve(Vec<TileId>),
    Cancel,
}

/// Tiles collected by one drag gesture, in drag order.
#[derive(Clone, Debug, Default)]
pub struct SelectionPath {
    entries: Vec<TileView>,
}

impl SelectionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocated for a board of `cells` cells so extending never reallocates.
    pub fn with_capacity(cells: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cells),
        }
    }

    /// Starts a new path at `pos`. Returns false, leaving the path as it was, if the cell is empty.
    pub fn begin<R>(&mut self, board: &Board<R>, pos: Pos) -> bool {
        match board.tile_at(pos) {
            Some(tile) => {
                self.entries.clear();
                self.entries.push(tile);
                true
            }
            None => false,
        }
    }

    pub fn extend<R>(&mut self, board: &Board<R>, pos: Pos) -> ExtendResult {
        let (first, last) = match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return ExtendResult::Rejected,
        };
        let candidate = match board.tile_at(pos) {
            Some(tile) => tile,
            None => return ExtendResult::Rejected,
        };
        if self.entries.iter().any(|t| t.id == candidate.id)
            || !Board::<R>::are_orthogonally_adjacent(last.pos, candidate.pos)
        {
            return ExtendResult::Rejected;
        }
        if candidate.value != first.value {
            self.entries.clear();
            return ExtendResult::Broken;
        }
        self.entries.push(candidate);
        ExtendResult::Extended
    }

    pub fn finish(&mut self) -> ResolutionIntent {
        let intent = if self.entries.len() >= 2 {
            ResolutionIntent::Resolve(self.current().collect())
        } else {
            ResolutionIntent::Cancel
        };
        self.entries.clear();
        intent
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn current(&self) -> impl Iterator<Item = TileId> + '_ {
        self.entries.iter().map(|t| t.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A single tile is armed but not yet highlighted.
    pub fn is_armed(&self) -> bool {
        self.entries.len() == 1
    }

    pub fn target_value(&self) -> Option<u32> {
        self.entries.first().map(|t| t.value)
    }

    /// Tiles to highlight: empty or at least two.
    pub fn highlighted(&self) -> &[TileView] {
        if self.entries.len() >= 2 {
            &self.entries
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::tests::board;
    use ndarray::Array2;

    #[rustfmt::skip]
    pub fn sample() -> Array2<u32> {
        Array2::from_shape_vec((3, 3), vec![
            2, 2, 4,
            4, 2, 8,
            2, 4, 8,
        ]).unwrap()
    }

    pub fn sample_board() -> crate::board::Board {
        board(sample())
    }
}

#[test]
fn begin_arms_without_highlight() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    assert!(path.begin(&board, Pos::new(0, 0)));
    assert!(path.is_armed());
    assert_eq!(path.target_value(), Some(2));
    assert!(path.highlighted().is_empty());
}

#[test]
fn begin_on_empty_cell_keeps_path() {
    use crate::board::tests::board;
    use ndarray::Array2;
    #[rustfmt::skip]
    let board = board(Array2::from_shape_vec((2, 2), vec![
        0, 2,
        2, 2,
    ]).unwrap());
    let mut path = SelectionPath::new();
    assert!(path.begin(&board, Pos::new(1, 0)));
    assert!(!path.begin(&board, Pos::new(0, 0)));
    assert!(!path.begin(&board, Pos::new(5, 5)));
    assert_eq!(path.target_value(), Some(2));
    assert_eq!(path.len(), 1);
}

#[test]
fn extend_along_same_values() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    path.begin(&board, Pos::new(0, 0));
    assert_eq!(path.extend(&board, Pos::new(1, 0)), ExtendResult::Extended);
    assert_eq!(path.extend(&board, Pos::new(1, 1)), ExtendResult::Extended);
    assert_eq!(path.len(), 3);
    let highlighted: Vec<_> = path.highlighted().iter().map(|t| t.pos).collect();
    assert_eq!(
        highlighted,
        vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(1, 1)]
    );
}

#[test]
fn extend_rejects_diagonal_repeat_and_empty() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    assert_eq!(path.extend(&board, Pos::new(0, 0)), ExtendResult::Rejected);

    path.begin(&board, Pos::new(1, 1));
    assert_eq!(path.extend(&board, Pos::new(0, 2)), ExtendResult::Rejected);
    assert_eq!(path.extend(&board, Pos::new(1, 1)), ExtendResult::Rejected);
    assert_eq!(path.extend(&board, Pos::new(1, 3)), ExtendResult::Rejected);
    assert_eq!(path.len(), 1);

    assert_eq!(path.extend(&board, Pos::new(1, 0)), ExtendResult::Extended);
    assert_eq!(path.extend(&board, Pos::new(1, 1)), ExtendResult::Rejected);
    assert_eq!(path.len(), 2);
}

#[test]
fn extend_rejects_tile_not_adjacent_to_last() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    path.begin(&board, Pos::new(0, 0));
    path.extend(&board, Pos::new(1, 0));
    // (0, 1) neighbours the anchor, not the last tile.
    assert_eq!(path.extend(&board, Pos::new(0, 1)), ExtendResult::Rejected);
    assert_eq!(path.len(), 2);
}

#[test]
fn mismatch_breaks_selection() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    path.begin(&board, Pos::new(2, 0));
    assert_eq!(path.target_value(), Some(4));
    assert_eq!(path.extend(&board, Pos::new(1, 0)), ExtendResult::Broken);
    assert!(path.is_empty());
    assert_eq!(path.current().count(), 0);
    assert_eq!(path.extend(&board, Pos::new(2, 1)), ExtendResult::Rejected);
    assert_eq!(path.finish(), ResolutionIntent::Cancel);
}

#[test]
fn finish_resolves_two_or_more() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    path.begin(&board, Pos::new(2, 1));
    assert_eq!(path.finish(), ResolutionIntent::Cancel);
    assert!(path.is_empty());

    path.begin(&board, Pos::new(2, 1));
    path.extend(&board, Pos::new(2, 2));
    let expected = vec![
        board.tile_at(Pos::new(2, 1)).unwrap().id,
        board.tile_at(Pos::new(2, 2)).unwrap().id,
    ];
    assert_eq!(path.finish(), ResolutionIntent::Resolve(expected));
    assert!(path.is_empty());
    assert!(path.highlighted().is_empty());
}

#[test]
fn finished_path_merges() {
    use crate::board::tests::twos;
    use crate::selection::tests::sample_board;
    let mut board = sample_board();
    let mut path = SelectionPath::with_capacity(9);
    path.begin(&board, Pos::new(2, 1));
    path.extend(&board, Pos::new(2, 2));
    let ids = match path.finish() {
        ResolutionIntent::Resolve(ids) => ids,
        ResolutionIntent::Cancel => panic!("expected a path to resolve"),
    };
    let report = board.resolve_merge_and_settle(&ids, &twos()).unwrap();
    assert_eq!(report.merge.value, 16);
    assert_eq!(report.score(), 16);
    assert_eq!(board.tile_at(Pos::new(2, 2)).unwrap().value, 16);
}

#[test]
fn clear_empties_path() {
    use crate::selection::tests::sample_board;
    let board = sample_board();
    let mut path = SelectionPath::new();
    path.begin(&board, Pos::new(0, 0));
    path.extend(&board, Pos::new(1, 0));
    path.clear();
    assert!(path.is_empty());
    assert_eq!(path.target_value(), None);
}
