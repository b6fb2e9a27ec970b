use model::{
    Board, ExtendResult, GameConfig, Pos, ResolutionIntent, Result, SelectionPath, SettleReport,
    SpawnValues, TileView,
};
use rand::rngs::StdRng;
use rand::Rng;

use crate::sink::{PresentationSink, ScoreSink};

/// Pointer input already resolved to board cells.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InputEvent {
    PressAt(Pos),
    DragOver(Pos),
    Release,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Nothing changed.
    Ignored,
    Armed,
    Extended,
    /// Dragged onto a different value; the selection was dropped.
    Broken,
    Cancelled,
    Merged(SettleReport),
}

/// One game session: a board, the drag in progress, and where results go.
pub struct Game<S, P, R = StdRng> {
    board: Board<R>,
    spawn: SpawnValues,
    selection: SelectionPath,
    scores: S,
    presenter: P,
}

impl<S, P, R> Game<S, P, R>
where
    S: ScoreSink,
    P: PresentationSink,
    R: Rng,
{
    pub fn new(config: &GameConfig, rng: R, scores: S, presenter: P) -> Result<Self> {
        let board = Board::from_config(config, rng)?;
        Ok(Self::from_board(board, config.spawn_values()?, scores, presenter))
    }

    pub fn from_board(board: Board<R>, spawn: SpawnValues, scores: S, presenter: P) -> Self {
        let selection = SelectionPath::with_capacity(board.rows() * board.columns());
        Self {
            board,
            spawn,
            selection,
            scores,
            presenter,
        }
    }

    /// Feeds one input event. The board only changes on a release that resolves a path.
    pub fn handle(&mut self, event: InputEvent) -> Result<Outcome> {
        let outcome = match event {
            InputEvent::PressAt(pos) => {
                if !self.selection.begin(&self.board, pos) {
                    return Ok(Outcome::Ignored);
                }
                Outcome::Armed
            }
            InputEvent::DragOver(pos) => match self.selection.extend(&self.board, pos) {
                ExtendResult::Extended => Outcome::Extended,
                ExtendResult::Rejected => return Ok(Outcome::Ignored),
                ExtendResult::Broken => Outcome::Broken,
            },
            InputEvent::Release => return self.release(),
        };
        self.presenter.highlight(self.selection.highlighted());
        Ok(outcome)
    }

    fn release(&mut self) -> Result<Outcome> {
        let intent = self.selection.finish();
        self.presenter.highlight(&[]);
        let path = match intent {
            ResolutionIntent::Resolve(path) => path,
            ResolutionIntent::Cancel => return Ok(Outcome::Cancelled),
        };
        let report = self
            .board
            .resolve_merge_and_settle(&path, &self.spawn)
            .map_err(|e| {
                log::warn!("discarding selection of {} tiles: {}", path.len(), e);
                e
            })?;
        self.scores.add_score(report.score());
        self.presenter.board_changed(&report);
        Ok(Outcome::Merged(report))
    }

    /// Starts over on a freshly spawned board. The score sink is left alone.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.board.reset(&self.spawn);
        self.presenter.highlight(&[]);
        let tiles: Vec<TileView> = self.board.tiles().collect();
        self.presenter.board_reset(&tiles);
        log::info!("board reset");
    }
}

impl<S, P, R> Game<S, P, R> {
    pub fn board(&self) -> &Board<R> {
        &self.board
    }

    pub fn selection(&self) -> &SelectionPath {
        &self.selection
    }

    pub fn spawn_values(&self) -> &SpawnValues {
        &self.spawn
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::Game;
    use crate::sink::{PresentationSink, ScoreCounter};
    use model::{Board, GameConfig, Gravity, Pos, ScoreTable, SettleReport, SpawnValues, TileView};
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    pub struct Recorder {
        pub highlights: Vec<Vec<Pos>>,
        pub reports: Vec<SettleReport>,
        pub resets: usize,
    }

    impl PresentationSink for Recorder {
        fn highlight(&mut self, tiles: &[TileView]) {
            self.highlights.push(tiles.iter().map(|t| t.pos).collect());
        }
        fn board_changed(&mut self, report: &SettleReport) {
            self.reports.push(report.clone());
        }
        fn board_reset(&mut self, tiles: &[TileView]) {
            assert!(!tiles.is_empty());
            self.resets += 1;
        }
    }

    pub type TestGame = Game<ScoreCounter, Recorder>;

    pub fn twos(rows: usize, columns: usize) -> TestGame {
        let config = GameConfig {
            rows,
            columns,
            spawn_values: vec![2],
            ..GameConfig::default()
        };
        Game::new(
            &config,
            StdRng::seed_from_u64(3),
            ScoreCounter::new(),
            Recorder::default(),
        )
        .unwrap()
    }

    pub fn from_array(array: Array2<u32>) -> TestGame {
        let board = Board::from_array(
            array,
            ScoreTable::new(),
            Gravity::TowardLastRow,
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        Game::from_board(
            board,
            SpawnValues::new(vec![2]).unwrap(),
            ScoreCounter::new(),
            Recorder::default(),
        )
    }
}

#[test]
fn drag_down_a_column_and_release() {
    use crate::game::tests::twos;
    use InputEvent::*;
    let mut game = twos(3, 3);
    let path: Vec<_> = (0..3)
        .map(|row| game.board().tile_at(Pos::new(0, row)).unwrap().id)
        .collect();

    assert_eq!(game.handle(PressAt(Pos::new(0, 0))).unwrap(), Outcome::Armed);
    assert_eq!(game.handle(DragOver(Pos::new(0, 1))).unwrap(), Outcome::Extended);
    assert_eq!(game.handle(DragOver(Pos::new(0, 2))).unwrap(), Outcome::Extended);
    let report = match game.handle(Release).unwrap() {
        Outcome::Merged(report) => report,
        other => panic!("expected a merge, got {:?}", other),
    };

    assert_eq!(report.merge.value, 4);
    assert_eq!(report.merge.target.id, path[2]);
    assert_eq!(game.scores().total(), 6);
    assert_eq!(game.board().tile_at(Pos::new(0, 2)).unwrap().value, 4);
    assert!(game.board().is_settled());
    assert!(game.selection().is_empty());

    let highlights = &game.presenter().highlights;
    assert_eq!(highlights.len(), 4);
    assert!(highlights[0].is_empty());
    assert_eq!(highlights[1], vec![Pos::new(0, 0), Pos::new(0, 1)]);
    assert_eq!(highlights[2].len(), 3);
    assert!(highlights[3].is_empty());
    assert_eq!(game.presenter().reports, vec![report]);
}

#[test]
fn stray_input_is_ignored() {
    use crate::game::tests::twos;
    use InputEvent::*;
    let mut game = twos(2, 2);
    let before = game.board().to_array();
    assert_eq!(game.handle(DragOver(Pos::new(1, 0))).unwrap(), Outcome::Ignored);
    assert_eq!(game.handle(PressAt(Pos::new(4, 4))).unwrap(), Outcome::Ignored);
    assert_eq!(game.handle(Release).unwrap(), Outcome::Cancelled);

    game.handle(PressAt(Pos::new(0, 0))).unwrap();
    assert_eq!(game.handle(DragOver(Pos::new(1, 1))).unwrap(), Outcome::Ignored);
    assert_eq!(game.handle(DragOver(Pos::new(0, 0))).unwrap(), Outcome::Ignored);
    assert_eq!(game.handle(Release).unwrap(), Outcome::Cancelled);

    assert_eq!(game.board().to_array(), before);
    assert_eq!(game.scores().total(), 0);
    assert!(game.presenter().reports.is_empty());
}

#[test]
fn mismatched_value_breaks_the_drag() {
    use crate::game::tests::from_array;
    use ndarray::Array2;
    use InputEvent::*;
    #[rustfmt::skip]
    let mut game = from_array(Array2::from_shape_vec((2, 2), vec![
        4, 2,
        4, 2,
    ]).unwrap());
    game.handle(PressAt(Pos::new(0, 0))).unwrap();
    assert_eq!(game.handle(DragOver(Pos::new(0, 1))).unwrap(), Outcome::Extended);
    assert_eq!(game.handle(DragOver(Pos::new(1, 1))).unwrap(), Outcome::Broken);
    assert!(game.selection().is_empty());
    assert!(game.presenter().highlights.last().unwrap().is_empty());
    assert_eq!(game.handle(DragOver(Pos::new(1, 0))).unwrap(), Outcome::Ignored);
    assert_eq!(game.handle(Release).unwrap(), Outcome::Cancelled);
    assert_eq!(game.scores().total(), 0);

    game.handle(PressAt(Pos::new(1, 1))).unwrap();
    game.handle(DragOver(Pos::new(1, 0))).unwrap();
    assert!(matches!(game.handle(Release).unwrap(), Outcome::Merged(_)));
    assert_eq!(game.scores().total(), 4);
    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((2, 2), vec![
        4, 2,
        4, 4,
    ]).unwrap();
    assert_eq!(game.board().to_array(), expected);
}

#[test]
fn scores_accumulate_across_merges() {
    use crate::game::tests::twos;
    use ndarray::Array2;
    use InputEvent::*;
    let mut game = twos(2, 4);
    for &(from, to) in &[((0, 1), (1, 1)), ((3, 1), (2, 1)), ((1, 1), (2, 1))] {
        game.handle(PressAt(Pos::new(from.0, from.1))).unwrap();
        game.handle(DragOver(Pos::new(to.0, to.1))).unwrap();
        assert!(matches!(game.handle(Release).unwrap(), Outcome::Merged(_)));
    }
    // The last drag joins the two 4s made by the first two.
    assert_eq!(game.scores().total(), 4 + 4 + 8);
    #[rustfmt::skip]
    let expected = Array2::from_shape_vec((2, 4), vec![
        2, 2, 2, 2,
        2, 2, 8, 2,
    ]).unwrap();
    assert_eq!(game.board().to_array(), expected);
    assert_eq!(game.presenter().reports.len(), 3);
}

#[test]
fn reset_keeps_score_and_drops_selection() {
    use crate::game::tests::twos;
    use ndarray::Array2;
    use InputEvent::*;
    let mut game = twos(3, 3);
    game.handle(PressAt(Pos::new(0, 2))).unwrap();
    game.handle(DragOver(Pos::new(1, 2))).unwrap();
    game.handle(Release).unwrap();
    let old: Vec<_> = game.board().tiles().map(|t| t.id).collect();

    game.handle(PressAt(Pos::new(0, 0))).unwrap();
    game.reset();
    assert!(game.selection().is_empty());
    assert_eq!(game.presenter().resets, 1);
    assert_eq!(game.scores().total(), 4);
    assert!(old.iter().all(|id| !game.board().contains(*id)));
    assert_eq!(game.board().to_array(), Array2::from_elem((3, 3), 2));
}

#[test]
fn bad_config_is_refused() {
    use crate::sink::{NoPresentation, ScoreCounter};
    use rand::SeedableRng;
    let config = GameConfig {
        columns: 0,
        ..GameConfig::default()
    };
    let result = Game::new(
        &config,
        StdRng::seed_from_u64(0),
        ScoreCounter::new(),
        NoPresentation,
    );
    assert!(matches!(result, Err(model::GameError::Configuration(_))));
}
