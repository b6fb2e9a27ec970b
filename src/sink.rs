use model::{SettleReport, TileView};

/// Receives the score of every successful merge.
pub trait ScoreSink {
    fn add_score(&mut self, delta: u64);
}

/// Receives what a view needs to redraw. Animation is entirely the sink's business.
pub trait PresentationSink {
    /// Current highlight set, sent after every selection change. Empty or at least two tiles.
    fn highlight(&mut self, tiles: &[TileView]);
    fn board_changed(&mut self, report: &SettleReport);
    fn board_reset(&mut self, _tiles: &[TileView]) {}
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    fn add_score(&mut self, delta: u64) {
        (**self).add_score(delta)
    }
}

impl<P: PresentationSink + ?Sized> PresentationSink for &mut P {
    fn highlight(&mut self, tiles: &[TileView]) {
        (**self).highlight(tiles)
    }
    fn board_changed(&mut self, report: &SettleReport) {
        (**self).board_changed(report)
    }
    fn board_reset(&mut self, tiles: &[TileView]) {
        (**self).board_reset(tiles)
    }
}

/// Running total.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ScoreCounter {
    total: u64,
}

impl ScoreCounter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn total(&self) -> u64 {
        self.total
    }
    pub fn reset(&mut self) {
        self.total = 0;
    }
}

impl ScoreSink for ScoreCounter {
    fn add_score(&mut self, delta: u64) {
        self.total += delta;
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoPresentation;

impl PresentationSink for NoPresentation {
    fn highlight(&mut self, _tiles: &[TileView]) {}
    fn board_changed(&mut self, _report: &SettleReport) {}
}

#[test]
fn counter_accumulates_through_reference() {
    fn feed<S: ScoreSink>(mut sink: S) {
        sink.add_score(6);
        sink.add_score(10);
    }
    let mut counter = ScoreCounter::new();
    feed(&mut counter);
    assert_eq!(counter.total(), 16);
    counter.reset();
    assert_eq!(counter.total(), 0);
}
