//! Game session for the chain-merge puzzle: turns press/drag/release input into
//! selection and merge calls on a [`model::Board`], and hands the results to the
//! injected score and presentation sinks.

pub mod game;
pub mod sink;

pub use game::{Game, InputEvent, Outcome};
pub use model;
pub use sink::{NoPresentation, PresentationSink, ScoreCounter, ScoreSink};
