use std::collections::HashMap;
use std::iter::FromIterator;

#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Deserialize)]
pub struct ScoreMapping {
    pub value: u32,
    pub base_score: u32,
}

/// Base score per tile value. Values without a mapping score their own value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScoreTable(HashMap<u32, u32>);

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, value: u32) -> u64 {
        self.0.get(&value).copied().unwrap_or(value) as u64
    }

    /// Score for merging `count` tiles of `value`.
    pub fn score(&self, value: u32, count: usize) -> u64 {
        self.get(value) * count as u64
    }
}

impl FromIterator<ScoreMapping> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = ScoreMapping>>(iter: I) -> Self {
        Self(iter.into_iter().map(|m| (m.value, m.base_score)).collect())
    }
}

impl FromIterator<(u32, u32)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[test]
fn missing_values_score_themselves() {
    let table = ScoreTable::new();
    assert_eq!(table.get(2), 2);
    assert_eq!(table.get(64), 64);
    assert_eq!(table.score(8, 3), 24);
}

#[test]
fn mapped_values_use_base_score() {
    let table: ScoreTable = vec![
        ScoreMapping {
            value: 2,
            base_score: 10,
        },
        ScoreMapping {
            value: 4,
            base_score: 25,
        },
    ]
    .into_iter()
    .collect();
    assert_eq!(table.get(2), 10);
    assert_eq!(table.score(4, 5), 125);
    assert_eq!(table.score(8, 2), 16);
}
