use std::path::Path;

use rand::Rng;

use crate::error::{GameError, Result};
use crate::score::{ScoreMapping, ScoreTable};
use crate::tile::Tile;

/// Direction tiles fall in. New tiles enter from the opposite edge.
#[derive(Copy, Clone, Debug, Eq, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    TowardLastRow,
    TowardFirstRow,
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity::TowardLastRow
    }
}

impl Gravity {
    /// Row at `depth` cells away from the landing edge.
    pub fn row_at(self, rows: usize, depth: usize) -> usize {
        match self {
            Gravity::TowardLastRow => rows - 1 - depth,
            Gravity::TowardFirstRow => depth,
        }
    }
}

/// Non-empty set of values a new tile may take.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpawnValues(Vec<u32>);

impl SpawnValues {
    pub fn new(values: Vec<u32>) -> Result<Self> {
        if values.is_empty() {
            return Err(GameError::Configuration(
                "spawn values must not be empty".into(),
            ));
        }
        if let Some(v) = values.iter().find(|v| !is_tile_value(**v)) {
            return Err(GameError::Configuration(format!(
                "spawn value {} is not a power of two >= 2",
                v
            )));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    /// Uniform draw.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.0[rng.gen_range(0..self.0.len())]
    }
}

impl Default for SpawnValues {
    fn default() -> Self {
        Self(defaults::spawn_values())
    }
}

pub(crate) fn is_tile_value(v: u32) -> bool {
    v >= 2 && v.is_power_of_two()
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct GameConfig {
    #[serde(default = "defaults::rows")]
    pub rows: usize,
    #[serde(default = "defaults::columns")]
    pub columns: usize,
    #[serde(default = "defaults::spawn_values")]
    pub spawn_values: Vec<u32>,
    #[serde(default)]
    pub score_mappings: Vec<ScoreMapping>,
    #[serde(default)]
    pub gravity: Gravity,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: defaults::rows(),
            columns: defaults::columns(),
            spawn_values: defaults::spawn_values(),
            score_mappings: Vec::new(),
            gravity: Gravity::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.rows, self.columns)?;
        self.spawn_values()?;
        if let Some(m) = self
            .score_mappings
            .iter()
            .find(|m| !is_tile_value(m.value))
        {
            return Err(GameError::Configuration(format!(
                "score mapping for {} is not a tile value",
                m.value
            )));
        }
        Ok(())
    }

    pub fn spawn_values(&self) -> Result<SpawnValues> {
        SpawnValues::new(self.spawn_values.clone())
    }

    pub fn score_table(&self) -> ScoreTable {
        self.score_mappings.iter().copied().collect()
    }
}

pub(crate) fn check_dimensions(rows: usize, columns: usize) -> Result<()> {
    if rows == 0 || columns == 0 {
        return Err(GameError::Configuration(format!(
            "board must be at least 1x1, got {} rows x {} columns",
            rows, columns
        )));
    }
    let limit = isize::MAX as usize / std::mem::size_of::<Option<Tile>>();
    match rows.checked_mul(columns) {
        Some(cells) if cells <= limit => Ok(()),
        _ => Err(GameError::Configuration(format!(
            "board of {} rows x {} columns is too large",
            rows, columns
        ))),
    }
}

mod defaults {
    pub fn rows() -> usize { 8 }
    pub fn columns() -> usize { 8 }
    pub fn spawn_values() -> Vec<u32> { vec![2, 4, 8, 16] }
}

#[test]
fn empty_toml_takes_defaults() {
    let cfg = GameConfig::from_toml_str("").unwrap();
    assert_eq!(cfg, GameConfig::default());
    assert_eq!(cfg.spawn_values().unwrap().values(), &[2, 4, 8, 16]);
    assert_eq!(cfg.gravity, Gravity::TowardLastRow);
}

#[test]
fn toml_overrides() {
    let cfg = GameConfig::from_toml_str(
        r#"
        rows = 5
        columns = 6
        spawn_values = [2, 4]
        gravity = "toward_first_row"

        [[score_mappings]]
        value = 2
        base_score = 10
        "#,
    )
    .unwrap();
    assert_eq!((cfg.rows, cfg.columns), (5, 6));
    assert_eq!(cfg.gravity, Gravity::TowardFirstRow);
    assert_eq!(cfg.score_table().score(2, 3), 30);
    assert_eq!(cfg.score_table().score(4, 3), 12);
}

#[test]
fn bad_config_is_rejected() {
    for text in &[
        "rows = 0",
        "columns = 0",
        "spawn_values = []",
        "spawn_values = [2, 3]",
        "spawn_values = [1]",
        "[[score_mappings]]\nvalue = 6\nbase_score = 1",
        "rows = 4294967296\ncolumns = 4294967296",
        "rows = 4611686018427387904\ncolumns = 1",
    ] {
        match GameConfig::from_toml_str(text) {
            Err(GameError::Configuration(_)) => {}
            other => panic!("{:?} accepted: {:?}", text, other),
        }
    }
    assert!(matches!(
        GameConfig::from_toml_str("rows = -1"),
        Err(GameError::Toml(_))
    ));
}

#[test]
fn toml_file_is_read() {
    use std::io::Write;
    use tempfile::NamedTempFile;
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "rows = 3\ncolumns = 4\nspawn_values = [4]").unwrap();
    let cfg = GameConfig::from_toml(file.path()).unwrap();
    assert_eq!((cfg.rows, cfg.columns), (3, 4));
    assert_eq!(cfg.spawn_values().unwrap().values(), &[4]);

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        GameConfig::from_toml(dir.path().join("missing.toml")),
        Err(GameError::Io(_))
    ));
}

#[test]
fn gravity_rows() {
    assert_eq!(Gravity::TowardLastRow.row_at(4, 0), 3);
    assert_eq!(Gravity::TowardLastRow.row_at(4, 3), 0);
    assert_eq!(Gravity::TowardFirstRow.row_at(4, 0), 0);
    assert_eq!(Gravity::TowardFirstRow.row_at(4, 3), 3);
}
