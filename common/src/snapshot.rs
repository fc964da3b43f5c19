use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Health a wall is drawn with when the snapshot carries no entry for it.
pub const FULL_WALL_HEALTH: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Eight-way facing of a tank or shell. Encoded on the wire as 0..=7,
/// clockwise from `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpRight | Direction::DownRight | Direction::DownLeft | Direction::UpLeft
        )
    }
}

impl TryFrom<u8> for Direction {
    type Error = SnapshotError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(code as usize)
            .copied()
            .ok_or(SnapshotError::InvalidDirection(code))
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction.code()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    Empty,
    Wall,
    Mine,
    /// Board hint for a tank; player id in 1..=9.
    Tank(u8),
}

impl CellType {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "EMPTY" => Some(CellType::Empty),
            "WALL" => Some(CellType::Wall),
            "MINE" => Some(CellType::Mine),
            _ => {
                let player: u8 = name.strip_prefix("TANK")?.parse().ok()?;
                (1..=9).contains(&player).then_some(CellType::Tank(player))
            }
        }
    }
}

/// Name-to-code table shipped next to the snapshots. Any name the producer
/// leaves out keeps its default code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, i32>", into = "BTreeMap<String, i32>")]
pub struct CellTypeTable {
    by_code: HashMap<i32, CellType>,
    names: BTreeMap<String, i32>,
}

impl CellTypeTable {
    pub fn classify(&self, code: i32) -> Option<CellType> {
        self.by_code.get(&code).copied()
    }

    pub fn code_of(&self, name: &str) -> Option<i32> {
        self.names.get(name).copied()
    }

    fn default_names() -> BTreeMap<String, i32> {
        let mut names = BTreeMap::new();
        names.insert("EMPTY".to_string(), 0);
        names.insert("WALL".to_string(), 1);
        names.insert("MINE".to_string(), 2);
        for player in 1..=9 {
            names.insert(format!("TANK{player}"), 2 + player);
        }
        names
    }
}

impl Default for CellTypeTable {
    fn default() -> Self {
        Self::from(BTreeMap::new())
    }
}

impl From<BTreeMap<String, i32>> for CellTypeTable {
    fn from(supplied: BTreeMap<String, i32>) -> Self {
        let mut names = Self::default_names();
        names.extend(supplied);

        let by_code = names
            .iter()
            .filter_map(|(name, &code)| CellType::from_name(name).map(|cell| (code, cell)))
            .collect();

        Self { by_code, names }
    }
}

impl From<CellTypeTable> for BTreeMap<String, i32> {
    fn from(table: CellTypeTable) -> Self {
        table.names
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tank {
    pub player_id: u32,
    pub position: Position,
    pub direction: Direction,
    #[serde(default)]
    pub destroyed: bool,
    #[serde(default)]
    pub remaining_shells: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shell {
    pub player_id: u32,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default)]
    pub destroyed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallHealth {
    pub x: i32,
    pub y: i32,
    pub health: u8,
}

fn no_countdown() -> i32 {
    -1
}

/// One recorded game state. `board` is row-major: `board[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub step: u32,
    #[serde(default)]
    pub message: String,
    #[serde(default = "no_countdown")]
    pub countdown: i32,
    pub board: Vec<Vec<i32>>,
    #[serde(default)]
    pub tanks: Vec<Tank>,
    #[serde(default)]
    pub shells: Vec<Shell>,
    #[serde(default)]
    pub wall_health: Vec<WallHealth>,
}

impl Snapshot {
    pub fn height(&self) -> usize {
        self.board.len()
    }

    pub fn width(&self) -> usize {
        self.board.first().map(Vec::len).unwrap_or(0)
    }

    pub fn wall_health_lookup(&self) -> HashMap<(i32, i32), u8> {
        self.wall_health
            .iter()
            .map(|wall| ((wall.x, wall.y), wall.health))
            .collect()
    }

    /// The message is worth showing in the action log: not blank and not the
    /// generic `Step N` filler the simulator emits.
    pub fn has_meaningful_message(&self) -> bool {
        let trimmed = self.message.trim();
        !trimmed.is_empty() && self.message != format!("Step {}", self.step)
    }
}

/// The full snapshot feed for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub cell_types: CellTypeTable,
}

impl GameData {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            cell_types: CellTypeTable::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let data: GameData = serde_json::from_str(json)?;
        if !data.steps_ascending() {
            log::warn!(
                "snapshot steps are not in ascending order ({} snapshots)",
                data.snapshots.len()
            );
        }
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn final_step(&self) -> u32 {
        self.snapshots.last().map(|s| s.step).unwrap_or(0)
    }

    fn steps_ascending(&self) -> bool {
        self.snapshots.windows(2).all(|pair| pair[0].step <= pair[1].step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_codes_round_trip_through_serde() {
        let tank: Tank = serde_json::from_str(
            r#"{"playerId":1,"position":{"x":2,"y":3},"direction":5,"remainingShells":16,"destroyed":false}"#,
        )
        .unwrap();
        assert_eq!(tank.direction, Direction::DownLeft);
        assert!(tank.direction.is_diagonal());

        let bad = serde_json::from_str::<Tank>(
            r#"{"playerId":1,"position":{"x":0,"y":0},"direction":8}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn partial_cell_table_keeps_default_codes() {
        let data = GameData::from_json(
            r#"{
                "snapshots": [{"step": 0, "board": [[0, 1, 2, 3]]}],
                "cellTypes": {"EMPTY": 0, "WALL": 1, "MINE": 2, "TANK1": 3, "TANK2": 4}
            }"#,
        )
        .unwrap();

        let table = &data.cell_types;
        assert_eq!(table.classify(1), Some(CellType::Wall));
        assert_eq!(table.classify(4), Some(CellType::Tank(2)));
        assert_eq!(table.classify(11), Some(CellType::Tank(9)));
        assert_eq!(table.classify(42), None);
        assert_eq!(table.code_of("TANK9"), Some(11));
    }

    #[test]
    fn snapshot_defaults_when_fields_missing() {
        let data = GameData::from_json(r#"{"snapshots": [{"step": 4, "board": []}]}"#).unwrap();
        let snapshot = &data.snapshots[0];

        assert_eq!(snapshot.countdown, -1);
        assert!(snapshot.message.is_empty());
        assert_eq!(snapshot.width(), 0);
        assert_eq!(data.final_step(), 4);
    }

    #[test]
    fn step_filler_is_not_meaningful() {
        let mut snapshot = Snapshot {
            step: 3,
            message: "Step 3".to_string(),
            countdown: -1,
            board: vec![],
            tanks: vec![],
            shells: vec![],
            wall_health: vec![],
        };
        assert!(!snapshot.has_meaningful_message());

        snapshot.message = "Player 2 tank destroyed".to_string();
        assert!(snapshot.has_meaningful_message());
    }
}
