use std::fmt;

use crate::snapshot::{CellType, Direction, FULL_WALL_HEALTH, GameData, Snapshot};

/// Pixel size of one board cell in the browser grid.
pub const CELL_PX: u32 = 30;
const CANNON_THICKNESS_PX: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Empty,
    Wall { health: u8 },
    Mine,
}

/// Pivot used when a diagonal barrel is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannonOrigin {
    LeftCenter,
    RightCenter,
}

/// Placement of a tank's barrel inside its cell, relative to the cell's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannonGeometry {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    pub rotation_deg: i32,
    pub origin: Option<CannonOrigin>,
}

impl CannonGeometry {
    pub fn for_direction(direction: Direction, cell_px: u32) -> Self {
        let half = cell_px / 2;
        let center = half as i32;
        let thick = CANNON_THICKNESS_PX;
        let offset = (thick / 2) as i32;
        // Diagonal barrels cover the same visual reach along the 45° line.
        let diagonal = (half as f64 * std::f64::consts::SQRT_2).round() as u32;

        let straight = |width, height, left, top| CannonGeometry {
            width,
            height,
            left,
            top,
            rotation_deg: 0,
            origin: None,
        };
        let slanted = |left, rotation_deg, origin| CannonGeometry {
            width: diagonal,
            height: thick,
            left,
            top: center - offset,
            rotation_deg,
            origin: Some(origin),
        };

        match direction {
            Direction::Up => straight(thick, half, center - offset, 0),
            Direction::Right => straight(half, thick, center, center - offset),
            Direction::Down => straight(thick, half, center - offset, center),
            Direction::Left => straight(half, thick, center - half as i32, center - offset),
            Direction::UpRight => slanted(center, -45, CannonOrigin::LeftCenter),
            Direction::DownRight => slanted(center, 45, CannonOrigin::LeftCenter),
            Direction::DownLeft => {
                slanted(center - diagonal as i32, -45, CannonOrigin::RightCenter)
            }
            Direction::UpLeft => slanted(center - diagonal as i32, 45, CannonOrigin::RightCenter),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankMarker {
    pub player_id: u32,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFrame {
    pub terrain: Terrain,
    pub tank: Option<TankMarker>,
    /// Owners of the live shells in this cell.
    pub shells: Vec<u32>,
}

impl CellFrame {
    fn empty() -> Self {
        Self {
            terrain: Terrain::Empty,
            tank: None,
            shells: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFrame {
    pub width: usize,
    pub height: usize,
    cells: Vec<CellFrame>,
}

impl BoardFrame {
    pub fn get(&self, x: usize, y: usize) -> Option<&CellFrame> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// Cells in row-major order along with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &CellFrame)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % width, i / width, cell))
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut CellFrame> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.cells.get_mut(y as usize * self.width + x as usize)
    }

    fn build(snapshot: &Snapshot, data: &GameData) -> Self {
        // Grid size is fixed by the first snapshot.
        let (width, height) = data
            .snapshots
            .first()
            .map(|first| (first.width(), first.height()))
            .unwrap_or((0, 0));

        let mut frame = BoardFrame {
            width,
            height,
            cells: vec![CellFrame::empty(); width * height],
        };

        let health = snapshot.wall_health_lookup();
        for (y, row) in snapshot.board.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let Some(cell) = frame.get_mut(x as i32, y as i32) else {
                    continue;
                };
                cell.terrain = match data.cell_types.classify(code) {
                    Some(CellType::Wall) => Terrain::Wall {
                        health: health
                            .get(&(x as i32, y as i32))
                            .copied()
                            .unwrap_or(FULL_WALL_HEALTH),
                    },
                    Some(CellType::Mine) => Terrain::Mine,
                    // Tank codes on the board are hints; tanks come from `snapshot.tanks`.
                    Some(CellType::Tank(_)) | Some(CellType::Empty) | None => Terrain::Empty,
                };
            }
        }

        for tank in snapshot.tanks.iter().filter(|t| !t.destroyed) {
            if let Some(cell) = frame.get_mut(tank.position.x, tank.position.y) {
                cell.tank = Some(TankMarker {
                    player_id: tank.player_id,
                    direction: tank.direction,
                });
            }
        }

        for shell in snapshot.shells.iter().filter(|s| !s.destroyed) {
            if let Some(cell) = frame.get_mut(shell.position.x, shell.position.y) {
                cell.shells.push(shell.player_id);
            }
        }

        frame
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub step: u32,
    pub final_step: u32,
    /// Present only while a countdown is running.
    pub countdown: Option<i32>,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step: {} / {}", self.step, self.final_step)
    }
}

/// Which transport buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportState {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}

impl TransportState {
    fn at(index: usize, len: usize) -> Self {
        let at_start = index == 0;
        let at_end = index + 1 >= len;
        Self {
            first: !at_start,
            previous: !at_start,
            next: !at_end,
            last: !at_end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TankStat {
    pub player_id: u32,
    pub destroyed: bool,
    pub remaining_shells: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Step { step: u32, message: String },
    Complete { message: Option<String> },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Step { step, message } => write!(f, "Step {step}: {message}"),
            LogEntry::Complete { message: Some(message) } => {
                write!(f, "Game Complete: {message}")
            }
            LogEntry::Complete { message: None } => write!(f, "Game Complete"),
        }
    }
}

/// Everything a view needs to draw one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackFrame {
    pub index: usize,
    pub board: BoardFrame,
    pub status: StatusLine,
    pub transport: TransportState,
    pub tanks: Vec<TankStat>,
    pub log: Option<LogEntry>,
}

impl PlaybackFrame {
    /// Builds the frame for `index`, or `None` when the index is out of range.
    pub fn build(data: &GameData, index: usize) -> Option<Self> {
        let snapshot = data.snapshots.get(index)?;
        let len = data.len();

        let mut tanks: Vec<TankStat> = snapshot
            .tanks
            .iter()
            .map(|tank| TankStat {
                player_id: tank.player_id,
                destroyed: tank.destroyed,
                remaining_shells: tank.remaining_shells,
            })
            .collect();
        tanks.sort_by_key(|stat| stat.player_id);

        Some(Self {
            index,
            board: BoardFrame::build(snapshot, data),
            status: StatusLine {
                step: snapshot.step,
                final_step: data.final_step(),
                countdown: (snapshot.countdown > 0).then_some(snapshot.countdown),
            },
            transport: TransportState::at(index, len),
            tanks,
            log: log_entry(data, index),
        })
    }
}

fn log_entry(data: &GameData, index: usize) -> Option<LogEntry> {
    if index + 1 == data.len() {
        let message = data
            .snapshots
            .iter()
            .rev()
            .find(|snap| snap.has_meaningful_message())
            .map(|snap| snap.message.clone());
        return Some(LogEntry::Complete { message });
    }

    let snapshot = &data.snapshots[index];
    snapshot
        .has_meaningful_message()
        .then(|| LogEntry::Step {
            step: snapshot.step,
            message: snapshot.message.clone(),
        })
}
