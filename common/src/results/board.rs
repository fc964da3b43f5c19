//! Fixed-size layout of the textual board dumps found in result files.

use serde::Serialize;

pub const DEFAULT_ROWS: usize = 15;
pub const DEFAULT_COLS: usize = 20;
/// Largest row or column count accepted from a map header.
pub const MAX_DIMENSION: usize = 1000;

fn dimension(value: &str) -> Option<usize> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|n| (1..=MAX_DIMENSION).contains(n))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapDimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Default for MapDimensions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl MapDimensions {
    /// Reads the `Rows = N` / `Cols = N` header lines of a map file. Values
    /// that are absent, unreadable or outside `1..=MAX_DIMENSION` keep their
    /// defaults.
    pub fn parse(map_text: &str) -> Self {
        let mut dims = Self::default();
        for line in map_text.lines() {
            let line = line.trim_end_matches('\r');
            if let Some(rows) = line.strip_prefix("Rows = ").and_then(dimension) {
                dims.rows = rows;
            } else if let Some(cols) = line.strip_prefix("Cols = ").and_then(dimension) {
                dims.cols = cols;
            }
        }
        dims
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardCellClass {
    Wall,
    Mine,
    Player1,
    Player2,
    Shell,
    Empty,
    Unknown,
}

impl BoardCellClass {
    pub fn from_char(ch: char) -> Self {
        match ch {
            '#' => BoardCellClass::Wall,
            '@' => BoardCellClass::Mine,
            '1' => BoardCellClass::Player1,
            '2' => BoardCellClass::Player2,
            '*' => BoardCellClass::Shell,
            ' ' => BoardCellClass::Empty,
            _ => BoardCellClass::Unknown,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            BoardCellClass::Wall => "wall",
            BoardCellClass::Mine => "mine",
            BoardCellClass::Player1 => "player1",
            BoardCellClass::Player2 => "player2",
            BoardCellClass::Shell => "shell",
            BoardCellClass::Empty => "empty",
            BoardCellClass::Unknown => "unknown",
        }
    }
}

/// Board text laid onto a `rows x cols` grid. Characters past the grid are
/// dropped and short rows are padded with blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGrid {
    dims: MapDimensions,
    cells: Vec<char>,
}

impl BoardGrid {
    pub fn layout(dims: MapDimensions, board_text: &str) -> Self {
        let mut cells = vec![' '; dims.rows * dims.cols];
        for (row, line) in board_text.lines().take(dims.rows).enumerate() {
            for (col, ch) in line.trim_end_matches('\r').chars().take(dims.cols).enumerate() {
                cells[row * dims.cols + col] = ch;
            }
        }
        Self { dims, cells }
    }

    pub fn dims(&self) -> MapDimensions {
        self.dims
    }

    pub fn char_at(&self, row: usize, col: usize) -> Option<char> {
        if row >= self.dims.rows || col >= self.dims.cols {
            return None;
        }
        self.cells.get(row * self.dims.cols + col).copied()
    }

    pub fn class_at(&self, row: usize, col: usize) -> Option<BoardCellClass> {
        self.char_at(row, col).map(BoardCellClass::from_char)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.dims.cols.max(1)).take(self.dims.rows)
    }
}
